use thiserror::Error;

/// Library error type for slideshow operations.
#[derive(Debug, Error)]
pub enum Error {
    /// No element carries the configured container id.
    #[error("slideshow container #{0} not found")]
    ContainerNotFound(String),

    /// The container exists but holds no panels.
    #[error("slideshow container #{0} has no panels")]
    NoPanels(String),

    /// A slide change tried to move further than the number of slides.
    #[error("cannot move {step} slides in a slideshow of {len}")]
    StepOutOfRange { step: isize, len: usize },

    /// The host refused an operation.
    #[error("stage error: {0}")]
    Stage(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
