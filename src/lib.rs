pub mod config;
pub mod dom;
pub mod error;
pub mod events;
pub mod slide;
pub mod slideshow;
pub mod stage;
pub mod tasks {
    pub mod auto_advance;
    pub mod controller;
}

pub use error::{Error, Result};
pub use slideshow::{Direction, InitOutcome, Slideshow};
pub use stage::Stage;
