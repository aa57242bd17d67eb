/// Raw pointer gesture reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gesture {
    Enter,
    Leave,
    Click,
}

/// A gesture aimed at the element with the given id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointerEvent {
    pub target: String,
    pub gesture: Gesture,
}

impl PointerEvent {
    pub fn new(target: impl Into<String>, gesture: Gesture) -> Self {
        Self {
            target: target.into(),
            gesture,
        }
    }
}

/// What a bound listener asks the slideshow to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    RevealArrows,
    ConcealArrows,
    Previous,
    Next,
}

/// Emitted by the auto-advance timer once per period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeCause {
    Manual,
    AutoAdvance,
}

/// Emitted by the controller after the visible slide moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideChanged {
    pub from: usize,
    pub to: usize,
    pub cause: ChangeCause,
}
