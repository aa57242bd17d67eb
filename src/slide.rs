use std::time::Duration;

use crate::stage::Stage;

/// One image + caption panel taking part in the rotation.
///
/// Holds handles only; whether the panel is currently visible is the
/// stage's business. Only the panel is animated, so a panel without an image
/// or caption still takes part.
#[derive(Debug, Clone)]
pub struct Slide<H> {
    pub image: Option<H>,
    pub caption: Option<H>,
    pub panel: H,
    fade: Duration,
}

impl<H: Clone> Slide<H> {
    pub fn new(image: Option<H>, caption: Option<H>, panel: H, fade: Duration) -> Self {
        Self {
            image,
            caption,
            panel,
            fade,
        }
    }

    pub fn fade(&self) -> Duration {
        self.fade
    }

    pub fn show<S: Stage<Handle = H>>(&self, stage: &mut S) {
        stage.fade_in(&self.panel, self.fade);
    }

    pub fn hide<S: Stage<Handle = H>>(&self, stage: &mut S) {
        stage.fade_out(&self.panel, self.fade);
    }
}
