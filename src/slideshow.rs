use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::Configuration;
use crate::error::{Error, Result};
use crate::events::{ChangeCause, ControlEvent, Gesture, SlideChanged};
use crate::slide::Slide;
use crate::stage::{Markup, Stage, Tag};

/// Direction of the last explicit navigation; auto-advance follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

impl Direction {
    pub fn step(self) -> isize {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }
}

/// Arrow elements injected at init, plus the container they live in.
#[derive(Debug, Clone)]
pub struct Controls<H> {
    pub container: H,
    pub left_arrow: H,
    pub right_arrow: H,
    arrow_fade: Duration,
}

/// Result of a best-effort initialisation.
#[derive(Debug)]
#[must_use]
pub enum InitOutcome<H> {
    Ready(Slideshow<H>),
    Failed(Error),
}

impl<H> InitOutcome<H> {
    pub fn is_ready(&self) -> bool {
        matches!(self, InitOutcome::Ready(_))
    }

    pub fn into_result(self) -> Result<Slideshow<H>> {
        match self {
            InitOutcome::Ready(show) => Ok(show),
            InitOutcome::Failed(err) => Err(err),
        }
    }
}

#[derive(Debug)]
pub struct Slideshow<H> {
    slides: Vec<Slide<H>>,
    current: usize,
    last_direction: Direction,
    controls: Controls<H>,
}

impl<H: Clone + std::fmt::Debug + PartialEq> Slideshow<H> {
    /// Build the slideshow, logging instead of propagating any failure.
    ///
    /// Stage operations already performed before a failure (panels hidden so
    /// far) are not rolled back.
    pub fn init<S: Stage<Handle = H>>(stage: &mut S, cfg: &Configuration) -> InitOutcome<H> {
        match Self::try_new(stage, cfg) {
            Ok(show) => {
                info!(
                    container = %cfg.container_id,
                    slides = show.len(),
                    "slideshow initialized"
                );
                InitOutcome::Ready(show)
            }
            Err(err) => {
                warn!(container = %cfg.container_id, "slideshow initialization failed: {err}");
                InitOutcome::Failed(err)
            }
        }
    }

    pub fn try_new<S: Stage<Handle = H>>(stage: &mut S, cfg: &Configuration) -> Result<Self> {
        let container = stage
            .element_by_id(&cfg.container_id)
            .ok_or_else(|| Error::ContainerNotFound(cfg.container_id.clone()))?;

        let mut slides = Vec::new();
        for (idx, panel) in stage.children(&container, Tag::Div).into_iter().enumerate() {
            let image = stage.first_descendant(&panel, Tag::Img);
            if image.is_none() {
                warn!(panel = idx, "panel has no image");
            }
            let caption = stage.first_descendant(&panel, Tag::Div);
            if caption.is_none() {
                warn!(panel = idx, "panel has no caption");
            }
            let slide = Slide::new(image, caption, panel, cfg.fade);
            slide.hide(stage);
            slides.push(slide);
        }

        let first = slides
            .first()
            .ok_or_else(|| Error::NoPanels(cfg.container_id.clone()))?;
        first.show(stage);

        let controls = Self::add_controls(stage, container, cfg)?;
        stage.set_css(&controls.container, "display", "block");

        Ok(Self {
            slides,
            current: 0,
            last_direction: Direction::Forward,
            controls,
        })
    }

    /// Append the hidden arrows and bind hover and click listeners.
    fn add_controls<S: Stage<Handle = H>>(
        stage: &mut S,
        container: H,
        cfg: &Configuration,
    ) -> Result<Controls<H>> {
        let arrows = &cfg.arrows;
        let left_arrow = stage.append(
            &container,
            Markup::hidden_div(&arrows.left_id, &arrows.left_label),
        )?;
        let right_arrow = stage.append(
            &container,
            Markup::hidden_div(&arrows.right_id, &arrows.right_label),
        )?;

        stage.listen(&container, Gesture::Enter, ControlEvent::RevealArrows);
        stage.listen(&container, Gesture::Leave, ControlEvent::ConcealArrows);
        stage.listen(&left_arrow, Gesture::Click, ControlEvent::Previous);
        stage.listen(&right_arrow, Gesture::Click, ControlEvent::Next);

        Ok(Controls {
            container,
            left_arrow,
            right_arrow,
            arrow_fade: cfg.arrow_fade,
        })
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> &Slide<H> {
        &self.slides[self.current]
    }

    pub fn slides(&self) -> &[Slide<H>] {
        &self.slides
    }

    pub fn last_direction(&self) -> Direction {
        self.last_direction
    }

    pub fn controls(&self) -> &Controls<H> {
        &self.controls
    }

    pub fn next_slide<S: Stage<Handle = H>>(&mut self, stage: &mut S) -> usize {
        self.navigate(stage, Direction::Forward)
    }

    pub fn previous_slide<S: Stage<Handle = H>>(&mut self, stage: &mut S) -> usize {
        self.navigate(stage, Direction::Backward)
    }

    /// Timer tick: keep moving the way the user last navigated.
    pub fn auto_advance<S: Stage<Handle = H>>(&mut self, stage: &mut S) -> usize {
        let direction = self.last_direction;
        self.apply(stage, direction.step())
    }

    fn navigate<S: Stage<Handle = H>>(&mut self, stage: &mut S, direction: Direction) -> usize {
        self.last_direction = direction;
        self.apply(stage, direction.step())
    }

    /// Move `step` slides forward (positive) or backward (negative), wrapping
    /// around. `|step|` may not exceed the number of slides.
    pub fn change_slide<S: Stage<Handle = H>>(&mut self, stage: &mut S, step: isize) -> Result<usize> {
        if step.unsigned_abs() > self.len() {
            return Err(Error::StepOutOfRange {
                step,
                len: self.len(),
            });
        }
        Ok(self.apply(stage, step))
    }

    // Callers guarantee |step| <= len.
    fn apply<S: Stage<Handle = H>>(&mut self, stage: &mut S, step: isize) -> usize {
        let len = self.len() as isize;
        self.slides[self.current].hide(stage);
        self.current = (self.current as isize + len + step).rem_euclid(len) as usize;
        self.slides[self.current].show(stage);
        debug!(step, current = self.current, "slide changed");
        self.current
    }

    pub fn reveal_arrows<S: Stage<Handle = H>>(&self, stage: &mut S) {
        let c = &self.controls;
        stage.fade_in(&c.left_arrow, c.arrow_fade);
        stage.fade_in(&c.right_arrow, c.arrow_fade);
    }

    pub fn conceal_arrows<S: Stage<Handle = H>>(&self, stage: &mut S) {
        let c = &self.controls;
        stage.fade_out(&c.left_arrow, c.arrow_fade);
        stage.fade_out(&c.right_arrow, c.arrow_fade);
    }

    /// Apply a routed control event; reports the change when the slide moved.
    pub fn handle<S: Stage<Handle = H>>(
        &mut self,
        stage: &mut S,
        event: ControlEvent,
    ) -> Option<SlideChanged> {
        let from = self.current;
        let to = match event {
            ControlEvent::RevealArrows => {
                self.reveal_arrows(stage);
                return None;
            }
            ControlEvent::ConcealArrows => {
                self.conceal_arrows(stage);
                return None;
            }
            ControlEvent::Previous => self.previous_slide(stage),
            ControlEvent::Next => self.next_slide(stage),
        };
        Some(SlideChanged {
            from,
            to,
            cause: ChangeCause::Manual,
        })
    }

    pub fn on_tick<S: Stage<Handle = H>>(&mut self, stage: &mut S) -> SlideChanged {
        let from = self.current;
        let to = self.auto_advance(stage);
        SlideChanged {
            from,
            to,
            cause: ChangeCause::AutoAdvance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Document, Fade, Page};

    fn setup(panels: usize) -> (Document, Slideshow<crate::dom::ElementId>) {
        let mut doc = Document::from_page(&Page::gallery("slideshow", panels));
        let show = Slideshow::try_new(&mut doc, &Configuration::default()).unwrap();
        (doc, show)
    }

    fn visible(doc: &Document, show: &Slideshow<crate::dom::ElementId>) -> Vec<usize> {
        show.slides()
            .iter()
            .enumerate()
            .filter(|(_, s)| doc.is_visible(s.panel))
            .map(|(i, _)| i)
            .collect()
    }

    #[test]
    fn forward_cycle_wraps_to_start() {
        let (mut doc, mut show) = setup(4);
        let shown: Vec<usize> = (0..4)
            .map(|_| show.change_slide(&mut doc, 1).unwrap())
            .collect();
        assert_eq!(shown, vec![1, 2, 3, 0]);
        assert_eq!(visible(&doc, &show), vec![0]);
    }

    #[test]
    fn backward_from_zero_wraps_to_last() {
        let (mut doc, mut show) = setup(4);
        assert_eq!(show.change_slide(&mut doc, -1).unwrap(), 3);
        assert_eq!(visible(&doc, &show), vec![3]);
    }

    #[test]
    fn larger_steps_within_bound_are_allowed() {
        let (mut doc, mut show) = setup(4);
        assert_eq!(show.change_slide(&mut doc, 3).unwrap(), 3);
        assert_eq!(show.change_slide(&mut doc, -4).unwrap(), 3);
        assert_eq!(show.change_slide(&mut doc, 0).unwrap(), 3);
    }

    #[test]
    fn oversized_step_is_rejected_without_side_effects() {
        let (mut doc, mut show) = setup(4);
        doc.take_transitions();
        let err = show.change_slide(&mut doc, 5).unwrap_err();
        assert!(matches!(err, Error::StepOutOfRange { step: 5, len: 4 }));
        assert!(show.change_slide(&mut doc, -5).is_err());
        assert_eq!(show.current_index(), 0);
        assert!(doc.transitions().is_empty());
    }

    #[test]
    fn navigation_records_direction() {
        let (mut doc, mut show) = setup(3);
        assert_eq!(show.last_direction(), Direction::Forward);
        show.previous_slide(&mut doc);
        assert_eq!(show.last_direction(), Direction::Backward);
        show.next_slide(&mut doc);
        assert_eq!(show.last_direction(), Direction::Forward);
    }

    #[test]
    fn tick_follows_last_direction() {
        let (mut doc, mut show) = setup(5);
        assert_eq!(show.on_tick(&mut doc).to, 1);
        show.previous_slide(&mut doc);
        assert_eq!(show.current_index(), 0);
        let change = show.on_tick(&mut doc);
        assert_eq!((change.from, change.to), (0, 4));
        assert_eq!(change.cause, ChangeCause::AutoAdvance);
    }

    #[test]
    fn slide_change_fades_out_then_in() {
        let (mut doc, mut show) = setup(2);
        doc.take_transitions();
        show.next_slide(&mut doc);
        let log = doc.take_transitions();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].fade, Fade::Out);
        assert_eq!(log[0].element, show.slides()[0].panel);
        assert_eq!(log[1].fade, Fade::In);
        assert_eq!(log[1].element, show.slides()[1].panel);
        assert!(log.iter().all(|t| t.duration == Duration::from_millis(700)));
    }

    #[test]
    fn hover_reveals_and_conceals_arrows() {
        let (mut doc, mut show) = setup(2);
        let left = show.controls().left_arrow;
        let right = show.controls().right_arrow;
        assert!(!doc.is_visible(left) && !doc.is_visible(right));
        doc.take_transitions();

        assert!(show.handle(&mut doc, ControlEvent::RevealArrows).is_none());
        assert!(doc.is_visible(left) && doc.is_visible(right));
        assert!(show.handle(&mut doc, ControlEvent::ConcealArrows).is_none());
        assert!(!doc.is_visible(left) && !doc.is_visible(right));

        let log = doc.take_transitions();
        assert_eq!(log.len(), 4);
        assert!(log.iter().all(|t| t.duration == Duration::from_millis(500)));
        assert_eq!(show.current_index(), 0);
    }

    #[test]
    fn handle_reports_manual_changes() {
        let (mut doc, mut show) = setup(3);
        let change = show.handle(&mut doc, ControlEvent::Previous).unwrap();
        assert_eq!((change.from, change.to), (0, 2));
        assert_eq!(change.cause, ChangeCause::Manual);
    }
}
