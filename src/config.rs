use std::path::Path;
use std::time::Duration;

use anyhow::{Result, ensure};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Configuration {
    /// Id of the element whose `div` children are the panels.
    pub container_id: String,
    /// Cross-fade duration of a slide change.
    #[serde(with = "humantime_serde")]
    pub fade: Duration,
    /// Fade duration of the hover-revealed arrows.
    #[serde(with = "humantime_serde")]
    pub arrow_fade: Duration,
    /// Period of the auto-advance timer.
    #[serde(with = "humantime_serde")]
    pub auto_advance: Duration,
    pub arrows: ArrowOptions,
}

impl Configuration {
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let s = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&s)?)
    }

    /// Validate runtime invariants that cannot be expressed via serde defaults alone.
    pub fn validated(self) -> Result<Self> {
        ensure!(
            !self.container_id.trim().is_empty(),
            "container-id must not be empty"
        );
        ensure!(!self.fade.is_zero(), "fade must be greater than zero");
        ensure!(
            !self.arrow_fade.is_zero(),
            "arrow-fade must be greater than zero"
        );
        ensure!(
            !self.auto_advance.is_zero(),
            "auto-advance must be greater than zero"
        );
        self.arrows.validate(&self.container_id)?;
        Ok(self)
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            container_id: "slideshow".to_string(),
            fade: Duration::from_millis(700),
            arrow_fade: Duration::from_millis(500),
            auto_advance: Duration::from_millis(6500),
            arrows: ArrowOptions::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ArrowOptions {
    pub left_id: String,
    pub right_id: String,
    pub left_label: String,
    pub right_label: String,
}

impl ArrowOptions {
    fn validate(&self, container_id: &str) -> Result<()> {
        ensure!(
            !self.left_id.trim().is_empty() && !self.right_id.trim().is_empty(),
            "arrows.left-id and arrows.right-id must not be empty"
        );
        ensure!(
            self.left_id != self.right_id,
            "arrows.left-id and arrows.right-id must differ"
        );
        ensure!(
            self.left_id != container_id && self.right_id != container_id,
            "arrow ids must differ from container-id"
        );
        Ok(())
    }
}

impl Default for ArrowOptions {
    fn default() -> Self {
        Self {
            left_id: "slideshow-arrow-left".to_string(),
            right_id: "slideshow-arrow-right".to_string(),
            left_label: "<".to_string(),
            right_label: ">".to_string(),
        }
    }
}
