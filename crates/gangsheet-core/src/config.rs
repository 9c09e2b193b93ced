use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Roll configuration and layout policies.
/// Key notes:
///   - all lengths are inches; `dpi` only matters for raster output
///   - `packing` selects the flush-left shelf packer or the justified row distributor
///   - `rotation` selects how an artwork that fits both ways is oriented
///   - `header_allowance` is reserved at the top of the roll for the job band and counts toward billing

/// Packing policies.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PackingPolicy {
    /// Greedy flush-left shelves; densest output.
    Shelf,
    /// Rows with evenly distributed gaps; consistent trimming lanes.
    Justified,
}

impl FromStr for PackingPolicy {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "shelf" => Ok(Self::Shelf),
            "justified" | "even" => Ok(Self::Justified),
            _ => Err(()),
        }
    }
}

/// Rotation policies for artworks that fit the roll in both orientations.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RotationPolicy {
    /// Rotate whenever it lowers the effective height (forced rotation still applies).
    MinHeight,
    /// Rotate only when the artwork does not fit as-is.
    FitOnly,
}

impl FromStr for RotationPolicy {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "min_height" | "minheight" => Ok(Self::MinHeight),
            "fit_only" | "fitonly" => Ok(Self::FitOnly),
            _ => Err(()),
        }
    }
}

/// The two margin presets used on the shop floor.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MarginPreset {
    /// 0.5 in around every artwork.
    Standard,
    /// 0.375 in (3/8) around every artwork.
    Narrow,
}

impl MarginPreset {
    pub fn inches(self) -> f64 {
        match self {
            MarginPreset::Standard => 0.5,
            MarginPreset::Narrow => 0.375,
        }
    }
}

impl FromStr for MarginPreset {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "narrow" => Ok(Self::Narrow),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RollConfig {
    /// Printable roll width in inches.
    #[serde(default = "default_roll_width")]
    pub roll_width: f64,
    /// Blank border reserved around (or between) artworks, in inches.
    #[serde(default = "default_margin")]
    pub margin: f64,
    /// Pixels per inch of the raster output.
    #[serde(default = "default_dpi")]
    pub dpi: u32,
    /// Length rounding granularity in inches.
    #[serde(default = "default_billing_unit")]
    pub billing_unit: f64,
    /// Inches reserved at the top of the roll for the job identification band.
    #[serde(default = "default_header_allowance")]
    pub header_allowance: f64,

    #[serde(default = "default_packing")]
    pub packing: PackingPolicy,
    #[serde(default = "default_rotation")]
    pub rotation: RotationPolicy,

    /// Upper bound on duplicates the auto-fill advisor will simulate.
    #[serde(default = "default_max_autofill")]
    pub max_autofill: usize,
}

impl Default for RollConfig {
    fn default() -> Self {
        Self {
            roll_width: default_roll_width(),
            margin: default_margin(),
            dpi: default_dpi(),
            billing_unit: default_billing_unit(),
            header_allowance: default_header_allowance(),
            packing: default_packing(),
            rotation: default_rotation(),
            max_autofill: default_max_autofill(),
        }
    }
}

impl RollConfig {
    /// Validates the configuration parameters.
    ///
    /// Returns an error if:
    /// - the roll width, DPI, or billing unit is not positive
    /// - margin or header allowance is negative or not finite
    /// - `max_autofill` is 0
    /// - the margins leave no printable width
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::GangSheetError;

        if !(self.roll_width.is_finite() && self.roll_width > 0.0) {
            return Err(GangSheetError::InvalidConfig(format!(
                "roll_width must be > 0 (got {})",
                self.roll_width
            )));
        }
        if self.dpi == 0 {
            return Err(GangSheetError::InvalidConfig("dpi must be > 0".into()));
        }
        if !(self.billing_unit.is_finite() && self.billing_unit > 0.0) {
            return Err(GangSheetError::InvalidConfig(format!(
                "billing_unit must be > 0 (got {})",
                self.billing_unit
            )));
        }
        if !(self.margin.is_finite() && self.margin >= 0.0) {
            return Err(GangSheetError::InvalidConfig(format!(
                "margin must be >= 0 (got {})",
                self.margin
            )));
        }
        if !(self.header_allowance.is_finite() && self.header_allowance >= 0.0) {
            return Err(GangSheetError::InvalidConfig(format!(
                "header_allowance must be >= 0 (got {})",
                self.header_allowance
            )));
        }
        if self.max_autofill == 0 {
            return Err(GangSheetError::InvalidConfig(
                "max_autofill must be >= 1".into(),
            ));
        }
        if self.margin * 2.0 >= self.roll_width {
            return Err(GangSheetError::InvalidConfig(format!(
                "margin ({}) * 2 leaves no printable width on a {} in roll",
                self.margin, self.roll_width
            )));
        }
        Ok(())
    }

    /// Widest artwork (in inches) that fits the roll once margins are reserved.
    pub fn printable_width(&self) -> f64 {
        self.roll_width - 2.0 * self.margin
    }
}

fn default_roll_width() -> f64 {
    22.0
}
fn default_margin() -> f64 {
    MarginPreset::Standard.inches()
}
fn default_dpi() -> u32 {
    300
}
fn default_billing_unit() -> f64 {
    12.0
}
fn default_header_allowance() -> f64 {
    1.0
}
fn default_packing() -> PackingPolicy {
    PackingPolicy::Shelf
}
fn default_rotation() -> RotationPolicy {
    RotationPolicy::MinHeight
}
fn default_max_autofill() -> usize {
    500
}

/// Builder for `RollConfig` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct RollConfigBuilder {
    cfg: RollConfig,
}

impl RollConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: RollConfig::default(),
        }
    }
    pub fn roll_width(mut self, v: f64) -> Self {
        self.cfg.roll_width = v;
        self
    }
    pub fn margin(mut self, v: f64) -> Self {
        self.cfg.margin = v;
        self
    }
    pub fn margin_preset(mut self, v: MarginPreset) -> Self {
        self.cfg.margin = v.inches();
        self
    }
    pub fn dpi(mut self, v: u32) -> Self {
        self.cfg.dpi = v;
        self
    }
    pub fn billing_unit(mut self, v: f64) -> Self {
        self.cfg.billing_unit = v;
        self
    }
    pub fn header_allowance(mut self, v: f64) -> Self {
        self.cfg.header_allowance = v;
        self
    }
    pub fn packing(mut self, v: PackingPolicy) -> Self {
        self.cfg.packing = v;
        self
    }
    pub fn rotation(mut self, v: RotationPolicy) -> Self {
        self.cfg.rotation = v;
        self
    }
    pub fn max_autofill(mut self, v: usize) -> Self {
        self.cfg.max_autofill = v;
        self
    }
    pub fn build(self) -> RollConfig {
        self.cfg
    }
}

/// Starts from an existing config, e.g. one loaded from a file.
impl From<RollConfig> for RollConfigBuilder {
    fn from(cfg: RollConfig) -> Self {
        Self { cfg }
    }
}

impl RollConfig {
    /// Create a fluent builder for `RollConfig`.
    pub fn builder() -> RollConfigBuilder {
        RollConfigBuilder::new()
    }
}
