use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter, EnumString, IntoEnumIterator};

/// Intensity drawn for a continuous pulse when the chosen style has none
pub const FALLBACK_INTENSITY: f32 = 0.7;

/// Intensity of the trailing heartbeat pulse
pub const TRAILING_INTENSITY: f32 = 0.3;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    EnumCount,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum VibrationStyle {
    Light,
    Medium,
    Heavy,
    Rigid,
    Soft,
    Success,
    Warning,
    Error,
}

impl VibrationStyle {
    /// Continuous intensity. Notification styles are single-shot only.
    pub fn intensity(self) -> Option<f32> {
        use VibrationStyle::*;
        match self {
            Light => Some(0.4),
            Medium => Some(0.7),
            Heavy => Some(1.0),
            Rigid => Some(0.9),
            Soft => Some(0.5),
            Success | Warning | Error => None,
        }
    }

    pub fn is_continuous(self) -> bool {
        self.intensity().is_some()
    }

    /// The style actually played by the scheduler, and its spike height
    pub fn continuous(self) -> (VibrationStyle, f32) {
        match self.intensity() {
            Some(intensity) => (self, intensity),
            None => (VibrationStyle::Medium, FALLBACK_INTENSITY),
        }
    }

    /// Styles that make sense for repeated pulses
    pub fn continuous_styles() -> impl Iterator<Item = VibrationStyle> {
        Self::iter().filter(|style| style.is_continuous())
    }

    /// Next continuous style, wrapping around
    pub fn next_continuous(self) -> VibrationStyle {
        let styles: Vec<_> = Self::continuous_styles().collect();
        match styles.iter().position(|style| *style == self) {
            Some(index) => styles[(index + 1) % styles.len()],
            None => styles[0],
        }
    }

    /// Style by zero-based position, as on the selector
    pub fn from_index(index: usize) -> Option<VibrationStyle> {
        Self::iter().nth(index)
    }

    /// The haptic the platform is asked for before capability negotiation
    pub fn tag(self) -> HapticTag {
        use VibrationStyle::*;
        match self {
            Light => HapticTag::Light,
            Medium => HapticTag::Medium,
            Heavy => HapticTag::Heavy,
            Rigid => HapticTag::Rigid,
            Soft => HapticTag::Soft,
            Success => HapticTag::Success,
            Warning => HapticTag::Warning,
            Error => HapticTag::Error,
        }
    }
}

/// What the haptic engine is told to play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum HapticTag {
    Light,
    Medium,
    Heavy,
    Rigid,
    Soft,
    Success,
    Warning,
    Error,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum PulseMode {
    /// One pulse per beat
    #[default]
    Continuous,
    /// Primary pulse plus a light trailing pulse per beat
    Heartbeat,
}
