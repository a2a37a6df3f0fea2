use std::fs;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::LabError;
use crate::haptics::Capabilities;
use crate::scheduler::{ScheduleState, TrailingPulse};
use crate::style::{PulseMode, VibrationStyle};
use crate::units::Bpm;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScopeConfig {
    pub columns: usize,
    pub rows: usize,
    /// Redraw once per this many render frames
    pub every_frames: u64,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            columns: 100,
            rows: 8,
            every_frames: 6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabConfig {
    pub bpm: f64,
    pub continuous_style: VibrationStyle,
    pub single_style: VibrationStyle,
    pub mode: PulseMode,
    pub capabilities: Capabilities,
    pub cancel_trailing_pulse: bool,
    pub scope: ScopeConfig,
}

impl Default for LabConfig {
    fn default() -> Self {
        Self {
            bpm: *Bpm::default(),
            continuous_style: VibrationStyle::Medium,
            single_style: VibrationStyle::Light,
            mode: PulseMode::Continuous,
            capabilities: Capabilities::default(),
            cancel_trailing_pulse: true,
            scope: ScopeConfig::default(),
        }
    }
}

impl LabConfig {
    pub fn from_json(json: &str) -> Result<Self, LabError> {
        let config: LabConfig = serde_json::from_str(json)?;
        config.validate()
    }

    pub fn load(path: &Path) -> Result<Self, LabError> {
        info!("loading configuration from {}", path.display());
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String, LabError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Clamp what can be clamped, reject what cannot
    pub fn validate(mut self) -> Result<Self, LabError> {
        self.bpm = *Bpm::from_slider(self.bpm)
            .ok_or_else(|| LabError::InvalidSetting(format!("bpm {}", self.bpm)))?;
        if self.scope.columns == 0 || self.scope.rows == 0 {
            return Err(LabError::InvalidSetting(format!(
                "scope {}x{}",
                self.scope.columns, self.scope.rows
            )));
        }
        if self.scope.every_frames == 0 {
            return Err(LabError::InvalidSetting("scope every_frames 0".into()));
        }
        Ok(self)
    }

    pub fn schedule_state(&self) -> ScheduleState {
        let bpm = Bpm::clamped(self.bpm);
        ScheduleState {
            is_running: false,
            bpm,
            interval: bpm.interval(),
            selected_style: self.continuous_style,
            mode: self.mode,
        }
    }

    pub fn trailing_pulse(&self) -> TrailingPulse {
        if self.cancel_trailing_pulse {
            TrailingPulse::Cancelled
        } else {
            TrailingPulse::Detached
        }
    }
}
