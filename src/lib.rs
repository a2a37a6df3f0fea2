use crate::style::{PulseMode, VibrationStyle};

pub mod application;
pub mod config;
pub mod curve;
pub mod error;
pub mod haptics;
pub mod headless;
pub mod keyboard;
pub mod pulse_lab;
pub mod scheduler;
pub mod scope;
pub mod signal;
pub mod style;
pub mod timers;
pub mod units;
pub mod waveform;

/// Everything the user can ask of the lab
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlAction {
    SetBpm(f64),
    NudgeBpm(f64),
    SetStyle(VibrationStyle),
    CycleStyle,
    SetSingleStyle(VibrationStyle),
    SetMode(PulseMode),
    StartStop,
    StartHeartbeat,
    Stop,
    TriggerOnce,
}

impl ControlAction {
    pub fn send(self, radio: &Radio) {
        LabEvent::Control(self).send(radio);
    }
}

#[derive(Debug, Clone)]
pub enum LabEvent {
    Control(ControlAction),
    Quit,
}

pub type Radio = winit::event_loop::EventLoopProxy<LabEvent>;

impl LabEvent {
    pub fn send(self, radio: &Radio) {
        if radio.send_event(self).is_err() {
            log::warn!("event loop closed, event dropped");
        }
    }
}
