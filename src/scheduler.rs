use std::fmt::{Display, Formatter};
use std::time::Duration;

use log::{debug, info, warn};

use crate::style::{PulseMode, VibrationStyle, TRAILING_INTENSITY};
use crate::timers::{TimerId, TimerTask, Timers};
use crate::units::{Bpm, Seconds, HEARTBEAT_OFFSET};

/// What happens to a pending trailing heartbeat pulse on stop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrailingPulse {
    /// Stop cancels it along with the beat timer
    Cancelled,
    /// Untracked one-shot: a stop inside the 150ms window still lets one
    /// light pulse through
    Detached,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduleState {
    pub is_running: bool,
    pub bpm: Bpm,
    /// Recomputed from `bpm` on every start
    pub interval: Seconds,
    pub selected_style: VibrationStyle,
    pub mode: PulseMode,
}

impl Default for ScheduleState {
    fn default() -> Self {
        let bpm = Bpm::default();
        Self {
            is_running: false,
            bpm,
            interval: bpm.interval(),
            selected_style: VibrationStyle::Medium,
            mode: PulseMode::Continuous,
        }
    }
}

/// A haptic plus the spike it leaves in the waveform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pulse {
    pub style: VibrationStyle,
    pub intensity: f32,
}

impl Pulse {
    pub fn trailing() -> Self {
        Self {
            style: VibrationStyle::Light,
            intensity: TRAILING_INTENSITY,
        }
    }
}

/// Parameters frozen when the schedule starts
#[derive(Debug, Clone, Copy)]
struct Running {
    tick: TimerId,
    primary: Pulse,
    mode: PulseMode,
}

pub struct PulseScheduler {
    state: ScheduleState,
    trailing_pulse: TrailingPulse,
    running: Option<Running>,
    trailing: Option<TimerId>,
}

impl PulseScheduler {
    pub fn new(state: ScheduleState, trailing_pulse: TrailingPulse) -> Self {
        Self {
            state: ScheduleState {
                is_running: false,
                ..state
            },
            trailing_pulse,
            running: None,
            trailing: None,
        }
    }

    pub fn state(&self) -> &ScheduleState {
        &self.state
    }

    /// Takes effect on the next start
    pub fn set_bpm(&mut self, bpm: Bpm) {
        self.state.bpm = bpm;
    }

    /// Takes effect on the next start
    pub fn set_style(&mut self, style: VibrationStyle) {
        self.state.selected_style = style;
    }

    /// Takes effect on the next start
    pub fn set_mode(&mut self, mode: PulseMode) {
        self.state.mode = mode;
    }

    /// Begin beating, the first beat at `now`. False if already running.
    pub fn start(&mut self, timers: &mut Timers, now: Duration) -> bool {
        if self.running.is_some() {
            return false;
        }
        self.state.interval = self.state.bpm.interval();
        let (style, intensity) = self.state.selected_style.continuous();
        if style != self.state.selected_style {
            warn!(
                "{} has no continuous intensity, pulsing {style}",
                self.state.selected_style
            );
        }
        let tick = timers.every(now, self.state.interval.to_duration(), TimerTask::PulseTick);
        self.running = Some(Running {
            tick,
            primary: Pulse { style, intensity },
            mode: self.state.mode,
        });
        self.state.is_running = true;
        info!(
            "{} at {:.0} BPM, every {:.3}s",
            self.state.mode, *self.state.bpm, *self.state.interval
        );
        true
    }

    /// Cancel the beat. False if nothing was running.
    pub fn stop(&mut self, timers: &mut Timers) -> bool {
        if self.trailing_pulse == TrailingPulse::Cancelled {
            if let Some(trailing) = self.trailing.take() {
                timers.cancel(trailing);
            }
        }
        self.state.is_running = false;
        let Some(running) = self.running.take() else {
            return false;
        };
        timers.cancel(running.tick);
        info!("stopped");
        true
    }

    /// The beat timer fired. Heartbeats also book their trailing pulse.
    pub fn on_tick(&mut self, timers: &mut Timers, id: TimerId, now: Duration) -> Option<Pulse> {
        let running = self.running.filter(|running| running.tick == id)?;
        if running.mode == PulseMode::Heartbeat {
            let trailing = timers.after(now, HEARTBEAT_OFFSET.to_duration(), TimerTask::TrailingPulse);
            if self.trailing_pulse == TrailingPulse::Cancelled {
                self.trailing = Some(trailing);
            }
        }
        debug!("beat {:?}", running.primary);
        Some(running.primary)
    }

    /// The trailing timer fired
    pub fn on_trailing(&mut self, id: TimerId) -> Pulse {
        if self.trailing == Some(id) {
            self.trailing = None;
        } else if !self.state.is_running {
            warn!("trailing pulse fired after stop");
        }
        Pulse::trailing()
    }
}

/// Human readable schedule status
pub struct StatusLine<'a>(pub &'a ScheduleState);

impl Display for StatusLine<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let state = self.0;
        let activity = if state.is_running { "Vibrating..." } else { "Idle" };
        write!(
            f,
            "{activity} {} {} {:.0} BPM  interval {:.2}s",
            state.mode,
            state.selected_style,
            *state.bpm,
            *state.bpm.interval()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn scheduler(mode: PulseMode, trailing_pulse: TrailingPulse) -> PulseScheduler {
        PulseScheduler::new(
            ScheduleState {
                mode,
                ..ScheduleState::default()
            },
            trailing_pulse,
        )
    }

    #[test]
    fn test_start_computes_interval() {
        let mut timers = Timers::default();
        let mut scheduler = scheduler(PulseMode::Continuous, TrailingPulse::Cancelled);
        scheduler.set_bpm(Bpm::clamped(120.0));
        assert!(scheduler.start(&mut timers, ms(0)));
        assert!(scheduler.state().is_running);
        assert_eq!(*scheduler.state().interval, 0.5);
        assert_eq!(timers.next_due(), Some(ms(0)));
    }

    #[test]
    fn test_start_twice_is_noop() {
        let mut timers = Timers::default();
        let mut scheduler = scheduler(PulseMode::Continuous, TrailingPulse::Cancelled);
        assert!(scheduler.start(&mut timers, ms(0)));
        assert!(!scheduler.start(&mut timers, ms(10)));
        assert_eq!(timers.len(), 1);
    }

    #[test]
    fn test_continuous_tick_is_one_pulse() {
        let mut timers = Timers::default();
        let mut scheduler = scheduler(PulseMode::Continuous, TrailingPulse::Cancelled);
        scheduler.set_style(VibrationStyle::Heavy);
        scheduler.start(&mut timers, ms(0));
        let expiry = timers.pop_due(ms(0)).unwrap();
        let pulse = scheduler.on_tick(&mut timers, expiry.id, ms(0));
        assert_eq!(
            pulse,
            Some(Pulse {
                style: VibrationStyle::Heavy,
                intensity: 1.0
            })
        );
        assert_eq!(timers.len(), 1);
    }

    #[test]
    fn test_heartbeat_tick_books_trailing_pulse() {
        let mut timers = Timers::default();
        let mut scheduler = scheduler(PulseMode::Heartbeat, TrailingPulse::Cancelled);
        scheduler.start(&mut timers, ms(0));
        let expiry = timers.pop_due(ms(0)).unwrap();
        scheduler.on_tick(&mut timers, expiry.id, ms(0));
        let trailing = timers.pop_due(ms(150)).unwrap();
        assert_eq!(trailing.task, TimerTask::TrailingPulse);
        assert_eq!(trailing.due, ms(150));
        assert_eq!(scheduler.on_trailing(trailing.id), Pulse::trailing());
    }

    #[test]
    fn test_stop_cancels_trailing_pulse() {
        let mut timers = Timers::default();
        let mut scheduler = scheduler(PulseMode::Heartbeat, TrailingPulse::Cancelled);
        scheduler.start(&mut timers, ms(0));
        let expiry = timers.pop_due(ms(0)).unwrap();
        scheduler.on_tick(&mut timers, expiry.id, ms(0));
        assert!(scheduler.stop(&mut timers));
        assert!(timers.is_empty());
    }

    #[test]
    fn test_detached_trailing_pulse_survives_stop() {
        let mut timers = Timers::default();
        let mut scheduler = scheduler(PulseMode::Heartbeat, TrailingPulse::Detached);
        scheduler.start(&mut timers, ms(0));
        let expiry = timers.pop_due(ms(0)).unwrap();
        scheduler.on_tick(&mut timers, expiry.id, ms(0));
        scheduler.stop(&mut timers);
        let stray = timers.pop_due(ms(150)).unwrap();
        assert_eq!(stray.task, TimerTask::TrailingPulse);
        assert!(timers.is_empty());
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut timers = Timers::default();
        let mut scheduler = scheduler(PulseMode::Continuous, TrailingPulse::Cancelled);
        scheduler.start(&mut timers, ms(0));
        assert!(scheduler.stop(&mut timers));
        let once = *scheduler.state();
        assert!(!scheduler.stop(&mut timers));
        assert_eq!(*scheduler.state(), once);
        assert!(!once.is_running);
    }

    #[test]
    fn test_changes_wait_for_restart() {
        let mut timers = Timers::default();
        let mut scheduler = scheduler(PulseMode::Continuous, TrailingPulse::Cancelled);
        scheduler.start(&mut timers, ms(0));
        scheduler.set_bpm(Bpm::clamped(120.0));
        scheduler.set_style(VibrationStyle::Soft);
        let first = timers.pop_due(ms(0)).unwrap();
        assert_eq!(
            scheduler.on_tick(&mut timers, first.id, ms(0)).unwrap().style,
            VibrationStyle::Medium
        );
        let second = timers.pop_due(ms(1000)).unwrap();
        assert_eq!(second.due, ms(1000));
        assert_eq!(*scheduler.state().interval, 1.0);
        scheduler.stop(&mut timers);
        scheduler.start(&mut timers, ms(1000));
        assert_eq!(*scheduler.state().interval, 0.5);
    }

    #[test]
    fn test_stale_tick_is_ignored() {
        let mut timers = Timers::default();
        let mut scheduler = scheduler(PulseMode::Continuous, TrailingPulse::Cancelled);
        scheduler.start(&mut timers, ms(0));
        let expiry = timers.pop_due(ms(0)).unwrap();
        scheduler.stop(&mut timers);
        assert_eq!(scheduler.on_tick(&mut timers, expiry.id, ms(0)), None);
    }

    #[test]
    fn test_status_line() {
        let state = ScheduleState {
            bpm: Bpm::clamped(72.0),
            ..ScheduleState::default()
        };
        assert_eq!(
            StatusLine(&state).to_string(),
            "Idle continuous medium 72 BPM  interval 0.83s"
        );
    }
}
