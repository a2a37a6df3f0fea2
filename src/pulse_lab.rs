use std::time::Duration;

use log::{debug, info, trace};

use crate::config::LabConfig;
use crate::haptics::{CapabilityTable, HapticEngine};
use crate::scheduler::{Pulse, PulseScheduler, ScheduleState, StatusLine};
use crate::signal::{SignalGenerator, WaveFrame};
use crate::style::{PulseMode, VibrationStyle};
use crate::timers::{TimerId, TimerTask, Timers};
use crate::units::{Bpm, FRAME_RATE};
use crate::ControlAction;

/// The one owner of all pulse state. Every mutation arrives either as a
/// control action from the user or as a timer expiry via `advance_to`,
/// both on the same thread.
pub struct PulseLab<H: HapticEngine> {
    scheduler: PulseScheduler,
    signal: SignalGenerator,
    timers: Timers,
    haptics: H,
    capability_table: CapabilityTable,
    single_style: VibrationStyle,
    render_timer: TimerId,
    now: Duration,
}

impl<H: HapticEngine> PulseLab<H> {
    pub fn new(config: &LabConfig, haptics: H) -> Self {
        let mut timers = Timers::default();
        let render_timer = timers.every(
            Duration::ZERO,
            FRAME_RATE.period().to_duration(),
            TimerTask::RenderFrame,
        );
        Self {
            scheduler: PulseScheduler::new(config.schedule_state(), config.trailing_pulse()),
            signal: SignalGenerator::default(),
            timers,
            haptics,
            capability_table: CapabilityTable::resolve(config.capabilities),
            single_style: config.single_style,
            render_timer,
            now: Duration::ZERO,
        }
    }

    pub fn action(&mut self, action: ControlAction) {
        debug!("{action:?}");
        match action {
            ControlAction::SetBpm(bpm) => self.set_bpm(bpm),
            ControlAction::NudgeBpm(delta) => {
                let bpm = self.scheduler.state().bpm.nudged(delta);
                self.scheduler.set_bpm(bpm);
            }
            ControlAction::SetStyle(style) => self.set_style(style),
            ControlAction::CycleStyle => {
                let style = self.scheduler.state().selected_style.next_continuous();
                self.set_style(style);
            }
            ControlAction::SetSingleStyle(style) => self.set_single_style(style),
            ControlAction::SetMode(mode) => self.set_mode(mode),
            ControlAction::StartStop => self.start_stop(),
            ControlAction::StartHeartbeat => self.start_heartbeat(),
            ControlAction::Stop => self.stop(),
            ControlAction::TriggerOnce => self.trigger_once(),
        }
    }

    /// Clamped to [40, 180] and snapped to whole beats
    pub fn set_bpm(&mut self, bpm: f64) {
        if let Some(bpm) = Bpm::from_slider(bpm) {
            self.scheduler.set_bpm(bpm);
        }
    }

    pub fn set_style(&mut self, style: VibrationStyle) {
        self.scheduler.set_style(style);
    }

    pub fn set_single_style(&mut self, style: VibrationStyle) {
        self.single_style = style;
    }

    pub fn set_mode(&mut self, mode: PulseMode) {
        self.scheduler.set_mode(mode);
    }

    pub fn start_stop(&mut self) {
        if self.is_running() {
            self.stop();
        } else {
            self.start();
        }
    }

    pub fn start(&mut self) {
        self.scheduler.start(&mut self.timers, self.now);
    }

    /// Restart as a heartbeat, whatever was running before
    pub fn start_heartbeat(&mut self) {
        self.stop();
        self.scheduler.set_mode(PulseMode::Heartbeat);
        self.start();
    }

    /// Always leaves the waveform silent, even when nothing was running
    pub fn stop(&mut self) {
        self.scheduler.stop(&mut self.timers);
        self.signal.reset();
    }

    pub fn trigger_once(&mut self) {
        let tag = self.capability_table.tag(self.single_style);
        info!("single {tag}");
        self.haptics.sync(self.now);
        self.haptics.trigger(tag);
    }

    /// Run every timer due up to `now`, in order. Returns how many render
    /// frames elapsed so the caller knows whether to redraw.
    pub fn advance_to(&mut self, now: Duration) -> usize {
        let mut frames = 0;
        while let Some(expiry) = self.timers.pop_due(now) {
            self.now = expiry.due;
            trace!("{:?} at {:?}", expiry.task, expiry.due);
            match expiry.task {
                TimerTask::RenderFrame if expiry.id == self.render_timer => {
                    self.signal.frame_tick();
                    frames += 1;
                }
                TimerTask::RenderFrame => {}
                TimerTask::PulseTick => {
                    if let Some(pulse) = self.scheduler.on_tick(&mut self.timers, expiry.id, self.now) {
                        self.play(pulse);
                    }
                }
                TimerTask::TrailingPulse => {
                    let pulse = self.scheduler.on_trailing(expiry.id);
                    self.play(pulse);
                }
            }
        }
        self.now = self.now.max(now);
        frames
    }

    /// When the driver must next call `advance_to`
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_due()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.state().is_running
    }

    pub fn state(&self) -> &ScheduleState {
        self.scheduler.state()
    }

    pub fn single_style(&self) -> VibrationStyle {
        self.single_style
    }

    pub fn signal(&self) -> &SignalGenerator {
        &self.signal
    }

    pub fn frame(&self) -> WaveFrame<'_> {
        self.signal.frame()
    }

    pub fn status(&self) -> String {
        StatusLine(self.scheduler.state()).to_string()
    }

    pub fn haptics(&self) -> &H {
        &self.haptics
    }

    fn play(&mut self, pulse: Pulse) {
        let tag = self.capability_table.tag(pulse.style);
        self.haptics.sync(self.now);
        self.haptics.trigger(tag);
        self.signal.inject_spike(pulse.intensity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::haptics::RecordingHaptics;
    use crate::style::HapticTag;

    fn lab() -> PulseLab<RecordingHaptics> {
        PulseLab::new(&LabConfig::default(), RecordingHaptics::default())
    }

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn test_render_timer_runs_while_idle() {
        let mut lab = lab();
        let frames = lab.advance_to(ms(990));
        assert_eq!(frames, 60);
        assert!(lab.haptics().played.is_empty());
        assert_eq!(lab.frame().cursor, 60);
    }

    #[test]
    fn test_start_pulses_immediately() {
        let mut lab = lab();
        lab.start_stop();
        lab.advance_to(ms(0));
        assert_eq!(lab.haptics().tags(), vec![HapticTag::Medium]);
        assert!((lab.signal().buffer().peak() - 0.7).abs() < 1e-6);
        assert_eq!(lab.signal().buffer().current_index(), 11);
    }

    #[test]
    fn test_stop_silences_everything() {
        let mut lab = lab();
        lab.start();
        lab.advance_to(ms(2500));
        lab.stop();
        assert!(!lab.is_running());
        assert!(lab.signal().buffer().is_silent());
        assert_eq!(lab.signal().buffer().current_index(), 0);
        assert_eq!(lab.frame().offset, 0.0);
        lab.stop();
        assert!(lab.signal().buffer().is_silent());
    }

    #[test]
    fn test_trigger_once_leaves_schedule_alone() {
        let mut lab = lab();
        lab.set_single_style(VibrationStyle::Success);
        lab.trigger_once();
        assert_eq!(lab.haptics().tags(), vec![HapticTag::Success]);
        assert!(!lab.is_running());
        assert!(lab.signal().buffer().is_silent());
    }

    #[test]
    fn test_bpm_is_clamped_and_snapped() {
        let mut lab = lab();
        lab.action(ControlAction::SetBpm(12.0));
        assert_eq!(*lab.state().bpm, 40.0);
        lab.action(ControlAction::SetBpm(99.6));
        assert_eq!(*lab.state().bpm, 100.0);
        lab.action(ControlAction::SetBpm(f64::NAN));
        assert_eq!(*lab.state().bpm, 100.0);
        lab.action(ControlAction::NudgeBpm(100.0));
        assert_eq!(*lab.state().bpm, 180.0);
    }

    #[test]
    fn test_cycle_style() {
        let mut lab = lab();
        lab.action(ControlAction::CycleStyle);
        assert_eq!(lab.state().selected_style, VibrationStyle::Heavy);
    }

    #[test]
    fn test_heartbeat_restarts_running_schedule() {
        let mut lab = lab();
        lab.start();
        lab.advance_to(ms(400));
        lab.start_heartbeat();
        assert!(lab.is_running());
        assert_eq!(lab.state().mode, PulseMode::Heartbeat);
        assert!(lab.signal().buffer().is_silent());
        lab.advance_to(ms(550));
        assert_eq!(
            lab.haptics().played,
            vec![
                (ms(0), HapticTag::Medium),
                (ms(400), HapticTag::Medium),
                (ms(550), HapticTag::Light)
            ]
        );
    }
}
