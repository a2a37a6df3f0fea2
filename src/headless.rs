use std::time::Duration;

use log::info;

use crate::config::LabConfig;
use crate::haptics::RecordingHaptics;
use crate::pulse_lab::PulseLab;
use crate::scope::{AsciiScope, Renderer};
use crate::style::HapticTag;
use crate::units::Seconds;
use crate::ControlAction;

/// A scripted run against a simulated clock
#[derive(Debug, Clone, Copy)]
pub struct HeadlessPlan {
    pub duration: Seconds,
    /// Stop the schedule early, keeping the clock running to the end
    pub stop_at: Option<Seconds>,
}

pub struct HeadlessRun {
    lab: PulseLab<RecordingHaptics>,
    scope: Option<AsciiScope>,
}

impl HeadlessRun {
    pub fn new(config: &LabConfig, with_scope: bool) -> Self {
        Self {
            lab: PulseLab::new(config, RecordingHaptics::default()),
            scope: with_scope.then(|| AsciiScope::new(config.scope.clone())),
        }
    }

    /// Start in the configured mode at time zero and run the clock out.
    /// `on_scope` sees each scope redraw.
    pub fn run(
        mut self,
        plan: HeadlessPlan,
        mut on_scope: impl FnMut(Duration, &[String]),
    ) -> Vec<(Duration, HapticTag)> {
        let end = plan.duration.to_duration();
        let mut stop_at = plan.stop_at.map(Seconds::to_duration);
        self.lab.action(ControlAction::StartStop);
        info!("headless {} for {:.2}s", self.lab.status(), *plan.duration);
        while let Some(deadline) = self.lab.next_deadline() {
            if let Some(stop) = stop_at.filter(|stop| *stop <= deadline) {
                self.lab.advance_to(stop);
                self.lab.action(ControlAction::Stop);
                stop_at = None;
                continue;
            }
            if deadline > end {
                break;
            }
            let frames = self.lab.advance_to(deadline);
            if let (true, Some(scope)) = (frames > 0, self.scope.as_mut()) {
                scope.draw(&self.lab.frame());
                if let Some(lines) = scope.take_lines() {
                    on_scope(deadline, lines);
                }
            }
        }
        self.lab.advance_to(end);
        self.lab.haptics().played.clone()
    }
}

pub fn format_timeline(played: &[(Duration, HapticTag)]) -> Vec<String> {
    played
        .iter()
        .map(|(time, tag)| format!("{:>8.3}s {tag}", time.as_secs_f64()))
        .collect()
}
