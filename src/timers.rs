use std::time::Duration;

use log::trace;

/// Handle for cancelling a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

/// What a timer does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTask {
    PulseTick,
    TrailingPulse,
    RenderFrame,
}

#[derive(Debug, Clone)]
struct Pending {
    id: TimerId,
    due: Duration,
    period: Option<Duration>,
    task: TimerTask,
}

/// A fired timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expiry {
    pub id: TimerId,
    pub task: TimerTask,
    pub due: Duration,
}

/// Single-threaded timer queue on the lab clock.
///
/// Times are offsets from the lab's start. Repeating timers are rescheduled
/// from their own due time, never from when they were serviced, so late
/// servicing does not stretch the period. Timers due at the same instant
/// fire in the order they were scheduled.
#[derive(Debug, Default)]
pub struct Timers {
    next_id: u64,
    pending: Vec<Pending>,
}

impl Timers {
    /// Repeat `task` every `period`, first firing at `first`
    pub fn every(&mut self, first: Duration, period: Duration, task: TimerTask) -> TimerId {
        self.push(first, Some(period.max(Duration::from_nanos(1))), task)
    }

    /// Fire `task` once after `delay`
    pub fn after(&mut self, now: Duration, delay: Duration, task: TimerTask) -> TimerId {
        self.push(now + delay, None, task)
    }

    /// Returns false if the timer had already fired for the last time or was cancelled
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|pending| pending.id != id);
        before != self.pending.len()
    }

    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.pending.iter().any(|pending| pending.id == id)
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.pending.iter().map(|pending| pending.due).min()
    }

    /// Take the earliest timer due at or before `now`
    pub fn pop_due(&mut self, now: Duration) -> Option<Expiry> {
        let index = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, pending)| pending.due <= now)
            .min_by_key(|(_, pending)| (pending.due, pending.id.0))
            .map(|(index, _)| index)?;
        let fired = match self.pending[index].period {
            Some(period) => {
                let pending = &mut self.pending[index];
                let fired = pending.clone();
                pending.due += period;
                fired
            }
            None => self.pending.swap_remove(index),
        };
        trace!("{:?} fired at {:?}", fired.task, fired.due);
        Some(Expiry {
            id: fired.id,
            task: fired.task,
            due: fired.due,
        })
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    fn push(&mut self, due: Duration, period: Option<Duration>, task: TimerTask) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push(Pending {
            id,
            due,
            period,
            task,
        });
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn drain(timers: &mut Timers, now: Duration) -> Vec<(TimerTask, Duration)> {
        std::iter::from_fn(|| timers.pop_due(now))
            .map(|expiry| (expiry.task, expiry.due))
            .collect()
    }

    #[test]
    fn test_repeating_keeps_its_own_phase() {
        let mut timers = Timers::default();
        timers.every(ms(0), ms(500), TimerTask::PulseTick);
        let fired = drain(&mut timers, ms(1700));
        assert_eq!(
            fired,
            vec![
                (TimerTask::PulseTick, ms(0)),
                (TimerTask::PulseTick, ms(500)),
                (TimerTask::PulseTick, ms(1000)),
                (TimerTask::PulseTick, ms(1500)),
            ]
        );
        assert_eq!(timers.next_due(), Some(ms(2000)));
    }

    #[test]
    fn test_one_shot_fires_once() {
        let mut timers = Timers::default();
        let id = timers.after(ms(100), ms(150), TimerTask::TrailingPulse);
        assert!(drain(&mut timers, ms(249)).is_empty());
        assert_eq!(drain(&mut timers, ms(250)), vec![(TimerTask::TrailingPulse, ms(250))]);
        assert!(!timers.is_scheduled(id));
        assert!(timers.is_empty());
    }

    #[test]
    fn test_cancel() {
        let mut timers = Timers::default();
        let tick = timers.every(ms(0), ms(10), TimerTask::RenderFrame);
        assert!(timers.cancel(tick));
        assert!(!timers.cancel(tick));
        assert!(drain(&mut timers, ms(100)).is_empty());
        assert_eq!(timers.next_due(), None);
    }

    #[test]
    fn test_interleaving_is_chronological() {
        let mut timers = Timers::default();
        timers.every(ms(0), ms(1000), TimerTask::PulseTick);
        timers.after(ms(0), ms(150), TimerTask::TrailingPulse);
        timers.every(ms(100), ms(100), TimerTask::RenderFrame);
        let fired = drain(&mut timers, ms(300));
        assert_eq!(
            fired,
            vec![
                (TimerTask::PulseTick, ms(0)),
                (TimerTask::RenderFrame, ms(100)),
                (TimerTask::TrailingPulse, ms(150)),
                (TimerTask::RenderFrame, ms(200)),
                (TimerTask::RenderFrame, ms(300)),
            ]
        );
        assert_eq!(timers.len(), 2);
    }

    #[test]
    fn test_ties_fire_in_schedule_order() {
        let mut timers = Timers::default();
        timers.after(ms(0), ms(50), TimerTask::TrailingPulse);
        timers.every(ms(50), ms(50), TimerTask::PulseTick);
        let fired = drain(&mut timers, ms(50));
        assert_eq!(
            fired,
            vec![(TimerTask::TrailingPulse, ms(50)), (TimerTask::PulseTick, ms(50))]
        );
    }
}
