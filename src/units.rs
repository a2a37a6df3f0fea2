/*
 * Copyright (c) 2020. Beautiful Code BV, Rotterdam, Netherlands
 * Licensed under GNU GENERAL PUBLIC LICENSE Version 3.
 */

//! Timing units for pulse scheduling
//!
//! This module provides type-safe wrappers for the rates and durations
//! the lab works with, so a beat rate can never be mistaken for a period.

use std::ops::Deref;
use std::time::Duration;

/// Beat rate in beats per minute, always within [`Bpm::MIN`, `Bpm::MAX`]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Bpm(f64);

/// Time in seconds
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Seconds(pub f64);

/// Frequency in cycles per second
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Hertz(pub f64);

/// Render timer rate
pub const FRAME_RATE: Hertz = Hertz(60.0);

/// Delay between the primary and the trailing pulse of a heartbeat
pub const HEARTBEAT_OFFSET: Seconds = Seconds(0.15);

impl Deref for Bpm {
    type Target = f64;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Deref for Seconds {
    type Target = f64;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Deref for Hertz {
    type Target = f64;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Bpm {
    pub const MIN: f64 = 40.0;
    pub const MAX: f64 = 180.0;

    /// Clamp any finite value into the allowed range
    pub fn clamped(bpm: f64) -> Self {
        Self(bpm.clamp(Self::MIN, Self::MAX))
    }

    /// Clamp and snap to whole beats, the way the slider delivers values.
    /// Non-finite input yields `None`.
    pub fn from_slider(bpm: f64) -> Option<Self> {
        bpm.is_finite().then(|| Self::clamped(bpm.round()))
    }

    /// Seconds between beats: 60 / bpm
    pub fn interval(self) -> Seconds {
        Seconds(60.0 / self.0)
    }

    pub fn nudged(self, delta: f64) -> Self {
        Self::clamped((self.0 + delta).round())
    }
}

impl Default for Bpm {
    fn default() -> Self {
        Self(60.0)
    }
}

impl Seconds {
    /// Rounded to the nearest nanosecond
    pub fn to_duration(self) -> Duration {
        Duration::from_nanos((self.0.max(0.0) * 1e9).round() as u64)
    }

    pub fn from_duration(duration: Duration) -> Self {
        Self(duration.as_secs_f64())
    }

    /// Convert seconds to milliseconds
    pub fn to_millis(self) -> f64 {
        self.0 * 1000.0
    }
}

impl Hertz {
    /// One cycle of this frequency
    pub fn period(self) -> Seconds {
        Seconds(1.0 / self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_matches_bpm_across_range() {
        for whole in 40..=180 {
            let bpm = Bpm::clamped(whole as f64);
            let expected = 60.0 / whole as f64;
            assert!((*bpm.interval() - expected).abs() < 1e-9, "bpm {whole}");
        }
    }

    #[test]
    fn test_interval_scenarios() {
        assert_eq!(*Bpm::clamped(60.0).interval(), 1.0);
        assert_eq!(*Bpm::clamped(120.0).interval(), 0.5);
        assert_eq!(*Bpm::clamped(40.0).interval(), 1.5);
        assert!((*Bpm::clamped(180.0).interval() - 0.333_333_333).abs() < 1e-9);
    }

    #[test]
    fn test_clamping() {
        assert_eq!(*Bpm::clamped(10.0), 40.0);
        assert_eq!(*Bpm::clamped(500.0), 180.0);
        assert_eq!(*Bpm::clamped(0.0), 40.0);
        assert_eq!(*Bpm::from_slider(72.4).unwrap(), 72.0);
        assert_eq!(*Bpm::from_slider(-3.0).unwrap(), 40.0);
        assert!(Bpm::from_slider(f64::NAN).is_none());
        assert!(Bpm::from_slider(f64::INFINITY).is_none());
    }

    #[test]
    fn test_nudge_stays_in_range() {
        assert_eq!(*Bpm::clamped(179.0).nudged(10.0), 180.0);
        assert_eq!(*Bpm::clamped(41.0).nudged(-10.0), 40.0);
        assert_eq!(*Bpm::default().nudged(1.0), 61.0);
    }

    #[test]
    fn test_frame_period() {
        assert!((*FRAME_RATE.period() - 1.0 / 60.0).abs() < 1e-12);
        assert!((HEARTBEAT_OFFSET.to_millis() - 150.0).abs() < 1e-9);
        assert_eq!(HEARTBEAT_OFFSET.to_duration(), Duration::from_millis(150));
        assert_eq!(FRAME_RATE.period().to_duration(), Duration::from_nanos(16_666_667));
    }
}
