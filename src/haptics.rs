use std::time::Duration;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use strum::{EnumCount, IntoEnumIterator};

use crate::style::{HapticTag, VibrationStyle};

/// Anything that can play a haptic. Fire and forget.
pub trait HapticEngine {
    fn trigger(&mut self, tag: HapticTag);

    /// Lab time the following triggers happen at
    fn sync(&mut self, _now: Duration) {}
}

impl<E: HapticEngine + ?Sized> HapticEngine for Box<E> {
    fn trigger(&mut self, tag: HapticTag) {
        (**self).trigger(tag)
    }

    fn sync(&mut self, now: Duration) {
        (**self).sync(now)
    }
}

/// Which of the optional impact styles the platform offers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Capabilities {
    pub rigid: bool,
    pub soft: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            rigid: true,
            soft: true,
        }
    }
}

/// Style to concrete haptic, negotiated once against the platform
#[derive(Debug, Clone)]
pub struct CapabilityTable {
    tags: [HapticTag; VibrationStyle::COUNT],
}

impl CapabilityTable {
    pub fn resolve(capabilities: Capabilities) -> Self {
        let mut tags = [HapticTag::Medium; VibrationStyle::COUNT];
        for (slot, style) in tags.iter_mut().zip(VibrationStyle::iter()) {
            *slot = match style.tag() {
                HapticTag::Rigid if !capabilities.rigid => {
                    warn!("rigid haptic unavailable, substituting heavy");
                    HapticTag::Heavy
                }
                HapticTag::Soft if !capabilities.soft => {
                    warn!("soft haptic unavailable, substituting light");
                    HapticTag::Light
                }
                tag => tag,
            };
        }
        Self { tags }
    }

    pub fn tag(&self, style: VibrationStyle) -> HapticTag {
        self.tags[style as usize]
    }
}

impl Default for CapabilityTable {
    fn default() -> Self {
        Self::resolve(Capabilities::default())
    }
}

/// Writes each haptic to the log, for desktops without an actuator
#[derive(Debug, Default)]
pub struct LogHaptics {
    pub count: usize,
}

impl HapticEngine for LogHaptics {
    fn trigger(&mut self, tag: HapticTag) {
        self.count += 1;
        info!("haptic #{} {tag}", self.count);
    }
}

/// Keeps every haptic with the lab time it was played at
#[derive(Debug, Default, Clone)]
pub struct RecordingHaptics {
    now: Duration,
    pub played: Vec<(Duration, HapticTag)>,
}

impl RecordingHaptics {
    pub fn tags(&self) -> Vec<HapticTag> {
        self.played.iter().map(|(_, tag)| *tag).collect()
    }
}

impl HapticEngine for RecordingHaptics {
    fn trigger(&mut self, tag: HapticTag) {
        debug!("recorded {tag} at {:?}", self.now);
        self.played.push((self.now, tag));
    }

    fn sync(&mut self, now: Duration) {
        self.now = now;
    }
}
