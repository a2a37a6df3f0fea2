/// Number of amplitude samples on screen
pub const SAMPLE_COUNT: usize = 200;

/// Samples covered by one spike
pub const SPIKE_WIDTH: usize = 8;

/// Empty samples left after each spike before the next may start
pub const SPIKE_GAP: usize = 3;

/// Multiplier applied to every live sample each frame
pub const DECAY: f32 = 0.98;

/// Samples that decay below this snap to zero
pub const SNAP_TO_ZERO: f32 = 0.02;

/// Circular buffer of pulse amplitudes, each in [0, 1].
///
/// Spikes are written at the cursor and the cursor moves on by
/// `SPIKE_WIDTH + SPIKE_GAP`. A spike that would run past the end of the
/// buffer is cut off there rather than wrapped to the front.
#[derive(Debug, Clone)]
pub struct WaveformBuffer {
    samples: [f32; SAMPLE_COUNT],
    current_index: usize,
}

impl Default for WaveformBuffer {
    fn default() -> Self {
        Self {
            samples: [0.0; SAMPLE_COUNT],
            current_index: 0,
        }
    }
}

impl WaveformBuffer {
    /// Gaussian bump `intensity * exp(-d²/4)` where d is the distance from
    /// the peak at `current_index + SPIKE_WIDTH / 2`. Overlaps keep the max.
    pub fn inject_spike(&mut self, intensity: f32) {
        let intensity = intensity.clamp(0.0, 1.0);
        let peak = SPIKE_WIDTH / 2;
        for offset in 0..SPIKE_WIDTH {
            let Some(sample) = self.samples.get_mut(self.current_index + offset) else {
                break;
            };
            let distance = offset.abs_diff(peak) as f32;
            let amplitude = intensity * (-(distance * distance) / 4.0).exp();
            *sample = sample.max(amplitude);
        }
        self.current_index = (self.current_index + SPIKE_WIDTH + SPIKE_GAP) % SAMPLE_COUNT;
    }

    pub fn decay_tick(&mut self) {
        for sample in self.samples.iter_mut().filter(|sample| **sample > 0.0) {
            *sample *= DECAY;
            if *sample < SNAP_TO_ZERO {
                *sample = 0.0;
            }
        }
    }

    pub fn reset(&mut self) {
        self.samples = [0.0; SAMPLE_COUNT];
        self.current_index = 0;
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn is_silent(&self) -> bool {
        self.samples.iter().all(|sample| *sample == 0.0)
    }

    pub fn peak(&self) -> f32 {
        self.samples.iter().copied().fold(0.0, f32::max)
    }
}
