use crate::waveform::WaveformBuffer;

/// Offset wraps back to zero once it passes this
pub const OFFSET_WRAP: f32 = 1000.0;

/// Render continuity cue, unrelated to buffer contents
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AnimationState {
    pub offset: f32,
    /// Frames advanced since the last reset
    pub cursor: u64,
}

impl AnimationState {
    pub fn advance(&mut self) {
        self.offset += 1.0;
        if self.offset > OFFSET_WRAP {
            self.offset = 0.0;
        }
        self.cursor = self.cursor.wrapping_add(1);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// What a renderer gets to see each frame
#[derive(Debug, Clone, Copy)]
pub struct WaveFrame<'a> {
    pub samples: &'a [f32],
    pub offset: f32,
    pub cursor: u64,
}

/// Decaying heartbeat waveform fed by pulses
#[derive(Debug, Clone, Default)]
pub struct SignalGenerator {
    buffer: WaveformBuffer,
    animation: AnimationState,
}

impl SignalGenerator {
    pub fn inject_spike(&mut self, intensity: f32) {
        self.buffer.inject_spike(intensity);
    }

    pub fn decay_tick(&mut self) {
        self.buffer.decay_tick();
    }

    pub fn advance_animation(&mut self) {
        self.animation.advance();
    }

    /// One render frame: move the animation on, then fade the trail
    pub fn frame_tick(&mut self) {
        self.advance_animation();
        self.decay_tick();
    }

    pub fn reset(&mut self) {
        self.buffer.reset();
        self.animation.reset();
    }

    pub fn buffer(&self) -> &WaveformBuffer {
        &self.buffer
    }

    pub fn animation(&self) -> AnimationState {
        self.animation
    }

    pub fn frame(&self) -> WaveFrame<'_> {
        WaveFrame {
            samples: self.buffer.samples(),
            offset: self.animation.offset,
            cursor: self.animation.cursor,
        }
    }
}
