use crate::config::ScopeConfig;
use crate::signal::WaveFrame;

/// Pulls a frame snapshot after each render tick
pub trait Renderer {
    fn draw(&mut self, frame: &WaveFrame);
}

const BAR: char = '█';
const BASELINE: char = '─';

/// Text oscilloscope for terminals
pub struct AsciiScope {
    config: ScopeConfig,
    lines: Vec<String>,
    fresh: bool,
}

impl AsciiScope {
    pub fn new(config: ScopeConfig) -> Self {
        Self {
            config,
            lines: Vec::new(),
            fresh: false,
        }
    }

    /// Lines drawn since the last call, if any
    pub fn take_lines(&mut self) -> Option<&[String]> {
        if !self.fresh {
            return None;
        }
        self.fresh = false;
        Some(&self.lines)
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Loudest sample under each column, as a bar height in rows
    fn levels(&self, samples: &[f32]) -> Vec<usize> {
        let columns = self.config.columns;
        let rows = self.config.rows;
        if samples.is_empty() {
            return vec![0; columns];
        }
        (0..columns)
            .map(|column| {
                let start = (column * samples.len() / columns).min(samples.len() - 1);
                let end = ((column + 1) * samples.len() / columns).clamp(start + 1, samples.len());
                let loudest = samples[start..end].iter().copied().fold(0.0, f32::max);
                ((loudest * rows as f32).round() as usize).min(rows)
            })
            .collect()
    }
}

impl Renderer for AsciiScope {
    fn draw(&mut self, frame: &WaveFrame) {
        if frame.cursor % self.config.every_frames != 0 {
            return;
        }
        let levels = self.levels(frame.samples);
        self.lines = (1..=self.config.rows)
            .rev()
            .map(|row| {
                levels
                    .iter()
                    .map(|level| if *level >= row { BAR } else { ' ' })
                    .collect::<String>()
                    .trim_end()
                    .to_string()
            })
            .collect();
        self.lines.push(BASELINE.to_string().repeat(levels.len()));
        self.fresh = true;
    }
}
