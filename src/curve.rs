//! Renderer-side geometry for the heartbeat trace.
//!
//! Samples run left to right across the display, each lifted above a
//! centre baseline in proportion to its amplitude. Consecutive samples are
//! joined by cubic segments whose control points sit level with the
//! sample, which rounds off the spikes without overshooting them.

use glam::Vec2;

/// Space kept free above the tallest spike
pub const HEADROOM: f32 = 10.0;

/// Horizontal reach of each control point, as a fraction of the sample step
pub const CONTROL_REACH: f32 = 0.3;

pub const HORIZONTAL_GRID_LINES: usize = 5;
pub const VERTICAL_GRID_LINES: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Vec2),
    CurveTo { to: Vec2, control1: Vec2, control2: Vec2 },
    LineTo(Vec2),
}

impl PathCommand {
    pub fn end(&self) -> Vec2 {
        match self {
            PathCommand::MoveTo(point) | PathCommand::LineTo(point) => *point,
            PathCommand::CurveTo { to, .. } => *to,
        }
    }
}

/// Screen y grows downwards, so amplitude lifts the point towards zero
fn lift(sample: f32, centre: f32, scale: f32) -> f32 {
    centre - sample * scale
}

pub fn trace(samples: &[f32], width: f32, height: f32) -> Vec<PathCommand> {
    let centre = height / 2.0;
    if samples.len() < 2 {
        return vec![
            PathCommand::MoveTo(Vec2::new(0.0, centre)),
            PathCommand::LineTo(Vec2::new(width, centre)),
        ];
    }
    let scale = (height / 2.0 - HEADROOM).max(0.0);
    let step = width / (samples.len() - 1) as f32;
    let last = samples.len() - 1;
    let mut path = Vec::with_capacity(samples.len());
    path.push(PathCommand::MoveTo(Vec2::new(0.0, lift(samples[0], centre, scale))));
    for (index, sample) in samples.iter().enumerate().skip(1) {
        let to = Vec2::new(index as f32 * step, lift(*sample, centre, scale));
        if index < last {
            let reach = Vec2::new(step * CONTROL_REACH, 0.0);
            path.push(PathCommand::CurveTo {
                to,
                control1: to - reach,
                control2: to + reach,
            });
        } else {
            path.push(PathCommand::LineTo(to));
        }
    }
    path
}

/// Positions of the background grid lines
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub horizontal: Vec<f32>,
    pub vertical: Vec<f32>,
}

pub fn grid(width: f32, height: f32) -> Grid {
    let spaced = |count: usize, extent: f32| -> Vec<f32> {
        (0..count)
            .map(|index| index as f32 * extent / count as f32)
            .collect()
    };
    Grid {
        horizontal: spaced(HORIZONTAL_GRID_LINES, height),
        vertical: spaced(VERTICAL_GRID_LINES, width),
    }
}
