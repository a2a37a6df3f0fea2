use std::path::PathBuf;

use clap::Parser;
use env_logger::Env;
use winit::event_loop::EventLoop;

use pulse_lab::application::Application;
use pulse_lab::config::LabConfig;
use pulse_lab::error::LabError;
use pulse_lab::headless::{format_timeline, HeadlessPlan, HeadlessRun};
use pulse_lab::style::{PulseMode, VibrationStyle};
use pulse_lab::units::Seconds;
use pulse_lab::LabEvent;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Beats per minute, clamped to 40..=180
    #[arg(long)]
    bpm: Option<f64>,

    /// Style of the repeating pulse
    #[arg(long)]
    style: Option<VibrationStyle>,

    /// Style of the single pulse
    #[arg(long)]
    single_style: Option<VibrationStyle>,

    /// continuous or heartbeat
    #[arg(long)]
    mode: Option<PulseMode>,

    /// Let a pending trailing heartbeat pulse fire after stop
    #[arg(long)]
    legacy_trailing_pulse: bool,

    /// Run without a window for this many seconds and print the haptics
    #[arg(long)]
    headless: Option<f64>,

    /// With --headless, stop the schedule at this time
    #[arg(long)]
    stop_at: Option<f64>,

    /// Draw the waveform in the terminal
    #[arg(long)]
    scope: bool,

    /// Print the effective configuration and exit
    #[arg(long)]
    dump_config: bool,

    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn lab_config(&self) -> Result<LabConfig, LabError> {
        let mut config = match &self.config {
            Some(path) => LabConfig::load(path)?,
            None => LabConfig::default(),
        };
        if let Some(bpm) = self.bpm {
            config.bpm = bpm;
        }
        if let Some(style) = self.style {
            config.continuous_style = style;
        }
        if let Some(style) = self.single_style {
            config.single_style = style;
        }
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if self.legacy_trailing_pulse {
            config.cancel_trailing_pulse = false;
        }
        config.validate()
    }
}

fn main() -> Result<(), LabError> {
    let args = Args::parse();
    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    let config = args.lab_config()?;
    if args.dump_config {
        println!("{}", config.to_json()?);
        return Ok(());
    }

    if let Some(seconds) = args.headless {
        if !seconds.is_finite() || seconds < 0.0 {
            return Err(LabError::InvalidSetting(format!("headless {seconds}")));
        }
        let plan = HeadlessPlan {
            duration: Seconds(seconds),
            stop_at: args.stop_at.map(Seconds),
        };
        let played = HeadlessRun::new(&config, args.scope).run(plan, |time, lines| {
            println!("{:.3}s\n{}", time.as_secs_f64(), lines.join("\n"));
        });
        for line in format_timeline(&played) {
            println!("{line}");
        }
        return Ok(());
    }

    let event_loop = EventLoop::<LabEvent>::with_user_event().build()?;
    let radio = event_loop.create_proxy();
    let mut app = Application::new(&config, radio, args.scope);
    event_loop.run_app(&mut app)?;
    Ok(())
}
