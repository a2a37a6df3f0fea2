use std::time::{Duration, Instant};

use log::{error, info};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::config::LabConfig;
use crate::haptics::LogHaptics;
use crate::keyboard::Keyboard;
use crate::pulse_lab::PulseLab;
use crate::scope::{AsciiScope, Renderer};
use crate::{LabEvent, Radio};

/// Windowed driver. The window is the keyboard surface and shows the
/// status in its title; the waveform goes to the terminal scope.
pub struct Application {
    window_attributes: WindowAttributes,
    window: Option<Window>,
    lab: PulseLab<LogHaptics>,
    keyboard: Keyboard,
    scope: Option<AsciiScope>,
    started: Instant,
    title: String,
}

impl Application {
    pub fn new(config: &LabConfig, radio: Radio, with_scope: bool) -> Self {
        let window_attributes = Window::default_attributes()
            .with_title("Pulse Lab")
            .with_inner_size(LogicalSize::new(640.0, 200.0));
        Self {
            window_attributes,
            window: None,
            lab: PulseLab::new(config, LogHaptics::default()),
            keyboard: Keyboard::new(radio).with_actions(),
            scope: with_scope.then(|| AsciiScope::new(config.scope.clone())),
            started: Instant::now(),
            title: String::new(),
        }
    }

    fn lab_time(&self) -> Duration {
        self.started.elapsed()
    }

    /// Catch the lab up with the wall clock and redraw what changed
    fn pump(&mut self) {
        let frames = self.lab.advance_to(self.lab_time());
        if frames > 0 {
            if let Some(scope) = &mut self.scope {
                scope.draw(&self.lab.frame());
                if let Some(lines) = scope.take_lines() {
                    println!("\x1b[2J\x1b[H{}", lines.join("\n"));
                }
            }
        }
        self.refresh_title();
    }

    fn refresh_title(&mut self) {
        let title = format!("Pulse Lab  {}", self.lab.status());
        if title != self.title {
            if let Some(window) = &self.window {
                window.set_title(&title);
            }
            self.title = title;
        }
    }

    fn print_legend(&self) {
        info!("{}", self.keyboard.legend(self.lab.state()).join(" | "));
    }
}

impl ApplicationHandler<LabEvent> for Application {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        match event_loop.create_window(self.window_attributes.clone()) {
            Ok(window) => {
                self.window = Some(window);
                self.title.clear();
                self.refresh_title();
                self.print_legend();
            }
            Err(os_error) => {
                error!("unable to open window: {os_error}");
                event_loop.exit();
            }
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: LabEvent) {
        match event {
            LabEvent::Control(action) => {
                self.lab.advance_to(self.lab_time());
                self.lab.action(action);
                self.refresh_title();
            }
            LabEvent::Quit => event_loop.exit(),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::ModifiersChanged(modifiers) => self.keyboard.set_modifiers(modifiers.state()),
            WindowEvent::KeyboardInput { event: key_event, .. } => {
                self.keyboard.handle_key_event(key_event, self.lab.state())
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        self.pump();
        match self.lab.next_deadline() {
            Some(deadline) => event_loop.set_control_flow(ControlFlow::WaitUntil(self.started + deadline)),
            None => event_loop.set_control_flow(ControlFlow::Wait),
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.lab.stop();
        info!("{} haptics played", self.lab.haptics().count);
    }
}
