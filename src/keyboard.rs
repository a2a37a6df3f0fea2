use std::fmt::Display;

use strum::IntoEnumIterator;
use winit::event::KeyEvent;
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};

use crate::scheduler::ScheduleState;
use crate::style::VibrationStyle;
use crate::{ControlAction, LabEvent, Radio};

const STYLE_KEYS: [KeyCode; 8] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
    KeyCode::Digit6,
    KeyCode::Digit7,
    KeyCode::Digit8,
];

struct KeyAction {
    code: KeyCode,
    shift: bool,
    description: String,
    lab_event: LabEvent,
    radio: Radio,
    is_active_in: Box<dyn Fn(&ScheduleState) -> bool>,
}

impl KeyAction {
    pub fn execute(&self) {
        self.lab_event.clone().send(&self.radio);
    }
}

impl Display for KeyAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description)
    }
}

pub struct Keyboard {
    radio: Radio,
    actions: Vec<KeyAction>,
    modifiers: ModifiersState,
}

impl Keyboard {
    pub fn new(radio: Radio) -> Self {
        Self {
            radio,
            actions: Default::default(),
            modifiers: ModifiersState::empty(),
        }
    }

    pub fn with_actions(mut self) -> Self {
        self.add_action(
            KeyCode::Space,
            false,
            "Space to stop",
            LabEvent::Control(ControlAction::StartStop),
            Box::new(|state: &ScheduleState| state.is_running),
        );
        self.add_action(
            KeyCode::Space,
            false,
            "Space to start",
            LabEvent::Control(ControlAction::StartStop),
            Box::new(|state: &ScheduleState| !state.is_running),
        );
        self.add_action(
            KeyCode::KeyH,
            false,
            "H heartbeat",
            LabEvent::Control(ControlAction::StartHeartbeat),
            Box::new(|_| true),
        );
        self.add_action(
            KeyCode::ArrowUp,
            false,
            "\u{2191} faster",
            LabEvent::Control(ControlAction::NudgeBpm(1.0)),
            Box::new(|_| true),
        );
        self.add_action(
            KeyCode::ArrowDown,
            false,
            "\u{2193} slower",
            LabEvent::Control(ControlAction::NudgeBpm(-1.0)),
            Box::new(|_| true),
        );
        self.add_action(
            KeyCode::ArrowUp,
            true,
            "Shift \u{2191} +10",
            LabEvent::Control(ControlAction::NudgeBpm(10.0)),
            Box::new(|_| true),
        );
        self.add_action(
            KeyCode::ArrowDown,
            true,
            "Shift \u{2193} -10",
            LabEvent::Control(ControlAction::NudgeBpm(-10.0)),
            Box::new(|_| true),
        );
        self.add_action(
            KeyCode::Tab,
            false,
            "Tab pulse style",
            LabEvent::Control(ControlAction::CycleStyle),
            Box::new(|_| true),
        );
        for (index, (code, style)) in STYLE_KEYS.into_iter().zip(VibrationStyle::iter()).enumerate() {
            self.add_action(
                code,
                false,
                &format!("{} {style}", index + 1),
                LabEvent::Control(ControlAction::SetSingleStyle(style)),
                Box::new(|_| true),
            );
        }
        self.add_action(
            KeyCode::Enter,
            false,
            "Enter single pulse",
            LabEvent::Control(ControlAction::TriggerOnce),
            Box::new(|_| true),
        );
        self.add_action(
            KeyCode::Escape,
            false,
            "ESC to quit",
            LabEvent::Quit,
            Box::new(|_| true),
        );
        self
    }

    pub fn set_modifiers(&mut self, modifiers: ModifiersState) {
        self.modifiers = modifiers;
    }

    pub fn handle_key_event(&mut self, key_event: KeyEvent, state: &ScheduleState) {
        if key_event.state.is_pressed() && !key_event.repeat {
            if let KeyEvent {
                physical_key: PhysicalKey::Code(code),
                ..
            } = key_event
            {
                let shift = self.modifiers.shift_key();
                self.actions
                    .iter()
                    .filter(|action| {
                        action.code == code && action.shift == shift && (action.is_active_in)(state)
                    })
                    .for_each(|action| action.execute());
            }
        }
    }

    pub fn legend(&self, state: &ScheduleState) -> Vec<String> {
        self.actions
            .iter()
            .filter(|action| (action.is_active_in)(state))
            .map(|action| action.to_string())
            .collect()
    }

    fn add_action(
        &mut self,
        code: KeyCode,
        shift: bool,
        description: &str,
        lab_event: LabEvent,
        is_active_in: Box<dyn Fn(&ScheduleState) -> bool>,
    ) {
        self.actions.push(KeyAction {
            code,
            shift,
            description: description.into(),
            lab_event,
            radio: self.radio.clone(),
            is_active_in,
        });
    }
}
