use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use winit::keyboard::KeyCode;

use stride_core::Action;

/// Semantic actions mapped from physical keys via bindings.yaml.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InputBindings {
    #[serde(default)]
    pub actions: HashMap<Action, Vec<String>>,
}

impl Default for InputBindings {
    fn default() -> Self {
        let mut actions = HashMap::new();
        actions.insert(Action::Forward, vec!["W".into()]);
        actions.insert(Action::Backward, vec!["S".into()]);
        actions.insert(Action::Left, vec!["A".into()]);
        actions.insert(Action::Right, vec!["D".into()]);
        actions.insert(Action::Shift, vec!["ShiftLeft".into()]);
        actions.insert(Action::Space, vec!["Space".into()]);
        actions.insert(Action::ToggleCamera, vec!["Digit2".into()]);
        actions.insert(Action::CameraClose, vec!["Digit1".into()]);
        actions.insert(Action::CameraFar, vec!["Digit3".into()]);
        actions.insert(Action::FreeForward, vec!["I".into()]);
        actions.insert(Action::FreeBackward, vec!["K".into()]);
        actions.insert(Action::FreeLeft, vec!["J".into()]);
        actions.insert(Action::FreeRight, vec!["L".into()]);
        actions.insert(Action::FreePitchUp, vec!["ArrowUp".into()]);
        actions.insert(Action::FreePitchDown, vec!["ArrowDown".into()]);
        actions.insert(Action::FreeYawLeft, vec!["ArrowLeft".into()]);
        actions.insert(Action::FreeYawRight, vec!["ArrowRight".into()]);
        actions.insert(Action::FreeRollLeft, vec!["Comma".into()]);
        actions.insert(Action::FreeRollRight, vec!["Period".into()]);
        Self { actions }
    }
}

impl InputBindings {
    /// Reverse lookup used when translating window events. Unknown key
    /// names are dropped with a warning.
    pub fn key_map(&self) -> HashMap<KeyCode, Action> {
        let mut map = HashMap::new();
        for (&action, keys) in &self.actions {
            for name in keys {
                match key_name_to_code(name) {
                    Some(code) => {
                        if let Some(prev) = map.insert(code, action) {
                            if prev != action {
                                tracing::warn!(
                                    "Key '{}' bound to both {:?} and {:?}; keeping {:?}",
                                    name,
                                    prev,
                                    action,
                                    action
                                );
                            }
                        }
                    }
                    None => tracing::warn!("Unknown key name '{}' in bindings", name),
                }
            }
        }
        map
    }
}

/// Load input bindings from a YAML file, with defaults as fallback.
pub fn load_bindings(path: &Path) -> InputBindings {
    if path.exists() {
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_yaml::from_str(&contents) {
                Ok(bindings) => {
                    tracing::info!("Loaded input bindings from {:?}", path);
                    return bindings;
                }
                Err(e) => tracing::warn!("Failed to parse {:?}: {}", path, e),
            },
            Err(e) => tracing::warn!("Failed to read {:?}: {}", path, e),
        }
    }
    tracing::info!("Using default input bindings");
    InputBindings::default()
}

/// Maps key name strings to winit KeyCode.
fn key_name_to_code(name: &str) -> Option<KeyCode> {
    match name {
        "A" => Some(KeyCode::KeyA),
        "B" => Some(KeyCode::KeyB),
        "C" => Some(KeyCode::KeyC),
        "D" => Some(KeyCode::KeyD),
        "E" => Some(KeyCode::KeyE),
        "F" => Some(KeyCode::KeyF),
        "G" => Some(KeyCode::KeyG),
        "H" => Some(KeyCode::KeyH),
        "I" => Some(KeyCode::KeyI),
        "J" => Some(KeyCode::KeyJ),
        "K" => Some(KeyCode::KeyK),
        "L" => Some(KeyCode::KeyL),
        "M" => Some(KeyCode::KeyM),
        "N" => Some(KeyCode::KeyN),
        "O" => Some(KeyCode::KeyO),
        "P" => Some(KeyCode::KeyP),
        "Q" => Some(KeyCode::KeyQ),
        "R" => Some(KeyCode::KeyR),
        "S" => Some(KeyCode::KeyS),
        "T" => Some(KeyCode::KeyT),
        "U" => Some(KeyCode::KeyU),
        "V" => Some(KeyCode::KeyV),
        "W" => Some(KeyCode::KeyW),
        "X" => Some(KeyCode::KeyX),
        "Y" => Some(KeyCode::KeyY),
        "Z" => Some(KeyCode::KeyZ),
        "Digit0" | "0" => Some(KeyCode::Digit0),
        "Digit1" | "1" => Some(KeyCode::Digit1),
        "Digit2" | "2" => Some(KeyCode::Digit2),
        "Digit3" | "3" => Some(KeyCode::Digit3),
        "Space" => Some(KeyCode::Space),
        "ShiftLeft" => Some(KeyCode::ShiftLeft),
        "ShiftRight" => Some(KeyCode::ShiftRight),
        "ControlLeft" => Some(KeyCode::ControlLeft),
        "ControlRight" => Some(KeyCode::ControlRight),
        "Escape" => Some(KeyCode::Escape),
        "Enter" => Some(KeyCode::Enter),
        "Tab" => Some(KeyCode::Tab),
        "ArrowUp" => Some(KeyCode::ArrowUp),
        "ArrowDown" => Some(KeyCode::ArrowDown),
        "ArrowLeft" => Some(KeyCode::ArrowLeft),
        "ArrowRight" => Some(KeyCode::ArrowRight),
        "Comma" | "," => Some(KeyCode::Comma),
        "Period" | "." => Some(KeyCode::Period),
        _ => None,
    }
}
