//! Input layer: hardware keys become `CompanionInput` actions.
//!
//! One `PreUpdate` system rewrites the resource every frame; screens read
//! actions, never key codes. `InputContext::TextEntry` (the import field)
//! routes printable characters into `CompanionInput::text` and disables the
//! action keys so typing "a" does not water everything.

use bevy::input::keyboard::{Key, KeyboardInput};
use bevy::prelude::*;

use crate::shared::*;

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(PreUpdate, reset_and_read_input);
    }
}

/// The single point where hardware input becomes app actions.
fn reset_and_read_input(
    keys: Res<ButtonInput<KeyCode>>,
    mut key_events: EventReader<KeyboardInput>,
    context: Res<InputContext>,
    mut input: ResMut<CompanionInput>,
) {
    *input = CompanionInput::default();

    match *context {
        InputContext::List => {
            // Consume buffered key events so stale text never leaks into a
            // later TextEntry frame.
            key_events.clear();

            input.move_up = keys.just_pressed(KeyCode::ArrowUp);
            input.move_down = keys.just_pressed(KeyCode::ArrowDown);
            input.confirm = keys.just_pressed(KeyCode::Enter);
            input.cancel = keys.just_pressed(KeyCode::Escape);

            input.toggle_watered = keys.just_pressed(KeyCode::Space);
            input.water_all = keys.just_pressed(KeyCode::KeyA);
            input.water_none = keys.just_pressed(KeyCode::KeyN);
            input.remove_selected = keys.just_pressed(KeyCode::KeyX);
            input.clear_all = keys.just_pressed(KeyCode::KeyC);

            input.goto_tracker = keys.just_pressed(KeyCode::KeyT);
            input.goto_import = keys.just_pressed(KeyCode::KeyI);
            input.goto_layouts = keys.just_pressed(KeyCode::KeyL);

            const DIGITS: [KeyCode; 9] = [
                KeyCode::Digit1,
                KeyCode::Digit2,
                KeyCode::Digit3,
                KeyCode::Digit4,
                KeyCode::Digit5,
                KeyCode::Digit6,
                KeyCode::Digit7,
                KeyCode::Digit8,
                KeyCode::Digit9,
            ];
            for (i, key) in DIGITS.iter().enumerate() {
                if keys.just_pressed(*key) {
                    input.digit = Some(i as u8 + 1);
                }
            }
        }

        InputContext::TextEntry => {
            input.confirm = keys.just_pressed(KeyCode::Enter);
            input.cancel = keys.just_pressed(KeyCode::Escape);
            input.backspace = keys.just_pressed(KeyCode::Backspace);

            for ev in key_events.read() {
                if !ev.state.is_pressed() {
                    continue;
                }
                match &ev.logical_key {
                    Key::Character(chars) => {
                        for ch in chars.chars().filter(|c| !c.is_control()) {
                            input.text.push(ch);
                        }
                    }
                    Key::Space => input.text.push(' '),
                    _ => {}
                }
            }
        }
    }
}
