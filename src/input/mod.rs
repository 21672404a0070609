use macroquad::prelude::*;

use crate::application::Command;
use crate::domain::Grid;
use crate::ui::{Button, screen_to_cell};

/// Keys that map directly to a command
const KEY_BINDINGS: [KeyCode; 4] = [KeyCode::Space, KeyCode::C, KeyCode::R, KeyCode::E];

/// Keys that arm a preset pattern, by index into `presets::all_patterns()`
const PATTERN_KEYS: [KeyCode; 5] = [
    KeyCode::Key1,
    KeyCode::Key2,
    KeyCode::Key3,
    KeyCode::Key4,
    KeyCode::Key5,
];

/// Space toggles between start and stop
pub fn start_or_stop(running: bool) -> Command {
    if running { Command::Stop } else { Command::Start }
}

/// Translate a key into a command, taking the run state into account
pub fn command_for_key(key: KeyCode, running: bool) -> Option<Command> {
    match key {
        KeyCode::Space => Some(start_or_stop(running)),
        KeyCode::C => Some(Command::Clear),
        KeyCode::R => Some(Command::Randomize),
        KeyCode::E => Some(Command::Export),
        _ => None,
    }
}

/// Process keyboard input into commands
pub fn process_keyboard_input(running: bool) -> Vec<Command> {
    KEY_BINDINGS
        .iter()
        .filter(|key| is_key_pressed(**key))
        .filter_map(|key| command_for_key(*key, running))
        .collect()
}

/// Index of a pattern whose key was pressed this frame
pub fn pattern_key_pressed() -> Option<usize> {
    PATTERN_KEYS.iter().position(|key| is_key_pressed(*key))
}

/// Whether placement should be cancelled this frame
pub fn cancel_pressed() -> bool {
    is_key_pressed(KeyCode::Escape) || is_mouse_button_pressed(MouseButton::Right)
}

/// Cell clicked on the board this frame, if any
pub fn clicked_cell(grid: &Grid, mouse_pos: (f32, f32)) -> Option<(usize, usize)> {
    if !is_mouse_button_pressed(MouseButton::Left) {
        return None;
    }
    screen_to_cell(grid, mouse_pos)
}

/// Left click on the board toggles the cell under the cursor
pub fn process_mouse_toggle(grid: &Grid, mouse_pos: (f32, f32)) -> Option<Command> {
    clicked_cell(grid, mouse_pos).map(|(row, col)| Command::Toggle { row, col })
}

/// Process button clicks into commands
pub fn process_button_clicks(buttons: &[Button], mouse_pos: (f32, f32), running: bool) -> Vec<Command> {
    buttons
        .iter()
        .filter_map(|btn| btn.clicked(mouse_pos))
        .map(|command| match command {
            Command::Start | Command::Stop => start_or_stop(running),
            other => other,
        })
        .collect()
}
