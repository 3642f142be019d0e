use crate::state::State;
use grain_life::{Command, Flow};
use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, MouseButton},
    keyboard::KeyCode,
};

pub fn command_for_key(key: KeyCode) -> Option<Command> {
    match key {
        KeyCode::Escape => Some(Command::Quit),
        KeyCode::Space => Some(Command::StartOrReseed),
        KeyCode::ArrowUp => Some(Command::SpeedUp),
        KeyCode::ArrowDown => Some(Command::SlowDown),
        KeyCode::KeyC => Some(Command::ToggleColourCycle),
        KeyCode::KeyP => Some(Command::TogglePause),
        KeyCode::KeyR => Some(Command::ToggleStochastic),
        _ => None,
    }
}

pub fn handle_key(state: &mut State, key: KeyCode) -> Flow {
    let Some(command) = command_for_key(key) else {
        return Flow::Continue;
    };
    let flow = state.session.apply(command, &mut state.grid);
    state.window.request_redraw();
    flow
}

pub fn handle_mouse_input(state: &mut State, button: MouseButton, element_state: ElementState) {
    if button != MouseButton::Left || element_state != ElementState::Pressed {
        return;
    }
    let Some(pos) = state.cursor_pos else {
        return;
    };
    if let Some(idx) = state.grid.toggle_cell_at(pos.x.floor() as i64, pos.y.floor() as i64) {
        log::debug!("Toggled cell {} at ({:.0}, {:.0})", idx, pos.x, pos.y);
        state.window.request_redraw();
    }
}

pub fn handle_cursor_move(state: &mut State, position: PhysicalPosition<f64>) {
    state.cursor_pos = Some(position);
}

pub fn handle_cursor_left(state: &mut State) {
    state.cursor_pos = None;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_key_bindings() {
        assert_eq!(command_for_key(KeyCode::Space), Some(Command::StartOrReseed));
        assert_eq!(command_for_key(KeyCode::ArrowUp), Some(Command::SpeedUp));
        assert_eq!(command_for_key(KeyCode::ArrowDown), Some(Command::SlowDown));
        assert_eq!(command_for_key(KeyCode::KeyC), Some(Command::ToggleColourCycle));
        assert_eq!(command_for_key(KeyCode::KeyP), Some(Command::TogglePause));
        assert_eq!(command_for_key(KeyCode::KeyR), Some(Command::ToggleStochastic));
        assert_eq!(command_for_key(KeyCode::Escape), Some(Command::Quit));
        assert_eq!(command_for_key(KeyCode::KeyQ), None);
    }
}
