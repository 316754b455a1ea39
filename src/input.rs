// Mouse and keyboard input handling for selection
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::constants::GROUP_SELECT_DRAG_THRESHOLD;
use crate::coordinator::SelectionCoordinator;
use crate::selection_box::SelectionBox;

/// System: drive the selection box and coordinator mode flags from the left
/// mouse button and the shift modifier.
///
/// A press starts tracking; holding updates the box end point every frame and
/// flips into group-selection once the drag passes the threshold; release
/// either commits the dragged box or collapses it to a click-sized box at the
/// cursor. Releasing always arms the final selection query, even when the
/// cursor has left the window — the drag commits with its last recorded end
/// point rather than latching until the next click.
pub fn selection_input_system(
    mouse_button: Res<ButtonInput<MouseButton>>,
    keyboard: Res<ButtonInput<KeyCode>>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    mut coordinator: ResMut<SelectionCoordinator>,
    mut selection_box: ResMut<SelectionBox>,
) {
    coordinator.shift_down =
        keyboard.pressed(KeyCode::ShiftLeft) || keyboard.pressed(KeyCode::ShiftRight);

    let cursor_pos = window_query
        .single()
        .ok()
        .and_then(|window| window.cursor_position());

    if mouse_button.just_pressed(MouseButton::Left) {
        if let Some(cursor_pos) = cursor_pos {
            coordinator.single_select = false;
            coordinator.group_selecting = false;
            coordinator.drag_start = Some(cursor_pos);
            selection_box.init_start(cursor_pos);
        }
    }

    if mouse_button.pressed(MouseButton::Left) && !mouse_button.just_pressed(MouseButton::Left) {
        if let (Some(cursor_pos), Some(start_pos)) = (cursor_pos, coordinator.drag_start) {
            if !coordinator.single_select
                && !coordinator.group_selecting
                && cursor_pos.distance(start_pos) > GROUP_SELECT_DRAG_THRESHOLD
            {
                coordinator.group_selecting = true;
                debug!("group selection started");
            }
            selection_box.begin_drawing();
            selection_box.update_end(cursor_pos);
        }
    }

    // The release is a one-frame event and must terminate the interaction
    // even without a cursor position
    if mouse_button.just_released(MouseButton::Left) && coordinator.drag_start.is_some() {
        if coordinator.group_selecting {
            if let Some(cursor_pos) = cursor_pos {
                selection_box.update_end(cursor_pos);
            }
            coordinator.group_selecting = false;
        } else {
            // Click without a drag: single-select at the cursor
            coordinator.single_select = true;
            if let Some(cursor_pos) = cursor_pos {
                selection_box.position_on_mouse(cursor_pos);
            }
        }
        selection_box.finish();
        coordinator.drag_start = None;
    }
}
