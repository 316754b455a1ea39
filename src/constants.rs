// Selection tuning constants

/// Drag distance (screen units) past which a press becomes a group selection
pub const GROUP_SELECT_DRAG_THRESHOLD: f32 = 20.0;

/// Boxes smaller than this on either axis are not worth drawing
pub const SELECTION_BOX_MIN_DRAW_SIZE: f32 = 2.0;

pub const SELECTION_BOX_OUTLINE_COLOR: bevy::prelude::Color =
    bevy::prelude::Color::srgba(0.3, 1.0, 0.4, 0.8);
pub const SELECTION_BOX_FILL_COLOR: bevy::prelude::Color =
    bevy::prelude::Color::srgba(0.2, 0.8, 0.3, 0.15);
pub const SELECTION_BOX_OUTLINE_THICKNESS: f32 = 1.0;
