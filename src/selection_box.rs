// Screen-space drag rectangle: state, per-frame region query and the
// UI visual drawn while dragging
use bevy::prelude::*;

use crate::constants::*;
use crate::coordinator::{CandidateBatch, CandidateKind};
use crate::selectable::Selectable;

/// Marker for the camera used to project units into screen space.
#[derive(Component)]
pub struct SelectionCamera;

/// Marker component for the drag rectangle UI node.
#[derive(Component)]
pub struct SelectionBoxVisual;

/// Appearance of the drag rectangle.
#[derive(Resource)]
pub struct SelectionBoxConfig {
    pub outline_color: Color,
    pub fill_color: Color,
    pub outline_thickness: f32,
}

impl Default for SelectionBoxConfig {
    fn default() -> Self {
        Self {
            outline_color: SELECTION_BOX_OUTLINE_COLOR,
            fill_color: SELECTION_BOX_FILL_COLOR,
            outline_thickness: SELECTION_BOX_OUTLINE_THICKNESS,
        }
    }
}

/// The drag rectangle itself: two screen-space corners, a drawing flag and a
/// one-shot flag that arms the final (committing) region query. Ephemeral;
/// reset on every interaction cycle.
#[derive(Resource, Default)]
pub struct SelectionBox {
    start: Vec2,
    end: Vec2,
    drawing: bool,
    pending_final: bool,
}

impl SelectionBox {
    /// Collapse the box to a degenerate 1px rectangle at the cursor, for
    /// click selection.
    pub fn position_on_mouse(&mut self, cursor: Vec2) {
        self.start = cursor - Vec2::ONE;
        self.end = cursor + Vec2::ONE;
    }

    pub fn init_start(&mut self, cursor: Vec2) {
        self.start = cursor;
        self.end = cursor;
    }

    pub fn update_end(&mut self, cursor: Vec2) {
        self.end = cursor;
    }

    pub fn begin_drawing(&mut self) {
        self.drawing = true;
    }

    /// Stop drawing and arm the one-shot final selection query.
    pub fn finish(&mut self) {
        self.drawing = false;
        self.pending_final = true;
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    pub fn is_final_pending(&self) -> bool {
        self.pending_final
    }

    fn take_pending_final(&mut self) -> bool {
        std::mem::take(&mut self.pending_final)
    }

    /// Normalized screen rectangle between the two corners.
    pub fn rect(&self) -> Rect {
        Rect::from_corners(self.start, self.end)
    }
}

/// System: while the box is active, query the units inside it every frame.
/// While dragging the batch is emitted as hover feedback; when the final
/// flag is armed the same query commits once as a selection.
pub fn selection_box_query_system(
    mut selection_box: ResMut<SelectionBox>,
    camera_query: Query<(&Camera, &GlobalTransform), With<SelectionCamera>>,
    unit_query: Query<(Entity, &GlobalTransform), With<Selectable>>,
    mut batches: EventWriter<CandidateBatch>,
) {
    if !selection_box.is_drawing() && !selection_box.is_final_pending() {
        return;
    }
    let Ok((camera, camera_transform)) = camera_query.single() else {
        return;
    };

    let rect = selection_box.rect();
    let units = units_in_screen_rect(rect, camera, camera_transform, &unit_query);

    let kind = if selection_box.take_pending_final() {
        CandidateKind::Selected
    } else {
        CandidateKind::Hovered
    };
    batches.write(CandidateBatch { kind, units });
}

/// Collect every selectable unit whose projected position falls inside the
/// screen rectangle (inclusive on all edges).
fn units_in_screen_rect(
    rect: Rect,
    camera: &Camera,
    camera_transform: &GlobalTransform,
    unit_query: &Query<(Entity, &GlobalTransform), With<Selectable>>,
) -> Vec<Entity> {
    let mut units = Vec::new();
    for (entity, transform) in unit_query.iter() {
        if let Ok(screen_pos) = camera.world_to_viewport(camera_transform, transform.translation())
        {
            if rect.contains(screen_pos) {
                units.push(entity);
            }
        }
    }
    units
}

/// System: render the drag rectangle as a bordered UI node, recreated each
/// frame with the current dimensions.
pub fn selection_box_visual_system(
    mut commands: Commands,
    selection_box: Res<SelectionBox>,
    config: Res<SelectionBoxConfig>,
    existing_visual: Query<Entity, With<SelectionBoxVisual>>,
) {
    for entity in existing_visual.iter() {
        commands.entity(entity).despawn();
    }

    if !selection_box.is_drawing() {
        return;
    }

    let rect = selection_box.rect();
    let size = rect.size();
    if size.x < SELECTION_BOX_MIN_DRAW_SIZE || size.y < SELECTION_BOX_MIN_DRAW_SIZE {
        return;
    }

    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(rect.min.x),
            top: Val::Px(rect.min.y),
            width: Val::Px(size.x),
            height: Val::Px(size.y),
            border: UiRect::all(Val::Px(config.outline_thickness)),
            ..default()
        },
        BackgroundColor(config.fill_color),
        BorderColor(config.outline_color),
        SelectionBoxVisual,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_is_normalized_from_reversed_corners() {
        let mut selection_box = SelectionBox::default();
        selection_box.init_start(Vec2::new(100.0, 80.0));
        selection_box.update_end(Vec2::new(20.0, 200.0));

        let rect = selection_box.rect();
        assert_eq!(rect.min, Vec2::new(20.0, 80.0));
        assert_eq!(rect.max, Vec2::new(100.0, 200.0));
    }

    #[test]
    fn position_on_mouse_makes_a_degenerate_box() {
        let mut selection_box = SelectionBox::default();
        selection_box.position_on_mouse(Vec2::new(50.0, 50.0));

        let rect = selection_box.rect();
        assert_eq!(rect.size(), Vec2::splat(2.0));
        assert_eq!(rect.center(), Vec2::new(50.0, 50.0));
    }

    #[test]
    fn finish_arms_the_final_query_once() {
        let mut selection_box = SelectionBox::default();
        selection_box.begin_drawing();
        assert!(selection_box.is_drawing());

        selection_box.finish();
        assert!(!selection_box.is_drawing());
        assert!(selection_box.is_final_pending());
        assert!(selection_box.take_pending_final());
        assert!(!selection_box.is_final_pending());
    }

    #[test]
    fn containment_is_inclusive_at_the_edges() {
        let mut selection_box = SelectionBox::default();
        selection_box.init_start(Vec2::ZERO);
        selection_box.update_end(Vec2::new(10.0, 10.0));

        let rect = selection_box.rect();
        assert!(rect.contains(Vec2::ZERO));
        assert!(rect.contains(Vec2::new(10.0, 10.0)));
        assert!(rect.contains(Vec2::new(5.0, 10.0)));
        assert!(!rect.contains(Vec2::new(10.1, 5.0)));
    }
}
