// Camera bounds volume marker
use bevy::picking::Pickable;
use bevy::prelude::*;

/// Marker for static volumes that bound camera movement. The volume's
/// geometry must never swallow pointer picks meant for the units inside it,
/// so picking is disabled on it when it spawns. Carries no other logic.
#[derive(Component, Default)]
pub struct CameraBoundsVolume;

/// System: opt newly added bounds volumes out of picking.
pub(crate) fn ignore_picking_on_bounds_volumes(
    mut commands: Commands,
    volumes: Query<Entity, Added<CameraBoundsVolume>>,
) {
    for entity in volumes.iter() {
        commands.entity(entity).insert(Pickable::IGNORE);
    }
}
