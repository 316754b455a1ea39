// Demo scene: a field of selectable cubes, an angled RTS camera and a pair
// of listeners standing in for the UI panels that would consume selection
// broadcasts in a real game.
//
// Left-drag to box select, click to single select, shift-click to toggle,
// shift-drag to append.
use bevy::picking::mesh_picking::MeshPickingPlugin;
use bevy::prelude::*;
use rand::Rng;

use bevy_rts_selection::{
    CameraBoundsVolume, RtsSelectionPlugin, Selectable, SelectionCamera, SelectionState,
    SelectionStateChanged, UnitsDeselected, UnitsSelected,
};

const UNIT_COUNT: usize = 24;
const FIELD_HALF_SIZE: f32 = 30.0;

const UNIT_COLOR: Color = Color::srgb(0.6, 0.6, 0.65);
const HOVERED_COLOR: Color = Color::srgb(0.9, 0.9, 0.4);
const SELECTED_COLOR: Color = Color::srgb(0.2, 0.9, 1.0);

fn main() {
    App::new()
        .add_plugins(DefaultPlugins)
        .add_plugins(MeshPickingPlugin)
        .add_plugins(RtsSelectionPlugin)
        .add_systems(Startup, setup_scene)
        .add_systems(Update, (tint_units_on_state_change, log_selection_batches))
        .run();
}

fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, 45.0, 40.0).looking_at(Vec3::ZERO, Vec3::Y),
        SelectionCamera,
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 8_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(20.0, 40.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(100.0, 100.0))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.25, 0.35, 0.25),
            ..default()
        })),
    ));

    // Invisible volume keeping the camera inside the play area
    commands.spawn((
        CameraBoundsVolume,
        Transform::from_scale(Vec3::new(100.0, 20.0, 100.0)),
    ));

    let unit_mesh = meshes.add(Cuboid::new(1.5, 1.5, 1.5));
    let mut rng = rand::thread_rng();
    for _ in 0..UNIT_COUNT {
        let x = rng.gen_range(-FIELD_HALF_SIZE..FIELD_HALF_SIZE);
        let z = rng.gen_range(-FIELD_HALF_SIZE..FIELD_HALF_SIZE);
        commands.spawn((
            Mesh3d(unit_mesh.clone()),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: UNIT_COLOR,
                ..default()
            })),
            Transform::from_xyz(x, 0.75, z),
            Selectable::default(),
        ));
    }
}

/// Recolor units as their selection state changes.
fn tint_units_on_state_change(
    mut state_changes: EventReader<SelectionStateChanged>,
    unit_query: Query<&MeshMaterial3d<StandardMaterial>, With<Selectable>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for change in state_changes.read() {
        let Ok(material_handle) = unit_query.get(change.entity) else {
            continue;
        };
        let Some(material) = materials.get_mut(&material_handle.0) else {
            continue;
        };
        material.base_color = match change.state {
            SelectionState::None => UNIT_COLOR,
            SelectionState::Hovered => HOVERED_COLOR,
            SelectionState::Selected => SELECTED_COLOR,
        };
    }
}

/// Stand-in for a UI panel refreshing itself from the full-batch broadcasts.
fn log_selection_batches(
    mut selected: EventReader<UnitsSelected>,
    mut deselected: EventReader<UnitsDeselected>,
) {
    for batch in selected.read() {
        info!("panel refresh: {} units selected", batch.units.len());
    }
    for batch in deselected.read() {
        info!("panel refresh: {} units deselected", batch.units.len());
    }
}
