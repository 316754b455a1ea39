// RTS-style unit selection for Bevy - drag-box selection, click selection,
// hover feedback and shift-to-append semantics.
//
// Submodules:
// - selectable: Selectable component and its hover/selected state machine
// - coordinator: SelectionCoordinator resource and batch reconciliation
// - selection_box: Screen-space drag rectangle, region query and visual
// - input: Mouse/keyboard input handling (click, box select, shift modifier)
// - hover: Pointer-over hover observers (bevy_picking)
// - bounds: Camera bounds volume marker
// - constants: Shared tuning constants

use bevy::prelude::*;

mod bounds;
mod constants;
mod coordinator;
mod hover;
mod input;
mod selectable;
mod selection_box;

pub use bounds::CameraBoundsVolume;
pub use constants::GROUP_SELECT_DRAG_THRESHOLD;
pub use coordinator::{
    CandidateBatch, CandidateKind, HoverEnded, HoverStarted, SelectionCoordinator,
    UnitsDeselected, UnitsSelected,
};
pub use selectable::{Selectable, SelectionState, SelectionStateChanged};
pub use selection_box::{SelectionBox, SelectionBoxConfig, SelectionCamera};

// Re-export systems for apps that want custom scheduling
pub use coordinator::apply_candidate_batches;
pub use input::selection_input_system;
pub use selection_box::{selection_box_query_system, selection_box_visual_system};

/// Adds drag-box and click selection to an app.
///
/// Mark the picking camera with [`SelectionCamera`] and attach [`Selectable`]
/// to every unit that should participate. Selection results arrive as
/// [`UnitsSelected`] / [`UnitsDeselected`] / [`HoverStarted`] / [`HoverEnded`]
/// batches plus a per-entity [`SelectionStateChanged`] stream.
pub struct RtsSelectionPlugin;

impl Plugin for RtsSelectionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SelectionCoordinator>()
            .init_resource::<SelectionBox>()
            .init_resource::<SelectionBoxConfig>()
            .add_event::<CandidateBatch>()
            .add_event::<UnitsSelected>()
            .add_event::<UnitsDeselected>()
            .add_event::<HoverStarted>()
            .add_event::<HoverEnded>()
            .add_event::<SelectionStateChanged>()
            .add_systems(
                Update,
                (
                    input::selection_input_system,
                    selection_box::selection_box_query_system,
                    coordinator::apply_candidate_batches,
                    selection_box::selection_box_visual_system,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                (coordinator::prune_despawned_units, bounds::ignore_picking_on_bounds_volumes),
            )
            .add_observer(hover::pointer_hover_start)
            .add_observer(hover::pointer_hover_end);
    }
}
