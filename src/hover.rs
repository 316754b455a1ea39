// Pointer-over hover tracking via bevy_picking observers
//
// These fire per entity as the cursor enters and leaves it, the counterpart
// of the rectangle-driven hover batches. Requires a picking backend (e.g.
// MeshPickingPlugin) in the app; without one the observers simply never run.
use bevy::picking::events::{Out, Over, Pointer};
use bevy::prelude::*;

use crate::coordinator::SelectionCoordinator;
use crate::selectable::{Selectable, SelectionStateChanged};

/// Observer: the cursor moved onto a unit.
pub(crate) fn pointer_hover_start(
    trigger: Trigger<Pointer<Over>>,
    mut coordinator: ResMut<SelectionCoordinator>,
    mut selectables: Query<&mut Selectable>,
    mut state_changed: EventWriter<SelectionStateChanged>,
) {
    // Rectangle-driven hover owns the hover set during a group selection
    if coordinator.is_group_selecting() {
        return;
    }

    let entity = trigger.target();
    let Ok(mut selectable) = selectables.get_mut(entity) else {
        return;
    };
    coordinator.hovered.insert(entity);
    let state = selectable.hover_start();
    state_changed.write(SelectionStateChanged { entity, state });
}

/// Observer: the cursor left a unit.
pub(crate) fn pointer_hover_end(
    trigger: Trigger<Pointer<Out>>,
    mut coordinator: ResMut<SelectionCoordinator>,
    mut selectables: Query<&mut Selectable>,
    mut state_changed: EventWriter<SelectionStateChanged>,
) {
    if coordinator.is_group_selecting() {
        return;
    }

    let entity = trigger.target();
    let Ok(mut selectable) = selectables.get_mut(entity) else {
        return;
    };
    coordinator.hovered.remove(&entity);
    let state = selectable.hover_end();
    state_changed.write(SelectionStateChanged { entity, state });
}
