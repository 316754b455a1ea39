// Selection coordinator - canonical selected/hovered sets and the
// append/replace reconciliation applied to incoming candidate batches
use bevy::prelude::*;
use std::collections::HashSet;

use crate::selectable::{Selectable, SelectionStateChanged};

/// Whether a candidate batch is transient hover feedback or a committed
/// selection.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CandidateKind {
    Hovered,
    Selected,
}

/// Batch of candidate entities produced by the screen-region query.
/// Entities without a [`Selectable`] component are silently dropped on
/// receipt.
#[derive(Event, Debug)]
pub struct CandidateBatch {
    pub kind: CandidateKind,
    pub units: Vec<Entity>,
}

/// Full batch of units that just became selected.
#[derive(Event, Debug)]
pub struct UnitsSelected {
    pub units: Vec<Entity>,
}

/// Full batch of units that just became deselected.
#[derive(Event, Debug)]
pub struct UnitsDeselected {
    pub units: Vec<Entity>,
}

/// Full batch of units that just became hovered.
#[derive(Event, Debug)]
pub struct HoverStarted {
    pub units: Vec<Entity>,
}

/// Full batch of units that just stopped being hovered.
#[derive(Event, Debug)]
pub struct HoverEnded {
    pub units: Vec<Entity>,
}

/// Canonical selection state for the local player session. One per world;
/// owns the selected and hovered sets and the transient input-mode flags.
#[derive(Resource, Default)]
pub struct SelectionCoordinator {
    /// Units currently selected. Read-only for consumers; mutated by the
    /// plugin's systems.
    pub selected: HashSet<Entity>,
    /// Units currently hovered. Read-only for consumers.
    pub hovered: HashSet<Entity>,
    /// Mirrors the physical shift key; switches replace to append semantics.
    pub(crate) shift_down: bool,
    /// Set when a click released without dragging past the threshold.
    pub(crate) single_select: bool,
    /// Set while a drag exceeds the threshold; suppresses pointer-hover
    /// observers so drag-hover and cursor-hover are not double processed.
    pub(crate) group_selecting: bool,
    /// Screen position where the current press started.
    pub(crate) drag_start: Option<Vec2>,
}

impl SelectionCoordinator {
    pub fn is_group_selecting(&self) -> bool {
        self.group_selecting
    }

    pub fn is_shift_down(&self) -> bool {
        self.shift_down
    }
}

/// Computed reconciliation: which units to deselect and which to select,
/// applied in that order so a unit present in both ends up selected.
#[derive(Debug, Default, PartialEq)]
pub(crate) struct SelectionPlan {
    pub deselect: Vec<Entity>,
    pub select: Vec<Entity>,
}

/// Pure reconciliation step for a non-empty candidate batch.
///
/// Without append: the batch replaces the selection; members already selected
/// are re-selected (a no-op toggle) and everything absent is deselected.
/// With append: a single candidate toggles, a multi-candidate batch is an
/// append-only union that never removes existing members.
pub(crate) fn plan_selection(
    current: &HashSet<Entity>,
    candidates: &[Entity],
    append: bool,
) -> SelectionPlan {
    if !append {
        return SelectionPlan {
            deselect: current
                .iter()
                .copied()
                .filter(|unit| !candidates.contains(unit))
                .collect(),
            select: candidates.to_vec(),
        };
    }

    if let [unit] = candidates {
        if current.contains(unit) {
            SelectionPlan {
                deselect: vec![*unit],
                select: Vec::new(),
            }
        } else {
            SelectionPlan {
                deselect: Vec::new(),
                select: vec![*unit],
            }
        }
    } else {
        SelectionPlan {
            deselect: Vec::new(),
            select: candidates
                .iter()
                .copied()
                .filter(|unit| !current.contains(unit))
                .collect(),
        }
    }
}

/// System: reconcile incoming candidate batches against the canonical sets,
/// mutate each affected unit's state and broadcast the affected batches.
pub fn apply_candidate_batches(
    mut batches: EventReader<CandidateBatch>,
    mut coordinator: ResMut<SelectionCoordinator>,
    mut selectables: Query<&mut Selectable>,
    mut state_changed: EventWriter<SelectionStateChanged>,
    mut selected_events: EventWriter<UnitsSelected>,
    mut deselected_events: EventWriter<UnitsDeselected>,
    mut hover_started_events: EventWriter<HoverStarted>,
    mut hover_ended_events: EventWriter<HoverEnded>,
) {
    for batch in batches.read() {
        // Drop candidates without the selectable capability
        let candidates: Vec<Entity> = batch
            .units
            .iter()
            .copied()
            .filter(|unit| selectables.contains(*unit))
            .collect();

        match batch.kind {
            CandidateKind::Hovered => {
                unhover_all(
                    &mut coordinator,
                    &mut selectables,
                    &mut state_changed,
                    &mut hover_ended_events,
                );
                hover_units(
                    &candidates,
                    &mut coordinator,
                    &mut selectables,
                    &mut state_changed,
                    &mut hover_started_events,
                );
            }
            CandidateKind::Selected => {
                // Selection always clears hover state first
                unhover_all(
                    &mut coordinator,
                    &mut selectables,
                    &mut state_changed,
                    &mut hover_ended_events,
                );

                if candidates.is_empty() {
                    deselect_all(
                        &mut coordinator,
                        &mut selectables,
                        &mut state_changed,
                        &mut deselected_events,
                    );
                    continue;
                }

                let plan =
                    plan_selection(&coordinator.selected, &candidates, coordinator.shift_down);
                debug!(
                    "selection batch: {} candidates, deselect {}, select {}",
                    candidates.len(),
                    plan.deselect.len(),
                    plan.select.len()
                );

                deselect_units(
                    &plan.deselect,
                    &mut coordinator,
                    &mut selectables,
                    &mut state_changed,
                    &mut deselected_events,
                );
                select_units(
                    &plan.select,
                    &mut coordinator,
                    &mut selectables,
                    &mut state_changed,
                    &mut selected_events,
                );
            }
        }
    }
}

/// System: drop despawned units from the canonical sets.
pub(crate) fn prune_despawned_units(
    mut removed: RemovedComponents<Selectable>,
    mut coordinator: ResMut<SelectionCoordinator>,
) {
    for entity in removed.read() {
        coordinator.selected.remove(&entity);
        coordinator.hovered.remove(&entity);
    }
}

fn select_units(
    units: &[Entity],
    coordinator: &mut SelectionCoordinator,
    selectables: &mut Query<&mut Selectable>,
    state_changed: &mut EventWriter<SelectionStateChanged>,
    selected_events: &mut EventWriter<UnitsSelected>,
) {
    let mut affected = Vec::new();
    for &entity in units {
        let Ok(mut selectable) = selectables.get_mut(entity) else {
            continue;
        };
        coordinator.selected.insert(entity);
        let state = selectable.select();
        state_changed.write(SelectionStateChanged { entity, state });
        affected.push(entity);
    }
    if !affected.is_empty() {
        info!("selected {} units", affected.len());
        selected_events.write(UnitsSelected { units: affected });
    }
}

fn deselect_units(
    units: &[Entity],
    coordinator: &mut SelectionCoordinator,
    selectables: &mut Query<&mut Selectable>,
    state_changed: &mut EventWriter<SelectionStateChanged>,
    deselected_events: &mut EventWriter<UnitsDeselected>,
) {
    let mut affected = Vec::new();
    for &entity in units {
        let Ok(mut selectable) = selectables.get_mut(entity) else {
            continue;
        };
        coordinator.selected.remove(&entity);
        let state = selectable.deselect();
        state_changed.write(SelectionStateChanged { entity, state });
        affected.push(entity);
    }
    if !affected.is_empty() {
        deselected_events.write(UnitsDeselected { units: affected });
    }
}

fn deselect_all(
    coordinator: &mut SelectionCoordinator,
    selectables: &mut Query<&mut Selectable>,
    state_changed: &mut EventWriter<SelectionStateChanged>,
    deselected_events: &mut EventWriter<UnitsDeselected>,
) {
    let mut affected = Vec::new();
    for entity in coordinator.selected.drain() {
        if let Ok(mut selectable) = selectables.get_mut(entity) {
            let state = selectable.deselect();
            state_changed.write(SelectionStateChanged { entity, state });
            affected.push(entity);
        }
    }
    if !affected.is_empty() {
        info!("selection cleared ({} units)", affected.len());
        deselected_events.write(UnitsDeselected { units: affected });
    }
}

fn hover_units(
    units: &[Entity],
    coordinator: &mut SelectionCoordinator,
    selectables: &mut Query<&mut Selectable>,
    state_changed: &mut EventWriter<SelectionStateChanged>,
    hover_started_events: &mut EventWriter<HoverStarted>,
) {
    let mut affected = Vec::new();
    for &entity in units {
        let Ok(mut selectable) = selectables.get_mut(entity) else {
            continue;
        };
        coordinator.hovered.insert(entity);
        let state = selectable.hover_start();
        state_changed.write(SelectionStateChanged { entity, state });
        affected.push(entity);
    }
    if !affected.is_empty() {
        hover_started_events.write(HoverStarted { units: affected });
    }
}

fn unhover_all(
    coordinator: &mut SelectionCoordinator,
    selectables: &mut Query<&mut Selectable>,
    state_changed: &mut EventWriter<SelectionStateChanged>,
    hover_ended_events: &mut EventWriter<HoverEnded>,
) {
    let mut affected = Vec::new();
    for entity in coordinator.hovered.drain() {
        if let Ok(mut selectable) = selectables.get_mut(entity) {
            let state = selectable.hover_end();
            state_changed.write(SelectionStateChanged { entity, state });
            affected.push(entity);
        }
    }
    if !affected.is_empty() {
        hover_ended_events.write(HoverEnded { units: affected });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selectable::SelectionState;

    fn test_app() -> App {
        let mut app = App::new();
        app.init_resource::<SelectionCoordinator>()
            .add_event::<CandidateBatch>()
            .add_event::<UnitsSelected>()
            .add_event::<UnitsDeselected>()
            .add_event::<HoverStarted>()
            .add_event::<HoverEnded>()
            .add_event::<SelectionStateChanged>()
            .add_systems(Update, (apply_candidate_batches, prune_despawned_units));
        app
    }

    fn spawn_unit(app: &mut App) -> Entity {
        app.world_mut().spawn(Selectable::default()).id()
    }

    fn send_batch(app: &mut App, kind: CandidateKind, units: Vec<Entity>) {
        app.world_mut().send_event(CandidateBatch { kind, units });
        app.update();
    }

    fn drain_selected(app: &mut App) -> Vec<Vec<Entity>> {
        app.world_mut()
            .resource_mut::<Events<UnitsSelected>>()
            .drain()
            .map(|event| event.units)
            .collect()
    }

    fn drain_deselected(app: &mut App) -> Vec<Vec<Entity>> {
        app.world_mut()
            .resource_mut::<Events<UnitsDeselected>>()
            .drain()
            .map(|event| event.units)
            .collect()
    }

    fn drain_hover_ended(app: &mut App) -> Vec<Vec<Entity>> {
        app.world_mut()
            .resource_mut::<Events<HoverEnded>>()
            .drain()
            .map(|event| event.units)
            .collect()
    }

    fn state_of(app: &App, entity: Entity) -> SelectionState {
        app.world().get::<Selectable>(entity).unwrap().state()
    }

    fn set_shift(app: &mut App, down: bool) {
        app.world_mut()
            .resource_mut::<SelectionCoordinator>()
            .shift_down = down;
    }

    fn selected_set(app: &App) -> HashSet<Entity> {
        app.world()
            .resource::<SelectionCoordinator>()
            .selected
            .clone()
    }

    mod planning {
        use super::*;

        fn entities(n: u32) -> Vec<Entity> {
            (0..n).map(Entity::from_raw).collect()
        }

        #[test]
        fn replace_deselects_absent_and_reselects_present() {
            let units = entities(3);
            let (a, b, c) = (units[0], units[1], units[2]);
            let current: HashSet<Entity> = [a, b].into_iter().collect();

            let plan = plan_selection(&current, &[b, c], false);
            assert_eq!(plan.deselect, vec![a]);
            assert_eq!(plan.select, vec![b, c]);
        }

        #[test]
        fn append_single_toggles_off_when_selected() {
            let units = entities(2);
            let (a, b) = (units[0], units[1]);
            let current: HashSet<Entity> = [a, b].into_iter().collect();

            let plan = plan_selection(&current, &[a], true);
            assert_eq!(plan.deselect, vec![a]);
            assert!(plan.select.is_empty());
        }

        #[test]
        fn append_single_toggles_on_when_unselected() {
            let units = entities(2);
            let (a, b) = (units[0], units[1]);
            let current: HashSet<Entity> = [a].into_iter().collect();

            let plan = plan_selection(&current, &[b], true);
            assert!(plan.deselect.is_empty());
            assert_eq!(plan.select, vec![b]);
        }

        #[test]
        fn append_multi_is_union_without_removals() {
            let units = entities(3);
            let (a, b, c) = (units[0], units[1], units[2]);
            let current: HashSet<Entity> = [a, b].into_iter().collect();

            let plan = plan_selection(&current, &[b, c], true);
            assert!(plan.deselect.is_empty());
            assert_eq!(plan.select, vec![c]);
        }
    }

    #[test]
    fn replace_selection_broadcasts_exact_batches() {
        let mut app = test_app();
        let a = spawn_unit(&mut app);
        let b = spawn_unit(&mut app);
        let c = spawn_unit(&mut app);

        send_batch(&mut app, CandidateKind::Selected, vec![a, b]);
        drain_selected(&mut app);
        drain_deselected(&mut app);

        send_batch(&mut app, CandidateKind::Selected, vec![b, c]);

        assert_eq!(drain_deselected(&mut app), vec![vec![a]]);
        assert_eq!(drain_selected(&mut app), vec![vec![b, c]]);
        assert_eq!(selected_set(&app), [b, c].into_iter().collect());
        assert_eq!(state_of(&app, a), SelectionState::None);
        assert_eq!(state_of(&app, b), SelectionState::Selected);
        assert_eq!(state_of(&app, c), SelectionState::Selected);
    }

    #[test]
    fn empty_batch_deselects_everything() {
        let mut app = test_app();
        let a = spawn_unit(&mut app);
        let b = spawn_unit(&mut app);

        send_batch(&mut app, CandidateKind::Selected, vec![a, b]);
        drain_selected(&mut app);

        send_batch(&mut app, CandidateKind::Selected, vec![]);

        let deselected = drain_deselected(&mut app);
        assert_eq!(deselected.len(), 1);
        assert_eq!(
            deselected[0].iter().copied().collect::<HashSet<_>>(),
            [a, b].into_iter().collect()
        );
        assert!(selected_set(&app).is_empty());
        assert!(drain_selected(&mut app).is_empty());
    }

    #[test]
    fn empty_batch_with_nothing_selected_stays_silent() {
        let mut app = test_app();
        spawn_unit(&mut app);

        send_batch(&mut app, CandidateKind::Selected, vec![]);

        assert!(drain_deselected(&mut app).is_empty());
        assert!(drain_selected(&mut app).is_empty());
    }

    #[test]
    fn shift_click_toggles_a_single_unit() {
        let mut app = test_app();
        let a = spawn_unit(&mut app);
        let b = spawn_unit(&mut app);

        send_batch(&mut app, CandidateKind::Selected, vec![a, b]);
        set_shift(&mut app, true);

        // Toggle off: only A leaves, B is untouched
        send_batch(&mut app, CandidateKind::Selected, vec![a]);
        assert_eq!(drain_deselected(&mut app).pop().unwrap(), vec![a]);
        assert_eq!(selected_set(&app), [b].into_iter().collect());

        // Toggle back on
        send_batch(&mut app, CandidateKind::Selected, vec![a]);
        assert_eq!(drain_selected(&mut app).pop().unwrap(), vec![a]);
        assert_eq!(selected_set(&app), [a, b].into_iter().collect());
    }

    #[test]
    fn shift_drag_appends_without_removing() {
        let mut app = test_app();
        let a = spawn_unit(&mut app);
        let b = spawn_unit(&mut app);
        let c = spawn_unit(&mut app);

        send_batch(&mut app, CandidateKind::Selected, vec![a]);
        drain_selected(&mut app);
        set_shift(&mut app, true);

        send_batch(&mut app, CandidateKind::Selected, vec![b, c]);

        assert!(drain_deselected(&mut app).is_empty());
        assert_eq!(drain_selected(&mut app), vec![vec![b, c]]);
        assert_eq!(selected_set(&app), [a, b, c].into_iter().collect());
    }

    #[test]
    fn reclick_of_selected_unit_reselects_without_shift() {
        let mut app = test_app();
        let a = spawn_unit(&mut app);

        send_batch(&mut app, CandidateKind::Selected, vec![a]);
        drain_selected(&mut app);

        send_batch(&mut app, CandidateKind::Selected, vec![a]);

        assert!(drain_deselected(&mut app).is_empty());
        assert_eq!(drain_selected(&mut app), vec![vec![a]]);
        assert_eq!(state_of(&app, a), SelectionState::Selected);
    }

    #[test]
    fn units_without_selectable_are_dropped() {
        let mut app = test_app();
        let a = spawn_unit(&mut app);
        let bare = app.world_mut().spawn_empty().id();

        send_batch(&mut app, CandidateKind::Selected, vec![a, bare]);

        assert_eq!(drain_selected(&mut app), vec![vec![a]]);
        assert_eq!(selected_set(&app), [a].into_iter().collect());
    }

    #[test]
    fn selection_clears_hover_before_selecting() {
        let mut app = test_app();
        let a = spawn_unit(&mut app);

        send_batch(&mut app, CandidateKind::Hovered, vec![a]);
        assert_eq!(state_of(&app, a), SelectionState::Hovered);

        send_batch(&mut app, CandidateKind::Selected, vec![a]);
        assert_eq!(drain_hover_ended(&mut app), vec![vec![a]]);
        assert_eq!(state_of(&app, a), SelectionState::Selected);

        // Hover was cleared before selection, so a later deselect goes
        // straight to None rather than reverting to Hovered
        send_batch(&mut app, CandidateKind::Selected, vec![]);
        assert_eq!(state_of(&app, a), SelectionState::None);
    }

    #[test]
    fn hover_batch_replaces_previous_hover() {
        let mut app = test_app();
        let a = spawn_unit(&mut app);
        let b = spawn_unit(&mut app);

        send_batch(&mut app, CandidateKind::Hovered, vec![a, b]);
        drain_hover_ended(&mut app);

        send_batch(&mut app, CandidateKind::Hovered, vec![b]);

        let ended = drain_hover_ended(&mut app);
        assert_eq!(ended.len(), 1);
        assert_eq!(
            ended[0].iter().copied().collect::<HashSet<_>>(),
            [a, b].into_iter().collect()
        );
        assert_eq!(state_of(&app, a), SelectionState::None);
        assert_eq!(state_of(&app, b), SelectionState::Hovered);
    }

    #[test]
    fn despawned_units_are_pruned_from_the_sets() {
        let mut app = test_app();
        let a = spawn_unit(&mut app);
        let b = spawn_unit(&mut app);

        send_batch(&mut app, CandidateKind::Selected, vec![a, b]);
        app.world_mut().entity_mut(a).despawn();
        app.update();

        assert_eq!(selected_set(&app), [b].into_iter().collect());
    }
}
