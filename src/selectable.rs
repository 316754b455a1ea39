// Selectable capability marker and its per-unit state machine
use bevy::prelude::*;

/// Discrete selection state of a unit, derived from its two flags.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum SelectionState {
    #[default]
    None,
    Hovered,
    Selected,
}

/// Per-entity notification carrying the new state after a transition.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionStateChanged {
    pub entity: Entity,
    pub state: SelectionState,
}

/// Capability component: attach to any entity that should participate in
/// selection and hover tracking. Mutated only by the coordinator through the
/// transition methods below; the `selected` and `hovered` flags are tracked
/// independently and the cached state is recomputed on every transition.
#[derive(Component, Default, Debug)]
pub struct Selectable {
    selected: bool,
    hovered: bool,
    state: SelectionState,
}

impl Selectable {
    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub(crate) fn select(&mut self) -> SelectionState {
        self.selected = true;
        self.hovered = false;
        self.state = SelectionState::Selected;
        self.state
    }

    pub(crate) fn deselect(&mut self) -> SelectionState {
        self.selected = false;
        self.state = if self.hovered {
            SelectionState::Hovered
        } else {
            SelectionState::None
        };
        self.state
    }

    pub(crate) fn hover_start(&mut self) -> SelectionState {
        self.hovered = true;
        self.state = SelectionState::Hovered;
        self.state
    }

    pub(crate) fn hover_end(&mut self) -> SelectionState {
        self.hovered = false;
        self.state = if self.selected {
            SelectionState::Selected
        } else {
            SelectionState::None
        };
        self.state
    }
}
