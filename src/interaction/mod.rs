//! Per-element direct manipulation: drag, resize, rotate and in-place text edit.
//!
//! The gesture state machine is a pure function of (state, event). It
//! never touches the scene; it returns the [`Command`]s to run, and the
//! [`InteractionController`] applies them to the [`SceneStore`].
//!
//! # State Transitions
//!
//! ```text
//!                  body pressed            released
//!            ┌──────────────────► Dragging ───────────┐
//!            │                                        │
//!            │   resize pressed             released  │
//!            ├──────────────────► Resizing ───────────┤
//!  ┌──────┐  │                                        │  ┌──────┐
//!  │ Idle ├──┤   rotate pressed             released  ├──► Idle │
//!  └──────┘  ├──────────────────► Rotating ───────────┤  └──────┘
//!            │                                        │
//!            │   edit (text only)         edit done   │
//!            └──────────────────► EditingText ────────┘
//! ```
//!
//! Only the selected element may leave `Idle`. Because selection is
//! exclusive, at most one element is mid-gesture at any time.

use egui::{Pos2, Vec2};
use log::debug;

use crate::command::{self, Command};
use crate::element::{clamp_size, CanvasElement, ElementId, ElementPatch};
use crate::scene::{Scene, SceneStore};

/// The gesture an element is currently in.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum GestureState {
    #[default]
    Idle,
    /// Following the pointer; the store only sees the final position.
    Dragging {
        /// Pointer position relative to the element's top-left corner.
        grab_offset: Vec2,
        /// Live, bounds-clamped preview of the top-left corner.
        position: Pos2,
    },
    Resizing {
        start_pointer: Pos2,
        start_size: Vec2,
    },
    Rotating {
        center: Pos2,
        /// Initial pointer angle minus the element rotation, in radians.
        angle_offset: f32,
    },
    EditingText {
        draft: String,
    },
}

impl GestureState {
    pub fn is_idle(&self) -> bool {
        matches!(self, GestureState::Idle)
    }

    /// Gestures that follow the pointer until release.
    pub fn tracks_pointer(&self) -> bool {
        matches!(
            self,
            GestureState::Dragging { .. }
                | GestureState::Resizing { .. }
                | GestureState::Rotating { .. }
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            GestureState::Idle => "idle",
            GestureState::Dragging { .. } => "dragging",
            GestureState::Resizing { .. } => "resizing",
            GestureState::Rotating { .. } => "rotating",
            GestureState::EditingText { .. } => "editing-text",
        }
    }
}

/// Input delivered to one element. Positions are canvas-local.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerEvent {
    BodyPressed { pointer: Pos2 },
    ResizePressed { pointer: Pos2 },
    RotatePressed { pointer: Pos2 },
    Moved { pointer: Pos2 },
    Released,
    EditRequested,
    DraftChanged(String),
    EditFinished,
}

/// Result of feeding one event to the state machine.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: GestureState,
    pub commands: Vec<Command>,
}

impl Transition {
    fn to(state: GestureState) -> Self {
        Self {
            state,
            commands: Vec::new(),
        }
    }

    fn with(state: GestureState, commands: Vec<Command>) -> Self {
        Self { state, commands }
    }
}

/// Clamp a top-left position so the element stays inside a canvas of
/// size `bounds`.
pub fn clamp_to_bounds(position: Pos2, size: Vec2, bounds: Vec2) -> Pos2 {
    let max_x = (bounds.x - size.x).max(0.0);
    let max_y = (bounds.y - size.y).max(0.0);
    Pos2::new(position.x.clamp(0.0, max_x), position.y.clamp(0.0, max_y))
}

/// Size after a resize gesture moved the pointer from `start_pointer` to `pointer`.
pub fn resized(start_size: Vec2, start_pointer: Pos2, pointer: Pos2) -> Vec2 {
    clamp_size(start_size + (pointer - start_pointer))
}

fn pointer_angle(center: Pos2, pointer: Pos2) -> f32 {
    (pointer.y - center.y).atan2(pointer.x - center.x)
}

/// Rotation in degrees for the current pointer, keeping the offset
/// captured at gesture start. Truncated modulo 360, so it may be negative.
pub fn rotation_for(center: Pos2, angle_offset: f32, pointer: Pos2) -> f32 {
    (pointer_angle(center, pointer) - angle_offset).to_degrees() % 360.0
}

/// Commands that put `element` under the pointer's control.
fn take_selection(element: &CanvasElement, is_selected: bool) -> Vec<Command> {
    if is_selected {
        Vec::new()
    } else {
        vec![Command::SelectElement(Some(element.id))]
    }
}

/// The element state machine.
///
/// `bounds` is the canvas size, used to keep drags inside the canvas.
pub fn transition(
    state: &GestureState,
    element: &CanvasElement,
    is_selected: bool,
    event: PointerEvent,
    bounds: Vec2,
) -> Transition {
    match (state, event) {
        (GestureState::Idle, PointerEvent::BodyPressed { pointer }) => {
            let mut commands = take_selection(element, is_selected);
            commands.push(Command::BringToFront(element.id));
            Transition::with(
                GestureState::Dragging {
                    grab_offset: pointer - element.position(),
                    position: element.position(),
                },
                commands,
            )
        }

        (GestureState::Idle, PointerEvent::ResizePressed { pointer }) => Transition::with(
            GestureState::Resizing {
                start_pointer: pointer,
                start_size: element.size(),
            },
            take_selection(element, is_selected),
        ),

        (GestureState::Idle, PointerEvent::RotatePressed { pointer }) => {
            let center = element.center();
            Transition::with(
                GestureState::Rotating {
                    center,
                    angle_offset: pointer_angle(center, pointer) - element.rotation.to_radians(),
                },
                take_selection(element, is_selected),
            )
        }

        (GestureState::Idle, PointerEvent::EditRequested) if element.kind.supports_text_edit() => {
            Transition::with(
                GestureState::EditingText {
                    draft: element.content.clone(),
                },
                take_selection(element, is_selected),
            )
        }

        (GestureState::Dragging { grab_offset, .. }, PointerEvent::Moved { pointer }) => {
            Transition::to(GestureState::Dragging {
                grab_offset: *grab_offset,
                position: clamp_to_bounds(pointer - *grab_offset, element.size(), bounds),
            })
        }

        (GestureState::Dragging { position, .. }, PointerEvent::Released) => Transition::with(
            GestureState::Idle,
            vec![Command::UpdateElement {
                element_id: element.id,
                patch: ElementPatch::position(*position),
            }],
        ),

        (
            GestureState::Resizing {
                start_pointer,
                start_size,
            },
            PointerEvent::Moved { pointer },
        ) => Transition::with(
            state.clone(),
            vec![Command::UpdateElement {
                element_id: element.id,
                patch: ElementPatch::size(resized(*start_size, *start_pointer, pointer)),
            }],
        ),

        (
            GestureState::Rotating {
                center,
                angle_offset,
            },
            PointerEvent::Moved { pointer },
        ) => Transition::with(
            state.clone(),
            vec![Command::UpdateElement {
                element_id: element.id,
                patch: ElementPatch::rotation(rotation_for(*center, *angle_offset, pointer)),
            }],
        ),

        (GestureState::Resizing { .. } | GestureState::Rotating { .. }, PointerEvent::Released) => {
            Transition::to(GestureState::Idle)
        }

        (GestureState::EditingText { .. }, PointerEvent::DraftChanged(draft)) => {
            Transition::to(GestureState::EditingText { draft })
        }

        (GestureState::EditingText { draft }, PointerEvent::EditFinished) => Transition::with(
            GestureState::Idle,
            vec![Command::UpdateElement {
                element_id: element.id,
                patch: ElementPatch::content(draft.clone()),
            }],
        ),

        // Everything else, including body presses while editing text
        (state, _) => Transition::to(state.clone()),
    }
}

#[derive(Debug, Clone)]
struct ActiveGesture {
    element_id: ElementId,
    state: GestureState,
}

/// Owns the gesture state of the one element that is not idle.
#[derive(Debug, Default)]
pub struct InteractionController {
    active: Option<ActiveGesture>,
}

static IDLE: GestureState = GestureState::Idle;

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gesture state of `element_id`; idle unless it is the active element.
    pub fn state_of(&self, element_id: ElementId) -> &GestureState {
        match &self.active {
            Some(active) if active.element_id == element_id => &active.state,
            _ => &IDLE,
        }
    }

    pub fn active_element(&self) -> Option<ElementId> {
        self.active.as_ref().map(|active| active.element_id)
    }

    pub fn active_state(&self) -> &GestureState {
        self.active.as_ref().map_or(&IDLE, |active| &active.state)
    }

    /// True while a drag, resize or rotate owns the pointer.
    pub fn is_tracking_pointer(&self) -> bool {
        self.active_state().tracks_pointer()
    }

    /// Element currently being edited, with its staged text.
    pub fn editing(&self) -> Option<(ElementId, &str)> {
        match &self.active {
            Some(ActiveGesture {
                element_id,
                state: GestureState::EditingText { draft },
            }) => Some((*element_id, draft.as_str())),
            _ => None,
        }
    }

    /// Live drag preview position for `element_id`.
    pub fn drag_preview(&self, element_id: ElementId) -> Option<Pos2> {
        match self.state_of(element_id) {
            GestureState::Dragging { position, .. } => Some(*position),
            _ => None,
        }
    }

    /// Feed one event for `element_id` and apply the resulting commands.
    ///
    /// Returns true when the gesture state or the scene changed.
    pub fn handle(
        &mut self,
        store: &SceneStore,
        element_id: ElementId,
        event: PointerEvent,
        bounds: Vec2,
    ) -> bool {
        if self.active_element().is_some_and(|active| active != element_id) {
            self.finish_active(store);
        }

        let (element, is_selected) = {
            let scene = store.read();
            match scene.element(element_id) {
                Some(element) => (element.clone(), scene.selected() == Some(element_id)),
                None => {
                    self.active = None;
                    return false;
                }
            }
        };

        let current = self.state_of(element_id).clone();
        let Transition { state, commands } =
            transition(&current, &element, is_selected, event, bounds);
        let changed = state != current || !commands.is_empty();

        if state.name() != current.name() {
            debug!(
                "Element {} gesture: {} -> {}",
                element_id,
                current.name(),
                state.name()
            );
        }

        command::execute_all(&commands, store);
        self.active = (!state.is_idle()).then_some(ActiveGesture { element_id, state });
        changed
    }

    /// Drop the active gesture once its element is gone or no longer
    /// selected. A pending text edit is committed if the element survives.
    pub fn sync(&mut self, store: &SceneStore, scene: &Scene) {
        let Some(active) = &self.active else {
            return;
        };
        let alive = scene.element(active.element_id).is_some();
        let selected = scene.selected() == Some(active.element_id);
        if !alive {
            self.active = None;
        } else if !selected {
            self.finish_active(store);
        }
    }

    /// End the active gesture. Text edits commit their draft; pointer
    /// gestures keep whatever was last applied.
    pub fn finish_active(&mut self, store: &SceneStore) {
        let Some(active) = self.active.take() else {
            return;
        };
        match active.state {
            GestureState::EditingText { draft } => {
                store.update_element(active.element_id, ElementPatch::content(draft));
            }
            GestureState::Dragging { position, .. } => {
                store.update_element(active.element_id, ElementPatch::position(position));
            }
            _ => {}
        }
    }

    /// Forget the active gesture without committing anything.
    pub fn reset(&mut self) {
        self.active = None;
    }
}
