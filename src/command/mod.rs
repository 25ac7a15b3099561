use crate::element::{ElementDraft, ElementId, ElementPatch};
use crate::scene::{SceneStore, Theme};

/// One scene mutation, as a value.
///
/// Interaction transitions produce commands instead of writing to the
/// store directly, which keeps them pure and testable. There is no
/// history: a command is executed once and dropped.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Insert a new element and select it
    AddElement(ElementDraft),

    /// Merge fields into an element
    UpdateElement {
        element_id: ElementId,
        patch: ElementPatch,
    },

    /// Remove an element, clearing the selection if it pointed at it
    RemoveElement(ElementId),

    /// Replace the selection
    SelectElement(Option<ElementId>),

    /// Give an element the highest z-index
    BringToFront(ElementId),

    /// Give an element the lowest z-index
    SendToBack(ElementId),

    /// Replace the canvas theme
    SetTheme(Theme),

    /// Remove every element and clear the selection
    ClearCanvas,
}

impl Command {
    /// Execute the command against the shared scene
    pub fn execute(&self, store: &SceneStore) {
        match self {
            Command::AddElement(draft) => {
                store.add_element(draft.clone());
            }
            Command::UpdateElement { element_id, patch } => {
                store.update_element(*element_id, patch.clone());
            }
            Command::RemoveElement(element_id) => store.remove_element(*element_id),
            Command::SelectElement(element_id) => store.select_element(*element_id),
            Command::BringToFront(element_id) => store.move_element_to_front(*element_id),
            Command::SendToBack(element_id) => store.move_element_to_back(*element_id),
            Command::SetTheme(theme) => store.set_theme(*theme),
            Command::ClearCanvas => store.clear_canvas(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::AddElement(_) => "Add Element",
            Command::UpdateElement { .. } => "Update Element",
            Command::RemoveElement(_) => "Remove Element",
            Command::SelectElement(_) => "Select Element",
            Command::BringToFront(_) => "Bring To Front",
            Command::SendToBack(_) => "Send To Back",
            Command::SetTheme(_) => "Set Theme",
            Command::ClearCanvas => "Clear Canvas",
        }
    }
}

/// Execute commands in order
pub fn execute_all(commands: &[Command], store: &SceneStore) {
    for command in commands {
        log::trace!("Executing {}", command.name());
        command.execute(store);
    }
}
