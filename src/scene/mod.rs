//! The scene is the whole in-memory document: placed elements, the
//! current selection and the active theme.
//!
//! [`Scene`] holds the data and the mutation rules. [`SceneStore`] is the
//! shared handle every component receives; it is the only way anything
//! outside this module writes to a scene. Each store call takes the lock
//! once, so every mutation is a single atomic transition that the next
//! reader observes.

use std::sync::Arc;

use log::debug;
use parking_lot::{RwLock, RwLockReadGuard};

use crate::element::{CanvasElement, ElementDraft, ElementId, ElementPatch};

mod theme;

pub use theme::Theme;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    /// Insertion order. Rendering order comes from `z_index` only.
    elements: Vec<CanvasElement>,
    selected: Option<ElementId>,
    theme: Theme,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elements(&self) -> &[CanvasElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn selected(&self) -> Option<ElementId> {
        self.selected
    }

    pub fn selected_element(&self) -> Option<&CanvasElement> {
        self.selected.and_then(|id| self.element(id))
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn element(&self, id: ElementId) -> Option<&CanvasElement> {
        self.elements.iter().find(|element| element.id == id)
    }

    fn element_mut(&mut self, id: ElementId) -> Option<&mut CanvasElement> {
        self.elements.iter_mut().find(|element| element.id == id)
    }

    /// Elements in paint order: ascending `z_index`, ties in insertion order.
    pub fn sorted_by_z(&self) -> Vec<&CanvasElement> {
        let mut sorted: Vec<&CanvasElement> = self.elements.iter().collect();
        // sort_by_key is stable
        sorted.sort_by_key(|element| element.z_index);
        sorted
    }

    /// Topmost element under `pos` (canvas-local).
    pub fn element_at(&self, pos: egui::Pos2) -> Option<&CanvasElement> {
        self.sorted_by_z()
            .into_iter()
            .rev()
            .find(|element| element.contains(pos))
    }

    pub fn add_element(&mut self, draft: ElementDraft) -> ElementId {
        let id = ElementId::new();
        let z_index = self.elements.len() as i64;
        self.elements.push(draft.into_element(id, z_index));
        self.selected = Some(id);
        id
    }

    /// Returns false when `id` is unknown; that is not an error.
    pub fn update_element(&mut self, id: ElementId, patch: &ElementPatch) -> bool {
        match self.element_mut(id) {
            Some(element) => {
                patch.apply_to(element);
                true
            }
            None => false,
        }
    }

    pub fn remove_element(&mut self, id: ElementId) -> bool {
        let before = self.elements.len();
        self.elements.retain(|element| element.id != id);
        if self.selected == Some(id) {
            self.selected = None;
        }
        self.elements.len() != before
    }

    /// Unconditional; the caller is responsible for passing a live id.
    pub fn select_element(&mut self, id: Option<ElementId>) {
        self.selected = id;
    }

    pub fn move_element_to_front(&mut self, id: ElementId) -> bool {
        let Some(max) = self.elements.iter().map(|element| element.z_index).max() else {
            return false;
        };
        match self.element_mut(id) {
            Some(element) => {
                element.z_index = max + 1;
                true
            }
            None => false,
        }
    }

    pub fn move_element_to_back(&mut self, id: ElementId) -> bool {
        let Some(min) = self.elements.iter().map(|element| element.z_index).min() else {
            return false;
        };
        match self.element_mut(id) {
            Some(element) => {
                element.z_index = min - 1;
                true
            }
            None => false,
        }
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn clear(&mut self) {
        self.elements.clear();
        self.selected = None;
    }
}

/// Shared handle to the one scene of an editing session.
///
/// Cloning the store clones the handle, not the scene.
#[derive(Debug, Clone, Default)]
pub struct SceneStore {
    scene: Arc<RwLock<Scene>>,
}

impl SceneStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow the scene for reading. Do not call a mutating store method
    /// while the guard is alive.
    pub fn read(&self) -> RwLockReadGuard<'_, Scene> {
        self.scene.read()
    }

    /// A detached copy of the current scene.
    pub fn snapshot(&self) -> Scene {
        self.scene.read().clone()
    }

    pub fn element(&self, id: ElementId) -> Option<CanvasElement> {
        self.scene.read().element(id).cloned()
    }

    pub fn elements(&self) -> Vec<CanvasElement> {
        self.scene.read().elements().to_vec()
    }

    pub fn selected(&self) -> Option<ElementId> {
        self.scene.read().selected()
    }

    pub fn theme(&self) -> Theme {
        self.scene.read().theme()
    }

    pub fn len(&self) -> usize {
        self.scene.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.scene.read().is_empty()
    }

    /// Assigns a fresh id and `z_index = element count`, then selects it.
    pub fn add_element(&self, draft: ElementDraft) -> ElementId {
        let kind = draft.kind;
        let id = self.scene.write().add_element(draft);
        debug!("➕ Added {} element {}", kind.as_str(), id);
        id
    }

    /// Silently ignores unknown ids. Does not re-validate geometry.
    pub fn update_element(&self, id: ElementId, patch: ElementPatch) {
        if !self.scene.write().update_element(id, &patch) {
            debug!("Update for unknown element {} ignored", id);
        }
    }

    pub fn remove_element(&self, id: ElementId) {
        if self.scene.write().remove_element(id) {
            debug!("🗑️ Removed element {}", id);
        }
    }

    pub fn select_element(&self, id: Option<ElementId>) {
        self.scene.write().select_element(id);
    }

    pub fn move_element_to_front(&self, id: ElementId) {
        if self.scene.write().move_element_to_front(id) {
            debug!("Raised element {} to front", id);
        }
    }

    pub fn move_element_to_back(&self, id: ElementId) {
        if self.scene.write().move_element_to_back(id) {
            debug!("Lowered element {} to back", id);
        }
    }

    pub fn set_theme(&self, theme: Theme) {
        self.scene.write().set_theme(theme);
        debug!("🎨 Theme set to {}", theme.label());
    }

    /// Irreversible; confirmation is a UI concern.
    pub fn clear_canvas(&self) {
        self.scene.write().clear();
        debug!("🧹 Canvas cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::TextStyle;

    #[test]
    fn sorted_by_z_is_stable_among_ties() {
        let mut scene = Scene::new();
        let a = scene.add_element(ElementDraft::sticker("a"));
        let b = scene.add_element(ElementDraft::sticker("b"));
        scene.move_element_to_front(a);
        // New elements take the element count, which ties with `a` here
        let c = scene.add_element(ElementDraft::sticker("c"));
        assert_eq!(scene.element(a).map(|e| e.z_index), Some(2));
        assert_eq!(scene.element(c).map(|e| e.z_index), Some(2));

        let order: Vec<ElementId> = scene.sorted_by_z().iter().map(|e| e.id).collect();
        assert_eq!(order, vec![b, a, c]);
    }

    #[test]
    fn element_at_prefers_topmost() {
        let mut scene = Scene::new();
        let bottom = scene.add_element(ElementDraft::text("bottom", TextStyle::default()));
        let top = scene.add_element(ElementDraft::text("top", TextStyle::default()));
        let point = egui::pos2(150.0, 120.0);
        assert_eq!(scene.element_at(point).map(|e| e.id), Some(top));

        scene.move_element_to_front(bottom);
        assert_eq!(scene.element_at(point).map(|e| e.id), Some(bottom));
        assert!(scene.element_at(egui::pos2(5.0, 5.0)).is_none());
    }

    #[test]
    fn store_clones_share_one_scene() {
        let store = SceneStore::new();
        let other = store.clone();
        let id = store.add_element(ElementDraft::sticker("x"));
        assert_eq!(other.selected(), Some(id));
        assert_eq!(other.len(), 1);
    }
}
