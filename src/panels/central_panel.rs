use eframe::egui::{self, CursorIcon, Pos2, Rect, Sense, Vec2};

use crate::animation::{AppearAnimation, ThemePulse};
use crate::command::Command;
use crate::element::{CanvasElement, ElementId};
use crate::interaction::{InteractionController, PointerEvent};
use crate::renderer::{self, RenderTransform};
use crate::scene::{Scene, SceneStore};
use crate::widgets::{ElementHandles, HandleKind};

const CANVAS_MARGIN: f32 = 24.0;

/// What a pointer press on the canvas area landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressTarget {
    Handle(ElementId, HandleKind),
    Body(ElementId),
    Empty,
}

/// Resolve a press: handles of the selected element first, then the
/// topmost element body, then empty canvas.
///
/// `pointer` is in screen space; `origin` is the canvas top-left.
pub fn press_target(
    scene: &Scene,
    handles: Option<&(ElementId, ElementHandles)>,
    pointer: Pos2,
    origin: Pos2,
) -> PressTarget {
    if let Some((id, handles)) = handles {
        if let Some(kind) = handles.hit(pointer) {
            return PressTarget::Handle(*id, kind);
        }
    }
    let local = (pointer - origin).to_pos2();
    match scene.element_at(local) {
        Some(element) => PressTarget::Body(element.id),
        None => PressTarget::Empty,
    }
}

/// The themed canvas with every element in z-order, and the routing of
/// pointer input to the interaction controller.
#[derive(Debug)]
pub struct CanvasSurface {
    controller: InteractionController,
    theme_pulse: ThemePulse,
    appear: Option<AppearAnimation>,
    last_count: usize,
    /// Screen rect of the canvas as of the last frame
    canvas_rect: Option<Rect>,
    /// Element whose text box still needs keyboard focus
    focus_pending: Option<ElementId>,
}

impl Default for CanvasSurface {
    fn default() -> Self {
        Self {
            controller: InteractionController::new(),
            theme_pulse: ThemePulse::new(Default::default()),
            appear: None,
            last_count: 0,
            canvas_rect: None,
            focus_pending: None,
        }
    }
}

impl CanvasSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn canvas_rect(&self) -> Option<Rect> {
        self.canvas_rect
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    /// Commit any in-progress text edit, e.g. before a capture
    pub fn finish_editing(&mut self, store: &SceneStore) {
        if self.controller.editing().is_some() {
            self.controller.finish_active(store);
        }
    }

    pub fn show(&mut self, ctx: &egui::Context, store: &SceneStore, canvas_size: Vec2) {
        egui::CentralPanel::default().show(ctx, |ui| {
            self.ui(ui, store, canvas_size);
        });
    }

    pub fn ui(&mut self, ui: &mut egui::Ui, store: &SceneStore, canvas_size: Vec2) {
        let now = ui.input(|i| i.time);

        // Selection may have moved (tool panel, delete) since the last frame.
        // Syncing can commit a pending edit, so read the scene again after it.
        self.controller.sync(store, &store.snapshot());
        let scene = store.snapshot();
        self.track_animations(&scene, now);

        let available = ui.available_rect_before_wrap();
        let response = ui.allocate_rect(available, Sense::click_and_drag());
        let offset = ((available.size() - canvas_size) * 0.5).max(Vec2::splat(CANVAS_MARGIN));
        let canvas_rect = Rect::from_min_size(available.min + offset, canvas_size);
        let origin = canvas_rect.min;
        self.canvas_rect = Some(canvas_rect);

        renderer::paint_backdrop(ui.painter(), available);
        renderer::paint_background(
            ui.painter(),
            canvas_rect,
            scene.theme(),
            self.theme_pulse.scale(now),
        );

        let handles = self.selected_handles(&scene, origin);
        let pointer = ui.input(|i| i.pointer.interact_pos());
        let hovered_handle = pointer
            .filter(|_| response.hovered())
            .and_then(|pos| handles.as_ref().and_then(|(_, h)| h.hit(pos)));

        // Elements, clipped to the canvas
        let previous_clip = ui.clip_rect();
        ui.set_clip_rect(previous_clip.intersect(canvas_rect));
        let editing = self.controller.editing().map(|(id, _)| id);
        for element in scene.sorted_by_z() {
            if editing == Some(element.id) {
                continue;
            }
            renderer::paint_element(ui, element, self.transform_for(element, origin, now));
        }
        ui.set_clip_rect(previous_clip);

        if let Some((_, handles)) = &handles {
            handles.paint(ui.painter(), hovered_handle);
        }

        self.text_editor(ui, store, &scene, origin, canvas_size);
        self.route_pointer(ui, &response, store, &scene, handles.as_ref(), origin, canvas_size);
        self.delete_shortcut(ui, store, &scene);

        match hovered_handle {
            Some(kind) => {
                ui.ctx().set_cursor_icon(kind.cursor_icon());
                response.on_hover_text_at_pointer(kind.tooltip());
            }
            None if self.controller.is_tracking_pointer() => {
                ui.ctx().set_cursor_icon(CursorIcon::Grabbing);
            }
            None => {
                let over_element = pointer
                    .filter(|_| response.hovered())
                    .is_some_and(|pos| scene.element_at((pos - origin).to_pos2()).is_some());
                if over_element {
                    ui.ctx().set_cursor_icon(CursorIcon::Move);
                }
            }
        }

        let animating = self.theme_pulse.is_running(now)
            || self.appear.is_some_and(|appear| appear.is_running(now));
        if animating {
            ui.ctx().request_repaint();
        }
    }

    fn track_animations(&mut self, scene: &Scene, now: f64) {
        self.theme_pulse.observe(scene.theme(), now);
        if scene.len() > self.last_count {
            self.appear = scene
                .elements()
                .last()
                .map(|element| AppearAnimation::new(element.id, now));
        }
        self.last_count = scene.len();
        if self.appear.is_some_and(|appear| !appear.is_running(now)) {
            self.appear = None;
        }
    }

    fn transform_for(&self, element: &CanvasElement, origin: Pos2, now: f64) -> RenderTransform {
        let mut transform = RenderTransform::for_element(element, origin);
        if let Some(preview) = self.controller.drag_preview(element.id) {
            transform = transform.at(preview, origin).dragging();
        }
        if let Some(appear) = self.appear.filter(|appear| appear.element_id == element.id) {
            let (opacity, scale) = appear.sample(now);
            transform = transform.animated(opacity, scale);
        }
        transform
    }

    fn selected_handles(&self, scene: &Scene, origin: Pos2) -> Option<(ElementId, ElementHandles)> {
        let element = scene.selected_element()?;
        let transform = match self.controller.drag_preview(element.id) {
            Some(preview) => RenderTransform::for_element(element, origin).at(preview, origin),
            None => RenderTransform::for_element(element, origin),
        };
        let handles = ElementHandles::layout(
            transform.rect,
            transform.angle,
            element.kind.supports_text_edit(),
        );
        Some((element.id, handles))
    }

    /// In-place text box for the element being edited
    fn text_editor(
        &mut self,
        ui: &mut egui::Ui,
        store: &SceneStore,
        scene: &Scene,
        origin: Pos2,
        bounds: Vec2,
    ) {
        let Some((id, draft)) = self.controller.editing() else {
            self.focus_pending = None;
            return;
        };
        let Some(element) = scene.element(id) else {
            return;
        };

        let style = element.effective_text_style();
        let rect = element.rect().translate(origin.to_vec2());
        let mut text = draft.to_owned();
        let response = ui.put(
            rect,
            egui::TextEdit::multiline(&mut text)
                .font(style.font_id())
                .text_color(style.font_color)
                .frame(false)
                .desired_width(rect.width()),
        );

        if self.focus_pending == Some(id) {
            response.request_focus();
            self.focus_pending = None;
        }
        if response.changed() {
            self.controller
                .handle(store, id, PointerEvent::DraftChanged(text), bounds);
        }
        if response.lost_focus() {
            self.controller.handle(store, id, PointerEvent::EditFinished, bounds);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn route_pointer(
        &mut self,
        ui: &egui::Ui,
        response: &egui::Response,
        store: &SceneStore,
        scene: &Scene,
        handles: Option<&(ElementId, ElementHandles)>,
        origin: Pos2,
        bounds: Vec2,
    ) {
        let (pressed, released, down, pos) = ui.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.primary_down(),
                i.pointer.interact_pos(),
            )
        });
        let to_local = |pos: Pos2| (pos - origin).to_pos2();

        // An active gesture owns the pointer until release, wherever it goes
        if let Some(active) = self.controller.active_element() {
            if self.controller.is_tracking_pointer() {
                if let Some(pos) = pos {
                    self.controller
                        .handle(store, active, PointerEvent::Moved { pointer: to_local(pos) }, bounds);
                }
                if down && !released {
                    return;
                }
                self.controller.handle(store, active, PointerEvent::Released, bounds);
            }
        }

        if response.double_clicked() {
            if let Some(pos) = pos {
                if let PressTarget::Body(id) = press_target(scene, None, pos, origin) {
                    if self.controller.handle(store, id, PointerEvent::EditRequested, bounds) {
                        self.focus_pending = Some(id);
                    }
                }
            }
            return;
        }

        if !(pressed && response.hovered()) {
            return;
        }
        let Some(pos) = pos else {
            return;
        };

        // Pressing anywhere outside the text box ends the edit, like a blur
        self.finish_editing(store);

        match press_target(scene, handles, pos, origin) {
            PressTarget::Handle(id, kind) => {
                let event = match kind {
                    HandleKind::Resize => PointerEvent::ResizePressed { pointer: to_local(pos) },
                    HandleKind::Rotate => PointerEvent::RotatePressed { pointer: to_local(pos) },
                    HandleKind::Edit => {
                        if self.controller.handle(store, id, PointerEvent::EditRequested, bounds) {
                            self.focus_pending = Some(id);
                        }
                        return;
                    }
                    HandleKind::BringToFront => {
                        Command::BringToFront(id).execute(store);
                        return;
                    }
                    HandleKind::SendToBack => {
                        Command::SendToBack(id).execute(store);
                        return;
                    }
                    HandleKind::Delete => {
                        self.controller.reset();
                        Command::RemoveElement(id).execute(store);
                        return;
                    }
                };
                self.controller.handle(store, id, event, bounds);
            }
            PressTarget::Body(id) => {
                self.controller.handle(
                    store,
                    id,
                    PointerEvent::BodyPressed { pointer: to_local(pos) },
                    bounds,
                );
            }
            PressTarget::Empty => {
                self.controller.reset();
                Command::SelectElement(None).execute(store);
            }
        }
    }

    fn delete_shortcut(&mut self, ui: &egui::Ui, store: &SceneStore, scene: &Scene) {
        if ui.ctx().wants_keyboard_input() || self.controller.editing().is_some() {
            return;
        }
        let Some(id) = scene.selected() else {
            return;
        };
        if ui.input(|i| i.key_pressed(egui::Key::Delete)) {
            self.controller.reset();
            Command::RemoveElement(id).execute(store);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementDraft;
    use egui::pos2;

    #[test]
    fn handles_win_over_bodies() {
        let mut scene = Scene::new();
        let below = scene.add_element(ElementDraft::sticker("a").at(pos2(100.0, 40.0)));
        let selected = scene.add_element(ElementDraft::sticker("b").at(pos2(100.0, 100.0)));
        scene.move_element_to_back(selected);
        scene.select_element(Some(selected));

        let origin = pos2(10.0, 10.0);
        let element = scene.element(selected).unwrap();
        let transform = RenderTransform::for_element(element, origin);
        let handles = ElementHandles::layout(transform.rect, transform.angle, false);
        let delete = handles.rect_of(HandleKind::Delete).unwrap();
        let with_handles = (selected, handles);

        // The delete button overlaps the element above; the handle still wins
        assert_eq!(
            scene.element_at((delete.center() - origin).to_pos2()).map(|e| e.id),
            Some(below)
        );
        assert_eq!(
            press_target(&scene, Some(&with_handles), delete.center(), origin),
            PressTarget::Handle(selected, HandleKind::Delete)
        );
    }

    #[test]
    fn empty_canvas_press_is_empty() {
        let scene = Scene::new();
        assert_eq!(
            press_target(&scene, None, pos2(5.0, 5.0), pos2(0.0, 0.0)),
            PressTarget::Empty
        );
    }
}
