use egui::{Align2, Color32, RichText};

pub const TOAST_LIFETIME_SECS: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

impl ToastKind {
    fn color(&self) -> Color32 {
        match self {
            ToastKind::Success => Color32::from_rgb(34, 197, 94),
            ToastKind::Error => Color32::from_rgb(239, 68, 68),
        }
    }

    fn icon(&self) -> &'static str {
        match self {
            ToastKind::Success => "✔",
            ToastKind::Error => "⚠",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub kind: ToastKind,
    pub title: String,
    pub message: String,
    pub created_at: f64,
}

impl Toast {
    pub fn is_expired(&self, now: f64) -> bool {
        now - self.created_at >= TOAST_LIFETIME_SECS
    }
}

/// User-visible success and error messages, newest last.
#[derive(Debug, Default)]
pub struct Notifications {
    toasts: Vec<Toast>,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success(&mut self, title: impl Into<String>, message: impl Into<String>, now: f64) {
        self.push(ToastKind::Success, title.into(), message.into(), now);
    }

    pub fn error(&mut self, title: impl Into<String>, message: impl Into<String>, now: f64) {
        self.push(ToastKind::Error, title.into(), message.into(), now);
    }

    fn push(&mut self, kind: ToastKind, title: String, message: String, now: f64) {
        self.toasts.push(Toast {
            kind,
            title,
            message,
            created_at: now,
        });
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    /// Drop expired toasts
    pub fn prune(&mut self, now: f64) {
        self.toasts.retain(|toast| !toast.is_expired(now));
    }

    /// Draw the live toasts stacked in the top-right corner.
    pub fn show(&mut self, ctx: &egui::Context) {
        let now = ctx.input(|i| i.time);
        self.prune(now);
        if self.toasts.is_empty() {
            return;
        }

        egui::Area::new(egui::Id::new("toasts"))
            .anchor(Align2::RIGHT_TOP, egui::vec2(-16.0, 16.0))
            .order(egui::Order::Foreground)
            .interactable(false)
            .show(ctx, |ui| {
                for toast in &self.toasts {
                    egui::Frame::popup(ui.style())
                        .stroke(egui::Stroke::new(1.5, toast.kind.color()))
                        .show(ui, |ui| {
                            ui.set_max_width(280.0);
                            ui.horizontal(|ui| {
                                ui.label(
                                    RichText::new(toast.kind.icon())
                                        .color(toast.kind.color())
                                        .size(18.0),
                                );
                                ui.vertical(|ui| {
                                    ui.strong(&toast.title);
                                    ui.label(&toast.message);
                                });
                            });
                        });
                    ui.add_space(6.0);
                }
            });

        // Wake up again to expire the oldest toast
        if let Some(oldest) = self.toasts.first() {
            let remaining = (oldest.created_at + TOAST_LIFETIME_SECS - now).max(0.0);
            ctx.request_repaint_after(std::time::Duration::from_secs_f64(remaining));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toasts_expire_after_lifetime() {
        let mut notifications = Notifications::new();
        notifications.success("Saved", "Journal saved successfully!", 1.0);
        notifications.error("Export failed", "capture", 3.0);

        notifications.prune(4.9);
        assert_eq!(notifications.toasts().len(), 2);

        notifications.prune(5.0);
        assert_eq!(notifications.toasts().len(), 1);
        assert_eq!(notifications.toasts()[0].kind, ToastKind::Error);

        notifications.prune(7.0);
        assert!(notifications.is_empty());
    }
}
