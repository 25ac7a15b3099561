//! The "Save Story" progress sequence.
//!
//! Saving does not write anything. It is a timed progress animation that,
//! once it reaches 100%, puts the header into saved mode where the export
//! actions become available. It is the only sequence the user can cancel.

pub const STEP_PERCENT: u8 = 2;
pub const STEP_INTERVAL_SECS: f64 = 0.04;
/// Delay between reaching 100% and reporting completion
pub const COMPLETION_DELAY_SECS: f64 = 2.0;

pub const SAVING_MESSAGE: &str = "Saving your story...";
pub const SAVED_MESSAGE: &str = "Journal saved successfully!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatus {
    Running,
    /// Reached 100%, waiting out the completion delay
    Succeeded,
    /// The completion delay elapsed; reported exactly once by `tick`
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SaveProgress {
    started_at: f64,
    progress: u8,
    finished_at: Option<f64>,
    status: SaveStatus,
}

impl SaveProgress {
    pub fn start(now: f64) -> Self {
        log::info!("💾 Saving story");
        Self {
            started_at: now,
            progress: 0,
            finished_at: None,
            status: SaveStatus::Running,
        }
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn status(&self) -> SaveStatus {
        self.status
    }

    pub fn message(&self) -> &'static str {
        match self.status {
            SaveStatus::Succeeded | SaveStatus::Completed => SAVED_MESSAGE,
            _ => SAVING_MESSAGE,
        }
    }

    /// Cancellation only applies before the bar is full
    pub fn can_cancel(&self) -> bool {
        self.status == SaveStatus::Running
    }

    pub fn cancel(&mut self) {
        if self.can_cancel() {
            log::info!("Save cancelled at {}%", self.progress);
            self.status = SaveStatus::Cancelled;
        }
    }

    /// Advance to `now`. Returns true on the tick that completes the save.
    pub fn tick(&mut self, now: f64) -> bool {
        match self.status {
            SaveStatus::Running => {
                let steps = ((now - self.started_at) / STEP_INTERVAL_SECS).floor().max(0.0);
                let percent = (steps * STEP_PERCENT as f64).min(100.0) as u8;
                self.progress = self.progress.max(percent);
                if self.progress >= 100 {
                    // The moment the last step was due, not the moment we noticed
                    let reached_at =
                        self.started_at + (100 / STEP_PERCENT) as f64 * STEP_INTERVAL_SECS;
                    self.finished_at = Some(reached_at);
                    self.status = SaveStatus::Succeeded;
                    return self.tick(now);
                }
                false
            }
            SaveStatus::Succeeded => {
                let due = self.finished_at.unwrap_or(now) + COMPLETION_DELAY_SECS;
                if now >= due {
                    self.status = SaveStatus::Completed;
                    log::info!("✅ {}", SAVED_MESSAGE);
                    true
                } else {
                    false
                }
            }
            SaveStatus::Completed | SaveStatus::Cancelled => false,
        }
    }

    /// Still worth drawing and repainting for
    pub fn is_active(&self) -> bool {
        matches!(self.status, SaveStatus::Running | SaveStatus::Succeeded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_two_percent_per_step() {
        let mut save = SaveProgress::start(10.0);
        assert!(!save.tick(10.0 + 0.041));
        assert_eq!(save.progress(), 2);
        assert!(!save.tick(10.0 + 0.41));
        assert_eq!(save.progress(), 20);
        assert_eq!(save.message(), SAVING_MESSAGE);
    }

    #[test]
    fn completes_two_seconds_after_full() {
        let mut save = SaveProgress::start(0.0);
        assert!(!save.tick(2.01));
        assert_eq!(save.progress(), 100);
        assert_eq!(save.status(), SaveStatus::Succeeded);
        assert_eq!(save.message(), SAVED_MESSAGE);
        assert!(!save.can_cancel());

        assert!(!save.tick(3.9));
        assert!(save.tick(4.01));
        assert_eq!(save.status(), SaveStatus::Completed);
        // Reported once
        assert!(!save.tick(5.0));
    }

    #[test]
    fn cancel_stops_before_completion() {
        let mut save = SaveProgress::start(0.0);
        save.tick(1.0);
        save.cancel();
        assert_eq!(save.status(), SaveStatus::Cancelled);
        assert!(!save.tick(10.0));
        assert!(!save.is_active());
    }
}
