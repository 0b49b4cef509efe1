//! ObservationScope - paired BEGIN/COMPLETE logging around one operation
//!
//! - `<NAME>_BEGIN` on creation
//! - `<NAME>_COMPLETE` on `complete()`
//! - `<NAME>_FAILED` on `fail()`
//! - `<NAME>_INCOMPLETE` (WARN) if dropped without either

use super::logger::Logger;

/// Logs the begin and end of a multi-step operation such as seeding.
pub struct ObservationScope {
    name: &'static str,
    finished: bool,
}

impl ObservationScope {
    pub fn new(name: &'static str) -> Self {
        Logger::info(&format!("{}_BEGIN", name), &[]);
        Self {
            name,
            finished: false,
        }
    }

    /// Log `<NAME>_COMPLETE` with optional fields.
    pub fn complete(mut self, fields: &[(&str, &str)]) {
        self.finished = true;
        Logger::info(&format!("{}_COMPLETE", self.name), fields);
    }

    /// Log `<NAME>_FAILED` at ERROR with a reason.
    pub fn fail(mut self, reason: &str) {
        self.finished = true;
        Logger::error(&format!("{}_FAILED", self.name), &[("reason", reason)]);
    }
}

impl Drop for ObservationScope {
    fn drop(&mut self) {
        if !self.finished {
            Logger::warn(
                &format!("{}_INCOMPLETE", self.name),
                &[("reason", "scope dropped without completion")],
            );
        }
    }
}
