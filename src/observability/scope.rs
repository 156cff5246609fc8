//! Begin/complete logging around one unit of work
//!
//! `{name}_BEGIN` is logged at TRACE on creation. Exactly one of
//! `{name}_COMPLETE` (INFO), `{name}_FAILED` (ERROR) or `{name}_INCOMPLETE`
//! (WARN, on drop) follows, each carrying the scope fields and `elapsed_ms`.

use std::time::Instant;

use super::logger::Logger;

pub struct ObservationScope {
    name: String,
    fields: Vec<(String, String)>,
    timer: Timer,
    finished: bool,
}

impl ObservationScope {
    pub fn new(name: &str) -> Self {
        Self::with_fields(name, &[])
    }

    pub fn with_fields(name: &str, fields: &[(&str, &str)]) -> Self {
        Logger::trace(&format!("{}_BEGIN", name), fields);
        Self {
            name: name.to_string(),
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            timer: Timer::new(),
            finished: false,
        }
    }

    /// Attach a field to every later line of this scope
    pub fn add_field(&mut self, key: &str, value: impl Into<String>) {
        self.fields.push((key.to_string(), value.into()));
    }

    pub fn complete(mut self, extra: &[(&str, &str)]) {
        self.finished = true;
        let elapsed = self.timer.elapsed_ms();
        let fields = self.collect_fields(extra, &elapsed);
        Logger::info(&format!("{}_COMPLETE", self.name), &fields);
    }

    pub fn fail(mut self, reason: &str) {
        self.finished = true;
        let elapsed = self.timer.elapsed_ms();
        let fields = self.collect_fields(&[("reason", reason)], &elapsed);
        Logger::error(&format!("{}_FAILED", self.name), &fields);
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    fn collect_fields<'a>(
        &'a self,
        extra: &[(&'a str, &'a str)],
        elapsed: &'a str,
    ) -> Vec<(&'a str, &'a str)> {
        let mut fields: Vec<(&str, &str)> = self
            .fields
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        fields.extend(extra.iter().copied());
        fields.push(("elapsed_ms", elapsed));
        fields
    }
}

impl Drop for ObservationScope {
    fn drop(&mut self) {
        if !self.finished {
            let elapsed = self.timer.elapsed_ms();
            let fields = self.collect_fields(&[("reason", "scope dropped")], &elapsed);
            Logger::warn(&format!("{}_INCOMPLETE", self.name), &fields);
        }
    }
}

/// Wall-clock timer for `elapsed_ms` fields
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> String {
        self.start.elapsed().as_millis().to_string()
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_marks_finished() {
        let scope = ObservationScope::new("TEST");
        assert!(!scope.is_finished());
        scope.complete(&[("rows", "1")]);
    }

    #[test]
    fn test_fail_and_drop_do_not_panic() {
        let mut scope = ObservationScope::with_fields("TEST", &[("request_id", "r1")]);
        scope.add_field("dialect", "sqlite");
        scope.fail("store unavailable");

        let scope = ObservationScope::new("TEST");
        drop(scope);
    }

    #[test]
    fn test_timer_reports_millis() {
        let timer = Timer::new();
        assert!(timer.elapsed_ms().parse::<u128>().is_ok());
    }
}
