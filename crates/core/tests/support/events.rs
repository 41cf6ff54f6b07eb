use std::sync::Mutex;

use jiralink_core::{DispatchEvent, EventSink};
use jiralink_domain::LogLevel;

/// Sink that keeps every event for assertions
#[derive(Default)]
pub struct RecordingEventSink {
    events: Mutex<Vec<DispatchEvent>>,
}

impl RecordingEventSink {
    pub fn events(&self) -> Vec<DispatchEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.events.lock().unwrap().iter().map(DispatchEvent::name).collect()
    }

    pub fn count_at(&self, level: LogLevel) -> usize {
        self.events.lock().unwrap().iter().filter(|e| e.level() == level).count()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }
}

impl EventSink for RecordingEventSink {
    fn emit(&self, event: &DispatchEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}
