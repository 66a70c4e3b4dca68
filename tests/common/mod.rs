#![allow(dead_code)]

use iad_verify::{DiagnosticEvent, DiagnosticSink};
use std::sync::Mutex;

/// Keeps a Debug rendering of every event it sees.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl DiagnosticSink for RecordingSink {
    fn record(&self, event: &DiagnosticEvent<'_>) {
        self.events.lock().unwrap().push(format!("{event:?}"));
    }
}

pub const JPEG_HEADER: [u8; 6] = [0xff, 0xd8, 0xff, 0xe0, 0x00, 0x10];
pub const JPEG_HEADER_DATA_URI: &str = "data:image/jpeg;base64,/9j/4AAQ";
