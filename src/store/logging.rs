use tracing::info;

use super::CallbackStore;

/// Store that only logs what it is asked to record.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingStore;

impl CallbackStore for LoggingStore {
    async fn create_callback(&self, call_sid: &str, phone_number: &str) {
        info!(call_sid, phone_number, "create_callback");
    }

    async fn add_transcript(&self, call_sid: &str, transcript: &str) {
        info!(call_sid, transcript, "add_transcript");
    }
}
