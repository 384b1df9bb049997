//! Callback record stores.
//!
//! The call flow only ever writes to a store, and a store never reports
//! failure back to it: any error is logged where it happens.

mod crm;
mod logging;

use std::future::Future;

pub use crm::CrmStore;
pub use logging::LoggingStore;

use crate::config::{RingbackConfig, StoreConfig};

/// Capability to record callback requests and their voicemail transcripts.
pub trait CallbackStore {
    /// Register a callback request for `phone_number` on call `call_sid`.
    fn create_callback(&self, call_sid: &str, phone_number: &str) -> impl Future<Output = ()> + Send;

    /// Attach a transcript to the callback created for `call_sid`.
    /// Without a matching record this logs and does nothing.
    fn add_transcript(&self, call_sid: &str, transcript: &str) -> impl Future<Output = ()> + Send;
}

/// The store variant picked at start-up from configuration.
#[derive(Debug, Clone)]
pub enum Store {
    Logging(LoggingStore),
    Crm(CrmStore),
}

impl Store {
    pub fn from_config(config: &RingbackConfig) -> Self {
        match &config.store {
            StoreConfig::Logging => Store::Logging(LoggingStore),
            StoreConfig::Crm { base_url, token } => {
                Store::Crm(CrmStore::new(base_url.clone(), token.clone()))
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Store::Logging(_) => "logging",
            Store::Crm(_) => "crm",
        }
    }
}

impl CallbackStore for Store {
    async fn create_callback(&self, call_sid: &str, phone_number: &str) {
        match self {
            Store::Logging(store) => store.create_callback(call_sid, phone_number).await,
            Store::Crm(store) => store.create_callback(call_sid, phone_number).await,
        }
    }

    async fn add_transcript(&self, call_sid: &str, transcript: &str) {
        match self {
            Store::Logging(store) => store.add_transcript(call_sid, transcript).await,
            Store::Crm(store) => store.add_transcript(call_sid, transcript).await,
        }
    }
}
