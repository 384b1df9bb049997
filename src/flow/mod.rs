mod engine;
mod state;

pub use engine::CallFlowEngine;
pub use state::{CallFlow, CallbackForm, DEFAULT_DIAL_CLIENT};

#[cfg(test)]
pub(crate) use engine::tests::RecordingStore;
#[cfg(test)]
pub(crate) use state::StoreEffect;
