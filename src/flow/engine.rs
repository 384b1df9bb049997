use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::state::{CallFlow, CallbackForm, Step, StoreEffect};
use crate::store::CallbackStore;
use crate::twiml::{EntryPoint, VoiceResponse};

/// Runs [`CallFlow`] transitions and performs their store writes.
#[derive(Debug)]
pub struct CallFlowEngine<S> {
    flow: CallFlow,
    store: Arc<S>,
}

impl<S> CallFlowEngine<S>
where
    S: CallbackStore + Send + Sync + 'static,
{
    pub fn new(flow: CallFlow, store: S) -> Self {
        Self {
            flow,
            store: Arc::new(store),
        }
    }

    /// Handle one webhook. The response never waits on the store.
    pub fn handle(&self, entry: EntryPoint, form: &CallbackForm) -> VoiceResponse {
        self.handle_detached(entry, form).0
    }

    /// Like [`handle`](Self::handle), also returning the spawned store
    /// write so callers that care (the demo, tests) can wait for it.
    pub fn handle_detached(
        &self,
        entry: EntryPoint,
        form: &CallbackForm,
    ) -> (VoiceResponse, Option<JoinHandle<()>>) {
        let Step { response, effect } = self.flow.step(entry, form);

        info!(
            call_sid = %form.call_sid,
            state = %entry,
            next = ?response.next_primary(),
            fallthrough = ?response.next_fallthrough(),
            ends_call = response.ends_call(),
            "call flow transition"
        );

        let write = effect.map(|effect| {
            let store = Arc::clone(&self.store);
            tokio::spawn(async move { apply(store.as_ref(), effect).await })
        });

        (response, write)
    }
}

async fn apply<S: CallbackStore>(store: &S, effect: StoreEffect) {
    debug!(?effect, "applying store effect");
    match effect {
        StoreEffect::CreateCallback {
            call_sid,
            phone_number,
        } => store.create_callback(&call_sid, &phone_number).await,
        StoreEffect::AddTranscript {
            call_sid,
            transcript,
        } => store.add_transcript(&call_sid, &transcript).await,
    }
}
