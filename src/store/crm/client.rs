use std::fmt;
use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{error, info, warn};

use super::error::CrmError;
use super::types::{EntityRef, ListResponse, NewCallback, NewContact, TranscriptPatch};
use crate::store::CallbackStore;

/// Callback store backed by the CRM's REST API.
#[derive(Clone)]
pub struct CrmStore {
    token: String,
    client: Client,
    base_url: String,
}

impl fmt::Debug for CrmStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrmStore")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl CrmStore {
    pub fn new(base_url: String, token: String) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(20))
            .build()
            .expect("failed to build HTTP client");
        Self {
            token,
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Find the contact owning `phone_number`, creating one unless exactly
    /// one match exists, then file the callback against it.
    pub async fn try_create_callback(
        &self,
        call_sid: &str,
        phone_number: &str,
    ) -> Result<String, CrmError> {
        let contacts: ListResponse<EntityRef> = self
            .send(
                self.authed(self.client.get(self.url("contacts")))
                    .query(&[("mobilephone", phone_number)]),
            )
            .await?;

        let contact_id = if let [contact] = contacts.value.as_slice() {
            contact.id.clone()
        } else {
            warn!(
                count = contacts.value.len(),
                phone_number, "contacts found with phone number, creating a new one"
            );
            let created: EntityRef = self
                .send(
                    self.authed(self.client.post(self.url("contacts")))
                        .json(&NewContact {
                            mobilephone: phone_number,
                        }),
                )
                .await?;
            info!(contact_id = %created.id, phone_number, "created contact");
            created.id
        };

        let callback: EntityRef = self
            .send(
                self.authed(self.client.post(self.url("callbacks")))
                    .json(&NewCallback::new(call_sid, phone_number, &contact_id)),
            )
            .await?;
        info!(callback_id = %callback.id, call_sid, "new callback created");
        Ok(callback.id)
    }

    /// Attach `transcript` to the callback filed for `call_sid`.
    /// Returns `Ok(None)` when there is no single matching callback.
    pub async fn try_add_transcript(
        &self,
        call_sid: &str,
        transcript: &str,
    ) -> Result<Option<String>, CrmError> {
        let callbacks: ListResponse<EntityRef> = self
            .send(
                self.authed(self.client.get(self.url("callbacks")))
                    .query(&[("call_sid", call_sid)]),
            )
            .await?;

        let [callback] = callbacks.value.as_slice() else {
            error!(
                count = callbacks.value.len(),
                call_sid, "callbacks returned for call sid, transcript dropped"
            );
            return Ok(None);
        };

        let response = self
            .authed(
                self.client
                    .patch(self.url(&format!("callbacks/{}", callback.id))),
            )
            .json(&TranscriptPatch { transcript })
            .send()
            .await?;
        Self::check(response).await?;

        info!(callback_id = %callback.id, "callback updated with transcript");
        Ok(Some(callback.id.clone()))
    }

    fn url(&self, resource: &str) -> String {
        format!("{}/{resource}", self.base_url)
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        if self.token.is_empty() {
            request
        } else {
            request.bearer_auth(&self.token)
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, CrmError> {
        let response = Self::check(request.send().await?).await?;
        Ok(response.json::<T>().await?)
    }

    async fn check(response: Response) -> Result<Response, CrmError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());
        Err(CrmError::ApiError {
            status: status.as_u16(),
            message,
        })
    }
}

impl CallbackStore for CrmStore {
    async fn create_callback(&self, call_sid: &str, phone_number: &str) {
        if let Err(e) = self.try_create_callback(call_sid, phone_number).await {
            error!(call_sid, error = %e, "failed to create callback");
        }
    }

    async fn add_transcript(&self, call_sid: &str, transcript: &str) {
        if let Err(e) = self.try_add_transcript(call_sid, transcript).await {
            error!(call_sid, error = %e, "failed to add transcript");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn store(server: &MockServer) -> CrmStore {
        CrmStore::new(format!("{}/", server.uri()), "crm-token".into())
    }

    #[tokio::test]
    async fn reuses_single_matching_contact() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/contacts"))
            .and(query_param("mobilephone", "5551234567"))
            .and(header("authorization", "Bearer crm-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": [{"id": "c-1"}]})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/contacts"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "unused"})))
            .expect(0)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/callbacks"))
            .and(body_partial_json(json!({
                "call_sid": "CA1",
                "phone_number": "5551234567",
                "contact_id": "c-1",
                "subject": "Callback requested by 5551234567",
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "cb-1"})))
            .expect(1)
            .mount(&server)
            .await;

        let id = store(&server)
            .try_create_callback("CA1", "5551234567")
            .await
            .unwrap();
        assert_eq!(id, "cb-1");
    }

    #[tokio::test]
    async fn creates_contact_when_none_match() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/contacts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": []})))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/contacts"))
            .and(body_partial_json(json!({"mobilephone": "5551234567"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "c-new"})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/callbacks"))
            .and(body_partial_json(json!({"contact_id": "c-new"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "cb-2"})))
            .expect(1)
            .mount(&server)
            .await;

        let id = store(&server)
            .try_create_callback("CA2", "5551234567")
            .await
            .unwrap();
        assert_eq!(id, "cb-2");
    }

    #[tokio::test]
    async fn api_error_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/contacts"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let err = store(&server)
            .try_create_callback("CA3", "5551234567")
            .await
            .unwrap_err();
        match err {
            CrmError::ApiError { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "boom");
            }
            other => panic!("expected ApiError, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn transcript_patches_matching_callback() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/callbacks"))
            .and(query_param("call_sid", "CA1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": [{"id": "cb-1"}]})))
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/callbacks/cb-1"))
            .and(body_partial_json(json!({"transcript": "call me back please"})))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let updated = store(&server)
            .try_add_transcript("CA1", "call me back please")
            .await
            .unwrap();
        assert_eq!(updated.as_deref(), Some("cb-1"));
    }

    #[tokio::test]
    async fn transcript_without_record_is_skipped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/callbacks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": []})))
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .respond_with(ResponseTemplate::new(204))
            .expect(0)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let updated = store(&server)
            .try_add_transcript("CA-unknown", "hello")
            .await
            .unwrap();
        assert_eq!(updated, None);
    }

    #[tokio::test]
    async fn trait_calls_swallow_failures() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(2)
            .mount(&server)
            .await;

        let store = store(&server);
        store.create_callback("CA1", "5551234567").await;
        store.add_transcript("CA1", "hello").await;
    }
}
