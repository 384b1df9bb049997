//! Corpos JSON trocados com a API REST do CRM.
//!
//! Listagens seguem o envelope `{ "value": [...] }`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Envelope de listagem retornado pelos endpoints de consulta.
#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
}

/// Registro mínimo retornado pela API: só o identificador interessa.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EntityRef {
    pub id: String,
}

/// Corpo para criar um contato a partir do número informado.
#[derive(Debug, Clone, Serialize)]
pub struct NewContact<'a> {
    pub mobilephone: &'a str,
}

/// Corpo para criar o pedido de retorno de ligação.
#[derive(Debug, Clone, Serialize)]
pub struct NewCallback<'a> {
    pub subject: String,
    pub call_sid: &'a str,
    pub phone_number: &'a str,
    pub contact_id: &'a str,
    pub requested_at: DateTime<Utc>,
}

impl<'a> NewCallback<'a> {
    pub fn new(call_sid: &'a str, phone_number: &'a str, contact_id: &'a str) -> Self {
        Self {
            subject: format!("Callback requested by {phone_number}"),
            call_sid,
            phone_number,
            contact_id,
            requested_at: Utc::now(),
        }
    }
}

/// Atualização parcial que anexa a transcrição ao pedido.
#[derive(Debug, Clone, Serialize)]
pub struct TranscriptPatch<'a> {
    pub transcript: &'a str,
}
