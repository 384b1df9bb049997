//! Tipos de erro para o cliente REST do CRM.
//!
//! Nenhum destes erros chega ao fluxo da chamada: o [`CrmStore`](super::CrmStore)
//! registra o erro no log e segue em frente.

use thiserror::Error;

/// Erros que podem ocorrer ao falar com a API do CRM.
#[derive(Debug, Error)]
pub enum CrmError {
    /// Erro retornado pela API (ex.: 401 token inválido, 500 erro interno).
    #[error("CRM API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    /// Falha de rede ou de decodificação do corpo da resposta.
    #[error("network error: {0}")]
    NetworkError(#[from] reqwest::Error),
}
