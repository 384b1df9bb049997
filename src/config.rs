//! Configuração do ringback carregada a partir de `ringback.toml`.
//!
//! A struct [`RingbackConfig`] contém todos os parâmetros configuráveis.
//! Valores não presentes no arquivo usam defaults sensíveis.
//! A variável de ambiente `RINGBACK_CRM_TOKEN` tem precedência sobre o arquivo.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::flow::DEFAULT_DIAL_CLIENT;

/// Arquivo lido quando nenhum `--config` é informado.
pub const DEFAULT_CONFIG_PATH: &str = "ringback.toml";

/// Configuração de nível superior carregada de `ringback.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct RingbackConfig {
    /// Endereço em que o servidor de webhooks escuta.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Filtro de log usado quando `RUST_LOG` não está definido.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emite logs em JSON em vez de texto.
    #[serde(default)]
    pub log_json: bool,

    /// Cliente discado ao receber uma chamada.
    #[serde(default = "default_dial_client")]
    pub dial_client: String,

    /// Onde os pedidos de retorno são registrados.
    #[serde(default)]
    pub store: StoreConfig,
}

/// Backend do armazenamento de pedidos de retorno.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StoreConfig {
    /// Apenas registra as chamadas no log.
    #[default]
    Logging,
    /// API REST do CRM.
    Crm {
        base_url: String,
        #[serde(default)]
        token: String,
    },
}

// Valor padrão para o endereço: todas as interfaces, porta 5000.
fn default_bind_addr() -> String {
    "0.0.0.0:5000".to_string()
}

// Valor padrão para o nível de log: "info".
fn default_log_level() -> String {
    "info".to_string()
}

fn default_dial_client() -> String {
    DEFAULT_DIAL_CLIENT.to_string()
}

impl Default for RingbackConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            log_level: default_log_level(),
            log_json: false,
            dial_client: default_dial_client(),
            store: StoreConfig::default(),
        }
    }
}

impl RingbackConfig {
    /// Carrega a configuração de `path`.
    /// Usa valores padrão se o arquivo não existir.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            toml::from_str::<RingbackConfig>(&contents)
                .with_context(|| format!("parsing {}", path.display()))?
        } else {
            Self::default()
        };

        // Variável de ambiente tem precedência sobre o arquivo para o token do CRM.
        if let Ok(token) = std::env::var("RINGBACK_CRM_TOKEN")
            && !token.is_empty()
        {
            config.apply_crm_token(token);
        }

        Ok(config)
    }

    fn apply_crm_token(&mut self, value: String) {
        if let StoreConfig::Crm { token, .. } = &mut self.store {
            *token = value;
        }
    }
}
