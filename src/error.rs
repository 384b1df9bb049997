use thiserror::Error;

use crate::twiml::RenderError;

#[derive(Debug, Error)]
pub enum RingbackError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
