use thiserror::Error;

#[derive(Error, Debug)]
pub enum SiftError {
    #[error("Markup error at byte {position}: {message}")]
    Markup { position: usize, message: String },

    #[error("Invalid selector '{selector}': {reason}")]
    Selector { selector: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, SiftError>;

impl SiftError {
    pub(crate) fn selector(selector: &str, reason: impl Into<String>) -> Self {
        SiftError::Selector {
            selector: selector.to_string(),
            reason: reason.into(),
        }
    }
}
