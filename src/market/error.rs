use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketErrorKind {
    InvalidConfig,
    InvalidEntity,
    UnknownScenario,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct MarketError {
    pub kind: MarketErrorKind,
    pub message: String,
}

impl MarketError {
    pub fn new(kind: MarketErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

pub fn invalid_config(message: impl Into<String>) -> MarketError {
    MarketError::new(MarketErrorKind::InvalidConfig, message)
}

pub fn invalid_entity(message: impl Into<String>) -> MarketError {
    MarketError::new(MarketErrorKind::InvalidEntity, message)
}

pub fn unknown_scenario(message: impl Into<String>) -> MarketError {
    MarketError::new(MarketErrorKind::UnknownScenario, message)
}
