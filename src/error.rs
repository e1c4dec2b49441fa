//! Error types

/// Errors surfaced by stage setup, artwork parsing and settings I/O
#[derive(Debug, thiserror::Error)]
pub enum BeanError {
    #[error("no stage element to draw into")]
    MissingStage,
    #[error("artwork template: {0}")]
    Template(String),
    #[error("settings: {0}")]
    Settings(#[from] serde_json::Error),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
