use thiserror::Error;

pub type Result<T> = std::result::Result<T, GovernanceError>;

#[derive(Error, Debug)]
pub enum GovernanceError {
    #[error("Rule not found: {0}")]
    NotFound(String),

    #[error("Malformed rule document at {path}: {source}")]
    MalformedDocument {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Configuration store error: {0}")]
    ConfigStore(anyhow::Error),

    #[error("Service registry error: {0}")]
    Registry(anyhow::Error),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),
}

impl GovernanceError {
    /// Whether the error came from one of the external collaborators
    pub fn is_transport(&self) -> bool {
        matches!(self, GovernanceError::ConfigStore(_) | GovernanceError::Registry(_))
    }
}
