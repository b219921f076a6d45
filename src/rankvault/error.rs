use thiserror::Error;

#[derive(Error, Debug)]
pub enum VaultError {
    #[error("Server not found: {0}")]
    ServerNotFound(String),

    #[error("Account not found on {server}: {id}")]
    AccountNotFound { server: String, id: String },

    #[error("Account id already exists on {server}: {id}")]
    DuplicateAccount { server: String, id: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Api Error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, VaultError>;
