use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },
    #[error("invalid JSON body: {0}")]
    Body(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token request failed: {0}")]
    Transport(#[from] TransportError),
    #[error("token endpoint returned no referrerToken")]
    MissingToken,
}

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("failed to encode envelope: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("auth failed: {0}")]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("write failed: {0}")]
    Write(#[from] TransportError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing source identifier: {0}")]
    MissingIdentifier(&'static str),
    #[error("invalid base url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("config file unreadable: {0}")]
    Io(#[from] std::io::Error),
    #[error("config file malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("no platform config directory")]
    NoConfigDir,
}
