use quadrille_protocol::error::ProtocolError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SolverError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Bad Grid: {0}")]
    BadGrid(String),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Invalid Peer Solution: {0}")]
    PeerInjectInvalid(String),
}

impl From<ProtocolError> for SolverError {
    fn from(e: ProtocolError) -> Self {
        match e {
            ProtocolError::Io(e) => SolverError::Io(e),
            ProtocolError::Json(e) => SolverError::Json(e),
        }
    }
}

pub type SolverResult<T> = Result<T, SolverError>;
