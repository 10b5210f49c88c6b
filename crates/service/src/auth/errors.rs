use thiserror::Error;

/// Business errors for auth workflows
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("unauthorized")]
    Unauthorized,
    #[error("session store error: {0}")]
    Session(String),
    #[error("hashing error: {0}")]
    HashError(String),
}

impl AuthError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            AuthError::InvalidCredentials => 1001,
            AuthError::Unauthorized => 1004,
            AuthError::Session(_) => 1201,
            AuthError::HashError(_) => 1101,
        }
    }
}
