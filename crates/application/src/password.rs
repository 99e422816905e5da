use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordHasherError {
    #[error("hash failed: {0}")]
    Hash(String),
    #[error("verify failed: {0}")]
    Verify(String),
}

pub trait PasswordHasher: Send + Sync {
    fn hash(&self, plain: &str) -> Result<String, PasswordHasherError>;
    fn verify(&self, plain: &str, hashed: &str) -> Result<bool, PasswordHasherError>;
}
