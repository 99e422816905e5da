//! bcrypt 密码哈希实现

use application::{PasswordHasher, PasswordHasherError};
use bcrypt::{hash, verify, DEFAULT_COST};

#[derive(Clone)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    pub fn new(cost: Option<u32>) -> Self {
        Self {
            cost: cost.unwrap_or(DEFAULT_COST),
        }
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::new(Some(DEFAULT_COST))
    }
}

impl PasswordHasher for BcryptPasswordHasher {
    fn hash(&self, plain: &str) -> Result<String, PasswordHasherError> {
        hash(plain, self.cost).map_err(|err| PasswordHasherError::Hash(err.to_string()))
    }

    fn verify(&self, plain: &str, hashed: &str) -> Result<bool, PasswordHasherError> {
        verify(plain, hashed).map_err(|err| PasswordHasherError::Verify(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_roundtrip() {
        // 低 cost，只为测试速度
        let hasher = BcryptPasswordHasher::new(Some(4));
        let hashed = hasher.hash("s3cret").unwrap();

        assert!(hasher.verify("s3cret", &hashed).unwrap());
        assert!(!hasher.verify("wrong", &hashed).unwrap());
    }
}
