use bcrypt::{hash, verify};

pub fn hash_password(password: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    hash(password, cost)
}

/// A stored value that is not a bcrypt hash never verifies.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match verify(password, hash) {
        Ok(is_valid) => is_valid,
        Err(e) => {
            log::warn!("Stored password is not a valid bcrypt hash: {:?}", e);
            false
        }
    }
}
