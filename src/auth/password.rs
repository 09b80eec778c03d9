use bcrypt::BcryptError;

/// bcrypt work factor, matching the cost the rest of the platform uses.
const HASH_COST: u32 = 10;

pub fn hash_password(password: &str) -> Result<String, BcryptError> {
    bcrypt::hash(password, HASH_COST)
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, BcryptError> {
    bcrypt::verify(password, hash)
}
