#[derive(Clone, Debug)]
pub struct User {
    /// User ID, assigned by the store
    pub id: u32,
    /// Unique login name
    pub username: String,
    /// Argon2 PHC string, never the plaintext password
    pub password_hash: String,
}

impl User {
    pub fn new(id: u32, username: String, password_hash: String) -> Self {
        Self {
            id,
            username,
            password_hash,
        }
    }
}
