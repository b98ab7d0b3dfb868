use serde::{Deserialize, Serialize};

/// JWT claims carried by session tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// JWT ID (unique per token).
    pub jti: String,
    /// Subject (user ID).
    pub sub: String,
    pub username: String,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Expiration (unix timestamp).
    pub exp: i64,
}

/// Authenticated actor attached to a request by the auth middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: i32,
    pub username: String,
}

impl Claims {
    pub fn principal(&self) -> Option<Principal> {
        Some(Principal {
            user_id: self.sub.parse().ok()?,
            username: self.username.clone(),
        })
    }
}
