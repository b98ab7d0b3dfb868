//! Credential service: users, password hashing and session tokens.
//!
//! The rest of the crate only consumes the resulting [`Principal`].

pub mod claims;
pub mod jwt;
pub mod password;
pub mod service;

pub use claims::{Claims, Principal};
pub use jwt::JwtManager;
pub use service::{CredentialService, LoginOutcome, RegisterRequest};
