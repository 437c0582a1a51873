//! Authentication module
//!
//! Provides bcrypt/argon2 password hashing, JWT session tokens and the
//! bearer-token extractor used by protected routes.

mod jwt;
mod middleware;
mod password;

pub use jwt::{Claims, JwtService};
pub use middleware::{bearer_token, AuthUser};
pub use password::PasswordService;
