pub mod hasher;
pub mod token;

pub use hasher::{PasswordHasher, SaltedArgon2Hasher};
pub use token::{JwtIssuer, TokenIssuer};
