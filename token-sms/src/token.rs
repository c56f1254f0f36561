use std::fmt::Display;

use rand::Rng;

pub const TOKEN_MIN: u32 = 100_000;
pub const TOKEN_MAX: u32 = 999_999;

/// A one-time numeric code, always exactly 6 ASCII digits.
///
/// Drawn from the thread-local RNG. This is not a cryptographically secure token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn generate() -> Self {
        Self::generate_with(&mut rand::thread_rng())
    }

    pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(rng.gen_range(TOKEN_MIN..=TOKEN_MAX).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
