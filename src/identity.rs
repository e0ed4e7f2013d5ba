// ABOUTME: Random client username generation for sessions started without one.
// ABOUTME: Six bytes from the OS RNG, locally-administered bit set, rendered as hex.

use rand::RngCore;
use rand::rngs::OsRng;
use thiserror::Error;

/// Prefix of every generated username.
pub const USERNAME_PREFIX: &str = "talkiepi-";

/// Number of random bytes behind a generated username.
const RANDOM_BYTES: usize = 6;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("failed to read from secure random source: {0}")]
    Entropy(#[from] rand::Error),
}

/// Generate a username from the operating system's secure random source.
pub fn generate_username() -> Result<String, IdentityError> {
    generate_username_from(&mut OsRng)
}

/// Generate a username from the given random source.
///
/// The first byte has bit `0x02` set, the MAC convention for a locally
/// administered address, so generated names are recognizable.
pub fn generate_username_from<R: RngCore + ?Sized>(rng: &mut R) -> Result<String, IdentityError> {
    let mut buf = [0u8; RANDOM_BYTES];
    rng.try_fill_bytes(&mut buf)?;
    buf[0] |= 0x02;

    let username = format!("{USERNAME_PREFIX}{}", hex::encode(buf));
    tracing::debug!(%username, "generated client username");
    Ok(username)
}
