//! Credential hashing with PBKDF2-SHA256
//!
//! Stored format: `pbkdf2-sha256$<iterations>$<salt-b64>$<hash-b64>`.
//! The salt is 16 random bytes per credential. Verification re-derives
//! with the parameters stored in the hash string, not the configured ones,
//! so old hashes keep verifying after the iteration count changes.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use rand::RngCore;
use ring::pbkdf2;
use std::num::NonZeroU32;

const SALT_LEN: usize = 16;
const CREDENTIAL_LEN: usize = 32;
static PBKDF2_ALG: pbkdf2::Algorithm = pbkdf2::PBKDF2_HMAC_SHA256;

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &str, iterations: u32) -> String {
    let iterations = iterations.max(1);
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);

    let mut derived = [0u8; CREDENTIAL_LEN];
    pbkdf2::derive(
        PBKDF2_ALG,
        NonZeroU32::new(iterations).expect("iterations clamped to >= 1"),
        &salt,
        password.as_bytes(),
        &mut derived,
    );

    format!(
        "pbkdf2-sha256${}${}${}",
        iterations,
        BASE64.encode(salt),
        BASE64.encode(derived)
    )
}

/// Verify a password against a stored hash string.
///
/// Returns false on any parse failure; a malformed stored hash must never
/// authenticate.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.split('$');
    let (Some(scheme), Some(iters), Some(salt_b64), Some(hash_b64), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return false;
    };

    if scheme != "pbkdf2-sha256" {
        return false;
    }
    let Ok(iterations) = iters.parse::<u32>() else {
        return false;
    };
    let Some(iterations) = NonZeroU32::new(iterations) else {
        return false;
    };
    let (Ok(salt), Ok(expected)) = (BASE64.decode(salt_b64), BASE64.decode(hash_b64)) else {
        return false;
    };

    pbkdf2::verify(PBKDF2_ALG, iterations, &salt, password.as_bytes(), &expected).is_ok()
}
