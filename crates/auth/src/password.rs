//! PBKDF2-HMAC-SHA256 password hashing.
//!
//! Encoded form is `pbkdf2-sha256$rounds$salt$hash` with base64 salt and
//! digest, so hashes migrated from the previous deployment keep verifying.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;

const METHOD: &str = "pbkdf2-sha256";
const ROUNDS: u32 = 260_000;
const SALT_LEN: usize = 16;
const DIGEST_LEN: usize = 32;

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);

    let mut digest = [0u8; DIGEST_LEN];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, ROUNDS, &mut digest);

    format!(
        "{METHOD}${ROUNDS}${}${}",
        BASE64.encode(salt),
        BASE64.encode(digest)
    )
}

/// Check a password against an encoded hash. Malformed or foreign encodings
/// verify as false rather than erroring.
pub fn verify_password(password: &str, encoded: &str) -> bool {
    let mut parts = encoded.splitn(4, '$');
    let (method, rounds, salt, expected) = match (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) {
        (Some(m), Some(r), Some(s), Some(h)) => (m, r, s, h),
        _ => return false,
    };
    if method != METHOD {
        return false;
    }
    let Ok(rounds) = rounds.parse::<u32>() else {
        return false;
    };
    let (Ok(salt), Ok(expected)) = (BASE64.decode(salt), BASE64.decode(expected)) else {
        return false;
    };
    if expected.len() != DIGEST_LEN {
        return false;
    }

    let mut digest = [0u8; DIGEST_LEN];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, rounds, &mut digest);
    constant_time_eq(&digest, &expected)
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
