//! Password shape rules and the hashing seam.
//!
//! # Responsibility
//! - Decide whether a raw password may be accepted at all.
//! - Turn accepted raw passwords into irreversible hashes.
//!
//! # Invariants
//! - Shape checks run in a fixed order: character class first, then length.
//! - Raw passwords never leave this module except as encoder input.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::ops::RangeInclusive;

/// Accepted password length, in characters.
pub const PASSWORD_LENGTH_RANGE: RangeInclusive<usize> = 8..=16;

static HALF_WIDTH_ALNUM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9]+$").expect("valid alphanumeric regex"));

/// Reason a raw password was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordShapeError {
    /// Empty, or contains something other than ASCII letters and digits.
    NotAlphanumeric,
    /// Length outside [`PASSWORD_LENGTH_RANGE`].
    OutOfLengthRange { length: usize },
}

impl Display for PasswordShapeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAlphanumeric => {
                write!(f, "password must contain only ASCII letters and digits")
            }
            Self::OutOfLengthRange { length } => write!(
                f,
                "password length {length} is outside {}..={}",
                PASSWORD_LENGTH_RANGE.start(),
                PASSWORD_LENGTH_RANGE.end()
            ),
        }
    }
}

impl Error for PasswordShapeError {}

/// Validates the shape of a raw password.
///
/// `Ok(())` is the pass-through signal that lets the caller proceed to
/// hashing. The empty string fails the character-class rule.
pub fn check_password_shape(raw_password: &str) -> Result<(), PasswordShapeError> {
    if !HALF_WIDTH_ALNUM_RE.is_match(raw_password) {
        return Err(PasswordShapeError::NotAlphanumeric);
    }

    // ASCII only past this point, so bytes == chars.
    let length = raw_password.len();
    if !PASSWORD_LENGTH_RANGE.contains(&length) {
        return Err(PasswordShapeError::OutOfLengthRange { length });
    }

    Ok(())
}

/// Hashing failure reported by an encoder backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordEncodeError(pub String);

impl Display for PasswordEncodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "password encoding failed: {}", self.0)
    }
}

impl Error for PasswordEncodeError {}

/// One-way password encoder.
pub trait PasswordEncoder {
    /// Produces a self-describing hash for `raw_password`.
    fn encode(&self, raw_password: &str) -> Result<String, PasswordEncodeError>;
    /// Checks `raw_password` against a hash produced by [`Self::encode`].
    fn matches(&self, raw_password: &str, hash: &str) -> bool;
}

impl<T: PasswordEncoder + ?Sized> PasswordEncoder for &T {
    fn encode(&self, raw_password: &str) -> Result<String, PasswordEncodeError> {
        (**self).encode(raw_password)
    }

    fn matches(&self, raw_password: &str, hash: &str) -> bool {
        (**self).matches(raw_password, hash)
    }
}

/// Argon2id encoder with a fresh random salt per hash (PHC string output).
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2PasswordEncoder;

impl PasswordEncoder for Argon2PasswordEncoder {
    fn encode(&self, raw_password: &str) -> Result<String, PasswordEncodeError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(raw_password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| PasswordEncodeError(err.to_string()))
    }

    fn matches(&self, raw_password: &str, hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            return false;
        };
        Argon2::default()
            .verify_password(raw_password.as_bytes(), &parsed)
            .is_ok()
    }
}
