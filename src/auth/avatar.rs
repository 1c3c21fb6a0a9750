//! Gravatar URL derivation

use md5::{Digest, Md5};

const GRAVATAR_BASE: &str = "//www.gravatar.com/avatar";

/// Options appended to the avatar URL
#[derive(Debug, Clone)]
pub struct AvatarOptions {
    pub size: u32,
    pub rating: &'static str,
    pub default: &'static str,
}

impl Default for AvatarOptions {
    fn default() -> Self {
        Self {
            size: 200,
            rating: "pg",
            default: "mm",
        }
    }
}

/// Deterministically derive the avatar URL for an email address.
///
/// The address is trimmed and lowercased before hashing.
pub fn gravatar_url(email: &str, options: &AvatarOptions) -> String {
    let normalized = email.trim().to_lowercase();
    let digest = Md5::digest(normalized.as_bytes());
    format!(
        "{}/{:x}?s={}&r={}&d={}",
        GRAVATAR_BASE, digest, options.size, options.rating, options.default
    )
}
