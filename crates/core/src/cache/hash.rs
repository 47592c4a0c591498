//! Request identity generation.

use sha2::{Digest, Sha256};

/// Compute the cache key identifying a request.
///
/// The method is case-normalized; the URL is taken as given, so callers
/// must pass the resolved, fragment-free form.
pub fn compute_request_key(method: &str, url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(method.to_ascii_uppercase().as_bytes());
    hasher.update(b"\n");
    hasher.update(url.as_bytes());
    hex::encode(hasher.finalize())
}
