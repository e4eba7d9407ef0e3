//! Content fingerprints and busted filenames.

use crate::config::Placement;

/// First `hash_size` hex characters of the MD5 digest of `content`.
pub fn fingerprint(content: &[u8], hash_size: usize) -> String {
    let mut digest = hex::encode(md5::compute(content).0);
    digest.truncate(hash_size);
    digest
}

/// Combine a logical path and its fingerprint according to `placement`.
pub fn busted_name(logical: &str, fingerprint: &str, placement: Placement) -> String {
    match placement {
        Placement::Query => format!("{logical}?q={fingerprint}"),
        Placement::Path => format!("{fingerprint}/{logical}"),
    }
}
