//! # Gateway notification signatures
//!
//! Every payment notification carries a `signature_key` that proves it came from the gateway. The key is the
//! SHA-512 digest of
//!
//! ```text
//!    {order_id}{status_code}{gross_amount}{server_key}
//! ```
//!
//! rendered as lowercase hexadecimal. `gross_amount` is used exactly as the gateway sent it (e.g. `"36000.00"`), so it
//! must not be re-formatted before checking.
use std::fmt::Write;

use sha2::{Digest, Sha512};

pub fn notification_signature(order_id: &str, status_code: &str, gross_amount: &str, server_key: &str) -> String {
    let mut hasher = Sha512::new();
    hasher.update(order_id.as_bytes());
    hasher.update(status_code.as_bytes());
    hasher.update(gross_amount.as_bytes());
    hasher.update(server_key.as_bytes());
    let digest = hasher.finalize();
    digest.iter().fold(String::with_capacity(128), |mut hex, b| {
        let _ = write!(hex, "{b:02x}");
        hex
    })
}

/// Compares the supplied signature against the expected one. Hex case is ignored. The comparison takes the same time
/// wherever the first mismatch is.
pub fn verify_notification_signature(
    order_id: &str,
    status_code: &str,
    gross_amount: &str,
    server_key: &str,
    signature: &str,
) -> bool {
    let expected = notification_signature(order_id, status_code, gross_amount, server_key);
    let supplied = signature.trim().to_ascii_lowercase();
    constant_time_eq(expected.as_bytes(), supplied.as_bytes())
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
