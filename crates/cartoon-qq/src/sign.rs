//! Request signing for the provider endpoint.
//!
//! The provider requires an MD5 token over `origin + body length + secret`.
//! It binds the signature only to the byte length of the serialized body;
//! reproduce it bit-for-bit for interoperability, it is not a cryptographic
//! integrity check.

use std::fmt::Write;

use md5::{Digest, Md5};

use crate::{ORIGIN, SIGN_SECRET};

/// Compute the `x-sign-value` token for a request body of `payload_len`
/// bytes, as lowercase hex.
pub fn sign(payload_len: usize) -> String {
    let input = format!("{ORIGIN}{payload_len}{SIGN_SECRET}");
    let digest = Md5::digest(input.as_bytes());

    let mut out = String::with_capacity(2 * digest.len());
    for byte in digest {
        let _ = write!(out, "{byte:02x}");
    }
    out
}
