//! # hashkdf
//!
//! Hash-based MACs and key derivation over SHA-2 and SHA-3.
//!
//! ## Quick Start
//!
//! ```rust
//! use hashkdf::{hkdf_expand, hkdf_extract, hmac, HashFunction};
//!
//! let tag = hmac(HashFunction::SHA256, 32, b"key", b"message").unwrap();
//! assert_eq!(tag.len(), 32);
//!
//! let prk = hkdf_extract(HashFunction::SHA256, Some(&b"salt"[..]), b"input key material").unwrap();
//! let okm = hkdf_expand(HashFunction::SHA256, 42, &prk, b"context").unwrap();
//! assert_eq!(okm.len(), 42);
//! ```
//!
//! ## Algorithms
//!
//! - **HMAC**: FIPS 198 / RFC 2104
//! - **KDF2**: ANSI X9.63 counter mode
//! - **PBKDF2**: RFC 2898 with HMAC as the PRF
//! - **HKDF**: RFC 5869 extract and expand
//! - **expand_message_xmd / expand_message_xof**: RFC 9380 hash-to-field
//!
//! Every derivation returns exactly the requested number of bytes or a
//! [`KdfError`]; an error is never reported as an empty key.
//!
//! ## What's NOT Provided
//!
//! - Randomness (callers supply salts, keys and IKM)
//! - Constant-time guarantees beyond the hash backends
//! - Algorithm negotiation

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![doc(html_root_url = "https://docs.rs/hashkdf/0.1.0")]

extern crate alloc;

// ---------------------------------------------------------------------------
// Modules
// ---------------------------------------------------------------------------

mod engine;
mod error;
mod expand;
mod hmac;
mod kdf;
mod padded;

// ---------------------------------------------------------------------------
// Public interface
// ---------------------------------------------------------------------------

pub use engine::{
    // Hash selection
    block_size,
    HashFamily,
    HashFunction,

    // Backend capabilities
    DigestBytes,
    Engine,
    FixedOutputEngine,
    HashEngine,
    Xof,
    XofEngine,

    // Constants
    MAX_BLOCK_BYTES,
    MAX_DIGEST_BYTES,
};
pub use error::KdfError;
pub use expand::{expand_message_xmd, expand_message_xof, MAX_EXPAND_BYTES};
pub use hmac::{hmac, verify_hmac};
pub use kdf::{hkdf, hkdf_expand, hkdf_extract, kdf2, pbkdf2};
pub use padded::{digest, pad_hash};
