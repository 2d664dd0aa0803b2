//! HMAC (FIPS 198 / RFC 2104)
//!
//! tag = H( (K0 ^ opad) || H( (K0 ^ ipad) || message ) )
//!
//! K0 is the key zero-filled to the block size, or H(key) zero-filled when
//! the key is longer than a block. The outer digest is fitted to the
//! requested tag length with the padded-hash policy.

extern crate alloc;
use alloc::vec;
use alloc::vec::Vec;

use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::engine::{HashFunction, MAX_BLOCK_BYTES};
use crate::error::KdfError;
use crate::padded::{fit, padded_digest};

const IPAD: u8 = 0x36;
const OPAD: u8 = 0x5c;

/// HMAC tag of exactly `output_len` bytes.
pub fn hmac(
    hash: HashFunction,
    output_len: usize,
    key: &[u8],
    message: &[u8],
) -> Result<Vec<u8>, KdfError> {
    let mut tag = vec![0u8; output_len];
    hmac_into(hash, key, message, &mut tag)?;
    Ok(tag)
}

/// Recompute the tag at `tag.len()` bytes and compare in constant time.
///
/// An empty tag never verifies.
pub fn verify_hmac(
    hash: HashFunction,
    key: &[u8],
    message: &[u8],
    tag: &[u8],
) -> Result<bool, KdfError> {
    if tag.is_empty() {
        return Ok(false);
    }
    let expected = Zeroizing::new(hmac(hash, tag.len(), key, message)?);
    Ok(expected.as_slice().ct_eq(tag).into())
}

/// HMAC written into `out`; the tag length is `out.len()`.
pub(crate) fn hmac_into(
    hash: HashFunction,
    key: &[u8],
    message: &[u8],
    out: &mut [u8],
) -> Result<(), KdfError> {
    let b = hash.block_size()?;

    let mut block = Zeroizing::new([0u8; MAX_BLOCK_BYTES]);
    let k0 = &mut block[..b];
    if key.len() > b {
        let reduced = padded_digest(hash, 0, Some(key), None, None)?;
        k0[..reduced.len()].copy_from_slice(reduced.as_slice());
    } else {
        k0[..key.len()].copy_from_slice(key);
    }

    for byte in k0.iter_mut() {
        *byte ^= IPAD;
    }
    let inner = padded_digest(hash, 0, Some(&*k0), None, Some(message))?;

    // ipad ^ opad == 0x6a: flips K0 ^ ipad straight to K0 ^ opad
    for byte in k0.iter_mut() {
        *byte ^= IPAD ^ OPAD;
    }
    let outer = padded_digest(hash, 0, Some(&*k0), None, Some(inner.as_slice()))?;

    fit(outer.as_slice(), out);
    Ok(())
}
