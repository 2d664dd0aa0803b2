//! Padded hash: the framing engine every algorithm is built on.
//!
//! digest = H( 0x00 * zero_prefix || A || u32_be(n) || B )
//!
//! Each of A, n and B is optional. The digest is then fitted to the
//! requested length: truncated from the front when it is long enough,
//! otherwise right-aligned behind leading zero bytes.

extern crate alloc;
use alloc::vec;
use alloc::vec::Vec;

use crate::engine::{DigestBytes, FixedOutputEngine, HashEngine, HashFunction};
use crate::error::KdfError;

/// Generic padded hash.
///
/// `output_len == 0` returns the raw digest. Otherwise the result is exactly
/// `output_len` bytes: the first `output_len` digest bytes if the digest is
/// at least that long, else `output_len - digest_size` zero bytes followed
/// by the whole digest.
pub fn pad_hash(
    hash: HashFunction,
    output_len: usize,
    zero_prefix_len: usize,
    seq_a: Option<&[u8]>,
    counter: Option<u32>,
    seq_b: Option<&[u8]>,
) -> Result<Vec<u8>, KdfError> {
    let r = padded_digest(hash, zero_prefix_len, seq_a, counter, seq_b)?;
    if output_len == 0 {
        return Ok(r.as_slice().to_vec());
    }
    let mut out = vec![0u8; output_len];
    fit(r.as_slice(), &mut out);
    Ok(out)
}

/// Single-pass hash of `data`.
pub fn digest(hash: HashFunction, data: &[u8]) -> Result<Vec<u8>, KdfError> {
    pad_hash(hash, 0, 0, Some(data), None, None)
}

pub(crate) fn padded_digest(
    hash: HashFunction,
    zero_prefix_len: usize,
    seq_a: Option<&[u8]>,
    counter: Option<u32>,
    seq_b: Option<&[u8]>,
) -> Result<DigestBytes, KdfError> {
    let mut engine = hash.engine()?;
    engine.absorb_zeros(zero_prefix_len);
    if let Some(a) = seq_a {
        engine.absorb(a);
    }
    if let Some(n) = counter {
        engine.absorb_u32(n);
    }
    if let Some(b) = seq_b {
        engine.absorb(b);
    }

    let r = engine.finalize();
    if r.is_empty() {
        tracing::debug!(digest_size = hash.digest_size(), "backend returned an empty digest");
        return Err(KdfError::EmptyDigest);
    }
    Ok(r)
}

/// Truncate or left-zero-extend `digest` into `out`.
pub(crate) fn fit(digest: &[u8], out: &mut [u8]) {
    let len = out.len();
    if digest.len() >= len {
        out.copy_from_slice(&digest[..len]);
    } else {
        let pad = len - digest.len();
        out[..pad].fill(0);
        out[pad..].copy_from_slice(digest);
    }
}
