//! Message expansion for hash-to-field (RFC 9380, section 5.3)
//!
//!   DST_prime = DST || I2OSP(len(DST), 1)
//!
//! expand_message_xof:
//!   OKM = XOF(msg || I2OSP(len, 2) || DST_prime, len)
//!
//! expand_message_xmd:
//!   b_0 = H(Z_pad || msg || I2OSP(len, 2) || 0x00 || DST_prime)
//!   b_1 = H(b_0 || 0x01 || DST_prime)
//!   b_i = H((b_0 ^ b_{i-1}) || I2OSP(i, 1) || DST_prime)
//!   OKM = first len bytes of b_1 || ... || b_ell
//!
//! Z_pad is one block of zero bytes.

extern crate alloc;
use alloc::vec;
use alloc::vec::Vec;

use zeroize::Zeroizing;

use crate::engine::{HashEngine, HashFunction, XofEngine, MAX_DIGEST_BYTES};
use crate::error::KdfError;
use crate::padded::padded_digest;

/// Longest output the two-byte length prefix can describe.
pub const MAX_EXPAND_BYTES: usize = u16::MAX as usize;

fn dst_len_byte(dst: &[u8]) -> Result<u8, KdfError> {
    u8::try_from(dst.len()).map_err(|_| {
        tracing::debug!(dst_len = dst.len(), "domain separation tag too long");
        KdfError::DstTooLong(dst.len())
    })
}

fn too_long(requested: usize, max: usize) -> KdfError {
    tracing::debug!(requested, max, "requested expansion too long");
    KdfError::OutputTooLong { requested, max }
}

/// `expand_message_xof` over SHAKE128 (`HashFunction::SHAKE128`) or
/// SHAKE256 (`HashFunction::SHAKE256`).
pub fn expand_message_xof(
    hash: HashFunction,
    output_len: usize,
    dst: &[u8],
    msg: &[u8],
) -> Result<Vec<u8>, KdfError> {
    let mut xof = hash.xof()?;
    let dst_len = dst_len_byte(dst)?;
    let len = u16::try_from(output_len).map_err(|_| too_long(output_len, MAX_EXPAND_BYTES))?;
    tracing::trace!(?hash, output_len, "expand_message_xof");

    xof.absorb(msg);
    xof.absorb(&len.to_be_bytes());
    xof.absorb(dst);
    xof.absorb_byte(dst_len);

    let mut okm = vec![0u8; output_len];
    xof.squeeze(&mut okm);
    Ok(okm)
}

/// `expand_message_xmd` over a fixed-output hash.
///
/// Output is limited to `min(255 * hlen, 65535)` bytes.
pub fn expand_message_xmd(
    hash: HashFunction,
    output_len: usize,
    dst: &[u8],
    msg: &[u8],
) -> Result<Vec<u8>, KdfError> {
    let hlen = hash.hlen()?;
    let b = hash.block_size()?;
    let dst_len = dst_len_byte(dst)?;

    let max = (255 * hlen).min(MAX_EXPAND_BYTES);
    if output_len > max {
        return Err(too_long(output_len, max));
    }
    let ell = output_len.div_ceil(hlen) as u8;
    let len = output_len as u16;
    tracing::trace!(?hash, output_len, ell, "expand_message_xmd");

    // I2OSP(len, 2) || 0x00 || DST_prime
    let mut tail = Vec::with_capacity(3 + dst.len() + 1);
    tail.extend_from_slice(&len.to_be_bytes());
    tail.push(0);
    tail.extend_from_slice(dst);
    tail.push(dst_len);

    let b0 = padded_digest(hash, b, Some(msg), None, Some(tail.as_slice()))?;

    // I2OSP(i, 1) || DST_prime; byte 0 is rewritten each round
    let mut round = Vec::with_capacity(1 + dst.len() + 1);
    round.push(0);
    round.extend_from_slice(dst);
    round.push(dst_len);

    let mut chain = Zeroizing::new([0u8; MAX_DIGEST_BYTES]);
    let mut okm = Vec::with_capacity(output_len);
    for i in 1..=ell {
        for (x, y) in chain[..hlen].iter_mut().zip(b0.as_slice()) {
            *x ^= y;
        }
        round[0] = i;
        let bi = padded_digest(hash, 0, Some(&chain[..hlen]), None, Some(round.as_slice()))?;
        chain[..hlen].copy_from_slice(bi.as_slice());

        let take = (output_len - okm.len()).min(hlen);
        okm.extend_from_slice(&chain[..take]);
    }
    Ok(okm)
}
