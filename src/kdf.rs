//! Key derivation
//!
//!   KDF2   (ANSI X9.63):  K = H(Z || u32_be(1) || P) || H(Z || u32_be(2) || P) || ...
//!   PBKDF2 (RFC 2898):    T_i = U_1 ^ ... ^ U_c,  U_1 = HMAC(P, S || u32_be(i))
//!   HKDF   (RFC 5869):    PRK = HMAC(salt, IKM)
//!                         T_i = HMAC(PRK, T_{i-1} || info || i)
//!
//! Every function returns exactly `output_len` bytes; the final block is
//! cut short when `output_len` is not a multiple of the digest size.

extern crate alloc;
use alloc::vec::Vec;

use zeroize::Zeroizing;

use crate::engine::{HashFunction, MAX_DIGEST_BYTES};
use crate::error::KdfError;
use crate::hmac::{hmac, hmac_into};
use crate::padded::padded_digest;

/// Counter-mode block count, bounded by what the counter can encode.
fn block_count(output_len: usize, hlen: usize, max_blocks: usize) -> Result<usize, KdfError> {
    let blocks = output_len.div_ceil(hlen);
    if blocks > max_blocks {
        let max = max_blocks.saturating_mul(hlen);
        tracing::debug!(requested = output_len, max, "requested output exceeds counter range");
        return Err(KdfError::OutputTooLong { requested: output_len, max });
    }
    Ok(blocks)
}

// ---------------------------------------------------------------------------
// KDF2
// ---------------------------------------------------------------------------

/// ANSI X9.63 KDF2 over shared secret `z` and shared info `p`.
pub fn kdf2(
    hash: HashFunction,
    z: &[u8],
    p: &[u8],
    output_len: usize,
) -> Result<Vec<u8>, KdfError> {
    let hlen = hash.hlen()?;
    let blocks = block_count(output_len, hlen, u32::MAX as usize)? as u32;
    tracing::trace!(?hash, output_len, blocks, "kdf2");

    let mut okm = Vec::with_capacity(output_len);
    for counter in 1..=blocks {
        let block = padded_digest(hash, 0, Some(z), Some(counter), Some(p))?;
        let take = (output_len - okm.len()).min(hlen);
        okm.extend_from_slice(&block.as_slice()[..take]);
    }
    Ok(okm)
}

// ---------------------------------------------------------------------------
// PBKDF2
// ---------------------------------------------------------------------------

/// PBKDF2 with HMAC as the PRF.
///
/// An iteration count of zero is rejected with `KdfError::ZeroIterations`.
pub fn pbkdf2(
    hash: HashFunction,
    password: &[u8],
    salt: &[u8],
    iterations: u32,
    output_len: usize,
) -> Result<Vec<u8>, KdfError> {
    let hlen = hash.hlen()?;
    if iterations == 0 {
        tracing::debug!("pbkdf2 called with zero iterations");
        return Err(KdfError::ZeroIterations);
    }
    let blocks = block_count(output_len, hlen, u32::MAX as usize)? as u32;
    tracing::trace!(?hash, iterations, output_len, blocks, "pbkdf2");

    let mut salt_block = Zeroizing::new(Vec::with_capacity(salt.len() + 4));
    salt_block.extend_from_slice(salt);
    salt_block.extend_from_slice(&[0u8; 4]);

    let mut u = Zeroizing::new([0u8; MAX_DIGEST_BYTES]);
    let mut next = Zeroizing::new([0u8; MAX_DIGEST_BYTES]);
    let mut f = Zeroizing::new([0u8; MAX_DIGEST_BYTES]);

    let mut okm = Vec::with_capacity(output_len);
    for i in 1..=blocks {
        salt_block[salt.len()..].copy_from_slice(&i.to_be_bytes());

        hmac_into(hash, password, salt_block.as_slice(), &mut u[..hlen])?;
        f[..hlen].copy_from_slice(&u[..hlen]);

        for _ in 1..iterations {
            hmac_into(hash, password, &u[..hlen], &mut next[..hlen])?;
            core::mem::swap(&mut u, &mut next);
            for (acc, x) in f[..hlen].iter_mut().zip(u[..hlen].iter()) {
                *acc ^= x;
            }
        }

        let take = (output_len - okm.len()).min(hlen);
        okm.extend_from_slice(&f[..take]);
    }
    Ok(okm)
}

// ---------------------------------------------------------------------------
// HKDF
// ---------------------------------------------------------------------------

/// HKDF-Extract. A missing salt is `hlen` zero bytes.
pub fn hkdf_extract(
    hash: HashFunction,
    salt: Option<&[u8]>,
    ikm: &[u8],
) -> Result<Vec<u8>, KdfError> {
    let hlen = hash.hlen()?;
    let zeros = [0u8; MAX_DIGEST_BYTES];
    let salt = salt.unwrap_or(&zeros[..hlen]);
    hmac(hash, hlen, salt, ikm)
}

/// HKDF-Expand to `output_len` bytes, at most `255 * hlen`.
pub fn hkdf_expand(
    hash: HashFunction,
    output_len: usize,
    prk: &[u8],
    info: &[u8],
) -> Result<Vec<u8>, KdfError> {
    let hlen = hash.hlen()?;
    let blocks = block_count(output_len, hlen, u8::MAX as usize)? as u8;
    tracing::trace!(?hash, output_len, blocks, "hkdf expand");

    // T_{i-1} || info || i
    let mut t = Zeroizing::new(Vec::with_capacity(hlen + info.len() + 1));
    let mut block = Zeroizing::new([0u8; MAX_DIGEST_BYTES]);

    let mut okm = Vec::with_capacity(output_len);
    for i in 1..=blocks {
        t.extend_from_slice(info);
        t.push(i);
        hmac_into(hash, prk, t.as_slice(), &mut block[..hlen])?;

        let take = (output_len - okm.len()).min(hlen);
        okm.extend_from_slice(&block[..take]);

        t.clear();
        t.extend_from_slice(&block[..hlen]);
    }
    Ok(okm)
}

/// Extract then expand.
pub fn hkdf(
    hash: HashFunction,
    salt: Option<&[u8]>,
    ikm: &[u8],
    info: &[u8],
    output_len: usize,
) -> Result<Vec<u8>, KdfError> {
    let prk = Zeroizing::new(hkdf_extract(hash, salt, ikm)?);
    hkdf_expand(hash, output_len, &prk, info)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kdf2_blocks_are_counter_hashes() {
        let okm = kdf2(HashFunction::SHA256, b"secret", b"info", 70).unwrap();
        assert_eq!(okm.len(), 70);
        for (i, chunk) in okm.chunks(32).enumerate() {
            let block = padded_digest(
                HashFunction::SHA256,
                0,
                Some(&b"secret"[..]),
                Some(i as u32 + 1),
                Some(&b"info"[..]),
            )
            .unwrap();
            assert_eq!(chunk, &block.as_slice()[..chunk.len()]);
        }
    }

    #[test]
    fn zero_length_outputs() {
        assert!(kdf2(HashFunction::SHA256, b"z", b"", 0).unwrap().is_empty());
        assert!(pbkdf2(HashFunction::SHA256, b"p", b"s", 1, 0).unwrap().is_empty());
        assert!(hkdf_expand(HashFunction::SHA256, 0, &[1u8; 32], b"").unwrap().is_empty());
    }

    #[test]
    fn hkdf_expand_limit() {
        let prk = [7u8; 32];
        assert_eq!(hkdf_expand(HashFunction::SHA256, 255 * 32, &prk, b"").unwrap().len(), 255 * 32);
        assert_eq!(
            hkdf_expand(HashFunction::SHA256, 255 * 32 + 1, &prk, b""),
            Err(KdfError::OutputTooLong { requested: 255 * 32 + 1, max: 255 * 32 })
        );
    }

    #[test]
    fn hkdf_partial_block_is_prefix() {
        let prk = [3u8; 48];
        let full = hkdf_expand(HashFunction::SHA384, 96, &prk, b"ctx").unwrap();
        let part = hkdf_expand(HashFunction::SHA384, 50, &prk, b"ctx").unwrap();
        assert_eq!(&full[..50], &part[..]);
    }

    #[test]
    fn pbkdf2_rejects_zero_iterations() {
        assert_eq!(
            pbkdf2(HashFunction::SHA256, b"p", b"s", 0, 32),
            Err(KdfError::ZeroIterations)
        );
    }

    #[test]
    fn unsupported_hash_fails_before_output() {
        let h = HashFunction::SHAKE128;
        assert!(kdf2(h, b"z", b"p", 0).is_err());
        assert!(pbkdf2(h, b"p", b"s", 1, 0).is_err());
        assert!(hkdf_extract(h, None, b"ikm").is_err());
        assert!(hkdf_expand(h, 0, b"prk", b"").is_err());
    }
}
