//! Hash backends
//!
//! A `HashFunction` names a concrete primitive as (family, digest size):
//!
//!   SHA-2:  32 -> SHA-256, 48 -> SHA-384, 64 -> SHA-512
//!   SHA-3:  28/32/48/64 -> SHA3-224/256/384/512 (fixed output)
//!           16 -> SHAKE128, 32 -> SHAKE256      (extendable output)
//!
//! The backend is picked once, when the engine is built. Algorithms above
//! this layer only see the `HashEngine` capability traits.

use core::fmt;

use sha2::{Digest, Sha256, Sha384, Sha512};
use sha3::digest::{ExtendableOutput, Update, XofReader};
use sha3::{Sha3_224, Sha3_256, Sha3_384, Sha3_512, Shake128, Shake256};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::KdfError;

/// Largest fixed digest any backend produces (SHA-512, SHA3-512).
pub const MAX_DIGEST_BYTES: usize = 64;

/// Upper bound on any resolvable block size (the Keccak state width).
pub const MAX_BLOCK_BYTES: usize = 200;

// ---------------------------------------------------------------------------
// Hash selection
// ---------------------------------------------------------------------------

/// Hash family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashFamily {
    /// SHA-256 / SHA-384 / SHA-512.
    Sha2,
    /// SHA3-* and the SHAKE extendable-output functions.
    Sha3,
}

impl fmt::Display for HashFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sha2 => write!(f, "SHA-2"),
            Self::Sha3 => write!(f, "SHA-3"),
        }
    }
}

/// Compression block size for a (family, digest size) pair.
///
/// SHA-2 uses 64-byte blocks up to a 32-byte digest and 128-byte blocks
/// above that. SHA-3/SHAKE use the sponge rate `200 - 2 * digest_size`.
pub const fn block_size(family: HashFamily, digest_size: usize) -> Option<usize> {
    match family {
        HashFamily::Sha2 => match digest_size {
            1..=32 => Some(64),
            33..=64 => Some(128),
            _ => None,
        },
        HashFamily::Sha3 => {
            if digest_size > 0 && digest_size < 100 {
                Some(200 - 2 * digest_size)
            } else {
                None
            }
        }
    }
}

/// A concrete hash or XOF instance.
///
/// `(Sha3, 32)` is SHA3-256 when used as a fixed-output hash and SHAKE256
/// when used as an XOF, so `SHA3_256 == SHAKE256`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HashFunction {
    family: HashFamily,
    digest_size: usize,
}

impl HashFunction {
    pub const SHA256: Self = Self::new(HashFamily::Sha2, 32);
    pub const SHA384: Self = Self::new(HashFamily::Sha2, 48);
    pub const SHA512: Self = Self::new(HashFamily::Sha2, 64);
    pub const SHA3_224: Self = Self::new(HashFamily::Sha3, 28);
    pub const SHA3_256: Self = Self::new(HashFamily::Sha3, 32);
    pub const SHA3_384: Self = Self::new(HashFamily::Sha3, 48);
    pub const SHA3_512: Self = Self::new(HashFamily::Sha3, 64);
    pub const SHAKE128: Self = Self::new(HashFamily::Sha3, 16);
    pub const SHAKE256: Self = Self::new(HashFamily::Sha3, 32);

    /// Name a hash by family and digest size. Support is checked lazily,
    /// when an engine or block size is requested.
    pub const fn new(family: HashFamily, digest_size: usize) -> Self {
        Self { family, digest_size }
    }

    pub const fn family(self) -> HashFamily {
        self.family
    }

    /// Digest size in bytes (`hlen`).
    pub const fn digest_size(self) -> usize {
        self.digest_size
    }

    /// Block size, or `UnsupportedHash`.
    pub fn block_size(self) -> Result<usize, KdfError> {
        block_size(self.family, self.digest_size).ok_or_else(|| self.unsupported())
    }

    /// Whether a fixed-output backend exists for this selection.
    const fn has_fixed_output(self) -> bool {
        matches!(
            (self.family, self.digest_size),
            (HashFamily::Sha2, 32 | 48 | 64) | (HashFamily::Sha3, 28 | 32 | 48 | 64)
        )
    }

    /// `hlen`, checked against the fixed-output backends.
    pub(crate) fn hlen(self) -> Result<usize, KdfError> {
        if self.has_fixed_output() {
            Ok(self.digest_size)
        } else {
            Err(self.unsupported())
        }
    }

    /// Build a fixed-output engine.
    pub fn engine(self) -> Result<Engine, KdfError> {
        let engine = match (self.family, self.digest_size) {
            (HashFamily::Sha2, 32) => Engine::Sha256(Sha256::new()),
            (HashFamily::Sha2, 48) => Engine::Sha384(Sha384::new()),
            (HashFamily::Sha2, 64) => Engine::Sha512(Sha512::new()),
            (HashFamily::Sha3, 28) => Engine::Sha3_224(Sha3_224::new()),
            (HashFamily::Sha3, 32) => Engine::Sha3_256(Sha3_256::new()),
            (HashFamily::Sha3, 48) => Engine::Sha3_384(Sha3_384::new()),
            (HashFamily::Sha3, 64) => Engine::Sha3_512(Sha3_512::new()),
            _ => return Err(self.unsupported()),
        };
        Ok(engine)
    }

    /// Build an extendable-output engine.
    pub fn xof(self) -> Result<Xof, KdfError> {
        match (self.family, self.digest_size) {
            (HashFamily::Sha3, 16) => Ok(Xof::Shake128(Shake128::default())),
            (HashFamily::Sha3, 32) => Ok(Xof::Shake256(Shake256::default())),
            _ => Err(self.unsupported()),
        }
    }

    fn unsupported(self) -> KdfError {
        tracing::debug!(
            family = %self.family,
            digest_size = self.digest_size,
            "unsupported hash selection"
        );
        KdfError::UnsupportedHash {
            family: self.family,
            digest_size: self.digest_size,
        }
    }
}

// ---------------------------------------------------------------------------
// Digest buffer
// ---------------------------------------------------------------------------

/// Fixed-capacity digest with an explicit length. Wiped on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct DigestBytes {
    bytes: [u8; MAX_DIGEST_BYTES],
    len: usize,
}

impl DigestBytes {
    pub(crate) fn from_slice(src: &[u8]) -> Self {
        debug_assert!(src.len() <= MAX_DIGEST_BYTES);
        let mut bytes = [0u8; MAX_DIGEST_BYTES];
        bytes[..src.len()].copy_from_slice(src);
        Self { bytes, len: src.len() }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl AsRef<[u8]> for DigestBytes {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl fmt::Debug for DigestBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DigestBytes").field("len", &self.len).finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Capability traits
// ---------------------------------------------------------------------------

/// Absorbing side shared by fixed-output hashes and XOFs.
pub trait HashEngine {
    fn absorb(&mut self, data: &[u8]);

    fn absorb_byte(&mut self, byte: u8) {
        self.absorb(&[byte]);
    }

    fn absorb_zeros(&mut self, count: usize) {
        const ZEROS: [u8; 64] = [0u8; 64];
        let mut left = count;
        while left > 0 {
            let n = left.min(ZEROS.len());
            self.absorb(&ZEROS[..n]);
            left -= n;
        }
    }

    /// Length-encoded integer: 4-byte big-endian.
    fn absorb_u32(&mut self, n: u32) {
        self.absorb(&n.to_be_bytes());
    }
}

pub trait FixedOutputEngine: HashEngine {
    fn finalize(self) -> DigestBytes;
}

pub trait XofEngine: HashEngine {
    /// Finalize and fill `out` entirely.
    fn squeeze(self, out: &mut [u8]);
}

// ---------------------------------------------------------------------------
// Backends
// ---------------------------------------------------------------------------

/// Fixed-output backend, resolved at construction.
#[derive(Clone)]
pub enum Engine {
    Sha256(Sha256),
    Sha384(Sha384),
    Sha512(Sha512),
    Sha3_224(Sha3_224),
    Sha3_256(Sha3_256),
    Sha3_384(Sha3_384),
    Sha3_512(Sha3_512),
}

macro_rules! each_engine {
    ($engine:expr, $h:ident => $body:expr) => {
        match $engine {
            Engine::Sha256($h) => $body,
            Engine::Sha384($h) => $body,
            Engine::Sha512($h) => $body,
            Engine::Sha3_224($h) => $body,
            Engine::Sha3_256($h) => $body,
            Engine::Sha3_384($h) => $body,
            Engine::Sha3_512($h) => $body,
        }
    };
}

impl HashEngine for Engine {
    fn absorb(&mut self, data: &[u8]) {
        each_engine!(self, h => Digest::update(h, data))
    }
}

impl FixedOutputEngine for Engine {
    fn finalize(self) -> DigestBytes {
        each_engine!(self, h => DigestBytes::from_slice(&Digest::finalize(h)))
    }
}

/// Extendable-output backend.
#[derive(Clone)]
pub enum Xof {
    Shake128(Shake128),
    Shake256(Shake256),
}

impl HashEngine for Xof {
    fn absorb(&mut self, data: &[u8]) {
        match self {
            Self::Shake128(h) => Update::update(h, data),
            Self::Shake256(h) => Update::update(h, data),
        }
    }
}

impl XofEngine for Xof {
    fn squeeze(self, out: &mut [u8]) {
        match self {
            Self::Shake128(h) => XofReader::read(&mut ExtendableOutput::finalize_xof(h), out),
            Self::Shake256(h) => XofReader::read(&mut ExtendableOutput::finalize_xof(h), out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_sizes() {
        assert_eq!(block_size(HashFamily::Sha2, 32), Some(64));
        assert_eq!(block_size(HashFamily::Sha2, 48), Some(128));
        assert_eq!(block_size(HashFamily::Sha2, 64), Some(128));
        assert_eq!(block_size(HashFamily::Sha3, 16), Some(168));
        assert_eq!(block_size(HashFamily::Sha3, 28), Some(144));
        assert_eq!(block_size(HashFamily::Sha3, 32), Some(136));
        assert_eq!(block_size(HashFamily::Sha3, 48), Some(104));
        assert_eq!(block_size(HashFamily::Sha3, 64), Some(72));
        assert_eq!(block_size(HashFamily::Sha2, 0), None);
        assert_eq!(block_size(HashFamily::Sha2, 65), None);
        assert_eq!(block_size(HashFamily::Sha3, 100), None);
    }

    #[test]
    fn unsupported_pairs_are_errors() {
        let h = HashFunction::new(HashFamily::Sha2, 20);
        assert!(h.engine().is_err());
        assert!(HashFunction::SHA256.xof().is_err());
        assert!(HashFunction::SHA3_224.xof().is_err());
        assert_eq!(
            HashFunction::new(HashFamily::Sha3, 200).block_size(),
            Err(KdfError::UnsupportedHash { family: HashFamily::Sha3, digest_size: 200 })
        );
    }

    #[test]
    fn hlen_agrees_with_engine_construction() {
        for family in [HashFamily::Sha2, HashFamily::Sha3] {
            for size in 0..=130 {
                let h = HashFunction::new(family, size);
                assert_eq!(h.hlen().is_ok(), h.engine().is_ok(), "{} / {}", family, size);
            }
        }
        assert_eq!(HashFunction::SHA3_384.hlen(), Ok(48));
        assert_eq!(
            HashFunction::SHAKE128.hlen(),
            Err(KdfError::UnsupportedHash { family: HashFamily::Sha3, digest_size: 16 })
        );
    }

    #[test]
    fn engine_digest_sizes_match_selection() {
        for h in [
            HashFunction::SHA256,
            HashFunction::SHA384,
            HashFunction::SHA512,
            HashFunction::SHA3_224,
            HashFunction::SHA3_256,
            HashFunction::SHA3_384,
            HashFunction::SHA3_512,
        ] {
            let d = h.engine().unwrap().finalize();
            assert_eq!(d.len(), h.digest_size());
        }
    }

    #[test]
    fn absorb_helpers_match_plain_absorb() {
        let mut a = HashFunction::SHA256.engine().unwrap();
        a.absorb_zeros(130);
        a.absorb_byte(0x7f);
        a.absorb_u32(0x0102_0304);

        let mut b = HashFunction::SHA256.engine().unwrap();
        let mut raw = [0u8; 130 + 1 + 4];
        raw[130] = 0x7f;
        raw[131..].copy_from_slice(&[1, 2, 3, 4]);
        b.absorb(&raw);

        assert_eq!(a.finalize().as_slice(), b.finalize().as_slice());
    }
}
