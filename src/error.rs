//! Unified error type for hashkdf.

use core::fmt;

use crate::engine::HashFamily;

/// Every failure a derivation can report.
///
/// All variants depend only on static parameters (hash selection, lengths,
/// iteration count, DST length), never on the content of keys or messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KdfError {
    /// The (family, digest size) pair has no backend or block size.
    UnsupportedHash { family: HashFamily, digest_size: usize },
    /// The backend finalized to zero bytes.
    EmptyDigest,
    /// Domain-separation tags are framed with a single length byte.
    DstTooLong(usize),
    /// The requested output does not fit the algorithm's counter framing.
    OutputTooLong { requested: usize, max: usize },
    /// PBKDF2 needs at least one iteration.
    ZeroIterations,
}

impl fmt::Display for KdfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedHash { family, digest_size } => {
                write!(f, "unsupported hash: {} with {}-byte digest", family, digest_size)
            }
            Self::EmptyDigest => write!(f, "hash produced an empty digest"),
            Self::DstTooLong(len) => write!(f, "domain separation tag too long: {} > 255 bytes", len),
            Self::OutputTooLong { requested, max } => {
                write!(f, "requested output too long: {} > {} bytes", requested, max)
            }
            Self::ZeroIterations => write!(f, "iteration count must be at least 1"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for KdfError {}
