//! Content hashing for cache-busted filenames.
//!
//! The hash is a pure function of an artifact's final bytes, so identical
//! output always lands in an identically named file.

use sha2::{Digest, Sha256};

use crate::{Error, Result};

/// Digest used to name artifacts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HashAlgorithm {
    /// 32 hex characters. Matches the names produced by earlier builds.
    #[default]
    Md5,
    /// 64 hex characters.
    Sha256,
    /// 64 hex characters.
    Blake3,
}

impl HashAlgorithm {
    /// Parse an algorithm name (case-insensitive).
    ///
    /// # Examples
    ///
    /// ```
    /// use lovin_bundler::HashAlgorithm;
    ///
    /// assert_eq!(HashAlgorithm::parse("MD5").unwrap(), HashAlgorithm::Md5);
    /// assert!(HashAlgorithm::parse("crc32").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "md5" => Ok(Self::Md5),
            "sha256" | "sha-256" => Ok(Self::Sha256),
            "blake3" => Ok(Self::Blake3),
            _ => Err(Error::InvalidConfig(format!(
                "Invalid hash algorithm: '{}'. Expected: md5, sha256, blake3",
                s
            ))),
        }
    }

    /// Hash `bytes`, returning lowercase hex.
    pub fn digest(&self, bytes: &[u8]) -> ContentHash {
        let hex = match self {
            Self::Md5 => format!("{:x}", md5::compute(bytes)),
            Self::Sha256 => format!("{:x}", Sha256::digest(bytes)),
            Self::Blake3 => blake3::hash(bytes).to_hex().to_string(),
        };
        ContentHash(hex)
    }
}

impl std::fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Md5 => write!(f, "md5"),
            Self::Sha256 => write!(f, "sha256"),
            Self::Blake3 => write!(f, "blake3"),
        }
    }
}

/// Hex digest of an artifact's content.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentHash(String);

impl ContentHash {
    /// Get the hash as a hex string.
    pub fn as_hex(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn md5_matches_known_digests() {
        assert_eq!(
            HashAlgorithm::Md5.digest(b"").as_hex(),
            "d41d8cd98f00b204e9800998ecf8427e"
        );
        assert_eq!(
            HashAlgorithm::Md5.digest(b"hello").as_hex(),
            "5d41402abc4b2a76b9719d911017c592"
        );
    }

    #[test]
    fn sha256_matches_known_digest() {
        assert_eq!(
            HashAlgorithm::Sha256.digest(b"hello").as_hex(),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn blake3_is_hex_of_expected_length() {
        let hash = HashAlgorithm::Blake3.digest(b"body{}");
        assert_eq!(hash.as_hex().len(), 64);
        assert!(hash.as_hex().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn digest_is_deterministic() {
        for algo in [HashAlgorithm::Md5, HashAlgorithm::Sha256, HashAlgorithm::Blake3] {
            assert_eq!(algo.digest(b"a{b:c}"), algo.digest(b"a{b:c}"));
            assert_ne!(algo.digest(b"a{b:c}"), algo.digest(b"a{b:d}"));
        }
    }

    #[test]
    fn parse_round_trips_display() {
        for algo in [HashAlgorithm::Md5, HashAlgorithm::Sha256, HashAlgorithm::Blake3] {
            assert_eq!(HashAlgorithm::parse(&algo.to_string()).unwrap(), algo);
        }
    }
}
