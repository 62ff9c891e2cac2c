use std::path::PathBuf;

use crate::hash::{ContentHash, HashAlgorithm};

/// One output file, named after a hash of its content.
///
/// The logical target (`shop.js`, `shop-main.css`) travels with the
/// physical filename (`shop-<hash>.js`) so the manifest never has to parse
/// it back out of the name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    target: String,
    filename: String,
    hash: ContentHash,
    contents: String,
}

impl Artifact {
    /// Hash `contents` and name the artifact `<stem>-<hash><extension>`.
    ///
    /// `extension` includes its leading dot.
    ///
    /// # Example
    ///
    /// ```
    /// use lovin_bundler::{Artifact, HashAlgorithm};
    ///
    /// let css = Artifact::hashed("shop-main", ".css", "a{}".to_string(), HashAlgorithm::Md5);
    /// assert_eq!(css.target(), "shop-main.css");
    /// assert_eq!(css.filename(), format!("shop-main-{}.css", css.hash()));
    /// ```
    pub fn hashed(stem: &str, extension: &str, contents: String, algorithm: HashAlgorithm) -> Self {
        let hash = algorithm.digest(contents.as_bytes());
        Self {
            target: format!("{}{}", stem, extension),
            filename: format!("{}-{}{}", stem, hash, extension),
            hash,
            contents,
        }
    }

    /// A file named after this artifact's hash plus `suffix`, such as a
    /// source map written next to its script.
    pub fn companion(&self, suffix: &str, contents: String) -> Self {
        Self {
            target: format!("{}{}", self.target, suffix),
            filename: format!("{}{}", self.filename, suffix),
            hash: self.hash.clone(),
            contents,
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// The hash that names this file.
    pub fn hash(&self) -> &ContentHash {
        &self.hash
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }
}

/// An artifact after it has been written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenArtifact {
    pub target: String,
    pub filename: String,
    pub path: PathBuf,
    pub hash: ContentHash,
}
