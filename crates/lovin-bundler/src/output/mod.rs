//! Build artifacts and writing them to the output directory.

mod artifact;
pub mod writer;

pub use artifact::{Artifact, WrittenArtifact};
pub use writer::write_artifacts;
