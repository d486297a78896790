//! Error types for reading and writing bezmesh files.

use thiserror::Error;

/// Errors that can occur while reading or writing files.
#[derive(Error, Debug)]
pub enum ParseError {
    /// I/O error reading or writing a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A token that should be a number is not one.
    #[error("line {line}: invalid number {token:?}")]
    InvalidNumber {
        /// Line number (1-indexed).
        line: usize,
        /// The offending token.
        token: String,
    },

    /// A line has the wrong number of values.
    #[error("line {line}: expected {expected} values, found {found}")]
    TokenCount {
        /// Line number (1-indexed).
        line: usize,
        /// Number of values required.
        expected: usize,
        /// Number of values present.
        found: usize,
    },

    /// The patch file has no patch count line.
    #[error("missing patch count")]
    MissingPatchCount,

    /// A patch block ended before all four curves were read.
    #[error("patch {patch} has {found} curve lines, expected 4")]
    IncompletePatch {
        /// Patch number (1-indexed).
        patch: usize,
        /// Curve lines read before the block ended.
        found: usize,
    },

    /// The number of patches read differs from the declared count.
    #[error("file declares {declared} patches but contains {found}")]
    PatchCountMismatch {
        /// Count from the header line.
        declared: usize,
        /// Complete patches read.
        found: usize,
    },

    /// A face refers to a vertex that does not exist.
    #[error("line {line}: face index {index} out of range")]
    FaceIndex {
        /// Line number (1-indexed).
        line: usize,
        /// The index as written in the file.
        index: i64,
    },

    /// The input file extension is not recognized.
    #[error("unrecognized input file format: {0}")]
    UnsupportedFormat(String),
}

/// Result type for file operations.
pub type Result<T> = std::result::Result<T, ParseError>;
