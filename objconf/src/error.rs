//! Error types shared by the codec, the store and the property editor.

use std::io;

use thiserror::Error;

/// Failure of a serialize or deserialize call.
///
/// The codec never recovers from any of these; the store only substitutes
/// defaults when the settings file does not exist at all.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The stream could not be read or written.
    #[error("I/O failure: {0}")]
    Io(#[from] io::Error),
    /// The document does not match the declared shape of the target type.
    #[error("malformed input: {0}")]
    Malformed(String),
    /// The value holds a shape the selected encoding cannot carry.
    #[error("unsupported shape: {0}")]
    UnsupportedShape(String),
}

impl CodecError {
    /// Classify a read failure. Invalid UTF-8 is a malformed document, not an
    /// I/O problem.
    pub(crate) fn from_read(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::InvalidData {
            CodecError::Malformed(err.to_string())
        } else {
            CodecError::Io(err)
        }
    }
}

/// File extension that maps to no known encoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported settings file extension: {0:?}")]
pub struct UnknownFormat(pub String);

/// Failure to assign a textual value to a property.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssignError {
    /// Records and containers are edited through their properties.
    #[error("{0} values cannot be assigned from text")]
    NotScalar(&'static str),
    /// The text does not parse as the property's type.
    #[error("invalid {ty} value {text:?}: {reason}")]
    Parse {
        /// Type being assigned.
        ty: &'static str,
        /// Rejected input.
        text: String,
        /// Parser message.
        reason: String,
    },
    /// The text names no variant of the enumeration.
    #[error("{text:?} is not a {ty} variant, expected one of {variants:?}")]
    UnknownVariant {
        /// Enumeration being assigned.
        ty: &'static str,
        /// Rejected input.
        text: String,
        /// Accepted variant names.
        variants: &'static [&'static str],
    },
}

/// Failure to follow a dot-separated property path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// A segment names no property and no container element.
    #[error("`{path}` has no property or element `{segment}`")]
    NotFound {
        /// Path resolved so far.
        path: String,
        /// Segment that failed.
        segment: String,
    },
    /// An intermediate value is absent.
    #[error("`{0}` is absent")]
    Absent(String),
    /// The property exists but has no setter.
    #[error("`{0}` is read-only")]
    ReadOnly(String),
}

/// Failure of a path-addressed edit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// The path did not resolve.
    #[error(transparent)]
    Path(#[from] PathError),
    /// The value was rejected.
    #[error(transparent)]
    Assign(#[from] AssignError),
}
