//! MeshError: unified error type for mesh-ahf public APIs
//!
//! Every fallible operation in the crate returns this error instead of
//! panicking. Index and lookup failures are local and recoverable; build
//! failures abort the build and name the element/half-facet that triggered
//! them.

use crate::topology::key::{ElementKey, VertexKey};
use thiserror::Error;

/// Unified error type for mesh-ahf operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MeshError {
    /// Attempted to construct a key with a zero value (invalid).
    #[error("key must be non-zero (0 is reserved as invalid/sentinel), got {0}")]
    InvalidKey(u64),
    /// A 1-based half-facet or sibling slot index was outside its valid range.
    #[error("{what} index {index} out of range 1..={len}")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },
    /// A vertex with the same key is already registered.
    #[error("duplicate vertex key {0}")]
    DuplicateVertexKey(VertexKey),
    /// An element with the same key is already registered.
    #[error("duplicate element key {0}")]
    DuplicateElementKey(ElementKey),
    /// An element references a vertex key that is not registered.
    #[error("element {element} references unknown vertex {vertex}")]
    UnknownVertex {
        element: ElementKey,
        vertex: VertexKey,
    },
    /// No vertex is registered under this key.
    #[error("unknown vertex {0}")]
    MissingVertex(VertexKey),
    /// No element is registered under this key.
    #[error("unknown element {0}")]
    UnknownElement(ElementKey),
    /// A vertex cannot be removed while elements still reference it.
    #[error("vertex {vertex} is still referenced by element {element}")]
    VertexInUse {
        vertex: VertexKey,
        element: ElementKey,
    },
    /// The vertex list length does not match the element type.
    #[error("element {element} expects {expected} vertices, got {found}")]
    VertexCountMismatch {
        element: ElementKey,
        expected: usize,
        found: usize,
    },
    /// The same vertex key appears more than once in one element.
    #[error("element {element} lists vertex {vertex} more than once")]
    RepeatedVertex {
        element: ElementKey,
        vertex: VertexKey,
    },
    /// Element type code is not part of the shape catalog.
    #[error("unsupported element type code {0}")]
    UnsupportedElementType(i32),
    /// Two half-facets of the same element produced the same signature.
    #[error(
        "element {element}: half-facets {half_facet} and {duplicate_of} share the same vertex set"
    )]
    DegenerateFacetGroup {
        element: ElementKey,
        half_facet: usize,
        duplicate_of: usize,
    },
    /// More elements share one facet than a sibling slot index can address.
    #[error("element {element} half-facet {half_facet}: {count} siblings exceed slot capacity")]
    TooManySiblings {
        element: ElementKey,
        half_facet: usize,
        count: usize,
    },
    /// A facet is shared by more than two elements and the build forbids it.
    #[error("element {element} half-facet {half_facet} is shared by {incident} elements")]
    NonManifoldFacet {
        element: ElementKey,
        half_facet: usize,
        incident: usize,
    },
    /// The operation needs adjacency that has not been built (or was invalidated).
    #[error("topology has not been built")]
    TopologyNotBuilt,
    /// A structural invariant of the built topology does not hold.
    #[error("topology invariant violated: {0}")]
    InvariantViolation(String),
    /// Malformed mesh file content.
    #[error("mesh parse error: {0}")]
    MeshIoParse(String),
    /// Underlying reader failure.
    #[error("mesh i/o error: {0}")]
    Io(String),
}

impl From<std::io::Error> for MeshError {
    fn from(err: std::io::Error) -> Self {
        MeshError::Io(err.to_string())
    }
}
