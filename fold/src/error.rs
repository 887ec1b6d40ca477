use core::fmt;

use crate::Float;

/// The ways a configuration can fail to define a unique geometric result.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Degeneracy {
    /// The ray is (nearly) parallel to the plane. Holds the cosine between the
    /// ray direction and the plane normal.
    ParallelRay(Float),
    /// A direction vector has zero length.
    ZeroDirection,
    /// A vector is perpendicular to the plane it was projected on, and has no
    /// direction left in it.
    ZeroProjection,
}

impl fmt::Display for Degeneracy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Degeneracy::ParallelRay(cos) => {
                write!(f, "ray is parallel to the mirror plane (cos = {cos:e})")
            }
            Degeneracy::ZeroDirection => write!(f, "direction vector has zero length"),
            Degeneracy::ZeroProjection => {
                write!(f, "vector is normal to the projection plane")
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(Degeneracy),
    #[error("invalid frame: {0}")]
    InvalidFrame(&'static str),
    #[error("the mirror chain is empty")]
    EmptyChain,
    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),
    /// A failure while bouncing off the `index`th mirror of a chain.
    #[error("mirror {index}: {source}")]
    AtMirror {
        index: usize,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// The underlying error, without the chain position.
    #[must_use]
    pub fn root(&self) -> &Error {
        match self {
            Error::AtMirror { source, .. } => source.root(),
            e => e,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        matches!(self.root(), Error::DegenerateGeometry(_))
    }

    #[inline]
    pub(crate) fn at_mirror(self, index: usize) -> Self {
        Error::AtMirror {
            index,
            source: Box::new(self),
        }
    }
}

pub type Result<T, E = Error> = core::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_looks_through_chain_position() {
        let e = Error::DegenerateGeometry(Degeneracy::ZeroDirection).at_mirror(3);

        assert_eq!(
            e.root(),
            &Error::DegenerateGeometry(Degeneracy::ZeroDirection)
        );
        assert!(e.is_degenerate());
        assert!(!Error::EmptyChain.is_degenerate());
        assert_eq!(
            e.to_string(),
            "mirror 3: degenerate geometry: direction vector has zero length"
        );
    }
}
