use super::*;
use fold_json::{serde_json, JsonSer};

/// A primitive piece of display geometry, in world coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Point(Vector),
    Segment([Vector; 2]),
    /// A segment with a direction, drawn from `from` to `to`
    Arrow { from: Vector, to: Vector },
    /// A flat polygon, given by its vertices in order
    Face(Vec<Vector>),
}

impl Shape {
    #[inline]
    pub fn segment(a: impl Into<Vector>, b: impl Into<Vector>) -> Self {
        Self::Segment([a.into(), b.into()])
    }

    #[inline]
    pub fn arrow(from: impl Into<Vector>, to: impl Into<Vector>) -> Self {
        Self::Arrow {
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn points(&self) -> &[Vector] {
        match self {
            Self::Point(p) => core::slice::from_ref(p),
            Self::Segment(ends) => ends,
            Self::Arrow { from, .. } => core::slice::from_ref(from),
            Self::Face(vertices) => vertices,
        }
    }

    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Point(_) => "point",
            Self::Segment(_) => "segment",
            Self::Arrow { .. } => "arrow",
            Self::Face(_) => "face",
        }
    }
}

impl JsonSer for Shape {
    fn to_json(&self) -> serde_json::Value {
        let points = |points: &[Vector]| {
            Vec::from_iter(points.iter().map(|p| serde_json::json!(p.as_slice())))
        };

        match self {
            Self::Arrow { from, to } => serde_json::json!({
                "type": self.kind(),
                "points": points(&[*from, *to]),
            }),
            _ => serde_json::json!({
                "type": self.kind(),
                "points": points(self.points()),
            }),
        }
    }
}
