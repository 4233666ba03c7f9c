//! Boundary topologies: how separations are measured and how agents are
//! kept inside the arena after a move.

use crate::error::ConfigError;
use crate::vector::Vector2D;

/// Rectangular arena `[0, width) × [0, height)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Domain {
    pub width: f64,
    pub height: f64,
}

impl Domain {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn square(size: f64) -> Self {
        Self::new(size, size)
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn center(&self) -> Vector2D {
        Vector2D::new(self.width / 2.0, self.height / 2.0)
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        let ok = |v: f64| v.is_finite() && v > 0.0;
        if ok(self.width) && ok(self.height) {
            Ok(())
        } else {
            Err(ConfigError::InvalidDomain {
                width: self.width,
                height: self.height,
            })
        }
    }
}

impl Default for Domain {
    fn default() -> Self {
        Self::square(10.0)
    }
}

/// Boundary topology of the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Topology {
    /// Hard walls: plain Euclidean distances, positions clamped to the edge.
    #[default]
    Free,
    /// Torus: minimum-image distances, positions wrapped around.
    Periodic,
}

impl Topology {
    /// Signed separation `b - a` under this topology.
    pub fn separation(self, a: Vector2D, b: Vector2D, domain: &Domain) -> Vector2D {
        match self {
            Topology::Free => b - a,
            Topology::Periodic => Vector2D::new(
                axis_distance(a.x, b.x, domain.width),
                axis_distance(a.y, b.y, domain.height),
            ),
        }
    }

    pub fn distance(self, a: Vector2D, b: Vector2D, domain: &Domain) -> f64 {
        match self {
            Topology::Free => distance(a.x, a.y, b.x, b.y),
            Topology::Periodic => self.separation(a, b, domain).magnitude(),
        }
    }

    /// Maps a post-move position back into the arena.
    pub fn confine(self, p: Vector2D, domain: &Domain) -> Vector2D {
        match self {
            Topology::Free => Vector2D::new(clamp(p.x, domain.width), clamp(p.y, domain.height)),
            Topology::Periodic => Vector2D::new(wrap(p.x, domain.width), wrap(p.y, domain.height)),
        }
    }
}

/// Euclidean distance between `(ax, ay)` and `(bx, by)`.
pub fn distance(ax: f64, ay: f64, bx: f64, by: f64) -> f64 {
    Vector2D::new(ax, ay).distance(&Vector2D::new(bx, by))
}

/// Minimum-image separation `b - a` along one periodic axis of length `extent`.
pub fn axis_distance(a: f64, b: f64, extent: f64) -> f64 {
    let d = b - a;
    if d > extent / 2.0 {
        d - extent
    } else if d < -extent / 2.0 {
        d + extent
    } else {
        d
    }
}

/// Hard wall: agents stick to the boundary.
pub fn clamp(v: f64, upper: f64) -> f64 {
    if v > upper {
        upper
    } else if v < 0.0 {
        0.0
    } else {
        v
    }
}

/// Single-period wrap. Assumes one step never crosses more than one arena width.
pub fn wrap(v: f64, upper: f64) -> f64 {
    let w = if v >= upper {
        v - upper
    } else if v < 0.0 {
        v + upper
    } else {
        v
    };
    // -1e-17 + upper rounds to upper
    if w >= upper {
        0.0
    } else {
        w
    }
}
