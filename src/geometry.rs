//! Planar geometry for transmitter and receiver placement.
//!
//! Positions live in an arbitrary planar unit; bearings are expressed in
//! degrees and wrapped to the interval (−180°, 180°], with 0° pointing along
//! the positive x axis and 90° along the positive y axis.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Separation below which a link is considered degenerate.
pub const MIN_LINK_DISTANCE: f64 = 1e-9;

/// A 2D position in the planar domain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    /// Creates a new position.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Origin position (0, 0).
    pub fn origin() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Euclidean distance to another position.
    pub fn distance_to(&self, other: &Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Bearing from `self` toward `target`, in degrees in (−180°, 180°].
    ///
    /// Undefined for coincident positions; callers must reject degenerate
    /// geometry first (see [`Link::is_degenerate`]).
    pub fn bearing_to(&self, target: &Position) -> f64 {
        let dx = target.x - self.x;
        let dy = target.y - self.y;
        wrap_deg(dy.atan2(dx).to_degrees())
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

/// A directed transmitter → receiver pair.
///
/// Immutable for the duration of one optimize request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    /// Transmitter position.
    pub tx: Position,
    /// Receiver position.
    pub rx: Position,
}

impl Link {
    /// Creates a new link.
    pub fn new(tx: Position, rx: Position) -> Self {
        Self { tx, rx }
    }

    /// Transmitter-to-receiver distance.
    pub fn distance(&self) -> f64 {
        self.tx.distance_to(&self.rx)
    }

    /// True bearing from the transmitter to its own receiver, in degrees.
    pub fn bearing_deg(&self) -> f64 {
        self.tx.bearing_to(&self.rx)
    }

    /// Whether transmitter and receiver coincide.
    ///
    /// Degenerate links have an undefined bearing and must be rejected
    /// before they reach the channel model.
    pub fn is_degenerate(&self) -> bool {
        self.distance() < MIN_LINK_DISTANCE
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.tx, self.rx)
    }
}

/// Wraps an angle in degrees to the interval (−180°, 180°].
pub fn wrap_deg(angle: f64) -> f64 {
    let mut a = angle % 360.0;
    if a <= -180.0 {
        a += 360.0;
    } else if a > 180.0 {
        a -= 360.0;
    }
    a
}

/// Absolute wrapped difference between two angles in degrees, in [0°, 180°].
pub fn angle_offset_deg(a: f64, b: f64) -> f64 {
    wrap_deg(a - b).abs()
}
