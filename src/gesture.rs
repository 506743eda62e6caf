//! # Swipe-to-dismiss decision.
//!
//! The renderer owns the drag (springs, resistance, blur). When the finger
//! lifts it reports one [`DragSample`] and asks [`decide`] whether the toast
//! should leave or spring back. The result is binary; over-drag past the
//! threshold never changes it.
//!
//! ## Coordinates
//! Vertical axis, **positive = upward**. A toast at the top edge is dismissed
//! by dragging/flinging up (positive values); a toast at the bottom edge by
//! dragging/flinging down (negative values). Motion toward the screen centre
//! never dismisses.
//!
//! ```text
//! dismiss ⇔ outward_distance ≥ 30  ∨  outward_velocity ≥ 200
//! ```

/// Screen edge the toast is presented from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Edge {
    #[default]
    Top,
    Bottom,
}

impl Edge {
    /// Sign that turns an upward-positive value into an outward one.
    #[inline]
    fn outward_sign(self) -> f32 {
        match self {
            Edge::Top => 1.0,
            Edge::Bottom => -1.0,
        }
    }
}

/// One gesture measurement reported by the renderer at release.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSample {
    /// Total vertical translation (units, positive = up).
    pub distance: f32,
    /// Vertical release velocity (units/s, positive = up).
    pub velocity: f32,
    /// Edge the toast is attached to.
    pub edge: Edge,
}

impl DragSample {
    /// Creates a sample.
    pub fn new(distance: f32, velocity: f32, edge: Edge) -> Self {
        Self {
            distance,
            velocity,
            edge,
        }
    }
}

/// Outcome of a released drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    /// Retire the toast (`UserSwipe`).
    Dismiss,
    /// Return to rest; no scheduler event.
    SpringBack,
}

/// Dismiss thresholds along the outward axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureThresholds {
    /// Minimum outward translation.
    pub distance: f32,
    /// Minimum outward release velocity.
    pub velocity: f32,
}

impl Default for GestureThresholds {
    /// `distance = 30`, `velocity = 200`.
    fn default() -> Self {
        Self {
            distance: 30.0,
            velocity: 200.0,
        }
    }
}

impl GestureThresholds {
    /// Decides a sample against these thresholds.
    ///
    /// Non-finite inputs never dismiss.
    #[must_use]
    pub fn decide(&self, sample: DragSample) -> Decision {
        let sign = sample.edge.outward_sign();
        let distance = sample.distance * sign;
        let velocity = sample.velocity * sign;

        let far_enough = distance.is_finite() && distance >= self.distance;
        let fast_enough = velocity.is_finite() && velocity >= self.velocity;
        if far_enough || fast_enough {
            Decision::Dismiss
        } else {
            Decision::SpringBack
        }
    }
}

/// Decides with the default thresholds.
///
/// # Example
/// ```
/// use toastvisor::gesture::{decide, Decision, Edge};
///
/// assert_eq!(decide(40.0, 0.0, Edge::Top), Decision::Dismiss);
/// assert_eq!(decide(10.0, 50.0, Edge::Top), Decision::SpringBack);
/// assert_eq!(decide(10.0, 250.0, Edge::Top), Decision::Dismiss);
/// ```
#[must_use]
pub fn decide(distance: f32, velocity: f32, edge: Edge) -> Decision {
    GestureThresholds::default().decide(DragSample::new(distance, velocity, edge))
}
