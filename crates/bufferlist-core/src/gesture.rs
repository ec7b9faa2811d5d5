#![forbid(unsafe_code)]

//! Gestures a host reports against a materialized list item.
//!
//! [`ItemGesture`] represents what the user *did* to an item rather than the
//! raw touch or pointer samples that produced it. Recognizing gestures is the
//! host's job; the engine only maps them onto record indices and list events.
//!
//! # Invariants
//! 1. `Swipe` velocity is always non-negative (enforced by [`ItemGesture::swipe`]).

// ---------------------------------------------------------------------------
// SwipeDirection
// ---------------------------------------------------------------------------

/// Cardinal direction for swipe gestures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwipeDirection {
    Up,
    Down,
    Left,
    Right,
}

// ---------------------------------------------------------------------------
// ItemGesture
// ---------------------------------------------------------------------------

/// A recognized gesture on one list item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ItemGesture {
    /// Finger (or pointer) went down on the item.
    TouchStart,
    /// Finger moved while down; cancels any pressed styling.
    TouchMove,
    /// Finger lifted from the item.
    TouchEnd,
    /// Single tap.
    Tap,
    /// Two taps within the host's double-tap threshold.
    DoubleTap,
    /// Rapid movement across the item.
    Swipe {
        direction: SwipeDirection,
        /// Distance in pixels.
        distance: u32,
        /// Velocity in pixels per second (always >= 0.0).
        velocity: f32,
    },
}

impl ItemGesture {
    /// Build a swipe, clamping negative or NaN velocity to zero.
    #[must_use]
    pub fn swipe(direction: SwipeDirection, distance: u32, velocity: f32) -> Self {
        let velocity = if velocity.is_nan() {
            0.0
        } else {
            velocity.max(0.0)
        };
        Self::Swipe {
            direction,
            distance,
            velocity,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn swipe_nan_velocity_is_zero() {
        match ItemGesture::swipe(SwipeDirection::Right, 10, f32::NAN) {
            ItemGesture::Swipe { velocity, .. } => assert_eq!(velocity, 0.0),
            other => panic!("unexpected gesture {other:?}"),
        }
    }

    proptest! {
        #[test]
        fn swipe_velocity_never_negative(v in -1.0e6f32..1.0e6, d in 0u32..10_000) {
            match ItemGesture::swipe(SwipeDirection::Left, d, v) {
                ItemGesture::Swipe { velocity, distance, .. } => {
                    prop_assert!(velocity >= 0.0);
                    prop_assert_eq!(distance, d);
                }
                _ => prop_assert!(false),
            }
        }
    }
}
