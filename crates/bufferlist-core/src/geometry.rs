#![forbid(unsafe_code)]

//! Pixel geometry shared by the engine and its hosts.
//!
//! All offsets are measured from the top of the scrollable content (the top
//! edge of the top proxy). Scroll positions may be negative while a host is
//! overscrolling ("pulling down") at the top of the list.

/// A signed pixel quantity.
pub type Px = i64;

/// Measured vertical extent of a materialized item node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ItemExtent {
    /// Offset of the node's top edge within the scroll content.
    pub top: Px,
    /// Rendered height of the node, including any group header it carries.
    pub height: Px,
}

impl ItemExtent {
    /// Create a new extent.
    #[must_use]
    pub const fn new(top: Px, height: Px) -> Self {
        Self { top, height }
    }

    /// Offset of the node's bottom edge.
    #[must_use]
    pub const fn bottom(self) -> Px {
        self.top + self.height
    }
}

/// Direction of travel between two consecutive scroll ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollDirection {
    /// Toward lower record indices.
    Up,
    /// Toward higher record indices.
    Down,
}

impl ScrollDirection {
    /// Derive the direction from the previous and current scroll positions.
    ///
    /// A tick that did not move counts as scrolling down.
    #[must_use]
    pub const fn between(last: Px, current: Px) -> Self {
        if current >= last { Self::Down } else { Self::Up }
    }

    /// Returns true when scrolling toward higher indices.
    #[must_use]
    pub const fn is_down(self) -> bool {
        matches!(self, Self::Down)
    }
}
