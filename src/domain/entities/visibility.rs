//! Visible window of the grid and scroll state.

use std::ops::Range;

/// The block of grid positions currently on screen.
/// Replaced wholesale on every scroll notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VisibilityWindow {
    /// Index of the first visible item.
    pub first: usize,
    /// Number of visible items.
    pub count: usize,
}

impl VisibilityWindow {
    #[must_use]
    pub const fn new(first: usize, count: usize) -> Self {
        Self { first, count }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Grid indices covered by this window.
    #[must_use]
    pub const fn indices(&self) -> Range<usize> {
        self.first..self.first.saturating_add(self.count)
    }

    #[must_use]
    pub const fn contains(&self, index: usize) -> bool {
        index >= self.first && index < self.first.saturating_add(self.count)
    }
}

impl std::fmt::Display for VisibilityWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}..{})", self.first, self.first.saturating_add(self.count))
    }
}

/// Scroll state reported by the view layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollState {
    /// The grid is at rest.
    #[default]
    Idle,
    /// The user is dragging or the grid is flinging.
    Scrolling,
}

impl ScrollState {
    #[must_use]
    pub const fn from_idle(idle: bool) -> Self {
        if idle { Self::Idle } else { Self::Scrolling }
    }

    #[must_use]
    pub const fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }
}
