//! Host-side presentation surface.

use crate::timeline::PresentationSurface;
use crate::FRAME_COUNT;

/// Rotates through `N` images the way a flip-model swap chain does.
#[derive(Debug, Clone)]
pub struct RoundRobinSurface<const N: usize = FRAME_COUNT> {
    current: usize,
    presented: u64,
}

impl<const N: usize> RoundRobinSurface<N> {
    /// Creates a surface whose first image is `start % N`.
    pub fn new(start: usize) -> Self {
        Self {
            current: start % N,
            presented: 0,
        }
    }

    /// Presents the current image and moves to the next one.
    pub fn present(&mut self) {
        self.current = (self.current + 1) % N;
        self.presented += 1;
    }

    /// Number of `present` calls so far.
    pub fn presented(&self) -> u64 {
        self.presented
    }
}

impl<const N: usize> Default for RoundRobinSurface<N> {
    fn default() -> Self {
        Self::new(0)
    }
}

impl<const N: usize> PresentationSurface for RoundRobinSurface<N> {
    fn current_slot(&self) -> usize {
        self.current
    }
}
