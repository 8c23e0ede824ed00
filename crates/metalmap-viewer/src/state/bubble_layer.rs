//! Animated bubble layer driven by wall-clock time.

use std::time::{Duration, Instant};

use metalmap_core::{Bubble, BubbleFrame, BubbleTransitions};

/// Bubble transitions plus the frame most recently sampled from them.
#[derive(Debug, Clone)]
pub struct BubbleLayer {
    origin: Instant,
    transitions: BubbleTransitions,
    frames: Vec<BubbleFrame>,
    settled: bool,
}

impl Default for BubbleLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl BubbleLayer {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            transitions: BubbleTransitions::new(),
            frames: Vec::new(),
            settled: true,
        }
    }

    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    /// Starts transitions towards a new layout.
    pub fn retarget(&mut self, layout: &[Bubble]) {
        let now = self.now();
        self.transitions.retarget(layout, now);
        self.sample(now);
    }

    /// Samples the next animation frame. Does nothing once settled.
    pub fn tick(&mut self) {
        if !self.settled {
            let now = self.now();
            self.sample(now);
        }
    }

    fn sample(&mut self, now: Duration) {
        self.frames = self.transitions.frame(now);
        self.settled = !self.transitions.is_animating(now);
    }

    pub fn is_settled(&self) -> bool {
        self.settled
    }

    pub fn frames(&self) -> &[BubbleFrame] {
        &self.frames
    }
}
