//! Scroll-offset animator with exponential ease-out.
//!
//! The scroll surface keeps two numbers: the logical target offset (where
//! input put us) and the displayed offset, which chases the target a fixed
//! fraction per tick.  The stack engine only ever sees the displayed offset.

/// Offset animator for the stack's scroll surface.
#[derive(Debug, Clone)]
pub struct SmoothScroll {
    /// Offset currently shown.
    current: f64,
    /// Offset the animation settles on.
    target: f64,
    /// Damping: `gap *= (1 - speed)` each tick.
    /// Higher speed = faster settle.  Good range: 0.25–0.45 at 20 fps.
    speed: f64,
}

/// Gaps smaller than this snap to the target.
const SETTLE_EPSILON: f64 = 0.05;

impl SmoothScroll {
    pub fn new(speed: f64) -> Self {
        Self {
            current: 0.0,
            target: 0.0,
            speed: speed.clamp(0.05, 0.95),
        }
    }

    /// Animate toward `target`.
    pub fn set_target(&mut self, target: f64) {
        self.target = target;
    }

    /// Move both target and displayed offset immediately (no animation).
    pub fn jump_to(&mut self, offset: f64) {
        self.target = offset;
        self.current = offset;
    }

    /// Close the gap by one step.  Call once per frame.
    pub fn tick(&mut self) {
        let gap = self.target - self.current;
        if gap.abs() < SETTLE_EPSILON {
            self.current = self.target;
        } else {
            self.current += gap * self.speed;
        }
    }

    /// Displayed offset.
    pub fn offset(&self) -> f64 {
        self.current
    }

    /// Offset the animation is heading to.
    pub fn target(&self) -> f64 {
        self.target
    }

    /// True while the displayed offset has not reached the target.
    pub fn is_animating(&self) -> bool {
        self.current != self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settles_on_target() {
        let mut s = SmoothScroll::new(0.4);
        s.set_target(100.0);
        assert!(s.is_animating());
        s.tick();
        assert_eq!(s.offset(), 40.0);
        for _ in 0..40 {
            s.tick();
        }
        assert_eq!(s.offset(), 100.0);
        assert!(!s.is_animating());
    }

    #[test]
    fn moves_monotonically_toward_target() {
        let mut s = SmoothScroll::new(0.3);
        s.jump_to(50.0);
        s.set_target(10.0);
        let mut last = s.offset();
        while s.is_animating() {
            s.tick();
            assert!(s.offset() <= last);
            assert!(s.offset() >= 10.0);
            last = s.offset();
        }
    }

    #[test]
    fn speed_is_clamped() {
        let mut s = SmoothScroll::new(5.0);
        s.set_target(10.0);
        s.tick();
        assert!(s.offset() < 10.0);
    }
}
