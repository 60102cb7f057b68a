//! Arrow-driven planar translation
//!
//! The trailer and the flying saucer both translate freely on the ground
//! plane under held arrow intents. The saucer additionally carries a radial
//! bound: a move whose destination leaves the allowed disc is rejected
//! outright rather than clamped to the rim.

use cgmath::Vector3;

/// Held directional intents, one flag per arrow key.
///
/// An explicit flag set rather than a string-keyed event bag; the frame
/// update only ever reads the four booleans.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArrowIntents {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl ArrowIntents {
    /// Net ground-plane direction. Up points into the screen (-Z) as seen
    /// from the front camera; opposing arrows cancel per axis.
    pub fn direction(&self) -> Vector3<f32> {
        let x = (self.right as i32 - self.left as i32) as f32;
        let z = (self.down as i32 - self.up as i32) as f32;
        Vector3::new(x, 0.0, z)
    }

    pub fn any(&self) -> bool {
        self.up || self.down || self.left || self.right
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// A free XZ translation driven by arrow intents.
#[derive(Debug, Clone, Copy)]
pub struct PlanarMover {
    pub position: Vector3<f32>,
    /// Displacement rate in units per second, applied per axis.
    pub speed: f32,
    pub intents: ArrowIntents,
    /// Maximum distance from the origin on the XZ plane. `None` leaves the
    /// mover unbounded (trailer); `Some` gates each move (saucer).
    pub radial_limit: Option<f32>,
}

impl PlanarMover {
    pub fn new(position: Vector3<f32>, speed: f32) -> Self {
        Self {
            position,
            speed,
            intents: ArrowIntents::default(),
            radial_limit: None,
        }
    }

    pub fn with_radial_limit(mut self, limit: f32) -> Self {
        self.radial_limit = Some(limit);
        self
    }

    /// Applies the held intents for this frame.
    ///
    /// Diagonal movement is per-axis additive, matching the arrow handling
    /// of the source scenes. With a radial limit set, a destination outside
    /// the disc leaves the position untouched.
    pub fn advance(&mut self, dt: f32) {
        let dir = self.intents.direction();
        if dir.x == 0.0 && dir.z == 0.0 {
            return;
        }
        let next = self.position + dir * (self.speed * dt);
        if let Some(limit) = self.radial_limit {
            if next.x * next.x + next.z * next.z >= limit * limit {
                return;
            }
        }
        self.position = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_cancels_opposing_arrows() {
        let intents = ArrowIntents {
            up: true,
            down: true,
            left: true,
            right: false,
        };
        let dir = intents.direction();
        assert_eq!(dir.x, -1.0);
        assert_eq!(dir.z, 0.0);
    }

    #[test]
    fn test_advance_applies_speed_per_axis() {
        let mut mover = PlanarMover::new(Vector3::new(0.0, 0.0, 0.0), 2.0);
        mover.intents.right = true;
        mover.intents.down = true;
        mover.advance(0.5);
        assert_eq!(mover.position.x, 1.0);
        assert_eq!(mover.position.z, 1.0);
        assert_eq!(mover.position.y, 0.0);
    }

    #[test]
    fn test_radial_limit_rejects_whole_move() {
        let mut mover =
            PlanarMover::new(Vector3::new(9.5, 0.0, 0.0), 1.0).with_radial_limit(10.0);
        mover.intents.right = true;
        mover.advance(1.0);
        // 10.5 would leave the disc: position must be unchanged, not clamped.
        assert_eq!(mover.position.x, 9.5);

        mover.intents.clear();
        mover.intents.left = true;
        mover.advance(1.0);
        assert_eq!(mover.position.x, 8.5);
    }

    #[test]
    fn test_idle_intents_leave_position_untouched() {
        let mut mover = PlanarMover::new(Vector3::new(1.0, 2.0, 3.0), 5.0);
        mover.advance(1.0);
        assert_eq!(mover.position, Vector3::new(1.0, 2.0, 3.0));
    }
}
