//! Neutral input snapshot consumed by the simulation.
//!
//! The window layer polls its own event source and fills this in once per
//! frame; the physics core never sees windowing types.

use crate::simulation::particle::Vec2f;

#[derive(Debug, Clone)]
pub struct InputState {
    pub pointer_held: bool,
    pub pointer_position: Vec2f,

    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            pointer_held: false,
            pointer_position: Vec2f::zeros(),
            up: false,
            down: false,
            left: false,
            right: false,
        }
    }
}

impl InputState {
    /// Axis-aligned gravity direction for the held arrow, if any.
    /// `None` means "keep whatever direction was last active".
    pub fn gravity_direction(&self) -> Option<Vec2f> {
        if self.left {
            Some(Vec2f::new(-1.0, 0.0))
        } else if self.down {
            Some(Vec2f::new(0.0, 1.0))
        } else if self.right {
            Some(Vec2f::new(1.0, 0.0))
        } else if self.up {
            Some(Vec2f::new(0.0, -1.0))
        } else {
            None
        }
    }
}
