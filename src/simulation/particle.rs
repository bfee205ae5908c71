//! Core particle state for the sandbox.
//!
//! A particle is a circular body advanced with position Verlet: velocity is
//! implicit as `position - prev_position`, so positional corrections from
//! the collision solver feed straight back into the integrator instead of
//! fighting a stored velocity.

use nalgebra::Vector2;

pub type Vec2f = Vector2<f32>;

#[derive(Debug, Clone)]
pub struct Particle {
    pub position: Vec2f, // current position
    pub prev_position: Vec2f, // position one substep ago
    pub acceleration: Vec2f, // force accumulator, cleared by integrate
    pub radius: f32, // fixed at creation
    pub color: [u8; 3], // display attribute, no physics meaning
}

impl Particle {
    pub fn new(position: Vec2f, radius: f32, color: [u8; 3]) -> Self {
        Self {
            position,
            prev_position: position,
            acceleration: Vec2f::zeros(),
            radius,
            color,
        }
    }

    /// Spawn with an initial velocity, encoded Verlet-style by backdating
    /// `prev_position` one step
    pub fn with_velocity(
        position: Vec2f,
        velocity: Vec2f,
        dt: f32,
        radius: f32,
        color: [u8; 3],
    ) -> Self {
        let mut particle = Self::new(position, radius, color);
        particle.prev_position = position - velocity * dt;
        particle
    }

    /// Implicit velocity in units per step
    pub fn velocity(&self) -> Vec2f {
        self.position - self.prev_position
    }

    /// Add to the force accumulator; consumed by the next `integrate`
    pub fn accelerate(&mut self, force: Vec2f) {
        self.acceleration += force;
    }

    /// Advance one step: p_new = p + (p - p_prev) * damping + a * dt^2
    ///
    /// `damping` (< 1) bleeds a fraction of the implicit velocity each
    /// step. The accumulator is cleared afterwards.
    pub fn integrate(&mut self, dt: f32, damping: f32) {
        let displacement = self.position - self.prev_position;
        let new_position = self.position + displacement * damping + self.acceleration * (dt * dt);

        self.prev_position = self.position;
        self.position = new_position;

        self.acceleration = Vec2f::zeros();
    }

    /// Clamp to the padded walls and reflect the implicit velocity.
    ///
    /// Each wall is handled independently: the velocity component pointing
    /// into the wall is negated and scaled by `restitution`, the tangential
    /// component by `friction`, and `prev_position` is rewritten from the
    /// reflected velocity. A particle inside the padded bounds, or resting
    /// on them with no inward velocity, is left untouched.
    pub fn apply_boundary_response(
        &mut self,
        width: f32,
        height: f32,
        padding: f32,
        restitution: f32,
        friction: f32,
    ) {
        // one velocity carried across all four checks, so a corner hit
        // reflects both components of the same impact
        let mut v = self.velocity();

        // floor
        if self.position.y >= height - padding {
            self.position.y = height - padding;
            if v.y > 0.0 {
                v.y = -v.y * restitution;
                v.x *= friction;
                self.prev_position = self.position - v;
            }
        }

        // ceiling
        if self.position.y <= padding {
            self.position.y = padding;
            if v.y < 0.0 {
                v.y = -v.y * restitution;
                v.x *= friction;
                self.prev_position = self.position - v;
            }
        }

        // left wall
        if self.position.x <= padding {
            self.position.x = padding;
            if v.x < 0.0 {
                v.x = -v.x * restitution;
                v.y *= friction;
                self.prev_position = self.position - v;
            }
        }

        // right wall
        if self.position.x >= width - padding {
            self.position.x = width - padding;
            if v.x > 0.0 {
                v.x = -v.x * restitution;
                v.y *= friction;
                self.prev_position = self.position - v;
            }
        }
    }
}
