use serde::Deserialize;
use thiserror::Error;

use crate::viewport::{Vec2, ViewpointState};

/// Rectangular world region the camera may show. The camera center is clamped
/// so the view never leaves it.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct WorldBounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

#[derive(Debug, Error, PartialEq)]
pub enum BoundsError {
    #[error("max_x {max_x} must exceed min_x {min_x}")]
    InvertedX { min_x: f32, max_x: f32 },
    #[error("max_y {max_y} must exceed min_y {min_y}")]
    InvertedY { min_y: f32, max_y: f32 },
}

impl WorldBounds {
    pub fn validate(&self) -> Result<(), BoundsError> {
        if self.max_x <= self.min_x {
            return Err(BoundsError::InvertedX {
                min_x: self.min_x,
                max_x: self.max_x,
            });
        }
        if self.max_y <= self.min_y {
            return Err(BoundsError::InvertedY {
                min_y: self.min_y,
                max_y: self.max_y,
            });
        }
        Ok(())
    }
}

/// Smoothed follow camera. Eases toward the target each tick, then clamps the
/// view rectangle inside the world bounds when bounds are configured.
pub struct CameraFollow {
    position: Vec2,
    offset: Vec2,
    smooth_speed: f32,
    half_height: f32,
    aspect: f32,
    follow_x: bool,
    follow_y: bool,
    bounds: Option<WorldBounds>,
}

impl CameraFollow {
    pub fn new(start: Vec2, offset: Vec2, smooth_speed: f32, half_height: f32, aspect: f32) -> Self {
        Self {
            position: start,
            offset,
            smooth_speed,
            half_height,
            aspect,
            follow_x: true,
            follow_y: true,
            bounds: None,
        }
    }

    pub fn with_bounds(mut self, bounds: WorldBounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn with_axes(mut self, follow_x: bool, follow_y: bool) -> Self {
        self.follow_x = follow_x;
        self.follow_y = follow_y;
        self
    }

    /// Ease toward `target` for one frame of `dt` seconds.
    pub fn follow(&mut self, target: Vec2, dt: f32) {
        let mut desired = Vec2::new(target.x + self.offset.x, target.y + self.offset.y);
        if !self.follow_x {
            desired.x = self.position.x;
        }
        if !self.follow_y {
            desired.y = self.position.y;
        }
        let mut next = self.position.lerp(desired, self.smooth_speed * dt);
        if let Some(bounds) = self.bounds {
            next = self.constrain(next, bounds);
        }
        self.position = next;
    }

    fn constrain(&self, position: Vec2, bounds: WorldBounds) -> Vec2 {
        let half_width = self.half_height * self.aspect;
        let min_x = bounds.min_x + half_width;
        let max_x = (bounds.max_x - half_width).max(min_x);
        let min_y = bounds.min_y + self.half_height;
        let max_y = (bounds.max_y - self.half_height).max(min_y);
        Vec2::new(
            position.x.clamp(min_x, max_x),
            position.y.clamp(min_y, max_y),
        )
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// The geometry the streaming core reads each tick.
    pub fn viewpoint(&self) -> ViewpointState {
        ViewpointState::new(self.position, self.half_height, self.aspect)
    }
}
