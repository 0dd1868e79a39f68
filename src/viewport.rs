use serde::{Deserialize, Serialize};

/// World-space 2D point.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn lerp(self, target: Vec2, t: f32) -> Vec2 {
        let t = t.clamp(0.0, 1.0);
        Vec2 {
            x: self.x + (target.x - self.x) * t,
            y: self.y + (target.y - self.y) * t,
        }
    }
}

/// Externally owned viewpoint geometry, read fresh every tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewpointState {
    pub position: Vec2,
    pub half_height: f32,
    pub aspect: f32,
}

impl ViewpointState {
    pub fn new(position: Vec2, half_height: f32, aspect: f32) -> Self {
        Self {
            position,
            half_height,
            aspect,
        }
    }

    pub fn half_width(&self) -> f32 {
        self.half_height * self.aspect
    }
}

/// The visible world-X interval for one tick. Derived, never stored across
/// ticks: the viewpoint moves continuously.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewWindow {
    pub left: f32,
    pub right: f32,
}

impl ViewWindow {
    pub fn of(viewpoint: &ViewpointState) -> Self {
        let half_width = viewpoint.half_width();
        Self {
            left: viewpoint.position.x - half_width,
            right: viewpoint.position.x + half_width,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_is_centered_on_the_viewpoint() {
        let viewpoint = ViewpointState::new(Vec2::new(10.0, 3.0), 5.0, 2.0);
        let window = ViewWindow::of(&viewpoint);
        assert_eq!(window.left, 0.0);
        assert_eq!(window.right, 20.0);
        assert_eq!(window.width(), 20.0);
    }

    #[test]
    fn lerp_clamps_the_factor() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 10.0);
        assert_eq!(a.lerp(b, 2.0), b);
        assert_eq!(a.lerp(b, -1.0), a);
        assert_eq!(a.lerp(b, 0.5), Vec2::new(5.0, 5.0));
    }
}
