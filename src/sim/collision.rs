//! Collision detection and response
//!
//! Everything here is pure geometry: wall reflection, point-in-rect brick
//! tests, and the paddle's offset-dependent bounce angle.

use glam::Vec2;

use crate::consts::*;

/// Which walls the ball bounced off during one reflection pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallReflection {
    pub side: bool,
    pub top: bool,
}

impl WallReflection {
    pub fn any(&self) -> bool {
        self.side || self.top
    }
}

/// Reflect the ball off the side and top walls of the play area.
///
/// Mirrors position back inside the bounds and flips the corresponding
/// velocity component; magnitudes are preserved. The floor is not handled
/// here - paddle/miss resolution owns the bottom edge.
pub fn reflect_walls(
    pos: &mut Vec2,
    vel: &mut Vec2,
    radius: f32,
    width: f32,
) -> WallReflection {
    let mut result = WallReflection::default();

    if pos.x < radius {
        pos.x = radius + (radius - pos.x);
        vel.x = -vel.x;
        result.side = true;
    } else if pos.x > width - radius {
        let limit = width - radius;
        pos.x = limit - (pos.x - limit);
        vel.x = -vel.x;
        result.side = true;
    }

    if pos.y < radius {
        pos.y = radius + (radius - pos.y);
        vel.y = -vel.y;
        result.top = true;
    }

    result
}

/// Point-in-rectangle test of the ball center against one brick cell
#[inline]
pub fn ball_hits_brick(ball_pos: Vec2, brick_x: f32, brick_y: f32) -> bool {
    ball_pos.x > brick_x
        && ball_pos.x < brick_x + BRICK_WIDTH
        && ball_pos.y > brick_y
        && ball_pos.y < brick_y + BRICK_HEIGHT
}

/// Whether the ball center is within the paddle's horizontal span
#[inline]
pub fn paddle_catches(ball_x: f32, paddle_x: f32, paddle_width: f32) -> bool {
    ball_x > paddle_x && ball_x < paddle_x + paddle_width
}

/// Compute the rebound velocity off the paddle.
///
/// The bounce angle is a linear function of where the ball struck relative to
/// the paddle center: a dead-center hit rebounds straight up, an edge hit
/// leaves at `MAX_BOUNCE_ANGLE` from vertical. Speed magnitude is conserved.
pub fn paddle_bounce(vel: Vec2, ball_x: f32, paddle_x: f32, paddle_width: f32) -> Vec2 {
    let half = paddle_width / 2.0;
    let offset = ((ball_x - (paddle_x + half)) / half).clamp(-1.0, 1.0);
    let angle = offset * MAX_BOUNCE_ANGLE;
    let speed = vel.length();
    Vec2::new(speed * angle.sin(), -speed * angle.cos())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 0.001;

    #[test]
    fn test_side_wall_flips_x_preserves_magnitude() {
        let mut pos = Vec2::new(5.0, 300.0);
        let mut vel = Vec2::new(-120.0, 80.0);

        let result = reflect_walls(&mut pos, &mut vel, BALL_RADIUS, 960.0);
        assert!(result.side);
        assert!(!result.top);
        assert!((vel.x - 120.0).abs() < EPS);
        assert!((vel.y - 80.0).abs() < EPS);
        assert!(pos.x >= BALL_RADIUS);
    }

    #[test]
    fn test_right_wall_mirrors_position() {
        let mut pos = Vec2::new(958.0, 300.0);
        let mut vel = Vec2::new(100.0, 0.0);

        reflect_walls(&mut pos, &mut vel, BALL_RADIUS, 960.0);
        // Overshoot past x=950 by 8 reflects back to 942
        assert!((pos.x - 942.0).abs() < EPS);
        assert!((vel.x + 100.0).abs() < EPS);
    }

    #[test]
    fn test_top_wall_flips_y() {
        let mut pos = Vec2::new(400.0, 4.0);
        let mut vel = Vec2::new(50.0, -90.0);

        let result = reflect_walls(&mut pos, &mut vel, BALL_RADIUS, 960.0);
        assert!(result.top);
        assert!((vel.y - 90.0).abs() < EPS);
        assert!(pos.y >= BALL_RADIUS);
    }

    #[test]
    fn test_ball_inside_bounds_untouched() {
        let mut pos = Vec2::new(480.0, 320.0);
        let mut vel = Vec2::new(100.0, -100.0);
        let before = (pos, vel);

        let result = reflect_walls(&mut pos, &mut vel, BALL_RADIUS, 960.0);
        assert!(!result.any());
        assert_eq!((pos, vel), before);
    }

    #[test]
    fn test_brick_containment() {
        // Brick at (35, 40), 80x25
        assert!(ball_hits_brick(Vec2::new(75.0, 52.0), 35.0, 40.0));
        assert!(!ball_hits_brick(Vec2::new(75.0, 70.0), 35.0, 40.0));
        assert!(!ball_hits_brick(Vec2::new(120.0, 52.0), 35.0, 40.0));
        // Edges are exclusive, matching the original containment test
        assert!(!ball_hits_brick(Vec2::new(35.0, 52.0), 35.0, 40.0));
    }

    #[test]
    fn test_center_hit_rebounds_vertically() {
        // Paddle width 75, ball dead center
        let vel = Vec2::new(80.0, 150.0);
        let out = paddle_bounce(vel, 137.5, 100.0, PADDLE_WIDTH);

        assert!(out.x.abs() < EPS);
        assert!((out.y + vel.length()).abs() < EPS);
    }

    #[test]
    fn test_edge_hit_leaves_at_max_angle() {
        let vel = Vec2::new(0.0, 170.0);
        let speed = vel.length();

        let right = paddle_bounce(vel, 175.0, 100.0, PADDLE_WIDTH);
        let angle = right.x.atan2(-right.y);
        assert!((angle - MAX_BOUNCE_ANGLE).abs() < EPS);
        assert!((right.length() - speed).abs() < EPS);

        let left = paddle_bounce(vel, 100.0, 100.0, PADDLE_WIDTH);
        let angle = left.x.atan2(-left.y);
        assert!((angle + MAX_BOUNCE_ANGLE).abs() < EPS);
    }

    #[test]
    fn test_bounce_offset_beyond_edge_is_clamped() {
        let vel = Vec2::new(0.0, 170.0);
        let out = paddle_bounce(vel, 500.0, 100.0, PADDLE_WIDTH);
        let angle = out.x.atan2(-out.y);
        assert!(angle <= MAX_BOUNCE_ANGLE + EPS);
    }
}
