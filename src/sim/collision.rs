//! Collision detection and response
//!
//! Walls and ceiling reflect, the paddle redirects by hit offset, and meetings
//! reflect along the axis of their nearest edge.

use glam::Vec2;

use super::rect::Rect;
use super::state::{Ball, Paddle};
use crate::clamp;
use crate::consts::*;

/// Velocity component a brick hit inverts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BounceAxis {
    Horizontal,
    Vertical,
}

/// Result of a ball/rectangle check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Point on the rectangle closest to the ball center
    pub closest: Vec2,
    /// Squared distance from the ball center to `closest`
    pub distance_sq: f32,
}

/// Check collision between a ball and a rectangle
///
/// Hit when the closest point on the rectangle lies within the ball radius
/// (inclusive).
pub fn ball_rect_collision(
    ball_pos: Vec2,
    ball_radius: f32,
    rect: &Rect,
) -> Option<CollisionResult> {
    let closest = rect.closest_point(ball_pos);
    let distance_sq = ball_pos.distance_squared(closest);

    (distance_sq <= ball_radius * ball_radius).then_some(CollisionResult {
        closest,
        distance_sq,
    })
}

/// Pick the axis to invert from the ball center's distance to each edge
///
/// Left/right are compared first, so ties go to `Horizontal`.
pub fn bounce_axis(ball_pos: Vec2, rect: &Rect) -> BounceAxis {
    let left = (ball_pos.x - rect.left()).abs();
    let right = (ball_pos.x - rect.right()).abs();
    let top = (ball_pos.y - rect.top()).abs();
    let bottom = (ball_pos.y - rect.bottom()).abs();

    let min = left.min(right).min(top).min(bottom);
    if min == left || min == right {
        BounceAxis::Horizontal
    } else {
        BounceAxis::Vertical
    }
}

/// Reflect the velocity along `axis`
#[inline]
pub fn reflect_velocity(velocity: Vec2, axis: BounceAxis) -> Vec2 {
    match axis {
        BounceAxis::Horizontal => Vec2::new(-velocity.x, velocity.y),
        BounceAxis::Vertical => Vec2::new(velocity.x, -velocity.y),
    }
}

/// Speed-up after a meeting is canceled
///
/// Scales toward `min(MAX_SPEED, speed * HIT_SPEED_MULTIPLIER)`. Never slows
/// the ball down and leaves a stopped ball alone.
pub fn boost_speed(velocity: Vec2) -> Vec2 {
    let speed = velocity.length();
    let target = (speed * HIT_SPEED_MULTIPLIER).min(MAX_SPEED);

    if speed > 0.0 && target > speed {
        velocity * (target / speed)
    } else {
        velocity
    }
}

/// Bounce off the side walls and ceiling. Returns true if any wall was hit.
///
/// Strict comparisons: a ball exactly tangent to a wall is not reflected.
pub fn bounce_off_walls(ball: &mut Ball, field_width: f32) -> bool {
    let r = ball.radius;
    let mut hit = false;

    if ball.pos.x - r < 0.0 {
        ball.pos.x = r;
        ball.vel.x = -ball.vel.x;
        hit = true;
    }
    if ball.pos.x + r > field_width {
        ball.pos.x = field_width - r;
        ball.vel.x = -ball.vel.x;
        hit = true;
    }
    if ball.pos.y - r < 0.0 {
        ball.pos.y = r;
        ball.vel.y = -ball.vel.y;
        hit = true;
    }

    hit
}

/// Check whether the falling ball touches the paddle
pub fn ball_paddle_collision(ball: &Ball, paddle: &Paddle) -> bool {
    ball.pos.y + ball.radius >= paddle.y
        && ball.pos.y <= paddle.bottom()
        && ball.pos.x >= paddle.left()
        && ball.pos.x <= paddle.right()
        && ball.vel.y > 0.0
}

/// Redirect the ball off the paddle. Returns true on hit.
///
/// The horizontal component follows the hit offset from paddle center; the
/// vertical component takes the rest of the speed, always upward and never
/// below `sqrt(MIN_VERTICAL_SPEED_SQ)`.
pub fn bounce_off_paddle(ball: &mut Ball, paddle: &Paddle) -> bool {
    if !ball_paddle_collision(ball, paddle) {
        return false;
    }

    ball.pos.y = paddle.y - ball.radius;

    let speed = match ball.speed() {
        s if s > 0.0 => s,
        _ => INITIAL_SPEED,
    };
    let offset = clamp((ball.pos.x - paddle.x) / (paddle.width / 2.0), -1.0, 1.0);

    let vx = offset * speed;
    let vy = -(speed * speed - vx * vx).max(MIN_VERTICAL_SPEED_SQ).sqrt();
    let vel = Vec2::new(vx, vy);

    // The vertical floor can nudge an edge hit past the cap
    ball.vel = if vel.length() > MAX_SPEED {
        vel * (MAX_SPEED / vel.length())
    } else {
        vel
    };

    true
}

/// Check if the ball's bottom edge is below the field
pub fn ball_below_floor(ball_pos: Vec2, ball_radius: f32, field_height: f32) -> bool {
    ball_pos.y + ball_radius > field_height
}
