//! Game state and core simulation types
//!
//! Everything the engine mutates per frame lives here; the session owns it.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::clamp;
use crate::consts::*;

/// Current phase of the session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// No session, entry form shown
    #[default]
    Idle,
    /// Bricks placed, ball frozen until the serve delay elapses
    Serving,
    /// Ball in motion
    Active,
    /// Every meeting canceled, ball frozen until "new day"
    Cleared,
    /// Ball fell through the floor; notice shown before returning to Idle
    GameOver,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Idle => "Idle",
            GamePhase::Serving => "Serving",
            GamePhase::Active => "Active",
            GamePhase::Cleared => "Cleared",
            GamePhase::GameOver => "GameOver",
        }
    }

    /// Phases in which a session (bricks, ball) exists
    pub fn has_session(&self) -> bool {
        matches!(
            self,
            GamePhase::Serving | GamePhase::Active | GamePhase::Cleared
        )
    }
}

/// Events emitted by the engine for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Serve delay elapsed, ball released
    Served,
    /// Ball hit a meeting
    MeetingCanceled { id: u32, title: String },
    /// Last meeting canceled
    Cleared,
    /// Ball passed below the field
    GameOver,
}

/// The ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Host time (ms) until which motion is suspended
    pub frozen_until: Option<f64>,
}

impl Default for Ball {
    fn default() -> Self {
        Self {
            pos: serve_position(),
            vel: Vec2::ZERO,
            radius: BALL_RADIUS,
            frozen_until: None,
        }
    }
}

impl Ball {
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Point the ball along `angle` (radians, canvas space) at `speed`
    pub fn set_velocity(&mut self, angle: f32, speed: f32) {
        self.vel = Vec2::new(angle.cos(), angle.sin()) * speed;
    }

    /// Whether motion is still suspended at `now`
    pub fn is_frozen(&self, now: f64) -> bool {
        matches!(self.frozen_until, Some(until) if now < until)
    }

    /// Clear an elapsed freeze. Returns true only on the tick that clears it.
    pub fn release_if_due(&mut self, now: f64) -> bool {
        match self.frozen_until {
            Some(until) if now >= until => {
                self.frozen_until = None;
                true
            }
            _ => false,
        }
    }
}

/// Serve spawn point
pub fn serve_position() -> Vec2 {
    Vec2::new(FIELD_WIDTH / 2.0, FIELD_HEIGHT - SERVE_OFFSET_Y)
}

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    /// Horizontal center, always within [0, FIELD_WIDTH]
    pub x: f32,
    pub width: f32,
    pub height: f32,
    /// Top edge
    pub y: f32,
}

impl Default for Paddle {
    fn default() -> Self {
        Self {
            x: FIELD_WIDTH / 2.0,
            width: PADDLE_WIDTH,
            height: PADDLE_HEIGHT,
            y: FIELD_HEIGHT - PADDLE_OFFSET_Y,
        }
    }
}

impl Paddle {
    pub fn set_x(&mut self, x: f32) {
        self.x = clamp(x, 0.0, FIELD_WIDTH);
    }

    /// Move by `step` units in the sign of `direction`
    pub fn nudge(&mut self, direction: f32, step: f32) {
        self.set_x(self.x + direction.signum() * step);
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x - self.width / 2.0
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width / 2.0
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// A meeting on the calendar grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingBrick {
    pub id: u32,
    /// Weekday column (0 = Monday)
    pub day: usize,
    pub start_slot: usize,
    pub end_slot: usize,
    pub rect: Rect,
    pub title: String,
    pub active: bool,
}

/// Complete per-session game state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameState {
    pub phase: GamePhase,
    pub ball: Ball,
    pub paddle: Paddle,
    /// Meetings in creation order (ids ascending)
    pub bricks: Vec<MeetingBrick>,
    /// Active meeting count, kept equal to the active flags in `bricks`
    pub remaining: usize,
    /// Frames that advanced the ball
    pub time_ticks: u64,
    /// Events not yet drained by the session
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset ball and paddle for a serve that releases at `now + delay_ms`
    pub fn serve<R: Rng + ?Sized>(&mut self, rng: &mut R, now: f64, delay_ms: f64) {
        self.paddle = Paddle::default();
        self.ball = Ball::default();

        let min = SERVE_ANGLE_MIN_DEG.to_radians();
        let max = SERVE_ANGLE_MAX_DEG.to_radians();
        let angle = min + rng.random::<f32>() * (max - min);
        self.ball.set_velocity(angle, INITIAL_SPEED);
        self.ball.frozen_until = Some(now + delay_ms);

        self.phase = GamePhase::Serving;
    }

    /// Deactivate a meeting. Returns the title if it was active.
    ///
    /// Inactive or unknown ids are ignored, so a meeting is never counted twice.
    pub fn cancel_meeting(&mut self, id: u32) -> Option<String> {
        let brick = self.bricks.iter_mut().find(|b| b.id == id && b.active)?;
        brick.active = false;
        let title = brick.title.clone();

        self.remaining = self.remaining.saturating_sub(1);
        self.events.push(GameEvent::MeetingCanceled {
            id,
            title: title.clone(),
        });

        if self.remaining == 0 && self.phase.has_session() {
            self.phase = GamePhase::Cleared;
            self.events.push(GameEvent::Cleared);
            log::info!("All meetings canceled after {} frames", self.time_ticks);
        }

        Some(title)
    }

    /// Meetings still on the calendar
    pub fn active_bricks(&self) -> impl Iterator<Item = &MeetingBrick> {
        self.bricks.iter().filter(|b| b.active)
    }

    /// Drop all session state (game over / teardown)
    pub fn discard(&mut self) {
        self.bricks.clear();
        self.remaining = 0;
        self.ball = Ball::default();
        self.paddle = Paddle::default();
        self.time_ticks = 0;
    }

    pub fn is_cleared(&self) -> bool {
        self.phase == GamePhase::Cleared
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn brick(id: u32, title: &str) -> MeetingBrick {
        MeetingBrick {
            id,
            day: 0,
            start_slot: 0,
            end_slot: 1,
            rect: Rect::new(100.0 + id as f32 * 120.0, 100.0, 100.0, 20.0),
            title: title.to_string(),
            active: true,
        }
    }

    #[test]
    fn test_paddle_clamped() {
        let mut paddle = Paddle::default();
        paddle.set_x(-50.0);
        assert_eq!(paddle.x, 0.0);
        paddle.set_x(FIELD_WIDTH + 10.0);
        assert_eq!(paddle.x, FIELD_WIDTH);
        paddle.nudge(1.0, 24.0);
        assert_eq!(paddle.x, FIELD_WIDTH);
        paddle.nudge(-1.0, 24.0);
        assert_eq!(paddle.x, FIELD_WIDTH - 24.0);
    }

    #[test]
    fn test_serve_velocity() {
        let mut rng = Pcg32::seed_from_u64(42);
        let mut state = GameState::new();
        state.serve(&mut rng, 1000.0, 3000.0);

        assert_eq!(state.phase, GamePhase::Serving);
        assert_eq!(state.ball.frozen_until, Some(4000.0));
        assert!((state.ball.speed() - INITIAL_SPEED).abs() < 1e-4);
        // Up and to the right
        assert!(state.ball.vel.y < 0.0);
        assert!(state.ball.vel.x > 0.0);
    }

    #[test]
    fn test_release_exactly_once() {
        let mut ball = Ball {
            frozen_until: Some(100.0),
            ..Default::default()
        };
        assert!(ball.is_frozen(99.0));
        assert!(!ball.release_if_due(99.0));
        assert!(ball.release_if_due(100.0));
        assert!(!ball.release_if_due(101.0));
        assert!(!ball.is_frozen(101.0));
    }

    #[test]
    fn test_cancel_meeting_once() {
        let mut state = GameState::new();
        state.phase = GamePhase::Active;
        state.bricks = vec![brick(0, "Daily Standup"), brick(1, "Sprint Planning")];
        state.remaining = 2;

        assert_eq!(state.cancel_meeting(0).as_deref(), Some("Daily Standup"));
        assert_eq!(state.remaining, 1);
        assert!(!state.bricks[0].active);
        assert!(state.bricks[1].active);

        // Already inactive
        assert_eq!(state.cancel_meeting(0), None);
        assert_eq!(state.remaining, 1);
        assert_eq!(state.phase, GamePhase::Active);

        state.cancel_meeting(1);
        assert_eq!(state.remaining, 0);
        assert!(state.is_cleared());
        assert_eq!(state.events.last(), Some(&GameEvent::Cleared));
    }
}
