//! Per-frame simulation tick
//!
//! One integration step per host frame. `now` is the host clock in
//! milliseconds and only gates the serve freeze, so frame spacing may vary.

use super::collision::{
    ball_below_floor, ball_rect_collision, boost_speed, bounce_axis, bounce_off_paddle,
    bounce_off_walls, reflect_velocity,
};
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Absolute paddle center (pointer position), applied before physics
    pub paddle_x: Option<f32>,
    /// Demo mode - the paddle follows the ball
    pub autopilot: bool,
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput, now: f64) {
    // No session to simulate
    if !state.phase.has_session() {
        return;
    }

    if let Some(x) = input.paddle_x {
        state.paddle.set_x(x);
    }
    if input.autopilot {
        steer_autopilot(state);
    }

    // Calendar cleared: ball stays put until "new day"
    if state.phase == GamePhase::Cleared || state.remaining == 0 {
        return;
    }

    // Serve delay
    if state.ball.is_frozen(now) {
        return;
    }
    if state.ball.release_if_due(now) {
        state.events.push(GameEvent::Served);
        log::debug!("Ball served at {:.0}ms", now);
    }
    if state.phase == GamePhase::Serving {
        state.phase = GamePhase::Active;
    }

    state.time_ticks += 1;
    state.ball.pos += state.ball.vel;

    bounce_off_walls(&mut state.ball, FIELD_WIDTH);
    bounce_off_paddle(&mut state.ball, &state.paddle);
    resolve_meeting_hit(state);
    if state.phase == GamePhase::Cleared {
        return;
    }

    if ball_below_floor(state.ball.pos, state.ball.radius, FIELD_HEIGHT) {
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::GameOver);
        log::info!(
            "Ball lost after {} frames with {} meetings left",
            state.time_ticks,
            state.remaining
        );
    }
}

/// Cancel the first active meeting the ball touches, at most one per tick
fn resolve_meeting_hit(state: &mut GameState) {
    let ball_pos = state.ball.pos;
    let radius = state.ball.radius;

    let hit = state
        .bricks
        .iter()
        .find(|b| b.active && ball_rect_collision(ball_pos, radius, &b.rect).is_some())
        .map(|b| (b.id, b.rect));
    let Some((id, rect)) = hit else {
        return;
    };

    if let Some(title) = state.cancel_meeting(id) {
        log::debug!("Canceled #{} {:?}, {} left", id, title, state.remaining);
    }

    let axis = bounce_axis(ball_pos, &rect);
    state.ball.vel = boost_speed(reflect_velocity(state.ball.vel, axis));
}

/// Track the ball with a slow sway so it doesn't bounce straight up forever
fn steer_autopilot(state: &mut GameState) {
    let time_factor = state.time_ticks as f32 * 0.01;
    let sway = time_factor.sin() * 0.3 + (time_factor * 0.7).sin() * 0.15;
    let target = state.ball.pos.x + sway * state.paddle.width / 2.0;
    state.paddle.set_x(target);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::layout::regenerate_layout;
    use crate::sim::rect::Rect;
    use crate::sim::state::MeetingBrick;
    use glam::Vec2;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn meeting(id: u32, rect: Rect) -> MeetingBrick {
        MeetingBrick {
            id,
            day: 0,
            start_slot: 0,
            end_slot: 1,
            rect,
            title: format!("Meeting {}", id),
            active: true,
        }
    }

    /// Active state with the given meetings and a free ball
    fn active_state(bricks: Vec<MeetingBrick>, pos: Vec2, vel: Vec2) -> GameState {
        let mut state = GameState::new();
        state.phase = GamePhase::Active;
        state.remaining = bricks.len();
        state.bricks = bricks;
        state.ball.pos = pos;
        state.ball.vel = vel;
        state
    }

    fn far_meeting(id: u32) -> MeetingBrick {
        meeting(id, Rect::new(700.0, 60.0, 100.0, 20.0))
    }

    #[test]
    fn test_serve_freeze_then_release() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut state = GameState::new();
        regenerate_layout(&mut state, &mut rng);
        state.serve(&mut rng, 0.0, 3000.0);
        let start = state.ball.pos;

        tick(&mut state, &TickInput::default(), 1000.0);
        assert_eq!(state.ball.pos, start);
        assert_eq!(state.phase, GamePhase::Serving);
        assert!(state.events.is_empty());

        tick(&mut state, &TickInput::default(), 3000.0);
        assert_ne!(state.ball.pos, start);
        assert_eq!(state.phase, GamePhase::Active);
        assert_eq!(state.ball.frozen_until, None);

        tick(&mut state, &TickInput::default(), 3016.0);
        let served = state.events.iter().filter(|e| **e == GameEvent::Served).count();
        assert_eq!(served, 1);
    }

    #[test]
    fn test_paddle_moves_while_frozen() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut state = GameState::new();
        regenerate_layout(&mut state, &mut rng);
        state.serve(&mut rng, 0.0, 3000.0);

        let input = TickInput {
            paddle_x: Some(-40.0),
            ..Default::default()
        };
        tick(&mut state, &input, 10.0);
        assert_eq!(state.paddle.x, 0.0);
    }

    #[test]
    fn test_single_meeting_hit_per_tick() {
        let rect = Rect::new(150.0, 100.0, 100.0, 30.0);
        let mut state = active_state(
            vec![meeting(0, rect), meeting(1, rect), far_meeting(2)],
            Vec2::new(200.0, 140.0),
            Vec2::new(0.0, -2.0),
        );

        tick(&mut state, &TickInput::default(), 0.0);

        assert_eq!(state.remaining, 2);
        assert!(!state.bricks[0].active);
        assert!(state.bricks[1].active);
        // Hit the bottom edge: vertical flip plus speed-up
        assert!((state.ball.vel - Vec2::new(0.0, 2.0 * HIT_SPEED_MULTIPLIER)).length() < 1e-5);
        assert_eq!(
            state.events,
            vec![GameEvent::MeetingCanceled {
                id: 0,
                title: "Meeting 0".to_string()
            }]
        );
    }

    #[test]
    fn test_cleared_freezes_ball() {
        let rect = Rect::new(150.0, 100.0, 100.0, 30.0);
        let mut state = active_state(
            vec![meeting(0, rect)],
            Vec2::new(200.0, 140.0),
            Vec2::new(0.0, -2.0),
        );

        tick(&mut state, &TickInput::default(), 0.0);
        assert_eq!(state.remaining, 0);
        assert!(state.is_cleared());
        assert!(state.events.contains(&GameEvent::Cleared));

        let (pos, vel) = (state.ball.pos, state.ball.vel);
        tick(&mut state, &TickInput::default(), 16.0);
        assert_eq!(state.ball.pos, pos);
        assert_eq!(state.ball.vel, vel);
        assert!(state.is_cleared());
    }

    #[test]
    fn test_clear_wins_over_loss_on_same_tick() {
        let rect = Rect::new(400.0, 550.0, 40.0, 20.0);
        let mut state = active_state(
            vec![meeting(0, rect)],
            Vec2::new(420.0, FIELD_HEIGHT - 5.0),
            Vec2::new(0.0, 3.0),
        );

        tick(&mut state, &TickInput::default(), 0.0);
        assert_eq!(state.phase, GamePhase::Cleared);
        assert!(!state.events.contains(&GameEvent::GameOver));
    }

    #[test]
    fn test_game_over_fires_once() {
        let mut state = active_state(
            vec![far_meeting(0)],
            Vec2::new(400.0, FIELD_HEIGHT - 5.0),
            Vec2::new(0.0, 3.0),
        );

        tick(&mut state, &TickInput::default(), 0.0);
        assert_eq!(state.phase, GamePhase::GameOver);

        let pos = state.ball.pos;
        tick(&mut state, &TickInput::default(), 16.0);
        tick(&mut state, &TickInput::default(), 32.0);
        assert_eq!(state.ball.pos, pos);

        let count = state.events.iter().filter(|e| **e == GameEvent::GameOver).count();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_wall_bounce_through_tick() {
        let mut state = active_state(
            vec![far_meeting(0)],
            Vec2::new(BALL_RADIUS + 1.0, 300.0),
            Vec2::new(-2.0, 1.0),
        );

        tick(&mut state, &TickInput::default(), 0.0);
        assert_eq!(state.ball.pos.x, BALL_RADIUS);
        assert_eq!(state.ball.vel, Vec2::new(2.0, 1.0));
    }

    #[test]
    fn test_idle_does_nothing() {
        let mut state = GameState::new();
        let pos = state.ball.pos;
        let input = TickInput {
            paddle_x: Some(10.0),
            autopilot: true,
        };
        tick(&mut state, &input, 0.0);
        assert_eq!(state.ball.pos, pos);
        assert_eq!(state.paddle.x, FIELD_WIDTH / 2.0);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_speed_never_exceeds_max(seed in any::<u64>()) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut state = GameState::new();
            regenerate_layout(&mut state, &mut rng);
            state.serve(&mut rng, 0.0, 0.0);

            let input = TickInput { autopilot: true, ..Default::default() };
            for frame in 0..4000 {
                let before = state.remaining;
                tick(&mut state, &input, frame as f64 * 16.0);
                prop_assert!(state.ball.speed() <= MAX_SPEED + 1e-3);
                prop_assert!(before - state.remaining <= 1);
                prop_assert_eq!(state.remaining, state.active_bricks().count());
                if !state.phase.has_session() || state.is_cleared() {
                    break;
                }
            }
        }
    }
}
