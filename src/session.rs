//! Game session lifecycle
//!
//! Idle → Serving → Active → Cleared → (new day) → Serving ...
//!                         ↘ GameOver → (notice elapses) → Idle
//!
//! The host drives everything with its own clock: `frame(now)` once per
//! animation frame, `poll(now)` whenever it wants notices to expire while no
//! frames are running (after game over the loop is canceled).

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::notify::{GAME_OVER_MESSAGE, Notice};
use crate::settings::Settings;
use crate::sim::layout::regenerate_layout;
use crate::sim::{Ball, GameEvent, GamePhase, GameState, MeetingBrick, Paddle, TickInput, tick};

/// Discrete paddle movement from key presses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nudge {
    Left,
    Right,
}

impl Nudge {
    pub fn direction(self) -> f32 {
        match self {
            Nudge::Left => -1.0,
            Nudge::Right => 1.0,
        }
    }

    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" => Some(Nudge::Left),
            "ArrowRight" => Some(Nudge::Right),
            _ => None,
        }
    }
}

/// Handle for the host's animation-frame loop
///
/// Frames delivered while the loop is canceled don't advance the simulation.
#[derive(Debug, Clone, Default)]
pub struct FrameLoop {
    running: bool,
    /// Bumped on every (re)start so hosts can drop callbacks from a stale run
    generation: u64,
    frames: u64,
}

impl FrameLoop {
    /// Start, canceling any current run first
    pub fn start(&mut self) {
        self.cancel();
        self.running = true;
        self.generation += 1;
        self.frames = 0;
    }

    /// Stop the loop. Canceling a stopped loop is a no-op.
    pub fn cancel(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Frames advanced in the current run
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

/// Everything the render adapter needs to draw one frame
#[derive(Debug, Clone, Serialize)]
pub struct FrameSnapshot {
    pub phase: GamePhase,
    pub player_name: Option<String>,
    /// Absent while no session exists
    pub ball: Option<Ball>,
    pub paddle: Paddle,
    /// Active meetings only
    pub meetings: Vec<MeetingBrick>,
    pub remaining: usize,
    pub cleared: bool,
    /// Title shown in the "meeting canceled" toast, while visible
    pub toast: Option<String>,
    pub game_over: Option<String>,
}

/// A single-player game session
pub struct Session {
    settings: Settings,
    rng: Pcg32,
    player_name: Option<String>,
    game: GameState,
    frame_loop: FrameLoop,
    toast: Notice,
    game_over: Notice,
    last_canceled: Option<String>,
    events: Vec<GameEvent>,
    autopilot: bool,
}

impl Session {
    /// Create an idle session whose layouts and serves derive from `seed`
    pub fn new(seed: u64) -> Self {
        Self::with_settings(seed, Settings::default())
    }

    pub fn with_settings(seed: u64, settings: Settings) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            player_name: None,
            game: GameState::new(),
            frame_loop: FrameLoop::default(),
            toast: Notice::new(settings.toast_ms),
            game_over: Notice::new(settings.game_over_notice_ms),
            last_canceled: None,
            events: Vec::new(),
            autopilot: false,
            settings,
        }
    }

    /// Start a session for `player_name`
    ///
    /// Blank names are ignored, as is a call while a session is already live.
    pub fn start_session(&mut self, player_name: &str, now: f64) {
        let name = player_name.trim();
        if name.is_empty() {
            return;
        }
        if !matches!(self.game.phase, GamePhase::Idle | GamePhase::GameOver) {
            log::debug!("start ignored in {}", self.game.phase.as_str());
            return;
        }

        self.game_over.dismiss();
        self.last_canceled = None;
        self.player_name = Some(name.to_string());

        self.game = GameState::new();
        regenerate_layout(&mut self.game, &mut self.rng);
        self.game.serve(&mut self.rng, now, self.settings.serve_delay_ms);
        self.frame_loop.start();

        log::info!(
            "Session started for {} with {} meetings",
            name,
            self.game.remaining
        );
    }

    /// "New day": fresh calendar after a full clear, same player
    pub fn reset_after_clear(&mut self, now: f64) {
        if self.game.phase != GamePhase::Cleared {
            log::debug!("new day ignored in {}", self.game.phase.as_str());
            return;
        }

        regenerate_layout(&mut self.game, &mut self.rng);
        self.game
            .serve(&mut self.rng, now, self.settings.new_day_serve_delay_ms);
        if !self.frame_loop.is_running() {
            self.frame_loop.start();
        }

        log::info!("New day with {} meetings", self.game.remaining);
    }

    /// Move the paddle center to `x` (pointer input), clamped to the field
    pub fn set_paddle_position(&mut self, x: f32) {
        if self.game.phase.has_session() {
            self.game.paddle.set_x(x);
        }
    }

    /// Step the paddle one notch (key input)
    pub fn nudge_paddle(&mut self, nudge: Nudge) {
        if self.game.phase.has_session() {
            let step = self.settings.paddle_step;
            self.game.paddle.nudge(nudge.direction(), step);
        }
    }

    pub fn set_autopilot(&mut self, enabled: bool) {
        self.autopilot = enabled;
    }

    /// Per-frame callback
    pub fn frame(&mut self, now: f64) {
        self.poll(now);
        if !self.frame_loop.is_running() {
            return;
        }

        self.frame_loop.frames += 1;
        let input = TickInput {
            paddle_x: None,
            autopilot: self.autopilot,
        };
        tick(&mut self.game, &input, now);
        self.collect_events(now);
    }

    /// Expire notices. Returns the session to Idle once the game-over notice ends.
    pub fn poll(&mut self, now: f64) {
        self.toast.update(now);
        if self.game_over.update(now) && self.game.phase == GamePhase::GameOver {
            self.game.phase = GamePhase::Idle;
            log::info!("Back to the calendar entry screen");
        }
    }

    /// Cancel a meeting directly, as if the ball had hit it
    pub fn cancel_meeting(&mut self, id: u32, now: f64) -> Option<String> {
        if !self.game.phase.has_session() {
            return None;
        }
        let title = self.game.cancel_meeting(id);
        self.collect_events(now);
        title
    }

    /// Stop the frame loop (idempotent)
    pub fn cancel_loop(&mut self) {
        self.frame_loop.cancel();
    }

    /// Restart a canceled loop while a session is live
    ///
    /// Returns true if a new run was started.
    pub fn resume_loop(&mut self) -> bool {
        if !self.game.phase.has_session() || self.frame_loop.is_running() {
            return false;
        }
        self.frame_loop.start();
        log::debug!("Frame loop resumed (run {})", self.frame_loop.generation());
        true
    }

    /// Host teardown: stop the loop and drop pending notices
    ///
    /// Dropping the game-over notice also drops its return to Idle, so a
    /// finished game goes there directly.
    pub fn teardown(&mut self) {
        self.frame_loop.cancel();
        self.toast.dismiss();
        self.game_over.dismiss();
        if self.game.phase == GamePhase::GameOver {
            self.game.phase = GamePhase::Idle;
        }
    }

    fn collect_events(&mut self, now: f64) {
        let mut lost = false;
        for event in std::mem::take(&mut self.game.events) {
            match &event {
                GameEvent::MeetingCanceled { title, .. } => {
                    self.last_canceled = Some(title.clone());
                    self.toast.show(title.clone(), now);
                }
                GameEvent::GameOver => lost = true,
                GameEvent::Served | GameEvent::Cleared => {}
            }
            self.events.push(event);
        }

        if lost {
            self.end_game(now);
        }
    }

    fn end_game(&mut self, now: f64) {
        self.frame_loop.cancel();
        self.game.discard();
        self.game_over.show(GAME_OVER_MESSAGE, now);
        log::info!(
            "Game over for {}",
            self.player_name.as_deref().unwrap_or("anonymous")
        );
    }

    /// Take all events since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        let live = self.game.phase.has_session();
        FrameSnapshot {
            phase: self.game.phase,
            player_name: self.player_name.clone(),
            ball: live.then(|| self.game.ball.clone()),
            paddle: self.game.paddle.clone(),
            meetings: self.game.active_bricks().cloned().collect(),
            remaining: self.game.remaining,
            cleared: self.is_cleared(),
            toast: self.toast.current().map(str::to_string),
            game_over: self.game_over.current().map(str::to_string),
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.game.phase
    }

    pub fn remaining(&self) -> usize {
        self.game.remaining
    }

    pub fn is_cleared(&self) -> bool {
        self.game.is_cleared()
    }

    /// Title of the most recently canceled meeting
    pub fn last_canceled(&self) -> Option<&str> {
        self.last_canceled.as_deref()
    }

    pub fn toast(&self) -> Option<&str> {
        self.toast.current()
    }

    pub fn game_over_message(&self) -> Option<&str> {
        self.game_over.current()
    }

    pub fn player_name(&self) -> Option<&str> {
        self.player_name.as_deref()
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    pub fn frame_loop(&self) -> &FrameLoop {
        &self.frame_loop
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replace the settings. Delays apply from the next serve, durations
    /// from the next notice shown.
    pub fn set_settings(&mut self, settings: Settings) {
        self.toast.set_duration(settings.toast_ms);
        self.game_over.set_duration(settings.game_over_notice_ms);
        self.settings = settings;
    }
}
