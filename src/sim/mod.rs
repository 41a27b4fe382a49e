//! Simulation module
//!
//! All gameplay logic lives here:
//! - One physics step per host frame
//! - Injected RNG only (seed it for reproducible layouts)
//! - Stable iteration order (meetings by id)
//! - No rendering or platform dependencies

pub mod collision;
pub mod layout;
pub mod rect;
pub mod state;
pub mod tick;

pub use collision::{BounceAxis, CollisionResult, ball_rect_collision, bounce_axis};
pub use layout::{CalendarGrid, DAY_LABELS, MEETING_TITLES, generate_meetings, regenerate_layout};
pub use rect::{Rect, rects_overlap};
pub use state::{Ball, GameEvent, GamePhase, GameState, MeetingBrick, Paddle};
pub use tick::{TickInput, tick};
