//! Meeting layout generator
//!
//! Fills the 7-day calendar grid with non-overlapping meetings. The last
//! `FREE_SLOTS` slots of every day stay empty so the ball has a clear lane
//! back down to the paddle.

use rand::Rng;

use super::rect::{Rect, rects_overlap};
use super::state::{GameState, MeetingBrick};
use crate::consts::*;
use crate::random_int;

/// Titles drawn for generated meetings
pub const MEETING_TITLES: [&str; 20] = [
    "Daily Standup",
    "Sprint Planning",
    "Retro about Retro",
    "PR Review Marathon",
    "Sync about Syncing",
    "Tech Debt Session",
    "Alignment Meeting",
    "Cross-Team Check-In",
    "Roadmap Deep Dive",
    "Incident Postmortem",
    "Quarterly All-Hands",
    "Stakeholder Sync",
    "Refinement (Again)",
    "Architecture Council",
    "QA Assistance",
    "Design Handoff",
    "Backlog Grooming",
    "Mandatory Fun",
    "Ad-hoc Sync",
    "Calendar Cleanup",
];

pub const DAY_LABELS: [&str; DAYS] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Pixel geometry of the calendar grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalendarGrid {
    pub left: f32,
    pub top: f32,
    pub col_width: f32,
    pub slot_height: f32,
}

impl Default for CalendarGrid {
    fn default() -> Self {
        let grid_width = FIELD_WIDTH - LEFT_GUTTER;
        let grid_height = GRID_BOTTOM - GRID_TOP;
        Self {
            left: LEFT_GUTTER,
            top: GRID_TOP,
            col_width: grid_width / DAYS as f32,
            slot_height: grid_height / SLOTS_PER_DAY as f32,
        }
    }
}

impl CalendarGrid {
    /// Inset rectangle for a meeting occupying `[start_slot, end_slot)` of `day`
    pub fn meeting_rect(&self, day: usize, start_slot: usize, end_slot: usize) -> Rect {
        Rect::new(
            self.left + day as f32 * self.col_width + MEETING_PADDING_X,
            self.top + start_slot as f32 * self.slot_height + MEETING_PADDING_Y,
            self.col_width - MEETING_PADDING_X * 2.0,
            (end_slot - start_slot) as f32 * self.slot_height - MEETING_PADDING_Y * 2.0,
        )
    }
}

/// Latest start slot that still ends above the free band
pub fn max_start_slot() -> usize {
    (SLOTS_PER_DAY - FREE_SLOTS).saturating_sub(MAX_DURATION_SLOTS)
}

/// Build a fresh set of meetings, ids starting at 0
pub fn generate_meetings<R: Rng + ?Sized>(rng: &mut R) -> Vec<MeetingBrick> {
    let grid = CalendarGrid::default();
    let max_start = max_start_slot() as i32;
    let mut bricks: Vec<MeetingBrick> = Vec::new();
    let mut next_id = 0u32;

    for day in 0..DAYS {
        let target = random_int(rng, MIN_MEETINGS_PER_DAY, MAX_MEETINGS_PER_DAY);
        let mut attempts = 0;
        let mut created = 0;

        while created < target && attempts < PLACEMENT_ATTEMPTS {
            attempts += 1;

            let start_slot = random_int(rng, 0, max_start) as usize;
            let duration = random_int(rng, 1, MAX_DURATION_SLOTS as i32) as usize;
            let end_slot = (start_slot + duration).min(SLOTS_PER_DAY);
            let rect = grid.meeting_rect(day, start_slot, end_slot);

            // Only meetings in the same column can collide
            let overlaps = bricks.iter().any(|b| {
                b.active && (b.rect.x - rect.x).abs() < 1.0 && rects_overlap(&rect, &b.rect)
            });
            if overlaps {
                continue;
            }

            let title_index = (next_id as usize + day + start_slot) % MEETING_TITLES.len();
            bricks.push(MeetingBrick {
                id: next_id,
                day,
                start_slot,
                end_slot,
                rect,
                title: MEETING_TITLES[title_index].to_string(),
                active: true,
            });
            next_id += 1;
            created += 1;
        }

        if created < target {
            log::debug!(
                "{}: placed {}/{} meetings after {} attempts",
                DAY_LABELS[day],
                created,
                target,
                attempts
            );
        }
    }

    bricks
}

/// Replace the state's meetings with a new layout and reset the remaining count
pub fn regenerate_layout<R: Rng + ?Sized>(state: &mut GameState, rng: &mut R) {
    state.bricks = generate_meetings(rng);
    state.remaining = state.bricks.len();
    log::info!("Calendar generated with {} meetings", state.remaining);
}
