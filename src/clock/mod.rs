//! Clock domain — the heartbeat of Dewtrack.
//!
//! Responsible for:
//! - Deriving the in-game clock from the real-world wall clock
//! - Sampling on a fixed interval to animate the dial
//! - Sending CycleRolloverEvent / DayRolloverEvent / WeekRolloverEvent when
//!   the respective identifiers change between samples
//!
//! The derivation itself is a pure function of one epoch-milliseconds value:
//! no retained state, no I/O. Every sample recomputes the whole `GameClock`
//! from scratch, which is what makes the rollover detection and the tests
//! trivial.

use bevy::prelude::*;

use crate::shared::*;

// ─── Time-base constants ─────────────────────────────────────────────────────

/// Shift from UTC into the fixed "game-PST" reference frame: 8 hours
/// (PST/UTC, deliberately no daylight-saving adjustment) plus 3 days so the
/// modulo arithmetic below treats a fixed historical Sunday as time zero.
/// Must stay a literal constant; nothing downstream recomputes it.
const FRAME_SHIFT_SECS: f64 = 8.0 * 3600.0 + 3.0 * 86400.0;

/// In-game time runs 24× real time: one real hour is one full in-game day.
const GAME_TIME_SCALE: f64 = 24.0;

const SECS_PER_GAME_DAY: f64 = 86400.0;
const SECS_PER_CYCLE: f64 = 3600.0;
const SECS_PER_WEEK: f64 = 7.0 * 86400.0;

/// The in-game week begins at 21:00 game-PST on the shifted Sunday.
const WEEK_ANCHOR_SECS: f64 = 21.0 * 3600.0;

/// Dial convention: 06:00 sits at the top of the dial. One of several
/// conventions the tool has used historically; pinned here.
const DIAL_PHASE_DEG: f64 = -90.0;

// ─── Pure derivation ─────────────────────────────────────────────────────────

impl GameClock {
    /// Derives the full in-game clock from milliseconds since the Unix epoch
    /// (UTC). Total function: arbitrarily large or negative instants still
    /// yield in-range fields via euclidean remainders.
    pub fn from_epoch_ms(epoch_ms: f64) -> Self {
        let shifted = epoch_ms / 1000.0 - FRAME_SHIFT_SECS;

        let time_of_day_secs = (shifted * GAME_TIME_SCALE).rem_euclid(SECS_PER_GAME_DAY);
        let hour = (time_of_day_secs / 3600.0).floor() as u8;
        let minute = ((time_of_day_secs / 60.0).floor() as i64).rem_euclid(60) as u8;
        let period = DayPeriod::from_hour(hour);

        let since_week = (shifted - WEEK_ANCHOR_SECS).rem_euclid(SECS_PER_WEEK);
        let cycle_of_week = since_week / SECS_PER_CYCLE;
        let day_of_week = (cycle_of_week / 24.0).floor() as u8;
        let cycle_of_day = (cycle_of_week.floor() as i64).rem_euclid(24) as u8;

        let week_id = ((shifted - WEEK_ANCHOR_SECS) / SECS_PER_WEEK).floor() as i64;
        let cycle_id = (shifted / SECS_PER_CYCLE).floor() as i64;

        GameClock {
            time_of_day_secs,
            hour,
            minute,
            period,
            day_of_week,
            cycle_of_day,
            week_id,
            cycle_id,
        }
    }

    /// Rotation for the visual dial, degrees clockwise from screen-up.
    pub fn dial_rotation_degrees(&self) -> f32 {
        (360.0 * self.time_of_day_secs / SECS_PER_GAME_DAY + DIAL_PHASE_DEG) as f32
    }
}

/// Current wall clock as milliseconds since the Unix epoch.
#[cfg(not(target_arch = "wasm32"))]
pub fn wall_clock_epoch_ms() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

#[cfg(target_arch = "wasm32")]
pub fn wall_clock_epoch_ms() -> f64 {
    js_sys::Date::now()
}

// ─── Plugin ──────────────────────────────────────────────────────────────────

/// Repeating sample timer for the clock animation.
#[derive(Resource)]
pub struct ClockSampleTimer(pub Timer);

impl Default for ClockSampleTimer {
    fn default() -> Self {
        Self(Timer::from_seconds(CLOCK_SAMPLE_SECS, TimerMode::Repeating))
    }
}

pub struct ClockPlugin;

impl Plugin for ClockPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ClockSampleTimer>()
            .add_systems(Startup, init_clock)
            .add_systems(Update, sample_clock);
    }
}

// ─── Systems ─────────────────────────────────────────────────────────────────

/// Seed the clock once at startup so the first frame shows real time
/// instead of the epoch default.
fn init_clock(mut clock: ResMut<GameClock>) {
    *clock = GameClock::from_epoch_ms(wall_clock_epoch_ms());
    info!(
        "[Clock] Started at {} ({}, {})",
        clock.clock_label(),
        clock.period.label(),
        clock.day_cycle_label()
    );
}

/// Resample the wall clock every `CLOCK_SAMPLE_SECS` and emit rollover
/// events for any identifier that changed since the previous sample.
pub fn sample_clock(
    time: Res<Time>,
    mut timer: ResMut<ClockSampleTimer>,
    mut clock: ResMut<GameClock>,
    mut cycle_writer: EventWriter<CycleRolloverEvent>,
    mut day_writer: EventWriter<DayRolloverEvent>,
    mut week_writer: EventWriter<WeekRolloverEvent>,
) {
    if !timer.0.tick(time.delta()).just_finished() {
        return;
    }

    let next = GameClock::from_epoch_ms(wall_clock_epoch_ms());

    if next.cycle_id != clock.cycle_id {
        info!(
            "[Clock] Cycle rollover: {} -> {} ({})",
            clock.cycle_id,
            next.cycle_id,
            next.day_cycle_label()
        );
        cycle_writer.send(CycleRolloverEvent {
            cycle_id: next.cycle_id,
        });
    }
    if next.day_of_week != clock.day_of_week {
        day_writer.send(DayRolloverEvent {
            day_of_week: next.day_of_week,
        });
    }
    if next.week_id != clock.week_id {
        info!("[Clock] Week rollover: {} -> {}", clock.week_id, next.week_id);
        week_writer.send(WeekRolloverEvent {
            week_id: next.week_id,
        });
    }

    *clock = next;
}

// ─── Tests ───────────────────────────────────────────────────────────────────
