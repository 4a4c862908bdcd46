//! Shared resources, events, states, and constants for Dewtrack.
//!
//! This is the type contract. Every domain plugin imports from here.
//! No domain imports from any other domain directly.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

// ═══════════════════════════════════════════════════════════════════════
// APP SCREEN — top-level state machine
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, States, Default)]
pub enum AppScreen {
    /// Watered-crop tracker list (the default view).
    #[default]
    Tracker,
    /// Garden save-code / planner-URL import.
    Import,
    /// Named layout slots (save / load / delete).
    Layouts,
}

// ═══════════════════════════════════════════════════════════════════════
// GAME CLOCK
// ═══════════════════════════════════════════════════════════════════════

/// Piecewise time-of-day period. Ranges are half-open:
/// Morning [3,6), Day [6,18), Evening [18,21), Night [21,24) ∪ [0,3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayPeriod {
    Morning,
    Day,
    Evening,
    Night,
}

impl DayPeriod {
    /// Night check first; the remaining ranges are non-overlapping given
    /// this order.
    pub fn from_hour(hour: u8) -> Self {
        if hour >= 21 || hour < 3 {
            DayPeriod::Night
        } else if hour >= 18 {
            DayPeriod::Evening
        } else if hour >= 6 {
            DayPeriod::Day
        } else {
            DayPeriod::Morning
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DayPeriod::Morning => "Morning",
            DayPeriod::Day => "Day",
            DayPeriod::Evening => "Evening",
            DayPeriod::Night => "Night",
        }
    }
}

/// In-game clock derived from one real-world instant. Recomputed on every
/// sample; every field is a pure function of the instant alone.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameClock {
    /// Seconds since in-game midnight, in [0, 86400).
    pub time_of_day_secs: f64,
    /// In-game hour, 0-23.
    pub hour: u8,
    /// In-game minute, 0-59.
    pub minute: u8,
    pub period: DayPeriod,
    /// Day index since the start of the in-game week, 0-6.
    pub day_of_week: u8,
    /// In-game hour-of-day, 0-23. Shown as "Cycle" (1-indexed) in the UI.
    pub cycle_of_day: u8,
    /// Increments exactly once per real-world week. Detects week rollover.
    pub week_id: i64,
    /// Increments exactly once per real-world hour, i.e. once per in-game
    /// day. Keys the rolling watering history.
    pub cycle_id: i64,
}

impl Default for GameClock {
    fn default() -> Self {
        GameClock::from_epoch_ms(0.0)
    }
}

impl GameClock {
    /// Digital readout, always two-digit zero-padded.
    pub fn clock_label(&self) -> String {
        format!("{:02}:{:02}", self.hour, self.minute)
    }

    /// Calendar readout, 1-indexed with a two-digit cycle.
    pub fn day_cycle_label(&self) -> String {
        format!(
            "Day {} Cycle {:02}",
            self.day_of_week + 1,
            self.cycle_of_day + 1
        )
    }
}

// ═══════════════════════════════════════════════════════════════════════
// CLOCK EVENTS
// ═══════════════════════════════════════════════════════════════════════

/// One in-game day (one real hour) finished. Triggers the watering reset.
#[derive(Event, Debug, Clone)]
pub struct CycleRolloverEvent {
    /// The cycle that just began.
    pub cycle_id: i64,
}

/// The day-of-week index advanced.
#[derive(Event, Debug, Clone)]
pub struct DayRolloverEvent {
    pub day_of_week: u8,
}

/// A new real-world week began. Resets the weekly checklist.
#[derive(Event, Debug, Clone)]
pub struct WeekRolloverEvent {
    pub week_id: i64,
}

// ═══════════════════════════════════════════════════════════════════════
// TRACKED CROPS
// ═══════════════════════════════════════════════════════════════════════

/// Where a tracked crop came from. Provenance only; watering logic is
/// identical for both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CropSource {
    Manual,
    Import,
}

/// One crop type on the watering list. Unique by `crop_type`; watering is
/// per crop type, not per plant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedCrop {
    pub crop_type: String,
    pub is_watered: bool,
    pub source: CropSource,
    /// Plant count from the imported layout (1 for manual entries).
    pub total_count: u32,
    /// Raw tile count from the imported layout (bookkeeping only).
    pub plant_instances: u32,
}

impl TrackedCrop {
    pub fn manual(crop_type: impl Into<String>) -> Self {
        Self {
            crop_type: crop_type.into(),
            is_watered: false,
            source: CropSource::Manual,
            total_count: 1,
            plant_instances: 1,
        }
    }
}

/// Summary of one finished cycle for the rolling history strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleRecord {
    pub cycle_id: i64,
    pub watered: u32,
    pub total: u32,
}

impl CycleRecord {
    pub fn complete(&self) -> bool {
        self.total > 0 && self.watered == self.total
    }
}

/// The whole tracking state. Mutated only through `tracker::reduce`;
/// persisted as one JSON blob under `STORAGE_KEY_TRACKER`.
#[derive(Resource, Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrackerState {
    pub crops: Vec<TrackedCrop>,
    /// Last cycle the reducer has seen; rollovers before this are stale.
    pub last_cycle_id: Option<i64>,
    /// Most recent finished cycles, newest at the back. Capped at
    /// `HISTORY_CYCLES`.
    pub history: VecDeque<CycleRecord>,
}

impl TrackerState {
    pub fn watered_count(&self) -> u32 {
        self.crops.iter().filter(|c| c.is_watered).count() as u32
    }

    pub fn find(&self, crop_type: &str) -> Option<&TrackedCrop> {
        self.crops.iter().find(|c| c.crop_type == crop_type)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// WEEKLY CHECKLIST
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub label: String,
    pub done: bool,
}

/// Small weekly task list; done-flags reset when the week rolls over.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyChecklist {
    pub items: Vec<ChecklistItem>,
    pub week_id: Option<i64>,
}

impl Default for WeeklyChecklist {
    fn default() -> Self {
        let items = [
            "Visit the weekly wants board",
            "Restock fertilizer",
            "Clear harvested plots",
        ]
        .into_iter()
        .map(|label| ChecklistItem {
            label: label.to_string(),
            done: false,
        })
        .collect();
        Self {
            items,
            week_id: None,
        }
    }
}

/// Toggle one checklist item's done-flag (sent by the tracker screen).
#[derive(Event, Debug, Clone)]
pub struct ChecklistToggleEvent {
    pub index: usize,
}

// ═══════════════════════════════════════════════════════════════════════
// TRACKER EVENTS
// ═══════════════════════════════════════════════════════════════════════

/// Player intent against the tracking list, applied by the tracker reducer.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackerAction {
    AddCrop(String),
    RemoveCrop(String),
    ToggleWatered(String),
    WaterAll,
    WaterNone,
    ClearAll,
    /// Replace the imported entries with a decoded layout's plant counts.
    /// `(crop name, plant count, tile count)` per crop; manual entries kept.
    ImportGarden(Vec<(String, u32, u32)>),
    /// A new cycle began: archive the finished one, reset watered flags.
    CycleRollover(i64),
}

#[derive(Event, Debug, Clone)]
pub struct TrackerActionEvent(pub TrackerAction);

/// Request to decode a save code (or planner URL) and import it.
#[derive(Event, Debug, Clone)]
pub struct ImportGardenEvent {
    pub code: String,
}

/// Outcome of an import request, for UI status lines.
#[derive(Event, Debug, Clone)]
pub struct ImportCompleteEvent {
    pub success: bool,
    pub message: String,
}

/// The last successfully imported save code. Layout slots store it.
#[derive(Resource, Debug, Clone, Default)]
pub struct CurrentImport {
    pub code: Option<String>,
}

// ═══════════════════════════════════════════════════════════════════════
// LAYOUT SLOT EVENTS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Event, Debug, Clone)]
pub struct SaveLayoutRequestEvent {
    pub slot: u8,
    pub name: String,
}

#[derive(Event, Debug, Clone)]
pub struct LoadLayoutRequestEvent {
    pub slot: u8,
}

#[derive(Event, Debug, Clone)]
pub struct DeleteLayoutRequestEvent {
    pub slot: u8,
}

/// Sent after any slot operation completes (success or failure).
#[derive(Event, Debug, Clone)]
pub struct LayoutOpCompleteEvent {
    pub slot: u8,
    pub success: bool,
    pub message: String,
}

// ═══════════════════════════════════════════════════════════════════════
// INPUT
// ═══════════════════════════════════════════════════════════════════════

/// Which kind of input the focused screen wants.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputContext {
    /// List navigation + action keys.
    #[default]
    List,
    /// Free text entry (import field, layout names); action keys off.
    TextEntry,
}

/// The single point where hardware input becomes app actions, rewritten
/// every frame in `PreUpdate`.
#[derive(Resource, Debug, Clone, Default)]
pub struct CompanionInput {
    pub move_up: bool,
    pub move_down: bool,
    pub confirm: bool,
    pub cancel: bool,
    pub toggle_watered: bool,
    pub water_all: bool,
    pub water_none: bool,
    pub remove_selected: bool,
    pub clear_all: bool,
    pub goto_tracker: bool,
    pub goto_import: bool,
    pub goto_layouts: bool,
    /// 1-9 number row, for slot selection and quick-add.
    pub digit: Option<u8>,
    /// Printable characters typed this frame (TextEntry context only).
    pub text: String,
    pub backspace: bool,
}

/// Shared list cursor for whichever screen owns the focus.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct ListCursor {
    pub index: usize,
}

impl ListCursor {
    pub fn clamp_to(&mut self, len: usize) {
        if len == 0 {
            self.index = 0;
        } else if self.index >= len {
            self.index = len - 1;
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// CONSTANTS
// ═══════════════════════════════════════════════════════════════════════

pub const SCREEN_WIDTH: f32 = 960.0;
pub const SCREEN_HEIGHT: f32 = 540.0;

/// Wall-clock sample interval for the clock animation.
pub const CLOCK_SAMPLE_SECS: f32 = 0.25;

/// Every garden plot is a fixed 3×3 block of tiles.
pub const PLOT_SIDE_TILES: usize = 3;
pub const TILES_PER_PLOT: usize = PLOT_SIDE_TILES * PLOT_SIDE_TILES;

/// Rolling history length: 24 cycles = one real day.
pub const HISTORY_CYCLES: usize = 24;

pub const NUM_LAYOUT_SLOTS: u8 = 4;

pub const STORAGE_KEY_TRACKER: &str = "dewtrack.tracker";
pub const STORAGE_KEY_CHECKLIST: &str = "dewtrack.checklist";

pub fn layout_slot_key(slot: u8) -> String {
    format!("dewtrack.layout.{}", slot)
}

// ═══════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════
