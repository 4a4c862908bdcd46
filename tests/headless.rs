//! Headless integration tests for Dewtrack.
//!
//! These tests exercise the event plumbing without a window or GPU. They
//! use Bevy's `MinimalPlugins` to tick the app, register only the
//! pure-logic systems (skipping rendering, the UI screens, and the
//! wall-clock sampler), and verify that the cross-domain flows work:
//! cycle rollover resets, garden imports, layout slots, and the weekly
//! checklist.
//!
//! Run with: `cargo test --test headless`

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use dewtrack::checklist::{handle_toggles, handle_week_rollover};
use dewtrack::layouts::{LayoutSlotCache, LayoutsPlugin};
use dewtrack::shared::*;
use dewtrack::tracker::{apply_tracker_actions, handle_import_requests, relay_cycle_rollover};

const SAMPLE_CODE: &str = "v0.4_D-111-111-111_CR-TTTTTTTTT-PPPPPPPPP-AAAAAAAAA-NNNNNNNNN-NNNNNNNNN-NNNNNNNNN-NNNNNNNNN-NNNNNNNNN-NNNNNNNNN";

// ─────────────────────────────────────────────────────────────────────────────
// Test App Builder
// ─────────────────────────────────────────────────────────────────────────────

/// Builds a minimal Bevy app with all shared resources and events
/// registered but NO rendering, windowing, or startup persistence loads.
/// Systems are added per-test depending on what's being exercised.
fn build_test_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(StatesPlugin);

    app.init_state::<AppScreen>();

    // ── Shared Resources (mirrors main.rs) ───────────────────────────────
    app.init_resource::<GameClock>()
        .init_resource::<TrackerState>()
        .init_resource::<WeeklyChecklist>()
        .init_resource::<CurrentImport>()
        .init_resource::<InputContext>()
        .init_resource::<CompanionInput>()
        .init_resource::<ListCursor>();

    // ── Shared Events (mirrors main.rs) ──────────────────────────────────
    app.add_event::<CycleRolloverEvent>()
        .add_event::<DayRolloverEvent>()
        .add_event::<WeekRolloverEvent>()
        .add_event::<ChecklistToggleEvent>()
        .add_event::<TrackerActionEvent>()
        .add_event::<ImportGardenEvent>()
        .add_event::<ImportCompleteEvent>()
        .add_event::<SaveLayoutRequestEvent>()
        .add_event::<LoadLayoutRequestEvent>()
        .add_event::<DeleteLayoutRequestEvent>()
        .add_event::<LayoutOpCompleteEvent>();

    app
}

/// Adds the tracker's Update chain without its Startup persistence load.
fn add_tracker_systems(app: &mut App) {
    app.add_systems(
        Update,
        (
            relay_cycle_rollover,
            handle_import_requests,
            apply_tracker_actions,
        )
            .chain(),
    );
}

fn send_action(app: &mut App, action: TrackerAction) {
    app.world_mut().send_event(TrackerActionEvent(action));
}

fn drain_import_completions(app: &mut App) -> Vec<ImportCompleteEvent> {
    let events = app.world().resource::<Events<ImportCompleteEvent>>();
    let mut cursor = events.get_cursor();
    cursor.read(events).cloned().collect()
}

fn drain_layout_completions(app: &mut App) -> Vec<LayoutOpCompleteEvent> {
    let events = app.world().resource::<Events<LayoutOpCompleteEvent>>();
    let mut cursor = events.get_cursor();
    cursor.read(events).cloned().collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tracker Flows
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_cycle_rollover_resets_watered_and_records_history() {
    let mut app = build_test_app();
    add_tracker_systems(&mut app);

    send_action(&mut app, TrackerAction::AddCrop("Tomato".to_string()));
    send_action(&mut app, TrackerAction::AddCrop("Rice".to_string()));
    send_action(&mut app, TrackerAction::ToggleWatered("Tomato".to_string()));
    app.update();

    let state = app.world().resource::<TrackerState>();
    assert_eq!(state.crops.len(), 2);
    assert_eq!(state.watered_count(), 1);

    // The clock says a new cycle began.
    app.world_mut()
        .send_event(CycleRolloverEvent { cycle_id: 42 });
    app.update();
    // relay runs in the same tick but the action lands next tick.
    app.update();

    let state = app.world().resource::<TrackerState>();
    assert_eq!(state.watered_count(), 0, "rollover must reset watered flags");
    assert_eq!(state.last_cycle_id, Some(42));
    let record = state.history.back().expect("rollover must record history");
    assert_eq!(record.watered, 1);
    assert_eq!(record.total, 2);
}

#[test]
fn test_duplicate_rollover_event_archives_once() {
    let mut app = build_test_app();
    add_tracker_systems(&mut app);

    send_action(&mut app, TrackerAction::AddCrop("Tomato".to_string()));
    app.update();

    app.world_mut().send_event(CycleRolloverEvent { cycle_id: 7 });
    app.world_mut().send_event(CycleRolloverEvent { cycle_id: 7 });
    app.update();
    app.update();

    let state = app.world().resource::<TrackerState>();
    assert_eq!(state.history.len(), 1);
    assert_eq!(state.last_cycle_id, Some(7));
}

// ─────────────────────────────────────────────────────────────────────────────
// Import Flows
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_import_event_populates_tracker() {
    let mut app = build_test_app();
    add_tracker_systems(&mut app);

    app.world_mut().send_event(ImportGardenEvent {
        code: SAMPLE_CODE.to_string(),
    });
    app.update();
    app.update();

    let state = app.world().resource::<TrackerState>();
    assert_eq!(state.crops.len(), 3);
    let tomato = state.find("Tomato").expect("tomato imported");
    assert_eq!(tomato.total_count, 9);
    assert_eq!(tomato.source, CropSource::Import);
    let apple = state.find("Apple").expect("apple imported");
    assert_eq!(apple.total_count, 1, "a tree spans nine tiles, one plant");

    let current = app.world().resource::<CurrentImport>();
    assert_eq!(current.code.as_deref(), Some(SAMPLE_CODE));

    let completions = drain_import_completions(&mut app);
    assert_eq!(completions.len(), 1);
    assert!(completions[0].success);
}

#[test]
fn test_import_failure_reports_and_leaves_state_alone() {
    let mut app = build_test_app();
    add_tracker_systems(&mut app);

    send_action(&mut app, TrackerAction::AddCrop("Rice".to_string()));
    app.update();

    app.world_mut().send_event(ImportGardenEvent {
        code: "this is not a save code".to_string(),
    });
    app.update();
    app.update();

    let completions = drain_import_completions(&mut app);
    assert_eq!(completions.len(), 1);
    assert!(!completions[0].success);

    let state = app.world().resource::<TrackerState>();
    assert_eq!(state.crops.len(), 1, "failed import must not touch the list");
    let current = app.world().resource::<CurrentImport>();
    assert!(current.code.is_none());
}

#[test]
fn test_import_from_planner_url() {
    let mut app = build_test_app();
    add_tracker_systems(&mut app);

    app.world_mut().send_event(ImportGardenEvent {
        code: format!(
            "https://palia-garden-planner.vercel.app/?layout={}",
            SAMPLE_CODE
        ),
    });
    app.update();
    app.update();

    let state = app.world().resource::<TrackerState>();
    assert_eq!(state.crops.len(), 3);
    // The slot-storable code is the unwrapped one, not the URL.
    let current = app.world().resource::<CurrentImport>();
    assert_eq!(current.code.as_deref(), Some(SAMPLE_CODE));
}

// ─────────────────────────────────────────────────────────────────────────────
// Layout Slots
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_layout_slot_save_load_delete() {
    let mut app = build_test_app();
    add_tracker_systems(&mut app);
    app.add_plugins(LayoutsPlugin);

    // Import first so there is a current code to save.
    app.world_mut().send_event(ImportGardenEvent {
        code: SAMPLE_CODE.to_string(),
    });
    app.update();
    app.update();

    let slot = 3; // kept distinct from anything other tests touch
    app.world_mut().send_event(SaveLayoutRequestEvent {
        slot,
        name: "Headless".to_string(),
    });
    app.update();

    let completions = drain_layout_completions(&mut app);
    assert!(completions.iter().any(|c| c.success && c.slot == slot));
    let cache = app.world().resource::<LayoutSlotCache>();
    let info = &cache.slots[slot as usize];
    assert!(info.exists);
    assert_eq!(info.name, "Headless");
    assert_eq!(info.total_plants, 19);

    // Wipe the tracker, then load the slot back through the import path.
    send_action(&mut app, TrackerAction::ClearAll);
    app.update();
    assert!(app.world().resource::<TrackerState>().crops.is_empty());

    app.world_mut().send_event(LoadLayoutRequestEvent { slot });
    app.update();
    app.update();

    let state = app.world().resource::<TrackerState>();
    assert_eq!(state.crops.len(), 3, "load must re-run the import");

    app.world_mut().send_event(DeleteLayoutRequestEvent { slot });
    app.update();
    let cache = app.world().resource::<LayoutSlotCache>();
    assert!(!cache.slots[slot as usize].exists);
}

#[test]
fn test_save_without_import_fails_cleanly() {
    let mut app = build_test_app();
    app.add_plugins(LayoutsPlugin);

    app.world_mut().send_event(SaveLayoutRequestEvent {
        slot: 0,
        name: "Nope".to_string(),
    });
    app.update();

    let completions = drain_layout_completions(&mut app);
    assert_eq!(completions.len(), 1);
    assert!(!completions[0].success);
    let cache = app.world().resource::<LayoutSlotCache>();
    assert!(!cache.slots[0].exists);
}

// ─────────────────────────────────────────────────────────────────────────────
// Weekly Checklist
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_week_rollover_resets_checklist_once() {
    let mut app = build_test_app();
    app.add_systems(Update, (handle_week_rollover, handle_toggles));

    app.world_mut().send_event(ChecklistToggleEvent { index: 0 });
    app.update();
    assert!(app.world().resource::<WeeklyChecklist>().items[0].done);

    app.world_mut().send_event(WeekRolloverEvent { week_id: 5 });
    app.update();

    let checklist = app.world().resource::<WeeklyChecklist>();
    assert!(!checklist.items[0].done, "new week must clear done-flags");
    assert_eq!(checklist.week_id, Some(5));

    // The same week arriving again (e.g. after a restart) must not reset.
    app.world_mut().send_event(ChecklistToggleEvent { index: 1 });
    app.update();
    app.world_mut().send_event(WeekRolloverEvent { week_id: 5 });
    app.update();
    assert!(app.world().resource::<WeeklyChecklist>().items[1].done);
}

// ─────────────────────────────────────────────────────────────────────────────
// Clock
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_clock_resource_defaults_to_epoch_derivation() {
    let app = build_test_app();
    let clock = app.world().resource::<GameClock>();
    assert_eq!(*clock, GameClock::from_epoch_ms(0.0));
    assert!(clock.hour < 24);
}
