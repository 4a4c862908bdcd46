//! Watering tracker — the reducer over the tracked-crop collection.
//!
//! All mutation goes through `reduce`, a pure function from (state, action)
//! to (next state, persistence effects). The Bevy systems here are the
//! boundary: they turn events into actions, apply the reducer, and execute
//! the effects against the key-value store. Keeping the reducer pure is
//! what makes the daily-reset and import logic testable without an app.

use bevy::prelude::*;

use crate::clock::wall_clock_epoch_ms;
use crate::garden;
use crate::shared::*;
use crate::storage;

// ─── Effects ─────────────────────────────────────────────────────────────────

/// Side effects a reduction asks the boundary to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Write the tracker state to the key-value store.
    Persist,
}

// ─── Reducer ─────────────────────────────────────────────────────────────────

/// Applies one action. Returns the next state plus the effects to run;
/// an action that changes nothing produces no effects.
pub fn reduce(state: &TrackerState, action: &TrackerAction) -> (TrackerState, Vec<Effect>) {
    let mut next = state.clone();

    match action {
        TrackerAction::AddCrop(name) => {
            if next.find(name).is_none() {
                next.crops.push(TrackedCrop::manual(name.clone()));
            }
        }
        TrackerAction::RemoveCrop(name) => {
            next.crops.retain(|c| c.crop_type != *name);
        }
        TrackerAction::ToggleWatered(name) => {
            if let Some(crop) = next.crops.iter_mut().find(|c| c.crop_type == *name) {
                crop.is_watered = !crop.is_watered;
            }
        }
        TrackerAction::WaterAll => {
            for crop in &mut next.crops {
                crop.is_watered = true;
            }
        }
        TrackerAction::WaterNone => {
            for crop in &mut next.crops {
                crop.is_watered = false;
            }
        }
        TrackerAction::ClearAll => {
            next.crops.clear();
        }
        TrackerAction::ImportGarden(rows) => {
            // Imported entries are replaced wholesale; manual entries stay
            // unless the import also covers that crop type (uniqueness by
            // crop_type wins over provenance).
            next.crops.retain(|c| {
                c.source == CropSource::Manual
                    && !rows.iter().any(|(name, _, _)| *name == c.crop_type)
            });
            for (name, plants, tiles) in rows {
                next.crops.push(TrackedCrop {
                    crop_type: name.clone(),
                    is_watered: false,
                    source: CropSource::Import,
                    total_count: *plants,
                    plant_instances: *tiles,
                });
            }
        }
        TrackerAction::CycleRollover(new_cycle_id) => {
            if next.last_cycle_id != Some(*new_cycle_id) {
                // Archive the cycle that just finished, then reset.
                if !next.crops.is_empty() {
                    let finished = next.last_cycle_id.unwrap_or(new_cycle_id - 1);
                    next.history.push_back(CycleRecord {
                        cycle_id: finished,
                        watered: next.watered_count(),
                        total: next.crops.len() as u32,
                    });
                    while next.history.len() > HISTORY_CYCLES {
                        next.history.pop_front();
                    }
                    for crop in &mut next.crops {
                        crop.is_watered = false;
                    }
                }
                next.last_cycle_id = Some(*new_cycle_id);
            }
        }
    }

    let effects = if next != *state {
        vec![Effect::Persist]
    } else {
        Vec::new()
    };
    (next, effects)
}

/// Applies the rollover that would have fired had the app been open when
/// `current_cycle_id` began. Watered flags must not survive a cycle
/// boundary crossed while the app was closed; the reducer's stale-cycle
/// guard makes this a no-op when the restored state is already current.
pub fn reconcile_restored(saved: &TrackerState, current_cycle_id: i64) -> (TrackerState, Vec<Effect>) {
    reduce(saved, &TrackerAction::CycleRollover(current_cycle_id))
}

// ─── Plugin ──────────────────────────────────────────────────────────────────

pub struct TrackerPlugin;

impl Plugin for TrackerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, load_tracker_state).add_systems(
            Update,
            (
                relay_cycle_rollover,
                handle_import_requests,
                apply_tracker_actions,
            )
                .chain(),
        );
    }
}

// ─── Systems ─────────────────────────────────────────────────────────────────

/// Restore the persisted tracker state, if any.
fn load_tracker_state(mut state: ResMut<TrackerState>) {
    let Some(json) = storage::get(STORAGE_KEY_TRACKER) else {
        info!("[Tracker] No saved state, starting fresh");
        return;
    };
    match serde_json::from_str::<TrackerState>(&json) {
        Ok(saved) => {
            info!(
                "[Tracker] Restored {} crops, {} history records",
                saved.crops.len(),
                saved.history.len()
            );
            let current = GameClock::from_epoch_ms(wall_clock_epoch_ms());
            let (reconciled, effects) = reconcile_restored(&saved, current.cycle_id);
            if !effects.is_empty() {
                info!(
                    "[Tracker] Cycle boundary passed while closed ({:?} -> {}), resetting",
                    saved.last_cycle_id, current.cycle_id
                );
                persist_tracker(&reconciled);
            }
            *state = reconciled;
        }
        Err(e) => {
            warn!("[Tracker] Saved state unreadable, starting fresh: {}", e);
        }
    }
}

/// One in-game day ended: forward the rollover to the reducer.
pub fn relay_cycle_rollover(
    mut rollovers: EventReader<CycleRolloverEvent>,
    mut actions: EventWriter<TrackerActionEvent>,
) {
    for ev in rollovers.read() {
        actions.send(TrackerActionEvent(TrackerAction::CycleRollover(
            ev.cycle_id,
        )));
    }
}

/// Decode import requests and feed the result to the reducer. Decode
/// failures surface as ImportCompleteEvent, never as a panic.
pub fn handle_import_requests(
    mut requests: EventReader<ImportGardenEvent>,
    mut actions: EventWriter<TrackerActionEvent>,
    mut completions: EventWriter<ImportCompleteEvent>,
    mut current: ResMut<CurrentImport>,
) {
    for ev in requests.read() {
        match garden::decode(&ev.code) {
            Ok(parsed) => {
                let mut message = format!(
                    "Imported {} plants across {} crops",
                    parsed.total_plants,
                    parsed.crop_counts.len()
                );
                if !parsed.warnings.is_empty() {
                    message.push_str(&format!(
                        " ({} unknown codes skipped)",
                        parsed.warnings.len()
                    ));
                    warn!(
                        "[Tracker] Import carried {} unknown codes: {:?}",
                        parsed.warnings.len(),
                        parsed.warnings
                    );
                }
                info!("[Tracker] {}", message);

                actions.send(TrackerActionEvent(TrackerAction::ImportGarden(
                    parsed.crop_summary(),
                )));
                // Keep the raw (unwrapped) code so a layout slot can store it.
                current.code = garden::unwrap_share_url(&ev.code).ok();
                completions.send(ImportCompleteEvent {
                    success: true,
                    message,
                });
            }
            Err(e) => {
                warn!("[Tracker] Import failed: {}", e);
                completions.send(ImportCompleteEvent {
                    success: false,
                    message: e.to_string(),
                });
            }
        }
    }
}

/// Apply queued actions through the reducer and run the effects.
pub fn apply_tracker_actions(
    mut events: EventReader<TrackerActionEvent>,
    mut state: ResMut<TrackerState>,
) {
    for TrackerActionEvent(action) in events.read() {
        let (next, effects) = reduce(&state, action);
        *state = next;
        for effect in effects {
            match effect {
                Effect::Persist => persist_tracker(&state),
            }
        }
    }
}

fn persist_tracker(state: &TrackerState) {
    match serde_json::to_string(state) {
        Ok(json) => {
            if let Err(e) = storage::set(STORAGE_KEY_TRACKER, &json) {
                warn!("[Tracker] Persist failed: {}", e);
            }
        }
        Err(e) => warn!("[Tracker] Serialization failed: {}", e),
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(crops: &[&str]) -> TrackerState {
        TrackerState {
            crops: crops.iter().map(|c| TrackedCrop::manual(*c)).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_add_is_idempotent_by_crop_type() {
        let state = TrackerState::default();
        let (state, effects) = reduce(&state, &TrackerAction::AddCrop("Tomato".into()));
        assert_eq!(state.crops.len(), 1);
        assert_eq!(effects, vec![Effect::Persist]);

        let (state, effects) = reduce(&state, &TrackerAction::AddCrop("Tomato".into()));
        assert_eq!(state.crops.len(), 1);
        assert!(effects.is_empty(), "duplicate add must not persist");
    }

    #[test]
    fn test_toggle_twice_restores_state() {
        let state = state_with(&["Tomato", "Carrot"]);
        let (once, _) = reduce(&state, &TrackerAction::ToggleWatered("Tomato".into()));
        assert!(once.find("Tomato").unwrap().is_watered);
        let (twice, _) = reduce(&once, &TrackerAction::ToggleWatered("Tomato".into()));
        assert_eq!(twice, state);
    }

    #[test]
    fn test_toggle_unknown_crop_is_a_no_op() {
        let state = state_with(&["Tomato"]);
        let (next, effects) = reduce(&state, &TrackerAction::ToggleWatered("Rice".into()));
        assert_eq!(next, state);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_water_all_and_none() {
        let state = state_with(&["Tomato", "Carrot", "Rice"]);
        let (all, _) = reduce(&state, &TrackerAction::WaterAll);
        assert_eq!(all.watered_count(), 3);
        let (none, _) = reduce(&all, &TrackerAction::WaterNone);
        assert_eq!(none.watered_count(), 0);
    }

    #[test]
    fn test_import_keeps_manual_entries() {
        let state = state_with(&["Rice"]);
        let rows = vec![
            ("Tomato".to_string(), 9, 9),
            ("Apple".to_string(), 1, 9),
        ];
        let (next, _) = reduce(&state, &TrackerAction::ImportGarden(rows.clone()));
        assert_eq!(next.crops.len(), 3);
        assert_eq!(next.find("Rice").unwrap().source, CropSource::Manual);
        let apple = next.find("Apple").unwrap();
        assert_eq!(apple.source, CropSource::Import);
        assert_eq!(apple.total_count, 1);
        assert_eq!(apple.plant_instances, 9);

        // Re-import replaces the imported entries, not the manual one.
        let (again, _) = reduce(&next, &TrackerAction::ImportGarden(vec![(
            "Carrot".to_string(),
            4,
            4,
        )]));
        assert_eq!(again.crops.len(), 2);
        assert!(again.find("Tomato").is_none());
        assert!(again.find("Rice").is_some());
    }

    #[test]
    fn test_import_collision_prefers_imported_entry() {
        let state = state_with(&["Tomato"]);
        let (next, _) = reduce(
            &state,
            &TrackerAction::ImportGarden(vec![("Tomato".to_string(), 9, 9)]),
        );
        assert_eq!(next.crops.len(), 1);
        assert_eq!(next.find("Tomato").unwrap().source, CropSource::Import);
    }

    #[test]
    fn test_cycle_rollover_resets_and_records() {
        let state = state_with(&["Tomato", "Carrot"]);
        let (state, _) = reduce(&state, &TrackerAction::ToggleWatered("Tomato".into()));
        let (state, effects) = reduce(&state, &TrackerAction::CycleRollover(100));

        assert_eq!(effects, vec![Effect::Persist]);
        assert_eq!(state.watered_count(), 0, "watered flags reset on rollover");
        assert_eq!(state.last_cycle_id, Some(100));
        assert_eq!(state.history.len(), 1);
        let record = state.history.back().unwrap();
        assert_eq!(record.cycle_id, 99);
        assert_eq!(record.watered, 1);
        assert_eq!(record.total, 2);
    }

    #[test]
    fn test_stale_rollover_is_a_no_op() {
        let state = state_with(&["Tomato"]);
        let (state, _) = reduce(&state, &TrackerAction::CycleRollover(5));
        let (next, effects) = reduce(&state, &TrackerAction::CycleRollover(5));
        assert_eq!(next, state);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_history_is_capped() {
        let mut state = state_with(&["Tomato"]);
        for cycle in 0..(HISTORY_CYCLES as i64 + 10) {
            let (next, _) = reduce(&state, &TrackerAction::CycleRollover(cycle));
            state = next;
        }
        assert_eq!(state.history.len(), HISTORY_CYCLES);
        // Newest record at the back.
        assert_eq!(
            state.history.back().unwrap().cycle_id,
            HISTORY_CYCLES as i64 + 8
        );
    }

    #[test]
    fn test_restore_across_missed_cycle_boundary_resets() {
        // State persisted mid-cycle 100 with a watered crop; the app is
        // reopened during cycle 105. The reset the closed app never saw
        // must run before the state is shown.
        let mut saved = state_with(&["Tomato", "Carrot"]);
        saved.last_cycle_id = Some(100);
        saved.crops[0].is_watered = true;

        let (restored, effects) = reconcile_restored(&saved, 105);
        assert_eq!(effects, vec![Effect::Persist]);
        assert_eq!(restored.watered_count(), 0);
        assert_eq!(restored.last_cycle_id, Some(105));
        let record = restored.history.back().unwrap();
        assert_eq!(record.cycle_id, 100);
        assert_eq!(record.watered, 1);
    }

    #[test]
    fn test_restore_within_same_cycle_is_untouched() {
        let mut saved = state_with(&["Tomato"]);
        saved.last_cycle_id = Some(100);
        saved.crops[0].is_watered = true;

        let (restored, effects) = reconcile_restored(&saved, 100);
        assert_eq!(restored, saved);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_rollover_with_empty_list_records_nothing() {
        let state = TrackerState::default();
        let (next, _) = reduce(&state, &TrackerAction::CycleRollover(7));
        assert!(next.history.is_empty());
        assert_eq!(next.last_cycle_id, Some(7));
    }
}
