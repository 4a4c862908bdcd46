//! Weekly checklist — the small optional consumer of the week identifier.
//!
//! Done-flags reset when the in-game week rolls over; everything else is a
//! plain persisted list. The startup load reconciles the stored week
//! against the current clock, so a week boundary crossed while the app was
//! closed still clears the flags.

use bevy::prelude::*;

use crate::clock::wall_clock_epoch_ms;
use crate::shared::*;
use crate::storage;

pub struct ChecklistPlugin;

impl Plugin for ChecklistPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, load_checklist)
            .add_systems(Update, (handle_week_rollover, handle_toggles));
    }
}

/// Clears the done-flags for a newly seen week and remembers it. Returns
/// false when the checklist is already on `week_id`, so a restart inside
/// the same week does not reset twice.
pub fn begin_week(checklist: &mut WeeklyChecklist, week_id: i64) -> bool {
    if checklist.week_id == Some(week_id) {
        return false;
    }
    for item in &mut checklist.items {
        item.done = false;
    }
    checklist.week_id = Some(week_id);
    true
}

fn load_checklist(mut checklist: ResMut<WeeklyChecklist>) {
    let Some(json) = storage::get(STORAGE_KEY_CHECKLIST) else {
        return;
    };
    match serde_json::from_str::<WeeklyChecklist>(&json) {
        Ok(mut saved) => {
            let current = GameClock::from_epoch_ms(wall_clock_epoch_ms());
            if begin_week(&mut saved, current.week_id) {
                info!(
                    "[Checklist] Week boundary passed while closed, resetting for week {}",
                    current.week_id
                );
                persist_checklist(&saved);
            }
            *checklist = saved;
        }
        Err(e) => warn!("[Checklist] Saved checklist unreadable: {}", e),
    }
}

pub fn handle_week_rollover(
    mut rollovers: EventReader<WeekRolloverEvent>,
    mut checklist: ResMut<WeeklyChecklist>,
) {
    for ev in rollovers.read() {
        if begin_week(&mut checklist, ev.week_id) {
            info!("[Checklist] Week {} began, resetting checklist", ev.week_id);
            persist_checklist(&checklist);
        }
    }
}

pub fn handle_toggles(
    mut toggles: EventReader<ChecklistToggleEvent>,
    mut checklist: ResMut<WeeklyChecklist>,
) {
    for ev in toggles.read() {
        if let Some(item) = checklist.items.get_mut(ev.index) {
            item.done = !item.done;
            persist_checklist(&checklist);
        }
    }
}

fn persist_checklist(checklist: &WeeklyChecklist) {
    match serde_json::to_string(checklist) {
        Ok(json) => {
            if let Err(e) = storage::set(STORAGE_KEY_CHECKLIST, &json) {
                warn!("[Checklist] Persist failed: {}", e);
            }
        }
        Err(e) => warn!("[Checklist] Serialization failed: {}", e),
    }
}
