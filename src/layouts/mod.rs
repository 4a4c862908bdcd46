//! Saved garden layouts — named slots over the key-value store.
//!
//! A slot stores the raw save code plus a summary for the slot list; loading
//! a slot re-runs the normal import path so the tracker ends up in exactly
//! the state a fresh paste of that code would produce.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::clock::wall_clock_epoch_ms;
use crate::garden;
use crate::shared::*;
use crate::storage;

// ═══════════════════════════════════════════════════════════════════════
// TYPES
// ═══════════════════════════════════════════════════════════════════════

/// One stored layout, one JSON blob per slot key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedLayout {
    pub name: String,
    /// The raw (unwrapped) save code; re-decoded on load.
    pub code: String,
    /// Per-crop plant counts at save time, for the slot list.
    pub crop_totals: Vec<(String, u32)>,
    pub total_plants: u32,
    pub saved_at_ms: f64,
}

/// Info about a slot shown on the layouts screen.
#[derive(Debug, Clone, Default)]
pub struct LayoutSlotInfo {
    pub slot: u8,
    pub exists: bool,
    pub name: String,
    pub total_plants: u32,
    pub crop_kinds: usize,
}

impl SavedLayout {
    fn to_slot_info(&self, slot: u8) -> LayoutSlotInfo {
        LayoutSlotInfo {
            slot,
            exists: true,
            name: self.name.clone(),
            total_plants: self.total_plants,
            crop_kinds: self.crop_totals.len(),
        }
    }
}

/// Cached metadata for all slots, refreshed at startup and after every
/// mutation.
#[derive(Resource, Debug, Clone, Default)]
pub struct LayoutSlotCache {
    pub slots: Vec<LayoutSlotInfo>,
}

// ═══════════════════════════════════════════════════════════════════════
// PLUGIN
// ═══════════════════════════════════════════════════════════════════════

pub struct LayoutsPlugin;

impl Plugin for LayoutsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LayoutSlotCache>()
            .add_systems(Startup, scan_layout_slots)
            .add_systems(
                Update,
                (handle_save_request, handle_load_request, handle_delete_request),
            );
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SLOT ACCESS
// ═══════════════════════════════════════════════════════════════════════

fn read_slot(slot: u8) -> Option<SavedLayout> {
    let json = storage::get(&layout_slot_key(slot))?;
    match serde_json::from_str(&json) {
        Ok(layout) => Some(layout),
        Err(e) => {
            warn!("[Layouts] Slot {} unreadable: {}", slot, e);
            None
        }
    }
}

fn write_slot(slot: u8, layout: &SavedLayout) -> Result<(), String> {
    let json =
        serde_json::to_string(layout).map_err(|e| format!("serialization failed: {}", e))?;
    storage::set(&layout_slot_key(slot), &json)
}

fn peek_slot(slot: u8) -> LayoutSlotInfo {
    match read_slot(slot) {
        Some(layout) => layout.to_slot_info(slot),
        None => LayoutSlotInfo {
            slot,
            ..Default::default()
        },
    }
}

fn scan_layout_slots(mut cache: ResMut<LayoutSlotCache>) {
    refresh_cache(&mut cache);
    let found = cache.slots.iter().filter(|s| s.exists).count();
    info!(
        "[Layouts] Slot scan complete: {}/{} in use",
        found, NUM_LAYOUT_SLOTS
    );
}

fn refresh_cache(cache: &mut LayoutSlotCache) {
    cache.slots = (0..NUM_LAYOUT_SLOTS).map(peek_slot).collect();
}

// ═══════════════════════════════════════════════════════════════════════
// REQUEST HANDLERS
// ═══════════════════════════════════════════════════════════════════════

/// Store the currently imported code under a slot. Fails cleanly when no
/// import has happened yet or the code no longer decodes.
fn handle_save_request(
    mut requests: EventReader<SaveLayoutRequestEvent>,
    mut completions: EventWriter<LayoutOpCompleteEvent>,
    mut cache: ResMut<LayoutSlotCache>,
    current: Res<CurrentImport>,
) {
    for ev in requests.read() {
        let Some(code) = current.code.clone() else {
            completions.send(LayoutOpCompleteEvent {
                slot: ev.slot,
                success: false,
                message: "Nothing imported yet".to_string(),
            });
            continue;
        };

        let result = garden::decode(&code).map_err(|e| e.to_string()).and_then(
            |parsed| {
                let layout = SavedLayout {
                    name: ev.name.clone(),
                    code: code.clone(),
                    crop_totals: parsed
                        .crop_counts
                        .iter()
                        .map(|(name, count)| (name.clone(), *count))
                        .collect(),
                    total_plants: parsed.total_plants,
                    saved_at_ms: wall_clock_epoch_ms(),
                };
                write_slot(ev.slot, &layout)
            },
        );

        match result {
            Ok(()) => {
                info!("[Layouts] Saved '{}' to slot {}", ev.name, ev.slot);
                refresh_cache(&mut cache);
                completions.send(LayoutOpCompleteEvent {
                    slot: ev.slot,
                    success: true,
                    message: format!("Saved '{}'", ev.name),
                });
            }
            Err(e) => {
                warn!("[Layouts] Save to slot {} failed: {}", ev.slot, e);
                completions.send(LayoutOpCompleteEvent {
                    slot: ev.slot,
                    success: false,
                    message: e,
                });
            }
        }
    }
}

/// Re-import a stored layout through the normal import path.
fn handle_load_request(
    mut requests: EventReader<LoadLayoutRequestEvent>,
    mut completions: EventWriter<LayoutOpCompleteEvent>,
    mut imports: EventWriter<ImportGardenEvent>,
) {
    for ev in requests.read() {
        match read_slot(ev.slot) {
            Some(layout) => {
                info!("[Layouts] Loading '{}' from slot {}", layout.name, ev.slot);
                imports.send(ImportGardenEvent { code: layout.code });
                completions.send(LayoutOpCompleteEvent {
                    slot: ev.slot,
                    success: true,
                    message: format!("Loaded '{}'", layout.name),
                });
            }
            None => {
                completions.send(LayoutOpCompleteEvent {
                    slot: ev.slot,
                    success: false,
                    message: format!("Slot {} is empty", ev.slot + 1),
                });
            }
        }
    }
}

fn handle_delete_request(
    mut requests: EventReader<DeleteLayoutRequestEvent>,
    mut completions: EventWriter<LayoutOpCompleteEvent>,
    mut cache: ResMut<LayoutSlotCache>,
) {
    for ev in requests.read() {
        match storage::remove(&layout_slot_key(ev.slot)) {
            Ok(()) => {
                info!("[Layouts] Deleted slot {}", ev.slot);
                refresh_cache(&mut cache);
                completions.send(LayoutOpCompleteEvent {
                    slot: ev.slot,
                    success: true,
                    message: format!("Slot {} cleared", ev.slot + 1),
                });
            }
            Err(e) => {
                warn!("[Layouts] Delete of slot {} failed: {}", ev.slot, e);
                completions.send(LayoutOpCompleteEvent {
                    slot: ev.slot,
                    success: false,
                    message: e,
                });
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════
