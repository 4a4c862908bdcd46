//! Tracker screen: the watering list, the rolling cycle history, and the
//! weekly checklist, rendered as one rebuilt text block.
//!
//! The cursor spans the crop list first and the checklist after it, so
//! Space toggles whichever row is selected.

use bevy::prelude::*;

use super::{SCREEN_BG, TEXT_BRIGHT, TEXT_DIM};
use crate::data;
use crate::shared::*;

#[derive(Component)]
pub struct TrackerScreenRoot;

#[derive(Component)]
pub struct TrackerListText;

#[derive(Component)]
pub struct TrackerHelpText;

// ═══════════════════════════════════════════════════════════════════════
// SPAWN / DESPAWN
// ═══════════════════════════════════════════════════════════════════════

pub fn spawn_tracker_screen(
    mut commands: Commands,
    mut cursor: ResMut<ListCursor>,
    state: Res<TrackerState>,
    checklist: Res<WeeklyChecklist>,
) {
    cursor.clamp_to(state.crops.len() + checklist.items.len());

    commands
        .spawn((
            TrackerScreenRoot,
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(72.0),
                left: Val::Px(0.0),
                width: Val::Percent(100.0),
                bottom: Val::Px(0.0),
                flex_direction: FlexDirection::Column,
                padding: UiRect::all(Val::Px(16.0)),
                row_gap: Val::Px(10.0),
                ..default()
            },
            BackgroundColor(SCREEN_BG),
        ))
        .with_children(|screen| {
            screen.spawn((
                TrackerListText,
                Text::new(""),
                TextFont {
                    font_size: 17.0,
                    ..default()
                },
                TextColor(TEXT_BRIGHT),
            ));

            screen.spawn((
                TrackerHelpText,
                Text::new(quick_add_legend()),
                TextFont {
                    font_size: 13.0,
                    ..default()
                },
                TextColor(TEXT_DIM),
            ));
        });
}

pub fn despawn_tracker_screen(
    mut commands: Commands,
    query: Query<Entity, With<TrackerScreenRoot>>,
) {
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
}

fn quick_add_legend() -> String {
    let crops = data::trackable_crops();
    let mut legend = String::from(
        "[Space] toggle   [A]ll   [N]one   [X] remove   [C]lear\nQuick add:",
    );
    for (i, name) in crops.iter().take(9).enumerate() {
        legend.push_str(&format!("  {}:{}", i + 1, name));
    }
    legend
}

// ═══════════════════════════════════════════════════════════════════════
// NAVIGATION
// ═══════════════════════════════════════════════════════════════════════

pub fn tracker_navigation(
    input: Res<CompanionInput>,
    state: Res<TrackerState>,
    checklist: Res<WeeklyChecklist>,
    mut cursor: ResMut<ListCursor>,
    mut actions: EventWriter<TrackerActionEvent>,
    mut toggles: EventWriter<ChecklistToggleEvent>,
) {
    let crop_rows = state.crops.len();
    let total_rows = crop_rows + checklist.items.len();
    cursor.clamp_to(total_rows);

    if input.move_up && cursor.index > 0 {
        cursor.index -= 1;
    }
    if input.move_down && cursor.index + 1 < total_rows {
        cursor.index += 1;
    }

    if input.toggle_watered {
        if cursor.index < crop_rows {
            let name = state.crops[cursor.index].crop_type.clone();
            actions.send(TrackerActionEvent(TrackerAction::ToggleWatered(name)));
        } else if cursor.index < total_rows {
            toggles.send(ChecklistToggleEvent {
                index: cursor.index - crop_rows,
            });
        }
    }

    if input.remove_selected && cursor.index < crop_rows {
        let name = state.crops[cursor.index].crop_type.clone();
        actions.send(TrackerActionEvent(TrackerAction::RemoveCrop(name)));
    }

    if input.water_all {
        actions.send(TrackerActionEvent(TrackerAction::WaterAll));
    }
    if input.water_none {
        actions.send(TrackerActionEvent(TrackerAction::WaterNone));
    }
    if input.clear_all {
        actions.send(TrackerActionEvent(TrackerAction::ClearAll));
    }

    if let Some(digit) = input.digit {
        let crops = data::trackable_crops();
        if let Some(name) = crops.get(digit as usize - 1) {
            actions.send(TrackerActionEvent(TrackerAction::AddCrop(
                name.to_string(),
            )));
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// DISPLAY
// ═══════════════════════════════════════════════════════════════════════

/// Rebuilds the whole list every frame; the block is a few hundred bytes.
pub fn update_tracker_display(
    state: Res<TrackerState>,
    checklist: Res<WeeklyChecklist>,
    cursor: Res<ListCursor>,
    mut query: Query<&mut Text, With<TrackerListText>>,
) {
    let Ok(mut text) = query.get_single_mut() else {
        return;
    };
    **text = render_tracker(&state, &checklist, cursor.index);
}

fn render_tracker(state: &TrackerState, checklist: &WeeklyChecklist, cursor: usize) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "WATERING  ({}/{} watered)\n",
        state.watered_count(),
        state.crops.len()
    ));

    if state.crops.is_empty() {
        out.push_str("  (nothing tracked — quick add below, or [I]mport a garden)\n");
    }
    for (i, crop) in state.crops.iter().enumerate() {
        let marker = if i == cursor { '>' } else { ' ' };
        let check = if crop.is_watered { 'x' } else { ' ' };
        let source = match crop.source {
            CropSource::Import => "  (import)",
            CropSource::Manual => "",
        };
        out.push_str(&format!(
            "{} [{}] {:<12} x{}{}\n",
            marker, check, crop.crop_type, crop.total_count, source
        ));
    }

    out.push_str("\nHistory: ");
    if state.history.is_empty() {
        out.push_str("(no finished cycles yet)");
    } else {
        for record in &state.history {
            out.push(if record.complete() { '#' } else { '-' });
        }
    }
    out.push('\n');

    out.push_str("\nWEEKLY\n");
    for (i, item) in checklist.items.iter().enumerate() {
        let row = state.crops.len() + i;
        let marker = if row == cursor { '>' } else { ' ' };
        let check = if item.done { 'x' } else { ' ' };
        out.push_str(&format!("{} [{}] {}\n", marker, check, item.label));
    }

    out
}

// ═══════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════
