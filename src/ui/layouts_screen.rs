//! Layouts screen: four named slots for saved garden codes.
//!
//! Enter loads the selected slot through the normal import path, X clears
//! it, and a digit starts saving the current import there — typing a name
//! first, Enter to commit (an empty name falls back to "Layout N").

use bevy::prelude::*;

use super::{SCREEN_BG, TEXT_BRIGHT, TEXT_DIM, WARNING, WATERED};
use crate::layouts::LayoutSlotCache;
use crate::shared::*;

/// Save-in-progress: which slot, and the name typed so far.
#[derive(Resource, Debug, Clone, Default)]
pub struct LayoutNaming(pub Option<NamingDraft>);

#[derive(Debug, Clone)]
pub struct NamingDraft {
    pub slot: u8,
    pub buffer: String,
}

/// Outcome of the last slot operation, for the status line.
#[derive(Resource, Debug, Clone, Default)]
pub struct LayoutsStatus(pub Option<(bool, String)>);

#[derive(Component)]
pub struct LayoutsScreenRoot;

#[derive(Component)]
pub struct LayoutsListText;

#[derive(Component)]
pub struct LayoutsStatusText;

// ═══════════════════════════════════════════════════════════════════════
// SPAWN / DESPAWN
// ═══════════════════════════════════════════════════════════════════════

pub fn spawn_layouts_screen(mut commands: Commands, mut cursor: ResMut<ListCursor>) {
    cursor.index = 0;
    commands.insert_resource(LayoutNaming::default());
    commands.insert_resource(LayoutsStatus::default());

    commands
        .spawn((
            LayoutsScreenRoot,
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
                LayoutsListText,
                Text::new(""),
                TextFont {
                    font_size: 17.0,
                    ..default()
                },
                TextColor(TEXT_BRIGHT),
            ));

            screen.spawn((
                LayoutsStatusText,
                Text::new(""),
                TextFont {
                    font_size: 15.0,
                    ..default()
                },
                TextColor(TEXT_DIM),
            ));

            screen.spawn((
                Text::new(
                    "[Enter] load   [X] delete   [1-4] save current import   [Esc] back",
                ),
                TextFont {
                    font_size: 13.0,
                    ..default()
                },
                TextColor(TEXT_DIM),
            ));
        });
}

pub fn despawn_layouts_screen(
    mut commands: Commands,
    query: Query<Entity, With<LayoutsScreenRoot>>,
    mut context: ResMut<InputContext>,
) {
    *context = InputContext::List;
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
}

// ═══════════════════════════════════════════════════════════════════════
// NAVIGATION
// ═══════════════════════════════════════════════════════════════════════

pub fn layouts_navigation(
    input: Res<CompanionInput>,
    mut cursor: ResMut<ListCursor>,
    mut naming: ResMut<LayoutNaming>,
    mut context: ResMut<InputContext>,
    mut saves: EventWriter<SaveLayoutRequestEvent>,
    mut loads: EventWriter<LoadLayoutRequestEvent>,
    mut deletes: EventWriter<DeleteLayoutRequestEvent>,
    mut next: ResMut<NextState<AppScreen>>,
) {
    // Naming mode captures all input until Enter or Escape.
    if let Some(draft) = naming.0.as_mut() {
        if !input.text.is_empty() {
            draft.buffer.push_str(&input.text);
        }
        if input.backspace {
            draft.buffer.pop();
        }
        if input.confirm {
            let name = if draft.buffer.trim().is_empty() {
                format!("Layout {}", draft.slot + 1)
            } else {
                draft.buffer.trim().to_string()
            };
            saves.send(SaveLayoutRequestEvent {
                slot: draft.slot,
                name,
            });
            naming.0 = None;
            *context = InputContext::List;
        } else if input.cancel {
            naming.0 = None;
            *context = InputContext::List;
        }
        return;
    }

    let slots = NUM_LAYOUT_SLOTS as usize;
    if input.move_up && cursor.index > 0 {
        cursor.index -= 1;
    }
    if input.move_down && cursor.index + 1 < slots {
        cursor.index += 1;
    }

    if input.confirm {
        loads.send(LoadLayoutRequestEvent {
            slot: cursor.index as u8,
        });
    }
    if input.remove_selected {
        deletes.send(DeleteLayoutRequestEvent {
            slot: cursor.index as u8,
        });
    }
    if let Some(digit) = input.digit {
        if digit <= NUM_LAYOUT_SLOTS {
            naming.0 = Some(NamingDraft {
                slot: digit - 1,
                buffer: String::new(),
            });
            *context = InputContext::TextEntry;
        }
    }
    if input.cancel {
        next.set(AppScreen::Tracker);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// DISPLAY
// ═══════════════════════════════════════════════════════════════════════

pub fn listen_for_layout_ops(
    mut completions: EventReader<LayoutOpCompleteEvent>,
    mut status: ResMut<LayoutsStatus>,
) {
    for ev in completions.read() {
        status.0 = Some((ev.success, ev.message.clone()));
    }
}

pub fn update_layouts_display(
    cache: Res<LayoutSlotCache>,
    cursor: Res<ListCursor>,
    naming: Res<LayoutNaming>,
    status: Res<LayoutsStatus>,
    mut list_query: Query<&mut Text, (With<LayoutsListText>, Without<LayoutsStatusText>)>,
    mut status_query: Query<(&mut Text, &mut TextColor), With<LayoutsStatusText>>,
) {
    for mut text in &mut list_query {
        **text = render_slots(&cache, cursor.index, &naming);
    }
    for (mut text, mut color) in &mut status_query {
        match &status.0 {
            Some((success, message)) => {
                **text = message.clone();
                color.0 = if *success { WATERED } else { WARNING };
            }
            None => {
                **text = String::new();
            }
        }
    }
}

fn render_slots(cache: &LayoutSlotCache, cursor: usize, naming: &LayoutNaming) -> String {
    let mut out = String::from("SAVED LAYOUTS\n");

    for info in &cache.slots {
        let marker = if info.slot as usize == cursor { '>' } else { ' ' };
        if info.exists {
            out.push_str(&format!(
                "{} {}. {:<16} {} plants, {} crops\n",
                marker,
                info.slot + 1,
                info.name,
                info.total_plants,
                info.crop_kinds
            ));
        } else {
            out.push_str(&format!("{} {}. (empty)\n", marker, info.slot + 1));
        }
    }

    if let Some(draft) = &naming.0 {
        out.push_str(&format!(
            "\nSaving to slot {} — name: {}_\n(Enter to save, Esc to cancel)\n",
            draft.slot + 1,
            draft.buffer
        ));
    }

    out
}

// ═══════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════
