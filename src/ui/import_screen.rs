//! Import screen: a text field for a garden save code or planner share URL.
//!
//! Entering the screen switches the input layer to text entry; leaving it
//! switches back, so the action keys never fire while typing.

use bevy::prelude::*;

use super::{SCREEN_BG, TEXT_BRIGHT, TEXT_DIM, WARNING, WATERED};
use crate::shared::*;

/// The in-progress paste plus the outcome of the last submission.
#[derive(Resource, Debug, Clone, Default)]
pub struct ImportDraft {
    pub buffer: String,
    /// `(success, message)` from the last decode attempt.
    pub status: Option<(bool, String)>,
}

#[derive(Component)]
pub struct ImportScreenRoot;

#[derive(Component)]
pub struct ImportFieldText;

#[derive(Component)]
pub struct ImportStatusText;

// ═══════════════════════════════════════════════════════════════════════
// SPAWN / DESPAWN
// ═══════════════════════════════════════════════════════════════════════

pub fn spawn_import_screen(mut commands: Commands, mut context: ResMut<InputContext>) {
    // Fresh draft every visit.
    commands.insert_resource(ImportDraft::default());
    *context = InputContext::TextEntry;

    commands
        .spawn((
            ImportScreenRoot,
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
                Text::new("IMPORT GARDEN\nPaste a save code or planner URL, then press Enter."),
                TextFont {
                    font_size: 17.0,
                    ..default()
                },
                TextColor(TEXT_BRIGHT),
            ));

            screen.spawn((
                ImportFieldText,
                Text::new("> _"),
                TextFont {
                    font_size: 15.0,
                    ..default()
                },
                TextColor(TEXT_BRIGHT),
            ));

            screen.spawn((
                ImportStatusText,
                Text::new(""),
                TextFont {
                    font_size: 15.0,
                    ..default()
                },
                TextColor(TEXT_DIM),
            ));

            screen.spawn((
                Text::new("[Enter] import   [Backspace] delete   [Esc] back to tracker"),
                TextFont {
                    font_size: 13.0,
                    ..default()
                },
                TextColor(TEXT_DIM),
            ));
        });
}

pub fn despawn_import_screen(
    mut commands: Commands,
    query: Query<Entity, With<ImportScreenRoot>>,
    mut context: ResMut<InputContext>,
) {
    *context = InputContext::List;
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SYSTEMS
// ═══════════════════════════════════════════════════════════════════════

pub fn import_text_entry(
    input: Res<CompanionInput>,
    mut draft: ResMut<ImportDraft>,
    mut requests: EventWriter<ImportGardenEvent>,
    mut next: ResMut<NextState<AppScreen>>,
) {
    if !input.text.is_empty() {
        draft.buffer.push_str(&input.text);
    }
    if input.backspace {
        draft.buffer.pop();
    }

    if input.confirm {
        let code = draft.buffer.trim().to_string();
        if code.is_empty() {
            draft.status = Some((false, "Nothing to import".to_string()));
        } else {
            requests.send(ImportGardenEvent { code });
            draft.status = Some((true, "Decoding...".to_string()));
        }
    }

    if input.cancel {
        next.set(AppScreen::Tracker);
    }
}

pub fn listen_for_import_complete(
    mut completions: EventReader<ImportCompleteEvent>,
    mut draft: ResMut<ImportDraft>,
) {
    for ev in completions.read() {
        if ev.success {
            draft.buffer.clear();
        }
        draft.status = Some((ev.success, ev.message.clone()));
    }
}

pub fn update_import_display(
    draft: Res<ImportDraft>,
    mut field_query: Query<&mut Text, (With<ImportFieldText>, Without<ImportStatusText>)>,
    mut status_query: Query<(&mut Text, &mut TextColor), With<ImportStatusText>>,
) {
    for mut text in &mut field_query {
        **text = format!("> {}_", draft.buffer);
    }
    for (mut text, mut color) in &mut status_query {
        match &draft.status {
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
