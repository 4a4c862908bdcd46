//! Always-visible clock panel: dial, digital readout, period label, and the
//! Day/Cycle calendar line.

use bevy::prelude::*;

use super::{ACCENT, PANEL_BG, TEXT_BRIGHT, TEXT_DIM};
use crate::shared::*;

// ═══════════════════════════════════════════════════════════════════════
// MARKER COMPONENTS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Component)]
pub struct ClockPanelRoot;

#[derive(Component)]
pub struct ClockTimeText;

#[derive(Component)]
pub struct ClockPeriodText;

#[derive(Component)]
pub struct ClockDayCycleText;

/// The rotating hand inside the dial node.
#[derive(Component)]
pub struct ClockDialHand;

const DIAL_SIZE: f32 = 56.0;

// ═══════════════════════════════════════════════════════════════════════
// SPAWN
// ═══════════════════════════════════════════════════════════════════════

pub fn spawn_clock_panel(mut commands: Commands) {
    commands
        .spawn((
            ClockPanelRoot,
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(0.0),
                left: Val::Px(0.0),
                width: Val::Percent(100.0),
                height: Val::Px(72.0),
                flex_direction: FlexDirection::Row,
                align_items: AlignItems::Center,
                column_gap: Val::Px(18.0),
                padding: UiRect::horizontal(Val::Px(16.0)),
                ..default()
            },
            BackgroundColor(PANEL_BG),
        ))
        .with_children(|panel| {
            // Dial: a circle-ish node with a rotating hand child.
            panel
                .spawn((
                    Node {
                        width: Val::Px(DIAL_SIZE),
                        height: Val::Px(DIAL_SIZE),
                        justify_content: JustifyContent::Center,
                        align_items: AlignItems::FlexStart,
                        ..default()
                    },
                    BackgroundColor(Color::srgb(0.16, 0.19, 0.24)),
                    BorderRadius::all(Val::Px(DIAL_SIZE / 2.0)),
                ))
                .with_children(|dial| {
                    dial.spawn((
                        ClockDialHand,
                        Node {
                            width: Val::Px(3.0),
                            height: Val::Px(DIAL_SIZE / 2.0),
                            ..default()
                        },
                        BackgroundColor(ACCENT),
                    ));
                });

            panel.spawn((
                ClockTimeText,
                Text::new("--:--"),
                TextFont {
                    font_size: 34.0,
                    ..default()
                },
                TextColor(TEXT_BRIGHT),
            ));

            panel.spawn((
                ClockPeriodText,
                Text::new(""),
                TextFont {
                    font_size: 20.0,
                    ..default()
                },
                TextColor(ACCENT),
            ));

            panel.spawn((
                ClockDayCycleText,
                Text::new(""),
                TextFont {
                    font_size: 20.0,
                    ..default()
                },
                TextColor(TEXT_DIM),
            ));

            panel.spawn((
                Text::new("[T]racker  [I]mport  [L]ayouts"),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(TEXT_DIM),
            ));
        });
}

// ═══════════════════════════════════════════════════════════════════════
// UPDATE
// ═══════════════════════════════════════════════════════════════════════

pub fn update_clock_display(
    clock: Res<GameClock>,
    mut time_query: Query<&mut Text, (With<ClockTimeText>, Without<ClockPeriodText>, Without<ClockDayCycleText>)>,
    mut period_query: Query<&mut Text, (With<ClockPeriodText>, Without<ClockDayCycleText>)>,
    mut day_query: Query<&mut Text, With<ClockDayCycleText>>,
) {
    if !clock.is_changed() {
        return;
    }
    for mut text in &mut time_query {
        **text = clock.clock_label();
    }
    for mut text in &mut period_query {
        **text = clock.period.label().to_string();
    }
    for mut text in &mut day_query {
        **text = clock.day_cycle_label();
    }
}

/// Rotate the dial hand. The clock's rotation convention is clockwise
/// degrees from screen-up; Bevy's z rotation is counter-clockwise, hence
/// the sign flip.
pub fn update_dial_hand(
    clock: Res<GameClock>,
    mut hand_query: Query<&mut Transform, With<ClockDialHand>>,
) {
    if !clock.is_changed() {
        return;
    }
    let radians = clock.dial_rotation_degrees().to_radians();
    for mut transform in &mut hand_query {
        transform.rotation = Quat::from_rotation_z(-radians);
    }
}
