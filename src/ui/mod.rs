//! UI layer: the always-visible clock panel plus one screen per
//! `AppScreen` state. Screens spawn on state enter, despawn on exit, and
//! read `CompanionInput` actions, never raw keys.

mod clock_panel;
mod import_screen;
mod layouts_screen;
mod tracker_screen;

use bevy::prelude::*;

use crate::shared::*;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        // ─── CLOCK PANEL — always present ───
        app.add_systems(Startup, clock_panel::spawn_clock_panel);
        app.add_systems(
            Update,
            (clock_panel::update_clock_display, clock_panel::update_dial_hand),
        );

        // ─── SCREEN SWITCHING ───
        app.add_systems(Update, screen_navigation);

        // ─── TRACKER SCREEN ───
        app.add_systems(OnEnter(AppScreen::Tracker), tracker_screen::spawn_tracker_screen);
        app.add_systems(OnExit(AppScreen::Tracker), tracker_screen::despawn_tracker_screen);
        app.add_systems(
            Update,
            (
                tracker_screen::tracker_navigation,
                tracker_screen::update_tracker_display,
            )
                .run_if(in_state(AppScreen::Tracker)),
        );

        // ─── IMPORT SCREEN ───
        app.add_systems(OnEnter(AppScreen::Import), import_screen::spawn_import_screen);
        app.add_systems(OnExit(AppScreen::Import), import_screen::despawn_import_screen);
        app.add_systems(
            Update,
            (
                import_screen::import_text_entry,
                import_screen::listen_for_import_complete,
                import_screen::update_import_display,
            )
                .run_if(in_state(AppScreen::Import)),
        );

        // ─── LAYOUTS SCREEN ───
        app.add_systems(OnEnter(AppScreen::Layouts), layouts_screen::spawn_layouts_screen);
        app.add_systems(OnExit(AppScreen::Layouts), layouts_screen::despawn_layouts_screen);
        app.add_systems(
            Update,
            (
                layouts_screen::layouts_navigation,
                layouts_screen::listen_for_layout_ops,
                layouts_screen::update_layouts_display,
            )
                .run_if(in_state(AppScreen::Layouts)),
        );
    }
}

/// T / I / L switch screens whenever list input is active.
fn screen_navigation(
    input: Res<CompanionInput>,
    state: Res<State<AppScreen>>,
    mut next: ResMut<NextState<AppScreen>>,
) {
    if input.goto_tracker && *state.get() != AppScreen::Tracker {
        next.set(AppScreen::Tracker);
    }
    if input.goto_import && *state.get() != AppScreen::Import {
        next.set(AppScreen::Import);
    }
    if input.goto_layouts && *state.get() != AppScreen::Layouts {
        next.set(AppScreen::Layouts);
    }
}

// Shared palette for the screens.
pub(crate) const PANEL_BG: Color = Color::srgb(0.10, 0.12, 0.16);
pub(crate) const SCREEN_BG: Color = Color::srgb(0.07, 0.08, 0.11);
pub(crate) const TEXT_DIM: Color = Color::srgb(0.55, 0.60, 0.65);
pub(crate) const TEXT_BRIGHT: Color = Color::srgb(0.92, 0.94, 0.90);
pub(crate) const ACCENT: Color = Color::srgb(0.45, 0.80, 0.95);
pub(crate) const WATERED: Color = Color::srgb(0.40, 0.85, 0.55);
pub(crate) const WARNING: Color = Color::srgb(0.95, 0.60, 0.35);
