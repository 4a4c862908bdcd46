mod shared;
mod input;
mod clock;
mod data;
mod garden;
mod tracker;
mod checklist;
mod layouts;
mod storage;
mod ui;

use bevy::prelude::*;
use bevy::window::{PresentMode, WindowResolution};

use shared::*;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Dewtrack".into(),
                resolution: WindowResolution::new(SCREEN_WIDTH, SCREEN_HEIGHT),
                present_mode: PresentMode::AutoVsync,
                resizable: true,
                ..default()
            }),
            ..default()
        }))
        // App state
        .init_state::<AppScreen>()
        // Shared resources
        .init_resource::<GameClock>()
        .init_resource::<TrackerState>()
        .init_resource::<WeeklyChecklist>()
        .init_resource::<CurrentImport>()
        .init_resource::<InputContext>()
        .init_resource::<CompanionInput>()
        .init_resource::<ListCursor>()
        // Events
        .add_event::<CycleRolloverEvent>()
        .add_event::<DayRolloverEvent>()
        .add_event::<WeekRolloverEvent>()
        .add_event::<ChecklistToggleEvent>()
        .add_event::<TrackerActionEvent>()
        .add_event::<ImportGardenEvent>()
        .add_event::<ImportCompleteEvent>()
        .add_event::<SaveLayoutRequestEvent>()
        .add_event::<LoadLayoutRequestEvent>()
        .add_event::<DeleteLayoutRequestEvent>()
        .add_event::<LayoutOpCompleteEvent>()
        // Domain plugins
        .add_plugins(input::InputPlugin)
        .add_plugins(clock::ClockPlugin)
        .add_plugins(tracker::TrackerPlugin)
        .add_plugins(checklist::ChecklistPlugin)
        .add_plugins(layouts::LayoutsPlugin)
        .add_plugins(ui::UiPlugin)
        // Camera
        .add_systems(Startup, setup_camera)
        .run();
}

fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}
