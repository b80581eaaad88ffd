use bevy::app::PluginGroupBuilder;
use bevy::asset::AssetPlugin;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::prelude::*;
use bevy::render::pipelined_rendering::PipelinedRenderingPlugin;
use bevy_egui::EguiPlugin;
use sandbox_client::SandboxPlugin;
use sandbox_client::settings::{self, SandboxSettings, SettingsResource};

fn main() {
    let startup_settings = settings::load_settings_or_default();
    if let Err(error) = settings::ensure_settings_file_exists(&startup_settings) {
        eprintln!(
            "Failed to ensure startup settings file '{}': {}",
            settings::SETTINGS_FILE_PATH,
            error
        );
    }

    App::new()
        .insert_resource(SettingsResource::new(startup_settings.clone()))
        .add_plugins(build_bevy_plugins(&startup_settings))
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        .add_plugins(EguiPlugin::default())
        .add_plugins(SandboxPlugin::new(startup_settings))
        .run();
}

fn build_bevy_plugins(startup_settings: &SandboxSettings) -> PluginGroupBuilder {
    DefaultPlugins
        .set(WindowPlugin {
            primary_window: Some(create_window_settings(startup_settings)),
            ..Default::default()
        })
        .set(AssetPlugin {
            file_path: concat!(env!("CARGO_MANIFEST_DIR"), "/../assets").into(),
            ..Default::default()
        })
        .disable::<PipelinedRenderingPlugin>()
}

fn create_window_settings(startup_settings: &SandboxSettings) -> Window {
    let window = &startup_settings.window;
    Window {
        title: window.title.clone(),
        resolution: window.resolution(),
        resizable: true,
        present_mode: window.present_mode(),
        ..Default::default()
    }
}
