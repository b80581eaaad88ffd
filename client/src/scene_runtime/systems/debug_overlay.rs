use crate::scene_runtime::state::SandboxState;
use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

pub fn debug_overlay_visible(state: Res<SandboxState>) -> bool {
    state.runtime.debug_overlay()
}

/// Stats panel toggled with the debug-overlay key.
pub fn draw_debug_overlay(
    mut contexts: EguiContexts,
    diagnostics: Res<DiagnosticsStore>,
    state: Res<SandboxState>,
) {
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    let fps = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|diagnostic| diagnostic.smoothed().or_else(|| diagnostic.value()));
    let fps_text = fps
        .map(|value| format!("{value:.1}"))
        .unwrap_or_else(|| "n/a".to_string());

    let runtime = &state.runtime;
    let controller = runtime.controller();
    let translation = controller.transform().translation;
    let vertical = controller.vertical_state();
    let proxy = runtime.proxy();

    egui::Window::new("Sandbox")
        .anchor(egui::Align2::LEFT_TOP, egui::vec2(12.0, 12.0))
        .resizable(false)
        .collapsible(false)
        .show(ctx, |ui| {
            ui.label(format!("FPS: {fps_text}"));
            ui.separator();
            ui.label(format!(
                "Position: {:.2} {:.2} {:.2}",
                translation.x, translation.y, translation.z
            ));
            ui.label(format!("Animation: {}", controller.current_label().name()));
            ui.label(format!(
                "Mode: {}",
                if controller.toggle_run() { "run" } else { "walk" }
            ));
            ui.label(format!(
                "Vertical: {:.2} m/s{}",
                vertical.vertical_velocity,
                if vertical.grounded { " (grounded)" } else { "" }
            ));
            if controller.is_frozen() {
                ui.colored_label(egui::Color32::from_rgb(230, 80, 80), "Frozen");
            }
            ui.separator();
            ui.label(format!("Bombs: {}", proxy.ephemerals().count()));
            ui.label(format!("Props: {}", proxy.props().count()));
            ui.label(format!("Pending tasks: {}", runtime.tasks().pending()));
        });
}
