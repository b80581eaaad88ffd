use crate::physics::DestroyedBody;
use crate::scene_runtime::state::{CapturedInput, SandboxState, SandboxTickReported};
use crate::settings::SettingsResource;
use bevy::prelude::*;

/// Advances the simulation core by the frame delta.
pub fn tick_sandbox_runtime(
    time: Res<Time>,
    input: Res<CapturedInput>,
    mut state: ResMut<SandboxState>,
    mut reports: MessageWriter<SandboxTickReported>,
) {
    let report = state.runtime.tick(time.delta_secs(), &input.0);
    if !report.is_empty() {
        reports.write(SandboxTickReported(report));
    }
}

pub fn log_tick_reports(mut reports: MessageReader<SandboxTickReported>) {
    for SandboxTickReported(report) in reports.read() {
        for destroyed in &report.destroyed {
            match destroyed {
                DestroyedBody::Ephemeral(ephemeral) => {
                    debug!(
                        "Removed {:?} {:?} spawned at {:?}",
                        ephemeral.kind, ephemeral.body, ephemeral.spawn_time
                    );
                }
                DestroyedBody::Prop(prop) => {
                    debug!("Prop '{}' left the scene", prop.name);
                }
            }
        }
        if report.jump_clip_stopped {
            debug!("Jump clip stopped after landing");
        }
        if report.debug_overlay_toggled {
            info!("Debug overlay toggled");
        }
    }
}

pub fn character_position_logging_enabled(settings: Res<SettingsResource>) -> bool {
    settings.current.debug.log_character_position
}

pub fn log_character_position(state: Res<SandboxState>) {
    let translation = state.runtime.controller().transform().translation;
    debug!(
        "Character position: x={:.3} y={:.3} z={:.3}",
        translation.x, translation.y, translation.z
    );
}
