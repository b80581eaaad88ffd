use bevy::prelude::*;
use std::time::Duration;

use common::AnimationLabel;
use sandbox_client::character::{ClipCommandQueue, InputState};
use sandbox_client::physics::{
    BodyHandle, BodyKind, Collider, DestroyedBody, PhysicsWorld, PropDesc, Reaction,
};
use sandbox_client::scene::{SceneGraph, VisualDesc};
use sandbox_client::{RuntimeConfig, SandboxRuntime, TickReport};

const DT: f32 = 1.0 / 60.0;

fn runtime() -> SandboxRuntime<ClipCommandQueue> {
    SandboxRuntime::with_defaults(
        ClipCommandQueue::with_clips(AnimationLabel::ALL.iter().copied()),
        Transform::default(),
        &RuntimeConfig::default(),
    )
}

fn destroyed_bodies(report: &TickReport) -> Vec<BodyHandle> {
    report
        .destroyed
        .iter()
        .map(|destroyed| match destroyed {
            DestroyedBody::Ephemeral(ephemeral) => ephemeral.body,
            DestroyedBody::Prop(prop) => prop.body,
        })
        .collect()
}

#[test]
fn bomb_is_destroyed_exactly_once_when_its_ttl_expires() {
    let mut runtime = runtime();
    let idle = InputState::new();

    let report = runtime.tick(DT, &InputState::with_pressed(["j"]));
    assert_eq!(report.planted.len(), 1);
    let bomb = report.planted[0];
    assert_eq!(bomb.ttl, Duration::from_secs(2));
    assert!(runtime.proxy().world().contains(bomb.body));
    assert!(runtime.proxy().scene().contains_visual(bomb.visual));

    let mut destroyed_at = Vec::new();
    for tick in 1..=240 {
        let report = runtime.tick(DT, &idle);
        if destroyed_bodies(&report).contains(&bomb.body) {
            destroyed_at.push(tick);
        }
    }

    assert_eq!(destroyed_at, vec![120]);
    assert!(!runtime.proxy().world().contains(bomb.body));
    assert!(!runtime.proxy().scene().contains_visual(bomb.visual));
    assert!(runtime.proxy().ephemeral(bomb.body).is_none());
    assert_eq!(runtime.tasks().pending(), 0);
}

#[test]
fn bomb_is_thrown_the_way_the_character_walks() {
    let mut runtime = runtime();
    let start = runtime.controller().transform().translation;

    let forward = InputState::with_pressed(["w"]);
    for _ in 0..60 {
        runtime.tick(DT, &forward);
    }
    let walked = runtime.controller().transform().translation - start;
    assert!(walked.z.abs() > 1.0);

    let bomb = runtime.tick(DT, &InputState::with_pressed(["j"])).planted[0];
    let velocity = runtime.proxy().world().velocity(bomb.body).unwrap();

    assert_eq!(velocity.z.signum(), walked.z.signum());
    assert!(velocity.z.abs() > 1.0, "velocity {velocity:?}");
    assert!(velocity.y > 50.0);
}

#[test]
fn bomb_hitting_a_prop_is_removed_early_and_its_ttl_is_cancelled() {
    let mut runtime = runtime();
    let idle = InputState::new();
    let wall = runtime.spawn_prop(PropDesc {
        name: "wall".to_string(),
        visual: VisualDesc::cuboid(Vec3::new(4.0, 6.0, 4.0), Vec3::new(0.0, 3.0, 0.0)),
        kind: BodyKind::Static,
        collider: Collider::Cuboid {
            half_extents: Vec3::new(2.0, 3.0, 2.0),
        },
        reactions: Vec::new(),
    });

    let bomb = runtime.tick(DT, &InputState::with_pressed(["j"])).planted[0];
    assert!(runtime.tasks().pending() >= 2);

    let report = runtime.tick(DT, &idle);
    assert_eq!(destroyed_bodies(&report), vec![bomb.body]);
    assert!(!runtime.tasks().is_scheduled(bomb.ttl_task));
    assert_eq!(runtime.tasks().pending(), 0);

    for _ in 0..180 {
        let report = runtime.tick(DT, &idle);
        assert!(report.destroyed.is_empty());
    }
    assert!(runtime.proxy().prop(wall).is_some());
}

#[test]
fn walking_into_the_test_box_freezes_the_character_and_removes_the_box() {
    let mut runtime = runtime();
    let box_body = runtime.spawn_prop(PropDesc {
        name: "test box".to_string(),
        visual: VisualDesc::cuboid(Vec3::ONE, Vec3::new(0.0, 0.5, -1.0)),
        kind: BodyKind::Static,
        collider: Collider::Cuboid {
            half_extents: Vec3::splat(0.25),
        },
        reactions: vec![
            Reaction::FreezeCharacter,
            Reaction::DeleteAfterDelay(Duration::ZERO),
        ],
    });
    let box_visual = runtime.proxy().prop(box_body).unwrap().visual;

    let forward = InputState::with_pressed(["w"]);
    let mut froze_at = None;
    for tick in 0..60 {
        if runtime.tick(DT, &forward).froze {
            froze_at = Some(tick);
            break;
        }
    }
    assert!(froze_at.is_some());
    assert!(runtime.controller().is_frozen());

    let frozen_transform = *runtime.controller().transform();
    let frozen_label = runtime.controller().current_label();
    let frozen_vertical = runtime.controller().vertical_state();

    let report = runtime.tick(DT, &forward);
    assert_eq!(destroyed_bodies(&report), vec![box_body]);
    assert!(!runtime.proxy().world().contains(box_body));
    assert!(!runtime.proxy().scene().contains_visual(box_visual));

    for _ in 0..30 {
        let report = runtime.tick(DT, &InputState::with_pressed(["w", "space", "j"]));
        assert!(report.planted.is_empty());
        assert!(!report.froze);
    }
    assert_eq!(*runtime.controller().transform(), frozen_transform);
    assert_eq!(runtime.controller().current_label(), frozen_label);
    assert_eq!(runtime.controller().vertical_state(), frozen_vertical);
}

#[test]
fn deferred_tasks_still_run_while_frozen() {
    let mut runtime = runtime();
    let bomb = runtime.tick(DT, &InputState::with_pressed(["j"])).planted[0];
    assert!(runtime.controller_mut().freeze());

    let idle = InputState::new();
    let mut destroyed = 0;
    for _ in 0..180 {
        destroyed += destroyed_bodies(&runtime.tick(DT, &idle))
            .iter()
            .filter(|body| **body == bomb.body)
            .count();
    }
    assert_eq!(destroyed, 1);
}

#[test]
fn jump_clip_stops_one_second_after_landing() {
    let mut runtime = runtime();
    let idle = InputState::new();

    runtime.tick(DT, &InputState::with_pressed(["space"]));
    assert!(!runtime.controller().vertical_state().grounded);
    assert!(runtime.controller().animation().jump_overlay_active());

    let mut landed_at = None;
    let mut stopped_at = None;
    for tick in 1..=240 {
        let report = runtime.tick(DT, &idle);
        if landed_at.is_none() && runtime.controller().vertical_state().grounded {
            landed_at = Some(tick);
        }
        if report.jump_clip_stopped {
            stopped_at = Some(tick);
            break;
        }
    }

    let (Some(landed_at), Some(stopped_at)) = (landed_at, stopped_at) else {
        panic!("jump never completed: landed {landed_at:?}, stopped {stopped_at:?}");
    };
    assert_eq!(stopped_at - landed_at, 60);
    assert!(!runtime.controller().animation().jump_overlay_active());
    assert_eq!(runtime.controller().transform().translation.y, 0.0);
}

#[test]
fn run_toggle_switches_locomotion_speed() {
    let mut runtime = runtime();
    let forward = InputState::with_pressed(["w"]);

    runtime.tick(DT, &forward);
    assert_eq!(runtime.controller().current_label(), AnimationLabel::Run);

    runtime.switch_run_toggle();
    runtime.tick(DT, &forward);
    assert_eq!(runtime.controller().current_label(), AnimationLabel::Walk);
}

#[test]
fn camera_orbit_keeps_the_follow_target() {
    let mut runtime = runtime();
    let target = runtime.camera().look_target;

    runtime.orbit_camera(0.5, 0.1, 2.0);

    assert_eq!(runtime.camera().look_target, target);
    let distance = runtime.camera().position.distance(target);
    let config = runtime.camera_config();
    assert!(distance >= config.min_distance - 1e-4);
    assert!(distance <= config.max_distance + 1e-4);
}
