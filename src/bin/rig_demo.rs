//! Rig Demo - headless camera walkthrough
//!
//! Run with: `cargo run --bin rig-demo`
//! More detail: `RUST_LOG=tailcam_engine=debug cargo run --bin rig-demo`
//!
//! A target walks down -Z past a pillar that blocks the over-the-shoulder
//! view, then locks onto two enemies ahead, cycles between them and lets go.
//! Camera snapshots are logged once per simulated second and whenever the
//! occlusion or lock state changes.

use std::rc::Rc;

use glam::Vec3;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

use tailcam_engine::camera::{CameraRig, TrackedTransform, Transform};
use tailcam_engine::error::RigError;
use tailcam_engine::input::{InputState, KeyCode, RigController};
use tailcam_engine::query::{BoxScene, LayerMask};
use tailcam_engine::settings::CameraSettings;
use tailcam_engine::targeting::{LockOnTarget, RangeSensor, TargetHandle};

const DT: f32 = 1.0 / 60.0;
const FRAMES: u32 = 720;
const WALK_SPEED: f32 = 3.0;

/// Layer the enemy colliders live on; the camera ignores it for collision.
const ENEMY_LAYER: LayerMask = LayerMask::layer(1);

/// Scripted key presses: (frame, key, pressed)
const SCRIPT: &[(u32, KeyCode, bool)] = &[
    (420, KeyCode::T, true),
    (421, KeyCode::T, false),
    (480, KeyCode::Q, true),
    (481, KeyCode::Q, false),
    (540, KeyCode::Space, true),
    (541, KeyCode::Space, false),
    (600, KeyCode::T, true),
    (601, KeyCode::T, false),
    (660, KeyCode::R, true),
    (661, KeyCode::R, false),
];

fn main() -> Result<(), RigError> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let scene = Rc::new(BoxScene::new());
    let pillar = scene.insert_box(Vec3::new(0.4, 0.0, -15.5), Vec3::new(1.6, 6.0, -14.5));
    info!(?pillar, "Pillar placed beside the path");

    let enemies: Vec<TargetHandle> = [Vec3::new(3.0, 0.0, -30.0), Vec3::new(-3.0, 0.0, -33.0)]
        .into_iter()
        .map(|position| {
            let collider = scene.insert_box_on(
                position - Vec3::new(0.4, 0.0, 0.4),
                position + Vec3::new(0.4, 1.8, 0.4),
                ENEMY_LAYER,
            );
            LockOnTarget::new(position)
                .with_look_height(1.2)
                .with_collider(collider)
                .into_handle()
        })
        .collect();

    let mut sensor = RangeSensor::new(0.0, ENEMY_LAYER);
    for enemy in &enemies {
        sensor.register(enemy);
    }

    let settings = CameraSettings {
        lateral_offset: 1.0,
        collision_layers: LayerMask::ALL.without(ENEMY_LAYER),
        ..CameraSettings::default()
    };

    let player = Rc::new(TrackedTransform::new(Transform::with_heading(Vec3::ZERO, 0.0)));
    let mut rig = CameraRig::builder(settings)
        .target(player.clone())
        .geometry_query(scene.clone())
        .range_sensor(sensor)
        .build()?;

    let mut controller = RigController::default();
    let mut input = InputState::new();
    let mut was_occluded = false;
    let mut was_locked = false;

    for frame in 0..FRAMES {
        let walked = WALK_SPEED * DT * frame as f32;
        player.set_position(Vec3::new(0.0, 0.0, -walked.min(24.0)));

        for &(_, key, pressed) in SCRIPT.iter().filter(|(at, _, _)| *at == frame) {
            input.handle_key(key, pressed);
        }
        // A slow look to the right while walking in
        if frame < 120 {
            input.handle_mouse_motion(0.2, 0.0);
        }

        controller.apply(&mut rig, input.frame(), DT);
        input.end_frame();

        rig.tick(DT);
        rig.late_tick(DT);

        let occluded = rig.is_occluded();
        let locked = rig.is_locked_on();
        if frame % 60 == 0 || occluded != was_occluded || locked != was_locked {
            let snapshot = rig.snapshot();
            info!(frame, snapshot = %serde_json::to_string(&snapshot)?, "Camera");
        }
        was_occluded = occluded;
        was_locked = locked;
    }

    let final_pose = rig.pose();
    info!(
        position = ?final_pose.position,
        forward = ?final_pose.forward(),
        "Demo finished"
    );
    Ok(())
}

