//! Camera Rig
//!
//! The orchestrator. Owns the settings, the optional occlusion resolver and
//! lock manager, and the state machine; exposes the two per-frame phases and
//! the public control surface.
//!
//! # Frame order
//!
//! ```text
//! tick(dt)       range events → state update → requested transition
//! late_tick(dt)  occlusion → desired distance → state late update → pose
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use tailcam_engine::camera::{CameraRig, TrackedTransform, Transform};
//! use tailcam_engine::query::BoxScene;
//! use tailcam_engine::settings::CameraSettings;
//!
//! let player = Rc::new(TrackedTransform::new(Transform::default()));
//! let mut rig = CameraRig::builder(CameraSettings::default())
//!     .target(player.clone())
//!     .geometry_query(Rc::new(BoxScene::new()))
//!     .build()?;
//!
//! rig.tick(1.0 / 60.0);
//! rig.late_tick(1.0 / 60.0);
//! let pose = rig.pose();
//! ```

use std::rc::Rc;

use glam::{Vec2, Vec3};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::occlusion::{OcclusionProbe, OcclusionResolver, OcclusionState};
use super::pose::{CameraPose, FocalPoint, FollowTarget, Kinematics, OrbitRotation, Transform};
use super::state_machine::CameraStateMachine;
use super::states::{CameraState, StateContext, StateKind, Transition, place_camera};
use crate::error::RigError;
use crate::math::wrap_yaw;
use crate::query::GeometryQuery;
use crate::settings::{CameraSettings, SettingsOverride, StoredDefaults};
use crate::targeting::{RangeNotifier, RangeSensor, Reticle, TargetLockManager};

/// Builder for [`CameraRig`]. Target and geometry query are required.
pub struct CameraRigBuilder {
    settings: CameraSettings,
    target: Option<Rc<dyn FollowTarget>>,
    query: Option<Rc<dyn GeometryQuery>>,
    notifier: Option<Rc<RangeNotifier>>,
    sensor: Option<RangeSensor>,
    initial_state: StateKind,
}

impl CameraRigBuilder {
    pub fn new(settings: CameraSettings) -> Self {
        Self {
            settings,
            target: None,
            query: None,
            notifier: None,
            sensor: None,
            initial_state: StateKind::Follow,
        }
    }

    /// Object the camera follows.
    pub fn target(mut self, target: Rc<dyn FollowTarget>) -> Self {
        self.target = Some(target);
        self
    }

    /// Line-of-sight and overlap service.
    pub fn geometry_query(mut self, query: Rc<dyn GeometryQuery>) -> Self {
        self.query = Some(query);
        self
    }

    /// Channel the lock manager listens to for range enter/exit events.
    pub fn range_notifier(mut self, notifier: Rc<RangeNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Overlap sensor run around the focal point every tick. Its radius is
    /// taken from `lock_on_radius`.
    pub fn range_sensor(mut self, sensor: RangeSensor) -> Self {
        self.sensor = Some(sensor);
        self
    }

    /// State entered at construction (Follow by default).
    pub fn initial_state(mut self, kind: StateKind) -> Self {
        self.initial_state = kind;
        self
    }

    pub fn build(self) -> Result<CameraRig, RigError> {
        let mut settings = self.settings;
        settings.validate()?;
        settings.prepare_runtime();
        let defaults = settings.store_defaults();

        let target = self.target.ok_or(RigError::MissingTarget)?;
        let query = self.query.ok_or(RigError::MissingGeometryQuery)?;
        let transform = target.transform().ok_or(RigError::MissingTarget)?;

        let mut sensor = self.sensor;
        if let Some(sensor) = sensor.as_mut() {
            sensor.set_radius(settings.lock_on_radius);
        }
        let notifier = match (self.notifier, sensor.is_some()) {
            (Some(notifier), _) => Some(notifier),
            (None, true) => Some(Rc::new(RangeNotifier::new())),
            (None, false) => None,
        };

        let rotation = OrbitRotation::new(
            wrap_yaw(transform.heading() + settings.default_yaw_offset),
            settings.clamp_pitch(settings.default_pitch),
        );
        let kinematics = Kinematics {
            focal_point: FocalPoint::new(transform.position),
            rotation,
            pose: CameraPose::default(),
        };

        let occlusion = settings
            .enable_collision
            .then(|| OcclusionResolver::new(settings.offset_distance));

        let mut rig = CameraRig {
            settings,
            defaults,
            target,
            query,
            kinematics,
            state_machine: CameraStateMachine::new(),
            occlusion,
            lock_manager: None,
            notifier,
            sensor,
            resume_state: StateKind::Follow,
            target_lost: false,
        };
        if rig.settings.enable_targeting {
            rig.lock_manager = Some(rig.new_lock_manager());
        }

        rig.place_now(transform);
        let initial = if self.initial_state == StateKind::LockOn {
            // Nothing can be locked before the first range events arrive
            StateKind::Follow
        } else {
            self.initial_state
        };
        rig.switch_state(initial, transform);

        info!(
            state = %initial,
            distance = rig.settings.offset_distance,
            collision = rig.occlusion.is_some(),
            targeting = rig.lock_manager.is_some(),
            "Camera rig ready"
        );
        Ok(rig)
    }
}

/// Per-frame summary of the rig, for info panels and logs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RigSnapshot {
    pub state: Option<StateKind>,
    pub position: Vec3,
    pub forward: Vec3,
    pub focal_point: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
    pub desired_distance: f32,
    pub is_occluded: bool,
    pub lock_target: Option<Vec3>,
}

/// Third-person camera rig.
pub struct CameraRig {
    settings: CameraSettings,
    /// Captured at build time, restored by the reset calls
    defaults: StoredDefaults,
    target: Rc<dyn FollowTarget>,
    query: Rc<dyn GeometryQuery>,
    kinematics: Kinematics,
    state_machine: CameraStateMachine,
    occlusion: Option<OcclusionResolver>,
    lock_manager: Option<TargetLockManager>,
    notifier: Option<Rc<RangeNotifier>>,
    sensor: Option<RangeSensor>,
    /// State to return to when lock-on ends
    resume_state: StateKind,
    target_lost: bool,
}

impl std::fmt::Debug for CameraRig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraRig")
            .field("state", &self.state_machine.current())
            .field("kinematics", &self.kinematics)
            .field("occlusion", &self.occlusion)
            .field("lock_manager", &self.lock_manager)
            .finish_non_exhaustive()
    }
}

impl CameraRig {
    pub fn builder(settings: CameraSettings) -> CameraRigBuilder {
        CameraRigBuilder::new(settings)
    }

    // ========================================================================
    // Frame phases
    // ========================================================================

    /// Update phase: range bookkeeping and state transitions.
    pub fn tick(&mut self, dt: f32) {
        let Some(target) = self.live_target() else {
            return;
        };

        if let Some(manager) = self.lock_manager.as_mut() {
            if let (Some(sensor), Some(notifier)) = (self.sensor.as_mut(), self.notifier.as_ref()) {
                sensor.sense(
                    self.kinematics.focal_point.position(),
                    &*self.query,
                    notifier,
                );
            }
            manager.process_range_events();
            manager.prune();
        }

        let occlusion = self.occlusion.as_ref().map(OcclusionResolver::state);
        let transition = {
            let mut ctx = StateContext::new(&mut self.settings, &mut self.kinematics, target)
                .with_dt(dt)
                .with_occlusion(occlusion)
                .with_lock(self.lock_manager.as_mut());
            self.state_machine.update_state(&mut ctx)
        };

        match transition {
            Transition::Stay => {}
            Transition::Switch(kind) => self.set_state(kind),
            Transition::Resume => {
                debug!(resume = %self.resume_state, "Resuming previous camera state");
                self.switch_state(self.resume_state, target);
            }
        }
    }

    /// Pose phase: occlusion first, then the active state places the camera.
    pub fn late_tick(&mut self, dt: f32) {
        let Some(target) = self.live_target() else {
            return;
        };

        let occlusion = match self.occlusion.as_mut() {
            Some(resolver) => {
                let pivot = self.kinematics.focal_point.position()
                    + Vec3::Y * self.settings.offset_height;
                let probe = OcclusionProbe::from_settings(
                    pivot,
                    self.kinematics.rotation.to_quat(),
                    &self.settings,
                    self.target.collider_root(),
                );
                let state = resolver.resolve(&probe, &*self.query);
                let requested = self.settings.requested_distance();
                let desired = if state.is_occluded {
                    requested.min(state.desired_distance)
                } else {
                    requested
                };
                self.settings.set_desired_distance(desired);
                Some(state)
            }
            None => {
                let requested = self.settings.requested_distance();
                self.settings.set_desired_distance(requested);
                None
            }
        };

        let mut ctx = StateContext::new(&mut self.settings, &mut self.kinematics, target)
            .with_dt(dt)
            .with_occlusion(occlusion)
            .with_lock(self.lock_manager.as_mut());
        self.state_machine.late_update_state(&mut ctx);
    }

    fn live_target(&mut self) -> Option<Transform> {
        match self.target.transform() {
            Some(transform) => {
                self.target_lost = false;
                Some(transform)
            }
            None => {
                if !self.target_lost {
                    warn!("Camera target destroyed; holding position");
                    self.target_lost = true;
                }
                None
            }
        }
    }

    // ========================================================================
    // State control
    // ========================================================================

    /// Switch behavior. LockOn is ignored while targeting is disabled.
    pub fn set_state(&mut self, kind: StateKind) {
        if kind == StateKind::LockOn && self.lock_manager.is_none() {
            debug!("Lock-on requested with targeting disabled");
            return;
        }
        let Some(target) = self.target.transform() else {
            return;
        };
        self.switch_state(kind, target);
    }

    fn switch_state(&mut self, kind: StateKind, target: Transform) {
        let current = self.state_machine.current();
        if kind == StateKind::LockOn
            && let Some(current) = current
            && current != StateKind::LockOn
        {
            self.resume_state = current;
        }

        let occlusion = self.occlusion.as_ref().map(OcclusionResolver::state);
        let mut ctx = StateContext::new(&mut self.settings, &mut self.kinematics, target)
            .with_occlusion(occlusion)
            .with_lock(self.lock_manager.as_mut());
        self.state_machine.set_current_state(kind, &mut ctx);
    }

    /// Replace a stock state with a custom implementation.
    pub fn install_state(&mut self, state: Box<dyn CameraState>) {
        self.state_machine.install(state);
    }

    pub fn current_state(&self) -> Option<StateKind> {
        self.state_machine.current()
    }

    /// Follow a different object. Fails if it is already destroyed.
    pub fn set_target(&mut self, target: Rc<dyn FollowTarget>) -> Result<(), RigError> {
        if target.transform().is_none() {
            return Err(RigError::MissingTarget);
        }
        self.target = target;
        self.target_lost = false;
        debug!("Camera target changed");
        Ok(())
    }

    // ========================================================================
    // Zoom / rotation
    // ========================================================================

    /// Request a zoom distance (clamped to the zoom range). The camera rests
    /// at `max(base_distance, zoom_distance)`.
    pub fn set_zoom_distance(&mut self, distance: f32) {
        if !self.settings.enable_zoom {
            return;
        }
        self.settings.set_zoom_distance(distance);
    }

    /// Change the zoom distance by `delta * zoom_speed * dt`.
    pub fn increase_zoom_distance(&mut self, delta: f32, dt: f32) {
        let step = delta * self.settings.zoom_speed * dt;
        self.set_zoom_distance(self.settings.zoom_distance + step);
    }

    /// Feed look input (horizontal, vertical) to the current state.
    pub fn increase_rotation(&mut self, yaw_delta: f32, pitch_delta: f32, dt: f32) {
        let Some(target) = self.target.transform() else {
            return;
        };
        let mut ctx = StateContext::new(&mut self.settings, &mut self.kinematics, target)
            .with_dt(dt)
            .with_lock(self.lock_manager.as_mut());
        self.state_machine
            .handle_input(&mut ctx, Vec2::new(yaw_delta, pitch_delta));
    }

    /// Re-center on the target with zero rotation and default distances.
    pub fn reset_position_and_rotation(&mut self) {
        let Some(target) = self.target.transform() else {
            return;
        };
        self.settings.reset_to_defaults(&self.defaults);
        self.kinematics.focal_point.snap_to(target.position);
        self.kinematics.rotation = OrbitRotation::default();
        if let Some(resolver) = self.occlusion.as_mut() {
            resolver.reset(self.settings.offset_distance);
        }
        self.place_now(target);
        debug!("Camera reset");
    }

    fn place_now(&mut self, target: Transform) {
        let mut ctx = StateContext::new(&mut self.settings, &mut self.kinematics, target);
        let look_at = ctx.default_look_at();
        place_camera(&mut ctx, look_at);
    }

    // ========================================================================
    // Features
    // ========================================================================

    /// Turn camera collision on or off. Turning it off while occluded first
    /// restores the pre-occlusion distance.
    pub fn set_collision_enabled(&mut self, enabled: bool) {
        self.settings.enable_collision = enabled;
        match (enabled, self.occlusion.is_some()) {
            (true, false) => {
                self.occlusion = Some(OcclusionResolver::new(self.settings.offset_distance));
                debug!("Camera collision enabled");
            }
            (false, true) => {
                if let Some(mut resolver) = self.occlusion.take() {
                    resolver.reset_to_unoccluded_distance(&mut self.settings);
                }
                debug!("Camera collision disabled");
            }
            _ => {}
        }
    }

    /// Turn zoom on or off; distances are re-clamped to the active limits.
    pub fn set_zoom_enabled(&mut self, enabled: bool) {
        self.settings.enable_zoom = enabled;
        self.settings.offset_distance = self.settings.clamp_distance(self.settings.offset_distance);
        let requested = self.settings.requested_distance();
        self.settings.set_desired_distance(requested);
        debug!(enabled, "Camera zoom toggled");
    }

    /// Turn lock-on support on or off. Disabling leaves LockOn, ends any lock
    /// and unsubscribes from range events.
    pub fn set_targeting_enabled(&mut self, enabled: bool) {
        self.settings.enable_targeting = enabled;
        match (enabled, self.lock_manager.is_some()) {
            (true, false) => {
                self.lock_manager = Some(self.new_lock_manager());
                // The new subscription has seen none of the current targets
                if let Some(sensor) = self.sensor.as_mut() {
                    sensor.reset();
                }
                debug!("Targeting enabled");
            }
            (false, true) => {
                if self.state_machine.current() == Some(StateKind::LockOn)
                    && let Some(target) = self.target.transform()
                {
                    self.switch_state(self.resume_state, target);
                }
                self.lock_manager = None;
                debug!("Targeting disabled");
            }
            _ => {}
        }
    }

    fn new_lock_manager(&self) -> TargetLockManager {
        let mut manager = match self.notifier.as_ref() {
            Some(notifier) => TargetLockManager::with_subscription(notifier.subscribe()),
            None => TargetLockManager::new(),
        };
        manager.set_show_reticle(self.settings.show_reticle);
        manager
    }

    // ========================================================================
    // Lock-on
    // ========================================================================

    /// Lock onto the nearest target, or release the current lock.
    pub fn toggle_lock_on(&mut self) {
        let focal = self.kinematics.focal_point.position();
        let Some(manager) = self.lock_manager.as_mut() else {
            return;
        };

        if self.state_machine.current() == Some(StateKind::LockOn) {
            manager.end_target_lock();
            self.set_state(self.resume_state);
        } else if manager.begin_target_lock(focal) {
            self.set_state(StateKind::LockOn);
        }
    }

    /// Move the lock to the next target in range-entry order.
    pub fn cycle_targets(&mut self) {
        if let Some(manager) = self.lock_manager.as_mut() {
            manager.cycle_targets();
        }
    }

    /// Move the lock to the nearest target on the left of the view.
    pub fn cycle_targets_left(&mut self) {
        self.cycle_targets_toward(-self.kinematics.pose.right());
    }

    /// Move the lock to the nearest target on the right of the view.
    pub fn cycle_targets_right(&mut self) {
        self.cycle_targets_toward(self.kinematics.pose.right());
    }

    fn cycle_targets_toward(&mut self, direction: Vec3) {
        let camera = self.kinematics.pose.position;
        if let Some(manager) = self.lock_manager.as_mut() {
            manager.cycle_targets_toward(direction, camera);
        }
    }

    pub fn is_locked_on(&self) -> bool {
        self.lock_manager
            .as_ref()
            .is_some_and(TargetLockManager::is_active)
    }

    pub fn lock_manager(&self) -> Option<&TargetLockManager> {
        self.lock_manager.as_ref()
    }

    /// Direct access for feeding range changes by hand.
    pub fn lock_manager_mut(&mut self) -> Option<&mut TargetLockManager> {
        self.lock_manager.as_mut()
    }

    /// The range channel, when one was configured.
    pub fn range_notifier(&self) -> Option<&Rc<RangeNotifier>> {
        self.notifier.as_ref()
    }

    /// Range sensor, when one was configured (e.g. to register targets).
    pub fn range_sensor_mut(&mut self) -> Option<&mut RangeSensor> {
        self.sensor.as_mut()
    }

    pub fn reticle(&self) -> Reticle {
        self.lock_manager
            .as_ref()
            .map(TargetLockManager::reticle)
            .unwrap_or_default()
    }

    // ========================================================================
    // Settings
    // ========================================================================

    pub fn settings(&self) -> &CameraSettings {
        &self.settings
    }

    /// Apply a partial settings override. Invalid overrides change nothing.
    pub fn apply_settings_override(&mut self, patch: &SettingsOverride) -> Result<(), RigError> {
        self.settings.apply_override(patch)?;
        if let Some(sensor) = self.sensor.as_mut() {
            sensor.set_radius(self.settings.lock_on_radius);
        }
        if let Some(manager) = self.lock_manager.as_mut() {
            manager.set_show_reticle(self.settings.show_reticle);
        }
        debug!("Camera settings overridden");
        Ok(())
    }

    /// Restore the values captured when the rig was built.
    pub fn reset_settings(&mut self) {
        self.settings.reset_to_defaults(&self.defaults);
        if let Some(resolver) = self.occlusion.as_mut() {
            resolver.reset(self.settings.offset_distance);
        }
    }

    /// Set the sideways camera shift (clamped to `max_lateral_offset`).
    pub fn set_lateral_offset(&mut self, offset: f32) {
        self.settings.set_lateral_offset(offset);
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn pose(&self) -> CameraPose {
        self.kinematics.pose
    }

    pub fn focal_point(&self) -> Vec3 {
        self.kinematics.focal_point.position()
    }

    pub fn rotation(&self) -> OrbitRotation {
        self.kinematics.rotation
    }

    /// Distance currently applied to the camera.
    pub fn distance(&self) -> f32 {
        self.settings.offset_distance
    }

    pub fn is_occluded(&self) -> bool {
        self.occlusion
            .as_ref()
            .is_some_and(OcclusionResolver::is_occluded)
    }

    pub fn occlusion_state(&self) -> Option<OcclusionState> {
        self.occlusion.as_ref().map(OcclusionResolver::state)
    }

    pub fn snapshot(&self) -> RigSnapshot {
        let pose = self.kinematics.pose;
        RigSnapshot {
            state: self.state_machine.current(),
            position: pose.position,
            forward: pose.forward(),
            focal_point: self.kinematics.focal_point.position(),
            yaw: self.kinematics.rotation.yaw,
            pitch: self.kinematics.rotation.pitch,
            distance: self.settings.offset_distance,
            desired_distance: self.settings.desired_distance,
            is_occluded: self.is_occluded(),
            lock_target: self
                .lock_manager
                .as_ref()
                .and_then(TargetLockManager::aim_override),
        }
    }
}
