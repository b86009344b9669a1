//! Camera Occlusion
//!
//! Pulls the camera in when geometry sits between the look point and the
//! camera's near plane, and lets it back out once the original placement is
//! clear again.
//!
//! Distances produced here are raw. They are clamped into the active distance
//! limits by whoever writes them into [`CameraSettings`].

use glam::{Quat, Vec3};
use tracing::{debug, trace, warn};

use crate::error::QueryError;
use crate::math::forward_of;
use crate::query::{ColliderId, GeometryQuery, LayerMask};
use crate::settings::CameraSettings;

/// How many hits on the target's own colliders a single line query may skip.
const MAX_SELF_HITS: usize = 4;

/// Nudge past a skipped hit so the next cast does not report it again.
const SKIP_EPSILON: f32 = 1e-3;

/// Output of the occlusion check for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OcclusionState {
    pub is_occluded: bool,
    /// Distance to restore once the view clears
    pub reset_distance: f32,
    /// Distance the camera should move toward
    pub desired_distance: f32,
}

impl OcclusionState {
    pub fn clear(distance: f32) -> Self {
        Self {
            is_occluded: false,
            reset_distance: distance,
            desired_distance: distance,
        }
    }
}

/// Everything the resolver needs to know about the camera this frame.
#[derive(Clone, Copy, Debug)]
pub struct OcclusionProbe {
    /// Look point the camera orbits; line queries start here
    pub look_from: Vec3,
    /// Orbit rotation (camera sits along local +Z from `look_from`)
    pub rotation: Quat,
    /// Sideways camera shift
    pub lateral_offset: f32,
    /// Distance the camera is at now
    pub current_distance: f32,
    /// Distance wanted when nothing blocks the view
    pub unoccluded_distance: f32,
    pub near_clip: f32,
    /// Vertical field of view in degrees
    pub field_of_view: f32,
    pub aspect_ratio: f32,
    /// Collider hierarchy of the followed target
    pub ignore_root: Option<ColliderId>,
    pub mask: LayerMask,
}

impl OcclusionProbe {
    /// Probe using the lens, layers and distances held in `settings`.
    pub fn from_settings(
        look_from: Vec3,
        rotation: Quat,
        settings: &CameraSettings,
        ignore_root: Option<ColliderId>,
    ) -> Self {
        Self {
            look_from,
            rotation,
            lateral_offset: settings.lateral_offset,
            current_distance: settings.offset_distance,
            unoccluded_distance: settings.requested_distance(),
            near_clip: settings.near_clip,
            field_of_view: settings.field_of_view,
            aspect_ratio: settings.aspect_ratio,
            ignore_root,
            mask: settings.collision_layers,
        }
    }

    /// Camera position if it sat `distance` away from the look point.
    pub fn camera_position_at(&self, distance: f32) -> Vec3 {
        self.look_from
            + self.rotation * (Vec3::Z * distance)
            + self.rotation * (Vec3::X * self.lateral_offset)
    }

    fn corners_at(&self, distance: f32) -> [Vec3; 4] {
        near_plane_corners(
            self.camera_position_at(distance),
            self.rotation,
            self.near_clip,
            self.field_of_view,
            self.aspect_ratio,
        )
    }
}

/// Corners of the near clip plane: top-left, top-right, bottom-left,
/// bottom-right.
pub fn near_plane_corners(
    position: Vec3,
    rotation: Quat,
    near_clip: f32,
    field_of_view: f32,
    aspect_ratio: f32,
) -> [Vec3; 4] {
    let half_height = (field_of_view.to_radians() * 0.5).tan() * near_clip;
    let half_width = half_height * aspect_ratio;

    let center = position + forward_of(rotation) * near_clip;
    let right = rotation * Vec3::X * half_width;
    let up = rotation * Vec3::Y * half_height;

    [
        center - right + up,
        center + right + up,
        center - right - up,
        center + right - up,
    ]
}

/// Per-frame occlusion check with memory of the pre-occlusion distance.
#[derive(Debug, Clone)]
pub struct OcclusionResolver {
    state: OcclusionState,
}

impl OcclusionResolver {
    pub fn new(distance: f32) -> Self {
        Self {
            state: OcclusionState::clear(distance),
        }
    }

    pub fn state(&self) -> OcclusionState {
        self.state
    }

    pub fn is_occluded(&self) -> bool {
        self.state.is_occluded
    }

    /// Forget any occlusion and rest at `distance`.
    pub fn reset(&mut self, distance: f32) {
        self.state = OcclusionState::clear(distance);
    }

    /// Leave occlusion and send the camera back to where it was before.
    ///
    /// Writes the restored distance into `settings` when occluded.
    pub fn reset_to_unoccluded_distance(&mut self, settings: &mut CameraSettings) {
        if self.state.is_occluded {
            debug!(
                distance = self.state.reset_distance,
                "Restoring unoccluded camera distance"
            );
            settings.set_desired_distance(self.state.reset_distance);
            self.state.is_occluded = false;
            self.state.desired_distance = self.state.reset_distance;
        }
    }

    /// Run the occlusion check for this frame.
    ///
    /// A failed query reports "not occluded" for this frame only; the stored
    /// recovery state is kept for the next frame.
    pub fn resolve(&mut self, probe: &OcclusionProbe, query: &dyn GeometryQuery) -> OcclusionState {
        match self.try_resolve(probe, query) {
            Ok(state) => state,
            Err(err) => {
                warn!(%err, "Occlusion query failed; treating view as clear this frame");
                OcclusionState {
                    is_occluded: false,
                    reset_distance: self.state.reset_distance,
                    desired_distance: probe.unoccluded_distance,
                }
            }
        }
    }

    fn try_resolve(
        &mut self,
        probe: &OcclusionProbe,
        query: &dyn GeometryQuery,
    ) -> Result<OcclusionState, QueryError> {
        // Pull in: the farthest blocking hit across the current near plane
        let mut pull_in: Option<f32> = None;
        for corner in probe.corners_at(probe.current_distance) {
            if let Some(distance) = cast(probe, corner, query)?
                && pull_in.is_none_or(|best| distance > best)
            {
                pull_in = Some(distance);
            }
        }

        if pull_in.is_none() && !self.state.is_occluded {
            let camera = probe.camera_position_at(probe.current_distance);
            let behind = camera - forward_of(probe.rotation) * probe.near_clip;
            pull_in = cast(probe, behind, query)?;
        }

        if let Some(hit) = pull_in {
            self.enter_occlusion(hit - probe.near_clip, probe.current_distance);
            return Ok(self.state);
        }

        if !self.state.is_occluded {
            self.state.desired_distance = probe.unoccluded_distance;
            self.state.reset_distance = probe.unoccluded_distance;
            return Ok(self.state);
        }

        // Recover: the closest blocking hit across the original near plane
        let mut remaining: Option<f32> = None;
        for corner in probe.corners_at(self.state.reset_distance) {
            if let Some(distance) = cast(probe, corner, query)?
                && remaining.is_none_or(|best| distance < best)
            {
                remaining = Some(distance);
            }
        }

        match remaining {
            None => {
                debug!(distance = self.state.reset_distance, "Camera view cleared");
                self.state.is_occluded = false;
                self.state.desired_distance = self.state.reset_distance;
            }
            Some(hit) => {
                self.state.desired_distance = hit - probe.near_clip;
                trace!(desired = self.state.desired_distance, "Camera still occluded");
            }
        }
        Ok(self.state)
    }

    fn enter_occlusion(&mut self, desired: f32, current_distance: f32) {
        if !self.state.is_occluded {
            self.state.is_occluded = true;
            self.state.reset_distance = current_distance;
            debug!(desired, reset = current_distance, "Camera occluded");
        } else {
            trace!(desired, "Camera occlusion updated");
        }
        self.state.desired_distance = desired;
    }
}

/// Distance from the look point to the first blocking hit on the way to
/// `to`, skipping the target's own colliders.
fn cast(
    probe: &OcclusionProbe,
    to: Vec3,
    query: &dyn GeometryQuery,
) -> Result<Option<f32>, QueryError> {
    let Some(direction) = (to - probe.look_from).try_normalize() else {
        return Ok(None);
    };

    let mut from = probe.look_from;
    let mut travelled = 0.0;
    for _ in 0..MAX_SELF_HITS {
        let Some(hit) = query.line_cast(from, to, probe.mask)? else {
            return Ok(None);
        };
        if Some(hit.collider_root) != probe.ignore_root {
            return Ok(Some(travelled + hit.distance));
        }
        travelled += hit.distance + SKIP_EPSILON;
        from = probe.look_from + direction * travelled;
        if (to - from).dot(direction) <= 0.0 {
            return Ok(None);
        }
    }
    Ok(None)
}
