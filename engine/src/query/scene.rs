//! Box Scene
//!
//! A minimal world made of axis-aligned boxes that answers [`GeometryQuery`]
//! calls. Line casts use the slab method; overlaps use closest-point tests.
//!
//! # Example
//!
//! ```ignore
//! use tailcam_engine::query::{BoxScene, ColliderId, GeometryQuery, LayerMask};
//! use glam::Vec3;
//!
//! let scene = BoxScene::new();
//! let wall = scene.insert_box(Vec3::new(-2.0, 0.0, 3.0), Vec3::new(2.0, 3.0, 3.5));
//!
//! let hit = scene
//!     .line_cast(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 1.0, 6.0), LayerMask::ALL)
//!     .unwrap();
//! assert_eq!(hit.map(|h| h.collider_root), Some(wall));
//! ```

use std::cell::{Cell, RefCell};

use glam::Vec3;

use super::{ColliderId, GeometryQuery, LayerMask, LineHit, QueryError};

/// One box collider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneBox {
    /// Collider identity
    pub id: ColliderId,
    /// Root object the collider belongs to (its own id unless attached)
    pub root: ColliderId,
    pub min: Vec3,
    pub max: Vec3,
    /// Layers the box lives on
    pub layers: LayerMask,
}

/// Interior-mutable box world so tests can add and remove obstructions while
/// the rig holds a shared reference.
#[derive(Debug)]
pub struct BoxScene {
    boxes: RefCell<Vec<SceneBox>>,
    next_id: Cell<u64>,
    available: Cell<bool>,
}

impl Default for BoxScene {
    fn default() -> Self {
        Self::new()
    }
}

impl BoxScene {
    pub fn new() -> Self {
        Self {
            boxes: RefCell::new(Vec::new()),
            next_id: Cell::new(1),
            available: Cell::new(true),
        }
    }

    fn allocate_id(&self) -> ColliderId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        ColliderId(id)
    }

    /// Add a box on layer 0 that is its own root.
    pub fn insert_box(&self, min: Vec3, max: Vec3) -> ColliderId {
        self.insert_box_on(min, max, LayerMask::layer(0))
    }

    /// Add a box on the given layers that is its own root.
    pub fn insert_box_on(&self, min: Vec3, max: Vec3, layers: LayerMask) -> ColliderId {
        let id = self.allocate_id();
        self.insert(SceneBox {
            id,
            root: id,
            min: min.min(max),
            max: min.max(max),
            layers,
        });
        id
    }

    /// Add a box attached to an existing root object on the given layers.
    pub fn insert_attached(
        &self,
        root: ColliderId,
        min: Vec3,
        max: Vec3,
        layers: LayerMask,
    ) -> ColliderId {
        let id = self.allocate_id();
        self.insert(SceneBox {
            id,
            root,
            min: min.min(max),
            max: min.max(max),
            layers,
        });
        id
    }

    /// Add a fully specified box, replacing any box with the same id.
    pub fn insert(&self, scene_box: SceneBox) {
        let mut boxes = self.boxes.borrow_mut();
        boxes.retain(|b| b.id != scene_box.id);
        boxes.push(scene_box);
    }

    /// Remove a collider. Returns whether it existed.
    pub fn remove(&self, id: ColliderId) -> bool {
        let mut boxes = self.boxes.borrow_mut();
        let before = boxes.len();
        boxes.retain(|b| b.id != id);
        boxes.len() != before
    }

    /// Remove every collider.
    pub fn clear(&self) {
        self.boxes.borrow_mut().clear();
    }

    /// Move a collider so its center sits at `center`.
    pub fn move_box(&self, id: ColliderId, center: Vec3) -> bool {
        let mut boxes = self.boxes.borrow_mut();
        match boxes.iter_mut().find(|b| b.id == id) {
            Some(b) => {
                let half = (b.max - b.min) * 0.5;
                b.min = center - half;
                b.max = center + half;
                true
            }
            None => false,
        }
    }

    /// Number of colliders in the scene.
    pub fn len(&self) -> usize {
        self.boxes.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Simulate the query service going away (`false`) or coming back.
    pub fn set_available(&self, available: bool) {
        self.available.set(available);
    }

    fn check_available(&self) -> Result<(), QueryError> {
        if self.available.get() {
            Ok(())
        } else {
            Err(QueryError::Unavailable)
        }
    }
}

impl GeometryQuery for BoxScene {
    fn line_cast(
        &self,
        from: Vec3,
        to: Vec3,
        mask: LayerMask,
    ) -> Result<Option<LineHit>, QueryError> {
        self.check_available()?;

        let segment = to - from;
        let length = segment.length();
        if length <= f32::EPSILON {
            return Ok(None);
        }
        let direction = segment / length;

        let best = self
            .boxes
            .borrow()
            .iter()
            .filter(|b| b.layers.intersects(mask))
            .filter_map(|b| {
                ray_aabb_intersect(from, direction, b.min, b.max)
                    .filter(|t| *t <= length)
                    .map(|t| (t, b.root))
            })
            .min_by(|a, b| a.0.total_cmp(&b.0));

        Ok(best.map(|(distance, collider_root)| LineHit {
            distance,
            point: from + direction * distance,
            collider_root,
        }))
    }

    fn overlap_sphere(
        &self,
        center: Vec3,
        radius: f32,
        mask: LayerMask,
    ) -> Result<Vec<ColliderId>, QueryError> {
        self.check_available()?;

        let radius_sq = radius * radius;
        Ok(self
            .boxes
            .borrow()
            .iter()
            .filter(|b| b.layers.intersects(mask))
            .filter(|b| {
                let closest = center.clamp(b.min, b.max);
                closest.distance_squared(center) <= radius_sq
            })
            .map(|b| b.id)
            .collect())
    }
}

/// Ray-AABB intersection using the slab method.
///
/// # Arguments
///
/// * `ray_origin` - Starting point of the ray
/// * `ray_dir` - Direction of the ray (must be normalized)
/// * `aabb_min` - Minimum corner of the AABB
/// * `aabb_max` - Maximum corner of the AABB
///
/// # Returns
///
/// * `Some(t)` - Distance along the ray to the entry point, or to the exit point
///   when the ray starts inside the box
/// * `None` - No intersection, or the box is behind the ray origin
pub fn ray_aabb_intersect(
    ray_origin: Vec3,
    ray_dir: Vec3,
    aabb_min: Vec3,
    aabb_max: Vec3,
) -> Option<f32> {
    // Near-zero components get a huge inverse so the slab is never crossed
    let inv = |d: f32| {
        if d.abs() > 1e-10 {
            1.0 / d
        } else {
            f32::MAX * if d.is_sign_negative() { -1.0 } else { 1.0 }
        }
    };
    let inv_dir = Vec3::new(inv(ray_dir.x), inv(ray_dir.y), inv(ray_dir.z));

    let t1 = (aabb_min - ray_origin) * inv_dir;
    let t2 = (aabb_max - ray_origin) * inv_dir;

    let t_min = t1.min(t2).max_element();
    let t_max = t1.max(t2).min_element();

    if t_max >= t_min && t_max >= 0.0 {
        if t_min >= 0.0 { Some(t_min) } else { Some(t_max) }
    } else {
        None
    }
}
