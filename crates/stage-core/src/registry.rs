//! Scene registry: the sole owner of pickable objects.
//!
//! Everything else refers to objects through [`MarkerIndex`], an index into
//! the registry's insertion order.

use fnv::FnvHashMap;
use glam::{EulerRot, Mat4, Quat, Vec3};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerIndex(pub usize);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("duplicate object id `{0}`")]
    DuplicateId(String),
    #[error("object id must not be empty")]
    EmptyId,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    /// Euler XYZ, radians.
    pub rotation: Vec3,
}

impl Transform {
    pub fn orientation(&self) -> Quat {
        Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        )
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.orientation(), self.position)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MarkerMeta {
    pub title: String,
    pub ordinal: u32,
    pub category: String,
    pub media: String,
}

/// Geometry the ray resolver tests against, in object space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Bounds {
    Sphere { radius: f32 },
    /// Box centered on the object origin, rotated with the object.
    Box { half_extents: Vec3 },
    /// Horizontal square at the object's height.
    Plane { half_size: f32 },
}

#[derive(Clone, Debug)]
pub struct PickableObject {
    pub id: String,
    pub transform: Transform,
    pub metadata: MarkerMeta,
    pub bounds: Bounds,
    pub pickable: bool,
}

impl PickableObject {
    pub fn marker(id: impl Into<String>, position: Vec3, rotation: Vec3, meta: MarkerMeta) -> Self {
        let outer = crate::constants::MARKER_MAJOR_RADIUS + crate::constants::MARKER_TUBE_RADIUS;
        Self {
            id: id.into(),
            transform: Transform { position, rotation },
            metadata: meta,
            // the torus lies in its local XY plane with the tube around Z
            bounds: Bounds::Box {
                half_extents: Vec3::new(outer, outer, crate::constants::MARKER_TUBE_RADIUS),
            },
            pickable: true,
        }
    }

    pub fn scenery(id: impl Into<String>, position: Vec3, bounds: Bounds) -> Self {
        Self {
            id: id.into(),
            transform: Transform {
                position,
                rotation: Vec3::ZERO,
            },
            metadata: MarkerMeta::default(),
            bounds,
            pickable: false,
        }
    }
}

#[derive(Default)]
pub struct SceneRegistry {
    objects: Vec<PickableObject>,
    by_id: FnvHashMap<String, MarkerIndex>,
}

impl SceneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, object: PickableObject) -> Result<MarkerIndex, RegistryError> {
        if object.id.is_empty() {
            return Err(RegistryError::EmptyId);
        }
        if self.by_id.contains_key(&object.id) {
            return Err(RegistryError::DuplicateId(object.id));
        }
        let index = MarkerIndex(self.objects.len());
        self.by_id.insert(object.id.clone(), index);
        self.objects.push(object);
        Ok(index)
    }

    pub fn get(&self, index: MarkerIndex) -> Option<&PickableObject> {
        self.objects.get(index.0)
    }

    pub fn lookup(&self, id: &str) -> Option<MarkerIndex> {
        self.by_id.get(id).copied()
    }

    /// Rotation is the only mutable part of an object once registered.
    pub fn rotation_mut(&mut self, index: MarkerIndex) -> Option<&mut Vec3> {
        self.objects
            .get_mut(index.0)
            .map(|o| &mut o.transform.rotation)
    }

    pub fn iter(&self) -> impl Iterator<Item = (MarkerIndex, &PickableObject)> + '_ {
        self.objects
            .iter()
            .enumerate()
            .map(|(i, o)| (MarkerIndex(i), o))
    }

    /// Pickable objects in insertion order. Cheap to call every frame.
    pub fn list_pickable(&self) -> impl Iterator<Item = (MarkerIndex, &PickableObject)> + '_ {
        self.iter().filter(|(_, o)| o.pickable)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
