use crate::registry::{Bounds, MarkerIndex, PickableObject, SceneRegistry};
use crate::state::Camera;
use glam::{Vec2, Vec3, Vec4};

/// Canvas size in backing-store pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height.max(1.0)
    }

    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length.
    pub dir: Vec3,
}

impl Ray {
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    pub object: MarkerIndex,
    pub distance: f32,
    pub point: Vec3,
}

/// Map pixel coordinates to normalized device coordinates, Y up.
#[inline]
pub fn normalize_pointer(px: f32, py: f32, viewport: Viewport) -> Vec2 {
    Vec2::new(
        (2.0 * px / viewport.width) - 1.0,
        1.0 - (2.0 * py / viewport.height),
    )
}

/// Compute a world-space ray through `ndc` from the camera eye.
pub fn camera_ray(camera: &Camera, ndc: Vec2) -> Ray {
    let inv = camera.view_projection().inverse();
    let p_far = inv * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);
    let p1: Vec3 = p_far.truncate() / p_far.w;
    Ray {
        origin: camera.eye,
        dir: (p1 - camera.eye).normalize(),
    }
}

#[inline]
pub fn ray_sphere(ray_origin: Vec3, ray_dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray_origin - center;
    let b = oc.dot(ray_dir);
    let c = oc.dot(oc) - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let t = -b - disc.sqrt();
    (t >= 0.0).then_some(t)
}

/// Slab test against an axis-aligned box centered on the origin.
pub fn ray_box(ray_origin: Vec3, ray_dir: Vec3, half_extents: Vec3) -> Option<f32> {
    let mut t_min = f32::NEG_INFINITY;
    let mut t_max = f32::INFINITY;
    for axis in 0..3 {
        let o = ray_origin[axis];
        let d = ray_dir[axis];
        let h = half_extents[axis];
        if d.abs() < 1e-8 {
            if o < -h || o > h {
                return None;
            }
            continue;
        }
        let t1 = (-h - o) / d;
        let t2 = (h - o) / d;
        t_min = t_min.max(t1.min(t2));
        t_max = t_max.min(t1.max(t2));
        if t_min > t_max {
            return None;
        }
    }
    if t_max < 0.0 {
        return None;
    }
    Some(t_min.max(0.0))
}

fn ray_horizontal_square(ray: &Ray, center: Vec3, half_size: f32) -> Option<f32> {
    if ray.dir.y.abs() < 1e-6 {
        return None;
    }
    let t = (center.y - ray.origin.y) / ray.dir.y;
    if t < 0.0 {
        return None;
    }
    let p = ray.at(t);
    ((p.x - center.x).abs() <= half_size && (p.z - center.z).abs() <= half_size).then_some(t)
}

/// Distance along `ray` to the object's bounds, if struck.
pub fn intersect(ray: &Ray, object: &PickableObject) -> Option<f32> {
    let center = object.transform.position;
    match object.bounds {
        Bounds::Sphere { radius } => ray_sphere(ray.origin, ray.dir, center, radius),
        Bounds::Box { half_extents } => {
            // rotation only, so distances carry over unscaled
            let inv = object.transform.orientation().inverse();
            let local_origin = inv * (ray.origin - center);
            let local_dir = inv * ray.dir;
            ray_box(local_origin, local_dir, half_extents)
        }
        Bounds::Plane { half_size } => ray_horizontal_square(ray, center, half_size),
    }
}

/// Nearest pickable object under the ray.
pub fn pick(ray: &Ray, registry: &SceneRegistry) -> Option<RayHit> {
    let mut best = None::<RayHit>;
    for (index, object) in registry.list_pickable() {
        if let Some(t) = intersect(ray, object) {
            match best {
                Some(b) if t >= b.distance => {}
                _ => {
                    best = Some(RayHit {
                        object: index,
                        distance: t,
                        point: ray.at(t),
                    })
                }
            }
        }
    }
    best
}

/// Resolve a pointer position to the nearest pickable object.
pub fn resolve(
    px: f32,
    py: f32,
    viewport: Viewport,
    camera: &Camera,
    registry: &SceneRegistry,
) -> Option<RayHit> {
    if viewport.is_degenerate() || !px.is_finite() || !py.is_finite() {
        return None;
    }
    let ndc = normalize_pointer(px, py, viewport);
    let ray = camera_ray(camera, ndc);
    if !ray.dir.is_finite() {
        return None;
    }
    let hit = pick(&ray, registry);
    if let Some(h) = &hit {
        log::trace!("[pick] {:?} at {:.2}", h.object, h.distance);
    }
    hit
}
