use glam::Vec3;
use stage_core::{
    Bounds, MarkerMeta, PickableObject, RegistryError, SceneRegistry, FLOOR_HALF_SIZE, REST_TILT,
};

pub struct CatalogEntry {
    pub id: &'static str,
    pub title: &'static str,
    pub ordinal: u32,
    pub genre: &'static str,
    pub media: &'static str,
    pub position: [f32; 3],
}

pub const CATALOG: [CatalogEntry; 4] = [
    CatalogEntry {
        id: "on-the-rocks",
        title: "On The Rocks",
        ordinal: 1,
        genre: "Jazz/Blues",
        media: "/data/Squirm Worm.mp3",
        position: [2.0, 1.0, 2.0],
    },
    CatalogEntry {
        id: "night-drive",
        title: "Night Drive",
        ordinal: 2,
        genre: "Electronic",
        media: "/data/night-drive.mp3",
        position: [-2.0, 1.0, 2.0],
    },
    CatalogEntry {
        id: "paper-boats",
        title: "Paper Boats",
        ordinal: 3,
        genre: "Folk",
        media: "/data/paper-boats.mp3",
        position: [2.0, 1.0, -2.0],
    },
    CatalogEntry {
        id: "slow-tide",
        title: "Slow Tide",
        ordinal: 4,
        genre: "Ambient",
        media: "/data/slow-tide.webm",
        position: [-2.0, 1.0, -2.0],
    },
];

pub const FLOOR_ID: &str = "floor";

/// Markers lying flat at their catalog positions, plus the floor.
pub fn build_registry(entries: &[CatalogEntry]) -> Result<SceneRegistry, RegistryError> {
    let mut registry = SceneRegistry::new();
    for e in entries {
        registry.insert(PickableObject::marker(
            e.id,
            Vec3::from_array(e.position),
            Vec3::new(REST_TILT, 0.0, 0.0),
            MarkerMeta {
                title: e.title.to_string(),
                ordinal: e.ordinal,
                category: e.genre.to_string(),
                media: e.media.to_string(),
            },
        ))?;
    }
    registry.insert(PickableObject::scenery(
        FLOOR_ID,
        Vec3::ZERO,
        Bounds::Plane {
            half_size: FLOOR_HALF_SIZE,
        },
    ))?;
    Ok(registry)
}
