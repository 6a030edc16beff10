use glam::Vec3;

/// Axis-aligned box, min/max corners. Face contact counts as an
/// intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// The character's collision box: 1 unit wide and deep, 2 tall,
    /// standing on `position`.
    pub fn character(position: Vec3) -> Self {
        Self::from_center_size(
            position + Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(1.0, 2.0, 1.0),
        )
    }

    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }
}

/// World-provider seam: the scene owns the collidable volumes, the
/// resolver only looks them up by name.
pub trait CollisionQuery {
    fn volume(&self, name: &str) -> Option<Aabb>;
}

/// What one resolve pass found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Contact {
    pub blocked: bool,
    pub entered_vehicle: bool,
}

const VOLUME_PREFIX: &str = "collisionBox";
const VOLUME_PROBES: u32 = 20;

/// Probes the fixed collidable set against the character box.
///
/// Volumes are enumerated by name in a fixed order; names with no
/// volume behind them are skipped. The one volume named as the
/// vehicle entry zone reports boarding instead of blocking. The scan
/// never stops early, matching the reference enumeration.
#[derive(Debug, Clone)]
pub struct CollisionResolver {
    vehicle_zone: String,
}

impl CollisionResolver {
    pub fn new(vehicle_zone: impl Into<String>) -> Self {
        Self {
            vehicle_zone: vehicle_zone.into(),
        }
    }

    pub fn resolve(&self, bounds: &Aabb, world: &dyn CollisionQuery) -> Contact {
        let mut contact = Contact::default();
        for index in 1..=VOLUME_PROBES {
            let name = format!("{}{}", VOLUME_PREFIX, index);
            let Some(volume) = world.volume(&name) else {
                continue;
            };
            if !volume.intersects(bounds) {
                continue;
            }
            if name == self.vehicle_zone {
                contact.entered_vehicle = true;
            } else {
                contact.blocked = true;
            }
        }
        contact
    }
}
