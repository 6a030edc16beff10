use std::collections::HashMap;

use hecs::World;

use stride_core::{Aabb, CollisionQuery};

use crate::scene::SceneFile;

/// Scene-file entity id.
pub struct Name(pub String);

pub struct Tags(pub Vec<String>);

/// World-space location for inert props.
pub struct Position(pub glam::Vec3);

/// A named blocking volume the resolver can probe.
pub struct Volume(pub Aabb);

/// Central scene state: the ECS world plus the name registry for
/// collidable volumes.
pub struct SceneWorld {
    pub world: World,
    pub volume_registry: HashMap<String, hecs::Entity>,
}

impl SceneWorld {
    pub fn new() -> Self {
        Self {
            world: World::new(),
            volume_registry: HashMap::new(),
        }
    }

    /// Spawn every collider and prop from a parsed scene.
    pub fn from_scene(scene: &SceneFile) -> Self {
        let mut scene_world = Self::new();
        for def in &scene.colliders {
            let aabb = Aabb::from_center_size(def.center.into(), def.size.into());
            let entity = scene_world
                .world
                .spawn((Name(def.name.clone()), Volume(aabb)));
            scene_world.volume_registry.insert(def.name.clone(), entity);
        }
        for def in &scene.props {
            scene_world.world.spawn((
                Name(def.name.clone()),
                Position(def.position.into()),
                Tags(def.tags.clone()),
            ));
        }
        tracing::info!(
            "Scene '{}' spawned: {} volumes, {} props",
            scene.name,
            scene.colliders.len(),
            scene.props.len()
        );
        scene_world
    }
}

impl Default for SceneWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl CollisionQuery for SceneWorld {
    fn volume(&self, name: &str) -> Option<Aabb> {
        let entity = *self.volume_registry.get(name)?;
        self.world.get::<&Volume>(entity).ok().map(|v| v.0)
    }
}
