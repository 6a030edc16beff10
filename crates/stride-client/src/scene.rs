use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Top-level scene YAML: the playable character, named collidable
/// volumes, decorative props, and the animation clip manifest.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SceneFile {
    pub name: String,
    pub character: CharacterDef,
    #[serde(default)]
    pub colliders: Vec<ColliderDef>,
    #[serde(default)]
    pub props: Vec<PropDef>,
    #[serde(default)]
    pub clips: Vec<ClipDef>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CharacterDef {
    pub spawn: [f32; 3],
    #[serde(default)]
    pub yaw_degrees: f32,
    pub seat: [f32; 3],
    pub vehicle_zone: String,
}

/// An axis-aligned blocking volume, addressed by name.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ColliderDef {
    pub name: String,
    pub center: [f32; 3],
    pub size: [f32; 3],
}

/// Inert set dressing. Position only.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PropDef {
    pub name: String,
    pub position: [f32; 3],
    #[serde(default)]
    pub tags: Vec<String>,
}

/// One clip in the manifest. The name doubles as the state it binds to.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClipDef {
    pub name: String,
    pub duration: f32,
}

#[derive(Debug)]
pub enum SceneError {
    Io(std::io::Error),
    Parse(serde_yaml::Error),
    Validation(String),
}

impl std::fmt::Display for SceneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneError::Io(e) => write!(f, "failed to read scene file: {}", e),
            SceneError::Parse(e) => write!(f, "failed to parse scene file: {}", e),
            SceneError::Validation(msg) => write!(f, "invalid scene: {}", msg),
        }
    }
}

/// Load and validate a scene file.
pub fn load_scene(path: &Path) -> Result<SceneFile, SceneError> {
    let contents = std::fs::read_to_string(path).map_err(SceneError::Io)?;
    let scene: SceneFile = serde_yaml::from_str(&contents).map_err(SceneError::Parse)?;
    validate(&scene)?;
    tracing::info!(
        "Loaded scene '{}' from {:?}: {} colliders, {} props, {} clips",
        scene.name,
        path,
        scene.colliders.len(),
        scene.props.len(),
        scene.clips.len()
    );
    Ok(scene)
}

/// Reject scenes that cannot run. A vehicle zone naming no collider is
/// allowed (boarding simply never fires) but logged.
pub fn validate(scene: &SceneFile) -> Result<(), SceneError> {
    let mut seen = HashSet::new();
    for collider in &scene.colliders {
        if !seen.insert(collider.name.as_str()) {
            return Err(SceneError::Validation(format!(
                "duplicate collider name '{}'",
                collider.name
            )));
        }
    }
    for clip in &scene.clips {
        if clip.duration <= 0.0 {
            return Err(SceneError::Validation(format!(
                "clip '{}' has non-positive duration {}",
                clip.name, clip.duration
            )));
        }
    }
    if !seen.contains(scene.character.vehicle_zone.as_str()) {
        tracing::warn!(
            "Vehicle zone '{}' names no collider; boarding will never trigger",
            scene.character.vehicle_zone
        );
    }
    Ok(())
}
