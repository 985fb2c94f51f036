//! Ordered list of levels, read from `assets/levels.ron`.

use super::LevelRef;
use crate::config::{ConfigError, load_ron, parse_ron};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Catalog shipped inside the binary, used when the assets copy is unusable.
const BUILTIN_LEVELS: &str = include_str!("../../assets/levels.ron");

/// File name of the catalog inside the assets directory.
pub const LEVELS_FILE: &str = "levels.ron";

/// Position plus orientation, either looking at a point or from Euler angles.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PoseDef {
    pub translation: [f32; 3],
    /// Point to face; wins over `rotation` when set.
    #[serde(default)]
    pub look_at: Option<[f32; 3]>,
    /// Yaw, pitch, roll in degrees.
    #[serde(default)]
    pub rotation: [f32; 3],
}

impl PoseDef {
    pub fn transform(&self) -> Transform {
        let transform = Transform::from_translation(Vec3::from_array(self.translation));
        match self.look_at {
            Some(point) => transform.looking_at(Vec3::from_array(point), Vec3::Y),
            None => {
                let [yaw, pitch, roll] = self.rotation.map(f32::to_radians);
                transform.with_rotation(Quat::from_euler(EulerRot::YXZ, yaw, pitch, roll))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ShapeDef {
    Cuboid { size: [f32; 3] },
    Sphere { radius: f32 },
    Capsule { radius: f32, length: f32 },
    Cylinder { radius: f32, height: f32 },
    Plane { size: f32 },
}

impl ShapeDef {
    pub fn mesh(&self) -> Mesh {
        match *self {
            ShapeDef::Cuboid { size: [x, y, z] } => Mesh::from(Cuboid::new(x, y, z)),
            ShapeDef::Sphere { radius } => Mesh::from(Sphere::new(radius)),
            ShapeDef::Capsule { radius, length } => Mesh::from(Capsule3d::new(radius, length)),
            ShapeDef::Cylinder { radius, height } => Mesh::from(Cylinder::new(radius, height)),
            ShapeDef::Plane { size } => {
                Mesh::from(Plane3d::new(Vec3::Y, Vec2::splat(size / 2.0)))
            }
        }
    }
}

/// Continuous motion applied to an object, carrying along anything parented to it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MoverDef {
    /// Turns around the local Y axis.
    Spin { degrees_per_second: f32 },
    /// Walks back and forth between the spawn position and `to`.
    Patrol { to: [f32; 3], speed: f32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectDef {
    pub name: String,
    pub shape: ShapeDef,
    /// sRGB, 0..1
    pub color: [f32; 3],
    pub pose: PoseDef,
    #[serde(default)]
    pub finish: bool,
    /// Where the camera lands, relative to the object.
    #[serde(default)]
    pub camera_target: Option<PoseDef>,
    #[serde(default)]
    pub mover: Option<MoverDef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightDef {
    pub illuminance: f32,
    pub pose: PoseDef,
}

impl Default for LightDef {
    fn default() -> Self {
        Self {
            illuminance: 8000.0,
            pose: PoseDef {
                translation: [4.0, 10.0, 4.0],
                look_at: Some([0.0, 0.0, 0.0]),
                rotation: [0.0; 3],
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDefinition {
    pub name: String,
    pub camera: PoseDef,
    #[serde(default)]
    pub light: LightDef,
    #[serde(default)]
    pub objects: Vec<ObjectDef>,
}

/// The ordered level list; index 0 is where the game starts.
#[derive(Resource, Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LevelCatalog {
    levels: Vec<LevelDefinition>,
}

impl LevelCatalog {
    pub fn new(levels: Vec<LevelDefinition>) -> Self {
        Self { levels }
    }

    pub fn builtin() -> Result<Self, ConfigError> {
        parse_ron(Path::new("<builtin levels.ron>"), BUILTIN_LEVELS)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        load_ron(path)
    }

    /// Loads `path`, falling back to the builtin catalog.
    pub fn load_or_builtin(path: &Path) -> Self {
        match Self::load(path) {
            Ok(catalog) => {
                info!(
                    "Loaded {} levels from {}",
                    catalog.len(),
                    path.display()
                );
                return catalog;
            }
            Err(err) => warn!("Using builtin levels: {err}"),
        }

        Self::builtin().unwrap_or_else(|err| {
            error!("Builtin level catalog is broken: {err}");
            Self::default()
        })
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&LevelDefinition> {
        self.levels.get(index)
    }

    /// Index of the first level called `name`.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.levels.iter().position(|level| level.name == name)
    }

    pub fn resolve(&self, level: &LevelRef) -> Option<usize> {
        match level {
            LevelRef::Index(index) if *index < self.len() => Some(*index),
            LevelRef::Index(_) => None,
            LevelRef::Name(name) => self.index_of(name),
        }
    }

    /// The level after `current`, wrapping to the first one after the last.
    pub fn next_index(&self, current: usize) -> usize {
        let next = current + 1;
        if next < self.len() { next } else { 0 }
    }

    pub fn iter(&self) -> impl Iterator<Item = &LevelDefinition> {
        self.levels.iter()
    }
}
