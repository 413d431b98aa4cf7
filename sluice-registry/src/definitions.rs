//! Serialized block and liquid definitions.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use sluice_utils::Direction;

use crate::blocks::BarrierHeights;
use crate::registry::RegistryError;

/// The definitions shipped with the workspace.
pub const BUILTIN_BLOCKS: &str = include_str!("../../package-content/blocks.json5");

const fn default_solid_replaceable() -> u16 {
    100
}

const fn default_liquid_replaceable() -> u16 {
    9500
}

const fn default_spread_delay() -> u32 {
    150
}

/// Top level of a definitions file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BlockDefinitions {
    /// Non-liquid voxel types. `air` is implicit.
    #[serde(default)]
    pub blocks: Vec<SolidDefinition>,
    /// Liquid families.
    #[serde(default)]
    pub liquids: Vec<LiquidDefinition>,
}

/// A non-liquid voxel type.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SolidDefinition {
    /// Unique code.
    pub code: String,
    /// Softness score.
    #[serde(default = "default_solid_replaceable")]
    pub replaceable: u16,
    /// Liquid barrier, either one number or per face.
    #[serde(default)]
    pub barrier: BarrierDefinition,
    /// Drops one voxel if placed by a collision with nothing solid around.
    #[serde(default)]
    pub breaks_if_floating: bool,
}

/// Barrier heights as written in a definitions file.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
pub enum BarrierDefinition {
    /// The same height on all faces.
    Uniform(f32),
    /// Individual faces. Missing faces are open.
    PerFace {
        /// -y face.
        #[serde(default)]
        down: f32,
        /// +y face.
        #[serde(default)]
        up: f32,
        /// -z face.
        #[serde(default)]
        north: f32,
        /// +z face.
        #[serde(default)]
        south: f32,
        /// -x face.
        #[serde(default)]
        west: f32,
        /// +x face.
        #[serde(default)]
        east: f32,
    },
}

impl Default for BarrierDefinition {
    fn default() -> Self {
        Self::Uniform(0.0)
    }
}

impl BarrierDefinition {
    /// Raw heights indexed by [`Direction::index`], unclamped.
    #[must_use]
    pub fn raw_faces(&self) -> [f32; 6] {
        match *self {
            Self::Uniform(height) => [height; 6],
            Self::PerFace {
                down,
                up,
                north,
                south,
                west,
                east,
            } => {
                let mut faces = [0.0; 6];
                faces[Direction::Down.index()] = down;
                faces[Direction::Up.index()] = up;
                faces[Direction::North.index()] = north;
                faces[Direction::South.index()] = south;
                faces[Direction::West.index()] = west;
                faces[Direction::East.index()] = east;
                faces
            }
        }
    }

    /// Converts into registry heights.
    #[must_use]
    pub fn to_heights(&self) -> BarrierHeights {
        BarrierHeights::from_faces(self.raw_faces())
    }
}

/// A liquid family.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LiquidDefinition {
    /// Liquid code, e.g. `water`.
    pub code: String,
    /// Softness score of every variant. Lower wins collisions.
    #[serde(default = "default_liquid_replaceable")]
    pub replaceable: u16,
    /// Delay between a disturbance and the update.
    #[serde(default = "default_spread_delay")]
    pub spread_delay_ms: u32,
    /// Code of the liquid this one reacts with.
    #[serde(default)]
    pub collides_with: Option<String>,
    /// Block code a collided source turns into.
    #[serde(default)]
    pub source_replacement: Option<String>,
    /// Block code a collided flowing voxel turns into.
    #[serde(default)]
    pub flowing_replacement: Option<String>,
    /// Sound played on collision.
    #[serde(default)]
    pub collision_sound: Option<String>,
}

impl BlockDefinitions {
    /// Parses a JSON5 document.
    pub fn from_json5(text: &str) -> Result<Self, RegistryError> {
        Ok(serde_json5::from_str(text)?)
    }

    /// Parses a plain JSON document.
    pub fn from_json(text: &str) -> Result<Self, RegistryError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads a file, picking the parser from its extension (`.json` is plain
    /// JSON, anything else JSON5).
    pub fn from_path(path: &Path) -> Result<Self, RegistryError> {
        let text = fs::read_to_string(path)?;
        if path.extension().is_some_and(|ext| ext == "json") {
            Self::from_json(&text)
        } else {
            Self::from_json5(&text)
        }
    }

    /// The builtin definitions.
    pub fn builtin() -> Result<Self, RegistryError> {
        Self::from_json5(BUILTIN_BLOCKS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_barrier_forms() {
        let defs = BlockDefinitions::from_json5(
            r"{
                blocks: [
                    { code: 'stone', barrier: 1.0 },
                    { code: 'slab', barrier: { down: 1.0, north: 0.5 } },
                ],
            }",
        )
        .expect("definitions should parse");

        assert_eq!(defs.blocks.len(), 2);
        assert_eq!(defs.blocks[0].replaceable, 100);
        let slab = defs.blocks[1].barrier.to_heights();
        assert!(slab.is_side_solid(Direction::Down));
        assert!((slab.get(Direction::North) - 0.5).abs() < f32::EPSILON);
        assert!(slab.get(Direction::Up).abs() < f32::EPSILON);
    }

    #[test]
    fn test_liquid_defaults() {
        let defs = BlockDefinitions::from_json(r#"{"liquids": [{"code": "water"}]}"#)
            .expect("json should parse");
        let water = &defs.liquids[0];
        assert_eq!(water.replaceable, 9500);
        assert_eq!(water.spread_delay_ms, 150);
        assert!(water.collides_with.is_none());
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(BlockDefinitions::from_json5("{ blocks: [{ code: 'x', colour: 3 }] }").is_err());
    }

    #[test]
    fn test_builtin_parses() {
        let defs = BlockDefinitions::builtin().expect("builtin definitions should parse");
        assert!(defs.liquids.iter().any(|l| l.code == "water"));
        assert!(defs.liquids.iter().any(|l| l.code == "lava"));
    }
}
