use std::io;

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::blocks::{BarrierHeights, BlockType, BlockTypeId};
use crate::definitions::{BlockDefinitions, LiquidDefinition};
use crate::liquid::{FlowDirection, LiquidConfig, LiquidId, LiquidVariant, MAX_LEVEL};

/// Replaceability of the implicit `air` type.
const AIR_REPLACEABLE: u16 = 9999;

/// Block types generated per liquid.
const VARIANTS_PER_LIQUID: usize = MAX_LEVEL as usize * FlowDirection::ALL.len();

/// Errors raised while loading or building a registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A JSON5 definitions document failed to parse.
    #[error("failed to parse block definitions: {0}")]
    Parse(#[from] serde_json5::Error),
    /// A plain JSON definitions document failed to parse.
    #[error("failed to parse block definitions: {0}")]
    Json(#[from] serde_json::Error),
    /// A definitions file could not be read.
    #[error("failed to read block definitions: {0}")]
    Io(#[from] io::Error),
    /// Two definitions produce the same code.
    #[error("duplicate block code `{0}`")]
    DuplicateCode(String),
    /// A barrier height is not a number in `[0, 1]`.
    #[error("block `{code}` has a barrier height outside [0, 1]")]
    InvalidBarrier {
        /// Offending block code.
        code: String,
    },
    /// More block types than fit in a [`BlockTypeId`].
    #[error("too many block types")]
    TooManyBlocks,
}

struct LiquidEntry {
    config: LiquidConfig,
    first_variant: BlockTypeId,
}

/// The frozen capability table for all voxel types.
///
/// Id `0` is always `air`. Solids follow in definition order, then each
/// liquid's variants as one contiguous run.
pub struct BlockRegistry {
    blocks: Vec<BlockType>,
    by_code: FxHashMap<String, BlockTypeId>,
    liquids: Vec<LiquidEntry>,
    liquids_by_code: FxHashMap<String, LiquidId>,
}

impl BlockRegistry {
    /// Builds a registry from parsed definitions.
    ///
    /// References between definitions (`collides_with`, replacements) that
    /// name nothing are logged and dropped.
    pub fn from_definitions(definitions: &BlockDefinitions) -> Result<Self, RegistryError> {
        let mut registry = Self {
            blocks: Vec::new(),
            by_code: FxHashMap::default(),
            liquids: Vec::with_capacity(definitions.liquids.len()),
            liquids_by_code: FxHashMap::default(),
        };

        registry.push(BlockType {
            id: BlockTypeId::AIR,
            code: "air".to_string(),
            replaceable: AIR_REPLACEABLE,
            barrier: BarrierHeights::NONE,
            breaks_if_floating: false,
            liquid: None,
        })?;

        for solid in &definitions.blocks {
            let raw = solid.barrier.raw_faces();
            if raw.iter().any(|h| !(0.0..=1.0).contains(h)) {
                return Err(RegistryError::InvalidBarrier {
                    code: solid.code.clone(),
                });
            }
            registry.push(BlockType {
                id: registry.next_id()?,
                code: solid.code.clone(),
                replaceable: solid.replaceable,
                barrier: solid.barrier.to_heights(),
                breaks_if_floating: solid.breaks_if_floating,
                liquid: None,
            })?;
        }

        for definition in &definitions.liquids {
            registry.register_liquid(definition)?;
        }

        for (index, definition) in definitions.liquids.iter().enumerate() {
            let collides_with = definition
                .collides_with
                .as_deref()
                .and_then(|code| registry.resolve_liquid(&definition.code, code));
            let source_replacement = definition
                .source_replacement
                .as_deref()
                .and_then(|code| registry.resolve_block(&definition.code, code));
            let flowing_replacement = definition
                .flowing_replacement
                .as_deref()
                .and_then(|code| registry.resolve_block(&definition.code, code));

            let config = &mut registry.liquids[index].config;
            config.collides_with = collides_with;
            config.source_replacement = source_replacement;
            config.flowing_replacement = flowing_replacement;
        }

        log::debug!(
            "Block registry built with {} types ({} liquids)",
            registry.blocks.len(),
            registry.liquids.len()
        );
        Ok(registry)
    }

    /// Builds the registry from the builtin definitions.
    pub fn builtin() -> Result<Self, RegistryError> {
        Self::from_definitions(&BlockDefinitions::builtin()?)
    }

    fn next_id(&self) -> Result<BlockTypeId, RegistryError> {
        u16::try_from(self.blocks.len())
            .map(BlockTypeId)
            .map_err(|_| RegistryError::TooManyBlocks)
    }

    fn push(&mut self, block: BlockType) -> Result<(), RegistryError> {
        if self.by_code.contains_key(&block.code) {
            return Err(RegistryError::DuplicateCode(block.code));
        }
        self.by_code.insert(block.code.clone(), block.id);
        self.blocks.push(block);
        Ok(())
    }

    fn register_liquid(&mut self, definition: &LiquidDefinition) -> Result<(), RegistryError> {
        if self.liquids_by_code.contains_key(&definition.code) {
            return Err(RegistryError::DuplicateCode(definition.code.clone()));
        }
        let liquid = LiquidId(
            u16::try_from(self.liquids.len()).map_err(|_| RegistryError::TooManyBlocks)?,
        );
        let first_variant = self.next_id()?;

        // Order must match `liquid_block`.
        for level in 1..=MAX_LEVEL {
            for flow in FlowDirection::ALL {
                self.push(BlockType {
                    id: self.next_id()?,
                    code: format!("{}-{}-{level}", definition.code, flow.suffix()),
                    replaceable: definition.replaceable,
                    barrier: BarrierHeights::NONE,
                    breaks_if_floating: false,
                    liquid: Some(LiquidVariant {
                        liquid,
                        level,
                        flow,
                    }),
                })?;
            }
        }

        self.liquids.push(LiquidEntry {
            config: LiquidConfig {
                code: definition.code.clone(),
                replaceable: definition.replaceable,
                spread_delay_ms: definition.spread_delay_ms,
                collides_with: None,
                source_replacement: None,
                flowing_replacement: None,
                collision_sound: definition.collision_sound.clone(),
            },
            first_variant,
        });
        self.liquids_by_code.insert(definition.code.clone(), liquid);
        Ok(())
    }

    fn resolve_liquid(&self, owner: &str, code: &str) -> Option<LiquidId> {
        let found = self.liquid_by_code(code);
        if found.is_none() {
            log::warn!("Liquid `{owner}` collides with unknown liquid `{code}`, ignoring");
        }
        found
    }

    fn resolve_block(&self, owner: &str, code: &str) -> Option<BlockTypeId> {
        let found = self.by_code(code);
        if found.is_none() {
            log::warn!("Liquid `{owner}` references unknown block `{code}`, ignoring");
        }
        found
    }

    /// Looks up a type. Unknown ids read as `air`.
    #[must_use]
    pub fn get(&self, id: BlockTypeId) -> &BlockType {
        self.blocks
            .get(usize::from(id.0))
            .or_else(|| self.blocks.first())
            .unwrap_or(&AIR_FALLBACK)
    }

    /// Looks up a type id by code.
    #[must_use]
    pub fn by_code(&self, code: &str) -> Option<BlockTypeId> {
        self.by_code.get(code).copied()
    }

    /// The configuration of a liquid.
    ///
    /// # Panics
    /// If the id was not issued by this registry.
    #[must_use]
    pub fn liquid(&self, liquid: LiquidId) -> &LiquidConfig {
        &self.liquids[usize::from(liquid.0)].config
    }

    /// Looks up a liquid by its family code.
    #[must_use]
    pub fn liquid_by_code(&self, code: &str) -> Option<LiquidId> {
        self.liquids_by_code.get(code).copied()
    }

    /// The block type for a liquid at a level and flow. Level `0` is `air`,
    /// levels above [`MAX_LEVEL`] are treated as sources.
    #[must_use]
    pub fn liquid_block(&self, liquid: LiquidId, level: u8, flow: FlowDirection) -> BlockTypeId {
        if level == 0 {
            return BlockTypeId::AIR;
        }
        let Some(entry) = self.liquids.get(usize::from(liquid.0)) else {
            return BlockTypeId::AIR;
        };
        let level = level.min(MAX_LEVEL);
        let offset = usize::from(level - 1) * FlowDirection::ALL.len() + flow as usize;
        debug_assert!(offset < VARIANTS_PER_LIQUID);
        BlockTypeId(entry.first_variant.0 + offset as u16)
    }

    /// All registered liquid ids.
    pub fn liquids(&self) -> impl Iterator<Item = LiquidId> + '_ {
        (0..self.liquids.len()).map(|index| LiquidId(index as u16))
    }

    /// All registered types in id order.
    pub fn iter(&self) -> impl Iterator<Item = &BlockType> {
        self.blocks.iter()
    }

    /// Number of registered types, `air` included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Never true; `air` is always registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

static AIR_FALLBACK: BlockType = BlockType {
    id: BlockTypeId::AIR,
    code: String::new(),
    replaceable: AIR_REPLACEABLE,
    barrier: BarrierHeights::NONE,
    breaks_if_floating: false,
    liquid: None,
};

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> BlockRegistry {
        BlockRegistry::builtin().expect("builtin registry should build")
    }

    #[test]
    fn test_air_is_first() {
        let registry = registry();
        let air = registry.get(BlockTypeId::AIR);
        assert_eq!(air.code, "air");
        assert!(air.is_soft());
        assert!(!air.is_liquid());
    }

    #[test]
    fn test_liquid_variants_expand() {
        let registry = registry();
        let water = registry.liquid_by_code("water").expect("water registered");

        for level in 1..=MAX_LEVEL {
            for flow in FlowDirection::ALL {
                let id = registry.liquid_block(water, level, flow);
                let block = registry.get(id);
                assert_eq!(block.code, format!("water-{}-{level}", flow.suffix()));
                let variant = block.liquid.expect("variant is a liquid");
                assert_eq!(variant.liquid, water);
                assert_eq!(variant.level, level);
                assert_eq!(variant.flow, flow);
            }
        }
        assert_eq!(
            registry.liquid_block(water, 0, FlowDirection::Still),
            BlockTypeId::AIR
        );
    }

    #[test]
    fn test_collision_references_resolve() {
        let registry = registry();
        let lava = registry.liquid_by_code("lava").expect("lava registered");
        let water = registry.liquid_by_code("water").expect("water registered");
        let config = registry.liquid(lava);

        assert_eq!(config.collides_with, Some(water));
        assert_eq!(config.source_replacement, registry.by_code("obsidian"));
        assert_eq!(config.flowing_replacement, registry.by_code("pumice"));
        assert_eq!(config.collision_sound.as_deref(), Some("sizzle"));
        assert!(registry.liquid(water).collides_with.is_none());
    }

    #[test]
    fn test_unknown_reference_is_dropped() {
        let defs = BlockDefinitions::from_json5(
            "{ liquids: [{ code: 'slime', collides_with: 'honey', source_replacement: 'gold' }] }",
        )
        .expect("definitions should parse");
        let registry = BlockRegistry::from_definitions(&defs).expect("registry should build");
        let slime = registry.liquid_by_code("slime").expect("slime registered");
        assert!(registry.liquid(slime).collides_with.is_none());
        assert!(registry.liquid(slime).source_replacement.is_none());
    }

    #[test]
    fn test_duplicate_code_rejected() {
        let defs = BlockDefinitions::from_json5("{ blocks: [{ code: 'stone' }, { code: 'stone' }] }")
            .expect("definitions should parse");
        assert!(matches!(
            BlockRegistry::from_definitions(&defs),
            Err(RegistryError::DuplicateCode(code)) if code == "stone"
        ));

        let defs = BlockDefinitions::from_json5("{ blocks: [{ code: 'air' }] }")
            .expect("definitions should parse");
        assert!(BlockRegistry::from_definitions(&defs).is_err());
    }

    #[test]
    fn test_invalid_barrier_rejected() {
        let defs = BlockDefinitions::from_json5("{ blocks: [{ code: 'odd', barrier: 1.5 }] }")
            .expect("definitions should parse");
        assert!(matches!(
            BlockRegistry::from_definitions(&defs),
            Err(RegistryError::InvalidBarrier { .. })
        ));
    }

    #[test]
    fn test_unknown_id_reads_as_air() {
        let registry = registry();
        assert_eq!(registry.get(BlockTypeId(u16::MAX)).id, BlockTypeId::AIR);
    }
}
