use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::Path;

use crate::config::{CatalogConfig, DesignationDef, GrassTypeDef, VoxelTypeDef};
use crate::designation::{DesignationProperties, DesignationType};
use crate::types::{FaceTiles, GrassType, GrassTypeId, VoxelType, VoxelTypeId};

const MAXIMUM_VOXEL_TYPES: usize = 256;
const MAXIMUM_GRASS_TYPES: usize = 16;
const WHITE: [u8; 4] = [255, 255, 255, 255];

/// Lookup tables for every material the mesher needs to know about.
///
/// Id 0 is reserved in both voxel and grass tables and means "none".
#[derive(Clone, Debug)]
pub struct Catalog {
    voxel_types: Vec<Option<VoxelType>>,
    by_name: HashMap<String, VoxelTypeId>,
    grass_types: Vec<Option<GrassType>>,
    grass_by_name: HashMap<String, GrassTypeId>,
    designations: HashMap<DesignationType, DesignationProperties>,
    designation_voxel_type: Option<VoxelTypeId>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            voxel_types: vec![None; MAXIMUM_VOXEL_TYPES],
            by_name: HashMap::new(),
            grass_types: vec![None; MAXIMUM_GRASS_TYPES],
            grass_by_name: HashMap::new(),
            designations: HashMap::new(),
            designation_voxel_type: None,
        }
    }
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn voxel_type(&self, id: VoxelTypeId) -> Option<&VoxelType> {
        self.voxel_types.get(id as usize).and_then(Option::as_ref)
    }

    pub fn voxel_type_id(&self, name: &str) -> Option<VoxelTypeId> {
        self.by_name.get(name).copied()
    }

    pub fn voxel_type_by_name(&self, name: &str) -> Option<&VoxelType> {
        self.voxel_type_id(name).and_then(|id| self.voxel_type(id))
    }

    #[inline]
    pub fn grass_type(&self, id: GrassTypeId) -> Option<&GrassType> {
        self.grass_types.get(id as usize).and_then(Option::as_ref)
    }

    pub fn grass_type_id(&self, name: &str) -> Option<GrassTypeId> {
        self.grass_by_name.get(name).copied()
    }

    /// Falls back to default properties for designation types the catalog does not style.
    pub fn designation_properties(&self, kind: DesignationType) -> DesignationProperties {
        self.designations.get(&kind).copied().unwrap_or_default()
    }

    pub fn designation_voxel_type(&self) -> Option<&VoxelType> {
        self.designation_voxel_type.and_then(|id| self.voxel_type(id))
    }

    pub fn voxel_types(&self) -> impl Iterator<Item = &VoxelType> {
        self.voxel_types.iter().flatten()
    }

    pub fn grass_types(&self) -> impl Iterator<Item = &GrassType> {
        self.grass_types.iter().flatten()
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: CatalogConfig = toml::from_str(toml_str)?;
        Self::from_config(cfg)
    }

    pub fn from_config(cfg: CatalogConfig) -> Result<Self, Box<dyn Error>> {
        let mut cat = Catalog::new();
        let mut next_id = 1usize;
        for def in cfg.voxel_types {
            let id = def.id.map(usize::from).unwrap_or(next_id);
            cat.insert_voxel_type(id, def)?;
            next_id = next_id.max(id + 1);
        }
        let mut next_id = 1usize;
        for def in cfg.grass_types {
            let id = def.id.map(usize::from).unwrap_or(next_id);
            cat.insert_grass_type(id, def)?;
            next_id = next_id.max(id + 1);
        }
        // HashMap iteration order is nondeterministic; sort so load errors are stable.
        let mut designations: Vec<(String, DesignationDef)> = cfg.designations.into_iter().collect();
        designations.sort_by(|a, b| a.0.cmp(&b.0));
        for (name, def) in designations {
            let kind = DesignationType::from_name(&name)
                .ok_or_else(|| format!("unknown designation type '{name}'"))?;
            let defaults = DesignationProperties::default();
            cat.designations.insert(
                kind,
                DesignationProperties {
                    color: def.color.unwrap_or(defaults.color),
                    draw: def.draw.unwrap_or(defaults.draw),
                },
            );
        }
        if let Some(name) = cfg.designation_voxel_type {
            let id = cat
                .voxel_type_id(&name)
                .ok_or_else(|| format!("designation_voxel_type '{name}' is not a voxel type"))?;
            cat.designation_voxel_type = Some(id);
        }
        log::debug!(
            "catalog loaded: {} voxel types, {} grass types, {} designation styles",
            cat.by_name.len(),
            cat.grass_by_name.len(),
            cat.designations.len()
        );
        Ok(cat)
    }

    fn insert_voxel_type(&mut self, id: usize, def: VoxelTypeDef) -> Result<(), Box<dyn Error>> {
        if id == 0 || id >= MAXIMUM_VOXEL_TYPES {
            return Err(format!("voxel type '{}' has invalid id {id}", def.name).into());
        }
        if self.voxel_types[id].is_some() {
            return Err(format!("voxel type id {id} assigned twice ('{}')", def.name).into());
        }
        if self.by_name.contains_key(&def.name) {
            return Err(format!("voxel type '{}' defined twice", def.name).into());
        }
        let fallback = def.tiles.all.unwrap_or_default();
        let tiles = FaceTiles {
            top: def.tiles.top.unwrap_or(fallback),
            bottom: def.tiles.bottom.unwrap_or(fallback),
            side: def.tiles.side.unwrap_or(fallback),
        };
        let transitions = match (def.transitions, def.transition_origin) {
            (Some(kind), Some(origin)) => Some((kind, origin)),
            (Some(_), None) => {
                return Err(format!("voxel type '{}' has transitions but no transition_origin", def.name).into());
            }
            (None, _) => None,
        };
        let ty = VoxelType {
            id: id as VoxelTypeId,
            name: def.name.clone(),
            transparent: def.transparent.unwrap_or(false),
            emits_light: def.emits_light.unwrap_or(false),
            can_ramp: def.can_ramp.unwrap_or(false),
            ramp_size: def.ramp_size.unwrap_or(0.5),
            tint: def.tint.unwrap_or(WHITE),
            tiles,
            transitions,
        };
        self.by_name.insert(def.name, ty.id);
        self.voxel_types[id] = Some(ty);
        Ok(())
    }

    fn insert_grass_type(&mut self, id: usize, def: GrassTypeDef) -> Result<(), Box<dyn Error>> {
        if id == 0 || id >= MAXIMUM_GRASS_TYPES {
            return Err(format!("grass type '{}' has invalid id {id}", def.name).into());
        }
        if self.grass_types[id].is_some() || self.grass_by_name.contains_key(&def.name) {
            return Err(format!("grass type '{}' (id {id}) defined twice", def.name).into());
        }
        let fringe_tiles = match def.fringe_tiles {
            None => None,
            Some(v) => Some(<[_; 8]>::try_from(v.as_slice()).map_err(|_| {
                format!("grass type '{}' needs exactly 8 fringe tiles, got {}", def.name, v.len())
            })?),
        };
        let ty = GrassType {
            id: id as GrassTypeId,
            name: def.name.clone(),
            tile: def.tile,
            tint: def.tint.unwrap_or(WHITE),
            fringe_precedence: def.fringe_precedence.unwrap_or(0),
            fringe_tiles,
        };
        self.grass_by_name.insert(def.name, ty.id);
        self.grass_types[id] = Some(ty);
        Ok(())
    }
}
