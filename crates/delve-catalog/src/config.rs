use std::collections::HashMap;

use serde::Deserialize;

use crate::atlas::Tile;
use crate::designation::DrawBoxType;
use crate::types::TransitionKind;

#[derive(Deserialize, Debug, Default)]
pub struct CatalogConfig {
    #[serde(default)]
    pub voxel_types: Vec<VoxelTypeDef>,
    #[serde(default)]
    pub grass_types: Vec<GrassTypeDef>,
    #[serde(default)]
    pub designations: HashMap<String, DesignationDef>,
    /// Voxel type drawn by "put" build previews when a designation carries no tag.
    pub designation_voxel_type: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct VoxelTypeDef {
    pub id: Option<u8>,
    pub name: String,
    pub transparent: Option<bool>,
    pub emits_light: Option<bool>,
    pub can_ramp: Option<bool>,
    pub ramp_size: Option<f32>,
    pub tint: Option<[u8; 4]>,
    #[serde(default)]
    pub tiles: TilesDef,
    pub transitions: Option<TransitionKind>,
    pub transition_origin: Option<Tile>,
}

/// Face tile selection; `all` fills any slot not named explicitly.
#[derive(Deserialize, Debug, Default, Clone, Copy)]
pub struct TilesDef {
    pub all: Option<Tile>,
    pub top: Option<Tile>,
    pub bottom: Option<Tile>,
    pub side: Option<Tile>,
}

#[derive(Deserialize, Debug)]
pub struct GrassTypeDef {
    pub id: Option<u8>,
    pub name: String,
    pub tile: Tile,
    pub tint: Option<[u8; 4]>,
    pub fringe_precedence: Option<i32>,
    pub fringe_tiles: Option<Vec<Tile>>,
}

#[derive(Deserialize, Debug)]
pub struct DesignationDef {
    pub color: Option<[u8; 4]>,
    pub draw: Option<DrawBoxType>,
}
