//! Surface mesh extraction for voxel chunks, built and cached one horizontal slice at a time.
#![forbid(unsafe_code)]

pub mod box_tables;
mod builder;
pub mod designations;
mod emit;
mod error;
pub mod faces;
pub mod fringe;
pub mod lighting;
pub mod motes;
mod noise;
pub mod ramps;
pub mod settings;
pub mod transitions;

pub use box_tables::BoxTables;
pub use builder::{ChunkMesh, MeshBuilder, MeshStats};
pub use error::MeshError;
pub use lighting::VertexLight;
pub use motes::{GrassMotes, Mote, SliceDecorator};
pub use noise::vertex_jitter;
pub use settings::{MeshSettings, ViewSettings, load_settings, settings_from_toml_str};
