//! Mesher switches and the per-request view filter, loaded from TOML.

use std::error::Error;
use std::fs;
use std::path::Path;

use delve_catalog::{DesignationType, Tile};
use serde::Deserialize;

/// Global meshing switches.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct MeshSettings {
    /// Recompute ramp corners of a slice (and its halo) before building it.
    pub calculate_ramps: bool,
    /// Drive the slice decorator alongside geometry builds.
    pub grass_motes: bool,
    /// Leave out the fog placeholder drawn over unexplored tops.
    pub debug_hide_slice_top: bool,
    /// Half-width of the hashed per-vertex jitter; 0 disables it.
    pub vertex_noise_amplitude: f32,
    /// Atlas tile sampled by fog placeholders.
    pub fog_tile: Tile,
}

impl Default for MeshSettings {
    fn default() -> Self {
        Self {
            calculate_ramps: true,
            grass_motes: false,
            debug_hide_slice_top: false,
            vertex_noise_amplitude: 0.0,
            fog_tile: Tile::new(12, 0),
        }
    }
}

/// What a viewer wants overlaid on the terrain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewSettings {
    /// A designation is drawn when every bit of its kind is in this mask.
    pub visible_designations: DesignationType,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            visible_designations: DesignationType::ALL,
        }
    }
}

impl ViewSettings {
    pub fn shows(&self, kind: DesignationType) -> bool {
        self.visible_designations.contains(kind)
    }
}

#[derive(Deserialize, Default)]
struct SettingsFile {
    #[serde(default)]
    mesh: MeshSettings,
    view: Option<ViewDef>,
}

#[derive(Deserialize, Default)]
struct ViewDef {
    visible_designations: Option<Vec<String>>,
}

/// Parses a settings file with optional `[mesh]` and `[view]` tables.
pub fn settings_from_toml_str(toml_str: &str) -> Result<(MeshSettings, ViewSettings), Box<dyn Error>> {
    let file: SettingsFile = toml::from_str(toml_str)?;
    let mut view = ViewSettings::default();
    if let Some(names) = file.view.and_then(|v| v.visible_designations) {
        view.visible_designations = DesignationType::mask_from_names(names.iter().map(String::as_str))
            .ok_or_else(|| format!("unknown designation name in {names:?}"))?;
    }
    if !file.mesh.vertex_noise_amplitude.is_finite() || file.mesh.vertex_noise_amplitude < 0.0 {
        return Err(format!(
            "vertex_noise_amplitude must be a non-negative number, got {}",
            file.mesh.vertex_noise_amplitude
        )
        .into());
    }
    log::debug!("mesh settings {:?} view {:?}", file.mesh, view);
    Ok((file.mesh, view))
}

pub fn load_settings(path: impl AsRef<Path>) -> Result<(MeshSettings, ViewSettings), Box<dyn Error>> {
    let s = fs::read_to_string(path)?;
    settings_from_toml_str(&s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let (mesh, view) = settings_from_toml_str("").unwrap();
        assert_eq!(mesh, MeshSettings::default());
        assert_eq!(view, ViewSettings::default());
        assert!(mesh.calculate_ramps);
    }

    #[test]
    fn partial_tables_override_only_named_keys() {
        let (mesh, view) = settings_from_toml_str(
            r#"
            [mesh]
            grass_motes = true
            fog_tile = [3, 4]
            [view]
            visible_designations = ["dig", "put"]
            "#,
        )
        .unwrap();
        assert!(mesh.grass_motes && mesh.calculate_ramps);
        assert_eq!(mesh.fog_tile, Tile::new(3, 4));
        assert!(view.shows(DesignationType::DIG));
        assert!(view.shows(DesignationType::PUT));
        assert!(!view.shows(DesignationType::CHOP));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(settings_from_toml_str("[view]\nvisible_designations = [\"nope\"]").is_err());
        assert!(settings_from_toml_str("[mesh]\nvertex_noise_amplitude = -1.0").is_err());
    }
}
