//! Packs an id Tech 3 map and everything it references into a `.pk3`.
//!
//! [`build_pk3`] probes the auxiliary files next to the map, resolves its
//! textures, sounds and shaders through `map_scan`, and writes the result as
//! a zip archive under the configured output directory.
#![forbid(unsafe_code)]

mod archive;
mod config;
mod error;
pub mod logging;
mod resources;

use std::path::PathBuf;

pub use archive::{normalize_resource_path, write_pk3, Pk3Summary, SkipReason, SkippedResource};
pub use config::{
    BuildSettings, Compression, PackConfig, PackConfigValidation, SettingsOverrides, ENV_BASE_PATH,
    ENV_CONFIG, ENV_MAP_NAME, ENV_OUT_DIR,
};
pub use error::BuildError;
pub use resources::{
    collect_resources, get_arena_file, get_bsp_file, get_cfg_file, get_external_lightmaps,
    get_levelshot, get_map_file, get_readme, ResourceManifest,
};

#[derive(Clone, Debug)]
pub struct BuildReport {
    pub archive_path: PathBuf,
    /// Resource paths offered to the archive writer, duplicates included.
    pub resource_count: usize,
    pub files_written: usize,
    pub skipped: Vec<SkippedResource>,
}

pub fn build_pk3(settings: &BuildSettings) -> Result<BuildReport, BuildError> {
    let manifest = collect_resources(settings)?;
    let resources = manifest.paths();
    let archive_path = settings.archive_path();
    let summary = write_pk3(
        &settings.base_path,
        &resources,
        &settings.map_name,
        &archive_path,
        settings.pack.compression,
    )?;
    logging::info(format!(
        "{}: packed {} of {} resources into {}",
        settings.map_name,
        summary.files.len(),
        resources.len(),
        archive_path.display()
    ));
    Ok(BuildReport {
        archive_path,
        resource_count: resources.len(),
        files_written: summary.files.len(),
        skipped: summary.skipped,
    })
}
