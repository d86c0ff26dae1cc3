use std::fs;
use std::path::Path;

use map_scan::{probe_image, read_map, MapResources};

use crate::config::BuildSettings;
use crate::error::BuildError;
use crate::logging;

/// Ordered archive paths for one map. Shader names are listed as well even
/// though they name script entries rather than files; the archive writer
/// skips anything that is not a file under the base directory.
#[derive(Clone, Debug, Default)]
pub struct ResourceManifest {
    pub auxiliary: Vec<String>,
    pub lightmaps: Vec<String>,
    pub map: MapResources,
    pub extra: Vec<String>,
}

impl ResourceManifest {
    pub fn paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        paths.extend(self.auxiliary.iter().cloned());
        paths.extend(self.lightmaps.iter().cloned());
        paths.extend(self.map.textures.keys().map(str::to_string));
        paths.extend(self.map.sounds.keys().map(str::to_string));
        paths.extend(
            self.map
                .shader_files
                .iter()
                .map(|file| format!("scripts/{}", file)),
        );
        paths.extend(self.map.shader_names.iter().cloned());
        paths.extend(self.extra.iter().cloned());
        paths
    }
}

pub fn collect_resources(settings: &BuildSettings) -> Result<ResourceManifest, BuildError> {
    let base = settings.base_path.as_path();
    let name = settings.map_name.as_str();
    let Some(map_file) = get_map_file(base, name) else {
        return Err(BuildError::MissingMap(
            base.join("maps").join(format!("{}.map", name)),
        ));
    };

    let auxiliary: Vec<String> = [
        get_readme(base, name),
        get_cfg_file(base, name),
        Some(map_file),
        get_bsp_file(base, name),
        get_arena_file(base, name),
        get_levelshot(base, name),
    ]
    .into_iter()
    .flatten()
    .collect();

    let lightmaps = get_external_lightmaps(base, name)?;
    let map = read_map(name, base)?;
    logging::info(format!(
        "{}: {} textures, {} sounds, {} shaders in {} scripts",
        name,
        map.textures.len(),
        map.sounds.len(),
        map.shader_names.len(),
        map.shader_files.len()
    ));

    Ok(ResourceManifest {
        auxiliary,
        lightmaps,
        map,
        extra: settings.pack.extra_resources.clone(),
    })
}

fn probe_file(base: &Path, relative: String, label: &str) -> Option<String> {
    if base.join(&relative).is_file() {
        logging::info(format!("found {} file {}", label, relative));
        Some(relative)
    } else {
        logging::debug(format!("no {} file at {}", label, relative));
        None
    }
}

pub fn get_readme(base: &Path, map_name: &str) -> Option<String> {
    probe_file(base, format!("{}.txt", map_name), "readme")
}

pub fn get_cfg_file(base: &Path, map_name: &str) -> Option<String> {
    probe_file(base, format!("cfg-maps/{}.cfg", map_name), "cfg")
}

pub fn get_map_file(base: &Path, map_name: &str) -> Option<String> {
    probe_file(base, format!("maps/{}.map", map_name), "map")
}

pub fn get_bsp_file(base: &Path, map_name: &str) -> Option<String> {
    probe_file(base, format!("maps/{}.bsp", map_name), "bsp")
}

pub fn get_arena_file(base: &Path, map_name: &str) -> Option<String> {
    probe_file(base, format!("scripts/{}.arena", map_name), "arena")
}

pub fn get_levelshot(base: &Path, map_name: &str) -> Option<String> {
    let stem = base.join("levelshots").join(map_name);
    match probe_image(&stem) {
        Some(ext) => {
            let relative = format!("levelshots/{}.{}", map_name, ext);
            logging::info(format!("found levelshot {}", relative));
            Some(relative)
        }
        None => {
            logging::debug(format!("no levelshot for {}", map_name));
            None
        }
    }
}

/// Files directly inside `maps/<name>/`, sorted by name.
pub fn get_external_lightmaps(base: &Path, map_name: &str) -> Result<Vec<String>, BuildError> {
    let dir = base.join("maps").join(map_name);
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut names = Vec::new();
    for entry in fs::read_dir(&dir).map_err(|err| BuildError::io(&dir, err))? {
        let entry = entry.map_err(|err| BuildError::io(&dir, err))?;
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if !file_type.is_file() {
            continue;
        }
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names
        .into_iter()
        .map(|name| format!("maps/{}/{}", map_name, name))
        .collect())
}
