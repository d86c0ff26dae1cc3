use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::ScanError;
use crate::material::get_material;
use crate::tally::Tally;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModelFormat {
    /// ASCII scene export, textures on `*BITMAP` lines.
    Ase,
    /// Material library next to an `.obj` mesh, textures on `map_Kd` lines.
    Mtl,
}

impl ModelFormat {
    pub fn from_path(path: &Path) -> Self {
        let is_mtl = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("mtl"))
            .unwrap_or(false);
        if is_mtl {
            ModelFormat::Mtl
        } else {
            ModelFormat::Ase
        }
    }

    pub fn texture_on_line(self, line: &str) -> String {
        match self {
            ModelFormat::Ase => ase_texture(line),
            ModelFormat::Mtl => obj_texture(line),
        }
    }
}

fn bitmap_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\*BITMAP[^_]").expect("bitmap pattern is valid"))
}

/// Collects every texture referenced by an `.ase` or `.mtl` file.
pub fn resolve_model(path: &Path) -> Result<Tally, ScanError> {
    let data = fs::read(path).map_err(|source| ScanError::ModelRead {
        path: path.to_path_buf(),
        source,
    })?;
    let contents = String::from_utf8_lossy(&data);
    let format = ModelFormat::from_path(path);
    let mut textures = Tally::new();
    for line in contents.lines() {
        let texture = format.texture_on_line(line);
        if !texture.is_empty() {
            textures.increment(texture);
        }
    }
    Ok(textures)
}

pub fn obj_texture(line: &str) -> String {
    if !line.contains("map_Kd") {
        return String::new();
    }
    texture_after_textures_segment(line)
}

pub fn ase_texture(line: &str) -> String {
    if !bitmap_pattern().is_match(line) {
        return String::new();
    }
    texture_after_textures_segment(line)
}

fn texture_after_textures_segment(line: &str) -> String {
    let Some((_, after)) = line.trim().split_once("textures") else {
        return String::new();
    };
    let texture = after.replace('\\', "/").replace('"', "");
    get_material(&texture)
}
