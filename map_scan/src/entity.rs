use std::path::{Path, PathBuf};

use crate::error::ScanError;
use crate::material::get_material;
use crate::model::resolve_model;
use crate::tally::Tally;

const ENTITY_MARKER: &str = "// entity";
const MODEL_CLASSNAME: &str = "misc_model";
const REMAP_KEY: &str = "_remap";

pub fn is_entity(line: &str) -> bool {
    line.to_lowercase().contains(ENTITY_MARKER)
}

/// Textures contributed by one buffered entity block.
///
/// A `_remap` line wins over everything else in the block. Otherwise a
/// `misc_model` entity is resolved through its model file, located under
/// `model_root`; the last `.ase`/`.obj` line of the block names the file.
pub fn parse_entity(lines: &[String], model_root: &Path) -> Result<Tally, ScanError> {
    let mut model_line = String::new();
    let mut is_model = false;
    for line in lines {
        if !is_model {
            is_model = line.contains(MODEL_CLASSNAME);
        }
        if line.contains(REMAP_KEY) {
            let mut textures = Tally::new();
            let texture = remap_texture(line);
            // An unresolvable remap still suppresses the model lookup.
            if !texture.is_empty() {
                textures.increment(texture);
            }
            return Ok(textures);
        } else if line.contains(".ase") {
            model_line = line.clone();
        } else if line.contains(".obj") {
            model_line = line.replacen(".obj", ".mtl", 1);
        }
    }

    if !is_model {
        return Ok(Tally::new());
    }
    let path = model_path(&model_line);
    if path.is_empty() {
        return Ok(Tally::new());
    }
    resolve_model(&model_file(model_root, &path))
}

/// Path after the `model` key with the surrounding quotes removed, or an
/// empty string when the line has no `model` token.
pub fn model_path(line: &str) -> String {
    match line.split_once("model") {
        Some((_, after)) => after.replacen('"', "", 3).trim().to_string(),
        None => String::new(),
    }
}

pub fn remap_texture(line: &str) -> String {
    get_material(line)
}

fn model_file(model_root: &Path, relative: &str) -> PathBuf {
    model_root.join(relative.replace('\\', "/"))
}
