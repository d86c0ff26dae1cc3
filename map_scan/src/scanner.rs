use std::fs;
use std::path::{Path, PathBuf};

use crate::entity::{is_entity, parse_entity};
use crate::error::ScanError;
use crate::material::get_material;
use crate::sound::add_sounds;
use crate::tally::Tally;

const BRUSH_MARKER: &str = "// brush";

pub fn is_brush(line: &str) -> bool {
    line.to_lowercase().contains(BRUSH_MARKER)
}

pub fn is_closing_bracket(line: &str) -> bool {
    line.contains('}')
}

/// Materials and sounds referenced directly by a map source.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MapReferences {
    pub materials: Tally,
    pub sounds: Tally,
}

/// Line classifier for `.map` sources.
///
/// Owns the entity buffer for one scan. Lines after a `// entity` marker
/// are buffered until a closing bracket, then resolved as one entity block;
/// a `// brush` marker drops back to reading brush faces.
#[derive(Debug)]
pub struct MapScanner {
    model_root: PathBuf,
    parsing_entity: bool,
    entity_lines: Vec<String>,
    references: MapReferences,
}

impl MapScanner {
    /// `model_root` is the directory entity model paths are relative to.
    pub fn new(model_root: impl Into<PathBuf>) -> Self {
        Self {
            model_root: model_root.into(),
            parsing_entity: false,
            entity_lines: Vec::new(),
            references: MapReferences::default(),
        }
    }

    pub fn is_parsing_entity(&self) -> bool {
        self.parsing_entity
    }

    pub fn buffered_lines(&self) -> &[String] {
        &self.entity_lines
    }

    pub fn references(&self) -> &MapReferences {
        &self.references
    }

    pub fn feed_line(&mut self, line: &str) -> Result<(), ScanError> {
        let materials = self.classify(line)?;
        if !materials.is_empty() {
            self.references.materials.overwrite_from(&materials);
        }
        add_sounds(line, &mut self.references.sounds);
        Ok(())
    }

    pub fn feed_str(&mut self, contents: &str) -> Result<(), ScanError> {
        for line in contents.lines() {
            self.feed_line(line)?;
        }
        Ok(())
    }

    pub fn finish(self) -> MapReferences {
        self.references
    }

    /// Materials contributed by a single line. Plain brush lines add one
    /// reference on top of the running count.
    fn classify(&mut self, line: &str) -> Result<Tally, ScanError> {
        let mut materials = Tally::new();
        if is_entity(line) {
            self.parsing_entity = true;
            self.entity_lines.clear();
        } else if is_brush(line) {
            self.parsing_entity = false;
        } else if is_closing_bracket(line) {
            if !self.entity_lines.is_empty() {
                materials = self.flush_entity()?;
            }
        } else if self.parsing_entity {
            self.entity_lines.push(line.to_string());
        } else {
            let material = get_material(line);
            if !material.is_empty() {
                let count = self.references.materials.get(&material).unwrap_or(0);
                materials.insert(material, count + 1);
            }
        }
        Ok(materials)
    }

    fn flush_entity(&mut self) -> Result<Tally, ScanError> {
        self.parsing_entity = false;
        let lines = std::mem::take(&mut self.entity_lines);
        parse_entity(&lines, &self.model_root)
    }
}

/// Scans one `.map` file with a fresh scanner.
pub fn scan_map(map_path: &Path, model_root: &Path) -> Result<MapReferences, ScanError> {
    let data = fs::read(map_path).map_err(|source| ScanError::MapRead {
        path: map_path.to_path_buf(),
        source,
    })?;
    let contents = String::from_utf8_lossy(&data);
    let mut scanner = MapScanner::new(model_root);
    scanner.feed_str(&contents)?;
    Ok(scanner.finish())
}
