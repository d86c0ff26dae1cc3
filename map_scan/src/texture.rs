use std::fmt;
use std::path::{Path, PathBuf};

use crate::tally::Tally;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageExtension {
    Jpg,
    Tga,
}

impl ImageExtension {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageExtension::Jpg => "jpg",
            ImageExtension::Tga => "tga",
        }
    }
}

impl fmt::Display for ImageExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Probes `<stem>.jpg`, then `<stem>.tga`.
pub fn probe_image(stem: &Path) -> Option<ImageExtension> {
    [ImageExtension::Jpg, ImageExtension::Tga]
        .into_iter()
        .find(|ext| with_extension(stem, *ext).is_file())
}

fn with_extension(stem: &Path, ext: ImageExtension) -> PathBuf {
    let mut raw = stem.as_os_str().to_owned();
    raw.push(".");
    raw.push(ext.as_str());
    PathBuf::from(raw)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TextureLookup {
    /// Relative archive path, `textures/<name>.<ext>`.
    Found(String),
    /// No image on disk; carries the bare material name.
    Missing(String),
}

impl TextureLookup {
    pub fn exists(&self) -> bool {
        matches!(self, TextureLookup::Found(_))
    }

    pub fn path(&self) -> &str {
        match self {
            TextureLookup::Found(path) | TextureLookup::Missing(path) => path,
        }
    }
}

pub fn resolve_texture(material: &str, base: &Path) -> TextureLookup {
    let stem = base.join("textures").join(material);
    match probe_image(&stem) {
        Some(ext) => TextureLookup::Found(format!("textures/{}.{}", material, ext)),
        None => TextureLookup::Missing(material.to_string()),
    }
}

/// Direct map references split into image files and script names. A name
/// with an image on disk may still be a shader, so it lands in both.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MaterialsManifest {
    pub textures: Tally,
    pub shaders: Tally,
}

pub fn sort_materials(materials: &Tally, base: &Path) -> MaterialsManifest {
    let mut sorted = MaterialsManifest::default();
    for material in materials.keys() {
        if let TextureLookup::Found(path) = resolve_texture(material, base) {
            sorted.textures.increment(path);
        }
        sorted.shaders.increment(material);
    }
    sorted
}

/// Keeps only materials with an image on disk, keyed by their archive path.
pub fn attach_texture_extensions(materials: &Tally, base: &Path) -> Tally {
    let mut textures = Tally::new();
    for material in materials.keys() {
        if let TextureLookup::Found(path) = resolve_texture(material, base) {
            textures.increment(path);
        }
    }
    textures
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{temp_dir, write_file};

    fn texture_fixture() -> PathBuf {
        let base = temp_dir("textures");
        write_file(&base, "textures/testmap/test_texture.jpg", "jpg");
        write_file(&base, "textures/testmap/test_texture.tga", "tga");
        write_file(&base, "textures/testmap/test_texture_3.tga", "tga");
        base
    }

    #[test]
    fn jpg_wins_over_tga() {
        let base = texture_fixture();
        assert_eq!(
            resolve_texture("testmap/test_texture", &base),
            TextureLookup::Found("textures/testmap/test_texture.jpg".to_string())
        );
        assert_eq!(
            resolve_texture("testmap/test_texture_3", &base),
            TextureLookup::Found("textures/testmap/test_texture_3.tga".to_string())
        );
    }

    #[test]
    fn missing_texture_keeps_bare_name() {
        let base = texture_fixture();
        let lookup = resolve_texture("testmap/test_texture_2", &base);
        assert!(!lookup.exists());
        assert_eq!(lookup.path(), "testmap/test_texture_2");
    }

    #[test]
    fn probe_reports_extension() {
        let base = texture_fixture();
        let stem = base.join("textures/testmap/test_texture_3");
        assert_eq!(probe_image(&stem), Some(ImageExtension::Tga));
        assert_eq!(probe_image(&base.join("textures/none")), None);
    }

    #[test]
    fn sort_materials_splits_textures_and_shaders() {
        let base = texture_fixture();
        let input: Tally = [
            ("testmap/test_texture_3", 1),
            ("testmap/test_shader", 1),
            ("testmap/test_texture", 1),
        ]
        .into_iter()
        .collect();
        let sorted = sort_materials(&input, &base);
        let textures: Tally = [
            ("textures/testmap/test_texture_3.tga", 1),
            ("textures/testmap/test_texture.jpg", 1),
        ]
        .into_iter()
        .collect();
        assert_eq!(sorted.textures, textures);
        assert_eq!(sorted.shaders, input);
    }

    #[test]
    fn attach_extensions_drops_pure_shaders() {
        let base = texture_fixture();
        let input: Tally = [
            ("testmap/test_texture_3", 4),
            ("testmap/test_shader", 1),
            ("testmap/test_texture", 2),
        ]
        .into_iter()
        .collect();
        let expected: Tally = [
            ("textures/testmap/test_texture_3.tga", 1),
            ("textures/testmap/test_texture.jpg", 1),
        ]
        .into_iter()
        .collect();
        assert_eq!(attach_texture_extensions(&input, &base), expected);
    }
}
