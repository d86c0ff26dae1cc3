//! Resource discovery for id Tech 3 `.map` sources.
//!
//! Discovery runs in two stages. [`scan_map`] walks the map text and
//! collects the materials and sounds it references directly (brush faces,
//! entity remaps, model files). [`read_map`] then expands those materials
//! through the shader scripts and keeps the textures that exist on disk.
#![forbid(unsafe_code)]

mod entity;
mod error;
mod material;
mod model;
mod scanner;
mod shader;
mod sound;
mod tally;
mod texture;

use std::path::Path;

pub use entity::{is_entity, model_path, parse_entity, remap_texture};
pub use error::ScanError;
pub use material::{
    find_path_token, format_path, get_material, is_custom_material, BUILTIN_NAMESPACES,
};
pub use model::{ase_texture, obj_texture, resolve_model, ModelFormat};
pub use scanner::{is_brush, is_closing_bracket, scan_map, MapReferences, MapScanner};
pub use shader::{
    combine_textures_from_shaders, extract_textures_from_used_shaders, is_shader_name,
    parse_shader_file, shader_is_used, Shader, ShaderResolution,
};
pub use sound::{add_sounds, get_sound};
pub use tally::Tally;
pub use texture::{
    attach_texture_extensions, probe_image, resolve_texture, sort_materials, ImageExtension,
    MaterialsManifest, TextureLookup,
};

/// Everything a map needs from the game directory, as archive paths
/// (textures, sounds) and script names.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MapResources {
    /// `textures/<name>.<ext>` for every texture found on disk.
    pub textures: Tally,
    pub sounds: Tally,
    pub shader_names: Vec<String>,
    pub shader_files: Vec<String>,
    /// Materials referenced directly by the map, before shader expansion.
    pub direct_materials: Tally,
}

/// Resolves `<base>/maps/<map_name>.map` against the textures and
/// `<base>/scripts` shaders of `base`.
pub fn read_map(map_name: &str, base: &Path) -> Result<MapResources, ScanError> {
    let map_path = base.join("maps").join(format!("{}.map", map_name));
    let references = scan_map(&map_path, base)?;
    let shaders = extract_textures_from_used_shaders(&references.materials, &base.join("scripts"))?;
    let textures = attach_texture_extensions(&shaders.textures, base);
    Ok(MapResources {
        textures,
        sounds: references.sounds,
        shader_names: shaders.shader_names,
        shader_files: shaders.shader_files,
        direct_materials: references.materials,
    })
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{temp_dir, write_file};

    const TESTMAP: &str = "\
// entity 0
{
\"classname\" \"worldspawn\"
\"message\" \"Test map\"
// brush 0
{
( 104 400 176 ) ( 112 400 192 ) ( 104 272 176 ) common/caulk 32 0 0 0.5 0.5 134217728 0 0
( 96 80 192 ) ( 240 80 128 ) ( 240 80 192 ) testmap/test_texture 0 0 0 0.28 0.28 134217728 0 0
( 96 64 192 ) ( 240 64 128 ) ( 96 64 128 ) testmap/test_shader 0 0 0 0.25 0.25 134217728 0 0
( 216 -64 120 ) ( 200 -192 128 ) ( 216 -192 120 ) testmap/test_texture_3 0 32 0 0.5 0.5 134217728 0 0
}
}
// entity 1
{
\"classname\" \"misc_model\"
\"origin\" \"-924 -4 536\"
\"model\" \"maps/models/test-model.ase\"
\"angles\" \"-0 0 -180\"
}
// entity 2
{
\"classname\" \"target_speaker\"
\"noise\" \"sound/testmap/sound-file.wav\"
}
// entity 3
{
\"classname\" \"target_speaker\"
\"noise\" \"sound/world/base-file.wav\"
}
";

    const TESTMAP_SHADER: &str = "\
textures/testmap/test_shader
{
\t{
\t\tmap textures/testmap/test_shader_2.tga
\t}
}
";

    fn base_fixture() -> std::path::PathBuf {
        let base = temp_dir("read_map");
        write_file(&base, "maps/testmap.map", TESTMAP);
        write_file(
            &base,
            "maps/models/test-model.ase",
            "*MAP_DIFFUSE {\n*BITMAP \"..\\textures\\testmap\\test_model_texture_1.jpg\"\n}\n",
        );
        write_file(&base, "scripts/testmap.shader", TESTMAP_SHADER);
        write_file(&base, "textures/testmap/test_texture.jpg", "jpg");
        write_file(&base, "textures/testmap/test_texture_3.tga", "tga");
        write_file(&base, "textures/testmap/test_shader_2.tga", "tga");
        write_file(&base, "textures/testmap/test_model_texture_1.jpg", "jpg");
        base
    }

    #[test]
    fn read_map_resolves_full_manifest() {
        let base = base_fixture();
        let resources = read_map("testmap", &base).unwrap();
        let expected: Tally = [
            ("textures/testmap/test_texture.jpg", 1),
            ("textures/testmap/test_texture_3.tga", 1),
            ("textures/testmap/test_shader_2.tga", 1),
            ("textures/testmap/test_model_texture_1.jpg", 1),
        ]
        .into_iter()
        .collect();
        assert_eq!(resources.textures, expected);
        assert_eq!(resources.shader_names, ["testmap/test_shader"]);
        assert_eq!(resources.shader_files, ["testmap.shader"]);
        let sounds: Tally = [("sound/testmap/sound-file.wav", 1)].into_iter().collect();
        assert_eq!(resources.sounds, sounds);
        assert!(resources.direct_materials.contains("testmap/test_shader"));
        assert!(!resources.direct_materials.contains("common/caulk"));
    }

    #[test]
    fn read_map_without_shaders() {
        let base = temp_dir("read_map_plain");
        write_file(
            &base,
            "maps/testmap.map",
            "\
// brush 0
{
( 96 80 192 ) ( 240 80 128 ) ( 240 80 192 ) testmap/test_texture 0 0 0 0.28 0.28 134217728 0 0
}
// entity 1
{
\"classname\" \"misc_model\"
\"model\" \"maps/models/test-model.ase\"
}
",
        );
        write_file(
            &base,
            "maps/models/test-model.ase",
            "*BITMAP \"..\\textures\\testmap\\test_model_texture_1.jpg\"\n",
        );
        std::fs::create_dir_all(base.join("scripts")).unwrap();
        write_file(&base, "textures/testmap/test_texture.jpg", "jpg");
        write_file(&base, "textures/testmap/test_model_texture_1.jpg", "jpg");

        let resources = read_map("testmap", &base).unwrap();
        let expected: Tally = [
            ("textures/testmap/test_texture.jpg", 1),
            ("textures/testmap/test_model_texture_1.jpg", 1),
        ]
        .into_iter()
        .collect();
        assert_eq!(resources.textures, expected);
        assert!(resources.shader_names.is_empty());
        assert!(resources.shader_files.is_empty());
    }
}
