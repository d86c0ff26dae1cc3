use std::fs;
use std::path::Path;

use crate::error::ScanError;
use crate::material::get_material;
use crate::tally::Tally;

const EDITOR_IMAGE_KEY: &str = "qer_editorimage";

/// One used shader definition from a script file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Shader {
    pub name: String,
    pub lines: Vec<String>,
    pub textures: Tally,
}

/// Outcome of matching the map's materials against the shader scripts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ShaderResolution {
    /// Textures pulled in by used shaders plus every material no shader
    /// claimed, as bare material names.
    pub textures: Tally,
    pub shader_names: Vec<String>,
    /// File names (not paths) of scripts that defined at least one used shader.
    pub shader_files: Vec<String>,
}

/// A script line names a shader when, once a single leading `{` is dropped,
/// it holds no whitespace at all.
pub fn is_shader_name(line: &str) -> bool {
    let stripped = line.replacen('{', "", 1);
    !stripped.trim().chars().any(char::is_whitespace)
}

pub fn shader_is_used(materials: &Tally, name: &str) -> bool {
    materials.contains(name)
}

/// Matches `materials` against every script in `shader_dir`.
///
/// Shaders are claimed in file-name order; a claimed name is removed from
/// the working set so later definitions of the same name are ignored.
pub fn extract_textures_from_used_shaders(
    materials: &Tally,
    shader_dir: &Path,
) -> Result<ShaderResolution, ScanError> {
    let mut remaining = materials.clone();
    let mut resolution = ShaderResolution::default();

    for file_name in list_shader_files(shader_dir)? {
        let path = shader_dir.join(&file_name);
        let contents = read_script(&path)?;
        let shaders = parse_shader_file(&remaining, &contents);
        for shader in &shaders {
            remaining.remove(&shader.name);
        }
        if !shaders.is_empty() {
            resolution.shader_files.push(file_name);
            combine_textures_from_shaders(
                &shaders,
                &mut resolution.textures,
                &mut resolution.shader_names,
            );
        }
    }

    resolution.textures.overwrite_from(&remaining);
    Ok(resolution)
}

pub fn combine_textures_from_shaders(
    shaders: &[Shader],
    textures: &mut Tally,
    shader_names: &mut Vec<String>,
) {
    for shader in shaders {
        shader_names.push(shader.name.clone());
        textures.overwrite_from(&shader.textures);
    }
}

/// Used shader definitions in one script, in file order.
pub fn parse_shader_file(materials: &Tally, contents: &str) -> Vec<Shader> {
    let mut shaders = Vec::new();
    let mut shader = Shader::default();
    let mut parsing_shader = false;
    let mut depth: i32 = 0;

    for line in contents.lines() {
        if line.contains(EDITOR_IMAGE_KEY) {
            continue;
        }
        let texture = get_material(line);
        if parsing_shader {
            shader.lines.push(line.to_string());
        }
        if !texture.is_empty() {
            if is_shader_name(line) && shader_is_used(materials, &texture) {
                parsing_shader = true;
                shader.name = texture;
                shader.lines.push(line.to_string());
            } else if parsing_shader {
                shader.textures.increment(texture);
            }
        }
        if line.contains('{') {
            depth += 1;
        } else if line.contains('}') {
            depth -= 1;
            if depth == 0 && parsing_shader {
                shaders.push(std::mem::take(&mut shader));
                parsing_shader = false;
            }
        }
    }
    shaders
}

fn list_shader_files(shader_dir: &Path) -> Result<Vec<String>, ScanError> {
    let dir_error = |source| ScanError::ShaderDir {
        path: shader_dir.to_path_buf(),
        source,
    };
    let mut names = Vec::new();
    for entry in fs::read_dir(shader_dir).map_err(dir_error)? {
        let entry = entry.map_err(dir_error)?;
        let file_type = entry.file_type().map_err(dir_error)?;
        if file_type.is_dir() {
            continue;
        }
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names)
}

fn read_script(path: &Path) -> Result<String, ScanError> {
    let data = fs::read(path).map_err(|source| ScanError::ShaderRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&data).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{temp_dir, write_file};
    use std::path::PathBuf;

    const TESTMAP_SHADER: &str = "\
textures/testmap/test_shader
{
\tqer_editorimage textures/testmap/editor_only.tga
\t{
\t\tmap textures/testmap/test_shader_2.tga
\t}
\t{
\t\tmap textures/testmap/test_shader_3.tga
\t\tblendFunc GL_DST_COLOR GL_ZERO
\t}
}

textures/testmap/unused_shader
{
\t{
\t\tmap textures/testmap/unused_texture.tga
\t}
}
";

    const SECOND_SHADER: &str = "\
textures/testmap/test_shader_2
{
\t{
\t\tmap textures/testmap/test_shader_4.tga
\t}
\t{
\t\tmap $lightmap
\t}
\t{
\t\tclampmap textures/testmap/test_shader_5.jpg
\t}
}
";

    fn scripts_fixture() -> PathBuf {
        let root = temp_dir("shader");
        write_file(&root, "scripts/testmap.shader", TESTMAP_SHADER);
        write_file(&root, "scripts/test_shader_2.shader", SECOND_SHADER);
        write_file(&root, "scripts/testmap.arena", "{\nmap \"testmap\"\n}\n");
        fs::create_dir_all(root.join("scripts/nested")).unwrap();
        root.join("scripts")
    }

    fn tally(entries: &[(&str, u32)]) -> Tally {
        entries.iter().copied().collect()
    }

    #[test]
    fn shader_name_heuristic() {
        assert!(is_shader_name("textures/testmap/test_shader_2"));
        assert!(is_shader_name("textures/testmap/test_shader_2 {"));
        assert!(is_shader_name("{textures/testmap/test_shader_2"));
        assert!(!is_shader_name("map textures/testmap/test_shader_5.tga"));
    }

    #[test]
    fn used_shader_lookup() {
        assert!(shader_is_used(&tally(&[("testmap/test_shader", 1)]), "testmap/test_shader"));
        assert!(!shader_is_used(
            &tally(&[("textures/testmap/test_shader_2", 1)]),
            "testmap/test_shader"
        ));
    }

    #[test]
    fn parses_only_used_shaders() {
        let shaders = parse_shader_file(&tally(&[("testmap/test_shader", 1)]), TESTMAP_SHADER);
        assert_eq!(shaders.len(), 1);
        assert_eq!(shaders[0].name, "testmap/test_shader");
        assert_eq!(
            shaders[0].textures,
            tally(&[("testmap/test_shader_2", 1), ("testmap/test_shader_3", 1)])
        );
        assert!(!shaders[0].lines.is_empty());

        let shaders = parse_shader_file(&tally(&[("testmap/test_shader_2", 1)]), SECOND_SHADER);
        assert_eq!(shaders.len(), 1);
        assert_eq!(
            shaders[0].textures,
            tally(&[("testmap/test_shader_4", 1), ("testmap/test_shader_5", 1)])
        );

        assert!(parse_shader_file(&tally(&[("testmap/other", 1)]), TESTMAP_SHADER).is_empty());
    }

    #[test]
    fn combines_shader_textures_and_names() {
        let shaders = vec![
            Shader {
                name: "testmap/test_shader_2".to_string(),
                lines: Vec::new(),
                textures: tally(&[("testmap/test_shader_4", 1), ("testmap/test_shader_5", 1)]),
            },
            Shader {
                name: "testmap/test_shader".to_string(),
                lines: Vec::new(),
                textures: tally(&[("testmap/test_shader_2", 1), ("testmap/test_shader_3", 1)]),
            },
        ];
        let mut textures = Tally::new();
        let mut names = Vec::new();
        combine_textures_from_shaders(&shaders, &mut textures, &mut names);
        assert_eq!(
            textures,
            tally(&[
                ("testmap/test_shader_4", 1),
                ("testmap/test_shader_5", 1),
                ("testmap/test_shader_2", 1),
                ("testmap/test_shader_3", 1),
            ])
        );
        assert_eq!(names, ["testmap/test_shader_2", "testmap/test_shader"]);
    }

    #[test]
    fn resolves_used_shaders_across_files() {
        let dir = scripts_fixture();
        let input = tally(&[
            ("testmap/test_texture_3", 1),
            ("testmap/test_shader", 1),
            ("testmap/test_texture", 1),
            ("testmap/test_shader_2", 1),
        ]);
        let resolution = extract_textures_from_used_shaders(&input, &dir).unwrap();
        assert_eq!(
            resolution.textures,
            tally(&[
                ("testmap/test_texture_3", 1),
                ("testmap/test_shader_2", 1),
                ("testmap/test_shader_3", 1),
                ("testmap/test_texture", 1),
                ("testmap/test_shader_4", 1),
                ("testmap/test_shader_5", 1),
            ])
        );
        assert_eq!(
            resolution.shader_names,
            ["testmap/test_shader_2", "testmap/test_shader"]
        );
        assert_eq!(
            resolution.shader_files,
            ["test_shader_2.shader", "testmap.shader"]
        );
        assert!(!resolution.textures.contains("testmap/editor_only"));
        // The caller's tally is left untouched.
        assert_eq!(input.len(), 4);
    }

    #[test]
    fn claimed_shader_is_not_a_bare_texture() {
        let dir = scripts_fixture();
        let input = tally(&[("testmap/test_shader", 1)]);
        let resolution = extract_textures_from_used_shaders(&input, &dir).unwrap();
        assert_eq!(resolution.shader_names, ["testmap/test_shader"]);
        assert!(resolution.textures.contains("testmap/test_shader_2"));
        assert!(!resolution.textures.contains("testmap/test_shader"));
        assert_eq!(resolution.shader_files, ["testmap.shader"]);
    }

    #[test]
    fn missing_shader_dir_is_fatal() {
        let root = temp_dir("shader_missing");
        let err = extract_textures_from_used_shaders(&Tally::new(), &root.join("scripts"))
            .unwrap_err();
        assert!(matches!(err, ScanError::ShaderDir { .. }));
    }
}
