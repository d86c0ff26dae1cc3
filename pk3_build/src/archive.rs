use std::collections::BTreeMap;
use std::fmt;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::config::Compression;
use crate::error::BuildError;
use crate::logging;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// The resource is the archive being written.
    SelfReference,
    UnsafePath,
    /// Not a regular file under the base directory (shader names land here).
    NotFound,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SkipReason::SelfReference => "self reference",
            SkipReason::UnsafePath => "unsafe path",
            SkipReason::NotFound => "not found",
        };
        write!(f, "{}", label)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedResource {
    pub resource: String,
    pub reason: SkipReason,
}

#[derive(Clone, Debug)]
pub struct Pk3Summary {
    pub path: PathBuf,
    pub files: Vec<String>,
    pub directories: Vec<String>,
    pub skipped: Vec<SkippedResource>,
}

impl From<Compression> for CompressionMethod {
    fn from(value: Compression) -> Self {
        match value {
            Compression::Deflate => CompressionMethod::Deflated,
            Compression::Stored => CompressionMethod::Stored,
        }
    }
}

/// Packs the resources found under `base` into a zip at `out_path`.
///
/// Entry names keep the relative resource path with forward slashes, and
/// every parent directory gets its own entry, except the lightmap folder
/// `maps/<map_name>`. Resources that are missing, unsafe or equal to the
/// archive itself are reported in the summary and left out.
///
/// The zip is assembled under `<out_path>.tmp` and renamed into place, so a
/// failed write never leaves a truncated archive behind.
pub fn write_pk3(
    base: &Path,
    resources: &[String],
    map_name: &str,
    out_path: &Path,
    compression: Compression,
) -> Result<Pk3Summary, BuildError> {
    let archive_name = format!("{}.pk3", map_name);
    let lightmap_dir = format!("maps/{}", map_name);
    let mut entries: BTreeMap<String, Option<PathBuf>> = BTreeMap::new();
    let mut skipped = Vec::new();

    for resource in resources {
        let Some(name) = normalize_resource_path(resource) else {
            logging::warn(format!("skipping unsafe resource path {}", resource));
            skipped.push(SkippedResource {
                resource: resource.clone(),
                reason: SkipReason::UnsafePath,
            });
            continue;
        };
        if file_name(&name) == archive_name {
            logging::warn(format!("skipping {}: archive cannot contain itself", name));
            skipped.push(SkippedResource {
                resource: resource.clone(),
                reason: SkipReason::SelfReference,
            });
            continue;
        }
        if entries.contains_key(&name) {
            continue;
        }
        let source = base.join(&name);
        if !source.is_file() {
            logging::debug(format!("resource does not exist: {}", source.display()));
            skipped.push(SkippedResource {
                resource: resource.clone(),
                reason: SkipReason::NotFound,
            });
            continue;
        }
        for dir in parent_directories(&name) {
            if dir == lightmap_dir {
                continue;
            }
            entries.entry(format!("{}/", dir)).or_insert(None);
        }
        entries.insert(name, Some(source));
    }

    if let Some(parent) = out_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|err| BuildError::io(parent, err))?;
        }
    }
    let temp_path = temp_archive_path(out_path);
    let written = File::create(&temp_path)
        .map_err(|err| BuildError::io(&temp_path, err))
        .and_then(|file| write_entries(file, entries, compression))
        .and_then(|written| {
            fs::rename(&temp_path, out_path)
                .map(|()| written)
                .map_err(|err| BuildError::io(out_path, err))
        });
    let (files, directories) = match written {
        Ok(written) => written,
        Err(err) => {
            let _ = fs::remove_file(&temp_path);
            return Err(err);
        }
    };

    logging::info(format!(
        "created pk3 {} ({} files)",
        out_path.display(),
        files.len()
    ));
    Ok(Pk3Summary {
        path: out_path.to_path_buf(),
        files,
        directories,
        skipped,
    })
}

fn write_entries(
    file: File,
    entries: BTreeMap<String, Option<PathBuf>>,
    compression: Compression,
) -> Result<(Vec<String>, Vec<String>), BuildError> {
    let mut writer = ZipWriter::new(file);
    let options = FileOptions::default().compression_method(compression.into());

    let mut files = Vec::new();
    let mut directories = Vec::new();
    for (name, source) in entries {
        match source {
            None => {
                writer.add_directory(name.as_str(), options)?;
                directories.push(name);
            }
            Some(source) => {
                writer.start_file(name.as_str(), options)?;
                let mut input = File::open(&source).map_err(|err| BuildError::io(&source, err))?;
                io::copy(&mut input, &mut writer).map_err(|err| BuildError::io(&source, err))?;
                logging::debug(format!("added resource {}", name));
                files.push(name);
            }
        }
    }
    writer.finish()?;
    Ok((files, directories))
}

fn temp_archive_path(out_path: &Path) -> PathBuf {
    let mut name = out_path.as_os_str().to_os_string();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Relative resource path with forward slashes, or `None` when the path is
/// absolute or escapes the base directory.
pub fn normalize_resource_path(path: &str) -> Option<String> {
    let normalized = path.trim().replace('\\', "/");
    if normalized.is_empty() || normalized.starts_with('/') {
        return None;
    }
    let mut components = Vec::new();
    for part in normalized.split('/') {
        if part.is_empty() || part == "." || part == ".." || part.contains(':') {
            return None;
        }
        components.push(part);
    }
    Some(components.join("/"))
}

fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// `a/b/c.txt` yields `a` and `a/b`.
fn parent_directories(path: &str) -> impl Iterator<Item = &str> {
    path.match_indices('/').map(move |(index, _)| &path[..index])
}
