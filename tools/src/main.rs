use std::path::PathBuf;

use clap::Parser;
use map_scan::sort_materials;
use pk3_build::logging::{self, LogLevel};
use pk3_build::{build_pk3, collect_resources, BuildError, BuildSettings, SettingsOverrides};

const EXIT_SUCCESS: i32 = 0;
const EXIT_USAGE: i32 = 2;
const EXIT_SCAN: i32 = 11;
const EXIT_ARCHIVE: i32 = 12;

#[derive(Parser)]
#[command(name = "tools", version, about = "Pack an id Tech 3 map into a pk3")]
struct Cli {
    /// Map name, with or without `.map` (falls back to PK3_MAP_NAME).
    map_name: Option<String>,

    /// Game directory holding maps/, scripts/ and textures/ (falls back to PK3_BASE_PATH).
    #[arg(value_name = "BASE_PATH")]
    base_path: Option<PathBuf>,

    #[arg(long, value_name = "DIR")]
    out: Option<PathBuf>,

    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// List the resources without writing an archive.
    #[arg(long)]
    dry_run: bool,

    #[arg(long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    std::process::exit(run(cli));
}

fn run(cli: Cli) -> i32 {
    if cli.verbose {
        logging::set_max_level(LogLevel::Debug);
    }
    let overrides = SettingsOverrides {
        map_name: cli.map_name,
        base_path: cli.base_path,
        out_dir: cli.out,
        config: cli.config,
    };
    let settings = match BuildSettings::resolve(overrides) {
        Ok(Some(settings)) => settings,
        Ok(None) => return EXIT_SUCCESS,
        Err(err) => {
            eprintln!("{}", err);
            return EXIT_USAGE;
        }
    };

    if cli.dry_run {
        dry_run(&settings)
    } else {
        build(&settings)
    }
}

fn build(settings: &BuildSettings) -> i32 {
    match build_pk3(settings) {
        Ok(report) => {
            println!(
                "wrote {} ({} files, {} skipped)",
                report.archive_path.display(),
                report.files_written,
                report.skipped.len()
            );
            EXIT_SUCCESS
        }
        Err(err) => {
            eprintln!("pk3 build failed: {}", err);
            exit_code(&err)
        }
    }
}

fn dry_run(settings: &BuildSettings) -> i32 {
    let manifest = match collect_resources(settings) {
        Ok(manifest) => manifest,
        Err(err) => {
            eprintln!("resource scan failed: {}", err);
            return exit_code(&err);
        }
    };
    println!("archive: {}", settings.archive_path().display());
    for path in manifest.paths() {
        println!("  {}", path);
    }

    let sorted = sort_materials(&manifest.map.direct_materials, &settings.base_path);
    println!("direct textures: {}", sorted.textures.len());
    for (texture, count) in sorted.textures.iter() {
        println!("{:>6} {}", count, texture);
    }
    println!("direct shaders: {}", sorted.shaders.len());
    for (shader, count) in sorted.shaders.iter() {
        println!("{:>6} {}", count, shader);
    }
    EXIT_SUCCESS
}

fn exit_code(err: &BuildError) -> i32 {
    match err {
        BuildError::Config(_) => EXIT_USAGE,
        BuildError::Scan(_) | BuildError::MissingMap(_) => EXIT_SCAN,
        BuildError::Io { .. } | BuildError::Archive(_) => EXIT_ARCHIVE,
    }
}
