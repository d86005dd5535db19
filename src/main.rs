mod config;

#[cfg(test)]
#[path = "main_test.rs"]
mod main_test;

use std::fs;
use std::path::{Path, PathBuf};

use canvas::doc::{Scene, Size};
use clap::{Args, Parser, Subcommand};
use config::FontsMode;
use export::{CompileOptions, LoopCount, compile_with};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: std::io::Error },
    #[error("invalid scene JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("scene has no sizes to compile")]
    NoSizes,
    #[error("scene does not support size {0}")]
    UnknownSize(Size),
    #[error("scene has {0} problem(s)")]
    InvalidScene(usize),
}

#[derive(Parser, Debug)]
#[command(name = "adforge", about = "Compile multi-size ad creatives to static HTML")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile a scene into one HTML document.
    Compile(CompileArgs),
    /// Report duplicate or invalid export ids and non-finite geometry.
    Validate {
        /// Scene JSON file.
        scene: PathBuf,
    },
}

#[derive(Args, Debug)]
struct CompileArgs {
    /// Scene JSON file.
    scene: PathBuf,

    /// Target size; repeatable. Defaults to every size the scene lists.
    #[arg(long = "size", value_name = "WxH")]
    sizes: Vec<Size>,

    /// -1 loops forever, 0 plays once, N repeats N times.
    #[arg(long = "loop", value_name = "N", env = "ADFORGE_LOOP", default_value_t = -1, allow_negative_numbers = true)]
    loop_count: i64,

    /// `google` or `none`.
    #[arg(long, env = "ADFORGE_FONTS", default_value = "google")]
    fonts: FontsMode,

    /// Output file; stdout when omitted.
    #[arg(long, conflicts_with = "split")]
    out: Option<PathBuf>,

    /// Write one document per size into this directory instead.
    #[arg(long, value_name = "DIR")]
    split: Option<PathBuf>,
}

fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Compile(args) => run_compile(args),
        Command::Validate { scene } => run_validate(&scene),
    }
}

fn load_scene(path: &Path) -> Result<Scene, CliError> {
    let raw = fs::read_to_string(path).map_err(|source| CliError::Read { path: path.to_owned(), source })?;
    let scene: Scene = serde_json::from_str(&raw)?;
    tracing::info!(path = %path.display(), layers = scene.len(), sizes = scene.sizes().len(), "scene loaded");
    Ok(scene)
}

fn write_file(path: &Path, contents: &str) -> Result<(), CliError> {
    fs::write(path, contents).map_err(|source| CliError::Write { path: path.to_owned(), source })?;
    tracing::info!(path = %path.display(), bytes = contents.len(), "document written");
    Ok(())
}

fn run_compile(args: CompileArgs) -> Result<(), CliError> {
    let scene = load_scene(&args.scene)?;

    let sizes = if args.sizes.is_empty() { scene.sizes().to_vec() } else { args.sizes };
    if sizes.is_empty() {
        return Err(CliError::NoSizes);
    }
    if let Some(unknown) = sizes.iter().find(|s| !scene.has_size(**s)) {
        return Err(CliError::UnknownSize(*unknown));
    }

    // Malformed ids are exported as-is; surface them without failing.
    for problem in scene.validate() {
        tracing::warn!(%problem, "scene problem");
    }

    let options = CompileOptions { loop_count: LoopCount::from(args.loop_count) };
    let fonts = args.fonts.provider();
    tracing::info!(sizes = sizes.len(), loop_count = %options.loop_count.iteration_count(), "compiling");

    if let Some(dir) = args.split {
        fs::create_dir_all(&dir).map_err(|source| CliError::Write { path: dir.clone(), source })?;
        for size in &sizes {
            let doc = compile_with(&scene, std::slice::from_ref(size), &options, fonts);
            write_file(&dir.join(format!("{size}.html")), &doc)?;
        }
        return Ok(());
    }

    let doc = compile_with(&scene, &sizes, &options, fonts);
    match args.out {
        Some(path) => write_file(&path, &doc),
        None => {
            print!("{doc}");
            Ok(())
        }
    }
}

fn run_validate(path: &Path) -> Result<(), CliError> {
    let scene = load_scene(path)?;
    let problems = scene.validate();
    for problem in &problems {
        println!("{problem}");
    }
    if problems.is_empty() {
        println!("ok: {} layer(s), {} size(s)", scene.len(), scene.sizes().len());
        Ok(())
    } else {
        Err(CliError::InvalidScene(problems.len()))
    }
}
