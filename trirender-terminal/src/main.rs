/// trirender - spinning orthographic viewer for raw triangle files
///
/// Loads every file given on the command line, prints triangle counts and
/// renders the union of all meshes in the terminal until Q is pressed.
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use trirender_core::{load_mesh, RenderMode, Scene};
use trirender_terminal::TerminalApp;

#[derive(Parser, Debug)]
#[command(name = "trirender", version)]
#[command(about = "Render raw triangle files from a rotating orthographic camera")]
#[command(args_override_self = true)]
struct Cli {
    /// Use display lists (default false)
    #[arg(short = 'l')]
    display_lists: bool,

    /// Zoom factor (default 1, must be >= 1)
    #[arg(short = 'z', value_name = "FACTOR", default_value_t = 1.0, value_parser = parse_zoom)]
    zoom: f32,

    /// Cap the frame rate; by default frames are drawn back to back
    #[arg(long, value_name = "FPS")]
    max_fps: Option<u32>,

    /// Geometry files, loaded in the order given
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,
}

impl Cli {
    fn mode(&self) -> RenderMode {
        if self.display_lists {
            RenderMode::DisplayLists
        } else {
            RenderMode::Immediate
        }
    }
}

fn parse_zoom(value: &str) -> Result<f32, String> {
    let zoom: f32 = value
        .parse()
        .map_err(|_| format!("'{}' is not a number", value))?;
    if !zoom.is_finite() || zoom < 1.0 {
        return Err(format!("zoom factor must be >= 1, got {}", value));
    }
    Ok(zoom)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // --help and --version are not failures
            let code = if err.use_stderr() { 1 } else { 0 };
            let _ = err.print();
            return ExitCode::from(code);
        }
    };

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{:#}", err);
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let scene = load_scene(&cli)?;
    println!("total number of triangles: {}", scene.total_triangles());

    let mut app = TerminalApp::new(scene, cli.zoom, cli.max_fps)
        .context("failed to query terminal size")?;
    app.run().context("terminal rendering failed")?;
    Ok(())
}

/// Load every file before the first frame; the first failure aborts
fn load_scene(cli: &Cli) -> Result<Scene> {
    let mut scene = Scene::new(cli.mode());
    for path in &cli.files {
        let triangles = load_mesh(&mut scene, path)?;
        println!("reading {} triangles...", triangles);
    }
    log::debug!(
        "loaded {} file(s) in {:?} mode, bounds {:?}",
        scene.batches().len(),
        scene.mode(),
        scene.bounds()
    );
    Ok(scene)
}
