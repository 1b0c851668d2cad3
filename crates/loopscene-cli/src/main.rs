use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use loopscene_compose::{compose, RenderSize};
use loopscene_core::Duration;
use loopscene_ir::{file, validate_project};
use loopscene_studio::{ExportFormat, RenderClient};

#[derive(Parser)]
#[command(
    name = "loopscene",
    version,
    about = "Loopscene — compose looping scenes from layered images",
    long_about = "Loopscene compiles a project of layered still images and timed\nmotion effects into a self-contained animated SVG document, and can hand\nthat document to a render service for video export."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a project file for structural errors
    Validate {
        /// Path to the project .json file
        #[arg()]
        file: PathBuf,
    },

    /// Compile a project file to an animated SVG document
    Compile {
        /// Path to the project .json file
        #[arg()]
        file: PathBuf,

        /// Output file path (default: <name>.svg next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Render width in pixels (default: the project's canvas width)
        #[arg(long)]
        width: Option<u32>,

        /// Render height in pixels (default: the project's canvas height)
        #[arg(long)]
        height: Option<u32>,
    },

    /// Compile a project and render it to video via the render service
    Export {
        /// Path to the project .json file
        #[arg()]
        file: PathBuf,

        /// Output format: mp4 or webp
        #[arg(short, long, default_value = "mp4")]
        format: String,

        /// Base URL of the render service
        #[arg(long)]
        service: String,

        /// Total timeline duration in seconds
        #[arg(long, default_value_t = 10.0)]
        duration: f64,

        /// Output file path (default: <name>.<format> next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match cli.command {
        Commands::Validate { file } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let project: loopscene_ir::Project =
                serde_json::from_str(&text).context("project file is not valid JSON")?;
            match validate_project(&project) {
                Ok(()) => {
                    println!(
                        "✓ {} — {} image(s), canvas {}x{}",
                        file.display(),
                        project.images.len(),
                        project.canvas_width,
                        project.canvas_height
                    );
                    Ok(())
                }
                Err(errors) => {
                    for error in &errors {
                        eprintln!("✗ {}", error);
                    }
                    anyhow::bail!("{} validation error(s)", errors.len())
                }
            }
        }

        Commands::Compile {
            file,
            output,
            width,
            height,
        } => {
            let project = load_project(&file)?;
            let size = RenderSize::new(
                width.unwrap_or(project.canvas_width),
                height.unwrap_or(project.canvas_height),
            );
            let svg = compose(&project, size)?;
            let out_path = output.unwrap_or_else(|| file.with_extension("svg"));
            std::fs::write(&out_path, &svg)
                .with_context(|| format!("failed to write {}", out_path.display()))?;
            println!("✓ wrote {} ({} bytes)", out_path.display(), svg.len());
            Ok(())
        }

        Commands::Export {
            file,
            format,
            service,
            duration,
            output,
        } => {
            let format: ExportFormat = format.parse()?;
            let project = load_project(&file)?;
            let svg = compose(&project, RenderSize::of_canvas(&project))?;

            let client = RenderClient::new(service);
            let payload = client
                .render(&svg, Duration::from_seconds(duration), format)
                .context("render service request failed")?;

            let out_path = output.unwrap_or_else(|| file.with_extension(format.as_str()));
            std::fs::write(&out_path, &payload)
                .with_context(|| format!("failed to write {}", out_path.display()))?;
            println!("✓ wrote {} ({} bytes)", out_path.display(), payload.len());
            Ok(())
        }
    }
}

fn load_project(path: &PathBuf) -> Result<loopscene_ir::Project> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let project = file::from_json_str(&text)
        .with_context(|| format!("invalid project file: {}", path.display()))?;
    tracing::debug!(
        images = project.images.len(),
        "loaded project {}",
        path.display()
    );
    Ok(project)
}
