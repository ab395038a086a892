use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use dialoguer::{Input, Select};
use proto3d_core::report::ModelReport;
use proto3d_core::Mesh;
use proto3d_image::{generate_from_image, remove_background, BackgroundConfig, FallbackReason, HeightmapConfig};
use proto3d_text::{generate_from_text, Shape};
use proto3d_viewer::{render_snapshot, view_model, ViewMode, ViewOutcome, ViewerConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{BufRead, IsTerminal};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum InputType {
    Image,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ViewArg {
    Plot,
    Interactive,
    None,
}

impl From<ViewArg> for ViewMode {
    fn from(v: ViewArg) -> Self {
        match v {
            ViewArg::Plot => ViewMode::Plot,
            ViewArg::Interactive => ViewMode::Interactive,
            ViewArg::None => ViewMode::None,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "proto3d")]
#[command(about = "Convert an image or a text prompt into a simple 3D model.")]
struct Cli {
    /// Prompted for when omitted.
    #[arg(long = "input_type", value_enum)]
    input_type: Option<InputType>,
    /// Image path or text prompt. Prompted for when omitted.
    #[arg(long)]
    input: Option<String>,
    #[arg(long = "output_dir", default_value = "outputs")]
    output_dir: PathBuf,
    #[arg(long, value_enum, default_value_t = ViewArg::Plot)]
    view: ViewArg,
    /// Also render the model to this PNG.
    #[arg(long)]
    snapshot: Option<PathBuf>,
    /// Write a JSON summary of the run.
    #[arg(long)]
    report: Option<PathBuf>,
    /// Seed for the random shape picked when a prompt matches no keyword.
    #[arg(long)]
    seed: Option<u64>,
    /// Background colour tolerance (RGB distance).
    #[arg(long, default_value_t = 32.0)]
    tolerance: f32,
    /// Salient-object ONNX model for background removal (needs the onnx feature).
    #[arg(long)]
    model: Option<PathBuf>,
    #[arg(long, default_value_t = 1024)]
    snapshot_size: u32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let input_type = match cli.input_type {
        Some(t) => t,
        None => prompt_input_type()?,
    };
    let input = match cli.input.clone() {
        Some(i) => i,
        None => prompt_input(input_type)?,
    };

    std::fs::create_dir_all(&cli.output_dir)
        .with_context(|| format!("create output dir: {:?}", cli.output_dir))?;

    let (mesh, report) = match input_type {
        InputType::Image => convert_image(&cli, &input)?,
        InputType::Text => convert_text(&cli, &input)?,
    };
    println!("Saved 3D model at {}", report.model_path.display());

    if let Some(path) = &cli.snapshot {
        render_snapshot(&mesh, cli.snapshot_size, cli.snapshot_size, path)
            .with_context(|| format!("write snapshot: {path:?}"))?;
    }
    if let Some(path) = &cli.report {
        write_json(path, &report)?;
    }

    match view_model(&report.model_path, cli.view.into(), &ViewerConfig::default()) {
        ViewOutcome::Fallback { reason } => tracing::info!(%reason, "displayed in plot window instead"),
        ViewOutcome::LoadFailed { error } | ViewOutcome::WindowFailed { error } => {
            tracing::warn!(%error, "model was saved but could not be displayed")
        }
        _ => {}
    }
    Ok(())
}

fn prompt_input_type() -> Result<InputType> {
    if !std::io::stdin().is_terminal() {
        return read_input_type(&mut std::io::stdin().lock());
    }
    let choices = ["image", "text"];
    let idx = Select::new()
        .with_prompt("Input type")
        .items(&choices)
        .default(0)
        .interact()
        .context("read input type")?;
    Ok(if idx == 0 { InputType::Image } else { InputType::Text })
}

fn prompt_input(input_type: InputType) -> Result<String> {
    let label = match input_type {
        InputType::Image => "Image path",
        InputType::Text => "Text prompt",
    };
    if !std::io::stdin().is_terminal() {
        return read_input(&mut std::io::stdin().lock(), label);
    }
    Input::<String>::new()
        .with_prompt(label)
        .interact_text()
        .with_context(|| format!("read {}", label.to_ascii_lowercase()))
}

/// Line-based fallback for piped stdin. Re-asks until "image" or "text".
fn read_input_type(reader: &mut impl BufRead) -> Result<InputType> {
    loop {
        let line = read_line(reader, "Input type (image/text)")?;
        match line.trim().to_ascii_lowercase().as_str() {
            "image" => return Ok(InputType::Image),
            "text" => return Ok(InputType::Text),
            _ => eprintln!("Invalid input type. Please enter 'image' or 'text'"),
        }
    }
}

fn read_input(reader: &mut impl BufRead, label: &str) -> Result<String> {
    let line = read_line(reader, label)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn read_line(reader: &mut impl BufRead, label: &str) -> Result<String> {
    eprint!("{label}: ");
    let mut line = String::new();
    let n = reader
        .read_line(&mut line)
        .with_context(|| format!("read {}", label.to_ascii_lowercase()))?;
    if n == 0 {
        anyhow::bail!("stdin closed while waiting for {}", label.to_ascii_lowercase());
    }
    Ok(line)
}

fn convert_image(cli: &Cli, input: &str) -> Result<(Mesh, ModelReport)> {
    let path = PathBuf::from(input);
    tracing::info!(path = %path.display(), "removing background");
    let bg = BackgroundConfig {
        tolerance: cli.tolerance,
        model: cli.model.clone(),
    };
    let removed = remove_background(&path, &cli.output_dir, &bg)
        .with_context(|| format!("remove background: {path:?}"))?;

    tracing::info!("generating 3D model from image");
    let model = generate_from_image(&removed, &cli.output_dir, &HeightmapConfig::default())
        .with_context(|| format!("generate model from {removed:?}"))?;

    let method = if model.fallback.is_some() {
        "fallback_cube"
    } else {
        "convex_hull"
    };
    let mut report = ModelReport::new("image", input, method, model.model_path.clone(), &model.mesh);
    report.removed_background_path = Some(removed);
    match &model.fallback {
        Some(reason @ FallbackReason::TooFewPoints { .. }) => report.warn("too_few_points", reason.to_string()),
        Some(reason @ FallbackReason::HullFailed(_)) => report.warn("hull_failed", reason.to_string()),
        None => {}
    }
    Ok((model.mesh, report))
}

fn convert_text(cli: &Cli, input: &str) -> Result<(Mesh, ModelReport)> {
    tracing::info!(prompt = input, "generating 3D model from text");
    let model = match cli.seed {
        Some(seed) => generate_from_text(input, &cli.output_dir, &mut StdRng::seed_from_u64(seed)),
        None => generate_from_text(input, &cli.output_dir, &mut rand::thread_rng()),
    }
    .context("generate model from text")?;

    let d = model.descriptor;
    let mut report = ModelReport::new("text", input, d.shape.name(), model.model_path.clone(), &model.mesh);
    report.size = Some(d.size);
    if d.random {
        report.warn("random_shape", format!("no shape keyword matched; picked {}", d.shape));
    }
    if d.shape == Shape::Mug {
        report.warn("mug_handle", "handle annulus has a zero outer radius and is inside-out");
    }
    Ok((model.mesh, report))
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("serialize json")?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_context(|| format!("create dir: {parent:?}"))?;
    }
    std::fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}
