use anyhow::{Context, Result};
use clap::Parser;
use proto3d_core::obj::read_obj;
use proto3d_viewer::{render_snapshot, show_plot, ViewerConfig};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "proto3d-view")]
#[command(about = "View an OBJ model, or render it to a PNG without opening a window.")]
struct Cli {
    model: Option<PathBuf>,
    /// Write a PNG snapshot instead of opening the window.
    #[arg(long)]
    snapshot: Option<PathBuf>,
    #[arg(long, default_value_t = 1024)]
    size: u32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mesh = match &cli.model {
        Some(path) => Some(read_obj(path).with_context(|| format!("load model: {path:?}"))?),
        None => None,
    };

    if let Some(out) = &cli.snapshot {
        let mesh = mesh.context("--snapshot needs a model path")?;
        render_snapshot(&mesh, cli.size, cli.size, out).with_context(|| format!("write snapshot: {out:?}"))?;
        println!("{}", out.display());
        return Ok(());
    }

    show_plot(mesh, cli.model, &ViewerConfig::default())?;
    Ok(())
}
