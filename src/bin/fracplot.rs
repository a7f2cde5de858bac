use std::path::PathBuf;

use anyhow::Context;
use structopt::StructOpt;
use tracing_subscriber::EnvFilter;

use fracplot::datfile::DatFile;
use fracplot::figure::{output_path, Figure};
use fracplot::painter::Colormap;
use fracplot::RenderOptions;

/// Render a fractal label grid (.dat) into a color-mapped image.
#[derive(StructOpt, Debug)]
#[structopt(name = "fracplot")]
struct Opts {
    /// Data file written by the fractal producer
    #[structopt(parse(from_os_str))]
    input: PathBuf,

    /// Output image path; defaults to the input's base name with .png
    #[structopt(short, long, parse(from_os_str))]
    output: Option<PathBuf>,

    /// Directory for the default output name
    #[structopt(short = "d", long, parse(from_os_str), default_value = ".")]
    out_dir: PathBuf,

    /// Palette: twilight-shifted, rainbow or greyscale
    #[structopt(short, long, default_value = "twilight-shifted")]
    colormap: Colormap,

    /// Bottom of the color range (defaults to the grid minimum)
    #[structopt(long)]
    vmin: Option<f64>,

    /// Top of the color range (defaults to the grid maximum)
    #[structopt(long)]
    vmax: Option<f64>,

    /// Resize so the longer side has this many pixels
    #[structopt(long)]
    fit: Option<u32>,

    /// TrueType font used to draw the title above the image
    #[structopt(long, parse(from_os_str))]
    font: Option<PathBuf>,

    /// Write the image without opening a window
    #[structopt(long)]
    no_show: bool,

    /// Log filter, overridden by RUST_LOG
    #[structopt(long, default_value = "info")]
    log_level: String,
}

impl Opts {
    fn render_options(&self) -> RenderOptions {
        RenderOptions {
            colormap: self.colormap,
            vmin: self.vmin,
            vmax: self.vmax,
            fit: self.fit,
            font: self.font.clone(),
        }
    }

    fn output(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| output_path(&self.input, &self.out_dir))
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(feature = "gui")]
fn show(figure: &Figure) -> anyhow::Result<()> {
    fracplot::gui::show(figure).map_err(|e| anyhow::anyhow!("viewer failed: {}", e))
}

#[cfg(not(feature = "gui"))]
fn show(_figure: &Figure) -> anyhow::Result<()> {
    tracing::info!("built without the gui feature, not displaying");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let opts = Opts::from_args();
    init_tracing(&opts.log_level);

    let dat = DatFile::open(&opts.input)
        .with_context(|| format!("failed to load {}", opts.input.display()))?;
    let figure = fracplot::render(&dat, &opts.render_options()).context("failed to render grid")?;

    let path = opts.output();
    figure
        .save(&path)
        .with_context(|| format!("failed to write {}", path.display()))?;

    if !opts.no_show {
        show(&figure)?;
    }
    Ok(())
}
