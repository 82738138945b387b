use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use jotter_core::ExtentProfile;
use jotter_render::Priority;

/// Render Julia sets and locate their constant on the Mandelbrot set.
#[derive(Parser, Debug)]
#[command(name = "jotter", version, about, long_about = None)]
pub struct Cli {
    /// Preferences file (default: the per-user config directory)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render a Julia set to PNG
    Julia(JuliaArgs),
    /// Mark c on the Mandelbrot reference image
    Locate(LocateArgs),
    /// Generate the Mandelbrot reference asset (.npy)
    Reference(ReferenceArgs),
    /// Print the equation label for c
    Equation(EquationArgs),
    /// List resolution presets, extents and colormaps
    Presets,
    /// Show the preferences file, or reset it to defaults
    Config(ConfigArgs),
}

#[derive(Args, Debug)]
pub struct JuliaArgs {
    /// Real part of c
    #[arg(long, allow_hyphen_values = true)]
    pub creal: Option<String>,

    /// Imaginary part of c
    #[arg(long, allow_hyphen_values = true)]
    pub cimag: Option<String>,

    /// Maximum number of iterations
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=MAX_STEPS))]
    pub steps: Option<u32>,

    /// Output resolution, e.g. "900 by 600"
    #[arg(long)]
    pub res: Option<String>,

    /// Colormap name
    #[arg(long)]
    pub colormap: Option<String>,

    /// Complex-plane extent: wide or narrow
    #[arg(long)]
    pub extent: Option<ExtentProfile>,

    /// Queue priority for the render job
    #[arg(long, value_enum, default_value_t = PriorityArg::Default)]
    pub priority: PriorityArg,

    /// Output PNG path
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,

    /// Also print the image as a data URI on stdout
    #[arg(long)]
    pub data_uri: bool,
}

const MAX_STEPS: i64 = jotter_core::EscapeParameters::UI_MAX_ITERATIONS as i64;

#[derive(Args, Debug)]
pub struct LocateArgs {
    /// Real part of c
    #[arg(long, allow_hyphen_values = true)]
    pub creal: Option<String>,

    /// Imaginary part of c
    #[arg(long, allow_hyphen_values = true)]
    pub cimag: Option<String>,

    /// Reference asset (.npy); regenerated when missing
    #[arg(long, value_name = "PATH")]
    pub reference: Option<PathBuf>,

    /// Colormap name
    #[arg(long)]
    pub colormap: Option<String>,

    /// Output PNG path; without it only the pixel is printed
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Also print the image as a data URI on stdout
    #[arg(long)]
    pub data_uri: bool,
}

#[derive(Args, Debug)]
pub struct ReferenceArgs {
    /// Iteration budget per pixel
    #[arg(long)]
    pub iterations: Option<u32>,

    /// Output .npy path
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct EquationArgs {
    /// Real part of c
    #[arg(long, allow_hyphen_values = true)]
    pub creal: Option<String>,

    /// Imaginary part of c
    #[arg(long, allow_hyphen_values = true)]
    pub cimag: Option<String>,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Overwrite the preferences file with defaults
    #[arg(long)]
    pub reset: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PriorityArg {
    High,
    Default,
    Low,
}

impl From<PriorityArg> for Priority {
    fn from(p: PriorityArg) -> Self {
        match p {
            PriorityArg::High => Priority::High,
            PriorityArg::Default => Priority::Default,
            PriorityArg::Low => Priority::Low,
        }
    }
}
