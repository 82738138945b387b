use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info};

use jotter_core::{
    CoordinateMapper, ExtentProfile, MapResult, ReferenceGeometry, RESOLUTION_PRESETS,
};
use jotter_render::{
    builtin_colormaps, export_png, generate_reference, load_or_generate, render_overlay,
    write_npy, Colormap, ExportMetadata, JobQueue, JuliaRequest, RenderBuffer,
};

use crate::cli::{Command, ConfigArgs, EquationArgs, JuliaArgs, LocateArgs, ReferenceArgs};
use crate::data_uri::png_data_uri;
use crate::error::{AppError, AppResult};
use crate::preferences::Preferences;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Run one subcommand against the loaded preferences.
pub fn run(command: Command, prefs: &Preferences, prefs_path: &Path) -> AppResult<()> {
    match command {
        Command::Julia(args) => julia(args, prefs),
        Command::Locate(args) => locate(args, prefs),
        Command::Reference(args) => reference(args, prefs),
        Command::Equation(args) => {
            equation(args, prefs);
            Ok(())
        }
        Command::Presets => {
            presets();
            Ok(())
        }
        Command::Config(args) => config(args, prefs, prefs_path),
    }
}

/// `"Equation: z² + (<re> + <im>i)"`, built from the raw text of the inputs.
pub fn equation_label(creal: &str, cimag: &str) -> String {
    format!("Equation: z\u{b2} + ({creal} + {cimag}i)")
}

fn julia(args: JuliaArgs, prefs: &Preferences) -> AppResult<()> {
    let creal = args.creal.as_deref().unwrap_or(&prefs.default_c_re);
    let cimag = args.cimag.as_deref().unwrap_or(&prefs.default_c_im);
    let steps = args.steps.unwrap_or(prefs.default_max_iterations);
    let res = args.res.as_deref().unwrap_or(&prefs.default_resolution);
    let extent = args.extent.unwrap_or(prefs.extent);
    let colormap = Colormap::by_name(args.colormap.as_deref().unwrap_or(&prefs.julia_colormap))?;

    let request = JuliaRequest::from_text(res, creal, cimag, steps)?.with_extent(extent.extent());
    info!(res, creal, cimag, steps, %extent, "Rendering Julia set");

    let queue = JobQueue::new(prefs.workers)?;
    let handle = queue.submit_julia(args.priority.into(), request);
    let result = loop {
        if let Some(outcome) = handle.try_result() {
            break outcome?;
        }
        let (done, total) = handle.progress();
        debug!(job = handle.id(), done, total, "Render in progress");
        std::thread::sleep(POLL_INTERVAL);
    };

    let buffer = colormap.colorize_field(&result.field);
    let metadata = ExportMetadata {
        kind: "Julia".to_string(),
        colormap: colormap.name.to_string(),
        c_re: Some(creal.to_string()),
        c_im: Some(cimag.to_string()),
        max_iterations: Some(steps),
        marker: None,
    };
    write_outputs(&buffer, Some(&args.output), &metadata, args.data_uri)?;
    info!(
        elapsed_ms = result.elapsed.as_millis(),
        "Wrote {}",
        args.output.display()
    );
    Ok(())
}

fn locate(args: LocateArgs, prefs: &Preferences) -> AppResult<()> {
    let mapper = CoordinateMapper::default();
    let result = mapper.locate(args.creal.as_deref(), args.cimag.as_deref());
    println!("{}", describe(&result));

    if args.output.is_none() && !args.data_uri {
        return Ok(());
    }

    let path = args
        .reference
        .unwrap_or_else(|| PathBuf::from(&prefs.reference_path));
    let reference = load_or_generate(&path, mapper.geometry(), prefs.reference_iterations)?;
    let colormap =
        Colormap::by_name(args.colormap.as_deref().unwrap_or(&prefs.reference_colormap))?;
    let buffer = render_overlay(&reference, &colormap, &result);

    let metadata = ExportMetadata {
        kind: "Mandelbrot reference".to_string(),
        colormap: colormap.name.to_string(),
        c_re: args.creal,
        c_im: args.cimag,
        max_iterations: None,
        marker: Some(describe(&result)),
    };
    write_outputs(&buffer, args.output.as_deref(), &metadata, args.data_uri)
}

fn reference(args: ReferenceArgs, prefs: &Preferences) -> AppResult<()> {
    let iterations = args.iterations.unwrap_or(prefs.reference_iterations);
    let path = args
        .output
        .unwrap_or_else(|| PathBuf::from(&prefs.reference_path));
    let field = generate_reference(&ReferenceGeometry::MANDELBROT, iterations)?;
    write_npy(&field, &path)?;
    info!(iterations, "Wrote reference asset {}", path.display());
    Ok(())
}

fn equation(args: EquationArgs, prefs: &Preferences) {
    let creal = args.creal.as_deref().unwrap_or(&prefs.default_c_re);
    let cimag = args.cimag.as_deref().unwrap_or(&prefs.default_c_im);
    println!("{}", equation_label(creal, cimag));
}

fn presets() {
    println!("Resolutions:");
    for preset in RESOLUTION_PRESETS {
        println!("  {preset}");
    }
    println!("Extents:");
    for profile in ExtentProfile::ALL {
        let e = profile.extent();
        println!(
            "  {profile}: real {} .. {}, imaginary {} .. {}",
            e.re_start, e.re_end, e.im_start, e.im_end
        );
    }
    println!("Colormaps:");
    for cmap in builtin_colormaps() {
        println!("  {}", cmap.name);
    }
}

fn config(args: ConfigArgs, prefs: &Preferences, path: &Path) -> AppResult<()> {
    let shown = if args.reset {
        let defaults = Preferences::default();
        defaults.save(path).map_err(AppError::Preferences)?;
        info!("Reset preferences at {}", path.display());
        defaults
    } else {
        prefs.clone()
    };
    println!("{}", path.display());
    let json = serde_json::to_string_pretty(&shown)
        .map_err(|e| AppError::Preferences(e.to_string()))?;
    println!("{json}");
    Ok(())
}

/// One-line summary of a locate outcome.
fn describe(result: &MapResult) -> String {
    match result.pixel() {
        Some(p) => format!("{}: x={}, y={}", result.label(), p.x, p.y),
        None => result.label().to_string(),
    }
}

fn write_outputs(
    buffer: &RenderBuffer,
    output: Option<&Path>,
    metadata: &ExportMetadata,
    data_uri: bool,
) -> AppResult<()> {
    if let Some(path) = output {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(jotter_render::RenderError::from)?;
        }
        export_png(buffer, path, metadata)?;
    }
    if data_uri {
        println!("{}", png_data_uri(buffer, metadata)?);
    }
    Ok(())
}
