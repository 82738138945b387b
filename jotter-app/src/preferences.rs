use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use jotter_core::{EscapeParameters, ExtentProfile};

// ---------------------------------------------------------------------------
// Preferences
// ---------------------------------------------------------------------------

/// Defaults for every command. Command-line flags take precedence.
///
/// The components of `c` are kept as text so the equation label and PNG
/// metadata show exactly what the user configured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default = "default_c_re")]
    pub default_c_re: String,
    #[serde(default = "default_c_im")]
    pub default_c_im: String,
    #[serde(default = "default_max_iterations")]
    pub default_max_iterations: u32,
    #[serde(default = "default_resolution")]
    pub default_resolution: String,
    #[serde(default)]
    pub extent: ExtentProfile,
    #[serde(default = "default_julia_colormap")]
    pub julia_colormap: String,
    #[serde(default = "default_reference_colormap")]
    pub reference_colormap: String,
    /// Reference asset; relative paths resolve against the working directory.
    #[serde(default = "default_reference_path")]
    pub reference_path: String,
    /// Budget used when the reference asset has to be regenerated.
    #[serde(default = "default_reference_iterations")]
    pub reference_iterations: u32,
    /// Job-queue worker threads.
    #[serde(default = "default_workers")]
    pub workers: usize,
}

fn default_c_re() -> String {
    EscapeParameters::default_c().re.to_string()
}
fn default_c_im() -> String {
    EscapeParameters::default_c().im.to_string()
}
fn default_max_iterations() -> u32 {
    EscapeParameters::DEFAULT_MAX_ITERATIONS
}
fn default_resolution() -> String {
    "3000 by 2000".to_string()
}
fn default_julia_colormap() -> String {
    "viridis".to_string()
}
fn default_reference_colormap() -> String {
    "twilight_shifted".to_string()
}
fn default_reference_path() -> String {
    "mandelbrot_set.npy".to_string()
}
fn default_reference_iterations() -> u32 {
    jotter_core::mandelbrot::DEFAULT_REFERENCE_ITERATIONS
}
fn default_workers() -> usize {
    2
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            default_c_re: default_c_re(),
            default_c_im: default_c_im(),
            default_max_iterations: default_max_iterations(),
            default_resolution: default_resolution(),
            extent: ExtentProfile::default(),
            julia_colormap: default_julia_colormap(),
            reference_colormap: default_reference_colormap(),
            reference_path: default_reference_path(),
            reference_iterations: default_reference_iterations(),
            workers: default_workers(),
        }
    }
}

impl Preferences {
    /// Load preferences from `path`, falling back to defaults when the file
    /// is missing or malformed.
    pub fn load(path: &Path) -> Self {
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(json) => match serde_json::from_str::<Preferences>(&json) {
                    Ok(prefs) => {
                        info!("Loaded preferences from {}", path.display());
                        return prefs;
                    }
                    Err(e) => {
                        error!("Failed to parse preferences: {e}");
                    }
                },
                Err(e) => {
                    error!("Failed to read preferences file: {e}");
                }
            }
        } else {
            debug!("No preferences file at {}", path.display());
        }
        Self::default()
    }

    /// Persist preferences to `path` as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| format!("failed to create config directory: {e}"))?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| format!("failed to serialize preferences: {e}"))?;
        fs::write(path, json).map_err(|e| format!("failed to write preferences: {e}"))?;
        debug!("Saved preferences to {}", path.display());
        Ok(())
    }
}
