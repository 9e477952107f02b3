//! Configuration for the processor and the editing session.
//!
//! Both structs deserialize from JSON with every field optional, so a
//! config file only needs the values it overrides.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::transform::FilterType;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "PIXCROP_DATA_DIR";

/// File name the processor writes applied images to.
pub const APPLIED_FILE_NAME: &str = "_applied.png";

/// File name of the recent-files list inside the data directory.
pub const RECENT_FILES_NAME: &str = "recent_files.json";

/// Directory for applied images and the recent-files list.
///
/// `PIXCROP_DATA_DIR` wins; otherwise the platform data directory, falling
/// back to the system temp directory.
pub fn data_dir() -> PathBuf {
    std::env::var(DATA_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::data_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("pixcrop")
        })
}

/// Settings for [`LocalProcessor`](crate::processor::LocalProcessor).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    /// Where applied images are written.
    pub work_dir: PathBuf,
    pub applied_file_name: String,
    /// Downscale preview surfaces so their longest edge fits, if set.
    pub preview_max_edge: Option<u32>,
    /// Resampling filter for scaling stages.
    pub filter: FilterType,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            work_dir: data_dir(),
            applied_file_name: APPLIED_FILE_NAME.to_string(),
            preview_max_edge: None,
            filter: FilterType::Lanczos3,
        }
    }
}

impl ProcessorConfig {
    /// Config writing into `work_dir`, everything else default.
    pub fn with_work_dir(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
            ..Self::default()
        }
    }

    pub fn applied_path(&self) -> PathBuf {
        self.work_dir.join(&self.applied_file_name)
    }
}

/// Interaction defaults for [`EditorSession`](crate::session::EditorSession).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Pixelation cell size in pixels.
    pub block_size: u32,
    /// Brush size in natural image pixels.
    pub brush_size: f64,
    /// Crop handle hit tolerance in screen pixels.
    pub handle_tolerance: f64,
    /// Total margin kept around the image when fitting to the container.
    pub fit_margin: f64,
    pub recent_files_cap: usize,
    /// Color picker neighbourhood radius (0 samples a single pixel).
    pub sample_radius: u32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            block_size: crate::pixelate::DEFAULT_BLOCK_SIZE,
            brush_size: 40.0,
            handle_tolerance: 12.0,
            fit_margin: crate::viewport::DEFAULT_FIT_MARGIN,
            recent_files_cap: crate::recent::RECENT_FILES_CAP,
            sample_radius: 0,
        }
    }
}
