//! Native processor backed by the filesystem and the `image` crate.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::{bake, ImageProcessor, OpenedImage, ProcessError};
use crate::config::ProcessorConfig;
use crate::encode::{encode, encode_png};
use crate::export::{ApplyRequest, ExportRequest};
use crate::surface::Surface;
use crate::transform::resize_to_fit;

/// Reference [`ImageProcessor`] that decodes from and writes to disk.
#[derive(Debug, Clone)]
pub struct LocalProcessor {
    config: ProcessorConfig,
    last_applied: Option<PathBuf>,
}

impl Default for LocalProcessor {
    fn default() -> Self {
        Self::new(ProcessorConfig::default())
    }
}

impl LocalProcessor {
    pub fn new(config: ProcessorConfig) -> Self {
        Self {
            config,
            last_applied: None,
        }
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    fn decode(&self, path: &Path) -> Result<Surface, ProcessError> {
        let img = image::open(path).map_err(|e| ProcessError::decode(path, e))?;
        let surface = Surface::from_dynamic(&img);
        debug!("Decoded {}: {}x{}", path.display(), surface.width, surface.height);
        Ok(surface)
    }

    fn preview(&self, surface: Surface) -> Result<Surface, ProcessError> {
        match self.config.preview_max_edge {
            Some(max_edge) if max_edge > 0 => Ok(resize_to_fit(&surface, max_edge, self.config.filter)?),
            _ => Ok(surface),
        }
    }

    fn opened(&self, surface: Surface) -> Result<OpenedImage, ProcessError> {
        let (width, height) = surface.dimensions();
        Ok(OpenedImage {
            width,
            height,
            preview: self.preview(surface)?,
        })
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), ProcessError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    fs::write(path, bytes)?;
    Ok(())
}

impl ImageProcessor for LocalProcessor {
    fn open(&mut self, path: &Path) -> Result<OpenedImage, ProcessError> {
        let surface = self.decode(path)?;
        info!("Opened {} ({}x{})", path.display(), surface.width, surface.height);
        self.opened(surface)
    }

    fn apply_edits(&mut self, request: &ApplyRequest) -> Result<OpenedImage, ProcessError> {
        let source = self.decode(&request.source_path)?;
        let baked = bake(source, &request.edits, self.config.filter)?;

        let applied = self.config.applied_path();
        write_file(&applied, &encode_png(&baked)?)?;
        info!(
            "Applied edits to {} -> {} ({}x{})",
            request.source_path.display(),
            applied.display(),
            baked.width,
            baked.height
        );

        self.last_applied = Some(applied);
        self.opened(baked)
    }

    fn applied_path(&self) -> Result<PathBuf, ProcessError> {
        self.last_applied.clone().ok_or(ProcessError::NoAppliedImage)
    }

    fn export_image(&mut self, request: &ExportRequest) -> Result<PathBuf, ProcessError> {
        let source = self.decode(&request.source_path)?;
        let baked = bake(source, &request.edits, self.config.filter)?;

        let bytes = encode(&baked, request.output_format, request.jpeg_quality)?;
        write_file(&request.output_path, &bytes)?;
        info!(
            "Exported {} as {} ({}x{}, {} bytes)",
            request.output_path.display(),
            request.output_format,
            baked.width,
            baked.height,
            bytes.len()
        );

        Ok(request.output_path.clone())
    }
}
