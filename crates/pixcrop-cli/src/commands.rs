//! Subcommand implementations. Each returns the text to print on stdout.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use pixcrop_core::config::RECENT_FILES_NAME;
use pixcrop_core::recent::{JsonRecentFiles, RecentFilesStore};
use pixcrop_core::{
    ApplyRequest, EditorConfig, EditorSession, ExportRequest, ImageProcessor, LocalProcessor,
    ProcessorConfig,
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{Cli, Command};

pub fn run(cli: &Cli) -> Result<String> {
    let config = load_config(cli.config.as_deref())?;
    let recent = match &cli.recent_file {
        Some(path) => JsonRecentFiles::new(path),
        None => JsonRecentFiles::new(config.work_dir.join(RECENT_FILES_NAME)),
    };

    match &cli.command {
        Command::Open { path } => open(config, &recent, path),
        Command::Export { request } => export(config, request),
        Command::Apply { request, work_dir } => {
            let mut config = config;
            if let Some(dir) = work_dir {
                config.work_dir = dir.clone();
            }
            apply(config, request)
        }
        Command::Recent { clear } => recent_files(&recent, *clear),
    }
}

fn load_config(path: Option<&Path>) -> Result<ProcessorConfig> {
    match path {
        Some(path) => read_json(path).context("Invalid processor config"),
        None => Ok(ProcessorConfig::default()),
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let value = serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))?;
    debug!("Read {}", path.display());
    Ok(value)
}

fn open(config: ProcessorConfig, recent: &dyn RecentFilesStore, path: &Path) -> Result<String> {
    let mut processor = LocalProcessor::new(config);
    let mut session = EditorSession::new(EditorConfig::default());
    session.open_with(&mut processor, recent, path)?;

    let (width, height) = session
        .image()
        .map(|img| img.natural_size())
        .context("Image was not loaded")?;
    Ok(format!("{}\t{}x{}", path.display(), width, height))
}

fn export(config: ProcessorConfig, request: &Path) -> Result<String> {
    let request: ExportRequest = read_json(request)?;
    let mut processor = LocalProcessor::new(config);
    let written = processor
        .export_image(&request)
        .with_context(|| format!("Failed to export {}", request.source_path.display()))?;
    Ok(written.display().to_string())
}

fn apply(config: ProcessorConfig, request: &Path) -> Result<String> {
    let request: ApplyRequest = read_json(request)?;
    let mut processor = LocalProcessor::new(config);
    let opened = processor
        .apply_edits(&request)
        .with_context(|| format!("Failed to apply edits to {}", request.source_path.display()))?;
    let applied = processor.applied_path()?;
    Ok(format!("{}\t{}x{}", applied.display(), opened.width, opened.height))
}

fn recent_files(recent: &dyn RecentFilesStore, clear: bool) -> Result<String> {
    if clear {
        recent.save(&[]).context("Failed to clear recent files")?;
        return Ok(String::new());
    }
    let files = recent.load().context("Failed to read recent files")?;
    Ok(files.join("\n"))
}
