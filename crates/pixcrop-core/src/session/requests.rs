//! Opening images and the apply/export round trips of [`EditorSession`].
//!
//! Asynchronous hosts use the two-phase `begin_*` / `finish_*` calls and
//! report failures with [`EditorSession::fail_request`]. Synchronous hosts
//! hand an [`ImageProcessor`] to `open_with`, `apply_with` or `export_with`.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::EditorSession;
use crate::edit::EditState;
use crate::error::EditorError;
use crate::export::{ApplyRequest, ExportOptions, ExportRequest, RequestKind};
use crate::pixelate::PaintGesture;
use crate::processor::{ImageProcessor, OpenedImage};
use crate::recent::{record_recent, RecentFilesStore};

/// The edits as shown on screen, including a stroke still being painted.
///
/// The session's own history is left alone so redo survives a request.
fn request_edits<'a>(edit: &'a EditState, paint: &PaintGesture) -> Cow<'a, EditState> {
    match paint.in_progress() {
        Some(stroke) if !stroke.is_empty() => {
            let mut snapshot = edit.clone();
            snapshot.strokes.commit(stroke.clone());
            Cow::Owned(snapshot)
        }
        _ => Cow::Borrowed(edit),
    }
}

impl EditorSession {
    /// Open `path` through the processor and remember it in `recent`.
    ///
    /// Failing to update the recent list is logged and otherwise ignored.
    pub fn open_with(
        &mut self,
        processor: &mut dyn ImageProcessor,
        recent: &dyn RecentFilesStore,
        path: &Path,
    ) -> Result<(), EditorError> {
        let opened = processor.open(path).map_err(EditorError::Decode)?;
        debug!("Loading {} into the session", path.display());
        self.load_image(path, opened);

        let cap = self.config.recent_files_cap;
        if let Err(e) = record_recent(recent, &path.to_string_lossy(), cap) {
            warn!("Failed to update recent files: {}", e);
        }
        Ok(())
    }

    fn source_for_request(&self) -> Result<PathBuf, EditorError> {
        self.image
            .as_ref()
            .map(|img| img.source.clone())
            .ok_or(EditorError::NoImage)
    }

    /// Snapshot the edits into an apply request and mark it outstanding.
    pub fn begin_apply(&mut self) -> Result<ApplyRequest, EditorError> {
        if self.compositor.is_busy() {
            return Err(EditorError::RequestInFlight);
        }
        let source = self.source_for_request()?;
        let edits = request_edits(&self.edit, &self.paint);
        self.compositor.begin_apply(&edits, source)
    }

    /// Snapshot the edits into an export request and mark it outstanding.
    pub fn begin_export(&mut self, options: &ExportOptions) -> Result<ExportRequest, EditorError> {
        if self.compositor.is_busy() {
            return Err(EditorError::RequestInFlight);
        }
        let source = self.source_for_request()?;
        let edits = request_edits(&self.edit, &self.paint);
        self.compositor.begin_export(&edits, source, options)
    }

    /// Install the baked image as the new base. All edits reset.
    pub fn finish_apply(
        &mut self,
        opened: OpenedImage,
        applied_path: impl Into<PathBuf>,
    ) -> Result<(), EditorError> {
        self.compositor.finish(RequestKind::Apply)?;
        let applied_path = applied_path.into();
        info!(
            "Applied edits, new base {} ({}x{})",
            applied_path.display(),
            opened.width,
            opened.height
        );
        self.load_image(applied_path, opened);
        Ok(())
    }

    /// Mark the outstanding export complete. Edits are kept.
    pub fn finish_export(&mut self) -> Result<(), EditorError> {
        self.compositor.finish(RequestKind::Export)
    }

    /// Abandon the outstanding request. The session is left untouched.
    pub fn fail_request(&mut self) -> Result<RequestKind, EditorError> {
        self.compositor.cancel()
    }

    /// Run a full apply round trip against `processor`.
    pub fn apply_with(&mut self, processor: &mut dyn ImageProcessor) -> Result<(), EditorError> {
        let request = self.begin_apply()?;
        let result = processor
            .apply_edits(&request)
            .and_then(|opened| processor.applied_path().map(|path| (opened, path)));

        match result {
            Ok((opened, path)) => self.finish_apply(opened, path),
            Err(e) => {
                warn!("Apply failed: {}", e);
                self.compositor.cancel()?;
                Err(EditorError::Processing(e))
            }
        }
    }

    /// Run a full export round trip against `processor`, returning the
    /// written path.
    pub fn export_with(
        &mut self,
        processor: &mut dyn ImageProcessor,
        options: &ExportOptions,
    ) -> Result<PathBuf, EditorError> {
        let request = self.begin_export(options)?;
        match processor.export_image(&request) {
            Ok(path) => {
                self.finish_export()?;
                info!("Exported {}", path.display());
                Ok(path)
            }
            Err(e) => {
                warn!("Export failed: {}", e);
                self.compositor.cancel()?;
                Err(EditorError::Processing(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{opened, session};
    use super::*;
    use crate::config::EditorConfig;
    use crate::encode::OutputFormat;
    use crate::geometry::Rotation;
    use crate::pixelate::Stroke;
    use crate::processor::ProcessError;
    use crate::recent::MemoryRecentFiles;
    use crate::transform::ScaleMode;

    /// Records requests and answers with canned results.
    #[derive(Default)]
    struct MockProcessor {
        fail: bool,
        applied: Vec<ApplyRequest>,
        exported: Vec<ExportRequest>,
    }

    impl MockProcessor {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        fn error(&self) -> ProcessError {
            ProcessError::InvalidRequest("mock failure".to_string())
        }
    }

    impl ImageProcessor for MockProcessor {
        fn open(&mut self, path: &Path) -> Result<OpenedImage, ProcessError> {
            if self.fail {
                return Err(ProcessError::decode(path, "not an image"));
            }
            Ok(opened(64, 48))
        }

        fn apply_edits(&mut self, request: &ApplyRequest) -> Result<OpenedImage, ProcessError> {
            if self.fail {
                return Err(self.error());
            }
            self.applied.push(request.clone());
            Ok(opened(request.edits.target_width, request.edits.target_height))
        }

        fn applied_path(&self) -> Result<PathBuf, ProcessError> {
            Ok(PathBuf::from("/work/_applied.png"))
        }

        fn export_image(&mut self, request: &ExportRequest) -> Result<PathBuf, ProcessError> {
            if self.fail {
                return Err(self.error());
            }
            self.exported.push(request.clone());
            Ok(request.output_path.clone())
        }
    }

    #[test]
    fn test_open_records_recent() {
        let mut s = EditorSession::new(EditorConfig::default());
        let mut processor = MockProcessor::default();
        let recent = MemoryRecentFiles::new(vec!["/old.png".to_string()]);

        s.open_with(&mut processor, &recent, Path::new("/photos/new.png"))
            .unwrap();
        assert_eq!(s.image().unwrap().natural_size(), (64, 48));
        assert_eq!(recent.load().unwrap(), vec!["/photos/new.png", "/old.png"]);
    }

    #[test]
    fn test_open_failure_keeps_current_image() {
        let mut s = session(10, 10);
        let mut processor = MockProcessor::failing();
        let recent = MemoryRecentFiles::default();

        let err = s
            .open_with(&mut processor, &recent, Path::new("/broken.png"))
            .unwrap_err();
        assert!(matches!(err, EditorError::Decode(_)));
        assert_eq!(s.source_path(), Some(Path::new("/photos/test.png")));
        assert!(recent.load().unwrap().is_empty());
    }

    #[test]
    fn test_begin_without_image() {
        let mut s = EditorSession::new(EditorConfig::default());
        assert!(matches!(s.begin_apply(), Err(EditorError::NoImage)));
        assert!(!s.is_busy());
    }

    #[test]
    fn test_overlapping_requests_rejected() {
        let mut s = session(10, 10);
        s.begin_apply().unwrap();
        assert!(s.is_busy());

        let options = ExportOptions::new("/out.png", OutputFormat::Png);
        assert!(matches!(s.begin_export(&options), Err(EditorError::RequestInFlight)));
        assert!(matches!(s.begin_apply(), Err(EditorError::RequestInFlight)));
    }

    #[test]
    fn test_apply_round_trip_resets_edits() {
        let mut s = session(80, 60);
        s.set_grayscale(true);
        s.rotate_cw();
        s.edit.strokes.commit(Stroke {
            points: vec![(0.5, 0.5)],
            radius: 0.1,
        });

        let request = s.begin_apply().unwrap();
        assert_eq!(request.source_path, PathBuf::from("/photos/test.png"));
        assert_eq!(request.edits.mode, ScaleMode::CropThenScale);
        assert_eq!(request.edits.pixelate_strokes.len(), 1);
        // Rotation swapped the target
        assert_eq!((request.edits.target_width, request.edits.target_height), (60, 80));

        s.finish_apply(opened(60, 80), "/work/_applied.png").unwrap();
        assert!(!s.is_busy());
        assert_eq!(s.source_path(), Some(Path::new("/work/_applied.png")));
        assert_eq!(s.edit().rotation, Rotation::Deg0);
        assert!(!s.edit().grayscale);
        assert!(!s.can_undo());
        assert_eq!(s.edit().target_size(), (60, 80));
    }

    /// Paint one stroke, undo it, then press again so a second stroke is
    /// in progress with the first waiting on the redo stack.
    fn painting_with_redo() -> EditorSession {
        let mut s = session(100, 100);
        s.set_tool(super::super::Tool::Pixelate);
        s.pointer_down((100.0, 100.0), (200.0, 200.0));
        s.pointer_up((100.0, 100.0), (200.0, 200.0));
        assert!(s.undo());
        assert!(s.pointer_down((120.0, 120.0), (200.0, 200.0)));
        s
    }

    #[test]
    fn test_request_includes_stroke_in_progress() {
        let mut s = painting_with_redo();
        let before = s.edit().clone();

        let request = s.begin_apply().unwrap();
        assert_eq!(request.edits.pixelate_strokes.len(), 1);
        assert_eq!(s.edit(), &before);
        assert!(s.can_redo());
    }

    #[test]
    fn test_failed_export_mid_stroke_leaves_edits() {
        let mut s = painting_with_redo();
        let before = s.edit().clone();

        s.begin_export(&ExportOptions::new("/out.png", OutputFormat::Png))
            .unwrap();
        assert_eq!(s.fail_request().unwrap(), RequestKind::Export);
        assert_eq!(s.edit(), &before);
        assert_eq!(s.edit().strokes.redo_stack().len(), 1);
        assert!(s.edit().strokes.applied().is_empty());

        // The gesture is still live and commits on release
        s.pointer_up((120.0, 120.0), (200.0, 200.0));
        assert_eq!(s.edit().strokes.applied().len(), 1);
    }

    #[test]
    fn test_failed_apply_mid_stroke_leaves_edits() {
        let mut s = painting_with_redo();
        let before = s.edit().clone();
        let mut processor = MockProcessor::failing();

        assert!(s.apply_with(&mut processor).is_err());
        assert_eq!(s.edit(), &before);
        assert!(!s.is_busy());
    }

    #[test]
    fn test_failed_request_leaves_state() {
        let mut s = session(20, 20);
        s.set_brightness(30);
        s.begin_apply().unwrap();

        assert_eq!(s.fail_request().unwrap(), RequestKind::Apply);
        assert!(!s.is_busy());
        assert_eq!(s.edit().brightness(), 30);
        assert_eq!(s.source_path(), Some(Path::new("/photos/test.png")));
        assert!(matches!(s.fail_request(), Err(EditorError::NoPendingRequest)));
    }

    #[test]
    fn test_finish_wrong_kind() {
        let mut s = session(20, 20);
        s.begin_export(&ExportOptions::new("/out.png", OutputFormat::Png))
            .unwrap();
        assert!(matches!(
            s.finish_apply(opened(20, 20), "/x.png"),
            Err(EditorError::NoPendingRequest)
        ));
        assert!(s.is_busy());
        s.finish_export().unwrap();
        assert!(!s.is_busy());
    }

    #[test]
    fn test_apply_with_processor() {
        let mut s = session(40, 40);
        s.set_target_size(20, 10);
        let mut processor = MockProcessor::default();

        s.apply_with(&mut processor).unwrap();
        assert_eq!(processor.applied.len(), 1);
        assert_eq!(s.image().unwrap().natural_size(), (20, 10));
        assert_eq!(s.source_path(), Some(Path::new("/work/_applied.png")));
    }

    #[test]
    fn test_apply_failure_keeps_edits() {
        let mut s = session(40, 40);
        s.set_contrast(-40);
        let mut processor = MockProcessor::failing();

        let err = s.apply_with(&mut processor).unwrap_err();
        assert!(matches!(err, EditorError::Processing(_)));
        assert!(!s.is_busy());
        assert_eq!(s.edit().contrast(), -40);
        assert_eq!(s.image().unwrap().natural_size(), (40, 40));
    }

    #[test]
    fn test_export_keeps_edits() {
        let mut s = session(40, 40);
        s.set_grayscale(true);
        let mut processor = MockProcessor::default();
        let mut options = ExportOptions::new("/out/photo.jpg", OutputFormat::Jpeg);
        options.jpeg_quality = 250;
        options.mode = ScaleMode::ScaleThenCrop;

        let path = s.export_with(&mut processor, &options).unwrap();
        assert_eq!(path, PathBuf::from("/out/photo.jpg"));
        assert!(s.edit().grayscale);
        assert!(!s.is_busy());

        let request = &processor.exported[0];
        assert_eq!(request.jpeg_quality, 100);
        assert_eq!(request.edits.mode, ScaleMode::ScaleThenCrop);
        assert!(request.edits.grayscale);
    }

    #[test]
    fn test_export_failure_releases() {
        let mut s = session(40, 40);
        let mut processor = MockProcessor::failing();
        let options = ExportOptions::new("/out.png", OutputFormat::Png);
        assert!(s.export_with(&mut processor, &options).is_err());
        assert!(!s.is_busy());
    }
}
