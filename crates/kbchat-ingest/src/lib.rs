//! Attachment ingestion for kbchat
//!
//! Converts user-selected files into in-memory attachment records: a base64
//! payload, the detected media type, and for images a revocable preview
//! handle. Only images and PDFs are accepted; everything else is rejected
//! per-file without aborting the rest of the batch.

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Per-file ingestion failure. Non-fatal: the remaining files in a batch are
/// still processed.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("{file_name} is not supported (detected {media_type}); only images and PDFs can be attached")]
    UnsupportedMediaType {
        file_name: String,
        media_type: String,
    },
    #[error("failed to read {file_name}: {source}")]
    ReadFailed {
        file_name: String,
        #[source]
        source: std::io::Error,
    },
}

impl IngestError {
    pub fn file_name(&self) -> &str {
        match self {
            IngestError::UnsupportedMediaType { file_name, .. } => file_name,
            IngestError::ReadFailed { file_name, .. } => file_name,
        }
    }
}

/// Locally-resolvable preview for an image attachment.
///
/// Holds a temp file with the image bytes; dropping the handle deletes the
/// file, so a released preview can no longer be resolved.
#[derive(Debug)]
pub struct PreviewHandle {
    file: NamedTempFile,
}

impl PreviewHandle {
    fn new(bytes: &[u8]) -> std::io::Result<Self> {
        let mut file = NamedTempFile::new()?;
        file.write_all(bytes)?;
        file.flush()?;
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// A user-selected file, ingested and ready to display.
///
/// Attachments live in the pending list until removed or the session resets;
/// they are not part of any conversation message.
#[derive(Debug)]
pub struct Attachment {
    pub source_path: PathBuf,
    pub media_type: String,
    pub base64_payload: String,
    pub preview: Option<PreviewHandle>,
}

impl Attachment {
    pub fn file_name(&self) -> String {
        self.source_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source_path.display().to_string())
    }

    pub fn preview_path(&self) -> Option<&Path> {
        self.preview.as_ref().map(|p| p.path())
    }
}

/// Outcome of ingesting a batch of files.
#[derive(Debug, Default)]
pub struct IngestReport {
    pub attachments: Vec<Attachment>,
    pub rejected: Vec<IngestError>,
}

fn detect_media_type(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

fn is_supported(media_type: &str) -> bool {
    media_type.starts_with("image/") || media_type == "application/pdf"
}

fn display_file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Ingest a batch of files. Unsupported or unreadable files end up in
/// `rejected`; the rest become attachments.
pub async fn ingest_files(paths: &[PathBuf]) -> IngestReport {
    let mut report = IngestReport::default();

    for path in paths {
        let file_name = display_file_name(path);
        let media_type = detect_media_type(path);

        if !is_supported(&media_type) {
            report.rejected.push(IngestError::UnsupportedMediaType {
                file_name,
                media_type,
            });
            continue;
        }

        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(source) => {
                report
                    .rejected
                    .push(IngestError::ReadFailed { file_name, source });
                continue;
            }
        };

        // Preview handles only exist for images; a dropped handle deletes
        // the backing file.
        let preview = if media_type.starts_with("image/") {
            match PreviewHandle::new(&bytes) {
                Ok(handle) => Some(handle),
                Err(source) => {
                    report
                        .rejected
                        .push(IngestError::ReadFailed { file_name, source });
                    continue;
                }
            }
        } else {
            None
        };

        report.attachments.push(Attachment {
            source_path: path.clone(),
            media_type,
            base64_payload: BASE64_STANDARD.encode(&bytes),
            preview,
        });
    }

    report
}

/// The session's live attachment list. Removal is by positional index, the
/// order users see them in.
#[derive(Debug, Default)]
pub struct PendingAttachments {
    items: Vec<Attachment>,
}

impl PendingAttachments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, attachment: Attachment) {
        self.items.push(attachment);
    }

    pub fn extend(&mut self, attachments: Vec<Attachment>) {
        self.items.extend(attachments);
    }

    /// Remove and return the attachment at `index`, releasing nothing until
    /// the caller drops it. Returns None for an out-of-range index.
    pub fn remove(&mut self, index: usize) -> Option<Attachment> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    /// Drop every pending attachment, releasing their previews.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attachment> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn write_fixture(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
        let path = dir.join(name);
        tokio::fs::write(&path, bytes).await.unwrap();
        path
    }

    #[tokio::test]
    async fn test_image_ingestion_produces_preview_and_payload() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(dir.path(), "photo.png", b"not-a-real-png").await;

        let report = ingest_files(&[path]).await;
        assert_eq!(report.attachments.len(), 1);
        assert!(report.rejected.is_empty());

        let attachment = &report.attachments[0];
        assert_eq!(attachment.media_type, "image/png");
        assert_eq!(
            attachment.base64_payload,
            BASE64_STANDARD.encode(b"not-a-real-png")
        );
        assert!(attachment.preview_path().unwrap().exists());
    }

    #[tokio::test]
    async fn test_pdf_ingestion_has_no_preview() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(dir.path(), "manual.pdf", b"%PDF-1.4").await;

        let report = ingest_files(&[path]).await;
        assert_eq!(report.attachments.len(), 1);
        assert!(report.attachments[0].preview.is_none());
        assert_eq!(report.attachments[0].media_type, "application/pdf");
    }

    #[tokio::test]
    async fn test_txt_file_is_rejected_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(dir.path(), "notes.txt", b"plain text").await;

        let report = ingest_files(&[path]).await;
        assert!(report.attachments.is_empty());
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].file_name(), "notes.txt");
        assert!(matches!(
            report.rejected[0],
            IngestError::UnsupportedMediaType { .. }
        ));
    }

    #[tokio::test]
    async fn test_partial_failure_keeps_processing() {
        let dir = tempfile::tempdir().unwrap();
        let bad = write_fixture(dir.path(), "notes.txt", b"plain text").await;
        let good = write_fixture(dir.path(), "scan.jpg", b"jpeg-bytes").await;
        let missing = dir.path().join("ghost.png");

        let report = ingest_files(&[bad, missing, good]).await;
        assert_eq!(report.attachments.len(), 1);
        assert_eq!(report.attachments[0].file_name(), "scan.jpg");
        assert_eq!(report.rejected.len(), 2);
    }

    #[tokio::test]
    async fn test_preview_released_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(dir.path(), "photo.png", b"bytes").await;

        let mut report = ingest_files(&[path]).await;
        let attachment = report.attachments.pop().unwrap();
        let preview_path = attachment.preview_path().unwrap().to_path_buf();
        assert!(preview_path.exists());

        drop(attachment);
        assert!(!preview_path.exists());
    }

    #[tokio::test]
    async fn test_pending_removal_by_index() {
        let dir = tempfile::tempdir().unwrap();
        let first = write_fixture(dir.path(), "a.png", b"a").await;
        let second = write_fixture(dir.path(), "b.png", b"b").await;

        let report = ingest_files(&[first, second]).await;
        let mut pending = PendingAttachments::new();
        pending.extend(report.attachments);
        assert_eq!(pending.len(), 2);

        let removed = pending.remove(0).unwrap();
        assert_eq!(removed.file_name(), "a.png");
        assert_eq!(pending.len(), 1);
        assert_eq!(pending.iter().next().unwrap().file_name(), "b.png");

        assert!(pending.remove(5).is_none());

        pending.clear();
        assert!(pending.is_empty());
    }
}
