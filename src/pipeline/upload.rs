use std::path::Path;

use serde::Serialize;

const MAX_UPLOAD_SIZE: u64 = 50 * 1024 * 1024; // 50MB

/// A file picked by the user: an image for the imaging modules or a lab
/// report PDF for the scraper.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Upload {
    pub file_name: String,
    pub mime_type: String,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for Upload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Upload")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl Upload {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: sanitize_filename(&file_name.into()),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Read a file, taking the MIME type from its extension and falling
    /// back to magic bytes when the extension says nothing.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let size = std::fs::metadata(path)?.len();
        if size > MAX_UPLOAD_SIZE {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("{} exceeds {}MB", path.display(), MAX_UPLOAD_SIZE / (1024 * 1024)),
            ));
        }
        let bytes = std::fs::read(path)?;
        let mime_type = match mime_guess::from_path(path).first() {
            Some(mime) => mime.essence_str().to_string(),
            None => detect_mime(&bytes).to_string(),
        };
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();
        Ok(Self::new(file_name, mime_type, bytes))
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    pub fn is_pdf(&self) -> bool {
        self.mime_type == "application/pdf"
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// MIME type from magic bytes (NOT file extensions).
pub fn detect_mime(bytes: &[u8]) -> &'static str {
    match bytes {
        [0x25, 0x50, 0x44, 0x46, ..] => "application/pdf",
        [0xFF, 0xD8, 0xFF, ..] => "image/jpeg",
        [0x89, 0x50, 0x4E, 0x47, ..] => "image/png",
        [0x49, 0x49, 0x2A, 0x00, ..] | [0x4D, 0x4D, 0x00, 0x2A, ..] => "image/tiff",
        [b'G', b'I', b'F', b'8', ..] => "image/gif",
        [b'B', b'M', ..] => "image/bmp",
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => "image/webp",
        _ => "application/octet-stream",
    }
}

const MAX_FILE_NAME_CHARS: usize = 255;

/// Name sent in multipart parts: last path segment of either separator
/// style, control characters dropped, capped at 255 chars.
pub fn sanitize_filename(original: &str) -> String {
    let segment = original
        .rsplit(['/', '\\'])
        .find(|s| !s.trim().is_empty())
        .unwrap_or_default();

    let clean: String = segment
        .chars()
        .filter(|c| !c.is_control())
        .take(MAX_FILE_NAME_CHARS)
        .collect();

    match clean.trim() {
        "" | "." | ".." => "upload".to_string(),
        name => name.to_string(),
    }
}
