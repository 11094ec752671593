// upload.rs
use async_trait::async_trait;
use base64::prelude::*;
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 5 MB ceiling on product images.
pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

lazy_static! {
    static ref IMAGE_MIME: Regex = Regex::new(r"^image/").unwrap();
    static ref DATA_URL: Regex = Regex::new(r"^data:([^;,]+);base64,(.*)$").unwrap();
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UploadRejection {
    NotAnImage,
    TooLarge,
}

impl fmt::Display for UploadRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadRejection::NotAnImage => f.write_str("Please upload an image file (JPG, PNG, WEBP)"),
            UploadRejection::TooLarge => f.write_str("File size exceeds 5MB limit"),
        }
    }
}

#[derive(Debug, Error)]
pub enum DataUrlError {
    #[error("Not a base64 data URL")]
    NotDataUrl,
    #[error(transparent)]
    Base64(#[from] base64::DecodeError),
}

#[derive(Debug, Error)]
#[error("Failed to read file")]
pub struct ReadError(#[from] pub std::io::Error);

/// A file picked by the user: declared metadata up front, contents on demand.
#[async_trait]
pub trait FileSource: Send + Sync {
    fn mime_type(&self) -> &str;
    fn size(&self) -> u64;
    async fn read(&self) -> Result<Vec<u8>, ReadError>;
}

#[derive(Clone, Debug)]
pub struct DiskFile {
    path: PathBuf,
    mime_type: String,
    size: u64,
}

impl DiskFile {
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, ReadError> {
        let path = path.as_ref().to_path_buf();
        let metadata = tokio::fs::metadata(&path).await?;
        Ok(DiskFile {
            mime_type: guess_mime_type(&path).to_string(),
            size: metadata.len(),
            path,
        })
    }
}

#[async_trait]
impl FileSource for DiskFile {
    fn mime_type(&self) -> &str {
        &self.mime_type
    }

    fn size(&self) -> u64 {
        self.size
    }

    async fn read(&self) -> Result<Vec<u8>, ReadError> {
        Ok(tokio::fs::read(&self.path).await?)
    }
}

pub fn guess_mime_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}

/// Type is checked before size.
pub fn validate_upload(mime_type: &str, size: u64) -> Result<(), UploadRejection> {
    if !IMAGE_MIME.is_match(mime_type) {
        return Err(UploadRejection::NotAnImage);
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(UploadRejection::TooLarge);
    }
    Ok(())
}

pub fn to_data_url(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, BASE64_STANDARD.encode(bytes))
}

/// Splits a base64 `data:` URL into its MIME type and decoded bytes.
pub fn decode_data_url(url: &str) -> Result<(String, Vec<u8>), DataUrlError> {
    let captures = DATA_URL.captures(url).ok_or(DataUrlError::NotDataUrl)?;
    let bytes = BASE64_STANDARD.decode(&captures[2])?;
    Ok((captures[1].to_string(), bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn rejects_non_images_before_checking_size() {
        assert_eq!(validate_upload("text/plain", 1024 * 1024), Err(UploadRejection::NotAnImage));
        assert_eq!(validate_upload("text/plain", 50 * 1024 * 1024), Err(UploadRejection::NotAnImage));
        assert_eq!(validate_upload("", 10), Err(UploadRejection::NotAnImage));
    }

    #[test]
    fn size_limit_is_inclusive() {
        assert_eq!(validate_upload("image/png", MAX_UPLOAD_BYTES), Ok(()));
        assert_eq!(validate_upload("image/png", MAX_UPLOAD_BYTES + 1), Err(UploadRejection::TooLarge));
        assert_eq!(validate_upload("image/png", 6 * 1024 * 1024), Err(UploadRejection::TooLarge));
    }

    #[test]
    fn rejection_messages() {
        assert_eq!(UploadRejection::TooLarge.to_string(), "File size exceeds 5MB limit");
        assert_eq!(
            UploadRejection::NotAnImage.to_string(),
            "Please upload an image file (JPG, PNG, WEBP)"
        );
    }

    #[test]
    fn data_url_round_trip() {
        let url = to_data_url("image/png", b"\x89PNG");
        assert_eq!(url, "data:image/png;base64,iVBORw==");
        let (mime, bytes) = decode_data_url(&url).unwrap();
        assert_eq!(mime, "image/png");
        assert_eq!(bytes, b"\x89PNG");
        assert!(matches!(
            decode_data_url("https://example.com/a.png"),
            Err(DataUrlError::NotDataUrl)
        ));
        assert!(matches!(
            decode_data_url("data:image/png;base64,@@@"),
            Err(DataUrlError::Base64(_))
        ));
    }

    #[tokio::test]
    async fn disk_file_reports_metadata_and_contents() {
        let mut file = tempfile::Builder::new().suffix(".JPG").tempfile().unwrap();
        file.write_all(b"jpeg bytes").unwrap();

        let disk = DiskFile::open(file.path()).await.unwrap();
        assert_eq!(disk.mime_type(), "image/jpeg");
        assert_eq!(disk.size(), 10);
        assert_eq!(disk.read().await.unwrap(), b"jpeg bytes");
    }

    #[tokio::test]
    async fn missing_file_is_a_read_error() {
        let err = DiskFile::open("/definitely/not/here.png").await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to read file");
    }
}
