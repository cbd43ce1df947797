//! Lecture notes stored as PDFs

use crate::client::{CampusClient, UploadFile};
use campus_core::{validation_error, CampusError, CampusResult, ErrorContext};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

const DEFAULT_DOWNLOAD_NAME: &str = "download.pdf";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdfDocument {
    pub id: i64,
    pub title: String,
    pub file: String,
    pub uploaded_at: String,
}

#[derive(Debug, Clone)]
pub struct DownloadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// File name announced by a `Content-Disposition` header.
///
/// Only the final path component is kept so a hostile header cannot point
/// outside the download directory.
pub fn filename_from_disposition(header: Option<&str>) -> String {
    header
        .and_then(|value| value.split("filename=").nth(1))
        .map(|raw| raw.split(';').next().unwrap_or(raw).replace('"', ""))
        .map(|name| name.trim().to_string())
        .and_then(|name| {
            Path::new(&name)
                .file_name()
                .and_then(|n| n.to_str())
                .map(str::to_string)
        })
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_DOWNLOAD_NAME.to_string())
}

impl CampusClient {
    /// `GET get-all-pdfs/`
    pub async fn list_pdfs(&self) -> CampusResult<Vec<PdfDocument>> {
        self.get_json("get-all-pdfs/", &[], "list_pdfs").await
    }

    /// `POST upload-pdf/` with `title` and `file` fields
    pub async fn upload_pdf(
        &self,
        title: &str,
        file: UploadFile,
    ) -> CampusResult<serde_json::Value> {
        if title.trim().is_empty() {
            return Err(validation_error!(
                "Please provide a topic and PDF file",
                "title",
                "pdfs"
            ));
        }

        let form = reqwest::multipart::Form::new()
            .text("title", title.trim().to_string())
            .part("file", file.into_part()?);
        self.post_multipart("upload-pdf/", form, "upload_pdf").await
    }

    /// `GET get-all-pdfs/?download=<id>`
    pub async fn download_pdf(&self, id: i64) -> CampusResult<DownloadedFile> {
        let operation = "download_pdf";
        let token = self.bearer(operation)?;
        let request = self
            .http()
            .get(self.url("get-all-pdfs/"))
            .bearer_auth(token)
            .query(&[("download", id.to_string())]);

        let response = self.send(request, operation).await?;
        let file_name = filename_from_disposition(
            response
                .headers()
                .get(reqwest::header::CONTENT_DISPOSITION)
                .and_then(|v| v.to_str().ok()),
        );

        let bytes = response.bytes().await.map_err(|e| CampusError::Network {
            message: format!("Failed to read download: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("pdfs").with_operation(operation),
        })?;

        debug!(id, file_name = %file_name, size = bytes.len(), "Downloaded PDF");
        Ok(DownloadedFile {
            file_name,
            bytes: bytes.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_from_disposition() {
        assert_eq!(
            filename_from_disposition(Some(r#"attachment; filename="graphs.pdf""#)),
            "graphs.pdf"
        );
        assert_eq!(
            filename_from_disposition(Some("attachment; filename=notes.pdf; size=10")),
            "notes.pdf"
        );
        assert_eq!(filename_from_disposition(Some("inline")), "download.pdf");
        assert_eq!(filename_from_disposition(None), "download.pdf");
        assert_eq!(
            filename_from_disposition(Some(r#"attachment; filename="../../etc/passwd""#)),
            "passwd"
        );
    }
}
