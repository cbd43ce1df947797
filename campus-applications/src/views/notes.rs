//! PDF notes: list, upload and save downloads to disk

use campus_api::{CampusClient, DownloadedFile, PdfDocument, UploadFile};
use campus_core::{validation_error, with_cancellation, CampusResult, CancellationToken};
use std::path::{Path, PathBuf};
use tracing::info;

/// Newest uploads first
pub async fn list_notes(
    client: &CampusClient,
    token: &CancellationToken,
) -> CampusResult<Vec<PdfDocument>> {
    let mut pdfs = with_cancellation(token, "list_notes", client.list_pdfs()).await?;
    pdfs.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
    Ok(pdfs)
}

pub async fn upload_notes(client: &CampusClient, title: &str, path: &Path) -> CampusResult<()> {
    let is_pdf = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));
    if !is_pdf {
        return Err(validation_error!(
            "Please provide a PDF file",
            "file",
            "notes"
        ));
    }

    let file = UploadFile::from_path(path).await?;
    client.upload_pdf(title, file).await?;
    info!(title, "Uploaded notes");
    Ok(())
}

/// Write a downloaded file into `dir` under its announced name
pub async fn save_download(file: &DownloadedFile, dir: &Path) -> CampusResult<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let target = dir.join(&file.file_name);
    tokio::fs::write(&target, &file.bytes).await?;
    info!(path = %target.display(), size = file.bytes.len(), "Saved download");
    Ok(target)
}

pub async fn download_notes(
    client: &CampusClient,
    id: i64,
    dir: &Path,
    token: &CancellationToken,
) -> CampusResult<PathBuf> {
    let file = with_cancellation(token, "download_notes", client.download_pdf(id)).await?;
    save_download(&file, dir).await
}
