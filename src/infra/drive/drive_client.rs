use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::json;

use crate::core::gateway::{AccessTokenProvider, GatewayError};
use crate::core::links::DocumentRef;

const FOLDER_MIME: &str = "application/vnd.google-apps.folder";

/// Kind of empty file [`DriveClient::create_file`] can create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Spreadsheet,
    Document,
    Presentation,
}

impl FileKind {
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Spreadsheet => "application/vnd.google-apps.spreadsheet",
            Self::Document => "application/vnd.google-apps.document",
            Self::Presentation => "application/vnd.google-apps.presentation",
        }
    }
}

/// One entry of a folder listing.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FileSummary {
    pub id: String,
    pub name: String,
    pub mime_type: String,
}

#[derive(Debug, Deserialize)]
struct FileListResponse {
    #[serde(default)]
    files: Vec<FileSummary>,
}

#[derive(Debug, Deserialize)]
struct FileIdResponse {
    id: String,
}

/// Google-native documents cannot be downloaded as raw media; they must be
/// exported. Maps the native MIME type to the Office format we export to.
fn export_format(mime_type: &str) -> Option<&'static str> {
    match mime_type {
        "application/vnd.google-apps.document" => {
            Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document")
        }
        "application/vnd.google-apps.spreadsheet" => {
            Some("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet")
        }
        "application/vnd.google-apps.presentation" => {
            Some("application/vnd.openxmlformats-officedocument.presentationml.presentation")
        }
        _ => None,
    }
}

/// Formats the shareable view link for a file id.
pub fn shareable_link(file_id: &str) -> String {
    format!("https://drive.google.com/file/d/{}/view?usp=sharing", file_id)
}

/// Client for the Drive v3 API. It deliberately exposes only the file and
/// folder operations the gateway needs.
pub struct DriveClient {
    auth: Arc<dyn AccessTokenProvider>,
    client: Client,
    base_url: String,
}

impl DriveClient {
    pub fn new(auth: Arc<dyn AccessTokenProvider>) -> Self {
        Self {
            auth,
            client: Client::new(),
            base_url: "https://www.googleapis.com/drive/v3".to_string(),
        }
    }

    /// Copies a file the account has access to into a folder, under a new
    /// name. Returns the id of the copy.
    pub async fn copy_file(
        &self,
        file: &DocumentRef,
        folder: &DocumentRef,
        copy_title: &str,
    ) -> Result<String, GatewayError> {
        let file_id = file.resolve()?;
        let folder_id = folder.resolve()?;
        let token = self.auth.access_token().await?;

        let url = format!("{}/files/{}/copy", self.base_url, file_id);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&token)
            .query(&[("supportsAllDrives", "true")])
            .json(&json!({ "parents": [folder_id], "name": copy_title }))
            .send()
            .await
            .map_err(GatewayError::transport)?;
        let resp = check_status(resp).await?;

        let copied: FileIdResponse = resp.json().await.map_err(GatewayError::transport)?;
        tracing::info!("copied file {} -> {} ({})", file_id, copied.id, copy_title);
        Ok(copied.id)
    }

    /// Lists the files directly inside a folder, optionally filtered by
    /// MIME type. Trashed files are excluded.
    pub async fn list_folder_files(
        &self,
        folder: &DocumentRef,
        mime_type: Option<&str>,
    ) -> Result<Vec<FileSummary>, GatewayError> {
        let folder_id = folder.resolve()?;
        let token = self.auth.access_token().await?;

        let query = match mime_type {
            Some(mime) => format!("'{}' in parents and mimeType='{}' and trashed=false", folder_id, mime),
            None => format!("'{}' in parents and trashed=false", folder_id),
        };

        let url = format!("{}/files", self.base_url);
        let resp = self
            .client
            .get(&url)
            .bearer_auth(&token)
            .query(&[
                ("q", query.as_str()),
                ("pageSize", "1000"),
                ("spaces", "drive"),
                ("fields", "nextPageToken, files(id, name, mimeType)"),
                ("supportsAllDrives", "true"),
                ("includeItemsFromAllDrives", "true"),
            ])
            .send()
            .await
            .map_err(GatewayError::transport)?;
        let resp = check_status(resp).await?;

        let listing: FileListResponse = resp.json().await.map_err(GatewayError::transport)?;
        Ok(listing.files)
    }

    /// Downloads a file to a local path, creating parent directories.
    ///
    /// Google-native documents are exported to their Office equivalent;
    /// everything else is fetched as raw media. Pass the file's MIME type
    /// when known so the export path can be chosen.
    pub async fn download_file(
        &self,
        file: &DocumentRef,
        local_path: &Path,
        mime_type: Option<&str>,
    ) -> Result<(), GatewayError> {
        let file_id = file.resolve()?;
        let token = self.auth.access_token().await?;

        let request = match mime_type.and_then(export_format) {
            Some(export_mime) => self
                .client
                .get(format!("{}/files/{}/export", self.base_url, file_id))
                .query(&[("mimeType", export_mime)]),
            None => self
                .client
                .get(format!("{}/files/{}", self.base_url, file_id))
                .query(&[("alt", "media")]),
        };

        let resp = request
            .bearer_auth(&token)
            .send()
            .await
            .map_err(GatewayError::transport)?;
        let resp = check_status(resp).await?;
        let bytes = resp.bytes().await.map_err(GatewayError::transport)?;

        if let Some(parent) = local_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(GatewayError::transport)?;
        }
        tokio::fs::write(local_path, &bytes)
            .await
            .map_err(GatewayError::transport)?;

        tracing::info!("downloaded {} to {}", file_id, local_path.display());
        Ok(())
    }

    /// Downloads every file in a folder (recursing into subfolders) into a
    /// local directory. Returns a map of file name to shareable link.
    pub async fn download_folder(
        &self,
        folder: &DocumentRef,
        local_dir: &Path,
    ) -> Result<HashMap<String, String>, GatewayError> {
        let mut access_links = HashMap::new();
        // Iterative walk; async recursion would need boxing for no benefit.
        let mut pending: Vec<(String, PathBuf)> =
            vec![(folder.resolve()?, local_dir.to_path_buf())];

        while let Some((folder_id, dir)) = pending.pop() {
            let items = self
                .list_folder_files(&DocumentRef::Id(folder_id), None)
                .await?;
            for item in items {
                let item_path = dir.join(&item.name);
                if item.mime_type == FOLDER_MIME {
                    pending.push((item.id, item_path));
                } else {
                    self.download_file(
                        &DocumentRef::Id(item.id.clone()),
                        &item_path,
                        Some(&item.mime_type),
                    )
                    .await?;
                    access_links.insert(item.name, shareable_link(&item.id));
                }
            }
        }

        Ok(access_links)
    }

    /// Creates an empty spreadsheet, document or presentation inside a
    /// folder. Returns the new file's id.
    pub async fn create_file(
        &self,
        file_name: &str,
        kind: FileKind,
        folder: &DocumentRef,
    ) -> Result<String, GatewayError> {
        let folder_id = folder.resolve()?;
        let token = self.auth.access_token().await?;

        let url = format!("{}/files", self.base_url);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&token)
            .query(&[("fields", "id")])
            .json(&json!({
                "name": file_name,
                "mimeType": kind.mime_type(),
                "parents": [folder_id],
            }))
            .send()
            .await
            .map_err(GatewayError::transport)?;
        let resp = check_status(resp).await?;

        let created: FileIdResponse = resp.json().await.map_err(GatewayError::transport)?;
        tracing::info!("created {:?} '{}' with id {}", kind, file_name, created.id);
        Ok(created.id)
    }
}

/// Turns a non-2xx response into a `GatewayError::Api` carrying the body.
pub(crate) async fn check_status(resp: Response) -> Result<Response, GatewayError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(GatewayError::Api {
        status: status.as_u16(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shareable_link_format() {
        assert_eq!(
            shareable_link("abc123"),
            "https://drive.google.com/file/d/abc123/view?usp=sharing"
        );
    }

    #[test]
    fn native_docs_get_export_formats() {
        assert_eq!(
            export_format("application/vnd.google-apps.spreadsheet"),
            Some("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet")
        );
        assert_eq!(
            export_format("application/vnd.google-apps.document"),
            Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document")
        );
        assert!(export_format("image/png").is_none());
    }

    #[test]
    fn file_kind_mime_types() {
        assert_eq!(
            FileKind::Presentation.mime_type(),
            "application/vnd.google-apps.presentation"
        );
        assert_eq!(
            FileKind::Spreadsheet.mime_type(),
            "application/vnd.google-apps.spreadsheet"
        );
    }
}
