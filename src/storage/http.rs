use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{multipart, Client, RequestBuilder, Response, StatusCode, Url};
use tracing::{debug, warn};

use super::{RemotePath, StorageApi};
use crate::error::StorageError;
use crate::models::{Entry, RenameRequest};

const API_PREFIX: &str = "api/storage/";

/// [`StorageApi`] backed by the REST endpoints under `/api/storage`.
#[derive(Debug, Clone)]
pub struct HttpStorage {
    client: Client,
    base_url: Url,
}

impl HttpStorage {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = normalize_base(base_url)?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, operation: &str) -> Result<Url, StorageError> {
        self.base_url
            .join(&format!("{API_PREFIX}{operation}"))
            .map_err(|e| StorageError::Transport(format!("Bad endpoint {operation}: {e}")))
    }
}

/// Parses the server root and makes sure it ends with `/` so that
/// relative endpoint joins keep any path prefix.
pub fn normalize_base(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw).with_context(|| format!("Invalid server URL: {raw}"))?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

impl HttpStorage {
    fn list_request(&self, path: &RemotePath) -> Result<RequestBuilder, StorageError> {
        Ok(self
            .client
            .get(self.endpoint("content")?)
            .query(&[("userPath", path.as_query())]))
    }

    fn create_request(&self, path: &RemotePath, name: &str) -> Result<RequestBuilder, StorageError> {
        Ok(self
            .client
            .post(self.endpoint("create")?)
            .query(&[("userPath", path.as_query().as_str()), ("directoryName", name)]))
    }

    fn delete_files_request(
        &self,
        path: &RemotePath,
        names: &[String],
    ) -> Result<RequestBuilder, StorageError> {
        Ok(self
            .client
            .delete(self.endpoint("deleteFile")?)
            .query(&[("userPath", path.as_query())])
            .json(names))
    }

    fn delete_directory_request(
        &self,
        path: &RemotePath,
        name: &str,
        confirmed: bool,
    ) -> Result<RequestBuilder, StorageError> {
        let confirmed = if confirmed { "true" } else { "false" };
        Ok(self
            .client
            .delete(self.endpoint("deleteDirectory")?)
            .query(&[
                ("userPath", path.as_query().as_str()),
                ("directoryName", name),
                ("confirmed", confirmed),
            ]))
    }

    fn rename_request(
        &self,
        path: &RemotePath,
        old_name: &str,
        new_name: &str,
    ) -> Result<RequestBuilder, StorageError> {
        let user_path = path.as_query();
        let body = RenameRequest {
            old_name,
            new_name,
            user_path: &user_path,
        };
        Ok(self.client.post(self.endpoint("rename")?).json(&body))
    }

    fn upload_request(
        &self,
        path: &RemotePath,
        file_name: String,
        data: Vec<u8>,
    ) -> Result<RequestBuilder, StorageError> {
        let part = multipart::Part::bytes(data).file_name(file_name);
        let form = multipart::Form::new()
            .part("file", part)
            .text("userPath", path.as_query());
        Ok(self.client.post(self.endpoint("upload")?).multipart(form))
    }
}

impl StorageApi for HttpStorage {
    async fn list(&self, path: &RemotePath) -> Result<Vec<Entry>, StorageError> {
        debug!("GET content userPath={:?}", path.as_query());
        let resp = self.list_request(path)?.send().await?;

        let resp = ensure_success(resp, unknown_failure).await?;
        resp.json::<Vec<Entry>>()
            .await
            .map_err(|e| StorageError::Transport(format!("Parse listing failed: {e}")))
    }

    async fn create_directory(&self, path: &RemotePath, name: &str) -> Result<(), StorageError> {
        debug!("POST create userPath={:?} directoryName={:?}", path.as_query(), name);
        let resp = self.create_request(path, name)?.send().await?;

        ensure_success(resp, name_failure).await.map(drop)
    }

    async fn delete_files(&self, path: &RemotePath, names: &[String]) -> Result<(), StorageError> {
        debug!("DELETE deleteFile userPath={:?} names={:?}", path.as_query(), names);
        let resp = self.delete_files_request(path, names)?.send().await?;

        ensure_success(resp, delete_files_failure).await.map(drop)
    }

    async fn delete_directory(
        &self,
        path: &RemotePath,
        name: &str,
        confirmed: bool,
    ) -> Result<(), StorageError> {
        debug!(
            "DELETE deleteDirectory userPath={:?} directoryName={:?} confirmed={}",
            path.as_query(),
            name,
            confirmed
        );
        let resp = self
            .delete_directory_request(path, name, confirmed)?
            .send()
            .await?;

        ensure_success(resp, delete_directory_failure).await.map(drop)
    }

    async fn rename(
        &self,
        path: &RemotePath,
        old_name: &str,
        new_name: &str,
    ) -> Result<(), StorageError> {
        debug!("POST rename {:?} -> {:?} in {:?}", old_name, new_name, path.as_query());
        let resp = self.rename_request(path, old_name, new_name)?.send().await?;

        ensure_success(resp, name_failure).await.map(drop)
    }

    async fn upload_file(&self, path: &RemotePath, file: &Path) -> Result<(), StorageError> {
        let file_name = file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| StorageError::InvalidName(file.display().to_string()))?;
        let data = tokio::fs::read(file)
            .await
            .map_err(|e| StorageError::Transport(format!("Cannot read {}: {e}", file.display())))?;

        debug!(
            "POST upload {:?} ({} bytes) userPath={:?}",
            file_name,
            data.len(),
            path.as_query()
        );
        let resp = self.upload_request(path, file_name, data)?.send().await?;

        ensure_success(resp, upload_failure).await.map(drop)
    }
}

/// Passes 2xx responses through; otherwise reads the body and lets the
/// operation-specific classifier pick the error.
async fn ensure_success(
    resp: Response,
    classify: fn(StatusCode, String) -> StorageError,
) -> Result<Response, StorageError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    warn!("Storage request failed: {} {}", status, body);
    Err(classify(status, body))
}

fn unknown_failure(status: StatusCode, body: String) -> StorageError {
    StorageError::Unknown {
        status: status.as_u16(),
        body,
    }
}

fn name_failure(status: StatusCode, body: String) -> StorageError {
    let lower = body.to_lowercase();
    match status {
        StatusCode::CONFLICT => StorageError::NameConflict(body),
        StatusCode::BAD_REQUEST if lower.contains("already") => StorageError::NameConflict(body),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            StorageError::InvalidName(body)
        }
        _ => unknown_failure(status, body),
    }
}

fn delete_files_failure(status: StatusCode, body: String) -> StorageError {
    if body.trim().is_empty() {
        unknown_failure(status, body)
    } else {
        StorageError::PartialFailure(body)
    }
}

fn delete_directory_failure(status: StatusCode, body: String) -> StorageError {
    let asks_confirmation = matches!(
        status,
        StatusCode::CONFLICT | StatusCode::PRECONDITION_FAILED | StatusCode::PRECONDITION_REQUIRED
    ) || body.to_lowercase().contains("confirm");

    if asks_confirmation {
        StorageError::ConfirmationRequired
    } else {
        unknown_failure(status, body)
    }
}

fn upload_failure(status: StatusCode, body: String) -> StorageError {
    if body.trim().is_empty() {
        StorageError::UploadRejected(status.to_string())
    } else {
        StorageError::UploadRejected(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> HttpStorage {
        HttpStorage::new("http://localhost:8080", Duration::from_secs(5)).expect("client")
    }

    fn docs() -> RemotePath {
        RemotePath::parse("docs/2024 q1").expect("path")
    }

    fn query(request: &reqwest::Request) -> Vec<(String, String)> {
        request
            .url()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    fn json_body(request: &reqwest::Request) -> serde_json::Value {
        let bytes = request
            .body()
            .and_then(|b| b.as_bytes())
            .expect("buffered body");
        serde_json::from_slice(bytes).expect("json body")
    }

    #[test]
    fn listing_sends_encoded_user_path() {
        let request = storage()
            .list_request(&docs())
            .expect("builder")
            .build()
            .expect("request");

        assert_eq!(request.method(), reqwest::Method::GET);
        assert_eq!(request.url().path(), "/api/storage/content");
        assert_eq!(request.url().query(), Some("userPath=docs%2F2024+q1"));
        assert_eq!(
            query(&request),
            vec![("userPath".to_string(), "docs/2024 q1".to_string())]
        );
    }

    #[test]
    fn root_listing_sends_empty_user_path() {
        let request = storage()
            .list_request(&RemotePath::root())
            .expect("builder")
            .build()
            .expect("request");
        assert_eq!(request.url().query(), Some("userPath="));
    }

    #[test]
    fn create_posts_directory_name_in_query() {
        let request = storage()
            .create_request(&docs(), "new & shiny")
            .expect("builder")
            .build()
            .expect("request");

        assert_eq!(request.method(), reqwest::Method::POST);
        assert_eq!(request.url().path(), "/api/storage/create");
        assert_eq!(
            query(&request),
            vec![
                ("userPath".to_string(), "docs/2024 q1".to_string()),
                ("directoryName".to_string(), "new & shiny".to_string()),
            ]
        );
        assert!(request.body().is_none());
    }

    #[test]
    fn file_delete_sends_json_array() {
        let names = vec!["a.txt".to_string(), "b c.txt".to_string()];
        let request = storage()
            .delete_files_request(&docs(), &names)
            .expect("builder")
            .build()
            .expect("request");

        assert_eq!(request.method(), reqwest::Method::DELETE);
        assert_eq!(request.url().path(), "/api/storage/deleteFile");
        assert_eq!(
            query(&request),
            vec![("userPath".to_string(), "docs/2024 q1".to_string())]
        );
        assert_eq!(
            request.headers()[reqwest::header::CONTENT_TYPE],
            "application/json"
        );
        assert_eq!(json_body(&request), serde_json::json!(["a.txt", "b c.txt"]));
    }

    #[test]
    fn directory_delete_carries_confirmation_flag() {
        let storage = storage();
        for (confirmed, flag) in [(true, "true"), (false, "false")] {
            let request = storage
                .delete_directory_request(&RemotePath::root(), "archive", confirmed)
                .expect("builder")
                .build()
                .expect("request");

            assert_eq!(request.method(), reqwest::Method::DELETE);
            assert_eq!(request.url().path(), "/api/storage/deleteDirectory");
            assert_eq!(
                query(&request),
                vec![
                    ("userPath".to_string(), String::new()),
                    ("directoryName".to_string(), "archive".to_string()),
                    ("confirmed".to_string(), flag.to_string()),
                ]
            );
        }
    }

    #[test]
    fn rename_posts_camel_case_body() {
        let request = storage()
            .rename_request(&docs(), "old.txt", "new.txt")
            .expect("builder")
            .build()
            .expect("request");

        assert_eq!(request.method(), reqwest::Method::POST);
        assert_eq!(request.url().path(), "/api/storage/rename");
        assert!(request.url().query().is_none());
        assert_eq!(
            json_body(&request),
            serde_json::json!({
                "oldName": "old.txt",
                "newName": "new.txt",
                "userPath": "docs/2024 q1",
            })
        );
    }

    #[test]
    fn upload_is_multipart_post() {
        let request = storage()
            .upload_request(&docs(), "report.txt".to_string(), b"hello".to_vec())
            .expect("builder")
            .build()
            .expect("request");

        assert_eq!(request.method(), reqwest::Method::POST);
        assert_eq!(request.url().path(), "/api/storage/upload");
        let content_type = request.headers()[reqwest::header::CONTENT_TYPE]
            .to_str()
            .expect("header");
        assert!(content_type.starts_with("multipart/form-data; boundary="));
    }

    /// Accepts one HTTP request on a loopback socket, answers 200 and
    /// returns the raw bytes received.
    async fn capture_one_request(listener: tokio::net::TcpListener) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let (mut socket, _) = listener.accept().await.expect("accept");
        let mut raw = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.expect("read");
            if n == 0 {
                break;
            }
            raw.extend_from_slice(&buf[..n]);
            if raw.ends_with(b"--\r\n") || raw.ends_with(b"\r\n0\r\n\r\n") {
                break;
            }
        }
        socket
            .write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 0\r\nconnection: close\r\n\r\n")
            .await
            .expect("write");
        String::from_utf8_lossy(&raw).into_owned()
    }

    #[tokio::test]
    async fn upload_sends_file_and_user_path_fields() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("addr");
        let server = tokio::spawn(capture_one_request(listener));

        let file = std::env::temp_dir().join(format!("cloudnav-upload-{}.txt", std::process::id()));
        std::fs::write(&file, b"quarterly numbers").expect("write temp file");
        let file_name = file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .expect("file name");

        let storage =
            HttpStorage::new(&format!("http://{addr}"), Duration::from_secs(5)).expect("client");
        let result = tokio::time::timeout(
            Duration::from_secs(5),
            storage.upload_file(&docs(), &file),
        )
        .await
        .expect("upload finished");
        let raw = server.await.expect("server task");
        let _ = std::fs::remove_file(&file);

        assert_eq!(result, Ok(()));
        assert!(raw.starts_with("POST /api/storage/upload HTTP/1.1"));
        let raw = raw.to_lowercase();
        assert!(raw.contains(&format!(
            "content-disposition: form-data; name=\"file\"; filename=\"{}\"",
            file_name.to_lowercase()
        )));
        assert!(raw.contains("quarterly numbers"));
        assert!(raw.contains("content-disposition: form-data; name=\"userpath\"\r\n\r\ndocs/2024 q1"));
    }

    #[tokio::test]
    async fn unreadable_upload_fails_before_any_request() {
        let storage = storage();
        let missing = std::env::temp_dir().join("cloudnav-does-not-exist.bin");
        assert!(matches!(
            storage.upload_file(&RemotePath::root(), &missing).await,
            Err(StorageError::Transport(_))
        ));
    }

    #[test]
    fn base_url_gets_trailing_slash() {
        assert_eq!(
            normalize_base("http://localhost:8080").expect("url").as_str(),
            "http://localhost:8080/"
        );
        assert_eq!(
            normalize_base("https://host/cloud").expect("url").as_str(),
            "https://host/cloud/"
        );
        assert!(normalize_base("not a url").is_err());
    }

    #[test]
    fn endpoints_keep_prefix() {
        let storage =
            HttpStorage::new("https://host/cloud", Duration::from_secs(5)).expect("client");
        assert_eq!(
            storage.endpoint("content").expect("endpoint").as_str(),
            "https://host/cloud/api/storage/content"
        );
    }

    #[test]
    fn name_errors_are_classified() {
        assert_eq!(
            name_failure(StatusCode::BAD_REQUEST, "This name is already in use".into()),
            StorageError::NameConflict("This name is already in use".into())
        );
        assert_eq!(
            name_failure(StatusCode::CONFLICT, "exists".into()),
            StorageError::NameConflict("exists".into())
        );
        assert_eq!(
            name_failure(StatusCode::BAD_REQUEST, "bad characters".into()),
            StorageError::InvalidName("bad characters".into())
        );
        assert_eq!(
            name_failure(StatusCode::INTERNAL_SERVER_ERROR, String::new()),
            StorageError::Unknown {
                status: 500,
                body: String::new()
            }
        );
    }

    #[test]
    fn directory_delete_refusal_requires_confirmation() {
        assert_eq!(
            delete_directory_failure(StatusCode::CONFLICT, String::new()),
            StorageError::ConfirmationRequired
        );
        assert_eq!(
            delete_directory_failure(StatusCode::BAD_REQUEST, "Please confirm".into()),
            StorageError::ConfirmationRequired
        );
        assert!(matches!(
            delete_directory_failure(StatusCode::NOT_FOUND, "gone".into()),
            StorageError::Unknown { status: 404, .. }
        ));
    }

    #[test]
    fn file_delete_and_upload_keep_server_text() {
        assert_eq!(
            delete_files_failure(StatusCode::BAD_REQUEST, "b.txt locked".into()),
            StorageError::PartialFailure("b.txt locked".into())
        );
        assert_eq!(
            upload_failure(StatusCode::PAYLOAD_TOO_LARGE, "File too big".into()),
            StorageError::UploadRejected("File too big".into())
        );
        assert_eq!(
            upload_failure(StatusCode::BAD_REQUEST, String::new()),
            StorageError::UploadRejected("400 Bad Request".into())
        );
    }
}
