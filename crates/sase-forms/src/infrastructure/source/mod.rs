//! Schema sources
//!
//! HTTP and file-backed implementations of [`SchemaSource`].

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::domain::aggregates::FormSchema;
use crate::ports::outbound::{SchemaSource, SourceError};

pub const DEFAULT_SCHEMA_PATH: &str = "/data/formSchema.json";

// =============================================================================
// HTTP
// =============================================================================

/// Fetches the schema with a plain GET
pub struct HttpSchemaSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSchemaSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    /// `path` resolved against `base_url`
    pub fn with_base(base_url: &str, path: &str) -> Self {
        Self::new(join_url(base_url, path))
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl SchemaSource for HttpSchemaSource {
    async fn fetch(&self) -> Result<FormSchema, SourceError> {
        tracing::debug!(url = %self.url, "fetching schema");

        let resp = self.client.get(&self.url)
            .send()
            .await
            .map_err(|e| SourceError::Transport(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(SourceError::Status(resp.status().as_u16()));
        }

        resp.json().await.map_err(|e| SourceError::Parse(e.to_string()))
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

// =============================================================================
// File
// =============================================================================

/// Reads a schema document from disk
pub struct FileSchemaSource {
    path: PathBuf,
}

impl FileSchemaSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SchemaSource for FileSchemaSource {
    async fn fetch(&self) -> Result<FormSchema, SourceError> {
        let raw = tokio::fs::read(&self.path)
            .await
            .map_err(|e| SourceError::Io(e.to_string()))?;
        serde_json::from_slice(&raw).map_err(|e| SourceError::Parse(e.to_string()))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("http://localhost:3000/", DEFAULT_SCHEMA_PATH), "http://localhost:3000/data/formSchema.json");
        assert_eq!(join_url("http://x", "data/s.json"), "http://x/data/s.json");
    }

    #[tokio::test]
    async fn test_file_source_reads_document() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"id":"form","questions":[{{"id":"q1","title":"Age","type":"number","validation":{{"min":18}}}}]}}"#
        )
        .unwrap();

        let schema = FileSchemaSource::new(file.path()).fetch().await.unwrap();
        assert_eq!(schema.len(), 1);
        assert_eq!(schema.questions()[0].validation.as_ref().unwrap().min, Some(18.0));
    }

    #[tokio::test]
    async fn test_file_source_errors() {
        let missing = FileSchemaSource::new("/definitely/not/here.json");
        assert!(matches!(missing.fetch().await, Err(SourceError::Io(_))));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let broken = FileSchemaSource::new(file.path());
        assert!(matches!(broken.fetch().await, Err(SourceError::Parse(_))));
    }

    #[tokio::test]
    async fn test_http_source_transport_error() {
        let source = HttpSchemaSource::with_base("http://127.0.0.1:9", DEFAULT_SCHEMA_PATH);
        assert!(matches!(source.fetch().await, Err(SourceError::Transport(_))));
    }
}
