//! File selected for upload

use crate::error::AdminResult;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::path::Path;

/// In-memory file chosen in a form
#[derive(Clone, PartialEq, Eq)]
pub struct Upload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Read a file from disk, guessing its MIME type from the extension.
    pub async fn from_path(path: impl AsRef<Path>) -> AdminResult<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let content_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        Ok(Self::new(file_name, content_type, bytes))
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Locally rendered preview: `data:<mime>;base64,<payload>`
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.content_type, STANDARD.encode(&self.bytes))
    }
}

// Keep file contents out of logs.
impl std::fmt::Debug for Upload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Upload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// Metadata only; validation errors attach the value as a parameter.
impl Serialize for Upload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Upload", 3)?;
        state.serialize_field("fileName", &self.file_name)?;
        state.serialize_field("contentType", &self.content_type)?;
        state.serialize_field("size", &self.size())?;
        state.end()
    }
}
