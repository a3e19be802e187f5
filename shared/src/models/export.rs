//! Export documents

use serde::{Deserialize, Serialize};

/// One composed CSV file (UTF-8 with BOM, CRLF line endings)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvDocument {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl CsvDocument {
    /// Body without the byte-order mark, for inspection
    pub fn text(&self) -> String {
        let body = self.bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(&self.bytes);
        String::from_utf8_lossy(body).into_owned()
    }
}

/// JSON transport form of a [`CsvDocument`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportFile {
    pub file_name: String,
    pub content_base64: String,
}
