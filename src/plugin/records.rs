//! Watermarked-image records.
//!
//! Each discovered source image gets one `WatermarkedImageRecord` in a
//! `RecordRegistry`. The batch runner later queries the registry and
//! processes every record it returns.

use super::BatchError;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Owner tag stamped on every record.
pub const RECORD_OWNER: &str = env!("CARGO_PKG_NAME");

/// Record type name.
pub const RECORD_TYPE: &str = "WatermarkedImage";

/// Media types backed by an enabled `image` codec.
const DECODABLE_MEDIA_TYPES: &[&str] = &[
    "image/bmp",
    "image/gif",
    "image/jpeg",
    "image/png",
    "image/tiff",
    "image/webp",
];

/// A file found by discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub id: String,
    pub path: PathBuf,
    /// MIME type guessed from the extension, if known.
    pub media_type: Option<&'static str>,
}

impl SourceFile {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let media_type = media_type_for(&path);
        Self {
            id: digest(&[path.to_string_lossy().as_bytes()]),
            path,
            media_type,
        }
    }

    /// True for raster formats the decoder handles. Vector images are not
    /// watermarked.
    pub fn is_image(&self) -> bool {
        self.media_type
            .map(|m| DECODABLE_MEDIA_TYPES.contains(&m))
            .unwrap_or(false)
    }

    pub fn content_digest(&self) -> String {
        digest(&[
            self.id.as_bytes(),
            self.path.to_string_lossy().as_bytes(),
            self.media_type.unwrap_or_default().as_bytes(),
        ])
    }
}

/// A pending watermark job for one source image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WatermarkedImageRecord {
    pub id: String,
    /// Id of the source file.
    pub parent: String,
    pub record_type: &'static str,
    pub content_digest: String,
    pub owner: &'static str,
    pub original_path: PathBuf,
}

impl WatermarkedImageRecord {
    /// Build the record for `source`, or `None` when it is not an image.
    pub fn for_source(source: &SourceFile) -> Option<Self> {
        if !source.is_image() {
            return None;
        }

        Some(Self {
            id: digest(&[format!("watermarked-{}", source.id).as_bytes()]),
            parent: source.id.clone(),
            record_type: RECORD_TYPE,
            content_digest: source.content_digest(),
            owner: RECORD_OWNER,
            original_path: source.path.clone(),
        })
    }
}

/// Store of watermark records that the batch runner queries.
pub trait RecordRegistry {
    /// Store `record`. Returns false when a record with the same id exists.
    fn create_record(&mut self, record: WatermarkedImageRecord) -> bool;

    /// All records, in creation order.
    fn records(&self) -> Result<Vec<WatermarkedImageRecord>, BatchError>;
}

/// Registry kept in memory for the lifetime of one run.
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    records: Vec<WatermarkedImageRecord>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordRegistry for InMemoryRegistry {
    fn create_record(&mut self, record: WatermarkedImageRecord) -> bool {
        if self.records.iter().any(|r| r.id == record.id) {
            tracing::debug!(id = %record.id, "Record already registered");
            return false;
        }
        self.records.push(record);
        true
    }

    fn records(&self) -> Result<Vec<WatermarkedImageRecord>, BatchError> {
        Ok(self.records.clone())
    }
}

/// Create records for every image among `sources`. Returns how many the
/// registry stored; duplicates are not counted.
pub fn register_sources(registry: &mut dyn RecordRegistry, sources: &[SourceFile]) -> usize {
    let mut created = 0;
    for source in sources {
        match WatermarkedImageRecord::for_source(source) {
            Some(record) => {
                if registry.create_record(record) {
                    created += 1;
                }
            }
            None => {
                tracing::debug!(path = %source.path.display(), "Skipping non-image file");
            }
        }
    }
    created
}

fn media_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let media_type = match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "svg" => "image/svg+xml",
        "txt" | "md" => "text/plain",
        "json" => "application/json",
        _ => return None,
    };
    Some(media_type)
}

fn digest(parts: &[&[u8]]) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
        hasher.update([0u8]);
    }
    hex::encode(hasher.finalize())
}
