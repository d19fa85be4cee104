use serde::{Deserialize, Serialize};

/// Metadata for an uploaded file, as stored in the catalog and listed by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub filename: String,
    /// Size in bytes
    pub size: i64,
    /// Unix seconds
    pub upload_date: i64,
    pub user_id: String,
    pub url: String,
}

/// A single upload call's input. Lives only for the duration of the call.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub owner_user_id: String,
    /// Client-facing name; informational only, the stored key is generated.
    pub filename: Option<String>,
    pub declared_size: i64,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Image types accepted for upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageType {
    Jpeg,
    Png,
}

impl ImageType {
    pub fn mime(&self) -> &'static str {
        match self {
            ImageType::Jpeg => "image/jpeg",
            ImageType::Png => "image/png",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ImageType::Jpeg => "jpg",
            ImageType::Png => "png",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_record_json_shape() {
        let record = FileRecord {
            filename: "u1-1700000000-abcd1234.png".to_string(),
            size: 10,
            upload_date: 1_700_000_000,
            user_id: "u1".to_string(),
            url: "http://localhost/objects/u1-1700000000-abcd1234.png".to_string(),
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["filename"], "u1-1700000000-abcd1234.png");
        assert_eq!(value["size"], 10);
        assert_eq!(value["uploadDate"], 1_700_000_000);
        assert_eq!(value["userId"], "u1");
        assert!(value["url"].as_str().unwrap().ends_with(".png"));
    }

    #[test]
    fn test_image_type_extensions() {
        assert_eq!(ImageType::Jpeg.extension(), "jpg");
        assert_eq!(ImageType::Png.extension(), "png");
        assert_eq!(ImageType::Png.mime(), "image/png");
    }
}
