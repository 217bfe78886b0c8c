use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::form::PhotoFile;

use super::options::UploadLimits;

/// Checks one uploaded file against the configured limits.
pub fn validate_file(file: &PhotoFile, limits: &UploadLimits) -> Result<(), String> {
    if !limits.allows_type(&file.content_type) {
        return Err(format!(
            "Unsupported format: {}. Use JPG, PNG or WebP.",
            file.content_type
        ));
    }
    if file.size() > limits.max_file_size {
        return Err(format!(
            "File too large: {:.1}MB. Max {}MB.",
            file.size() as f64 / 1024.0 / 1024.0,
            limits.max_file_size / 1024 / 1024
        ));
    }
    Ok(())
}

/// `{listing}_{millis}_{hex}.{ext}`; the extension falls back to `jpg`.
pub fn generate_filename(listing_id: &str, original_name: &str, now: DateTime<Utc>) -> String {
    let ext = original_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
        .unwrap_or_else(|| "jpg".to_string());
    let random = Uuid::new_v4().simple().to_string();
    format!(
        "{listing_id}_{}_{}.{ext}",
        now.timestamp_millis(),
        &random[..8]
    )
}

pub fn upload_url(listing_id: &str, filename: &str) -> String {
    format!("/uploads/listings/{listing_id}/{filename}")
}
