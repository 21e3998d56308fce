// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galleria-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galleria and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use super::filename::StoredFilename;

/// URL prefix under which uploaded files are served.
pub const UPLOADS_URL_PREFIX: &str = "/uploads/";

/// Metadata for one uploaded image.
///
/// `path` is always `UPLOADS_URL_PREFIX + filename`; both are only ever changed together through
/// [`ImageRecord::replace_file`]. A stored `path` is ignored on load and rebuilt from `filename`.
/// `uploaded_at` carries millisecond precision, the same as the saved document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredRecord")]
pub struct ImageRecord {
    filename: StoredFilename,
    path: String,
    #[serde(rename = "uploadedAt", with = "iso_millis")]
    uploaded_at: DateTime<Utc>,
}

impl ImageRecord {
    pub fn new(filename: StoredFilename, uploaded_at: DateTime<Utc>) -> Self {
        let path = public_path(&filename);
        Self {
            filename,
            path,
            uploaded_at: uploaded_at.trunc_subsecs(3),
        }
    }

    /// `path` with the filename percent-encoded, for use in links and `src` attributes.
    pub fn url_path(&self) -> String {
        format!("{UPLOADS_URL_PREFIX}{}", self.filename.url_segment())
    }

    pub fn filename(&self) -> &StoredFilename {
        &self.filename
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn uploaded_at(&self) -> DateTime<Utc> {
        self.uploaded_at
    }

    /// Human-readable upload time for the views.
    pub fn uploaded_label(&self) -> String {
        self.uploaded_at.format("%Y-%m-%d %H:%M UTC").to_string()
    }

    /// Points the record at a different backing file. The upload time is kept.
    pub fn replace_file(&mut self, filename: StoredFilename) {
        self.path = public_path(&filename);
        self.filename = filename;
    }
}

pub fn public_path(filename: &StoredFilename) -> String {
    format!("{UPLOADS_URL_PREFIX}{filename}")
}

#[derive(Deserialize)]
struct StoredRecord {
    filename: StoredFilename,
    #[serde(rename = "uploadedAt", with = "iso_millis")]
    uploaded_at: DateTime<Utc>,
}

impl From<StoredRecord> for ImageRecord {
    fn from(stored: StoredRecord) -> Self {
        Self::new(stored.filename, stored.uploaded_at)
    }
}

// `uploadedAt` is written the way browsers print `Date#toISOString`.
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|value| value.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::{ImageRecord, StoredFilename};

    fn name(raw: &str) -> StoredFilename {
        StoredFilename::new(raw).unwrap()
    }

    #[test]
    fn path_is_derived_from_filename() {
        let record = ImageRecord::new(name("1700000000000.png"), Utc::now());
        assert_eq!(record.path(), "/uploads/1700000000000.png");
    }

    #[test]
    fn upload_time_is_kept_to_the_millisecond() {
        let precise = Utc.with_ymd_and_hms(2026, 10, 18, 13, 59, 54).unwrap()
            + chrono::Duration::nanoseconds(530_458_103);
        let record = ImageRecord::new(name("1.png"), precise);

        assert_eq!(
            record.uploaded_at(),
            Utc.with_ymd_and_hms(2026, 10, 18, 13, 59, 54).unwrap()
                + chrono::Duration::milliseconds(530)
        );
        let reloaded: ImageRecord =
            serde_json::from_value(serde_json::to_value(&record).unwrap()).unwrap();
        assert_eq!(reloaded, record);
    }

    #[test]
    fn stored_path_is_rebuilt_from_filename() {
        let record: ImageRecord = serde_json::from_str(
            r#"{"filename":"1.png","path":"/elsewhere/2.png","uploadedAt":"2026-10-18T09:30:00.000Z"}"#,
        )
        .unwrap();
        assert_eq!(record.path(), "/uploads/1.png");

        let missing_path: ImageRecord =
            serde_json::from_str(r#"{"filename":"2.png","uploadedAt":"2026-10-18T09:30:00.000Z"}"#)
                .unwrap();
        assert_eq!(missing_path.path(), "/uploads/2.png");
    }

    #[test]
    fn url_path_encodes_reserved_characters() {
        let record = ImageRecord::new(name("a%41 #1?.png"), Utc::now());
        assert_eq!(record.path(), "/uploads/a%41 #1?.png");
        assert_eq!(record.url_path(), "/uploads/a%2541%20%231%3F.png");
    }

    #[test]
    fn replace_file_keeps_upload_time() {
        let uploaded_at = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let mut record = ImageRecord::new(name("1.png"), uploaded_at);

        record.replace_file(name("2.jpg"));

        assert_eq!(record.filename().as_str(), "2.jpg");
        assert_eq!(record.path(), "/uploads/2.jpg");
        assert_eq!(record.uploaded_at(), uploaded_at);
    }

    #[test]
    fn serializes_with_camel_case_timestamp_in_millis() {
        let uploaded_at = Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap()
            + chrono::Duration::milliseconds(123);
        let record = ImageRecord::new(name("1760779800123.png"), uploaded_at);

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "filename": "1760779800123.png",
                "path": "/uploads/1760779800123.png",
                "uploadedAt": "2026-10-18T09:30:00.123Z",
            })
        );
    }

    #[test]
    fn deserializes_offset_timestamps_as_utc() {
        let record: ImageRecord = serde_json::from_str(
            r#"{"filename":"1.png","path":"/uploads/1.png","uploadedAt":"2026-10-18T11:30:00+02:00"}"#,
        )
        .unwrap();
        assert_eq!(
            record.uploaded_at(),
            Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap()
        );
    }
}
