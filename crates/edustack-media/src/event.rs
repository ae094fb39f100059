//! Upload-event decoding.

use aws_lambda_events::event::s3::S3Event;
use percent_encoding::percent_decode_str;

use crate::error::HandlerError;

/// The (bucket, key) pair of a triggering upload, with the key decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadEvent {
    /// Bucket the object landed in.
    pub bucket: String,
    /// Decoded object key.
    pub key: String,
}

impl UploadEvent {
    /// Decode the first record of an upload notification.
    ///
    /// # Errors
    /// Returns an error if the event has no records, a record lacks its
    /// bucket name or object key, or the key fails to decode.
    pub fn from_s3_event(event: &S3Event) -> Result<Self, HandlerError> {
        let record = event.records.first().ok_or(HandlerError::EmptyEvent)?;
        let bucket = record
            .s3
            .bucket
            .name
            .clone()
            .ok_or(HandlerError::MissingEventField {
                field: "bucket name",
            })?;
        let raw_key = record
            .s3
            .object
            .key
            .as_deref()
            .ok_or(HandlerError::MissingEventField { field: "object key" })?;
        Ok(Self {
            bucket,
            key: decode_object_key(raw_key)?,
        })
    }

    /// `s3://bucket/key` locator of the uploaded object.
    #[must_use]
    pub fn s3_url(&self) -> String {
        format!("s3://{}/{}", self.bucket, self.key)
    }
}

/// Decode a notification object key: `+` means space, the rest is
/// percent-encoded.
///
/// # Errors
/// Returns an error if the decoded bytes are not valid UTF-8.
pub fn decode_object_key(raw: &str) -> Result<String, HandlerError> {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|_| HandlerError::KeyDecode {
            key: raw.to_owned(),
        })
}

/// Test fixture: a minimal upload notification for (bucket, key).
#[cfg(test)]
pub(crate) fn upload_notification(bucket: &str, key: &str) -> S3Event {
    use aws_lambda_events::event::s3::{S3Bucket, S3Entity, S3EventRecord, S3Object};

    S3Event {
        records: vec![S3EventRecord {
            s3: S3Entity {
                bucket: S3Bucket {
                    name: Some(bucket.to_owned()),
                    ..S3Bucket::default()
                },
                object: S3Object {
                    key: Some(key.to_owned()),
                    ..S3Object::default()
                },
                ..S3Entity::default()
            },
            ..S3EventRecord::default()
        }],
    }
}
