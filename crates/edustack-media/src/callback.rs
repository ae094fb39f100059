//! The upload-status callback.
//!
//! One synchronous `PUT /content/sections/{sectionId}` per invocation,
//! over plain HTTP on port 80, with an explicit `Content-Length`.

use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use serde::Serialize;
use tracing::info;

use crate::error::HandlerError;
use crate::paths::section_id;

/// Status reported once a section's output rendition is in place.
pub const UPLOAD_READY: &str = "READY";

/// Callback payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    /// Key of the processed output object.
    pub s3_key: String,
    /// Upload status label.
    pub upload_status: String,
}

/// Build the single callback request for a processed-output key.
///
/// The section id comes from the key's path; the host comes from the
/// network stack's exported address.
///
/// # Errors
/// Returns an error if the section id cannot be extracted, the payload
/// fails to serialize, or the request fails to build.
pub fn build_status_request(
    client: &reqwest::Client,
    base_host: &str,
    key: &str,
) -> Result<reqwest::Request, HandlerError> {
    let section = section_id(key)?;
    let url = format!("http://{base_host}:80/content/sections/{section}");

    let payload = StatusUpdate {
        s3_key: key.to_owned(),
        upload_status: UPLOAD_READY.to_owned(),
    };
    let body = serde_json::to_vec(&payload)?;

    let request = client
        .put(&url)
        .header(CONTENT_TYPE, "application/json")
        .header(CONTENT_LENGTH, body.len())
        .body(body)
        .build()?;
    Ok(request)
}

/// Execute the callback request, returning the response status code.
///
/// Any response counts as delivered; only transport errors fail the
/// invocation.
///
/// # Errors
/// Returns an error if the request cannot be sent.
pub async fn send_status(
    client: &reqwest::Client,
    request: reqwest::Request,
) -> Result<u16, HandlerError> {
    let url = request.url().clone();
    let response = client.execute(request).await?;
    let status = response.status().as_u16();
    info!(url = %url, status = status, "status callback delivered");
    Ok(status)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(key: &str) -> reqwest::Request {
        build_status_request(&reqwest::Client::new(), "198.51.100.7", key).unwrap()
    }

    #[test]
    fn test_should_target_section_path_over_plain_http() {
        let request = request("courses/101/sectionA/output.m3u8");
        assert_eq!(request.method(), &reqwest::Method::PUT);
        assert_eq!(
            request.url().as_str(),
            "http://198.51.100.7/content/sections/sectionA"
        );
        assert_eq!(request.url().scheme(), "http");
        assert_eq!(request.url().port_or_known_default(), Some(80));
    }

    #[test]
    fn test_should_set_content_length_to_serialized_body_length() {
        let request = request("courses/101/sectionA/output.m3u8");
        let body = request.body().unwrap().as_bytes().unwrap();

        let declared: usize = request
            .headers()
            .get(CONTENT_LENGTH)
            .unwrap()
            .to_str()
            .unwrap()
            .parse()
            .unwrap();
        assert_eq!(declared, body.len());
        assert_eq!(
            request.headers().get(CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }

    #[test]
    fn test_should_serialize_ready_payload() {
        let request = request("courses/101/sectionA/output.m3u8");
        let body = request.body().unwrap().as_bytes().unwrap();
        let json: serde_json::Value = serde_json::from_slice(body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "s3Key": "courses/101/sectionA/output.m3u8",
                "uploadStatus": "READY"
            })
        );
    }

    #[test]
    fn test_should_fail_on_shallow_keys() {
        let err =
            build_status_request(&reqwest::Client::new(), "198.51.100.7", "output.m3u8")
                .unwrap_err();
        assert!(matches!(err, HandlerError::SectionIdUnresolvable { .. }), "{err}");
    }
}
