//! The coarse handler response shape.

use serde::{Deserialize, Serialize};

/// Lambda-proxy-shaped handler response: status code plus a JSON body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlerResponse {
    /// HTTP-equivalent status code.
    pub status_code: u16,
    /// Serialized response body.
    pub body: String,
}

impl HandlerResponse {
    /// A 200-equivalent response.
    #[must_use]
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status_code: 200,
            body: body.into(),
        }
    }

    /// A 500-equivalent response.
    #[must_use]
    pub fn error(body: impl Into<String>) -> Self {
        Self {
            status_code: 500,
            body: body.into(),
        }
    }
}
