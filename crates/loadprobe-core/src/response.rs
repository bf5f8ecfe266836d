//! Response payload produced by the dispatcher.

use crate::params::{QueryParams, WorkloadRequest};
use serde::{Deserialize, Serialize};

pub const HEADER_CONTENT_TYPE: &str = "content-type";
pub const HEADER_RUNTIME: &str = "x-runtime";
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// JSON body returned for every successful dispatch.
///
/// Field order matches the wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBody {
    pub message: String,
    pub runtime: String,
    pub workload: String,
    pub iterations: i64,
    pub size_kb: i64,
    pub delay_ms: i64,
    pub duration_ms: f64,
    /// ISO-8601 UTC, always ending in `Z`
    pub timestamp: String,
    pub request_data: RequestData,
}

/// Echo of what the host delivered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestData {
    pub query: QueryParams,
    pub method: String,
}

impl ResponseBody {
    pub fn new(
        message: &str,
        runtime: &str,
        request: &WorkloadRequest,
        duration_ms: f64,
        query: QueryParams,
        method: &str,
    ) -> Self {
        Self {
            message: message.to_string(),
            runtime: runtime.to_string(),
            workload: request.label.clone(),
            iterations: request.iterations,
            size_kb: request.size_kb,
            delay_ms: request.delay_ms,
            duration_ms,
            timestamp: chrono::Utc::now()
                .to_rfc3339_opts(chrono::SecondsFormat::Micros, true),
            request_data: RequestData {
                query,
                method: method.to_string(),
            },
        }
    }
}

/// Transport-neutral response: the host turns this into its own HTTP type.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeResponse {
    pub status: u16,
    pub headers: Vec<(&'static str, String)>,
    pub body: ResponseBody,
}

impl ProbeResponse {
    /// 200 with JSON content type and the runtime header.
    pub fn ok(body: ResponseBody) -> Self {
        let headers = vec![
            (HEADER_CONTENT_TYPE, CONTENT_TYPE_JSON.to_string()),
            (HEADER_RUNTIME, body.runtime.clone()),
        ];

        Self {
            status: 200,
            headers,
            body,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn body_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(&self.body)
    }
}
