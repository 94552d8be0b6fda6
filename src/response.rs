use serde::Serialize;
use serde_json::Value;

/// Structured status result returned to the orchestrator.
///
/// Mirrors an HTTP-style envelope: 200 with the dispatched job id on
/// success, 400 with the first validation violation otherwise. The body is
/// the JSON-encoded message string.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Response {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl Response {
    pub fn ok(message: String) -> Response {
        Response {
            status_code: 200,
            body: Value::String(message).to_string(),
        }
    }

    pub fn bad_request(message: String) -> Response {
        Response {
            status_code: 400,
            body: Value::String(message).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_is_json_encoded() {
        let response = Response::ok("Submitted job with ID abc-123".to_string());
        assert_eq!(response.body, "\"Submitted job with ID abc-123\"");
    }

    #[test]
    fn serializes_with_camel_case_status() {
        let response = Response::bad_request("Missing required parameter: mode".to_string());
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(
            json,
            r#"{"statusCode":400,"body":"\"Missing required parameter: mode\""}"#
        );
    }
}
