use std::fmt;

use reqwest::StatusCode;
use serde_json::Value;

/// A response body is either valid JSON or, failing a strict parse, the raw text.
#[derive(Clone, Debug, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

impl ResponseBody {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(bytes) {
            Ok(v) => ResponseBody::Json(v),
            Err(_) => ResponseBody::Text(String::from_utf8_lossy(bytes).into_owned()),
        }
    }

    /// The entry payload of a list response: the `data` field when present and
    /// non-null, otherwise the whole body. Raw text becomes a JSON string.
    pub fn into_data(self) -> Value {
        match self {
            ResponseBody::Json(Value::Object(mut map)) => {
                let has_data = map.get("data").is_some_and(|d| !d.is_null());
                if has_data { map.remove("data").unwrap_or_default() } else { Value::Object(map) }
            }
            ResponseBody::Json(v) => v,
            ResponseBody::Text(s) => Value::String(s),
        }
    }
}

impl fmt::Display for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseBody::Json(v) => write!(f, "{v}"),
            ResponseBody::Text(s) => write!(f, "{s}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: ResponseBody,
}

impl ApiResponse {
    pub fn new(status: StatusCode, body: ResponseBody) -> Self {
        Self { status, body }
    }

    /// Creation counts as accepted on 200 or 201 only.
    pub fn is_created(&self) -> bool {
        self.status == StatusCode::OK || self.status == StatusCode::CREATED
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_json_or_keeps_text() {
        assert_eq!(ResponseBody::from_bytes(br#"{"a":1}"#), ResponseBody::Json(json!({"a": 1})));
        assert_eq!(ResponseBody::from_bytes(b"Bad Gateway"), ResponseBody::Text("Bad Gateway".into()));
        assert_eq!(ResponseBody::from_bytes(b""), ResponseBody::Text(String::new()));
        assert_eq!(ResponseBody::from_bytes(b"[1,2]"), ResponseBody::Json(json!([1, 2])));
    }

    #[test]
    fn into_data_prefers_data_field() {
        let body = ResponseBody::Json(json!({"data": [{"id": 1}], "meta": {"pagination": {}}}));
        assert_eq!(body.into_data(), json!([{"id": 1}]));
    }

    #[test]
    fn into_data_falls_back_to_whole_body() {
        assert_eq!(ResponseBody::Json(json!([{"id": 1}])).into_data(), json!([{"id": 1}]));
        assert_eq!(
            ResponseBody::Json(json!({"data": null, "x": 1})).into_data(),
            json!({"data": null, "x": 1})
        );
        assert_eq!(ResponseBody::Text("oops".into()).into_data(), json!("oops"));
    }

    #[test]
    fn only_200_and_201_count_as_created() {
        let body = ResponseBody::Text(String::new());
        assert!(ApiResponse::new(StatusCode::OK, body.clone()).is_created());
        assert!(ApiResponse::new(StatusCode::CREATED, body.clone()).is_created());
        assert!(!ApiResponse::new(StatusCode::NO_CONTENT, body.clone()).is_created());
        assert!(!ApiResponse::new(StatusCode::BAD_REQUEST, body).is_created());
    }
}
