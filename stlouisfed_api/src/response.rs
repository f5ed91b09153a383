//! Response classification and envelope fields.

use quick_xml::events::Event;
use quick_xml::Reader;
use serde_json::Value;

use crate::Error;

/// HTTP status FRED uses for "too many requests in a short period".
pub const STATUS_TOO_MANY_REQUESTS_SHORT: u16 = 420;

/// Statuses whose JSON body carries `error_code` / `error_message`.
const JSON_ERROR_STATUSES: [u16; 5] = [400, 403, STATUS_TOO_MANY_REQUESTS_SHORT, 429, 500];

/// Whether `status` is one of the server's rate-limit rejections.
pub fn is_rate_limited(status: u16) -> bool {
    status == 429 || status == STATUS_TOO_MANY_REQUESTS_SHORT
}

fn is_xml(content_type: &str) -> bool {
    content_type.starts_with("text/xml") || content_type.starts_with("application/xml")
}

fn is_json(content_type: &str) -> bool {
    content_type.starts_with("application/json")
}

/// Classifies one HTTP response and decodes its JSON body.
///
/// Checks, in order: XML error envelope, content type, JSON decode, error
/// statuses with a JSON body, any other non-200 status.
pub fn classify(status: u16, content_type: Option<&str>, body: &str, url: &str) -> Result<Value, Error> {
    let content_type = content_type.unwrap_or("");

    if is_xml(content_type) && status != 200 {
        let (code, message) = xml_error_attributes(body).map_err(|reason| Error::Decode {
            url: url.to_string(),
            reason,
        })?;
        tracing::error!(status, %code, %message, %url, "remote returned an XML error");
        return Err(Error::RemoteProtocol {
            code,
            message,
            url: url.to_string(),
        });
    }

    if !is_json(content_type) {
        tracing::error!(status, content_type, %url, "unexpected content type");
        return Err(Error::UnexpectedContentType {
            content_type: content_type.to_string(),
            url: url.to_string(),
        });
    }

    let data: Value = serde_json::from_str(body).map_err(|e| {
        tracing::error!(status, %url, "failed to decode JSON body: {}", e);
        Error::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        }
    })?;

    if JSON_ERROR_STATUSES.contains(&status) {
        let code = data
            .get("error_code")
            .and_then(Value::as_i64)
            .unwrap_or(i64::from(status));
        let message = data
            .get("error_message")
            .and_then(Value::as_str)
            .map(collapse_whitespace)
            .unwrap_or_default();
        tracing::error!(status, code, %message, %url, "remote returned an API error");
        return Err(Error::RemoteApi {
            status,
            code,
            message,
            url: url.to_string(),
        });
    }

    if status != 200 {
        tracing::error!(status, %url, "unexpected status");
        return Err(Error::RemoteStatus {
            status,
            url: url.to_string(),
        });
    }

    Ok(data)
}

/// The `count` field of a paginated envelope, if any.
pub fn count(data: &Value) -> Option<u64> {
    data.get("count").and_then(Value::as_u64)
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Reads the `code` and `message` attributes of the root element.
fn xml_error_attributes(body: &str) -> Result<(String, String), String> {
    let mut reader = Reader::from_str(body);
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                let mut code = String::new();
                let mut message = String::new();
                for attr in e.attributes() {
                    let attr = attr.map_err(|e| e.to_string())?;
                    let value = attr.unescape_value().map_err(|e| e.to_string())?;
                    match attr.key.as_ref() {
                        b"code" => code = value.into_owned(),
                        b"message" => message = value.into_owned(),
                        _ => {}
                    }
                }
                return Ok((code, message));
            }
            Ok(Event::Eof) => return Err("XML body has no root element".to_string()),
            Ok(_) => {}
            Err(e) => return Err(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const URL: &str = "http://localhost/fred/x";

    #[test]
    fn xml_error_envelope() {
        let body = r#"<?xml version="1.0" encoding="utf-8" ?>
<error code="500" message="Internal Server Error"/>"#;
        let err = classify(500, Some("text/xml; charset=UTF-8"), body, URL).unwrap_err();
        match err {
            Error::RemoteProtocol { code, message, url } => {
                assert_eq!(code, "500");
                assert_eq!(message, "Internal Server Error");
                assert_eq!(url, URL);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn xml_with_ok_status_is_unexpected() {
        let err = classify(200, Some("text/xml"), "<a/>", URL).unwrap_err();
        assert!(matches!(err, Error::UnexpectedContentType { .. }));
    }

    #[test]
    fn json_api_error() {
        let body = json!({
            "error_code": 429,
            "error_message": "Too Many Requests.   Exceeded\n rate limit."
        })
        .to_string();
        let err = classify(429, Some("application/json"), &body, URL).unwrap_err();
        match err {
            Error::RemoteApi {
                status,
                code,
                message,
                ..
            } => {
                assert_eq!(status, 429);
                assert_eq!(code, 429);
                assert_eq!(message, "Too Many Requests. Exceeded rate limit.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn html_is_unexpected_content_type() {
        let err = classify(200, Some("text/html"), "<html></html>", URL).unwrap_err();
        match err {
            Error::UnexpectedContentType { content_type, .. } => {
                assert_eq!(content_type, "text/html")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_content_type() {
        let err = classify(200, None, "{}", URL).unwrap_err();
        assert!(matches!(
            err,
            Error::UnexpectedContentType { ref content_type, .. } if content_type.is_empty()
        ));
    }

    #[test]
    fn other_status() {
        let err = classify(404, Some("application/json"), "{}", URL).unwrap_err();
        assert!(matches!(err, Error::RemoteStatus { status: 404, .. }));
    }

    #[test]
    fn invalid_json() {
        let err = classify(200, Some("application/json"), "{", URL).unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
    }

    #[test]
    fn ok_body() {
        let data = classify(200, Some("application/json; charset=utf-8"), r#"{"a":1}"#, URL).unwrap();
        assert_eq!(data, json!({"a": 1}));
    }

    #[test]
    fn rate_limited_statuses() {
        assert!(is_rate_limited(420));
        assert!(is_rate_limited(429));
        assert!(!is_rate_limited(500));
    }
}
