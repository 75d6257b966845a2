use serde_json::{json, Map, Value as JsonValue};
use tracing::{debug, trace};

use crate::error::ReshapeError;

/// Downstream statuses treated as success, `207 Multi-Status` included.
pub fn is_success_status(status: u16) -> bool {
    (200..=207).contains(&status)
}

/// Rebuilds a GraphQL response envelope from a downstream OData response.
///
/// Failed downstream requests become `{"errors": [...]}`. Successful ones become
/// `{"data": {...}}` keyed by `correlation`, with the `value` member of collection
/// responses unwrapped. Batch sub-responses are matched by id, falling back to position.
pub fn reshape_response(
    status: u16,
    body: &[u8],
    correlation: &[String],
) -> Result<JsonValue, ReshapeError> {
    if correlation.is_empty() {
        return Err(ReshapeError::EmptyCorrelation);
    }

    if !is_success_status(status) {
        debug!(status, "downstream request failed");
        return Ok(json!({ "errors": [error_from_bytes(status, body)] }));
    }

    if body.iter().all(u8::is_ascii_whitespace) {
        trace!(status, "downstream response has no body");
        let data = correlation
            .iter()
            .map(|key| (key.clone(), JsonValue::Null))
            .collect::<Map<_, _>>();
        return Ok(json!({ "data": data }));
    }

    let parsed: JsonValue = serde_json::from_slice(body)?;
    let mut errors = Vec::new();
    let mut data = Map::with_capacity(correlation.len());

    match parsed {
        JsonValue::Object(mut root) if root.get("responses").is_some_and(JsonValue::is_array) => {
            let responses = match root.remove("responses") {
                Some(JsonValue::Array(responses)) => responses,
                _ => vec![],
            };
            let by_id = responses.iter().any(|response| response.get("id").is_some());

            for (index, key) in correlation.iter().enumerate() {
                let response = if by_id {
                    let id = (index + 1).to_string();
                    responses
                        .iter()
                        .find(|response| response_id(response).as_deref() == Some(id.as_str()))
                } else {
                    responses.get(index)
                };

                let value = match response {
                    Some(response) => {
                        match reshape_sub_response(response) {
                            Ok(value) => value,
                            Err(mut error) => {
                                attach_path(&mut error, key);
                                errors.push(error);
                                JsonValue::Null
                            }
                        }
                    }
                    None => {
                        trace!(key = key.as_str(), "no sub-response for root field");
                        JsonValue::Null
                    }
                };
                data.insert(key.clone(), value);
            }
        }
        single => {
            data.insert(correlation[0].clone(), unwrap_value(single));
        }
    }

    let mut envelope = Map::new();
    envelope.insert("data".to_string(), JsonValue::Object(data));
    if !errors.is_empty() {
        envelope.insert("errors".to_string(), JsonValue::Array(errors));
    }

    Ok(JsonValue::Object(envelope))
}

fn response_id(response: &JsonValue) -> Option<String> {
    match response.get("id")? {
        JsonValue::String(id) => Some(id.clone()),
        JsonValue::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

fn reshape_sub_response(response: &JsonValue) -> Result<JsonValue, JsonValue> {
    let status = response
        .get("status")
        .and_then(JsonValue::as_u64)
        .and_then(|status| u16::try_from(status).ok())
        .unwrap_or(200);
    let body = response.get("body").cloned().unwrap_or(JsonValue::Null);

    if is_success_status(status) {
        Ok(unwrap_value(body))
    } else {
        Err(error_from_json(status, body))
    }
}

/// Collection responses carry their entities in a `value` member.
fn unwrap_value(body: JsonValue) -> JsonValue {
    match body {
        JsonValue::Object(mut object) if object.contains_key("value") => {
            object.remove("value").unwrap_or(JsonValue::Null)
        }
        other => other,
    }
}

fn error_from_bytes(status: u16, body: &[u8]) -> JsonValue {
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        return json!({ "message": status });
    }

    match serde_json::from_str::<JsonValue>(text) {
        Ok(parsed) => error_from_json(status, parsed),
        Err(_) => json!({ "message": text }),
    }
}

/// Extracts the OData `error` member, keeping other bodies as they are.
fn error_from_json(status: u16, body: JsonValue) -> JsonValue {
    match body {
        JsonValue::Null => json!({ "message": status }),
        JsonValue::Object(mut object) => match object.remove("error") {
            Some(error) => error,
            None => JsonValue::Object(object),
        },
        other => json!({ "message": other }),
    }
}

fn attach_path(error: &mut JsonValue, key: &str) {
    if !error.is_object() {
        *error = json!({ "message": error.take() });
    }
    if let JsonValue::Object(object) = error {
        object.insert("path".to_string(), json!([key]));
    }
}
