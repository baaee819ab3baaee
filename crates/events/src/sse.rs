//! Server-Sent Events framing.

use bytes::Bytes;

use crate::event::ProgressEvent;

/// Encode one event as a single SSE frame: `data: <json>\n\n`.
///
/// The JSON object is the serialized event plus a `timestamp` field set to
/// the moment of encoding (RFC 3339, UTC).
pub fn encode_frame(event: &ProgressEvent) -> Result<Bytes, serde_json::Error> {
    let mut payload = serde_json::to_value(event)?;
    if let Some(object) = payload.as_object_mut() {
        object.insert(
            "timestamp".to_string(),
            serde_json::Value::String(chrono::Utc::now().to_rfc3339()),
        );
    }
    let json = serde_json::to_string(&payload)?;
    Ok(Bytes::from(format!("data: {json}\n\n")))
}

/// Parse the JSON payloads out of a buffer of concatenated SSE frames.
///
/// Frames that are not `data:` lines, or whose payload is not JSON, are
/// skipped.
pub fn decode_frames(raw: &str) -> Vec<serde_json::Value> {
    raw.split("\n\n")
        .filter_map(|frame| frame.strip_prefix("data: "))
        .filter_map(|json| serde_json::from_str(json).ok())
        .collect()
}
