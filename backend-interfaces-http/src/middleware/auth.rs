use std::io::Read;

use anyhow::{anyhow, Result};
use axum::http::HeaderMap;
use flate2::read::GzDecoder;

use backend_domain::{RuntimeConfig, WasteBatchPayload, WasteSubmission};

/// Ops guard. Without a configured token every caller is allowed.
pub fn authorize(config: &RuntimeConfig, headers: &HeaderMap) -> bool {
    if let Some(api_token) = &config.api_token {
        return extract_bearer(headers)
            .map(|v| v == *api_token)
            .unwrap_or(false);
    }
    true
}

/// Accepts `{"records": [...]}` or a bare array, optionally gzip-encoded.
pub fn parse_waste_batch(headers: &HeaderMap, body: &[u8]) -> Result<Vec<WasteSubmission>> {
    let content = maybe_gunzip(headers, body)?;
    let trimmed = content.trim_start();
    if trimmed.starts_with('[') {
        return Ok(serde_json::from_str(trimmed)?);
    }
    let payload: WasteBatchPayload = serde_json::from_str(trimmed)
        .map_err(|err| anyhow!("invalid waste batch: {}", err))?;
    Ok(payload.records)
}

fn maybe_gunzip(headers: &HeaderMap, body: &[u8]) -> Result<String> {
    if let Some(encoding) = headers.get("Content-Encoding") {
        if encoding.to_str().unwrap_or("").trim().eq_ignore_ascii_case("gzip") {
            let mut decoder = GzDecoder::new(body);
            let mut out = String::new();
            decoder.read_to_string(&mut out)?;
            return Ok(out);
        }
    }
    Ok(String::from_utf8(body.to_vec())?)
}

fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    let value = headers.get("Authorization")?.to_str().ok()?.trim();
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use axum::http::HeaderValue;
    use flate2::write::GzEncoder;
    use flate2::Compression;

    const BATCH: &str = r#"{"records":[{"event_id":"6f1c0e4e-8d53-4b8e-9a51-0d2b3f4f9c11","category":"plastic","type":"bottle","weight":1.5}]}"#;

    #[test]
    fn token_must_match_when_configured() {
        let config = RuntimeConfig {
            api_token: Some("s3cret".to_string()),
            ..RuntimeConfig::default()
        };
        let mut headers = HeaderMap::new();
        assert!(!authorize(&config, &headers));
        headers.insert("Authorization", HeaderValue::from_static("Bearer wrong"));
        assert!(!authorize(&config, &headers));
        headers.insert("Authorization", HeaderValue::from_static("Bearer s3cret"));
        assert!(authorize(&config, &headers));
        assert!(authorize(&RuntimeConfig::default(), &HeaderMap::new()));
    }

    #[test]
    fn gzip_batch_is_decoded() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(BATCH.as_bytes()).expect("write");
        let body = encoder.finish().expect("finish");
        let mut headers = HeaderMap::new();
        headers.insert("Content-Encoding", HeaderValue::from_static("gzip"));

        let records = parse_waste_batch(&headers, &body).expect("parse");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].waste_type, "bottle");
        assert_eq!(records[0].bag_count, 0);
    }

    #[test]
    fn bare_array_is_accepted() {
        let array = r#"[{"event_id":"6f1c0e4e-8d53-4b8e-9a51-0d2b3f4f9c11","category":"glass","type":"jar","weight":0.4,"bag_count":1}]"#;
        let records = parse_waste_batch(&HeaderMap::new(), array.as_bytes()).expect("parse");
        assert_eq!(records[0].bag_count, 1);
        assert!(parse_waste_batch(&HeaderMap::new(), b"{\"rows\":[]}").is_err());
    }
}
