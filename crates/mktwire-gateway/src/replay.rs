//! Replay scripts for dry runs.
//!
//! A replay script is a JSON array of transport events, fed through the
//! scripted transport so the whole pipeline can run without a vendor
//! connection.

use crate::error::{GatewayError, GatewayResult};
use mktwire_session::RawEvent;
use tracing::info;

/// Load a replay script from a JSON file.
pub fn load_script(path: &str) -> GatewayResult<Vec<RawEvent>> {
    let content = std::fs::read_to_string(path)?;
    let script: Vec<RawEvent> = serde_json::from_str(&content)
        .map_err(|e| GatewayError::Config(format!("Failed to parse replay script: {e}")))?;

    info!(path = %path, events = script.len(), "Replay script loaded");
    Ok(script)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mktwire_session::EventTag;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_script() {
        let doc = r#"[
            {
                "tag": 2,
                "messages": [
                    {"message_type": "SessionStarted"}
                ]
            },
            {
                "tag": 8,
                "messages": [
                    {
                        "message_type": "MarketDataEvents",
                        "token": "ibm-equity",
                        "elements": {"LAST_PRICE": 188.5, "VOLUME": 1200}
                    }
                ]
            }
        ]"#;
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(doc.as_bytes()).unwrap();

        let script = load_script(file.path().to_str().unwrap()).unwrap();
        assert_eq!(script.len(), 2);
        assert_eq!(script[0].tag, EventTag::SESSION_STATUS);
        assert!(script[0].messages[0].token.is_empty());
        assert_eq!(script[1].tag, EventTag::SUBSCRIPTION_DATA);
        assert_eq!(script[1].messages[0].token.as_str(), "ibm-equity");
        assert_eq!(script[1].messages[0].elements["VOLUME"], 1200);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_script("/nonexistent/replay.json").unwrap_err();
        assert!(matches!(err, GatewayError::Io(_)));
    }

    #[test]
    fn test_malformed_script_is_config_error() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"{\"not\": \"an array\"}").unwrap();

        let err = load_script(file.path().to_str().unwrap()).unwrap_err();
        assert!(matches!(err, GatewayError::Config(_)));
    }
}
