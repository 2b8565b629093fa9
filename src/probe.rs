//! Best-effort probe for the currently engaged lattice.
//!
//! Asks the QPU compiler service which lattice this QMI is engaged to. The
//! probe is advisory: every failure mode — missing endpoint configuration,
//! connection refusal, timeout, malformed response — collapses to `None`.
//! The discarded error is traced at debug level and nowhere else; callers
//! must not treat an absent answer as a fault.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::QcsConfig;

/// Total request timeout for the probe. The answer is only worth having
/// if it comes back immediately.
const PROBE_TIMEOUT: Duration = Duration::from_secs(1);

/// RPC envelope for `get_config_info`.
#[derive(Debug, Deserialize)]
struct ConfigInfoResponse {
    result: ConfigInfo,
}

/// Compiler service configuration info. Only the lattice name matters here.
#[derive(Debug, Deserialize)]
struct ConfigInfo {
    lattice_name: String,
}

/// Query the compiler service for the name of the active lattice.
///
/// Returns `None` when no compiler endpoint is configured or the probe
/// fails in any way. Never errors.
pub async fn get_active_lattice(config: &QcsConfig) -> Option<String> {
    let endpoint = match &config.qpu_compiler_url {
        Some(url) => url,
        None => {
            debug!("active-lattice probe skipped: no QPU compiler endpoint configured");
            return None;
        }
    };

    match probe_compiler(endpoint).await {
        Ok(name) => Some(name),
        Err(e) => {
            debug!("active-lattice probe failed (ignored): {e}");
            None
        }
    }
}

/// The fallible inner call; [`get_active_lattice`] discards its error.
async fn probe_compiler(endpoint: &str) -> Result<String, Box<dyn std::error::Error>> {
    let client = Client::builder().timeout(PROBE_TIMEOUT).build()?;

    let response = client
        .post(endpoint)
        .json(&serde_json::json!({
            "jsonrpc": "2.0",
            "id": "get_config_info",
            "method": "get_config_info",
            "params": []
        }))
        .send()
        .await?
        .error_for_status()?;

    let info: ConfigInfoResponse = response.json().await?;
    Ok(info.result.lattice_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_info_deserialization() {
        let json = r#"{"result": {"lattice_name": "Aspen-9-2Q-A"}}"#;
        let info: ConfigInfoResponse = serde_json::from_str(json).unwrap();
        assert_eq!(info.result.lattice_name, "Aspen-9-2Q-A");
    }

    #[test]
    fn test_config_info_missing_field_is_error() {
        let json = r#"{"result": {}}"#;
        assert!(serde_json::from_str::<ConfigInfoResponse>(json).is_err());
    }

    #[tokio::test]
    async fn test_probe_without_endpoint_is_none() {
        let config = QcsConfig {
            forest_url: "http://localhost:1".into(),
            qpu_compiler_url: None,
        };
        assert_eq!(get_active_lattice(&config).await, None);
    }

    #[tokio::test]
    async fn test_probe_unreachable_endpoint_is_none() {
        // Nothing listens on this port; the probe must swallow the
        // connection error rather than surface it.
        let config = QcsConfig {
            forest_url: "http://localhost:1".into(),
            qpu_compiler_url: Some("http://127.0.0.1:1".into()),
        };
        assert_eq!(get_active_lattice(&config).await, None);
    }
}
