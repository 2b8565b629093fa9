//! QPU proxy: the real-hardware quantum abstract machine.
//!
//! Thin HTTP client over the QPU compiler/execution service. Compilation
//! and execution both happen remotely; this side only ships Quil text and
//! receives the bit matrix. No retries and no polling — a connectivity
//! check wants the first failure surfaced, not papered over.

use reqwest::{Client, header};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::QcsConfig;
use crate::error::{Error, Result};
use crate::lattice::Lattice;
use crate::program::Program;
use crate::qam::{CompiledProgram, Qam, ResultMatrix};

/// Compile request body.
#[derive(Debug, Serialize)]
struct CompileRequest<'a> {
    quil: &'a str,
    num_shots: u32,
}

/// Compile response: the target-native Quil.
#[derive(Debug, Deserialize)]
struct CompileResponse {
    native_quil: String,
}

/// Execution request body.
#[derive(Debug, Serialize)]
struct RunRequest<'a> {
    quil: &'a str,
    num_shots: u32,
}

/// Execution response: one bitstring row per shot.
#[derive(Debug, Deserialize)]
struct RunResponse {
    bitstrings: Vec<Vec<u8>>,
}

/// Handle to a real hardware lattice behind the QPU service.
#[derive(Debug)]
pub struct Qpu {
    client: Client,
    endpoint: String,
    lattice: Lattice,
}

impl Qpu {
    /// Create a QPU proxy for a resolved lattice.
    ///
    /// Requires a configured QPU compiler endpoint; unlike the advisory
    /// probe, actually targeting hardware without one is an error.
    pub fn new(lattice: Lattice, config: &QcsConfig) -> Result<Self> {
        let endpoint = config.qpu_compiler_url.clone().ok_or_else(|| {
            Error::Configuration(format!(
                "no QPU compiler endpoint configured for lattice {}",
                lattice.name
            ))
        })?;

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(60))
            .connect_timeout(std::time::Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            endpoint,
            lattice,
        })
    }

    /// The lattice this proxy targets.
    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }
}

#[async_trait::async_trait]
impl Qam for Qpu {
    fn is_simulated(&self) -> bool {
        false
    }

    async fn compile(&self, program: &Program) -> Result<CompiledProgram> {
        let url = format!("{}/devices/{}/native_quil", self.endpoint, self.lattice.name);
        let quil = program.to_string();
        debug!("compiling for lattice {} at {url}", self.lattice.name);

        let response = self
            .client
            .post(&url)
            .json(&CompileRequest {
                quil: &quil,
                num_shots: program.num_shots(),
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "no body".to_string());
            return Err(Error::Compilation(format!(
                "compiler returned {status}: {body}"
            )));
        }

        let compiled: CompileResponse = response.json().await?;
        Ok(CompiledProgram {
            source: program.clone(),
            native: compiled.native_quil,
        })
    }

    async fn run(&self, program: &CompiledProgram) -> Result<ResultMatrix> {
        let url = format!("{}/qpu/run", self.endpoint);
        debug!("running on lattice {} at {url}", self.lattice.name);

        let response = self
            .client
            .post(&url)
            .json(&RunRequest {
                quil: program.native_quil(),
                num_shots: program.source().num_shots(),
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "no body".to_string());
            return Err(Error::Execution(format!("QPU returned {status}: {body}")));
        }

        let results: RunResponse = response.json().await?;
        Ok(ResultMatrix::new(results.bitstrings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lattice() -> Lattice {
        serde_json::from_str(r#"{"name": "Aspen-9-2Q-A", "qubits": {"0": 14, "1": 15}}"#).unwrap()
    }

    #[test]
    fn test_new_requires_compiler_endpoint() {
        let config = QcsConfig {
            forest_url: "http://localhost:1".into(),
            qpu_compiler_url: None,
        };
        let err = Qpu::new(lattice(), &config).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
        assert!(err.to_string().contains("Aspen-9-2Q-A"));
    }

    #[test]
    fn test_new_with_endpoint() {
        let config = QcsConfig {
            forest_url: "http://localhost:1".into(),
            qpu_compiler_url: Some("http://localhost:6000".into()),
        };
        let qpu = Qpu::new(lattice(), &config).unwrap();
        assert!(!qpu.is_simulated());
        assert_eq!(qpu.lattice().name, "Aspen-9-2Q-A");
    }

    #[test]
    fn test_compile_request_serialization() {
        let request = CompileRequest {
            quil: "RX(1.5) 0\n",
            num_shots: 5,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("RX(1.5) 0"));
        assert!(json.contains("\"num_shots\":5"));
    }

    #[test]
    fn test_compile_response_deserialization() {
        let json = r#"{"native_quil": "RZ(pi/2) 14\nRX(pi/2) 14\n"}"#;
        let response: CompileResponse = serde_json::from_str(json).unwrap();
        assert!(response.native_quil.starts_with("RZ"));
    }

    #[test]
    fn test_run_response_deserialization() {
        let json = r#"{"bitstrings": [[0, 1], [1, 1], [0, 0]]}"#;
        let response: RunResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.bitstrings.len(), 3);
        assert_eq!(response.bitstrings[1], vec![1, 1]);
    }
}
