//! Lattice registry client and device layout resolution.
//!
//! A lattice is a named physical qubit layout exposed by the registry
//! service. [`RegistryClient`] fetches the full listing on every call — no
//! caching, no retry; a transient fetch failure propagates to the caller.

use std::collections::BTreeMap;

use reqwest::{Client, header};
use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::program::QubitId;

/// A named hardware layout from the registry.
///
/// `qubits` maps readout register index to physical qubit id; the map is
/// ordered by register index, which is the lattice's declared qubit order.
/// The remaining fields are registry metadata carried for completeness.
#[derive(Debug, Clone, Deserialize)]
pub struct Lattice {
    /// Lattice name (e.g. `Aspen-9-2Q-A`).
    pub name: String,
    /// Name of the physical device hosting this lattice.
    #[serde(default)]
    pub device_name: Option<String>,
    /// Register index -> physical qubit id, in declared order.
    pub qubits: BTreeMap<u32, u32>,
    /// One-qubit gate fidelities and the like, unused here.
    #[serde(default)]
    pub specs: Option<serde_json::Value>,
}

impl Lattice {
    /// Physical qubit ids in the lattice's declared order.
    pub fn qubit_ids(&self) -> Vec<QubitId> {
        self.qubits.values().map(|&q| QubitId(q)).collect()
    }

    /// Number of qubits in the lattice.
    pub fn num_qubits(&self) -> usize {
        self.qubits.len()
    }
}

/// Registry listing response: `{"lattices": {name: {...}}}`.
#[derive(Debug, Deserialize)]
struct LatticesResponse {
    lattices: BTreeMap<String, Lattice>,
}

/// HTTP client for the lattice registry service.
pub struct RegistryClient {
    client: Client,
    endpoint: String,
}

impl RegistryClient {
    /// Create a registry client for the given base URL.
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(30))
            .connect_timeout(std::time::Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// Fetch the full name -> lattice mapping from the registry.
    pub async fn list_lattices(&self) -> Result<BTreeMap<String, Lattice>> {
        let url = format!("{}/lattices", self.endpoint);
        debug!("fetching lattice listing from {url}");

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "no body".to_string());
            return Err(Error::Registry(format!(
                "lattice listing failed with {status}: {body}"
            )));
        }

        let listing: LatticesResponse = response.json().await?;
        Ok(listing.lattices)
    }

    /// Look up one device by name. Returns `None` when the registry does
    /// not list it; a registry fetch failure is an error, not an absence.
    pub async fn query_device(&self, device_name: &str) -> Result<Option<Lattice>> {
        let mut lattices = self.list_lattices().await?;
        Ok(lattices.remove(device_name))
    }
}

/// The resolved target layout: a real lattice from the registry, or the
/// default three-qubit layout for simulated targets.
///
/// An explicit two-variant choice rather than an `Option`, so the fallback
/// path is a first-class branch.
#[derive(Debug, Clone)]
pub enum DeviceLayout {
    /// A real hardware layout resolved from the registry.
    Lattice(Lattice),
    /// Fallback layout over qubits 0, 1, 2.
    Default,
}

impl DeviceLayout {
    /// Qubit indices used when no real lattice is resolved.
    pub const DEFAULT_QUBITS: [u32; 3] = [0, 1, 2];

    /// Qubits to act on, in the layout's declared order.
    pub fn qubits(&self) -> Vec<QubitId> {
        match self {
            DeviceLayout::Lattice(lattice) => lattice.qubit_ids(),
            DeviceLayout::Default => Self::DEFAULT_QUBITS.iter().map(|&q| QubitId(q)).collect(),
        }
    }

    /// Whether this layout came from a real hardware lattice.
    pub fn is_physical(&self) -> bool {
        matches!(self, DeviceLayout::Lattice(_))
    }

    /// Resolve a registry lookup result into a layout.
    pub fn from_query(lattice: Option<Lattice>) -> Self {
        match lattice {
            Some(lattice) => DeviceLayout::Lattice(lattice),
            None => DeviceLayout::Default,
        }
    }
}
