//! Quantum abstract machine handles.
//!
//! A [`Qam`] is the execution target behind a named quantum computer:
//! either the local QVM simulator or a proxy for real hardware. The
//! lifecycle is two calls, both blocking until the service answers:
//!
//! ```text
//!   compile(&Program) ──→ run(&CompiledProgram) ──→ ResultMatrix
//! ```
//!
//! Shot repetition is encoded inside the program, so `run` executes once
//! and returns the full shots × qubits matrix.

use std::fmt;

use async_trait::async_trait;
use tracing::debug;

use crate::config::QcsConfig;
use crate::error::Result;
use crate::lattice::RegistryClient;
use crate::program::Program;
use crate::qpu::Qpu;
use crate::qvm::Qvm;

/// A program compiled for one specific target.
///
/// Holds both the structured source (the QVM executes it directly) and the
/// native Quil text the target's compiler produced.
#[derive(Debug, Clone)]
pub struct CompiledProgram {
    pub(crate) source: Program,
    pub(crate) native: String,
}

impl CompiledProgram {
    /// Native Quil text for this target.
    pub fn native_quil(&self) -> &str {
        &self.native
    }

    /// The program this was compiled from.
    pub fn source(&self) -> &Program {
        &self.source
    }
}

/// The shots × qubit-count grid of binary measurement outcomes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultMatrix {
    rows: Vec<Vec<u8>>,
}

impl ResultMatrix {
    /// Build a matrix from result rows, one row per shot.
    pub fn new(rows: Vec<Vec<u8>>) -> Self {
        Self { rows }
    }

    /// Number of shots (rows).
    pub fn shots(&self) -> usize {
        self.rows.len()
    }

    /// Number of measured qubits (columns of the first row).
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// The result rows.
    pub fn rows(&self) -> &[Vec<u8>] {
        &self.rows
    }

    /// Whether every entry is a 0 or 1.
    pub fn is_binary(&self) -> bool {
        self.rows.iter().flatten().all(|&bit| bit <= 1)
    }
}

impl fmt::Display for ResultMatrix {
    /// Bracketed row-per-shot rendering:
    ///
    /// ```text
    /// [[0 1 1]
    ///  [1 0 1]]
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                write!(f, "\n ")?;
            }
            write!(f, "[")?;
            for (j, bit) in row.iter().enumerate() {
                if j > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{bit}")?;
            }
            write!(f, "]")?;
        }
        write!(f, "]")
    }
}

/// Trait for quantum abstract machines.
///
/// Implementations are either simulated (the local QVM) or real (a QPU
/// proxy); [`QuantumComputer`] only cares about this distinction when
/// composing its greeting.
#[async_trait]
pub trait Qam: Send + Sync {
    /// Whether this machine is a simulator.
    fn is_simulated(&self) -> bool;

    /// Compile a program for this specific target. Fails if the program
    /// cannot run here, e.g. it references qubits the target lacks.
    async fn compile(&self, program: &Program) -> Result<CompiledProgram>;

    /// Execute a compiled program once and return the result matrix.
    async fn run(&self, program: &CompiledProgram) -> Result<ResultMatrix>;
}

/// A named handle to a quantum computer.
pub struct QuantumComputer {
    name: String,
    qam: Box<dyn Qam>,
}

impl QuantumComputer {
    /// Wrap a QAM under a device name. Public so callers (and tests) can
    /// pair any machine with any name.
    pub fn new(name: impl Into<String>, qam: Box<dyn Qam>) -> Self {
        Self {
            name: name.into(),
            qam,
        }
    }

    /// Device name of this handle.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the underlying machine is a simulator.
    pub fn is_simulated(&self) -> bool {
        self.qam.is_simulated()
    }

    /// Compile a program for this computer.
    pub async fn compile(&self, program: &Program) -> Result<CompiledProgram> {
        self.qam.compile(program).await
    }

    /// Run a compiled program.
    pub async fn run(&self, program: &CompiledProgram) -> Result<ResultMatrix> {
        self.qam.run(program).await
    }
}

impl fmt::Debug for QuantumComputer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuantumComputer")
            .field("name", &self.name)
            .field("simulated", &self.qam.is_simulated())
            .finish()
    }
}

/// Resolve a device name to a quantum computer handle.
///
/// Names ending in `-qvm` go straight to the local QVM. Anything else is
/// looked up in the lattice registry: a listed lattice gets a QPU proxy,
/// and an unlisted name falls back to the QVM so a connectivity check
/// still runs end to end without an engagement.
pub async fn get_qc(name: &str, config: &QcsConfig) -> Result<QuantumComputer> {
    if name.ends_with("-qvm") {
        debug!("resolving {name} to the local QVM");
        return Ok(QuantumComputer::new(name, Box::new(Qvm::new())));
    }

    let registry = RegistryClient::new(&config.forest_url)?;
    match registry.query_device(name).await? {
        Some(lattice) => {
            debug!("resolving {name} to QPU lattice {}", lattice.name);
            let qpu = Qpu::new(lattice, config)?;
            Ok(QuantumComputer::new(name, Box::new(qpu)))
        }
        None => {
            debug!("{name} not listed by the registry, falling back to the QVM");
            Ok(QuantumComputer::new(name, Box::new(Qvm::new())))
        }
    }
}
