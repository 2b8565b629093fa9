//! hello-qmi: verify connectivity to a QCS-style quantum computing service.
//!
//! This crate performs a simple end-to-end check: build a coin-toss program
//! (an RX(π/2) pulse plus a measurement on each qubit), compile it for a
//! named target, run it for a few shots, and print the resulting bit matrix
//! with a greeting. It is a verification utility, not an orchestration
//! system — one linear flow, no scheduler, no job lifecycle.
//!
//! # Flow
//!
//! ```text
//!   query_device() ──→ coin_toss_program() ──→ get_qc() ──→ compile() ──→ run()
//!    (registry)          (DeviceLayout)         (QAM)        (target)     (matrix)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use hello_qmi::{QcsConfig, hello_qmi, DEFAULT_SHOTS};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = QcsConfig::load();
//!     let greeting = hello_qmi("9q-generic-qvm", DEFAULT_SHOTS, &config).await?;
//!     println!("{greeting}");
//!     Ok(())
//! }
//! ```
//!
//! # Error policy
//!
//! Two tiers: the active-lattice probe ([`get_active_lattice`]) is advisory
//! and converts every failure to `None`; every other external call —
//! registry fetch, compilation, execution — propagates its error and is
//! fatal for the binary.

pub mod config;
pub mod error;
pub mod hello;
pub mod lattice;
pub mod probe;
pub mod program;
pub mod qam;
pub mod qpu;
pub mod qvm;

pub use config::QcsConfig;
pub use error::{Error, Result};
pub use hello::{DEFAULT_DEVICE, DEFAULT_SHOTS, coin_toss_program, greeting, hello_qmi, run_on};
pub use lattice::{DeviceLayout, Lattice, RegistryClient};
pub use probe::get_active_lattice;
pub use program::{
    Instruction, MemoryReference, MemoryRegion, Program, ProgramError, QubitId, RewiringStrategy,
};
pub use qam::{CompiledProgram, Qam, QuantumComputer, ResultMatrix, get_qc};
pub use qpu::Qpu;
pub use qvm::Qvm;
