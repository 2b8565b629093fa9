//! Local QVM: the simulated quantum abstract machine.
//!
//! Coin-toss programs are product-state circuits (only `RX` rotations and
//! measurements), so each qubit can be sampled independently: a qubit with
//! accumulated rotation θ measures 1 with probability sin²(θ/2). That is
//! exact for everything this crate's IR can express.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::error::{Error, Result};
use crate::program::{Instruction, Program, QubitId};
use crate::qam::{CompiledProgram, Qam, ResultMatrix};

/// The local simulator.
pub struct Qvm {
    rng: Mutex<StdRng>,
}

impl Qvm {
    /// Create a QVM seeded from entropy.
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Create a QVM with a fixed seed, for reproducible runs.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Check that every measurement lands in a declared classical bit.
    fn validate(program: &Program) -> Result<()> {
        for inst in program.instructions() {
            if let Instruction::Measure { target, .. } = inst {
                match program.declared_size(&target.name) {
                    None => {
                        return Err(Error::Compilation(format!(
                            "measurement into undeclared region {}",
                            target.name
                        )));
                    }
                    Some(size) if target.index >= size => {
                        return Err(Error::Compilation(format!(
                            "measurement into {target} but {} has size {size}",
                            target.name
                        )));
                    }
                    Some(_) => {}
                }
            }
        }
        Ok(())
    }

    /// Accumulated RX angle per qubit, in program order.
    fn rotations(program: &Program) -> HashMap<QubitId, f64> {
        let mut angles: HashMap<QubitId, f64> = HashMap::new();
        for inst in program.instructions() {
            if let Instruction::Rx { theta, qubit } = inst {
                *angles.entry(*qubit).or_insert(0.0) += theta;
            }
        }
        angles
    }

    /// Measured qubits ordered by readout register position, so result
    /// columns line up with the declared register.
    fn readout_order(program: &Program) -> Vec<QubitId> {
        let mut measurements: Vec<((String, usize), QubitId)> = program
            .instructions()
            .iter()
            .filter_map(|inst| match inst {
                Instruction::Measure { qubit, target } => {
                    Some(((target.name.clone(), target.index), *qubit))
                }
                _ => None,
            })
            .collect();
        measurements.sort_by(|a, b| a.0.cmp(&b.0));
        measurements.into_iter().map(|(_, qubit)| qubit).collect()
    }
}

impl Default for Qvm {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Qam for Qvm {
    fn is_simulated(&self) -> bool {
        true
    }

    async fn compile(&self, program: &Program) -> Result<CompiledProgram> {
        Self::validate(program)?;
        debug!(
            "QVM compile: {} instructions, {} shots",
            program.instructions().len(),
            program.num_shots()
        );
        Ok(CompiledProgram {
            source: program.clone(),
            native: program.to_string(),
        })
    }

    async fn run(&self, program: &CompiledProgram) -> Result<ResultMatrix> {
        let source = program.source();
        let angles = Self::rotations(source);
        let readout = Self::readout_order(source);
        let shots = source.num_shots();

        debug!("QVM run: {} qubits, {shots} shots", readout.len());

        let mut rng = self
            .rng
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        let mut rows = Vec::with_capacity(shots as usize);
        for _ in 0..shots {
            let row = readout
                .iter()
                .map(|qubit| {
                    let theta = angles.get(qubit).copied().unwrap_or(0.0);
                    let p_one = (theta / 2.0).sin().powi(2);
                    u8::from(rng.gen_bool(p_one))
                })
                .collect();
            rows.push(row);
        }

        Ok(ResultMatrix::new(rows))
    }
}
