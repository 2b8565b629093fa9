//! Quil program representation and builder.
//!
//! This is a deliberately small IR: it carries exactly the instructions the
//! coin-toss flow emits (a rewiring pragma, classical memory declarations,
//! parametrized X rotations, and measurements) plus a shot repeat count.
//! The textual form produced by [`Display`](std::fmt::Display) is Quil, the
//! wire format the QPU compiler service consumes.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for program construction.
pub type ProgramResult<T> = std::result::Result<T, ProgramError>;

/// Errors raised while building a program.
#[derive(Debug, Error)]
pub enum ProgramError {
    /// Classical memory index outside the declared region.
    #[error("memory reference {name}[{index}] exceeds declared size {size}")]
    MemoryIndexOutOfBounds {
        /// Region name.
        name: String,
        /// Requested bit index.
        index: usize,
        /// Declared region size.
        size: usize,
    },
}

/// Unique identifier for a qubit.
///
/// Displays as the bare index, which is how Quil spells qubits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QubitId(pub u32);

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for QubitId {
    fn from(id: u32) -> Self {
        QubitId(id)
    }
}

/// A reference to one bit of a declared classical memory region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryReference {
    /// Region name (e.g. `ro`).
    pub name: String,
    /// Bit index within the region.
    pub index: usize,
}

impl fmt::Display for MemoryReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.name, self.index)
    }
}

/// A declared classical memory region, handed back by [`Program::declare`].
///
/// Holds the name and size so bit references can be bounds-checked at
/// construction instead of failing remotely at compile time.
#[derive(Debug, Clone)]
pub struct MemoryRegion {
    name: String,
    size: usize,
}

impl MemoryRegion {
    /// Name of the region.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared size in bits.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Reference the `index`-th bit of this region.
    pub fn bit(&self, index: usize) -> ProgramResult<MemoryReference> {
        if index >= self.size {
            return Err(ProgramError::MemoryIndexOutOfBounds {
                name: self.name.clone(),
                index,
                size: self.size,
            });
        }
        Ok(MemoryReference {
            name: self.name.clone(),
            index,
        })
    }
}

/// Strategy argument for the `INITIAL_REWIRING` pragma.
///
/// `Greedy` lets the compiler remap logical qubits to physical qubits
/// freely, which is what a connectivity check wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RewiringStrategy {
    /// Remap freely to whatever qubits are available.
    Greedy,
    /// Keep the program's qubit indices as-is.
    Naive,
    /// Remap only where required.
    PartialRewiring,
}

impl fmt::Display for RewiringStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RewiringStrategy::Greedy => "GREEDY",
            RewiringStrategy::Naive => "NAIVE",
            RewiringStrategy::PartialRewiring => "PARTIAL",
        };
        write!(f, "\"{s}\"")
    }
}

/// A single Quil instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Instruction {
    /// Compiler directive, e.g. `PRAGMA INITIAL_REWIRING "GREEDY"`.
    Pragma {
        /// Pragma name.
        name: String,
        /// Pragma arguments, already quoted where Quil requires it.
        args: Vec<String>,
    },
    /// Classical BIT memory declaration, e.g. `DECLARE ro BIT[3]`.
    Declare {
        /// Region name.
        name: String,
        /// Region size in bits.
        size: usize,
    },
    /// Parametrized X rotation, e.g. `RX(1.5707963267948966) 0`.
    Rx {
        /// Rotation angle in radians.
        theta: f64,
        /// Target qubit.
        qubit: QubitId,
    },
    /// Measurement into a classical bit, e.g. `MEASURE 0 ro[0]`.
    Measure {
        /// Measured qubit.
        qubit: QubitId,
        /// Destination bit.
        target: MemoryReference,
    },
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Pragma { name, args } => {
                write!(f, "PRAGMA {name}")?;
                for arg in args {
                    write!(f, " {arg}")?;
                }
                Ok(())
            }
            Instruction::Declare { name, size } => write!(f, "DECLARE {name} BIT[{size}]"),
            Instruction::Rx { theta, qubit } => write!(f, "RX({theta}) {qubit}"),
            Instruction::Measure { qubit, target } => write!(f, "MEASURE {qubit} {target}"),
        }
    }
}

/// An ordered Quil program with a shot repeat count.
///
/// Immutable once handed to a QAM for compilation; the builder methods all
/// take `&mut self` and the handle types only ever borrow it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    instructions: Vec<Instruction>,
    shots: u32,
}

impl Program {
    /// Create an empty program with a single shot.
    pub fn new() -> Self {
        Self {
            instructions: vec![],
            shots: 1,
        }
    }

    /// Append a raw pragma.
    pub fn pragma(&mut self, name: impl Into<String>, args: Vec<String>) -> &mut Self {
        self.instructions.push(Instruction::Pragma {
            name: name.into(),
            args,
        });
        self
    }

    /// Append the `INITIAL_REWIRING` pragma.
    pub fn initial_rewiring(&mut self, strategy: RewiringStrategy) -> &mut Self {
        self.pragma("INITIAL_REWIRING", vec![strategy.to_string()])
    }

    /// Declare a classical BIT region and return a handle to it.
    pub fn declare(&mut self, name: impl Into<String>, size: usize) -> MemoryRegion {
        let name = name.into();
        self.instructions.push(Instruction::Declare {
            name: name.clone(),
            size,
        });
        MemoryRegion { name, size }
    }

    /// Append an `RX` rotation.
    pub fn rx(&mut self, theta: f64, qubit: impl Into<QubitId>) -> &mut Self {
        self.instructions.push(Instruction::Rx {
            theta,
            qubit: qubit.into(),
        });
        self
    }

    /// Append a `MEASURE` into a classical bit.
    pub fn measure(&mut self, qubit: impl Into<QubitId>, target: MemoryReference) -> &mut Self {
        self.instructions.push(Instruction::Measure {
            qubit: qubit.into(),
            target,
        });
        self
    }

    /// Repeat the whole instruction sequence `shots` times on execution,
    /// one result row per repetition.
    pub fn wrap_in_shots(&mut self, shots: u32) -> &mut Self {
        self.shots = shots;
        self
    }

    /// Number of shots this program runs for.
    pub fn num_shots(&self) -> u32 {
        self.shots
    }

    /// The instruction sequence, in program order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Qubits that are measured, in program order.
    pub fn measured_qubits(&self) -> Vec<QubitId> {
        self.instructions
            .iter()
            .filter_map(|inst| match inst {
                Instruction::Measure { qubit, .. } => Some(*qubit),
                _ => None,
            })
            .collect()
    }

    /// Distinct qubits the program touches.
    pub fn qubits(&self) -> BTreeSet<QubitId> {
        self.instructions
            .iter()
            .filter_map(|inst| match inst {
                Instruction::Rx { qubit, .. } | Instruction::Measure { qubit, .. } => Some(*qubit),
                _ => None,
            })
            .collect()
    }

    /// Declared size of a memory region, if the program declares it.
    pub fn declared_size(&self, region: &str) -> Option<usize> {
        self.instructions.iter().find_map(|inst| match inst {
            Instruction::Declare { name, size } if name == region => Some(*size),
            _ => None,
        })
    }
}

impl Default for Program {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Program {
    /// Quil text, one instruction per line. The shot count is execution
    /// metadata and is not part of the text.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for inst in &self.instructions {
            writeln!(f, "{inst}")?;
        }
        Ok(())
    }
}
