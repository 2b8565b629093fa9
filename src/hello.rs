//! The coin-toss flow: build, compile, run, greet.
//!
//! Asks the target computer to perform a simple coin-toss experiment: put
//! every qubit of the layout halfway between |0> and |1> with an RX(π/2)
//! pulse, measure it, and repeat for a handful of shots. The returned
//! greeting carries the full measurement matrix, which is all the evidence
//! a connectivity check needs.

use std::f64::consts::FRAC_PI_2;

use tracing::{debug, info};

use crate::config::QcsConfig;
use crate::error::Result;
use crate::lattice::{DeviceLayout, RegistryClient};
use crate::program::{Program, RewiringStrategy};
use crate::qam::{QuantumComputer, get_qc};

/// Device used when the command line names none.
pub const DEFAULT_DEVICE: &str = "9q-generic-qvm";

/// Default number of shots per run.
pub const DEFAULT_SHOTS: u32 = 5;

/// Build the coin-toss program for a resolved layout.
///
/// One classical readout bit, one RX(π/2) and one measurement per layout
/// qubit, in the layout's declared order; rotations before measurements.
/// The program opens with a greedy rewiring pragma so the downstream
/// compiler may remap qubits freely, and repeats for `shots` shots.
pub fn coin_toss_program(layout: &DeviceLayout, shots: u32) -> Result<Program> {
    let qubits = layout.qubits();

    let mut program = Program::new();
    program.initial_rewiring(RewiringStrategy::Greedy);
    let readout = program.declare("ro", qubits.len());

    for &qubit in &qubits {
        program.rx(FRAC_PI_2, qubit);
    }
    for (idx, &qubit) in qubits.iter().enumerate() {
        program.measure(qubit, readout.bit(idx)?);
    }

    program.wrap_in_shots(shots);
    Ok(program)
}

/// Compose the greeting line for a finished run.
pub fn greeting(device_name: &str, simulated: bool, results: &impl std::fmt::Display) -> String {
    let qualifier = if simulated { " virtual" } else { "" };
    format!("Your{qualifier} quantum computer, {device_name}, greets you with:\n{results}")
}

/// Compile and run the coin toss on an already-resolved computer.
///
/// The injectable core of [`hello_qmi`]: callers that hold their own
/// [`QuantumComputer`] (tests, notably) start here.
pub async fn run_on(qc: &QuantumComputer, layout: &DeviceLayout, shots: u32) -> Result<String> {
    let program = coin_toss_program(layout, shots)?;
    debug!("coin-toss program:\n{program}");

    let compiled = qc.compile(&program).await?;
    let results = qc.run(&compiled).await?;
    info!(
        "ran {shots} shots over {} qubits on {}",
        layout.qubits().len(),
        qc.name()
    );

    Ok(greeting(qc.name(), qc.is_simulated(), &results))
}

/// Get acquainted with a quantum computer by name.
///
/// Resolves the device against the lattice registry (a registry failure is
/// fatal), builds the coin-toss program over the resolved layout or the
/// default three qubits, compiles and runs it on the resolved target, and
/// returns the greeting with the shots × qubits result matrix.
pub async fn hello_qmi(device_name: &str, shots: u32, config: &QcsConfig) -> Result<String> {
    let registry = RegistryClient::new(&config.forest_url)?;
    let layout = DeviceLayout::from_query(registry.query_device(device_name).await?);

    let qc = get_qc(device_name, config).await?;
    run_on(&qc, &layout, shots).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::Lattice;
    use crate::program::{Instruction, QubitId};

    fn lattice_layout() -> DeviceLayout {
        let lattice: Lattice = serde_json::from_str(
            r#"{"name": "Aspen-9-2Q-A", "qubits": {"0": 14, "1": 15}}"#,
        )
        .unwrap();
        DeviceLayout::Lattice(lattice)
    }

    #[test]
    fn test_program_starts_with_rewiring_pragma() {
        let program = coin_toss_program(&DeviceLayout::Default, 5).unwrap();
        assert!(matches!(
            &program.instructions()[0],
            Instruction::Pragma { name, .. } if name == "INITIAL_REWIRING"
        ));
    }

    #[test]
    fn test_default_layout_program() {
        let program = coin_toss_program(&DeviceLayout::Default, 5).unwrap();
        assert_eq!(program.declared_size("ro"), Some(3));
        assert_eq!(
            program.measured_qubits(),
            vec![QubitId(0), QubitId(1), QubitId(2)]
        );
        assert_eq!(program.num_shots(), 5);
    }

    #[test]
    fn test_lattice_layout_program() {
        let program = coin_toss_program(&lattice_layout(), 7).unwrap();
        assert_eq!(program.declared_size("ro"), Some(2));
        assert_eq!(program.measured_qubits(), vec![QubitId(14), QubitId(15)]);
        assert_eq!(program.num_shots(), 7);

        // One rotation per qubit, in declared order, before any measurement.
        let rx_qubits: Vec<_> = program
            .instructions()
            .iter()
            .filter_map(|inst| match inst {
                Instruction::Rx { qubit, .. } => Some(*qubit),
                _ => None,
            })
            .collect();
        assert_eq!(rx_qubits, vec![QubitId(14), QubitId(15)]);
        let first_measure = program
            .instructions()
            .iter()
            .position(|i| matches!(i, Instruction::Measure { .. }))
            .unwrap();
        let last_rx = program
            .instructions()
            .iter()
            .rposition(|i| matches!(i, Instruction::Rx { .. }))
            .unwrap();
        assert!(last_rx < first_measure);
    }

    #[test]
    fn test_rotation_angle_is_quarter_turn() {
        let program = coin_toss_program(&DeviceLayout::Default, 1).unwrap();
        for inst in program.instructions() {
            if let Instruction::Rx { theta, .. } = inst {
                assert!((theta - FRAC_PI_2).abs() < f64::EPSILON);
            }
        }
    }

    #[test]
    fn test_greeting_virtual() {
        let text = greeting("fake-device", true, &"[[0 1 1]]");
        assert!(text.starts_with("Your virtual quantum computer, fake-device, greets you with:\n"));
        assert!(text.ends_with("[[0 1 1]]"));
    }

    #[test]
    fn test_greeting_real_omits_virtual() {
        let text = greeting("Aspen-9-2Q-A", false, &"[[0 1]]");
        assert!(text.starts_with("Your quantum computer, Aspen-9-2Q-A, greets you with:\n"));
        assert!(!text.contains("virtual"));
    }
}
