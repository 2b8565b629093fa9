//! End-to-end coin-toss scenarios.
//!
//! These exercise the full build → compile → run → greet flow against
//! injected QAM handles, so they run without any service reachable.

use async_trait::async_trait;

use hello_qmi::{
    DEFAULT_SHOTS, DeviceLayout, Lattice, Program, Qam, QuantumComputer, Qvm, ResultMatrix,
    Result, coin_toss_program, run_on,
};

/// A stand-in for real hardware: compiles and runs like the QVM but
/// reports itself as physical.
struct HardwareProxy {
    inner: Qvm,
}

impl HardwareProxy {
    fn new(seed: u64) -> Self {
        Self {
            inner: Qvm::with_seed(seed),
        }
    }
}

#[async_trait]
impl Qam for HardwareProxy {
    fn is_simulated(&self) -> bool {
        false
    }

    async fn compile(&self, program: &Program) -> Result<hello_qmi::CompiledProgram> {
        self.inner.compile(program).await
    }

    async fn run(&self, program: &hello_qmi::CompiledProgram) -> Result<ResultMatrix> {
        self.inner.run(program).await
    }
}

fn two_qubit_lattice() -> Lattice {
    serde_json::from_str(
        r#"{
            "name": "real-device",
            "device_name": "Aspen-9",
            "qubits": {"0": 14, "1": 15}
        }"#,
    )
    .unwrap()
}

/// Scenario A: an unregistered device falls back to three fixed qubits on
/// a simulator and greets as a virtual computer.
#[tokio::test]
async fn test_unknown_device_greets_virtually() {
    let qc = QuantumComputer::new("fake-device", Box::new(Qvm::with_seed(11)));
    let layout = DeviceLayout::from_query(None);

    let greeting = run_on(&qc, &layout, DEFAULT_SHOTS).await.unwrap();

    assert!(greeting.starts_with("Your virtual quantum computer, fake-device, greets you with:\n"));

    // The matrix below the greeting is 5 shots x 3 qubits of 0s and 1s.
    let matrix = greeting.split_once('\n').unwrap().1;
    let rows: Vec<&str> = matrix.lines().collect();
    assert_eq!(rows.len(), 5);
    for row in rows {
        let bits: Vec<char> = row.chars().filter(|c| *c == '0' || *c == '1').collect();
        assert_eq!(bits.len(), 3);
    }
}

/// Scenario B: a registered two-qubit lattice runs over its declared
/// qubits on a real handle and the greeting drops the virtual qualifier.
#[tokio::test]
async fn test_registered_device_greets_as_real() {
    let qc = QuantumComputer::new("real-device", Box::new(HardwareProxy::new(23)));
    let layout = DeviceLayout::from_query(Some(two_qubit_lattice()));

    let program = coin_toss_program(&layout, DEFAULT_SHOTS).unwrap();
    assert_eq!(program.declared_size("ro"), Some(2));
    assert_eq!(
        program.measured_qubits(),
        vec![hello_qmi::QubitId(14), hello_qmi::QubitId(15)]
    );

    let greeting = run_on(&qc, &layout, DEFAULT_SHOTS).await.unwrap();
    assert!(greeting.starts_with("Your quantum computer, real-device, greets you with:\n"));
    assert!(!greeting.contains("virtual"));

    let matrix = greeting.split_once('\n').unwrap().1;
    assert_eq!(matrix.lines().count(), 5);
}

/// The shot count flows through to the number of result rows.
#[tokio::test]
async fn test_shot_count_sets_row_count() {
    let qc = QuantumComputer::new("9q-generic-qvm", Box::new(Qvm::with_seed(5)));
    let layout = DeviceLayout::from_query(None);

    let program = coin_toss_program(&layout, 12).unwrap();
    let compiled = qc.compile(&program).await.unwrap();
    let results = qc.run(&compiled).await.unwrap();

    assert_eq!(results.shots(), 12);
    assert_eq!(results.width(), 3);
    assert!(results.is_binary());
}

/// Compiling for a target works through the handle exactly as through the
/// QAM itself, and the compiled program keeps the shot wrapper.
#[tokio::test]
async fn test_compiled_program_keeps_shots() {
    let qc = QuantumComputer::new("9q-generic-qvm", Box::new(Qvm::with_seed(5)));
    let program = coin_toss_program(&DeviceLayout::Default, 9).unwrap();
    let compiled = qc.compile(&program).await.unwrap();
    assert_eq!(compiled.source().num_shots(), 9);
    assert!(compiled.native_quil().contains("PRAGMA INITIAL_REWIRING"));
}
