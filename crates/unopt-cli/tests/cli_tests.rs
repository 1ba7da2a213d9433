//! End-to-end tests of the `unopt` binary.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use unopt_ir::{Operator, QubitId};
use unopt_qasm::parse;

const CHAIN: &str = "\
OPENQASM 2.0;
include \"qelib1.inc\";
qreg q[3];
h q[0];
cx q[0],q[1];
cx q[1],q[2];
rz(pi/4) q[2];
";

fn unopt(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_unopt"))
        .args(args)
        .output()
        .expect("failed to launch unopt")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn write(dir: &Path, name: &str, contents: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path.to_string_lossy().into_owned()
}

fn assert_same_unitary(a: &str, b: &str) {
    let a = Operator::from_circuit(&parse(a).unwrap()).unwrap();
    let b = Operator::from_circuit(&parse(b).unwrap()).unwrap();
    assert!(a.equiv(&b, 1e-9));
}

#[test]
fn test_generate_writes_header_and_equivalent_circuit() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "chain.qasm", CHAIN);
    let output = dir.path().join("out/chain_unopt.qasm");
    let output_str = output.to_string_lossy().into_owned();

    let run = unopt(&[
        "generate", "-i", &input, "-o", &output_str, "--iterations", "2", "--seed", "42",
        "--verify",
    ]);
    assert!(run.status.success(), "stderr: {}", stderr(&run));
    assert!(stdout(&run).contains(&format!("Wrote {output_str} (qubits=3, ops=")));

    let written = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(lines[0], format!("// Elementary unoptimization applied to {input}"));
    assert_eq!(
        lines[1],
        "// iterations=2, strategy=concatenated, decomposition=default, opt_level=3, seed=42"
    );
    assert_eq!(lines[2], "// Generated via unopt generate");
    assert_eq!(lines[3], "OPENQASM 2.0;");

    assert_same_unitary(CHAIN, &written);
}

#[test]
fn test_generate_is_reproducible_with_seed() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "chain.qasm", CHAIN);
    let first = dir.path().join("first.qasm").to_string_lossy().into_owned();
    let second = dir.path().join("second.qasm").to_string_lossy().into_owned();

    for out in [&first, &second] {
        let run = unopt(&[
            "generate", "-i", &input, "-o", out, "--strategy", "random", "--seed", "7",
        ]);
        assert!(run.status.success(), "stderr: {}", stderr(&run));
    }

    let body = |path: &str| {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .skip(3)
            .collect::<Vec<_>>()
            .join("\n")
    };
    assert_eq!(body(&first), body(&second));
}

#[test]
fn test_generate_reads_settings_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "chain.qasm", CHAIN);
    let config = write(
        dir.path(),
        "recipe.yaml",
        "iterations: 3\ndecomposition_method: kak\noptimization_level: 1\nseed: 5\n",
    );

    let run = unopt(&["generate", "-i", &input, "-c", &config, "--seed", "6"]);
    assert!(run.status.success(), "stderr: {}", stderr(&run));

    let written = fs::read_to_string(dir.path().join("chain_unopt.qasm")).unwrap();
    assert!(written.contains("// iterations=3, strategy=concatenated, decomposition=kak, opt_level=1, seed=6"));
    assert_same_unitary(CHAIN, &written);
}

#[test]
fn test_generate_skip_synth_keeps_inserted_structure() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "chain.qasm", CHAIN);
    let output = dir.path().join("raw.qasm").to_string_lossy().into_owned();

    let run = unopt(&[
        "generate", "-i", &input, "-o", &output, "--skip-synth", "--seed", "1", "--verify",
    ]);
    assert!(run.status.success(), "stderr: {}", stderr(&run));
    let written = parse(&fs::read_to_string(&output).unwrap()).unwrap();
    assert!(written.len() > 4);
}

#[test]
fn test_generate_rejects_bad_settings() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "chain.qasm", CHAIN);

    let run = unopt(&["generate", "-i", &input, "--strategy", "greedy"]);
    assert!(!run.status.success());
    assert!(stderr(&run).contains("Unknown strategy 'greedy'"));

    let run = unopt(&["generate", "-i", &input, "--opt-level", "7"]);
    assert!(!run.status.success());
    assert!(!dir.path().join("chain_unopt.qasm").exists());
}

#[test]
fn test_generate_reports_parse_errors() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "bad.qasm", "OPENQASM 2.0;\nqreg q[1];\nfoo q[0];\n");

    let run = unopt(&["generate", "-i", &input]);
    assert!(!run.status.success());
    assert!(stderr(&run).contains("Parse error"));

    let run = unopt(&["generate", "-i", "does/not/exist.qasm"]);
    assert!(!run.status.success());
    assert!(stderr(&run).contains("File not found"));
}

#[test]
fn test_verify_refuses_wide_circuits() {
    let dir = tempfile::tempdir().unwrap();
    let mut source = String::from("OPENQASM 2.0;\ninclude \"qelib1.inc\";\nqreg q[13];\nh q[0];\n");
    for i in 0..12 {
        source.push_str(&format!("cx q[{i}],q[{}];\n", i + 1));
    }
    let input = write(dir.path(), "wide.qasm", &source);

    let run = unopt(&["generate", "-i", &input, "--skip-synth", "--verify"]);
    assert!(!run.status.success());
    assert!(stderr(&run).contains("Cannot verify"));
}

#[test]
fn test_batch_regenerates_all_tasks() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "chain.qasm", CHAIN);
    write(
        dir.path(),
        "bell.qasm",
        "OPENQASM 2.0;\ninclude \"qelib1.inc\";\nqreg q[2];\ncreg c[2];\nh q[0];\ncx q[0],q[1];\nmeasure q -> c;\n",
    );
    let config = write(
        dir.path(),
        "tasks.yaml",
        "\
recipe:
  seed: 42
generator: benchmarks/regenerate.sh
tasks:
  - source: chain.qasm
    target: unoptimized/chain_unopt.qasm
  - source: bell.qasm
    target: unoptimized/bell_unopt.qasm
",
    );

    let run = unopt(&["batch", "--config", &config]);
    assert!(run.status.success(), "stderr: {}", stderr(&run));
    let out = stdout(&run);
    assert!(out.contains("Wrote unoptimized/chain_unopt.qasm (qubits=3, ops="));
    assert!(out.contains("Wrote unoptimized/bell_unopt.qasm (qubits=2, ops="));

    let chain = fs::read_to_string(dir.path().join("unoptimized/chain_unopt.qasm")).unwrap();
    assert!(chain.starts_with(
        "// Elementary unoptimization applied to chain.qasm\n\
         // iterations=1, strategy=concatenated, decomposition=default, opt_level=3, seed=42\n\
         // Generated via benchmarks/regenerate.sh\n"
    ));
    assert_same_unitary(CHAIN, &chain);

    let bell = parse(&fs::read_to_string(dir.path().join("unoptimized/bell_unopt.qasm")).unwrap())
        .unwrap();
    assert_eq!(bell.count_ops().get("measure"), Some(&2));
}

#[test]
fn test_batch_stops_at_failing_task() {
    let dir = tempfile::tempdir().unwrap();
    let config = write(
        dir.path(),
        "tasks.json",
        r#"{"tasks": [{"source": "missing.qasm", "target": "out.qasm"}]}"#,
    );

    let run = unopt(&["batch", "-c", &config]);
    assert!(!run.status.success());
    assert!(stderr(&run).contains("Task 1 (missing.qasm) failed"));
}

#[test]
fn test_stats_json() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "chain.qasm", CHAIN);

    let run = unopt(&["stats", "-i", &input, "--format", "json"]);
    assert!(run.status.success(), "stderr: {}", stderr(&run));
    let out = stdout(&run);
    assert!(out.contains("\"num_qubits\": 3"));
    assert!(out.contains("\"instructions\": 4"));
    assert!(out.contains("\"two_qubit_gates\": 2"));
    assert!(out.contains("\"depth\": 4"));
}

#[test]
fn test_stats_table_reads_generated_files() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "chain.qasm", CHAIN);
    let output = dir.path().join("u.qasm").to_string_lossy().into_owned();
    assert!(unopt(&["generate", "-i", &input, "-o", &output]).status.success());

    let run = unopt(&["stats", "-i", &output]);
    assert!(run.status.success(), "stderr: {}", stderr(&run));
    assert!(stdout(&run).contains("Qubits:"));

    let circuit = parse(&fs::read_to_string(&output).unwrap()).unwrap();
    assert!(circuit.qubits().all(|q| q < QubitId(3)));
}
