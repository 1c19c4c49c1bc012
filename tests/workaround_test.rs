// tests/workaround_test.rs
use serial_test::serial;

use git_autobump::workaround::{self, AttemptGate, GatePhase};

const PROBE: &str = "AUTOBUMP_TEST_PROBE";

fn probes() -> Vec<String> {
    vec![PROBE.to_string()]
}

fn signatures() -> Vec<String> {
    vec!["jetbrains".to_string(), "pycharm".to_string()]
}

#[test]
#[serial]
fn test_detection_matches_vendor_fragment() {
    std::env::set_var(PROBE, "JetBrains-JediTerm");
    assert!(workaround::ide_session_detected(&probes(), &signatures()));
    std::env::remove_var(PROBE);
}

#[test]
#[serial]
fn test_detection_is_case_insensitive() {
    std::env::set_var(PROBE, "pycharm 2024.1");
    assert!(workaround::ide_session_detected(&probes(), &signatures()));
    std::env::remove_var(PROBE);
}

#[test]
#[serial]
fn test_no_detection_for_other_terminals() {
    std::env::set_var(PROBE, "Apple_Terminal");
    assert!(!workaround::ide_session_detected(&probes(), &signatures()));
    std::env::remove_var(PROBE);
}

#[test]
#[serial]
fn test_no_detection_when_unset() {
    std::env::remove_var(PROBE);
    assert!(!workaround::ide_session_detected(&probes(), &signatures()));
}

#[test]
fn test_two_phase_gate_sequence() {
    let dir = tempfile::tempdir().unwrap();
    let gate = AttemptGate::for_repo(dir.path());

    // First IDE-flagged pass: work runs, then the commit is failed on
    // purpose with the attempt recorded.
    assert_eq!(workaround::evaluate(&gate, true), GatePhase::FirstAttempt);
    gate.arm().unwrap();

    // The IDE's retry: pending attempt short-circuits all work.
    assert_eq!(workaround::evaluate(&gate, true), GatePhase::SecondAttempt);
    gate.clear().unwrap();

    // Third commit starts over.
    assert_eq!(workaround::evaluate(&gate, true), GatePhase::FirstAttempt);
    gate.clear().unwrap();
}
