// Copyright 2026 abhirupbanerjee
// Licensed under the Apache License, Version 2.0

//! Host-facing behaviour: status codes, error kinds and the service object.

use std::ffi::CStr;
use std::thread;

use g16_circuit::square_assignment;
use g16_host::{
    g16_last_error, g16_last_error_kind, g16_service_call, g16_service_cancel, g16_service_start,
    g16_service_stop,
    run_groth16_test, run_test, run_test_with_cancel, HostService, RunOutcome,
};
use g16_pipeline::{CancelToken, Curve, ErrorKind, PipelineConfig};

fn seeded(x: u64, y: u64) -> PipelineConfig {
    PipelineConfig {
        curve: Curve::Bn254,
        seed: Some(42),
        assignment: square_assignment(x, y),
    }
}

#[test]
fn square_three_nine_succeeds() {
    let outcome = run_test(&seeded(3, 9));
    assert_eq!(outcome.status(), 1);
    match outcome {
        RunOutcome::Success(report) => {
            assert_eq!(report.public_inputs, vec!["3", "9"]);
            assert_eq!(report.num_constraints, 2);
        }
        RunOutcome::Failure { message, .. } => panic!("unexpected failure: {message}"),
    }
}

#[test]
fn square_three_ten_fails_with_prove_kind() {
    let outcome = run_test(&seeded(3, 10));
    assert_eq!(outcome.status(), 0);
    assert_eq!(outcome.kind(), Some(ErrorKind::Prove));
}

#[test]
fn cancelled_run_reports_cancelled() {
    let cancel = CancelToken::new();
    cancel.cancel();
    let outcome = run_test_with_cancel(&seeded(3, 9), &cancel);
    assert_eq!(outcome.kind(), Some(ErrorKind::Cancelled));
}

#[test]
fn exported_entry_point_returns_one() {
    assert_eq!(run_groth16_test(), 1);
    assert!(g16_last_error().is_null());
    assert_eq!(g16_last_error_kind(), 0);
}

#[test]
fn service_serves_multiple_calls() {
    let service = HostService::start(seeded(3, 9)).unwrap();
    assert!(service.call().unwrap().is_success());

    let failed = service.call_with(seeded(4, 15)).unwrap();
    assert_eq!(failed.kind(), Some(ErrorKind::Prove));

    assert!(service.call().unwrap().is_success());
    service.stop().unwrap();
}

#[test]
fn dropping_service_joins_worker() {
    let service = HostService::start(seeded(2, 4)).unwrap();
    assert!(service.call().unwrap().is_success());
    drop(service);
}

#[test]
fn c_service_roundtrip() {
    let handle = g16_service_start();
    assert!(!handle.is_null());
    unsafe {
        assert_eq!(g16_service_call(handle), 1);
        assert_eq!(g16_service_stop(handle), 0);
    }
}

#[test]
fn stop_cancels_runs_awaited_on_another_thread() {
    let service = HostService::start(seeded(3, 9)).unwrap();
    // the second request queues behind the first
    let first = service.submit(seeded(3, 9)).unwrap();
    let second = service.submit(seeded(3, 9)).unwrap();
    let waiter = thread::spawn(move || second.wait());

    service.stop().unwrap();
    let outcome = waiter.join().unwrap().unwrap();
    assert_eq!(outcome.kind(), Some(ErrorKind::Cancelled));
    assert_eq!(outcome.status(), 0);

    let first = first.wait().unwrap();
    assert!(first.is_success() || first.kind() == Some(ErrorKind::Cancelled));
    assert!(!service.is_running());
}

#[test]
fn prove_failure_message_names_the_stage() {
    let outcome = run_test(&seeded(3, 10));
    let RunOutcome::Failure { kind, message } = &outcome else {
        panic!("expected failure");
    };
    assert_eq!(*kind, ErrorKind::Prove);
    assert!(message.starts_with("prove: "));
}

#[test]
fn service_failures_reach_c_callers() {
    unsafe {
        assert_eq!(g16_service_call(std::ptr::null()), 0);
        let text = CStr::from_ptr(g16_last_error()).to_str().unwrap();
        assert_eq!(text, "null service handle");

        let handle = g16_service_start();
        assert!(!handle.is_null());
        assert_eq!(g16_service_cancel(handle), 0);
        assert_eq!(g16_service_call(handle), 0);
        assert_eq!(g16_last_error_kind(), ErrorKind::Internal.code());
        let text = CStr::from_ptr(g16_last_error()).to_str().unwrap();
        assert_eq!(text, "service is stopped");
        assert_eq!(g16_service_stop(handle), 0);
    }
}
