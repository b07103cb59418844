// Copyright 2026 abhirupbanerjee
// Licensed under the Apache License, Version 2.0

//! # g16-host
//!
//! Exposes the square-circuit Groth16 run to a host runtime.
//!
//! Rust callers use [`run_test`] (tagged [`RunOutcome`]) or a long-lived
//! [`HostService`]. Foreign callers use the C ABI:
//!
//! | Symbol | Returns |
//! |---|---|
//! | `run_groth16_test()` | `1` on success, `0` on any failure |
//! | `g16_last_error()` | message of the last failure on this thread, or NULL |
//! | `g16_last_error_kind()` | [`ErrorKind::code`] of the last failure, or `0` |
//! | `g16_service_start()` | service handle, or NULL |
//! | `g16_service_call(h)` | `1` / `0` like `run_groth16_test` |
//! | `g16_service_cancel(h)` | like `g16_service_stop`, but `h` stays allocated |
//! | `g16_service_stop(h)` | `0` on clean shutdown, `-1` otherwise |
//!
//! Panics are caught at the boundary and reported as [`ErrorKind::Internal`].

pub mod service;

use std::any::Any;
use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::{c_char, c_int};
use std::panic::{self, AssertUnwindSafe};
use std::ptr;

use g16_pipeline::{run_pipeline, CancelToken, ErrorKind, PipelineConfig, RunReport};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

pub use service::{HostService, PendingRun, ServiceError};

/// Result of one run as seen by a host.
#[derive(Clone, Debug)]
pub enum RunOutcome {
    Success(RunReport),
    Failure { kind: ErrorKind, message: String },
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Success(_))
    }

    /// `1` on success, `0` otherwise
    pub fn status(&self) -> c_int {
        c_int::from(self.is_success())
    }

    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            RunOutcome::Success(_) => None,
            RunOutcome::Failure { kind, .. } => Some(*kind),
        }
    }
}

pub fn run_test(config: &PipelineConfig) -> RunOutcome {
    run_test_with_cancel(config, &CancelToken::new())
}

pub fn run_test_with_cancel(config: &PipelineConfig, cancel: &CancelToken) -> RunOutcome {
    let result = panic::catch_unwind(AssertUnwindSafe(|| run_pipeline(config, cancel)));
    match result {
        Ok(Ok(output)) => {
            info!(
                curve = %config.curve,
                constraints = output.report.num_constraints,
                elapsed_ms = output.report.total().as_millis() as u64,
                "groth16 test passed"
            );
            RunOutcome::Success(output.report)
        }
        Ok(Err(e)) => {
            error!(kind = %e.kind(), "groth16 test failed: {e}");
            RunOutcome::Failure {
                kind: e.kind(),
                message: e.to_string(),
            }
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            error!("groth16 test panicked: {message}");
            RunOutcome::Failure {
                kind: ErrorKind::Internal,
                message,
            }
        }
    }
}

/// Default run configuration for the host: square circuit with X = 3, Y = 9.
/// `G16_CURVE` and `G16_SEED` still apply; the config file does not.
pub fn host_config() -> Result<PipelineConfig, g16_pipeline::ConfigError> {
    let mut config = PipelineConfig::default();
    config.apply_overrides(|key| std::env::var(key).ok())?;
    Ok(config)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    }
}

/// Install a stderr `tracing` subscriber honouring `RUST_LOG` (default
/// `info`). Does nothing if the host already installed one.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

// ── C ABI ──

thread_local! {
    static LAST_ERROR: RefCell<Option<(ErrorKind, CString)>> = const { RefCell::new(None) };
}

fn set_last_error(kind: ErrorKind, message: &str) {
    let message = CString::new(message.replace('\0', " ")).unwrap_or_default();
    LAST_ERROR.with(|last| *last.borrow_mut() = Some((kind, message)));
}

fn clear_last_error() {
    LAST_ERROR.with(|last| *last.borrow_mut() = None);
}

/// Record the outcome for `g16_last_error*` and reduce it to a status.
fn report(outcome: &RunOutcome) -> c_int {
    match outcome {
        RunOutcome::Success(_) => clear_last_error(),
        RunOutcome::Failure { kind, message } => set_last_error(*kind, message),
    }
    outcome.status()
}

/// Run compile → setup → witness → prove → verify for `X * X == Y` with
/// `X = 3`, `Y = 9`. Returns `1` on success, `0` on failure.
#[no_mangle]
pub extern "C" fn run_groth16_test() -> c_int {
    init_logging();
    let outcome = match host_config() {
        Ok(config) => run_test(&config),
        Err(e) => {
            error!("invalid host configuration: {e}");
            RunOutcome::Failure {
                kind: ErrorKind::Internal,
                message: e.to_string(),
            }
        }
    };
    report(&outcome)
}

/// Last failure message on this thread, NULL if the last call succeeded.
/// Valid until the next call into this library on the same thread.
#[no_mangle]
pub extern "C" fn g16_last_error() -> *const c_char {
    LAST_ERROR.with(|last| match &*last.borrow() {
        Some((_, message)) => message.as_ptr(),
        None => ptr::null(),
    })
}

/// [`ErrorKind::code`] of the last failure on this thread, `0` if none.
#[no_mangle]
pub extern "C" fn g16_last_error_kind() -> c_int {
    LAST_ERROR.with(|last| match &*last.borrow() {
        Some((kind, _)) => kind.code(),
        None => 0,
    })
}

/// Opaque service handle for C callers
pub struct G16ServiceHandle {
    service: HostService,
}

/// Start a worker-backed service. Returns NULL on failure; see
/// `g16_last_error()`.
#[no_mangle]
pub extern "C" fn g16_service_start() -> *mut G16ServiceHandle {
    init_logging();
    clear_last_error();
    let started = host_config()
        .map_err(|e| e.to_string())
        .and_then(|config| HostService::start(config).map_err(|e| e.to_string()));
    match started {
        Ok(service) => Box::into_raw(Box::new(G16ServiceHandle { service })),
        Err(message) => {
            set_last_error(ErrorKind::Internal, &message);
            ptr::null_mut()
        }
    }
}

/// Run once on the service's worker. Returns `1` on success, `0` otherwise.
///
/// # Safety
/// `handle` must be NULL or a pointer returned by `g16_service_start` that
/// has not been passed to `g16_service_stop`.
#[no_mangle]
pub unsafe extern "C" fn g16_service_call(handle: *const G16ServiceHandle) -> c_int {
    // SAFETY: caller guarantees the pointer is live or null
    let Some(handle) = (unsafe { handle.as_ref() }) else {
        set_last_error(ErrorKind::Internal, "null service handle");
        return 0;
    };
    let outcome = handle
        .service
        .call()
        .unwrap_or_else(|e| RunOutcome::Failure {
            kind: ErrorKind::Internal,
            message: e.to_string(),
        });
    report(&outcome)
}

/// Cancel any in-flight run and join the worker, leaving the handle
/// allocated. Safe to call while another thread is inside
/// `g16_service_call` on the same handle; that call returns `0` with
/// `g16_last_error_kind()` reporting a cancellation. Returns `0` on clean
/// shutdown, `-1` otherwise.
///
/// # Safety
/// `handle` must be NULL or a pointer returned by `g16_service_start` that
/// has not been passed to `g16_service_stop`.
#[no_mangle]
pub unsafe extern "C" fn g16_service_cancel(handle: *const G16ServiceHandle) -> c_int {
    // SAFETY: caller guarantees the pointer is live or null
    let Some(handle) = (unsafe { handle.as_ref() }) else {
        return 0;
    };
    shutdown_status(&handle.service)
}

fn shutdown_status(service: &HostService) -> c_int {
    match service.stop() {
        Ok(()) => 0,
        Err(e) => {
            set_last_error(ErrorKind::Internal, &e.to_string());
            -1
        }
    }
}

/// Cancel any in-flight run, join the worker and free the handle.
/// Returns `0` on clean shutdown, `-1` otherwise.
///
/// # Safety
/// `handle` must be NULL or a pointer returned by `g16_service_start`, with
/// no `g16_service_call` still running on it; it is invalid after this call.
/// Use `g16_service_cancel` first to unblock such calls.
#[no_mangle]
pub unsafe extern "C" fn g16_service_stop(handle: *mut G16ServiceHandle) -> c_int {
    if handle.is_null() {
        return 0;
    }
    // SAFETY: pointer came from Box::into_raw in g16_service_start
    let handle = unsafe { Box::from_raw(handle) };
    shutdown_status(&handle.service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CStr;

    #[test]
    fn status_codes() {
        let failure = RunOutcome::Failure {
            kind: ErrorKind::Prove,
            message: "prove: witness does not satisfy `X * X == Y`".into(),
        };
        assert_eq!(failure.status(), 0);
        assert_eq!(failure.kind(), Some(ErrorKind::Prove));
    }

    #[test]
    fn last_error_tracks_reported_failures() {
        let failure = RunOutcome::Failure {
            kind: ErrorKind::Witness,
            message: "new witness: no value assigned to declared variable `Y`".into(),
        };
        assert_eq!(report(&failure), 0);
        assert_eq!(g16_last_error_kind(), ErrorKind::Witness.code());
        let message = unsafe { CStr::from_ptr(g16_last_error()) };
        assert!(message.to_str().unwrap().contains("`Y`"));

        clear_last_error();
        assert!(g16_last_error().is_null());
        assert_eq!(g16_last_error_kind(), 0);
    }

    #[test]
    fn interior_nul_does_not_lose_the_message() {
        set_last_error(ErrorKind::Internal, "bad\0byte");
        let message = unsafe { CStr::from_ptr(g16_last_error()) };
        assert_eq!(message.to_str().unwrap(), "bad byte");
    }

    #[test]
    fn panics_become_internal_failures() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");
    }

    #[test]
    fn null_service_handles_are_tolerated() {
        assert_eq!(unsafe { g16_service_call(ptr::null()) }, 0);
        assert_eq!(g16_last_error_kind(), ErrorKind::Internal.code());
        assert_eq!(unsafe { g16_service_cancel(ptr::null()) }, 0);
        assert_eq!(unsafe { g16_service_stop(ptr::null_mut()) }, 0);
    }
}
