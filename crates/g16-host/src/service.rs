//! Long-lived host service: one worker thread serving run requests.
//!
//! Runs are serialized on the worker, so two setups never race on the same
//! circuit. [`HostService::stop`] cancels the in-flight run at its next stage
//! boundary, closes the request channel and joins the worker.

use std::sync::mpsc::{self, Receiver, SyncSender};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use g16_pipeline::{CancelToken, PipelineConfig};
use tracing::{debug, info, warn};

use crate::{run_test_with_cancel, RunOutcome};

/// Pending requests beyond the one being served
const QUEUE_DEPTH: usize = 4;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("service is stopped")]
    Stopped,

    #[error("worker thread panicked")]
    WorkerPanicked,
}

struct Request {
    config: PipelineConfig,
    reply: mpsc::Sender<RunOutcome>,
}

/// Reply slot for a submitted run.
pub struct PendingRun {
    outcome: Receiver<RunOutcome>,
}

impl PendingRun {
    /// Block until the worker has served the request.
    pub fn wait(self) -> Result<RunOutcome, ServiceError> {
        self.outcome.recv().map_err(|_| ServiceError::Stopped)
    }
}

/// `Sync`: calls and [`HostService::stop`] may come from different threads.
pub struct HostService {
    config: PipelineConfig,
    sender: Mutex<Option<SyncSender<Request>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
    shutdown: CancelToken,
}

fn lock<T>(slot: &Mutex<T>) -> MutexGuard<'_, T> {
    // the guarded values stay consistent even if a holder panicked
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

impl HostService {
    pub fn start(config: PipelineConfig) -> Result<Self, ServiceError> {
        let (sender, receiver) = mpsc::sync_channel(QUEUE_DEPTH);
        let shutdown = CancelToken::new();
        let worker_shutdown = shutdown.clone();
        let worker = thread::Builder::new()
            .name("g16-host".into())
            .spawn(move || serve(receiver, worker_shutdown))?;
        info!(curve = %config.curve, "host service started");

        Ok(Self {
            config,
            sender: Mutex::new(Some(sender)),
            worker: Mutex::new(Some(worker)),
            shutdown,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        lock(&self.sender).is_some()
    }

    /// Run with the service's configuration and wait for the outcome.
    pub fn call(&self) -> Result<RunOutcome, ServiceError> {
        self.call_with(self.config.clone())
    }

    pub fn call_with(&self, config: PipelineConfig) -> Result<RunOutcome, ServiceError> {
        self.submit(config)?.wait()
    }

    /// Queue a run without waiting for it.
    pub fn submit(&self, config: PipelineConfig) -> Result<PendingRun, ServiceError> {
        // clone out of the lock so stop() is never blocked by a full queue
        let sender = lock(&self.sender).clone().ok_or(ServiceError::Stopped)?;
        let (reply, outcome) = mpsc::channel();
        sender
            .send(Request { config, reply })
            .map_err(|_| ServiceError::Stopped)?;
        Ok(PendingRun { outcome })
    }

    /// Cancel the in-flight run and anything queued, then join the worker.
    /// Waiting callers receive a cancelled outcome. Idempotent.
    pub fn stop(&self) -> Result<(), ServiceError> {
        self.shutdown.cancel();
        drop(lock(&self.sender).take());
        let worker = lock(&self.worker).take();
        if let Some(worker) = worker {
            worker.join().map_err(|_| ServiceError::WorkerPanicked)?;
            info!("host service stopped");
        }
        Ok(())
    }
}

impl Drop for HostService {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            warn!("host service shutdown: {e}");
        }
    }
}

fn serve(requests: Receiver<Request>, shutdown: CancelToken) {
    for (n, request) in requests.into_iter().enumerate() {
        debug!(request = n, "serving run");
        let outcome = run_test_with_cancel(&request.config, &shutdown);
        // caller may have given up waiting
        let _ = request.reply.send(outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calls_after_stop_fail() {
        let service = HostService::start(PipelineConfig::default()).unwrap();
        assert!(service.is_running());
        service.stop().unwrap();
        assert!(!service.is_running());
        assert!(matches!(service.call(), Err(ServiceError::Stopped)));
        // second stop is a no-op
        service.stop().unwrap();
    }

    #[test]
    fn submit_after_stop_fails() {
        let service = HostService::start(PipelineConfig::default()).unwrap();
        service.stop().unwrap();
        assert!(matches!(
            service.submit(PipelineConfig::default()),
            Err(ServiceError::Stopped)
        ));
    }
}
