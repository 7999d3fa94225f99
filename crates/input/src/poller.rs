//! The polling task.
//!
//! One tokio task per controller samples the backend every
//! `poll_interval`, pushes the folded button set through an
//! [`EdgeDetector`] and forwards each event over a bounded channel. Device
//! errors never end the task: it goes quiet and retries detection every
//! `detect_retry` until the backend comes back.

use padnav_types::{NavEvent, NavInput, PollerSettings};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::backend::ControllerBackend;
use crate::edges::EdgeDetector;

const CHANNEL_CAPACITY: usize = 64;

/// Spawns controller polling tasks.
pub struct ControllerPoller;

impl ControllerPoller {
    /// Starts polling `backend` on the current tokio runtime.
    ///
    /// Returns the handle that stops the task and the receiving end the
    /// router's loop drains. The channel closes once the task has exited.
    pub fn spawn<B>(backend: B, settings: PollerSettings) -> (PollerHandle, mpsc::Receiver<NavInput>)
    where
        B: ControllerBackend + 'static,
    {
        let (sender, receiver) = mpsc::channel(CHANNEL_CAPACITY);
        let cancellation_token = CancellationToken::new();
        let task = tokio::spawn(poll_loop(backend, settings, sender, cancellation_token.child_token()));
        let handle = PollerHandle {
            cancellation_token,
            task: Some(task),
        };
        (handle, receiver)
    }
}

/// Control handle for a running poller. Dropping it stops the poller.
#[derive(Debug)]
pub struct PollerHandle {
    cancellation_token: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl PollerHandle {
    /// Requests the poller to stop. Idempotent and safe from any thread;
    /// no event is sent after the task observes the request.
    pub fn stop(&self) {
        if !self.cancellation_token.is_cancelled() {
            debug!("stopping controller poller");
        }
        self.cancellation_token.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.cancellation_token.is_cancelled()
    }

    /// A token that stops this poller when cancelled, for hosts that need
    /// to stop it from code that cannot hold the handle.
    pub fn stop_token(&self) -> CancellationToken {
        self.cancellation_token.clone()
    }

    /// Stops the poller and waits for its task to finish.
    pub async fn join(mut self) {
        self.stop();
        if let Some(task) = self.task.take()
            && let Err(error) = task.await
        {
            warn!(error = %error, "controller poller task failed");
        }
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.cancellation_token.cancel();
    }
}

async fn poll_loop<B: ControllerBackend>(
    mut backend: B,
    settings: PollerSettings,
    sender: mpsc::Sender<NavInput>,
    cancellation_token: CancellationToken,
) {
    let mut ticker = time::interval(settings.poll_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut edges = EdgeDetector::new(&settings);
    let mut connected = false;
    let mut next_detect = Instant::now();

    loop {
        tokio::select! {
            biased;
            _ = cancellation_token.cancelled() => break,
            _ = ticker.tick() => {}
        }
        let now = Instant::now();

        if !connected {
            if now < next_detect {
                continue;
            }
            match backend.detect() {
                Ok(()) => {
                    info!(backend = backend.name(), "controller detected");
                    connected = true;
                }
                Err(error) => {
                    debug!(backend = backend.name(), error = %error, "controller not available; retrying");
                    next_detect = now + settings.detect_retry();
                    continue;
                }
            }
        }

        let state = match backend.read() {
            Ok(state) => state,
            Err(error) => {
                warn!(backend = backend.name(), error = %error, "controller lost");
                connected = false;
                edges.reset();
                next_detect = now + settings.detect_retry();
                continue;
            }
        };

        for event in edges.update(&state.effective_buttons(settings.stick_deadzone), now) {
            if !forward(&sender, &cancellation_token, event).await {
                debug!(backend = backend.name(), "controller poller exiting");
                return;
            }
        }
    }
    debug!(backend = backend.name(), "controller poller stopped");
}

/// Sends one event unless the poller is being stopped or nobody listens.
async fn forward(sender: &mpsc::Sender<NavInput>, cancellation_token: &CancellationToken, event: NavEvent) -> bool {
    tokio::select! {
        biased;
        _ = cancellation_token.cancelled() => false,
        sent = sender.send(NavInput::controller(event)) => sent.is_ok(),
    }
}
