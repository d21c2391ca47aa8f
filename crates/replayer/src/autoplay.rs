//! Autoplay: a cancellable repeating timer around `step_forward`.
//!
//! All cursor mutation goes through the shared async mutex, so timed steps
//! and manual steps never interleave mid-transition.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::navigator::{Navigator, Step};

pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(1500);

/// Drives a shared navigator forward on a fixed interval. The timer task
/// stops itself (it does not merely pause) at end of line or when a branch
/// choice comes up; it never answers a choice on the caller's behalf.
pub struct Autoplay<P> {
    navigator: Arc<Mutex<Navigator<P>>>,
    interval: Duration,
    task: Option<JoinHandle<()>>,
}

impl<P: Clone + Send + Sync + 'static> Autoplay<P> {
    pub fn new(navigator: Arc<Mutex<Navigator<P>>>, interval: Duration) -> Self {
        Self {
            navigator,
            interval,
            task: None,
        }
    }

    pub fn navigator(&self) -> Arc<Mutex<Navigator<P>>> {
        self.navigator.clone()
    }

    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Start if stopped, stop if running. Returns whether autoplay is active
    /// after the toggle.
    pub fn toggle(&mut self) -> bool {
        if self.is_active() {
            self.stop();
            false
        } else {
            self.start();
            true
        }
    }

    fn start(&mut self) {
        let navigator = self.navigator.clone();
        let interval = self.interval;
        info!(?interval, "autoplay started");
        self.task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            // the first tick completes immediately; consume it so the first
            // step lands one interval after starting
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let outcome = navigator.lock().await.step_forward();
                match outcome {
                    Ok(Step::Moved) => {}
                    Ok(Step::EndOfLine) => {
                        debug!("autoplay reached end of line");
                        break;
                    }
                    Ok(Step::ChoiceRequired(_)) => {
                        debug!("autoplay stopped at a branch choice");
                        break;
                    }
                    Err(err) => {
                        debug!(error = %err, "autoplay stopped");
                        break;
                    }
                }
            }
        }));
    }

    /// Idempotent: stopping twice, or after the task already ended on its
    /// own, is a no-op.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            info!("autoplay stopped");
        }
    }
}

impl<P> Drop for Autoplay<P> {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
