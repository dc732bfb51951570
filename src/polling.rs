// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Periodic status polling for one clock.
//!
//! A [`PollingCoordinator`] owns at most one background task. Every tick
//! refreshes all entities of the current entity set concurrently; a failing
//! entity is logged and skipped without affecting the others or the task.
//!
//! Rescheduling aborts the previous task and waits for it to finish before
//! the replacement is spawned, so two polling tasks of the same coordinator
//! never run at the same time.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::RwLock;
use tokio::sync::Mutex;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{Instant, MissedTickBehavior};

use crate::entity::{Controllable, Entity};
use crate::error::{Result, ValueError};

/// Outcome of one polling tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Entities whose refresh succeeded.
    pub refreshed: usize,
    /// Entities whose refresh failed; their state was kept.
    pub failed: usize,
}

impl TickReport {
    /// Returns the number of entities polled.
    #[must_use]
    pub fn total(&self) -> usize {
        self.refreshed + self.failed
    }
}

struct PollingTask {
    handle: JoinHandle<()>,
    interval: Duration,
}

/// Drives the periodic refresh of a session's entities.
#[derive(Debug)]
pub struct PollingCoordinator {
    entities: Arc<RwLock<Arc<Vec<Entity>>>>,
    task: Mutex<Option<PollingTask>>,
    active: Arc<AtomicUsize>,
}

/// Decrements the active task counter when the polling task ends, including
/// when it is aborted.
struct ActiveGuard(Arc<AtomicUsize>);

impl ActiveGuard {
    fn enter(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(counter))
    }
}

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl PollingCoordinator {
    /// Creates an idle coordinator for the given entities.
    #[must_use]
    pub fn new(entities: Vec<Entity>) -> Self {
        Self {
            entities: Arc::new(RwLock::new(Arc::new(entities))),
            task: Mutex::new(None),
            active: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Returns the entity set the next tick will poll.
    #[must_use]
    pub fn entity_set(&self) -> Arc<Vec<Entity>> {
        self.entities.read().clone()
    }

    /// Swaps the entity set.
    ///
    /// A tick already in progress finishes with the set it started with; the
    /// next tick uses the new one.
    pub fn replace_entity_set(&self, entities: Vec<Entity>) {
        *self.entities.write() = Arc::new(entities);
    }

    /// Starts polling every `interval`, replacing any running task.
    ///
    /// The first tick happens one interval after this call.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::ZeroPollingInterval` for a zero interval; the
    /// running task, if any, is left alone in that case.
    pub async fn reschedule(&self, interval: Duration) -> Result<()> {
        if interval.is_zero() {
            return Err(ValueError::ZeroPollingInterval.into());
        }

        let mut slot = self.task.lock().await;
        if let Some(previous) = slot.take() {
            previous.handle.abort();
            // Cancellation is the expected outcome here.
            let _ = previous.handle.await;
            tracing::debug!(
                previous = ?previous.interval,
                interval = ?interval,
                "Polling task replaced"
            );
        }

        let entities = Arc::clone(&self.entities);
        let guard = ActiveGuard::enter(&self.active);
        let handle = tokio::spawn(async move {
            let _guard = guard;
            let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let snapshot = entities.read().clone();
                poll_all(snapshot).await;
            }
        });

        *slot = Some(PollingTask { handle, interval });
        tracing::info!(interval = ?interval, "Polling scheduled");
        Ok(())
    }

    /// Polls every entity of the current set once, right now.
    pub async fn tick(&self) -> TickReport {
        poll_all(self.entity_set()).await
    }

    /// Stops the polling task and waits for it to end. Idempotent.
    pub async fn stop(&self) {
        let mut slot = self.task.lock().await;
        if let Some(task) = slot.take() {
            task.handle.abort();
            let _ = task.handle.await;
            tracing::debug!("Polling stopped");
        }
    }

    /// Returns `true` if a polling task is scheduled.
    pub async fn is_running(&self) -> bool {
        self.task
            .lock()
            .await
            .as_ref()
            .is_some_and(|task| !task.handle.is_finished())
    }

    /// Returns the interval of the scheduled task.
    pub async fn interval(&self) -> Option<Duration> {
        self.task.lock().await.as_ref().map(|task| task.interval)
    }

    /// Returns the number of polling tasks currently alive.
    ///
    /// Never exceeds one.
    #[must_use]
    pub fn active_task_count(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }
}

impl Drop for PollingCoordinator {
    fn drop(&mut self) {
        if let Some(task) = self.task.get_mut().take() {
            task.handle.abort();
        }
    }
}

impl std::fmt::Debug for PollingTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollingTask")
            .field("interval", &self.interval)
            .field("finished", &self.handle.is_finished())
            .finish()
    }
}

async fn poll_all(entities: Arc<Vec<Entity>>) -> TickReport {
    let mut set = JoinSet::new();
    for entity in entities.iter().cloned() {
        set.spawn(async move {
            let result = entity.refresh().await;
            (entity, result)
        });
    }

    let mut report = TickReport::default();
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((_, Ok(()))) => report.refreshed += 1,
            Ok((entity, Err(e))) => {
                tracing::debug!(entity_id = %entity.id(), error = %e, "Poll failed for entity");
                report.failed += 1;
            }
            Err(e) => {
                tracing::error!(error = %e, "Poll task panicked");
                report.failed += 1;
            }
        }
    }

    tracing::trace!(refreshed = report.refreshed, failed = report.failed, "Polling tick done");
    report
}
