//! Async driver for the drawer reducer
//!
//! Each command is reduced under the lock, the resulting effects are executed
//! outside it, and fetch completions are fed back through the reducer. The
//! lock is never held across an await.
//!
//! The drawer and the cancellation token of its current generation share one
//! mutex, so a token is only ever swapped in the same critical section as the
//! reduction that superseded it.

use parking_lot::Mutex;
use shared::error::AppResult;
use shared::models::{Axis, SortKey, SortOrder, TopN};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use super::state::{
    Drawer, DrawerCommand, DrawerState, Effect, FetchRequest, OpenPivot, Outcome, Transition,
};
use crate::port::AggregationPort;

/// Drawer plus the token of the generation it is currently on
#[derive(Debug, Default)]
struct Inner {
    drawer: Drawer,
    token: CancellationToken,
    token_generation: u64,
}

impl Inner {
    /// Reduce one command and settle its cancellations; returns the fetches
    /// to run, each paired with the token of its own generation
    fn apply(
        &mut self,
        command: DrawerCommand,
    ) -> AppResult<(Vec<(FetchRequest, CancellationToken)>, Outcome)> {
        let Transition {
            drawer,
            effects,
            outcome,
        } = self.drawer.reduce(command)?;
        self.drawer = drawer;

        let mut fetches = Vec::new();
        for effect in effects {
            match effect {
                Effect::CancelGeneration(generation) => self.cancel(generation),
                Effect::Fetch(request) => {
                    let token = self.token_for(request.ticket.generation);
                    fetches.push((request, token));
                }
            }
        }
        Ok((fetches, outcome))
    }

    fn cancel(&mut self, generation: u64) {
        if generation != self.token_generation {
            return;
        }
        self.token.cancel();
        self.token = CancellationToken::new();
        self.token_generation = self.drawer.generation();
        tracing::debug!(generation, "[Drawer] Generation cancelled");
    }

    fn token_for(&self, generation: u64) -> CancellationToken {
        if generation == self.token_generation {
            return self.token.clone();
        }
        // a fetch of a generation that is already gone never runs
        let token = CancellationToken::new();
        token.cancel();
        token
    }
}

/// One drill-down drawer bound to an aggregation port
pub struct DrillDownSession {
    port: Arc<dyn AggregationPort>,
    inner: Mutex<Inner>,
}

impl DrillDownSession {
    pub fn new(port: Arc<dyn AggregationPort>) -> Self {
        Self {
            port,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Copy of the current drawer state
    pub fn snapshot(&self) -> DrawerState {
        self.inner.lock().drawer.state().clone()
    }

    pub fn generation(&self) -> u64 {
        self.inner.lock().drawer.generation()
    }

    pub async fn open(&self, open: OpenPivot) -> AppResult<Outcome> {
        self.dispatch(DrawerCommand::Open(open)).await
    }

    pub async fn set_active_axis(&self, axis: Axis) -> AppResult<Outcome> {
        self.dispatch(DrawerCommand::SetActiveAxis(axis)).await
    }

    pub async fn set_sort_by(&self, sort_by: SortKey) -> AppResult<Outcome> {
        self.dispatch(DrawerCommand::SetSortBy(sort_by)).await
    }

    pub async fn set_order(&self, order: SortOrder) -> AppResult<Outcome> {
        self.dispatch(DrawerCommand::SetOrder(order)).await
    }

    pub async fn set_top_n(&self, top_n: TopN) -> AppResult<Outcome> {
        self.dispatch(DrawerCommand::SetTopN(top_n)).await
    }

    pub async fn load_more(&self, axis: Axis) -> AppResult<Outcome> {
        self.dispatch(DrawerCommand::LoadMore(axis)).await
    }

    /// Manual retry after a port failure
    pub async fn reload(&self) -> AppResult<Outcome> {
        self.dispatch(DrawerCommand::Reload).await
    }

    pub async fn close(&self) -> AppResult<Outcome> {
        self.dispatch(DrawerCommand::Close).await
    }

    /// Reduce one command and run its effects to completion
    ///
    /// Port failures come back as `Err` once the drawer has recorded them;
    /// stale completions come back as `Ok(Outcome::Discarded)`.
    pub async fn dispatch(&self, command: DrawerCommand) -> AppResult<Outcome> {
        let (fetches, mut outcome) = self.inner.lock().apply(command)?;
        for (request, token) in fetches {
            outcome = self.run_fetch(request, token).await?;
        }
        Ok(outcome)
    }

    async fn run_fetch(
        &self,
        request: FetchRequest,
        token: CancellationToken,
    ) -> AppResult<Outcome> {
        let FetchRequest { ticket, query } = request;

        let result = tokio::select! {
            _ = token.cancelled() => {
                tracing::debug!(?ticket, "[Drawer] Fetch abandoned");
                return Ok(Outcome::Discarded(ticket));
            }
            result = self.port.fetch_pivot(&query) => result,
        };

        let (_, outcome) = self
            .inner
            .lock()
            .apply(DrawerCommand::Loaded { ticket, result })?;
        match outcome {
            Outcome::Failed { error, .. } => Err(error),
            other => Ok(other),
        }
    }
}
