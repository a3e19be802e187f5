//! Drawer reducer
//!
//! `Drawer::reduce` is pure: it takes the current drawer and one command and
//! returns the next drawer plus the effects to run. It never performs I/O.
//!
//! Every fetch carries a [`Ticket`]. A completion is applied only when its
//! ticket is exactly the one recorded as in flight for that axis, which
//! implies it belongs to the current generation. Reset loads bump the
//! generation, so anything issued before them is discarded on arrival.

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Axis, MetricEntry, Period, PivotPage, PivotQuery, SortKey, SortOrder, TopN};
use std::collections::BTreeMap;

// ============================================================================
// Commands & Effects
// ============================================================================

/// Parameters of a drill-down from one summary entry
#[derive(Debug, Clone, PartialEq)]
pub struct OpenPivot {
    pub base_axis: Axis,
    pub base_id: String,
    pub base_name: String,
    pub rep_ids: Vec<String>,
    pub sort_by: SortKey,
    pub order: SortOrder,
    pub top_n: TopN,
    pub period: Period,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadKind {
    /// Page 1 after a cache clear
    Reset,
    /// Next page appended to the cache
    Append,
}

/// Identity of one in-flight fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    pub generation: u64,
    pub axis: Axis,
    pub kind: LoadKind,
    pub seq: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub ticket: Ticket,
    pub query: PivotQuery,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Issue one pivot fetch through the aggregation port
    Fetch(FetchRequest),
    /// Abandon every pending fetch of this generation
    CancelGeneration(u64),
}

#[derive(Debug, Clone)]
pub enum DrawerCommand {
    Open(OpenPivot),
    SetActiveAxis(Axis),
    SetSortBy(SortKey),
    SetOrder(SortOrder),
    SetTopN(TopN),
    LoadMore(Axis),
    /// Re-issue the reset load of the active axis (manual retry)
    Reload,
    Loaded {
        ticket: Ticket,
        result: AppResult<PivotPage>,
    },
    Close,
}

/// What a command did
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Unchanged,
    FetchIssued(Ticket),
    Applied {
        axis: Axis,
        rows: usize,
        has_more: bool,
    },
    Discarded(Ticket),
    Failed {
        axis: Axis,
        error: AppError,
    },
    Closed,
}

// ============================================================================
// State
// ============================================================================

/// An open drill-down drawer and its per-axis caches
#[derive(Debug, Clone, PartialEq)]
pub struct OpenDrawer {
    pub base_axis: Axis,
    pub base_id: String,
    pub base_name: String,
    pub rep_ids: Vec<String>,
    /// The two non-base axes with their labels, in precedence order
    pub targets: [(Axis, &'static str); 2],
    pub active_axis: Axis,
    pub sort_by: SortKey,
    pub order: SortOrder,
    pub top_n: TopN,
    pub period: Period,
    pivot_data: BTreeMap<Axis, Vec<MetricEntry>>,
    pivot_cursor: BTreeMap<Axis, Option<String>>,
    in_flight: BTreeMap<Axis, Ticket>,
    errors: BTreeMap<Axis, AppError>,
}

impl OpenDrawer {
    fn new(open: OpenPivot) -> Self {
        let [first, second] = open.base_axis.targets();
        Self {
            base_axis: open.base_axis,
            base_id: open.base_id,
            base_name: open.base_name,
            rep_ids: open.rep_ids,
            targets: [(first, first.label()), (second, second.label())],
            active_axis: first,
            sort_by: open.sort_by,
            order: open.order,
            top_n: open.top_n,
            period: open.period,
            pivot_data: BTreeMap::new(),
            pivot_cursor: BTreeMap::new(),
            in_flight: BTreeMap::new(),
            errors: BTreeMap::new(),
        }
    }

    /// Cached rows of `axis` (empty when never loaded)
    pub fn rows(&self, axis: Axis) -> &[MetricEntry] {
        self.pivot_data.get(&axis).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Cursor of the next page of `axis`, if any
    pub fn cursor(&self, axis: Axis) -> Option<&str> {
        self.pivot_cursor.get(&axis).and_then(|c| c.as_deref())
    }

    pub fn is_loading(&self, axis: Axis) -> bool {
        self.in_flight.contains_key(&axis)
    }

    pub fn in_flight(&self, axis: Axis) -> Option<Ticket> {
        self.in_flight.get(&axis).copied()
    }

    /// Last port failure of `axis`, cleared by the next successful load
    pub fn error(&self, axis: Axis) -> Option<&AppError> {
        self.errors.get(&axis)
    }

    /// Whether "load more" is currently offered for `axis`
    pub fn can_load_more(&self, axis: Axis) -> bool {
        self.top_n.is_all() && self.cursor(axis).is_some() && !self.is_loading(axis)
    }

    fn is_target(&self, axis: Axis) -> bool {
        self.targets.iter().any(|(a, _)| *a == axis)
    }

    fn query(&self, axis: Axis, cursor: Option<String>) -> PivotQuery {
        PivotQuery {
            period: self.period,
            base_axis: self.base_axis,
            base_id: self.base_id.clone(),
            target_axis: axis,
            rep_ids: self.rep_ids.clone(),
            filter_ids: Vec::new(),
            sort_by: self.sort_by,
            order: self.order,
            top_n: self.top_n,
            cursor,
        }
    }

    fn clear_caches(&mut self) {
        self.pivot_data.clear();
        self.pivot_cursor.clear();
        self.in_flight.clear();
        self.errors.clear();
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum DrawerState {
    #[default]
    Closed,
    Open(Box<OpenDrawer>),
}

impl DrawerState {
    pub fn is_open(&self) -> bool {
        matches!(self, DrawerState::Open(_))
    }

    pub fn as_open(&self) -> Option<&OpenDrawer> {
        match self {
            DrawerState::Open(open) => Some(open),
            DrawerState::Closed => None,
        }
    }
}

/// Drawer state plus the counters that must outlive any single open
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Drawer {
    state: DrawerState,
    generation: u64,
    seq: u64,
}

/// Result of one reduction
#[derive(Debug, Clone)]
pub struct Transition {
    pub drawer: Drawer,
    pub effects: Vec<Effect>,
    pub outcome: Outcome,
}

impl Drawer {
    pub fn state(&self) -> &DrawerState {
        &self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn reduce(&self, command: DrawerCommand) -> AppResult<Transition> {
        let mut next = self.clone();
        let mut effects = Vec::new();

        let outcome = match command {
            DrawerCommand::Open(open) => {
                if open.base_id.is_empty() {
                    return Err(AppError::with_message(
                        ErrorCode::RequiredField,
                        "Drill-down requires a base entity id",
                    ));
                }
                tracing::info!(
                    base_axis = %open.base_axis,
                    base_id = %open.base_id,
                    top_n = %open.top_n,
                    "[Drawer] Open"
                );
                next.state = DrawerState::Open(Box::new(OpenDrawer::new(open)));
                next.reset_load(&mut effects)
            }

            DrawerCommand::SetActiveAxis(axis) => {
                let open = next.open_mut()?;
                if axis == open.base_axis {
                    return Err(AppError::new(ErrorCode::TargetAxisIsBase)
                        .with_detail("axis", axis.as_str()));
                }
                if !open.is_target(axis) || open.active_axis == axis {
                    return Ok(self.unchanged());
                }
                open.active_axis = axis;
                next.reset_load(&mut effects)
            }

            DrawerCommand::SetSortBy(sort_by) => {
                let open = next.open_mut()?;
                if open.sort_by == sort_by {
                    return Ok(self.unchanged());
                }
                open.sort_by = sort_by;
                next.reset_load(&mut effects)
            }

            DrawerCommand::SetOrder(order) => {
                let open = next.open_mut()?;
                if open.order == order {
                    return Ok(self.unchanged());
                }
                open.order = order;
                next.reset_load(&mut effects)
            }

            DrawerCommand::SetTopN(top_n) => {
                let open = next.open_mut()?;
                if open.top_n == top_n {
                    return Ok(self.unchanged());
                }
                open.top_n = top_n;
                next.reset_load(&mut effects)
            }

            DrawerCommand::Reload => {
                next.open_mut()?;
                next.reset_load(&mut effects)
            }

            DrawerCommand::LoadMore(axis) => next.load_more(axis, &mut effects)?,

            DrawerCommand::Loaded { ticket, result } => next.complete(ticket, result),

            DrawerCommand::Close => match next.state {
                DrawerState::Closed => return Ok(self.unchanged()),
                DrawerState::Open(_) => {
                    effects.push(Effect::CancelGeneration(next.generation));
                    next.generation += 1;
                    next.state = DrawerState::Closed;
                    tracing::info!(generation = next.generation, "[Drawer] Closed");
                    Outcome::Closed
                }
            },
        };

        Ok(Transition {
            drawer: next,
            effects,
            outcome,
        })
    }

    fn unchanged(&self) -> Transition {
        Transition {
            drawer: self.clone(),
            effects: Vec::new(),
            outcome: Outcome::Unchanged,
        }
    }

    fn open_mut(&mut self) -> AppResult<&mut OpenDrawer> {
        match &mut self.state {
            DrawerState::Open(open) => Ok(open),
            DrawerState::Closed => Err(AppError::drawer_closed()),
        }
    }

    fn next_ticket(&mut self, axis: Axis, kind: LoadKind) -> Ticket {
        self.seq += 1;
        Ticket {
            generation: self.generation,
            axis,
            kind,
            seq: self.seq,
        }
    }

    /// Clear every axis, start a new generation, fetch page 1 of the active axis
    fn reset_load(&mut self, effects: &mut Vec<Effect>) -> Outcome {
        effects.push(Effect::CancelGeneration(self.generation));
        self.generation += 1;

        let axis = match &self.state {
            DrawerState::Open(open) => open.active_axis,
            DrawerState::Closed => return Outcome::Unchanged,
        };
        let ticket = self.next_ticket(axis, LoadKind::Reset);
        let generation = self.generation;

        let DrawerState::Open(open) = &mut self.state else {
            return Outcome::Unchanged;
        };
        open.clear_caches();
        open.in_flight.insert(axis, ticket);
        effects.push(Effect::Fetch(FetchRequest {
            ticket,
            query: open.query(axis, None),
        }));

        tracing::debug!(
            generation,
            axis = %axis,
            sort_by = %open.sort_by,
            order = open.order.as_str(),
            top_n = %open.top_n,
            "[Drawer] Reset load"
        );
        Outcome::FetchIssued(ticket)
    }

    fn load_more(&mut self, axis: Axis, effects: &mut Vec<Effect>) -> AppResult<Outcome> {
        let generation = self.generation;
        let seq = self.seq + 1;
        let open = self.open_mut()?;

        if axis == open.base_axis {
            return Err(
                AppError::new(ErrorCode::TargetAxisIsBase).with_detail("axis", axis.as_str())
            );
        }
        if !open.top_n.is_all() {
            return Err(AppError::with_message(
                ErrorCode::LoadMoreUnavailable,
                format!("Load more requires top-N \"all\", current is {}", open.top_n),
            ));
        }
        if open.is_loading(axis) || open.in_flight.values().any(|t| t.kind == LoadKind::Append) {
            return Err(AppError::new(ErrorCode::LoadInFlight).with_detail("axis", axis.as_str()));
        }
        let Some(cursor) = open.cursor(axis).map(str::to_string) else {
            return Err(
                AppError::new(ErrorCode::LoadMoreUnavailable).with_detail("axis", axis.as_str())
            );
        };

        let ticket = Ticket {
            generation,
            axis,
            kind: LoadKind::Append,
            seq,
        };
        open.in_flight.insert(axis, ticket);
        effects.push(Effect::Fetch(FetchRequest {
            ticket,
            query: open.query(axis, Some(cursor.clone())),
        }));
        self.seq = seq;

        tracing::debug!(generation, axis = %axis, cursor = %cursor, "[Drawer] Load more");
        Ok(Outcome::FetchIssued(ticket))
    }

    fn complete(&mut self, ticket: Ticket, result: AppResult<PivotPage>) -> Outcome {
        let current = self.generation;
        let DrawerState::Open(open) = &mut self.state else {
            tracing::warn!(?ticket, "[Drawer] Response after close discarded");
            return Outcome::Discarded(ticket);
        };
        if ticket.generation != current || open.in_flight.get(&ticket.axis) != Some(&ticket) {
            tracing::warn!(
                ?ticket,
                current_generation = current,
                "[Drawer] Stale response discarded"
            );
            return Outcome::Discarded(ticket);
        }
        open.in_flight.remove(&ticket.axis);

        match result {
            Ok(page) => {
                let has_more = page.next_cursor.is_some();
                let rows = page.rows.len();
                let cache = open.pivot_data.entry(ticket.axis).or_default();
                match ticket.kind {
                    LoadKind::Reset => *cache = page.rows,
                    LoadKind::Append => cache.extend(page.rows),
                }
                open.pivot_cursor.insert(ticket.axis, page.next_cursor);
                open.errors.remove(&ticket.axis);
                Outcome::Applied {
                    axis: ticket.axis,
                    rows,
                    has_more,
                }
            }
            Err(error) => {
                tracing::error!(
                    axis = %ticket.axis,
                    code = %error.code,
                    error = %error,
                    "[Drawer] Pivot fetch failed"
                );
                open.errors.insert(ticket.axis, error.clone());
                Outcome::Failed {
                    axis: ticket.axis,
                    error,
                }
            }
        }
    }
}
