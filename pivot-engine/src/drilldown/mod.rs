//! Drill-down state machine
//!
//! - `state`: the pure reducer (`Drawer::reduce`) and its command/effect types
//! - `session`: `DrillDownSession`, which executes effects against an
//!   [`AggregationPort`](crate::port::AggregationPort)

mod session;
mod state;

pub use session::DrillDownSession;
pub use state::{
    Drawer, DrawerCommand, DrawerState, Effect, FetchRequest, LoadKind, OpenDrawer, OpenPivot,
    Outcome, Ticket, Transition,
};
