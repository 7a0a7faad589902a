//! Request routing: classification, locale resolution, and the gate
//! middleware that ties them to authentication state.

mod classify;
mod gate;
mod locale;

pub use classify::{RouteConfig, RouteKind};
pub use gate::{GateState, routing_gate};
pub use locale::{LocaleConfig, Resolved};
