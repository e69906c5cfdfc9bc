//! Presentation-side state for the weather forecast dashboard.
//!
//! Nothing here draws anything. The crate turns day summaries into the
//! structures a renderer needs: the user's selection ([`state`]), chart
//! rows and axis descriptors ([`chart`]), day cards ([`cards`]) and the
//! condition/icon shown on them ([`condition`]).

pub mod cards;
pub mod chart;
pub mod condition;
pub mod state;

pub use state::DashboardState;
