mod cascade;
mod controller;
mod scope;

pub use cascade::{CascadeState, ChildPhase, FilterCascade};
pub use controller::{FetchPlan, FetchTicket, Fetched, ListController};
pub use scope::{matches_search, ListScope};
