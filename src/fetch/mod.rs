// src/fetch/mod.rs
// =============================================================================
// The data-fetching core.
//
// A FetchController owns exactly one FetchState. A view creates one
// controller per piece of data it needs (commits, languages, ...), triggers
// fetch_data() when it wants the data, and re-renders whenever the state
// changes. Controllers never share state or talk to each other.
//
// Submodules:
// - state: FetchStatus / FetchState and the shape guards on data
// - request: the per-call input (endpoint + optional body)
// - controller: the request lifecycle itself
// - context: the process-wide handle views build controllers from
// =============================================================================

mod context;
mod controller;
mod request;
mod state;

pub use context::FetchContext;
pub use controller::{FetchController, Sequencing};
pub use request::FetchRequest;
pub use state::{FetchState, FetchStatus};
