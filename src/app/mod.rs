//! Application wiring shared with the view layer

pub mod state;

pub use state::AppState;
