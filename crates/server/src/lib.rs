pub mod cli;

mod errors;
pub use errors::*;

mod state;
pub use state::*;

pub mod push;

pub mod routes;

mod app;
pub use app::*;
