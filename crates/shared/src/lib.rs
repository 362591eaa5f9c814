pub mod api;

pub mod model;

pub mod utils;
#[cfg(feature = "backend")]
pub use utils::env::*;
#[cfg(any(feature = "backend", feature = "wasm"))]
pub use utils::tracing::*;
