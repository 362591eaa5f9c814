#[cfg(feature = "backend")]
pub mod env;

#[cfg(any(feature = "backend", feature = "wasm"))]
pub mod tracing;
