mod agent;
pub use agent::*;

mod config;
pub use config::*;

mod error;
pub use error::*;

mod platform;
pub use platform::*;

mod push_message;
pub use push_message::*;

#[cfg(test)]
mod memory_platform;

#[cfg(target_arch = "wasm32")]
mod wasm;
#[cfg(target_arch = "wasm32")]
pub use wasm::*;
