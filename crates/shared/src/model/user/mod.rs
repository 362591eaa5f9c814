mod id;
pub use id::*;

mod push_subscription;
pub use push_subscription::*;
