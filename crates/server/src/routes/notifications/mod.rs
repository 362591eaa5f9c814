mod save_subscription;
pub use save_subscription::*;

mod remove_subscription;
pub use remove_subscription::*;

mod send_notification;
pub use send_notification::*;

mod vapid;
pub use vapid::*;
