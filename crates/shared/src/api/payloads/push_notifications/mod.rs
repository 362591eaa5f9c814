mod notification;
pub use notification::*;

mod subscription;
pub use subscription::*;

mod vapid;
pub use vapid::*;
