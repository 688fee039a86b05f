//! Services module
//!
//! View composition and notification fan-out used by the workflow

pub mod notification;
pub mod view;

// Re-export commonly used services
pub use notification::{BroadcastReport, NotificationService};
pub use view::{ProfileCard, TranscriptEntry};
