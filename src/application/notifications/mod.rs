mod errors;
mod summarizer;

pub use errors::{NotificationError, Result};
pub use summarizer::{OverdueNotice, due_soon, overdue, total_fine_owed};
