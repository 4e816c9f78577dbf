pub mod reconciliation;
pub mod services;
pub mod time;
pub mod tracker;
pub mod utils;
pub mod validation;

pub use time::{Clock, FixedClock, SystemClock};
pub use tracker::{FinanceTracker, SyncPolicy};
