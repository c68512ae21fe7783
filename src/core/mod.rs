/// Core functionality modules
///
/// Aggregation over stored expenses, the trailing daily window, and the
/// `ExpenseBook` service that front ends drive.

pub mod book;
pub mod clock;
pub mod summary;
pub mod window;

pub use book::{Dashboard, ExpenseBook};
pub use clock::{Clock, FixedClock, SystemClock};
pub use summary::{summarize, Summary};
pub use window::TrailingWindow;
