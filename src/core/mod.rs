mod errors;
pub mod polling;
pub mod product;
pub mod schedule;

pub use errors::{ScraperError, ScraperResult};
pub use polling::{FetchAttempt, FetchOutcome, Poller};
pub use product::{ImageFormat, Product};
pub use schedule::ObservationSchedule;
