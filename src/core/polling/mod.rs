mod poller;

pub use poller::{FetchAttempt, FetchOutcome, Poller};
