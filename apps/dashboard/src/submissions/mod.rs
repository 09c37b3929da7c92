// Record Store: candidate submissions persisted as one JSON document.
// Every operation is load-all / mutate / write-all; there is no writer lock.

pub mod handlers;
pub mod store;

pub use store::{CandidateStore, JsonFileStore, StoreError};
