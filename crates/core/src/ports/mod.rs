//! Port interfaces for the dispatch pipeline
//!
//! Everything impure the dispatcher touches sits behind one of these traits:
//! the network, the response cache, the shared rate counters, time and
//! logging. Production adapters live in the infra crate.

pub mod clock;
pub mod events;
pub mod store;
pub mod transport;

pub use clock::{Clock, MockClock, SystemClock};
pub use events::{DispatchEvent, EventSink, NoopEventSink};
pub use store::{CacheStore, CounterOutcome, CounterStore};
pub use transport::{FileUpload, HttpTransport, TransportFailure, TransportResponse};
