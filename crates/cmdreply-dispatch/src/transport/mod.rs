//! Transport seam.
//!
//! `contract` defines what the dispatch path needs from a transport;
//! `dry_run` is an in-process implementation that records instead of sending.

pub mod contract;
pub mod dry_run;

pub use contract::{
    Route, SubmitOptions, SubmitRequest, Transport, TransportError, TransportResponse,
};
pub use dry_run::{DryRunTransport, RecordedRequest};
