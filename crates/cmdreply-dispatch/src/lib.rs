//! cmdreply dispatch library entry.
//!
//! Wires reply state from `cmdreply-core` to a transport: submission,
//! continuation handles, completion routing, config, and metrics. It is
//! consumed by the binary (`main.rs`) and by integration tests.

pub mod config;
pub mod dispatch;
pub mod interaction;
pub mod obs;
pub mod reply_file;
pub mod transport;
