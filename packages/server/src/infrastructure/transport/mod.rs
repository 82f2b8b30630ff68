//! Transport adapters: one `TransportAdapter` implementation per transport kind.
//!
//! Each adapter only enqueues an encoded frame onto its connection's outbound
//! queue. The queue is drained by a writer owned by the UI layer, so a slow
//! peer never stalls the caller.

pub mod duplex;
pub mod raw;
pub mod stream;

pub use duplex::DuplexAdapter;
pub use raw::RawAdapter;
pub use stream::{StreamAdapter, StreamFrame};
