pub mod decode;
pub mod flow;
pub mod queue;
pub mod service;
pub mod timer;

pub use config::{capture, Config};
pub use decode::decode;
pub use flow::{Counters, Key, Segment};
pub use queue::Queue;
pub use service::Service;
pub use source::Sources;

mod config;
mod source;
