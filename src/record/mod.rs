pub use record::{Role, TrafficRecord};
pub use sink::{read, RecordLog, HEADER};

mod record;
mod sink;

#[cfg(test)]
mod test;
