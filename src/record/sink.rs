use std::fs::File;
use std::path::Path;
use anyhow::Result;
use csv::{Reader, Writer, WriterBuilder};
use log::info;
use super::TrafficRecord;

pub const HEADER: [&str; 6] = [
    "data_hora",
    "ip",
    "protocolo",
    "bytes_enviados",
    "bytes_recebidos",
    "tipo",
];

/// Append-only CSV sink for traffic records. Created once at startup,
/// truncating any prior content; every window appends one batch of rows
/// and flushes.
pub struct RecordLog {
    writer:    Writer<File>,
    iteration: u64,
}

impl RecordLog {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut writer = WriterBuilder::new().has_headers(false).from_path(path)?;
        writer.write_record(&HEADER)?;
        writer.flush()?;

        Ok(Self {
            writer:    writer,
            iteration: 1,
        })
    }

    /// Returns the iteration number assigned to this batch. With several
    /// interfaces capturing concurrently the counter tracks appended
    /// batches, so the record count is logged alongside it.
    pub fn append(&mut self, records: Vec<TrafficRecord>) -> Result<u64> {
        for record in &records {
            self.writer.serialize(record)?;
        }
        self.writer.flush()?;

        let iteration = self.iteration;
        info!("iteration {} complete, {} records", iteration, records.len());
        self.iteration += 1;

        Ok(iteration)
    }
}

/// Parse a record log back into rows. Used by the tests; the dashboard
/// reads the same file on its own schedule.
pub fn read<P: AsRef<Path>>(path: P) -> Result<Vec<TrafficRecord>> {
    let mut reader  = Reader::from_path(path)?;
    let mut records = Vec::new();

    for row in reader.deserialize() {
        records.push(row?);
    }

    Ok(records)
}
