use std::fs;
use std::path::PathBuf;
use crate::capture::{Counters, Key, Service};
use super::{read, RecordLog, Role, TrafficRecord, HEADER};

fn scratch(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("netlog-{}-{}.csv", name, std::process::id()))
}

fn record(address: &str, service: Service, sent: u64, received: u64) -> TrafficRecord {
    let key   = Key(address.parse().unwrap(), service);
    let count = Counters { sent, received };
    TrafficRecord::new("2026-08-28 12:00:00".to_string(), key, count)
}

#[test]
fn create_writes_the_header() {
    let path = scratch("header");
    RecordLog::create(&path).unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    assert_eq!(contents.lines().next().unwrap(), HEADER.join(","));

    fs::remove_file(&path).unwrap();
}

#[test]
fn create_truncates_prior_content() {
    let path = scratch("truncate");
    fs::write(&path, "stale\nstale\nstale\n").unwrap();

    RecordLog::create(&path).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 1);

    fs::remove_file(&path).unwrap();
}

#[test]
fn append_round_trips() {
    let path = scratch("roundtrip");
    let mut log = RecordLog::create(&path).unwrap();

    let records = vec![
        record("10.0.0.1", Service::Http, 100, 0),
        record("10.0.0.2", Service::Http, 0, 100),
        record("10.0.0.3", Service::Ftp, 40, 12),
        record("10.0.0.4", Service::Other, 0, 7),
    ];
    log.append(records.clone()).unwrap();

    let parsed = read(&path).unwrap();
    assert_eq!(parsed, records);
    assert_eq!(parsed[0].role, Role::Sender);
    assert_eq!(parsed[1].role, Role::Receiver);

    fs::remove_file(&path).unwrap();
}

#[test]
fn appends_accumulate_across_windows() {
    let path = scratch("windows");
    let mut log = RecordLog::create(&path).unwrap();

    // empty batches still advance the iteration counter
    assert_eq!(log.append(vec![record("10.0.0.1", Service::Http, 10, 0)]).unwrap(), 1);
    assert_eq!(log.append(Vec::new()).unwrap(), 2);
    assert_eq!(log.append(vec![record("10.0.0.1", Service::Http, 20, 0)]).unwrap(), 3);

    let parsed = read(&path).unwrap();
    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed[0].sent, 10);
    assert_eq!(parsed[1].sent, 20);

    fs::remove_file(&path).unwrap();
}
