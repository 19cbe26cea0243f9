use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use anyhow::Result;
use clap::{App, load_yaml, value_t, values_t};
use crossbeam_channel::bounded;
use env_logger::Builder;
use jemallocator::Jemalloc;
use log::info;
use log::LevelFilter::*;
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook::flag::register;
use tokio::net::TcpListener;
use tokio::runtime::Runtime;
use netlog::args::opt;
use netlog::capture::{self, Sources};
use netlog::host;
use netlog::record::RecordLog;
use netlog::registry::Registry;
use netlog::serve;

#[global_allocator]
static ALLOC: Jemalloc = Jemalloc;

fn main() -> Result<()> {
    let yaml = load_yaml!("args.yml");
    let ver  = env!("CARGO_PKG_VERSION");
    let args = App::from_yaml(&yaml).version(ver).get_matches();

    let http_port = value_t!(args, "http-port", u16)?;
    let ftp_port  = value_t!(args, "ftp-port",  u16)?;
    let interval  = value_t!(args, "interval",  u64)?;
    let output    = value_t!(args, "output",    String)?;
    let root      = value_t!(args, "root",      PathBuf)?;
    let forbidden = values_t!(args, "forbid",   u16)?.into_iter().collect();
    let device    = opt::<String>(args.value_of("device"))?;

    let (module, level) = match args.occurrences_of("verbose") {
        0 => (Some(module_path!()), Info),
        1 => (Some(module_path!()), Debug),
        2 => (Some(module_path!()), Trace),
        _ => (None,                 Trace),
    };
    Builder::from_default_env().filter(module, level).init();

    info!("initializing netlog {}", ver);

    let shutdown = Arc::new(AtomicBool::new(false));
    register(SIGTERM, shutdown.clone())?;
    register(SIGINT,  shutdown.clone())?;

    let local = host::resolve()?;
    info!("use {}:{} to reach the HTTP service", local, http_port);
    info!("use {}:{} to reach the FTP service",  local, ftp_port);

    let registry = Arc::new(Registry::new());
    registry.add(local);

    let cfg = capture::Config {
        http_port:   http_port,
        ftp_port:    ftp_port,
        forbidden:   forbidden,
        interval:    Duration::from_secs(interval),
        buffer_size: 10_000_000,
        snaplen:     128,
        promisc:     true,
    };

    let rt = Runtime::new()?;

    let http = rt.block_on(TcpListener::bind(("0.0.0.0", http_port)))?;
    let ftp  = rt.block_on(TcpListener::bind(("0.0.0.0", ftp_port)))?;

    rt.spawn(serve::http(http, registry.clone(), root.clone()));
    rt.spawn(serve::ftp(ftp,  registry.clone(), root));

    let mut log = RecordLog::create(&output)?;

    let (tx, rx) = bounded(1_000);
    let sources  = Sources::new(cfg, registry, local, tx);
    let workers  = sources.start(device, shutdown.clone())?;

    let timeout = Duration::from_millis(100);

    while !shutdown.load(Ordering::Acquire) {
        if let Ok(records) = rx.recv_timeout(timeout) {
            log.append(records)?;
        }
    }

    // let the capture tasks flush their open windows, then drain
    // whatever they left in the channel
    for worker in workers {
        let _ = worker.join();
    }

    while let Ok(records) = rx.try_recv() {
        log.append(records)?;
    }

    drop(rt);

    Ok(())
}
