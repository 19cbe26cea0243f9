use std::net::IpAddr;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use anyhow::Result;
use log::{debug, error, info, warn};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::net::tcp::WriteHalf;
use crate::registry::Registry;

/// Anonymous FTP service scoped to the configured root directory. Every
/// accepted session registers the peer before any command is read.
pub async fn ftp(listener: TcpListener, registry: Arc<Registry>, root: PathBuf) {
    match serve(listener, registry, root).await {
        Ok(()) => debug!("ftp service finished"),
        Err(e) => error!("ftp service failed: {}", e),
    }
}

async fn serve(listener: TcpListener, registry: Arc<Registry>, root: PathBuf) -> Result<()> {
    loop {
        let (sock, peer) = listener.accept().await?;

        info!("peer {} connected via FTP", peer.ip());
        registry.add(peer.ip());

        let root = root.clone();
        tokio::spawn(async move {
            match handle(sock, root).await {
                Ok(()) => debug!("ftp session {} finished", peer),
                Err(e) => warn!("ftp session {} error: {}", peer, e),
            }
        });
    }
}

async fn handle(mut sock: TcpStream, root: PathBuf) -> Result<()> {
    let local = sock.local_addr()?;
    let (read, mut write) = sock.split();
    let mut lines = BufReader::new(read).lines();

    reply(&mut write, "220 netlog ftp service ready").await?;

    let mut data: Option<TcpListener> = None;
    let mut cwd = PathBuf::new();

    while let Some(line) = lines.next_line().await? {
        let mut parts = line.splitn(2, ' ');
        let command   = parts.next().unwrap_or("").to_ascii_uppercase();
        let argument  = parts.next().unwrap_or("").trim();

        match command.as_str() {
            "USER" => reply(&mut write, "331 anonymous access allowed, send any password").await?,
            "PASS" => reply(&mut write, "230 login successful").await?,
            "SYST" => reply(&mut write, "215 UNIX Type: L8").await?,
            "FEAT" => reply(&mut write, "211 end").await?,
            "NOOP" => reply(&mut write, "200 ok").await?,
            "TYPE" => reply(&mut write, "200 type accepted").await?,
            "PWD"  => {
                let line = format!("257 \"/{}\"", cwd.display());
                reply(&mut write, &line).await?;
            }
            "CWD"  => match resolve(&cwd, argument) {
                Some(next) => match tokio::fs::metadata(root.join(&next)).await {
                    Ok(meta) if meta.is_dir() => {
                        cwd = next;
                        reply(&mut write, "250 directory changed").await?;
                    }
                    _ => reply(&mut write, "550 no such directory").await?,
                },
                None => reply(&mut write, "550 no such directory").await?,
            },
            "PASV" => match passive(local.ip()).await {
                Ok((listener, line)) => {
                    data = Some(listener);
                    reply(&mut write, &line).await?;
                }
                Err(e) => {
                    warn!("ftp passive listener failed: {}", e);
                    reply(&mut write, "425 cannot open passive connection").await?;
                }
            },
            "LIST" => match data.take() {
                Some(listener) => {
                    reply(&mut write, "150 here comes the directory listing").await?;
                    let (mut conn, _) = listener.accept().await?;

                    let mut dir = tokio::fs::read_dir(root.join(&cwd)).await?;
                    while let Some(entry) = dir.next_entry().await? {
                        let name = entry.file_name().to_string_lossy().into_owned();
                        conn.write_all(name.as_bytes()).await?;
                        conn.write_all(b"\r\n").await?;
                    }
                    conn.shutdown().await?;

                    reply(&mut write, "226 directory send ok").await?;
                }
                None => reply(&mut write, "425 use PASV first").await?,
            },
            "RETR" => match data.take() {
                Some(listener) => {
                    let path = resolve(&cwd, argument).map(|p| root.join(p));
                    let body = match path {
                        Some(path) => tokio::fs::read(&path).await.ok(),
                        None       => None,
                    };

                    match body {
                        Some(body) => {
                            reply(&mut write, "150 opening data connection").await?;
                            let (mut conn, _) = listener.accept().await?;
                            conn.write_all(&body).await?;
                            conn.shutdown().await?;
                            reply(&mut write, "226 transfer complete").await?;
                        }
                        None => reply(&mut write, "550 file not found").await?,
                    }
                }
                None => reply(&mut write, "425 use PASV first").await?,
            },
            "QUIT" => {
                reply(&mut write, "221 goodbye").await?;
                break;
            }
            _ => reply(&mut write, "502 command not implemented").await?,
        }
    }

    Ok(())
}

fn resolve(cwd: &Path, argument: &str) -> Option<PathBuf> {
    let path = match argument.strip_prefix('/') {
        Some(rest) => PathBuf::from(rest),
        None       => cwd.join(argument),
    };

    match path.components().all(|c| matches!(c, Component::Normal(_) | Component::CurDir)) {
        true  => Some(path),
        false => None,
    }
}

async fn passive(ip: IpAddr) -> Result<(TcpListener, String)> {
    let listener = TcpListener::bind((ip, 0)).await?;
    let port     = listener.local_addr()?.port();

    let line = match ip {
        IpAddr::V4(ip) => {
            let [a, b, c, d] = ip.octets();
            format!("227 Entering Passive Mode ({},{},{},{},{},{})", a, b, c, d, port >> 8, port & 0xff)
        }
        IpAddr::V6(_) => {
            format!("229 Extended Passive Mode (|||{}|)", port)
        }
    };

    Ok((listener, line))
}

async fn reply(write: &mut WriteHalf<'_>, line: &str) -> Result<()> {
    write.write_all(line.as_bytes()).await?;
    write.write_all(b"\r\n").await?;
    Ok(())
}
