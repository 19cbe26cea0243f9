use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use anyhow::Result;
use log::{debug, error, info, warn};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::net::tcp::WriteHalf;
use crate::registry::Registry;

/// Static file service. Every accepted connection registers the peer
/// before the request is handled.
pub async fn http(listener: TcpListener, registry: Arc<Registry>, root: PathBuf) {
    match serve(listener, registry, root).await {
        Ok(()) => debug!("http service finished"),
        Err(e) => error!("http service failed: {}", e),
    }
}

async fn serve(listener: TcpListener, registry: Arc<Registry>, root: PathBuf) -> Result<()> {
    loop {
        let (sock, peer) = listener.accept().await?;

        info!("peer {} connected via HTTP", peer.ip());
        registry.add(peer.ip());

        let root = root.clone();
        tokio::spawn(async move {
            match handle(sock, root).await {
                Ok(()) => debug!("http connection {} finished", peer),
                Err(e) => warn!("http connection {} error: {}", peer, e),
            }
        });
    }
}

async fn handle(mut sock: TcpStream, root: PathBuf) -> Result<()> {
    let (read, mut write) = sock.split();
    let mut lines = BufReader::new(read).lines();

    let request = match lines.next_line().await? {
        Some(line) => line,
        None       => return Ok(()),
    };

    while let Some(line) = lines.next_line().await? {
        if line.is_empty() {
            break;
        }
    }

    let mut parts = request.split_whitespace();
    let (method, target) = match (parts.next(), parts.next()) {
        (Some(m), Some(t)) => (m, t),
        _                  => return respond(&mut write, "400 Bad Request", b"bad request\n").await,
    };

    if method != "GET" {
        return respond(&mut write, "501 Not Implemented", b"only GET is supported\n").await;
    }

    let path = match resolve(&root, target) {
        Some(path) => path,
        None       => return respond(&mut write, "404 Not Found", b"not found\n").await,
    };

    match tokio::fs::metadata(&path).await {
        Ok(meta) if meta.is_dir() => {
            let body = listing(&path).await?;
            respond(&mut write, "200 OK", body.as_bytes()).await
        }
        Ok(_) => {
            let body = tokio::fs::read(&path).await?;
            respond(&mut write, "200 OK", &body).await
        }
        Err(_) => respond(&mut write, "404 Not Found", b"not found\n").await,
    }
}

fn resolve(root: &Path, target: &str) -> Option<PathBuf> {
    let target = match target.find('?') {
        Some(n) => &target[..n],
        None    => target,
    };

    let relative = Path::new(target.trim_start_matches('/'));

    match relative.components().all(|c| matches!(c, Component::Normal(_) | Component::CurDir)) {
        true  => Some(root.join(relative)),
        false => None,
    }
}

async fn listing(path: &Path) -> Result<String> {
    let mut body = String::from("<html><body><ul>\n");
    let mut dir  = tokio::fs::read_dir(path).await?;

    while let Some(entry) = dir.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        body.push_str(&format!("<li><a href=\"{0}\">{0}</a></li>\n", name));
    }

    body.push_str("</ul></body></html>\n");

    Ok(body)
}

async fn respond(write: &mut WriteHalf<'_>, status: &str, body: &[u8]) -> Result<()> {
    let head = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        body.len(),
    );

    write.write_all(head.as_bytes()).await?;
    write.write_all(body).await?;
    write.flush().await?;

    Ok(())
}
