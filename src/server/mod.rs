pub mod api;

use crate::llm::ChatProvider;
use log::{ info, warn };
use serde::Serialize;
use std::error::Error;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

#[derive(Serialize)]
struct PortRecord {
    port: u16,
}

pub struct Server {
    port: u16,
    port_file: String,
    provider: Arc<dyn ChatProvider>,
}

impl Server {
    pub fn new(port: u16, port_file: String, provider: Arc<dyn ChatProvider>) -> Self {
        Self {
            port,
            port_file,
            provider,
        }
    }

    pub async fn run(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let listener = bind_with_retry(self.port).await?;
        let bound = listener.local_addr()?.port();
        persist_port(&self.port_file, bound)?;
        info!("Server running on port {}", bound);

        let app = api::router(api::AppState {
            provider: self.provider.clone(),
        });
        axum::serve(listener, app.into_make_service()).await?;
        Ok(())
    }
}

/// Binds the preferred port, walking up one port at a time while the
/// current one is occupied. An explicit loop, unbounded until the port
/// space runs out; any error other than AddrInUse is fatal.
pub async fn bind_with_retry(preferred: u16) -> io::Result<TcpListener> {
    let mut port = preferred;
    loop {
        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        match TcpListener::bind(addr).await {
            Ok(listener) => {
                if port != preferred {
                    info!("Preferred port {} was busy, bound {} instead", preferred, port);
                }
                return Ok(listener);
            }
            Err(e) if e.kind() == io::ErrorKind::AddrInUse => {
                warn!("Port {} in use, trying {}", port, port + 1);
                port = port.checked_add(1).ok_or_else(|| {
                    io::Error::new(io::ErrorKind::AddrInUse, "no free port below 65536")
                })?;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Records the bound port as a small JSON object so co-located tooling can
/// discover which port the relay actually took.
pub fn persist_port(path: &str, port: u16) -> io::Result<()> {
    let record = serde_json::to_string(&PortRecord { port })?;
    std::fs::write(path, record)
}
