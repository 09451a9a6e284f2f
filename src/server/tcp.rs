//! # Servidor TCP Concurrente
//! src/server/tcp.rs
//!
//! Acepta conexiones y despacha cada una a su propio thread. El único
//! estado compartido es el `DocumentRoot` (solo lectura) más las banderas
//! atómicas de apagado y el contador de conexiones activas.

use crate::config::Config;
use crate::resolver::DocumentRoot;
use crate::server::connection::handle_connection;
use log::{debug, error, info, warn};
use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Servidor HTTP/1.1 de archivos estáticos, un thread por conexión
pub struct Server {
    config: Config,
    root: Arc<DocumentRoot>,
    listener: TcpListener,
    local_addr: SocketAddr,
    shutdown: Arc<AtomicBool>,
    active: Arc<AtomicUsize>,
}

/// Permite detener un `Server` desde otro thread
///
/// Deja de aceptar conexiones nuevas; los handlers ya despachados
/// terminan por su cuenta.
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    flag: Arc<AtomicBool>,
    wake_addr: SocketAddr,
}

impl ShutdownHandle {
    pub fn shutdown(&self) {
        if self.flag.swap(true, Ordering::SeqCst) {
            return;
        }
        // Despierta el accept() bloqueado con una conexión vacía
        if let Err(e) = TcpStream::connect_timeout(&self.wake_addr, Duration::from_secs(1)) {
            debug!("wake-up connection failed: {}", e);
        }
    }

    pub fn is_shutdown(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

impl Server {
    /// Valida la configuración, canonicaliza el document root y hace bind
    ///
    /// # Errores
    ///
    /// Configuración inválida, document root inexistente o puerto ocupado.
    pub fn bind(config: Config) -> io::Result<Self> {
        config
            .validate()
            .map_err(|msg| io::Error::new(io::ErrorKind::InvalidInput, msg))?;

        let root = DocumentRoot::new(&config.document_root)?;
        let listener = TcpListener::bind(config.address())?;
        let local_addr = listener.local_addr()?;

        Ok(Self {
            config,
            root: Arc::new(root),
            listener,
            local_addr,
            shutdown: Arc::new(AtomicBool::new(false)),
            active: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// Dirección real del listener (útil con puerto 0)
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            flag: Arc::clone(&self.shutdown),
            wake_addr: wake_address(self.local_addr),
        }
    }

    /// Conexiones que todavía están siendo atendidas
    pub fn active_connections(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    /// Loop de accept: bloquea hasta que se pida el apagado
    pub fn run(&self) -> io::Result<()> {
        info!("listening on {}", self.local_addr);
        info!("serving files from {}", self.root.path().display());
        info!("concurrency: one thread per connection");

        let timeout = self.config.timeout();
        let mut next_id: u64 = 0;

        for stream in self.listener.incoming() {
            if self.shutdown.load(Ordering::SeqCst) {
                break;
            }

            let stream = match stream {
                Ok(stream) => stream,
                Err(e) => {
                    error!("failed to accept connection: {}", e);
                    continue;
                }
            };

            if let Err(e) = configure(&stream, timeout) {
                warn!("could not set socket timeouts: {}", e);
            }

            next_id += 1;
            self.dispatch(stream, next_id, timeout);
        }

        info!("no longer accepting connections, draining");
        self.drain(timeout);
        Ok(())
    }

    fn dispatch(&self, stream: TcpStream, id: u64, timeout: Duration) {
        let root = Arc::clone(&self.root);
        let active = Arc::clone(&self.active);
        active.fetch_add(1, Ordering::SeqCst);

        let spawned = thread::Builder::new()
            .name(format!("conn-{}", id))
            .spawn(move || {
                let _guard = ActiveGuard(active);
                if let Err(e) = handle_connection(stream, &root, timeout) {
                    error!("connection {} failed: {}", id, e);
                }
            });

        if let Err(e) = spawned {
            self.active.fetch_sub(1, Ordering::SeqCst);
            error!("could not spawn thread for connection {}: {}", id, e);
        }
    }

    /// Espera a los handlers en vuelo, como mucho `grace`
    fn drain(&self, grace: Duration) {
        let deadline = Instant::now() + grace;
        while self.active_connections() > 0 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(10));
        }
        let remaining = self.active_connections();
        if remaining > 0 {
            warn!("{} connection(s) still running after shutdown grace period", remaining);
        } else {
            info!("server stopped");
        }
    }
}

/// Decrementa el contador de activos aunque el handler haga panic
struct ActiveGuard(Arc<AtomicUsize>);

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

fn configure(stream: &TcpStream, timeout: Duration) -> io::Result<()> {
    stream.set_read_timeout(Some(timeout))?;
    stream.set_write_timeout(Some(timeout))?;
    Ok(())
}

/// 0.0.0.0 / :: no sirven como destino; se usa loopback
fn wake_address(addr: SocketAddr) -> SocketAddr {
    match addr.ip() {
        IpAddr::V4(ip) if ip.is_unspecified() => {
            SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), addr.port())
        }
        IpAddr::V6(ip) if ip.is_unspecified() => {
            SocketAddr::new(IpAddr::V6(Ipv6Addr::LOCALHOST), addr.port())
        }
        _ => addr,
    }
}
