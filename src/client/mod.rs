//! # Cliente de Carga
//! src/client/mod.rs
//!
//! Cliente HTTP/1.1 mínimo sobre `TcpStream` para ejercitar el servidor:
//! requests individuales y ráfagas concurrentes (un thread por request).
//!
//! ```no_run
//! use redunix_static::client::{make_request, run_concurrent};
//! use std::time::Duration;
//!
//! let response = make_request("localhost:8080", "/", "GET", Duration::from_secs(10)).unwrap();
//! assert_eq!(response.status_code, 200);
//!
//! let report = run_concurrent("localhost:8080", &["/".to_string()], 10, Duration::from_secs(10));
//! println!("{} ok / {} failed", report.successful, report.failed);
//! ```

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::io::{self, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::thread;
use std::time::{Duration, Instant};

pub const USER_AGENT: &str = concat!("RedUnix-LoadTest/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Timeout")]
    Timeout,

    #[error("Connection refused - is the server running?")]
    ConnectionRefused,

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("I/O error: {0}")]
    Io(io::Error),
}

impl From<io::Error> for ClientError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => ClientError::Timeout,
            io::ErrorKind::ConnectionRefused => ClientError::ConnectionRefused,
            _ => ClientError::Io(err),
        }
    }
}

/// Respuesta parseada del lado del cliente
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientResponse {
    pub version: String,
    pub status_code: u16,
    pub status_text: String,
    /// Headers en el orden recibido
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl ClientResponse {
    /// Busca un header (sin distinguir mayúsculas)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Si el cuerpo es texto o JSON (para mostrar un preview)
    pub fn is_textual(&self) -> bool {
        self.header("Content-Type")
            .map(|ct| ct.contains("text") || ct.contains("json"))
            .unwrap_or(false)
    }
}

/// Envía un request y lee la respuesta hasta EOF
pub fn make_request(addr: &str, path: &str, method: &str, timeout: Duration) -> Result<ClientResponse, ClientError> {
    let socket_addr = addr
        .to_socket_addrs()?
        .next()
        .ok_or_else(|| ClientError::Io(io::Error::new(io::ErrorKind::NotFound, "address did not resolve")))?;

    let mut stream = TcpStream::connect_timeout(&socket_addr, timeout)?;
    stream.set_read_timeout(Some(timeout))?;
    stream.set_write_timeout(Some(timeout))?;

    let request = format!(
        "{method} {path} HTTP/1.1\r\nHost: {addr}\r\nUser-Agent: {agent}\r\nAccept: */*\r\nConnection: close\r\n\r\n",
        method = method,
        path = path,
        addr = addr,
        agent = USER_AGENT,
    );
    stream.write_all(request.as_bytes())?;
    stream.flush()?;

    let mut response = Vec::new();
    stream.read_to_end(&mut response)?;

    parse_response(&response)
}

/// Parsea bytes crudos: status line, headers y body
pub fn parse_response(raw: &[u8]) -> Result<ClientResponse, ClientError> {
    let header_end = raw
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .ok_or_else(|| ClientError::MalformedResponse("missing header terminator".to_string()))?;

    let head = String::from_utf8_lossy(&raw[..header_end]);
    let body = raw[header_end + 4..].to_vec();

    let mut lines = head.split("\r\n");
    let status_line = lines.next().unwrap_or("");

    let mut parts = status_line.splitn(3, ' ');
    let version = parts.next().unwrap_or("").to_string();
    let status_code = parts
        .next()
        .and_then(|code| code.parse::<u16>().ok())
        .ok_or_else(|| ClientError::MalformedResponse(format!("invalid status line: {}", status_line)))?;
    let status_text = parts.next().unwrap_or("").to_string();

    let headers = lines
        .filter_map(|line| {
            let (name, value) = line.split_once(':')?;
            Some((name.trim().to_string(), value.trim().to_string()))
        })
        .collect();

    Ok(ClientResponse {
        version,
        status_code,
        status_text,
        headers,
        body,
    })
}

/// Resultado de un request dentro de una ráfaga
#[derive(Debug, Clone, Serialize)]
pub struct Outcome {
    pub index: usize,
    pub path: String,
    pub status_code: Option<u16>,
    pub error: Option<String>,
    pub body_length: usize,
    /// SHA-256 del body en hex, para comparar contenidos entre requests
    pub body_sha256: Option<String>,
    pub latency_ms: f64,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Resumen de una ráfaga concurrente
#[derive(Debug, Clone, Serialize)]
pub struct LoadReport {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub elapsed_secs: f64,
    pub requests_per_sec: f64,
    pub outcomes: Vec<Outcome>,
}

/// Lanza `count` GETs en paralelo; el request `i` va a `paths[i % paths.len()]`
pub fn run_concurrent(addr: &str, paths: &[String], count: usize, timeout: Duration) -> LoadReport {
    let start = Instant::now();

    let mut outcomes: Vec<Outcome> = if paths.is_empty() {
        Vec::new()
    } else {
        thread::scope(|scope| {
            let workers: Vec<_> = (0..count)
                .map(|index| {
                    let path = &paths[index % paths.len()];
                    scope.spawn(move || single_outcome(addr, index, path, timeout))
                })
                .collect();

            workers
                .into_iter()
                .enumerate()
                .map(|(index, worker)| {
                    worker.join().unwrap_or_else(|_| Outcome {
                        index,
                        path: paths[index % paths.len()].clone(),
                        status_code: None,
                        error: Some("worker panicked".to_string()),
                        body_length: 0,
                        body_sha256: None,
                        latency_ms: 0.0,
                    })
                })
                .collect()
        })
    };
    outcomes.sort_by_key(|outcome| outcome.index);

    let elapsed_secs = start.elapsed().as_secs_f64();
    let successful = outcomes.iter().filter(|o| o.is_success()).count();
    let total = outcomes.len();

    LoadReport {
        total,
        successful,
        failed: total - successful,
        elapsed_secs,
        requests_per_sec: if elapsed_secs > 0.0 { total as f64 / elapsed_secs } else { 0.0 },
        outcomes,
    }
}

fn single_outcome(addr: &str, index: usize, path: &str, timeout: Duration) -> Outcome {
    let start = Instant::now();
    let result = make_request(addr, path, "GET", timeout);
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;

    match result {
        Ok(response) => Outcome {
            index,
            path: path.to_string(),
            status_code: Some(response.status_code),
            error: None,
            body_length: response.body.len(),
            body_sha256: Some(sha256_hex(&response.body)),
            latency_ms,
        },
        Err(e) => Outcome {
            index,
            path: path.to_string(),
            status_code: None,
            error: Some(e.to_string()),
            body_length: 0,
            body_sha256: None,
            latency_ms,
        },
    }
}

/// SHA-256 en hexadecimal
pub fn sha256_hex(data: &[u8]) -> String {
    Sha256::digest(data)
        .iter()
        .map(|byte| format!("{:02x}", byte))
        .collect()
}
