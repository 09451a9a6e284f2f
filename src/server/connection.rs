//! # Handler de Conexión
//! src/server/connection.rs
//!
//! Dueño de una conexión aceptada de principio a fin:
//!
//! ```text
//! Reading → Parsed ─┬─ método ∉ {GET, HEAD} → 405
//!      │            └─ Resolving ─┬─ Ok   → leer archivo → 200
//!      │                          └─ Fail → 403 / 404 / 500
//!      └─ malformado → 400
//! ```
//!
//! Siempre se escribe exactamente una respuesta y luego se cierra el
//! socket. Ningún error de esta conexión escapa al resto del servidor.

use crate::error::ServeError;
use crate::http::{Method, Request, Response, StatusCode};
use crate::resolver::{DocumentRoot, Resolved};
use log::{debug, error, info, warn};
use std::fs;
use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream};
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};

/// Tope del buffer de lectura: request line + headers
pub const MAX_REQUEST_BYTES: usize = 4096;

const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

const LINGER_TIMEOUT: Duration = Duration::from_millis(500);
const LINGER_MAX_BYTES: usize = 64 * 1024;

/// Fuente de bytes cuyo tiempo de espera por lectura se puede ajustar
pub trait TimedRead: Read {
    fn set_wait(&mut self, wait: Duration) -> io::Result<()>;
}

impl TimedRead for TcpStream {
    fn set_wait(&mut self, wait: Duration) -> io::Result<()> {
        self.set_read_timeout(Some(wait))
    }
}

/// Atiende una conexión completa: leer, procesar, responder, cerrar
///
/// `timeout` acota la lectura entera del request, no cada `read()`.
pub fn handle_connection(mut stream: TcpStream, root: &DocumentRoot, timeout: Duration) -> io::Result<()> {
    let peer = stream
        .peer_addr()
        .map(|addr| addr.to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    let raw = match read_request(&mut stream, timeout) {
        Ok(raw) if raw.is_empty() => {
            debug!("{} closed the connection without sending data", peer);
            return Ok(());
        }
        Ok(raw) => raw,
        Err(ServeError::Unexpected(e)) if is_timeout(&e) => {
            debug!("{} timed out before sending a request", peer);
            return Ok(());
        }
        Err(e) => {
            let response = error_response(&peer, &e, true);
            write_response(&mut stream, &response)?;
            linger(&mut stream);
            return Ok(());
        }
    };

    let response = guarded(&peer, || respond(&raw, root, &peer));
    write_response(&mut stream, &response)?;

    debug!(
        "{} <- {} {} ({} bytes)",
        peer,
        response.status(),
        crate::http::status::reason_phrase_for(response.status()),
        response.body().len()
    );

    // Puede quedar un body o un segundo request sin leer: cerrar ahora
    // mandaría RST y el cliente podría perder la respuesta
    linger(&mut stream);
    Ok(())
}

/// Lee hasta ver `\r\n\r\n`, hasta EOF o hasta llenar el buffer fijo
///
/// Todo el loop comparte un solo plazo de `timeout`: un peer que manda
/// de a un byte no extiende la espera. Al vencer el plazo se entrega lo
/// que ya llegó; sin datos, el error es un timeout de I/O. Un buffer lleno
/// sin terminador se rechaza como request malformado.
pub fn read_request<R: TimedRead>(reader: &mut R, timeout: Duration) -> Result<Vec<u8>, ServeError> {
    let deadline = Instant::now() + timeout;
    let mut buffer = [0u8; MAX_REQUEST_BYTES];
    let mut filled = 0;

    loop {
        if filled == buffer.len() {
            return Err(ServeError::MalformedRequest("request header too large".to_string()));
        }

        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            if filled > 0 {
                break;
            }
            return Err(ServeError::Unexpected(io::Error::new(
                io::ErrorKind::TimedOut,
                "no request before deadline",
            )));
        }
        reader.set_wait(remaining)?;

        match reader.read(&mut buffer[filled..]) {
            Ok(0) => break,
            Ok(n) => {
                filled += n;
                if contains_terminator(&buffer[..filled]) {
                    break;
                }
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) if filled > 0 && is_timeout(&e) => break,
            Err(e) => return Err(ServeError::Unexpected(e)),
        }
    }

    Ok(buffer[..filled].to_vec())
}

/// Pipeline puro sobre los bytes ya leídos: parser → método → resolver → archivo
pub fn respond(raw: &[u8], root: &DocumentRoot, peer: &str) -> Response {
    let request = match Request::parse(raw) {
        Ok(request) => request,
        Err(e) => return error_response(peer, &e, true),
    };

    info!("{} - {} {}", peer, request.method(), request.path());

    let method = match Method::from_token(request.method()) {
        Ok(method) => method,
        Err(e) => return error_response(peer, &e, true),
    };

    let served = root
        .resolve(request.path())
        .and_then(|resolved| read_resolved(method, request.path(), &resolved));

    match served {
        Ok(response) => response,
        Err(e) => error_response(peer, &e, method.includes_body()),
    }
}

/// Lee el archivo ya resuelto; la resolución no garantiza la lectura
fn read_resolved(method: Method, path: &str, resolved: &Resolved) -> Result<Response, ServeError> {
    let body = fs::read(&resolved.absolute_path).map_err(|e| ServeError::from_io(e, path))?;
    debug!("{} {} -> {} bytes read", method.as_str(), path, body.len());
    Ok(Response::file(&resolved.content_type, body, method.includes_body()))
}

/// Frontera final: un panic en el pipeline se convierte en 500
fn guarded<F: FnOnce() -> Response>(peer: &str, pipeline: F) -> Response {
    panic::catch_unwind(AssertUnwindSafe(pipeline)).unwrap_or_else(|_| {
        error!("{} - handler panicked, answering 500", peer);
        Response::error_page(StatusCode::InternalServerError, "Internal server error", true)
    })
}

fn error_response(peer: &str, err: &ServeError, include_body: bool) -> Response {
    match err {
        ServeError::Unexpected(_) => error!("{} - {}", peer, err),
        _ => warn!("{} - {}", peer, err),
    }
    Response::error_page(err.status(), &err.public_message(), include_body)
}

fn write_response(stream: &mut TcpStream, response: &Response) -> io::Result<()> {
    stream.write_all(&response.to_bytes())?;
    stream.flush()
}

/// Cierra la escritura y descarta lo que el peer siga enviando
///
/// Acotado en tiempo total y en bytes, igual que la lectura del request.
fn linger(stream: &mut TcpStream) {
    let _ = stream.shutdown(Shutdown::Write);

    let deadline = Instant::now() + LINGER_TIMEOUT;
    let mut sink = [0u8; 1024];
    let mut drained = 0;
    while drained < LINGER_MAX_BYTES {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() || stream.set_read_timeout(Some(remaining)).is_err() {
            break;
        }
        match stream.read(&mut sink) {
            Ok(0) | Err(_) => break,
            Ok(n) => drained += n,
        }
    }
}

fn contains_terminator(data: &[u8]) -> bool {
    data.windows(HEADER_TERMINATOR.len()).any(|w| w == HEADER_TERMINATOR)
}

fn is_timeout(err: &io::Error) -> bool {
    matches!(err.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut)
}
