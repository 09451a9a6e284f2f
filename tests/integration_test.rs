//! Tests de integración para el servidor de archivos estáticos
//! tests/integration_test.rs
//!
//! Cada test levanta un `Server` real en 127.0.0.1:0 sobre un document
//! root temporal y lo apaga al terminar.

use redunix_static::client::{make_request, parse_response, run_concurrent};
use redunix_static::config::Config;
use redunix_static::samples::create_sample_files;
use redunix_static::server::{Server, ShutdownHandle};
use std::fs;
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(5);

static NEXT_ROOT: AtomicUsize = AtomicUsize::new(0);

/// Servidor en segundo plano con su document root temporal
struct TestServer {
    addr: SocketAddr,
    root: PathBuf,
    handle: ShutdownHandle,
    runner: Option<JoinHandle<std::io::Result<()>>>,
}

impl TestServer {
    fn start(setup: impl FnOnce(&Path)) -> Self {
        Self::start_with_timeout(5, setup)
    }

    fn start_with_timeout(timeout_secs: u64, setup: impl FnOnce(&Path)) -> Self {
        let id = NEXT_ROOT.fetch_add(1, Ordering::SeqCst);
        let root = std::env::temp_dir().join(format!("redunix-it-{}-{}", std::process::id(), id));
        let _ = fs::remove_dir_all(&root);
        fs::create_dir_all(&root).unwrap();
        setup(&root);

        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 0,
            document_root: root.clone(),
            timeout_secs,
            ..Config::default()
        };

        let server = Server::bind(config).expect("bind");
        let addr = server.local_addr();
        let handle = server.shutdown_handle();
        let runner = thread::spawn(move || server.run());

        Self {
            addr,
            root,
            handle,
            runner: Some(runner),
        }
    }

    fn with_samples() -> Self {
        Self::start(|root| create_sample_files(root).unwrap())
    }

    fn addr(&self) -> String {
        self.addr.to_string()
    }

    /// Envía bytes crudos y retorna la respuesta completa
    fn raw(&self, request: &[u8]) -> Vec<u8> {
        let mut stream = TcpStream::connect(self.addr).unwrap();
        stream.set_read_timeout(Some(TIMEOUT)).unwrap();
        stream.write_all(request).unwrap();
        let mut response = Vec::new();
        stream.read_to_end(&mut response).unwrap();
        response
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.shutdown();
        if let Some(runner) = self.runner.take() {
            let _ = runner.join();
        }
        let _ = fs::remove_dir_all(&self.root);
    }
}

#[test]
fn test_json_round_trip() {
    let server = TestServer::with_samples();
    let expected = fs::read(server.root.join("api/data.json")).unwrap();

    let raw = server.raw(b"GET /api/data.json HTTP/1.1\r\nHost: localhost\r\n\r\n");
    let response = parse_response(&raw).unwrap();

    assert_eq!(response.status_code, 200);
    assert!(response.header("Content-Type").unwrap().contains("json"));
    assert_eq!(response.body, expected);
    assert_eq!(response.header("Content-Length"), Some(expected.len().to_string().as_str()));
}

#[test]
fn test_mandatory_headers_in_order() {
    let server = TestServer::with_samples();
    let response = parse_response(&server.raw(b"GET /styles.css HTTP/1.1\r\n\r\n")).unwrap();

    let names: Vec<&str> = response.headers.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["Date", "Server", "Content-Type", "Content-Length", "Connection"]);
    assert_eq!(response.header("Connection"), Some("close"));
    assert!(response.header("Date").unwrap().ends_with(" GMT"));
    assert_eq!(response.header("Content-Type"), Some("text/css"));
}

#[test]
fn test_root_serves_index() {
    let server = TestServer::with_samples();
    let root = parse_response(&server.raw(b"GET / HTTP/1.1\r\n\r\n")).unwrap();
    let index = parse_response(&server.raw(b"GET /index.html HTTP/1.1\r\n\r\n")).unwrap();

    assert_eq!(root.status_code, 200);
    assert_eq!(root.body, index.body);
    assert_eq!(root.header("Content-Type"), index.header("Content-Type"));
}

#[test]
fn test_head_matches_get_without_body() {
    let server = TestServer::with_samples();
    let get_raw = server.raw(b"GET /about.html HTTP/1.1\r\n\r\n");
    let head_raw = server.raw(b"HEAD /about.html HTTP/1.1\r\n\r\n");

    let get = parse_response(&get_raw).unwrap();
    let head = parse_response(&head_raw).unwrap();

    assert_eq!(head.status_code, 200);
    for name in ["Server", "Content-Type", "Content-Length", "Connection"] {
        assert_eq!(get.header(name), head.header(name), "{}", name);
    }
    assert!(head_raw.ends_with(b"\r\n\r\n"));
    assert!(head.body.is_empty());
    assert_eq!(get.body.len().to_string(), head.header("Content-Length").unwrap());
}

#[test]
fn test_unsupported_method() {
    let server = TestServer::with_samples();
    let response = parse_response(&server.raw(b"PUT /x HTTP/1.1\r\n\r\n")).unwrap();

    assert_eq!(response.status_code, 405);
    assert_eq!(response.status_text, "Method Not Allowed");
    assert_eq!(response.header("Connection"), Some("close"));
    assert!(String::from_utf8_lossy(&response.body).contains("405"));
}

#[test]
fn test_malformed_request_line() {
    let server = TestServer::with_samples();
    let response = parse_response(&server.raw(b"GARBAGE\r\n\r\n")).unwrap();

    assert_eq!(response.status_code, 400);
    assert_eq!(response.header("Content-Type"), Some("text/html; charset=utf-8"));
}

#[test]
fn test_oversized_request_is_rejected() {
    let server = TestServer::with_samples();
    let mut request = b"GET / HTTP/1.1\r\nX-Padding: ".to_vec();
    request.extend(std::iter::repeat(b'a').take(5000));
    request.extend_from_slice(b"\r\n\r\n");

    let mut stream = TcpStream::connect(server.addr).unwrap();
    stream.set_read_timeout(Some(TIMEOUT)).unwrap();
    stream.write_all(&request).unwrap();
    let mut raw = Vec::new();
    // El servidor puede cerrar con datos sin leer; basta con la status line
    let _ = stream.read_to_end(&mut raw);

    assert!(raw.starts_with(b"HTTP/1.1 400 Bad Request\r\n"));
}

#[test]
fn test_traversal_is_forbidden() {
    let server = TestServer::with_samples();

    for target in ["/../secret.txt", "/%2e%2e/secret.txt", "/api/%2E%2E/%2E%2E/etc/passwd"] {
        let request = format!("GET {} HTTP/1.1\r\n\r\n", target);
        let raw = server.raw(request.as_bytes());
        let response = parse_response(&raw).unwrap();

        assert_eq!(response.status_code, 403, "{}", target);
        assert_eq!(response.status_text, "Forbidden");
        assert!(!String::from_utf8_lossy(&response.body).contains("passwd"));
    }
}

#[test]
fn test_not_found() {
    let server = TestServer::with_samples();
    let response = parse_response(&server.raw(b"GET /noexiste.html HTTP/1.1\r\n\r\n")).unwrap();

    assert_eq!(response.status_code, 404);
    let body = String::from_utf8_lossy(&response.body);
    assert!(body.contains("Not Found"));
    assert!(!body.contains(server.root.to_string_lossy().as_ref()));
}

#[test]
fn test_directory_index() {
    let server = TestServer::start(|root| {
        fs::create_dir_all(root.join("docs")).unwrap();
        fs::write(root.join("docs/index.html"), b"docs index").unwrap();
        fs::create_dir_all(root.join("empty")).unwrap();
        fs::write(root.join("index.html"), b"root").unwrap();
    });

    let docs = parse_response(&server.raw(b"GET /docs/ HTTP/1.1\r\n\r\n")).unwrap();
    assert_eq!(docs.status_code, 200);
    assert_eq!(docs.body, b"docs index");

    let empty = parse_response(&server.raw(b"GET /empty HTTP/1.1\r\n\r\n")).unwrap();
    assert_eq!(empty.status_code, 404);
}

#[test]
fn test_binary_file_is_served_verbatim() {
    let payload: Vec<u8> = (0..=255u8).cycle().take(10_000).collect();
    let expected = payload.clone();
    let server = TestServer::start(move |root| {
        fs::write(root.join("index.html"), b"x").unwrap();
        fs::write(root.join("blob.bin"), &payload).unwrap();
    });

    let response = make_request(&server.addr(), "/blob.bin", "GET", TIMEOUT).unwrap();
    assert_eq!(response.status_code, 200);
    assert_eq!(response.header("Content-Type"), Some("application/octet-stream"));
    assert_eq!(response.body, expected);
}

#[test]
fn test_query_string_is_ignored() {
    let server = TestServer::with_samples();
    let response = make_request(&server.addr(), "/api/data.json?cache=no", "GET", TIMEOUT).unwrap();
    assert_eq!(response.status_code, 200);
}

#[test]
fn test_concurrent_requests_are_isolated() {
    let count = 16;
    let server = TestServer::start(move |root| {
        fs::write(root.join("index.html"), b"root").unwrap();
        for i in 0..count {
            let body = format!("archivo {} ", i).repeat(200 + i);
            fs::write(root.join(format!("file{}.txt", i)), body).unwrap();
        }
    });

    let paths: Vec<String> = (0..count).map(|i| format!("/file{}.txt", i)).collect();
    let report = run_concurrent(&server.addr(), &paths, count, TIMEOUT);

    assert_eq!(report.total, count);
    assert_eq!(report.successful, count);
    for outcome in &report.outcomes {
        assert_eq!(outcome.status_code, Some(200), "{}", outcome.path);
        let expected = fs::read(server.root.join(outcome.path.trim_start_matches('/'))).unwrap();
        assert_eq!(outcome.body_length, expected.len());
        assert_eq!(
            outcome.body_sha256.as_deref(),
            Some(redunix_static::client::sha256_hex(&expected).as_str())
        );
    }
}

#[test]
fn test_silent_client_does_not_block_others() {
    let server = TestServer::with_samples();

    // Conexión que nunca envía nada
    let _silent = TcpStream::connect(server.addr).unwrap();

    let response = make_request(&server.addr(), "/", "GET", TIMEOUT).unwrap();
    assert_eq!(response.status_code, 200);
}

#[test]
fn test_trickling_client_is_cut_off_at_timeout() {
    let server = TestServer::start_with_timeout(1, |root| create_sample_files(root).unwrap());

    let mut stream = TcpStream::connect(server.addr).unwrap();
    stream.set_read_timeout(Some(TIMEOUT)).unwrap();
    stream.write_all(b"G").unwrap();

    // Un byte cada 300 ms: cada read individual llega antes del timeout
    let mut writer = stream.try_clone().unwrap();
    let dripper = thread::spawn(move || {
        for byte in b"ET /about".iter() {
            thread::sleep(Duration::from_millis(300));
            if writer.write_all(&[*byte]).is_err() {
                break;
            }
        }
    });

    let start = std::time::Instant::now();
    let mut raw = Vec::new();
    let _ = stream.read_to_end(&mut raw);
    let elapsed = start.elapsed();

    assert!(raw.starts_with(b"HTTP/1.1 400 Bad Request\r\n"));
    assert!(elapsed < Duration::from_secs(3), "elapsed {:?}", elapsed);
    dripper.join().unwrap();
}

#[cfg(unix)]
#[test]
fn test_binary_drains_and_exits_on_sigterm() {
    use std::io::{BufRead, BufReader};
    use std::process::{Command, Stdio};
    use std::sync::mpsc;
    use std::time::Instant;

    let id = NEXT_ROOT.fetch_add(1, Ordering::SeqCst);
    let root = std::env::temp_dir().join(format!("redunix-sig-{}-{}", std::process::id(), id));
    let _ = fs::remove_dir_all(&root);

    let mut child = Command::new(env!("CARGO_BIN_EXE_redunix_static"))
        .args(["--host", "127.0.0.1", "--port", "0", "--create-samples", "--timeout", "2"])
        .arg("--document-root")
        .arg(&root)
        .env_remove("RUST_LOG")
        .env("LOG_LEVEL", "info")
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    // El log va a stderr; se consume entero para que el pipe no se llene
    let stderr = child.stderr.take().unwrap();
    let (tx, rx) = mpsc::channel();
    let reader = thread::spawn(move || {
        for line in BufReader::new(stderr).lines().map_while(Result::ok) {
            if let Some(pos) = line.find("server ready at http://") {
                let addr = line[pos + "server ready at http://".len()..].trim().to_string();
                let _ = tx.send(addr);
            }
        }
    });

    let addr = rx.recv_timeout(Duration::from_secs(10)).expect("server did not start");
    let response = make_request(&addr, "/about.html", "GET", TIMEOUT).unwrap();
    assert_eq!(response.status_code, 200);

    let status = Command::new("kill")
        .args(["-TERM", &child.id().to_string()])
        .status()
        .unwrap();
    assert!(status.success());

    let deadline = Instant::now() + Duration::from_secs(10);
    let exit = loop {
        if let Some(exit) = child.try_wait().unwrap() {
            break exit;
        }
        if Instant::now() > deadline {
            let _ = child.kill();
            panic!("server did not stop after SIGTERM");
        }
        thread::sleep(Duration::from_millis(50));
    };

    assert!(exit.success(), "exit status {:?}", exit);
    reader.join().unwrap();
    let _ = fs::remove_dir_all(&root);
}
