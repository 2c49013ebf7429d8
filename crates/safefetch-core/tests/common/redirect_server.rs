//! Minimal HTTP/1.1 server that issues scripted redirects for integration tests.
//!
//! Routes:
//! - `/ok` answers 200 with body `ok`.
//! - `/redirect/N` answers 302 to `/redirect/N-1`; `/redirect/0` answers 200 with body `landed`.
//! - `/to?url=X` answers 302 with `Location: X` (X taken verbatim).
//! - `/no-location` answers 302 without a Location header.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;
use std::time::Duration;

/// Starts a server in a background thread. Returns the base URL without a
/// trailing slash (e.g. "http://127.0.0.1:12345"). The server runs until the
/// process exits.
pub fn start() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            thread::spawn(move || handle(stream));
        }
    });
    format!("http://127.0.0.1:{}", port)
}

/// A port on 127.0.0.1 with nothing listening on it.
pub fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    listener.local_addr().unwrap().port()
}

fn handle(mut stream: TcpStream) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let Ok(request) = std::str::from_utf8(&buf[..n]) else {
        return;
    };
    let path = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/");

    let response = route(path);
    let _ = stream.write_all(response.as_bytes());
}

fn route(path: &str) -> String {
    if path == "/ok" {
        return respond("200 OK", None, "ok");
    }
    if path == "/no-location" {
        return respond("302 Found", None, "");
    }
    if let Some(target) = path.strip_prefix("/to?url=") {
        return respond("302 Found", Some(target), "");
    }
    if let Some(n) = path.strip_prefix("/redirect/") {
        return match n.parse::<u32>() {
            Ok(0) => respond("200 OK", None, "landed"),
            Ok(n) => respond("302 Found", Some(&format!("/redirect/{}", n - 1)), ""),
            Err(_) => respond("400 Bad Request", None, ""),
        };
    }
    respond("404 Not Found", None, "")
}

fn respond(status: &str, location: Option<&str>, body: &str) -> String {
    let location = location
        .map(|l| format!("Location: {}\r\n", l))
        .unwrap_or_default();
    format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\n{}Connection: close\r\n\r\n{}",
        status,
        body.len(),
        location,
        body
    )
}
