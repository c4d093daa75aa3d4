//! ApiClient against a one-shot local HTTP responder.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::mpsc::{Receiver, channel};
use std::thread;
use std::time::Duration;

use ei_client::{ApiClient, ClientConfig, ClientError, SessionStore};
use ei_core::LoginRequest;

/// Upper bound on any socket wait so a client bug fails the test instead of hanging it.
const IO_TIMEOUT: Duration = Duration::from_secs(5);

/// Serve exactly one request with `status` and `body`; yields the raw request head.
fn serve_once(status: &'static str, body: &'static str) -> (String, Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = channel();

    thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        stream.set_read_timeout(Some(IO_TIMEOUT)).unwrap();
        stream.set_write_timeout(Some(IO_TIMEOUT)).unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        let mut head = String::new();
        let mut content_length = 0usize;
        loop {
            let mut line = String::new();
            if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                break;
            }
            if let Some(value) = line.to_ascii_lowercase().strip_prefix("content-length:") {
                content_length = value.trim().parse().unwrap_or(0);
            }
            head.push_str(&line);
        }
        let mut request_body = vec![0u8; content_length];
        reader.read_exact(&mut request_body).unwrap();
        head.push_str(&String::from_utf8_lossy(&request_body));

        let mut stream = stream;
        write!(
            stream,
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        )
        .unwrap();
        stream.flush().unwrap();
        tx.send(head).unwrap();
    });

    (format!("http://{}", addr), rx)
}

fn client(url: String, session: SessionStore) -> ApiClient {
    let config = ClientConfig {
        api_url: url,
        timeout_s: IO_TIMEOUT.as_secs(),
        ..ClientConfig::default()
    };
    ApiClient::new(&config, session).unwrap()
}

#[test]
fn energy_page_sends_paging_query() {
    let (url, head) = serve_once(
        "200 OK",
        r#"{"data":[],"pagination":{"total":0,"page":1,"pages":0}}"#,
    );
    let api = client(url, SessionStore::in_memory());

    let page = api.energy_page(3, 20, Some("Texas")).unwrap();
    assert!(page.data.is_empty());

    let head = head.recv_timeout(IO_TIMEOUT).unwrap();
    assert!(head.starts_with("GET /api/energy?page=3&limit=20&location=Texas "));
    assert!(!head.to_ascii_lowercase().contains("authorization"));
}

#[test]
fn login_stores_token_and_later_requests_carry_it() {
    let (url, head) = serve_once(
        "200 OK",
        r#"{"_id":"u1","name":"Ada","email":"ada@example.com","role":"admin","token":"tok-9"}"#,
    );
    let session = SessionStore::in_memory();
    let api = client(url, session.clone());

    let auth = api
        .login(&LoginRequest {
            email: "ada@example.com".into(),
            password: "longenough".into(),
        })
        .unwrap();
    assert_eq!(auth.token, "tok-9");
    assert_eq!(session.token().as_deref(), Some("tok-9"));
    let head = head.recv_timeout(IO_TIMEOUT).unwrap();
    assert!(head.starts_with("POST /api/auth/login "));
    assert!(head.contains(r#""email":"ada@example.com""#));

    let (url, head) = serve_once(
        "200 OK",
        r#"{"reports":[],"pagination":{"total":0,"page":1,"pages":0}}"#,
    );
    let api = client(url, session);
    api.reports_page(1, 10).unwrap();
    let head = head.recv_timeout(IO_TIMEOUT).unwrap().to_ascii_lowercase();
    assert!(head.contains("authorization: bearer tok-9"));
}

#[test]
fn unresponsive_server_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    let config = ClientConfig {
        api_url: url,
        timeout_s: 1,
        ..ClientConfig::default()
    };
    let api = ApiClient::new(&config, SessionStore::in_memory()).unwrap();

    // Connections queue in the backlog but are never answered.
    assert!(api.reports_page(1, 10).is_err());
    drop(listener);
}

#[test]
fn error_status_surfaces_backend_message() {
    let (url, _head) = serve_once("401 Unauthorized", r#"{"message":"Invalid credentials"}"#);
    let session = SessionStore::in_memory();
    let api = client(url, session.clone());

    let err = api
        .login(&LoginRequest {
            email: "ada@example.com".into(),
            password: "wrongpassword".into(),
        })
        .unwrap_err();
    match err {
        ClientError::Status { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Invalid credentials");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!session.is_authenticated());
}
