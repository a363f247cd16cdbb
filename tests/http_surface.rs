use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use folio::{Server, Settings, Site};
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

struct Running {
    addr: SocketAddr,
    stop: oneshot::Sender<()>,
    task: JoinHandle<Result<(), folio::Error>>,
}

impl Running {
    async fn shutdown(self) {
        let _ = self.stop.send(());
        self.task.await.expect("server task").expect("clean shutdown");
    }
}

async fn start() -> Running {
    let server = Server::bind("127.0.0.1:0").await.expect("bind");
    let addr = server.local_addr();
    let site = Arc::new(Site::new(Settings::with_secret("integration-secret")).expect("site"));
    let (stop, stopped) = oneshot::channel::<()>();
    let task = tokio::spawn(async move {
        server
            .serve_with_shutdown(site.router(), async {
                let _ = stopped.await;
            })
            .await
    });
    Running { addr, stop, task }
}

struct Reply {
    status: u16,
    headers: Vec<(String, String)>,
    body: String,
}

impl Reply {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    fn json(&self) -> Value {
        serde_json::from_str(&self.body).expect("json body")
    }
}

async fn send_raw(
    addr: SocketAddr,
    method: &str,
    path: &str,
    headers: &[(&str, &str)],
    body: &str,
) -> Reply {
    let mut stream = tokio::net::TcpStream::connect(addr).await.expect("connect server");
    let mut req = format!(
        "{method} {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\nContent-Length: {}\r\n",
        body.len()
    );
    for (k, v) in headers {
        req.push_str(&format!("{k}: {v}\r\n"));
    }
    req.push_str("\r\n");
    req.push_str(body);
    stream.write_all(req.as_bytes()).await.expect("write request");

    let mut response = String::new();
    stream.read_to_string(&mut response).await.expect("read response");
    let (head, body) = response
        .split_once("\r\n\r\n")
        .expect("http response must have separator");
    let mut lines = head.lines();
    let status = lines
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|s| s.parse::<u16>().ok())
        .expect("http status");
    let headers = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_owned(), v.trim().to_owned()))
        .collect();
    Reply { status, headers, body: body.to_owned() }
}

#[tokio::test]
async fn static_pages_render_content() {
    let server = start().await;
    for (path, needle) in [
        ("/", "Get in touch"),
        ("/projects", "Harbor Metrics"),
        ("/certifications", "Amazon Web Services"),
        ("/experience", "Brightleaf Health"),
    ] {
        let reply = send_raw(server.addr, "GET", path, &[], "").await;
        assert_eq!(reply.status, 200, "{path}");
        assert_eq!(reply.header("content-type"), Some("text/html; charset=utf-8"));
        assert!(reply.body.contains(needle), "{path} should contain {needle}");
    }
    server.shutdown().await;
}

#[tokio::test]
async fn health_is_exact() {
    let server = start().await;
    let reply = send_raw(server.addr, "GET", "/health", &[], "").await;
    assert_eq!(reply.status, 200);
    assert_eq!(reply.body, r#"{"status":"OK"}"#);
    server.shutdown().await;
}

#[tokio::test]
async fn contact_json_round_trip() {
    let server = start().await;
    let json_type = [("Content-Type", "application/json")];

    let ok = send_raw(
        server.addr,
        "POST",
        "/contact",
        &json_type,
        r#"{"name":"A","email":"a@b.com","message":"hi"}"#,
    )
    .await;
    assert_eq!(ok.status, 200);
    assert_eq!(ok.json(), json!({"ok": true}));

    let missing = send_raw(
        server.addr,
        "POST",
        "/contact",
        &json_type,
        r#"{"name":"A","email":"a@b.com"}"#,
    )
    .await;
    assert_eq!(missing.status, 400);
    assert_eq!(missing.json(), json!({"ok": false, "error": "Missing required fields"}));

    server.shutdown().await;
}

#[tokio::test]
async fn contact_form_redirects_with_flash() {
    let server = start().await;
    let form_type = [("Content-Type", "application/x-www-form-urlencoded")];

    let ok = send_raw(
        server.addr,
        "POST",
        "/contact",
        &form_type,
        "name=Ada&email=ada%40example.com&message=Hello",
    )
    .await;
    assert_eq!(ok.status, 302);
    assert_eq!(ok.header("location"), Some("/"));
    let cookie = ok.header("set-cookie").expect("flash cookie");
    let cookie = cookie.split(';').next().expect("cookie pair").to_owned();

    let home = send_raw(server.addr, "GET", "/", &[("Cookie", cookie.as_str())], "").await;
    assert_eq!(home.status, 200);
    assert!(home.body.contains("flash-success"));
    assert!(home.header("set-cookie").expect("cleared").contains("Max-Age=0"));

    let missing = send_raw(server.addr, "POST", "/contact", &form_type, "name=Ada&message=Hello").await;
    assert_eq!(missing.status, 302);
    assert_eq!(missing.header("location"), Some("/"));
    let cookie = missing.header("set-cookie").expect("flash cookie");
    let cookie = cookie.split(';').next().expect("cookie pair").to_owned();
    let home = send_raw(server.addr, "GET", "/", &[("Cookie", cookie.as_str())], "").await;
    assert!(home.body.contains("flash-warning"));

    server.shutdown().await;
}

#[tokio::test]
async fn unknown_path_is_404() {
    let server = start().await;
    let reply = send_raw(server.addr, "GET", "/nonexistent-path", &[], "").await;
    assert_eq!(reply.status, 404);
    assert!(reply.body.contains("Page not found"));
    server.shutdown().await;
}

#[tokio::test]
async fn unknown_method_is_501() {
    let server = start().await;
    let reply = send_raw(server.addr, "PROPFIND", "/", &[], "").await;
    assert_eq!(reply.status, 501);
    assert!(reply.body.is_empty());
    server.shutdown().await;
}

#[tokio::test]
async fn wrong_method_is_405_with_allow() {
    let server = start().await;
    let reply = send_raw(server.addr, "DELETE", "/projects", &[], "").await;
    assert_eq!(reply.status, 405);
    assert_eq!(reply.header("allow"), Some("GET, HEAD"));
    server.shutdown().await;
}

#[tokio::test]
async fn idle_keep_alive_does_not_block_shutdown() {
    let server = start().await;

    let mut stream = tokio::net::TcpStream::connect(server.addr).await.expect("connect server");
    let req = format!("GET /health HTTP/1.1\r\nHost: {}\r\n\r\n", server.addr);
    stream.write_all(req.as_bytes()).await.expect("write request");

    let mut seen = Vec::new();
    let mut buf = [0u8; 1024];
    while !String::from_utf8_lossy(&seen).contains(r#"{"status":"OK"}"#) {
        let n = stream.read(&mut buf).await.expect("read response");
        assert!(n > 0, "server closed a keep-alive connection early");
        seen.extend_from_slice(&buf[..n]);
    }

    // The connection is now idle but still open.
    let _ = server.stop.send(());
    let stopped = tokio::time::timeout(Duration::from_secs(5), server.task)
        .await
        .expect("server should stop while a keep-alive connection is idle");
    stopped.expect("server task").expect("clean shutdown");

    let n = stream.read(&mut buf).await.unwrap_or(0);
    assert_eq!(n, 0, "idle connection should be closed on shutdown");
}
