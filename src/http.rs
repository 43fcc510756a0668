use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone)]
pub(crate) enum FetchError {
    Status { status: u16, reason: String },
    Transport(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status { status, reason } if reason.is_empty() => write!(f, "{status}"),
            Self::Status { status, reason } => write!(f, "{status} {reason}"),
            Self::Transport(message) => f.write_str(message),
        }
    }
}

pub(crate) trait Fetch: Sync {
    fn get(&self, url: &str) -> Result<String, FetchError>;
}

pub(crate) struct UreqFetcher {
    connect_timeout: Option<Duration>,
    read_timeout: Option<Duration>,
}

impl UreqFetcher {
    pub(crate) fn new() -> Self {
        Self {
            connect_timeout: None,
            read_timeout: None,
        }
    }

    #[cfg(test)]
    fn with_timeouts(connect_timeout: Duration, read_timeout: Duration) -> Self {
        Self {
            connect_timeout: Some(connect_timeout),
            read_timeout: Some(read_timeout),
        }
    }
}

impl Fetch for UreqFetcher {
    fn get(&self, url: &str) -> Result<String, FetchError> {
        let mut builder = ureq::AgentBuilder::new();
        if let Some(timeout) = self.connect_timeout {
            builder = builder.timeout_connect(timeout);
        }
        if let Some(timeout) = self.read_timeout {
            builder = builder.timeout_read(timeout).timeout_write(timeout);
        }
        let agent = builder.build();

        match agent.get(url).call() {
            Ok(response) => response
                .into_string()
                .map_err(|err| FetchError::Transport(format!("response decode failed: {err}"))),
            Err(ureq::Error::Status(status, response)) => Err(FetchError::Status {
                status,
                reason: response.status_text().to_string(),
            }),
            Err(ureq::Error::Transport(err)) => Err(FetchError::Transport(err.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::io::{Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::sync::mpsc;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone)]
    enum Behavior {
        Respond(u16, String),
        DelayRespond(Duration, u16, String),
    }

    #[derive(Debug)]
    struct TestServer {
        base_url: String,
        shutdown_tx: mpsc::Sender<()>,
        join_handle: Option<std::thread::JoinHandle<()>>,
    }

    impl TestServer {
        fn spawn(behaviors: Vec<Behavior>) -> Self {
            let listener = TcpListener::bind(("127.0.0.1", 0)).expect("bind test server");
            listener.set_nonblocking(true).expect("set nonblocking");
            let addr = listener.local_addr().expect("local addr");

            let shared_behaviors = Arc::new(Mutex::new(VecDeque::from(behaviors)));
            let behaviors_clone = Arc::clone(&shared_behaviors);
            let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

            let join_handle = std::thread::spawn(move || {
                loop {
                    if shutdown_rx.try_recv().is_ok() {
                        break;
                    }

                    match listener.accept() {
                        Ok((mut stream, _)) => {
                            let behavior = {
                                let mut queue = behaviors_clone.lock().expect("lock behaviors");
                                queue.pop_front().unwrap_or_else(|| {
                                    Behavior::Respond(200, "default-ok".to_string())
                                })
                            };
                            std::thread::spawn(move || {
                                let _ = consume_request(&mut stream);
                                serve_behavior(&mut stream, behavior);
                            });
                        }
                        Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                            std::thread::sleep(Duration::from_millis(5));
                        }
                        Err(_) => break,
                    }
                }
            });

            Self {
                base_url: format!("http://{addr}"),
                shutdown_tx,
                join_handle: Some(join_handle),
            }
        }
    }

    impl Drop for TestServer {
        fn drop(&mut self) {
            let _ = self.shutdown_tx.send(());
            if let Some(handle) = self.join_handle.take() {
                let _ = handle.join();
            }
        }
    }

    fn consume_request(stream: &mut TcpStream) -> std::io::Result<()> {
        stream.set_read_timeout(Some(Duration::from_millis(200)))?;
        let mut buf = [0_u8; 1024];
        let mut data = Vec::new();
        loop {
            match stream.read(&mut buf) {
                Ok(0) => break,
                Ok(read) => {
                    data.extend_from_slice(&buf[..read]);
                    if data.windows(4).any(|window| window == b"\r\n\r\n") {
                        break;
                    }
                }
                Err(err)
                    if err.kind() == std::io::ErrorKind::WouldBlock
                        || err.kind() == std::io::ErrorKind::TimedOut =>
                {
                    break;
                }
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }

    fn reason_phrase(status: u16) -> &'static str {
        match status {
            200 => "OK",
            404 => "Not Found",
            500 => "Internal Server Error",
            503 => "Service Unavailable",
            _ => "Status",
        }
    }

    fn serve_behavior(stream: &mut TcpStream, behavior: Behavior) {
        match behavior {
            Behavior::Respond(status, body) => {
                let _ = write_response(stream, status, &body);
            }
            Behavior::DelayRespond(delay, status, body) => {
                std::thread::sleep(delay);
                let _ = write_response(stream, status, &body);
            }
        }
    }

    fn write_response(stream: &mut TcpStream, status: u16, body: &str) -> std::io::Result<()> {
        let reason = reason_phrase(status);
        let payload = body.as_bytes();
        write!(
            stream,
            "HTTP/1.1 {status} {reason}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            payload.len()
        )?;
        stream.write_all(payload)?;
        stream.flush()
    }

    #[test]
    fn get_returns_body_on_success() {
        let server = TestServer::spawn(vec![Behavior::Respond(200, "cast-body".to_string())]);

        let body = UreqFetcher::new()
            .get(&server.base_url)
            .expect("request should succeed");

        assert_eq!(body, "cast-body");
    }

    #[test]
    fn get_reports_status_and_text_on_http_failure() {
        let server = TestServer::spawn(vec![Behavior::Respond(404, "missing".to_string())]);

        let err = UreqFetcher::new()
            .get(&server.base_url)
            .expect_err("404 should fail the request");

        match &err {
            FetchError::Status { status, reason } => {
                assert_eq!(*status, 404);
                assert_eq!(reason, "Not Found");
            }
            FetchError::Transport(message) => panic!("unexpected transport error: {message}"),
        }
        assert_eq!(err.to_string(), "404 Not Found");
    }

    #[test]
    fn get_maps_read_timeout_to_transport_error() {
        let server = TestServer::spawn(vec![Behavior::DelayRespond(
            Duration::from_millis(120),
            200,
            "slow".to_string(),
        )]);

        let fetcher =
            UreqFetcher::with_timeouts(Duration::from_millis(250), Duration::from_millis(20));
        let err = fetcher
            .get(&server.base_url)
            .expect_err("read timeout should fail the request");

        assert!(
            matches!(err, FetchError::Transport(_)),
            "unexpected error: {err}"
        );
    }
}
