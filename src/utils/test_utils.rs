#[cfg(test)]
use crate::core::app::App;
#[cfg(test)]
use crate::core::config::data::ResolvedSettings;
#[cfg(test)]
use tokio::io::{AsyncReadExt, AsyncWriteExt};
#[cfg(test)]
use tokio::net::TcpListener;

#[cfg(test)]
pub fn create_test_app() -> App {
    App::new(ResolvedSettings {
        agent_url: "http://127.0.0.1:9".to_string(),
        timestamp_format: "%H:%M:%S".to_string(),
    })
}

/// A one-shot HTTP server standing in for the agent service.
#[cfg(test)]
pub struct AgentStub {
    pub base_url: String,
    /// Resolves to the raw request (head and body) once it has been answered.
    pub request: tokio::task::JoinHandle<String>,
}

#[cfg(test)]
pub async fn spawn_agent_stub(status_line: &'static str, body: &'static str) -> AgentStub {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub");
    let addr = listener.local_addr().expect("stub addr");

    let request = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept");
        let raw = read_http_request(&mut socket).await;
        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket
            .write_all(response.as_bytes())
            .await
            .expect("write response");
        let _ = socket.shutdown().await;
        raw
    });

    AgentStub {
        base_url: format!("http://{addr}"),
        request,
    }
}

/// A loopback URL with nothing listening behind it.
#[cfg(test)]
pub async fn unused_local_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    format!("http://{addr}")
}

#[cfg(test)]
async fn read_http_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 1024];

    loop {
        let read = socket.read(&mut chunk).await.expect("read request");
        if read == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..read]);

        let text = String::from_utf8_lossy(&buffer);
        if let Some(head_end) = text.find("\r\n\r\n") {
            let content_length = text[..head_end]
                .lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buffer.len() >= head_end + 4 + content_length {
                break;
            }
        }
    }

    String::from_utf8_lossy(&buffer).into_owned()
}
