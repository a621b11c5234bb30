//! TCP 行协议客户端
//!
//! 一个 TcpClient 独占一条持久连接。连接建立后先读掉服务器主动发送的一行欢迎语，
//! 之后每次 command 都在同一把异步互斥锁下完成「写一行 + 读一行」，
//! 因此任意数量的并发调用者共享连接时，请求与回复的配对关系不会错位。
//!
//! 状态：Connected（io 为 Some）→ Closed（io 为 None）。任何 I/O 失败都会进入 Closed，
//! 之后所有 command 立即返回 `TransportError::Closed`，不做重连。

use std::io;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio::time::timeout;

use crate::core::{ClientError, TransportError};
use crate::transport::{normalize_command, strip_line_end, CommandTransport};

type LineReader = BufReader<Box<dyn AsyncRead + Send + Unpin>>;
type LineWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// 连接的读写两端
struct Io {
    reader: LineReader,
    writer: LineWriter,
    /// 已发出请求但尚未读到回复；调用方 future 被中途丢弃时保持为 true
    in_flight: bool,
}

impl Io {
    async fn round_trip(&mut self, line: &str) -> Result<String, TransportError> {
        self.in_flight = true;

        let mut bytes = Vec::with_capacity(line.len() + 1);
        bytes.extend_from_slice(line.as_bytes());
        bytes.push(b'\n');
        self.writer.write_all(&bytes).await?;
        self.writer.flush().await?;

        let reply = read_line(&mut self.reader).await?;
        self.in_flight = false;
        Ok(reply)
    }
}

/// 读取恰好一行；EOF 或不完整的末行都视为连接提前关闭
async fn read_line(reader: &mut LineReader) -> Result<String, TransportError> {
    let mut line = String::new();
    let n = reader.read_line(&mut line).await?;
    if n == 0 || !line.ends_with('\n') {
        return Err(TransportError::UnexpectedEof);
    }
    Ok(strip_line_end(&line).to_string())
}

/// 持有一条连接与其互斥锁的客户端
pub struct TcpClient {
    io: Mutex<Option<Io>>,
    peer: String,
    greeting: String,
}

impl TcpClient {
    /// 连接 `host:port` 并消费欢迎行；`connect_timeout` 同时约束拨号与欢迎行
    pub async fn connect(
        host: &str,
        port: u16,
        connect_timeout: Duration,
    ) -> Result<Self, ClientError> {
        let addr = format!("{}:{}", host, port);
        let timed_out = |what: &str| ClientError::Connection {
            addr: addr.clone(),
            source: io::Error::new(io::ErrorKind::TimedOut, format!("{} timed out", what)),
        };

        let stream = match timeout(connect_timeout, TcpStream::connect(&addr)).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(source)) => {
                return Err(ClientError::Connection {
                    addr: addr.clone(),
                    source,
                })
            }
            Err(_) => return Err(timed_out("connect")),
        };
        // 每个请求都很短，关闭 Nagle 降低往返延迟
        let _ = stream.set_nodelay(true);

        match timeout(connect_timeout, Self::from_stream(stream, addr.clone())).await {
            Ok(result) => result,
            Err(_) => Err(timed_out("greeting")),
        }
    }

    /// 在任意双向字节流上建立客户端（测试用 duplex / 已有 TcpStream）
    pub async fn from_stream<S>(stream: S, peer: impl Into<String>) -> Result<Self, ClientError>
    where
        S: AsyncRead + AsyncWrite + Send + Unpin + 'static,
    {
        let peer = peer.into();
        let (read_half, write_half) = tokio::io::split(stream);
        let read_half: Box<dyn AsyncRead + Send + Unpin> = Box::new(read_half);
        let mut reader: LineReader = BufReader::new(read_half);
        let writer: LineWriter = Box::new(write_half);

        let greeting = read_line(&mut reader).await.map_err(|e| {
            let source = match e {
                TransportError::Io(err) => err,
                other => io::Error::new(io::ErrorKind::UnexpectedEof, other.to_string()),
            };
            ClientError::Connection {
                addr: peer.clone(),
                source,
            }
        })?;
        tracing::info!(peer = %peer, greeting = %greeting, "connected to game server");

        Ok(Self {
            io: Mutex::new(Some(Io {
                reader,
                writer,
                in_flight: false,
            })),
            peer,
            greeting,
        })
    }

    /// 服务器在连接建立时发送的欢迎行
    pub fn greeting(&self) -> &str {
        &self.greeting
    }

    pub fn peer(&self) -> &str {
        &self.peer
    }

    pub async fn is_closed(&self) -> bool {
        self.io.lock().await.is_none()
    }

    /// 关闭连接（幂等）；之后的 command 立即失败
    pub async fn close(&self) {
        let mut guard = self.io.lock().await;
        if let Some(mut io) = guard.take() {
            let _ = io.writer.shutdown().await;
            tracing::info!(peer = %self.peer, "connection closed");
        }
    }
}

#[async_trait]
impl CommandTransport for TcpClient {
    async fn command(&self, raw: &str) -> Result<String, ClientError> {
        let line = normalize_command(raw);

        let mut guard = self.io.lock().await;
        if guard.as_ref().is_some_and(|io| io.in_flight) {
            // 上一次调用在读到回复前被取消，配对关系已无法恢复
            tracing::warn!(peer = %self.peer, "abandoned request left connection unsynchronized");
            *guard = None;
        }
        let Some(io) = guard.as_mut() else {
            return Err(TransportError::Closed.into());
        };

        tracing::debug!(send = %line, "command");
        match io.round_trip(&line).await {
            Ok(reply) => {
                tracing::debug!(resp = %reply, "command");
                Ok(reply)
            }
            Err(e) => {
                tracing::warn!(peer = %self.peer, error = %e, "transport failure, closing connection");
                *guard = None;
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{duplex, AsyncReadExt, DuplexStream};

    async fn client_with_server() -> (TcpClient, BufReader<DuplexStream>) {
        let (client_end, mut server_end) = duplex(1024);
        server_end.write_all(b"welcome player red\n").await.unwrap();
        let client = TcpClient::from_stream(client_end, "duplex").await.unwrap();
        (client, BufReader::new(server_end))
    }

    #[tokio::test]
    async fn test_greeting_is_consumed() {
        let (client, _server) = client_with_server().await;
        assert_eq!(client.greeting(), "welcome player red");
        assert!(!client.is_closed().await);
    }

    #[tokio::test]
    async fn test_command_strips_terminators_before_sending() {
        let (client, mut server) = client_with_server().await;

        let server_task = tokio::spawn(async move {
            let mut line = String::new();
            server.read_line(&mut line).await.unwrap();
            server.get_mut().write_all(b"ok\r\n").await.unwrap();
            line
        });

        let reply = client.command("a\nb\rc").await.unwrap();
        assert_eq!(reply, "ok");
        assert_eq!(server_task.await.unwrap(), "abc\n");
    }

    #[tokio::test]
    async fn test_reply_keeps_leading_and_interior_whitespace() {
        let (client, mut server) = client_with_server().await;

        tokio::spawn(async move {
            let mut line = String::new();
            server.read_line(&mut line).await.unwrap();
            server.get_mut().write_all(b"  err:  tank  not found\r\n").await.unwrap();
            // 保持连接打开直到客户端读完
            let mut rest = Vec::new();
            let _ = server.read_to_end(&mut rest).await;
        });

        let reply = client.command("TankStatus 9").await.unwrap();
        assert_eq!(reply, "  err:  tank  not found");
    }

    #[tokio::test]
    async fn test_closed_before_greeting_is_connection_error() {
        let (client_end, server_end) = duplex(64);
        drop(server_end);
        let err = TcpClient::from_stream(client_end, "duplex").await.err().unwrap();
        assert!(matches!(err, ClientError::Connection { .. }));
    }

    #[tokio::test]
    async fn test_eof_mid_call_closes_connection_and_releases_lock() {
        let (client, mut server) = client_with_server().await;

        tokio::spawn(async move {
            let mut line = String::new();
            server.read_line(&mut line).await.unwrap();
            drop(server);
        });

        let err = client.command("GameStatus").await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Transport(TransportError::UnexpectedEof)
        ));

        let next = tokio::time::timeout(Duration::from_secs(1), client.command("MyName"))
            .await
            .expect("second caller must not deadlock");
        assert!(matches!(next, Err(ClientError::Transport(TransportError::Closed))));
        assert!(client.is_closed().await);
    }

    #[tokio::test]
    async fn test_partial_line_at_eof_is_transport_error() {
        let (client, mut server) = client_with_server().await;

        tokio::spawn(async move {
            let mut line = String::new();
            server.read_line(&mut line).await.unwrap();
            server.get_mut().write_all(b"{\"iteration\":").await.unwrap();
        });

        let err = client.command("GameStatus").await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Transport(TransportError::UnexpectedEof)
        ));
    }

    #[tokio::test]
    async fn test_abandoned_request_closes_connection() {
        let (client, server) = client_with_server().await;

        let abandoned =
            tokio::time::timeout(Duration::from_millis(50), client.command("GameStatus")).await;
        assert!(abandoned.is_err());

        let err = client.command("MyName").await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(TransportError::Closed)));
        drop(server);
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let (client, _server) = client_with_server().await;
        client.close().await;
        client.close().await;
        assert!(client.is_closed().await);
        let err = client.command("MyName").await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(TransportError::Closed)));
    }

    #[tokio::test]
    async fn test_connect_refused_is_connection_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let err = TcpClient::connect("127.0.0.1", port, Duration::from_secs(2))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, ClientError::Connection { .. }));
    }

    #[tokio::test]
    async fn test_silent_server_times_out_waiting_for_greeting() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(2)).await;
            drop(stream);
        });

        let err = TcpClient::connect("127.0.0.1", port, Duration::from_millis(200))
            .await
            .err()
            .unwrap();
        match err {
            ClientError::Connection { source, .. } => {
                assert_eq!(source.kind(), io::ErrorKind::TimedOut)
            }
            other => panic!("expected connection error, got {other:?}"),
        }
        server.abort();
    }
}
