//! Redis Gateway
//!
//! Opens a connection per operation against the configured Redis host.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, AsyncConnectionConfig, Client, RedisResult};
use tracing::debug;

use super::TaskCache;
use crate::config::Config;
use crate::error::{Result, ServiceError};

// == Redis Gateway ==
/// [`TaskCache`] backed by Redis.
///
/// Connect and every command share one timeout. A command that times out is
/// reissued once on the same connection before the call fails. The client's
/// own connect/response timeouts are switched off so only this one applies.
#[derive(Debug, Clone)]
pub struct RedisGateway {
    client: Client,
    timeout: Duration,
}

impl RedisGateway {
    /// Validates the URL; no connection is made until the first command.
    pub fn new(redis_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::open(redis_url)?;
        Ok(Self { client, timeout })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.redis_url(), config.timeout)
    }

    async fn connect(&self) -> Result<MultiplexedConnection> {
        let config = AsyncConnectionConfig::new()
            .set_connection_timeout(None)
            .set_response_timeout(None);

        tokio::time::timeout(
            self.timeout,
            self.client.get_multiplexed_async_connection_with_config(&config),
        )
        .await
        .map_err(|_| self.timed_out("connecting to redis"))?
        .map_err(ServiceError::from)
    }

    // The connection is dropped, and thereby closed, when this returns.
    async fn issue<T, F, Fut>(&self, mut command: F) -> Result<T>
    where
        F: FnMut(MultiplexedConnection) -> Fut,
        Fut: Future<Output = RedisResult<T>>,
    {
        let conn = self.connect().await?;

        match tokio::time::timeout(self.timeout, command(conn.clone())).await {
            Ok(reply) => reply.map_err(ServiceError::from),
            Err(_) => {
                debug!("Redis command timed out, reissuing once");
                tokio::time::timeout(self.timeout, command(conn))
                    .await
                    .map_err(|_| self.timed_out("waiting for redis reply"))?
                    .map_err(ServiceError::from)
            }
        }
    }

    fn timed_out(&self, what: &str) -> ServiceError {
        ServiceError::Connection(format!("timed out after {:?} {}", self.timeout, what))
    }
}

#[async_trait]
impl TaskCache for RedisGateway {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.issue(|mut conn| {
            let key = key.to_owned();
            async move { conn.get(key).await }
        })
        .await
    }

    async fn set_ex(&self, key: &str, ttl_seconds: u64, value: &str) -> Result<()> {
        self.issue::<(), _, _>(|mut conn| {
            let key = key.to_owned();
            let value = value.to_owned();
            async move { conn.set_ex(key, value, ttl_seconds).await }
        })
        .await
    }

    async fn ping(&self) -> Result<bool> {
        let reply = self
            .issue(|mut conn| async move {
                redis::cmd("PING").query_async::<String>(&mut conn).await
            })
            .await?;

        Ok(reply == "PONG")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Instant;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    // == Stand-in Server ==
    /// How the stand-in server answers PING
    #[derive(Clone, Copy)]
    enum PingReply {
        After(Duration),
        Never,
    }

    /// Name of the first complete RESP command in `buf` and its encoded length.
    fn parse_command(buf: &[u8]) -> Option<(String, usize)> {
        fn line(buf: &[u8], from: usize) -> Option<(&[u8], usize)> {
            let end = buf[from..].windows(2).position(|w| w == b"\r\n")? + from;
            Some((&buf[from..end], end + 2))
        }

        let (header, mut pos) = line(buf, 0)?;
        let count: usize = std::str::from_utf8(header.strip_prefix(b"*")?)
            .ok()?
            .parse()
            .ok()?;

        let mut name = None;
        for _ in 0..count {
            let (len_line, start) = line(buf, pos)?;
            let len: usize = std::str::from_utf8(len_line.strip_prefix(b"$")?)
                .ok()?
                .parse()
                .ok()?;
            let end = start + len;
            if buf.len() < end + 2 {
                return None;
            }
            name.get_or_insert_with(|| String::from_utf8_lossy(&buf[start..end]).into_owned());
            pos = end + 2;
        }

        Some((name?, pos))
    }

    /// Answers handshake commands with +OK and PING as told; counts PINGs.
    async fn spawn_fake_redis(reply: PingReply) -> (String, Arc<AtomicUsize>) {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("redis://{}/0", listener.local_addr().unwrap());
        let pings = Arc::new(AtomicUsize::new(0));
        let counter = pings.clone();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let counter = counter.clone();
                tokio::spawn(async move {
                    let mut buf = Vec::new();
                    let mut chunk = [0u8; 1024];
                    loop {
                        let n = match socket.read(&mut chunk).await {
                            Ok(0) | Err(_) => return,
                            Ok(n) => n,
                        };
                        buf.extend_from_slice(&chunk[..n]);

                        while let Some((command, used)) = parse_command(&buf) {
                            buf.drain(..used);
                            if !command.eq_ignore_ascii_case("PING") {
                                if socket.write_all(b"+OK\r\n").await.is_err() {
                                    return;
                                }
                                continue;
                            }

                            counter.fetch_add(1, Ordering::SeqCst);
                            if let PingReply::After(delay) = reply {
                                tokio::time::sleep(delay).await;
                                if socket.write_all(b"+PONG\r\n").await.is_err() {
                                    return;
                                }
                            }
                        }
                    }
                });
            }
        });

        (url, pings)
    }

    /// Accepts sockets and never writes a byte.
    async fn spawn_silent_server() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("redis://{}/0", listener.local_addr().unwrap());

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                tokio::spawn(async move {
                    let mut chunk = [0u8; 1024];
                    while let Ok(n) = socket.read(&mut chunk).await {
                        if n == 0 {
                            return;
                        }
                    }
                });
            }
        });

        url
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        let result = RedisGateway::new("not a url", Duration::from_secs(1));
        assert!(matches!(result, Err(ServiceError::Connection(_))));
    }

    #[test]
    fn test_parse_command() {
        let encoded = b"*2\r\n$4\r\nPING\r\n$2\r\nhi\r\n*1";
        assert_eq!(parse_command(encoded), Some(("PING".to_string(), 22)));
        assert_eq!(parse_command(b"*1\r\n$4\r\nPI"), None);
    }

    #[tokio::test]
    async fn test_unreachable_redis_is_connection_error() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let gateway =
            RedisGateway::new(&format!("redis://127.0.0.1:{}/0", port), Duration::from_secs(2))
                .unwrap();

        assert!(matches!(gateway.ping().await, Err(ServiceError::Connection(_))));
        assert!(matches!(gateway.get("tasks").await, Err(ServiceError::Connection(_))));
    }

    #[tokio::test]
    async fn test_slow_reply_within_timeout_succeeds() {
        // Slower than the client library's built-in response timeout
        let (url, pings) = spawn_fake_redis(PingReply::After(Duration::from_millis(800))).await;
        let gateway = RedisGateway::new(&url, Duration::from_secs(2)).unwrap();

        assert!(gateway.ping().await.unwrap());
        assert_eq!(pings.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_timed_out_command_is_sent_twice() {
        let (url, pings) = spawn_fake_redis(PingReply::Never).await;
        let gateway = RedisGateway::new(&url, Duration::from_millis(300)).unwrap();
        let started = Instant::now();

        let result = gateway.ping().await;

        assert!(matches!(result, Err(ServiceError::Connection(ref msg)) if msg.contains("reply")));
        assert!(started.elapsed() >= Duration::from_millis(600));
        assert_eq!(pings.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_connect_waits_for_full_timeout() {
        let url = spawn_silent_server().await;
        // Longer than the client library's built-in connection timeout
        let gateway = RedisGateway::new(&url, Duration::from_millis(1500)).unwrap();
        let started = Instant::now();

        let result = gateway.ping().await;

        assert!(
            matches!(result, Err(ServiceError::Connection(ref msg)) if msg.contains("connecting"))
        );
        assert!(started.elapsed() >= Duration::from_millis(1500));
    }
}
