//! Blocking TCP client for the daemon socket.

use std::net::TcpStream;

use tracing::{debug, warn};

use pigpiod_protocol::{FrameReader, FrameWriter, Request, Response};

use crate::error::{ClientError, ClientResult};

/// Port the daemon listens on by default.
pub const DEFAULT_PORT: u16 = 8888;

/// The request/response seam between command senders and the socket.
///
/// One exchange is in flight at a time; implementations are not safe for
/// concurrent invocation without external serialization.
pub trait Transport {
    /// Sends one encoded request and blocks for exactly one response.
    fn send_raw(&mut self, request: &Request) -> ClientResult<Response>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn send_raw(&mut self, request: &Request) -> ClientResult<Response> {
        (**self).send_raw(request)
    }
}

/// Client owning the persistent daemon connection.
///
/// Connects lazily on the first exchange and reuses the connection until an
/// IO error tears it down; the next exchange reconnects. Connection failures
/// fail fast; retry policy belongs to the caller.
pub struct SocketClient {
    addr: String,
    stream: Option<TcpStream>,
}

impl SocketClient {
    /// Creates a client for the given `host:port` address.
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            stream: None,
        }
    }

    /// Creates a client for a daemon on the local machine's default port.
    pub fn localhost() -> Self {
        Self::new(format!("127.0.0.1:{DEFAULT_PORT}"))
    }

    /// The configured daemon address.
    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Whether a connection is currently established.
    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    /// Drops the current connection, if any.
    pub fn disconnect(&mut self) {
        self.stream = None;
    }

    fn ensure_connected(&mut self) -> ClientResult<&mut TcpStream> {
        if self.stream.is_none() {
            debug!(addr = %self.addr, "connecting to daemon");
            let stream = TcpStream::connect(&self.addr).map_err(|e| {
                ClientError::Connection(format!("failed to connect to {}: {}", self.addr, e))
            })?;
            stream.set_nodelay(true)?;
            self.stream = Some(stream);
        }
        self.stream
            .as_mut()
            .ok_or_else(|| ClientError::Connection("connection lost".into()))
    }

    fn exchange(stream: &mut TcpStream, request: &Request) -> ClientResult<Response> {
        FrameWriter::new(&mut *stream).write_request(request)?;

        let (header, response) = FrameReader::new(&mut *stream).read_response(request.reply_format)?;
        if header.command != request.command.code() || header.p1 != request.p1 as u32 {
            warn!(
                command = %request.command,
                echoed = header.command,
                "response echo does not match request"
            );
        }
        debug!(command = %request.command, status = response.status(), "exchange complete");
        Ok(response)
    }
}

impl Transport for SocketClient {
    fn send_raw(&mut self, request: &Request) -> ClientResult<Response> {
        let stream = self.ensure_connected()?;
        match Self::exchange(stream, request) {
            Ok(response) => Ok(response),
            Err(err) => {
                // A failed exchange leaves the stream in an unknown framing
                // state; reconnect on the next call.
                self.disconnect();
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pigpiod_protocol::{encode_request, Command, ElementKind, RESPONSE_HEADER_SIZE};
    use std::io::{Read, Write};
    use std::net::{SocketAddr, TcpListener};
    use std::thread::JoinHandle;

    /// One accepted connection serving scripted response frames, capturing
    /// each request's raw bytes.
    fn spawn_daemon(responses: Vec<Vec<u8>>) -> (SocketAddr, JoinHandle<Vec<Vec<u8>>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut captured = Vec::new();
            for response in responses {
                let mut header = [0u8; 16];
                stream.read_exact(&mut header).unwrap();
                let ext_len = u32::from_le_bytes([header[12], header[13], header[14], header[15]]);
                let mut request = header.to_vec();
                if ext_len > 0 {
                    let mut ext = vec![0u8; ext_len as usize];
                    stream.read_exact(&mut ext).unwrap();
                    request.extend_from_slice(&ext);
                }
                captured.push(request);
                stream.write_all(&response).unwrap();
            }
            captured
        });
        (addr, handle)
    }

    fn response_frame(command: u32, p1: u32, status: i32, ext: &[u8]) -> Vec<u8> {
        let mut frame = Vec::with_capacity(RESPONSE_HEADER_SIZE + ext.len());
        frame.extend_from_slice(&command.to_le_bytes());
        frame.extend_from_slice(&p1.to_le_bytes());
        frame.extend_from_slice(&status.to_le_bytes());
        frame.extend_from_slice(ext);
        frame
    }

    #[test]
    fn simple_exchange() {
        let (addr, daemon) = spawn_daemon(vec![response_frame(8, 14, 0, &[])]);
        let mut client = SocketClient::new(addr.to_string());

        let request = Request::simple(Command::Servo, 14, 1700);
        let response = client.send_raw(&request).unwrap();
        assert_eq!(response, Response::new(0));

        let captured = daemon.join().unwrap();
        assert_eq!(captured, vec![encode_request(&request)]);
    }

    #[test]
    fn extension_reply_exchange() {
        let (addr, daemon) = spawn_daemon(vec![response_frame(73, 49, 2, &[64, 128])]);
        let mut client = SocketClient::new(addr.to_string());

        let request = Request::simple(Command::Spir, 49, 2).expecting_reply(ElementKind::U8);
        let response = client.send_raw(&request).unwrap();
        assert_eq!(response.extension_values(), vec![64, 128]);
        daemon.join().unwrap();
    }

    #[test]
    fn negative_status_passes_through() {
        let (addr, daemon) = spawn_daemon(vec![response_frame(8, 50, -2, &[])]);
        let mut client = SocketClient::new(addr.to_string());

        let response = client.send_raw(&Request::simple(Command::Servo, 50, 1500)).unwrap();
        assert_eq!(response.status(), -2);
        daemon.join().unwrap();
    }

    #[test]
    fn connection_reused_across_exchanges() {
        let (addr, daemon) = spawn_daemon(vec![
            response_frame(8, 14, 0, &[]),
            response_frame(5, 14, 0, &[]),
        ]);
        let mut client = SocketClient::new(addr.to_string());

        client.send_raw(&Request::simple(Command::Servo, 14, 1700)).unwrap();
        assert!(client.is_connected());
        client.send_raw(&Request::simple(Command::Pwm, 14, 150)).unwrap();

        // Both requests arrived on the single accepted connection.
        assert_eq!(daemon.join().unwrap().len(), 2);
    }

    #[test]
    fn connection_refused_fails_fast() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let mut client = SocketClient::new(addr.to_string());
        let result = client.send_raw(&Request::simple(Command::Servo, 14, 1700));
        assert!(matches!(result, Err(ClientError::Connection(_))));
        assert!(!client.is_connected());
    }

    #[test]
    fn short_response_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let daemon = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut header = [0u8; 16];
            stream.read_exact(&mut header).unwrap();
            stream.write_all(&[8, 0, 0, 0, 14, 0]).unwrap();
        });

        let mut client = SocketClient::new(addr.to_string());
        let result = client.send_raw(&Request::simple(Command::Servo, 14, 1700));
        assert!(matches!(result, Err(ClientError::Io(_))));
        assert!(!client.is_connected());
        daemon.join().unwrap();
    }
}
