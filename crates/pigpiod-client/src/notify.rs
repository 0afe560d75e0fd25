//! Notification channel over the daemon's side-channel pipe.
//!
//! The daemon hands out a numeric notification handle and writes fixed-size
//! records to a pipe whose path is derived from that handle. The socket is
//! only used for the lifecycle exchanges (open, begin, pause, cancel); the
//! record stream is pulled from the pipe by polling `tick()` on whatever
//! cadence the caller chooses.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::debug;

use pigpiod_protocol::{Bitmap, Command, Request};

use crate::error::{ClientError, ClientResult};
use crate::event::{EventDecoder, GpioEvent, NotificationRecord, RECORD_SIZE};
use crate::socket::Transport;

/// Pipe path prefix the daemon uses on the local machine.
pub const DEFAULT_PIPE_BASE: &str = "/dev/pigpio";

/// Callback invoked once per decoded event, in stream order.
pub type EventHandler = Box<dyn FnMut(&GpioEvent)>;

/// Pin-change notification channel.
///
/// Lifecycle: closed until `open()` fetches a handle and opens the pipe;
/// `start()` begins monitoring a pin set and registers the handler;
/// `pause()` and a repeated `start()` toggle monitoring without giving up
/// the handle; `cancel()` releases everything. `tick()` drains the pipe
/// while started.
pub struct Notifier<T: Transport> {
    transport: T,
    pipe_base: PathBuf,
    handle: Option<u32>,
    pipe: Option<File>,
    carry: Vec<u8>,
    decoder: EventDecoder,
    handler: Option<EventHandler>,
    started: bool,
    paused: bool,
}

impl<T: Transport> Notifier<T> {
    /// Creates a closed channel talking through the given transport.
    ///
    /// `pipe_base` is the path prefix the daemon's numeric handle is
    /// appended to, e.g. `/dev/pigpio`.
    pub fn new(transport: T, pipe_base: impl Into<PathBuf>) -> Self {
        Self {
            transport,
            pipe_base: pipe_base.into(),
            handle: None,
            pipe: None,
            carry: Vec::new(),
            decoder: EventDecoder::new(Bitmap::default()),
            handler: None,
            started: false,
            paused: false,
        }
    }

    /// Whether a notification handle is held.
    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    /// Whether monitoring is active.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Whether monitoring is paused.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// The daemon-assigned handle, while open.
    pub fn handle(&self) -> Option<u32> {
        self.handle
    }

    fn pipe_path(&self, handle: u32) -> PathBuf {
        PathBuf::from(format!("{}{}", self.pipe_base.display(), handle))
    }

    /// Fetches a notification handle and opens its pipe for reading.
    ///
    /// Idempotent while a handle is held. If the daemon hands out a handle
    /// but the pipe path cannot be opened, the channel stays closed and the
    /// error names the path.
    pub fn open(&mut self) -> ClientResult<()> {
        if self.handle.is_some() {
            return Ok(());
        }

        let response = self.transport.send_raw(&Request::simple(Command::No, 0, 0))?;
        if !response.is_successful() {
            return Err(ClientError::OpeningFailed {
                code: response.status(),
            });
        }

        let handle = response.status() as u32;
        let path = self.pipe_path(handle);
        let pipe = open_pipe(&path).map_err(|source| ClientError::OpeningPipeFailed {
            path: path.clone(),
            source,
        })?;
        debug!(handle, path = %path.display(), "notification handle opened");

        self.handle = Some(handle);
        self.pipe = Some(pipe);
        self.carry.clear();
        Ok(())
    }

    /// Begins (or reconfigures) monitoring for the given pins.
    ///
    /// Replaces the active handler. Allowed while started or paused; a
    /// restart re-issues the begin-monitoring exchange with the new mask.
    pub fn start<F>(&mut self, pins: Bitmap, handler: F) -> ClientResult<()>
    where
        F: FnMut(&GpioEvent) + 'static,
    {
        let handle = self.handle.ok_or(ClientError::HandleMissing)?;
        if self.pipe.is_none() {
            return Err(ClientError::BrokenPipe);
        }

        let request = Request::simple(Command::Nb, handle as i32, pins.mask() as i32);
        let response = self.transport.send_raw(&request)?;
        if !response.is_successful() {
            return Err(ClientError::BeginFailed {
                code: response.status(),
            });
        }
        debug!(handle, mask = pins.mask(), "notification monitoring started");

        self.decoder.set_subscription(pins);
        self.handler = Some(Box::new(handler));
        self.started = true;
        self.paused = false;
        Ok(())
    }

    /// Pauses monitoring; a no-op unless currently started.
    pub fn pause(&mut self) -> ClientResult<()> {
        if !self.started {
            return Ok(());
        }
        let handle = self.handle.ok_or(ClientError::HandleMissing)?;
        if self.pipe.is_none() {
            return Err(ClientError::BrokenPipe);
        }

        let response = self
            .transport
            .send_raw(&Request::simple(Command::Np, handle as i32, 0))?;
        if !response.is_successful() {
            return Err(ClientError::PauseFailed {
                code: response.status(),
            });
        }

        self.started = false;
        self.paused = true;
        Ok(())
    }

    /// Cancels the handle and resets the channel; a no-op when closed.
    ///
    /// Local state is released only when the daemon confirms the cancel; a
    /// failed exchange surfaces the daemon error and leaves the channel
    /// untouched so the caller can retry.
    pub fn cancel(&mut self) -> ClientResult<()> {
        let Some(handle) = self.handle else {
            return Ok(());
        };

        let response = self
            .transport
            .send_raw(&Request::simple(Command::Nc, handle as i32, 0))?;
        if !response.is_successful() {
            return Err(ClientError::CancelFailed {
                code: response.status(),
            });
        }
        debug!(handle, "notification handle canceled");

        self.handle = None;
        self.pipe = None;
        self.carry.clear();
        self.handler = None;
        self.started = false;
        self.paused = false;
        Ok(())
    }

    /// Drains currently available pipe bytes and dispatches complete
    /// records to the handler, retaining any trailing partial record.
    ///
    /// Non-blocking: zero available bytes is a successful no-op. Requires
    /// monitoring to be started.
    pub fn tick(&mut self) -> ClientResult<()> {
        if !self.started {
            return Err(ClientError::NotStarted);
        }
        let Some(pipe) = self.pipe.as_mut() else {
            return Err(ClientError::BrokenPipe);
        };

        let mut chunk = [0u8; 512];
        loop {
            match pipe.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => self.carry.extend_from_slice(&chunk[..n]),
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => break,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }

        let mut offset = 0;
        while self.carry.len() - offset >= RECORD_SIZE {
            let mut bytes = [0u8; RECORD_SIZE];
            bytes.copy_from_slice(&self.carry[offset..offset + RECORD_SIZE]);
            offset += RECORD_SIZE;

            let record = NotificationRecord::decode(&bytes);
            for event in self.decoder.decode(&record) {
                if let Some(handler) = self.handler.as_mut() {
                    handler(&event);
                }
            }
        }
        self.carry.drain(..offset);
        Ok(())
    }
}

#[cfg(unix)]
fn open_pipe(path: &Path) -> std::io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;

    std::fs::OpenOptions::new()
        .read(true)
        .custom_flags(libc::O_NONBLOCK)
        .open(path)
}

#[cfg(not(unix))]
fn open_pipe(path: &Path) -> std::io::Result<File> {
    std::fs::OpenOptions::new().read(true).open(path)
}
