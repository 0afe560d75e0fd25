//! Blocking client for the pigpio daemon.
//!
//! Talks to the daemon over its TCP socket protocol and reads pin-change
//! notifications from the side-channel pipe, without linking against the
//! daemon's native library. Everything is synchronous: one request is in
//! flight at a time, and the notification pipe is drained by polling
//! [`Notifier::tick`] on whatever cadence fits the application.
//!
//! # Example
//!
//! ```no_run
//! use pigpiod_client::{ClientResult, PwmSender, SocketClient};
//!
//! fn main() -> ClientResult<()> {
//!     let mut socket = SocketClient::localhost();
//!     let mut pwm = PwmSender::new(&mut socket);
//!     pwm.set_pulse_width(14, 1500)?;
//!     Ok(())
//! }
//! ```
//!
//! Multiple senders can share one connection by borrowing the socket in
//! turn; the protocol is strictly request/response in lockstep, so callers
//! needing concurrent access must serialize at a higher layer.

pub mod error;
pub mod event;
pub mod gpio;
pub mod notify;
pub mod pwm;
pub mod socket;
pub mod spi;
pub mod tracing;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{ClientError, ClientResult};
pub use event::{EventDecoder, GpioEvent, NotificationRecord, RECORD_SIZE};
pub use gpio::{GpioSender, PinMode, PullUpDown};
pub use notify::{Notifier, DEFAULT_PIPE_BASE};
pub use pwm::PwmSender;
pub use socket::{SocketClient, Transport, DEFAULT_PORT};
pub use spi::{BitBangSpiDevice, RegularSpiDevice, SpiDevice};
pub use tracing::{init_tracing, TracingConfig, TracingError, TracingOutputFormat};

pub use pigpiod_protocol as protocol;
pub use pigpiod_protocol::{Bitmap, Request, Response};
