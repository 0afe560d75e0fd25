//! SPI device senders.
//!
//! Two variants share one surface: the hardware SPI peripheral addressed by
//! channel and handle, and the bit-bang implementation addressed by its
//! chip-select pin. Both are thin command builders; parameter validation is
//! the daemon's job.

use pigpiod_protocol::{Command, ElementKind, Extension, Request, Response};

use crate::error::{ClientError, ClientResult};
use crate::socket::Transport;

/// Operations shared by every SPI device variant.
pub trait SpiDevice {
    /// Whether the device currently holds daemon-side resources.
    fn is_open(&self) -> bool;

    /// Acquires the device; idempotent while open.
    fn open(&mut self) -> ClientResult<()>;

    /// Releases the device; a no-op while not open.
    fn close(&mut self) -> ClientResult<()>;

    /// Writes `data` while reading the same number of bytes back.
    fn cross_transfer(&mut self, data: &[u8]) -> ClientResult<Vec<u8>>;
}

fn ensure_open(is_open: bool, operation: &'static str) -> ClientResult<()> {
    if is_open {
        Ok(())
    } else {
        Err(ClientError::DeviceNotOpen { operation })
    }
}

fn require_handle(handle: Option<u32>, operation: &'static str) -> ClientResult<i32> {
    handle
        .map(|h| h as i32)
        .ok_or(ClientError::DeviceNotOpen { operation })
}

fn check_status(command: Command, response: &Response) -> ClientResult<i32> {
    if response.is_successful() {
        Ok(response.status())
    } else {
        Err(ClientError::command_failure(command, response.status()))
    }
}

fn reply_bytes(response: &Response) -> Vec<u8> {
    response.extension_values().into_iter().map(|v| v as u8).collect()
}

/// Builds the optional data extension for a write or transfer.
///
/// Empty data is sent without an extension so the daemon reports the bad
/// count itself.
fn data_extension(data: &[u8]) -> ClientResult<Option<Extension>> {
    if data.is_empty() {
        Ok(None)
    } else {
        Ok(Some(Extension::bytes(data)?))
    }
}

fn transfer_request(
    command: Command,
    p1: i32,
    data: &[u8],
) -> ClientResult<Request> {
    let mut request = match data_extension(data)? {
        Some(extension) => Request::with_extension(command, p1, 0, extension),
        None => Request::simple(command, p1, 0),
    };
    request = request.expecting_reply(ElementKind::U8);
    Ok(request)
}

/// Hardware SPI device on one of the daemon's SPI channels.
pub struct RegularSpiDevice<T: Transport> {
    transport: T,
    channel: u32,
    baud: u32,
    flags: u32,
    handle: Option<u32>,
}

impl<T: Transport> RegularSpiDevice<T> {
    /// Creates a closed device for the given channel and baud rate.
    ///
    /// `flags` are the daemon's SPI mode/wire flags; zero for the default
    /// configuration.
    pub fn new(transport: T, channel: u32, baud: u32, flags: u32) -> Self {
        Self {
            transport,
            channel,
            baud,
            flags,
            handle: None,
        }
    }

    /// The daemon-assigned handle, while open.
    pub fn handle(&self) -> Option<u32> {
        self.handle
    }

    /// The configured SPI channel.
    pub fn channel(&self) -> u32 {
        self.channel
    }

    /// The configured baud rate.
    pub fn baud(&self) -> u32 {
        self.baud
    }

    /// Reads `count` bytes from the device.
    pub fn read(&mut self, count: i32) -> ClientResult<Vec<u8>> {
        let handle = require_handle(self.handle, "reading")?;
        let request = Request::simple(Command::Spir, handle, count).expecting_reply(ElementKind::U8);
        let response = self.transport.send_raw(&request)?;
        check_status(Command::Spir, &response)?;
        Ok(reply_bytes(&response))
    }

    /// Writes `data` to the device.
    pub fn write(&mut self, data: &[u8]) -> ClientResult<()> {
        let handle = require_handle(self.handle, "writing")?;
        let request = match data_extension(data)? {
            Some(extension) => Request::with_extension(Command::Spiw, handle, 0, extension),
            None => Request::simple(Command::Spiw, handle, 0),
        };
        let response = self.transport.send_raw(&request)?;
        check_status(Command::Spiw, &response)?;
        Ok(())
    }
}

impl<T: Transport> SpiDevice for RegularSpiDevice<T> {
    fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    fn open(&mut self) -> ClientResult<()> {
        if self.handle.is_some() {
            return Ok(());
        }
        let extension = Extension::new(ElementKind::U32, vec![self.flags])?;
        let request = Request::with_extension(
            Command::Spio,
            self.channel as i32,
            self.baud as i32,
            extension,
        );
        let response = self.transport.send_raw(&request)?;
        let handle = check_status(Command::Spio, &response)?;
        self.handle = Some(handle as u32);
        Ok(())
    }

    fn close(&mut self) -> ClientResult<()> {
        let Some(handle) = self.handle else {
            return Ok(());
        };
        let response = self
            .transport
            .send_raw(&Request::simple(Command::Spic, handle as i32, 0))?;
        check_status(Command::Spic, &response)?;
        self.handle = None;
        Ok(())
    }

    fn cross_transfer(&mut self, data: &[u8]) -> ClientResult<Vec<u8>> {
        let handle = require_handle(self.handle, "cross transfer")?;
        let request = transfer_request(Command::Spix, handle, data)?;
        let response = self.transport.send_raw(&request)?;
        check_status(Command::Spix, &response)?;
        Ok(reply_bytes(&response))
    }
}

/// Bit-bang SPI device driven on arbitrary pins, addressed by its
/// chip-select pin.
pub struct BitBangSpiDevice<T: Transport> {
    transport: T,
    cs: u32,
    miso: u32,
    mosi: u32,
    sclk: u32,
    baud: u32,
    flags: u32,
    open: bool,
}

impl<T: Transport> BitBangSpiDevice<T> {
    /// Creates a closed device on the given pins.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        transport: T,
        cs: u32,
        miso: u32,
        mosi: u32,
        sclk: u32,
        baud: u32,
        flags: u32,
    ) -> Self {
        Self {
            transport,
            cs,
            miso,
            mosi,
            sclk,
            baud,
            flags,
            open: false,
        }
    }

    /// The chip-select pin identifying this device.
    pub fn chip_select(&self) -> u32 {
        self.cs
    }
}

impl<T: Transport> SpiDevice for BitBangSpiDevice<T> {
    fn is_open(&self) -> bool {
        self.open
    }

    fn open(&mut self) -> ClientResult<()> {
        if self.open {
            return Ok(());
        }
        let extension = Extension::new(
            ElementKind::U32,
            vec![self.miso, self.mosi, self.sclk, self.baud, self.flags],
        )?;
        let request = Request::with_extension(Command::Bspio, self.cs as i32, 0, extension);
        let response = self.transport.send_raw(&request)?;
        check_status(Command::Bspio, &response)?;
        self.open = true;
        Ok(())
    }

    fn close(&mut self) -> ClientResult<()> {
        if !self.open {
            return Ok(());
        }
        let response = self
            .transport
            .send_raw(&Request::simple(Command::Bspic, self.cs as i32, 0))?;
        check_status(Command::Bspic, &response)?;
        self.open = false;
        Ok(())
    }

    fn cross_transfer(&mut self, data: &[u8]) -> ClientResult<Vec<u8>> {
        ensure_open(self.open, "cross transfer")?;
        let request = transfer_request(Command::Bspix, self.cs as i32, data)?;
        let response = self.transport.send_raw(&request)?;
        check_status(Command::Bspix, &response)?;
        Ok(reply_bytes(&response))
    }
}
