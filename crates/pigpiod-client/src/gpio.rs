//! GPIO mode and level command sender.

use pigpiod_protocol::{Command, Request};

use crate::error::{ClientError, ClientResult};
use crate::socket::Transport;

/// Function assigned to a pin, with the daemon's numeric encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum PinMode {
    Input = 0,
    Output = 1,
    Alt5 = 2,
    Alt4 = 3,
    Alt0 = 4,
    Alt1 = 5,
    Alt2 = 6,
    Alt3 = 7,
}

impl PinMode {
    fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Input),
            1 => Some(Self::Output),
            2 => Some(Self::Alt5),
            3 => Some(Self::Alt4),
            4 => Some(Self::Alt0),
            5 => Some(Self::Alt1),
            6 => Some(Self::Alt2),
            7 => Some(Self::Alt3),
            _ => None,
        }
    }
}

/// Internal pull resistor setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum PullUpDown {
    Off = 0,
    Down = 1,
    Up = 2,
}

/// Sender for pin mode, pull and level commands.
pub struct GpioSender<T: Transport> {
    transport: T,
}

impl<T: Transport> GpioSender<T> {
    /// Creates a sender talking through the given transport.
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    fn exchange(&mut self, command: Command, p1: i32, p2: i32) -> ClientResult<i32> {
        let response = self.transport.send_raw(&Request::simple(command, p1, p2))?;
        if !response.is_successful() {
            return Err(ClientError::command_failure(command, response.status()));
        }
        Ok(response.status())
    }

    /// Assigns a mode to a pin.
    pub fn set_mode(&mut self, pin: u32, mode: PinMode) -> ClientResult<()> {
        self.exchange(Command::Modes, pin as i32, mode as i32).map(|_| ())
    }

    /// Reads the mode of a pin.
    pub fn get_mode(&mut self, pin: u32) -> ClientResult<PinMode> {
        let code = self.exchange(Command::Modeg, pin as i32, 0)?;
        PinMode::from_code(code).ok_or_else(|| ClientError::command_failure(Command::Modeg, code))
    }

    /// Sets the internal pull resistor of a pin.
    pub fn set_pull(&mut self, pin: u32, pull: PullUpDown) -> ClientResult<()> {
        self.exchange(Command::Pud, pin as i32, pull as i32).map(|_| ())
    }

    /// Reads the level of a pin.
    pub fn read(&mut self, pin: u32) -> ClientResult<bool> {
        Ok(self.exchange(Command::Read, pin as i32, 0)? != 0)
    }

    /// Drives a pin high or low.
    pub fn write(&mut self, pin: u32, level: bool) -> ClientResult<()> {
        self.exchange(Command::Write, pin as i32, i32::from(level)).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedTransport;
    use pigpiod_protocol::Response;

    #[test]
    fn set_mode_request_shape() {
        let mut transport = ScriptedTransport::new([Response::new(0)]);
        GpioSender::new(&mut transport).set_mode(14, PinMode::Output).unwrap();
        assert_eq!(
            transport.requests,
            vec![Request::simple(Command::Modes, 14, 1)]
        );
    }

    #[test]
    fn set_mode_bad_mode() {
        let mut transport = ScriptedTransport::new([Response::new(-4)]);
        let err = GpioSender::new(&mut transport)
            .set_mode(14, PinMode::Alt3)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "MODES command failed => bad mode given (status code -4)"
        );
    }

    #[test]
    fn get_mode_decodes_daemon_value() {
        let mut transport = ScriptedTransport::new([Response::new(4)]);
        let mode = GpioSender::new(&mut transport).get_mode(14).unwrap();
        assert_eq!(mode, PinMode::Alt0);
    }

    #[test]
    fn read_maps_level_to_bool() {
        let mut transport = ScriptedTransport::new([Response::new(1), Response::new(0)]);
        let mut sender = GpioSender::new(&mut transport);
        assert!(sender.read(7).unwrap());
        assert!(!sender.read(7).unwrap());
    }

    #[test]
    fn read_bad_pin() {
        let mut transport = ScriptedTransport::new([Response::new(-3)]);
        let err = GpioSender::new(&mut transport).read(60).unwrap_err();
        assert_eq!(
            err.to_string(),
            "READ command failed => bad GPIO pin given (status code -3)"
        );
    }

    #[test]
    fn write_request_shape() {
        let mut transport = ScriptedTransport::new([Response::new(0), Response::new(0)]);
        let mut sender = GpioSender::new(&mut transport);
        sender.write(14, true).unwrap();
        sender.write(14, false).unwrap();
        drop(sender);
        assert_eq!(
            transport.requests,
            vec![
                Request::simple(Command::Write, 14, 1),
                Request::simple(Command::Write, 14, 0),
            ]
        );
    }

    #[test]
    fn set_pull_request_shape() {
        let mut transport = ScriptedTransport::new([Response::new(0)]);
        GpioSender::new(&mut transport).set_pull(14, PullUpDown::Up).unwrap();
        assert_eq!(
            transport.requests,
            vec![Request::simple(Command::Pud, 14, 2)]
        );
    }
}
