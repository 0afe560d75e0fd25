//! PWM and servo command sender.

use pigpiod_protocol::{Command, Request};

use crate::error::{ClientError, ClientResult};
use crate::socket::Transport;

/// Sender for PWM, range, frequency and servo pulse-width commands.
///
/// A thin command builder: parameters are forwarded as-is and validation is
/// the daemon's job, so out-of-range values come back as classified command
/// failures rather than local errors.
pub struct PwmSender<T: Transport> {
    transport: T,
}

impl<T: Transport> PwmSender<T> {
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

    /// Sets the servo pulse width (microseconds) on a pin.
    pub fn set_pulse_width(&mut self, pin: u32, pulse_width: i32) -> ClientResult<()> {
        self.exchange(Command::Servo, pin as i32, pulse_width).map(|_| ())
    }

    /// Reads the servo pulse width (microseconds) of a pin.
    pub fn get_pulse_width(&mut self, pin: u32) -> ClientResult<i32> {
        self.exchange(Command::Gpw, pin as i32, 0)
    }

    /// Sets the PWM dutycycle on a pin.
    pub fn set_duty_cycle(&mut self, pin: u32, duty_cycle: i32) -> ClientResult<()> {
        self.exchange(Command::Pwm, pin as i32, duty_cycle).map(|_| ())
    }

    /// Reads the PWM dutycycle of a pin.
    pub fn get_duty_cycle(&mut self, pin: u32) -> ClientResult<i32> {
        self.exchange(Command::Gdc, pin as i32, 0)
    }

    /// Sets the PWM range of a pin.
    pub fn set_range(&mut self, pin: u32, range: i32) -> ClientResult<()> {
        self.exchange(Command::Prs, pin as i32, range).map(|_| ())
    }

    /// Reads the PWM range of a pin.
    pub fn get_range(&mut self, pin: u32) -> ClientResult<i32> {
        self.exchange(Command::Prg, pin as i32, 0)
    }

    /// Sets the PWM frequency of a pin, returning the frequency actually
    /// selected by the daemon.
    pub fn set_frequency(&mut self, pin: u32, frequency: i32) -> ClientResult<i32> {
        self.exchange(Command::Pfs, pin as i32, frequency)
    }

    /// Reads the PWM frequency of a pin.
    pub fn get_frequency(&mut self, pin: u32) -> ClientResult<i32> {
        self.exchange(Command::Pfg, pin as i32, 0)
    }
}
