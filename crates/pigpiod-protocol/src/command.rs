//! Socket command codes understood by the pigpio daemon.

use std::fmt;

/// Commands this client issues, with the daemon's numeric codes.
///
/// The daemon defines many more; only the ones this client builds requests
/// for are listed. The uppercase name is the one the daemon's documentation
/// uses and is what failure messages are keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Command {
    /// Set a GPIO mode.
    Modes = 0,
    /// Get a GPIO mode.
    Modeg = 1,
    /// Set a GPIO pull-up/down.
    Pud = 2,
    /// Read a GPIO level.
    Read = 3,
    /// Write a GPIO level.
    Write = 4,
    /// Set a PWM dutycycle.
    Pwm = 5,
    /// Set a PWM range.
    Prs = 6,
    /// Set a PWM frequency.
    Pfs = 7,
    /// Set a servo pulse width.
    Servo = 8,
    /// Open a notification handle.
    No = 18,
    /// Begin notifications on a handle.
    Nb = 19,
    /// Pause notifications on a handle.
    Np = 20,
    /// Cancel a notification handle.
    Nc = 21,
    /// Get a PWM range.
    Prg = 22,
    /// Get a PWM frequency.
    Pfg = 23,
    /// Open an SPI device.
    Spio = 71,
    /// Close an SPI device.
    Spic = 72,
    /// Read from an SPI device.
    Spir = 73,
    /// Write to an SPI device.
    Spiw = 74,
    /// Transfer to and from an SPI device.
    Spix = 75,
    /// Get a PWM dutycycle.
    Gdc = 83,
    /// Get a servo pulse width.
    Gpw = 84,
    /// Close a bit-bang SPI device.
    Bspic = 111,
    /// Open a bit-bang SPI device.
    Bspio = 112,
    /// Transfer to and from a bit-bang SPI device.
    Bspix = 113,
}

impl Command {
    /// The numeric code sent on the wire.
    pub fn code(self) -> u32 {
        self as u32
    }

    /// The daemon's name for this command, as used in failure messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::Modes => "MODES",
            Self::Modeg => "MODEG",
            Self::Pud => "PUD",
            Self::Read => "READ",
            Self::Write => "WRITE",
            Self::Pwm => "PWM",
            Self::Prs => "PRS",
            Self::Pfs => "PFS",
            Self::Servo => "SERVO",
            Self::No => "NO",
            Self::Nb => "NB",
            Self::Np => "NP",
            Self::Nc => "NC",
            Self::Prg => "PRG",
            Self::Pfg => "PFG",
            Self::Spio => "SPIO",
            Self::Spic => "SPIC",
            Self::Spir => "SPIR",
            Self::Spiw => "SPIW",
            Self::Spix => "SPIX",
            Self::Gdc => "GDC",
            Self::Gpw => "GPW",
            Self::Bspic => "BSPIC",
            Self::Bspio => "BSPIO",
            Self::Bspix => "BSPIX",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
