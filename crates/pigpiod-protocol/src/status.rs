//! Per-command status-code taxonomy.
//!
//! Negative status codes are daemon-defined and only meaningful together
//! with the command that produced them. The tables below reproduce the
//! daemon's codes as data; they are not derivable and must stay in sync with
//! the daemon build this client targets.

use crate::command::Command;

/// Daemon status codes referenced by the cause tables.
pub mod codes {
    pub const PI_BAD_USER_GPIO: i32 = -2;
    pub const PI_BAD_GPIO: i32 = -3;
    pub const PI_BAD_MODE: i32 = -4;
    pub const PI_BAD_LEVEL: i32 = -5;
    pub const PI_BAD_PUD: i32 = -6;
    pub const PI_BAD_PULSEWIDTH: i32 = -7;
    pub const PI_BAD_DUTYCYCLE: i32 = -8;
    pub const PI_BAD_DUTYRANGE: i32 = -21;
    pub const PI_BAD_HANDLE: i32 = -25;
    pub const PI_NOT_PERMITTED: i32 = -41;
    pub const PI_GPIO_IN_USE: i32 = -50;
    pub const PI_SPI_OPEN_FAILED: i32 = -73;
    pub const PI_BAD_SPI_CHANNEL: i32 = -76;
    pub const PI_BAD_FLAGS: i32 = -77;
    pub const PI_BAD_SPI_SPEED: i32 = -78;
    pub const PI_BAD_SPI_COUNT: i32 = -84;
    pub const PI_SPI_XFER_FAILED: i32 = -89;
    pub const PI_NO_AUX_SPI: i32 = -91;
    pub const PI_NOT_PWM_GPIO: i32 = -92;
    pub const PI_NOT_SERVO_GPIO: i32 = -93;
    pub const PI_BAD_SPI_BAUD: i32 = -141;
    pub const PI_NOT_SPI_GPIO: i32 = -142;
}

use codes::*;

const BAD_USER_GPIO: &str = "bad GPIO pin given";
const BAD_GPIO: &str = "bad GPIO pin given";
const NOT_PERMITTED: &str = "operation was not permitted";
const BAD_HANDLE: &str = "bad handle given";
const BAD_SPI_COUNT: &str = "bad count given";
const SPI_XFER_FAILED: &str = "data transfer failed";
const NOT_SPI_GPIO: &str = "no bit-bang SPI in progress on GPIO";

/// The ordered cause table for one command.
pub fn causes(command: Command) -> &'static [(i32, &'static str)] {
    match command {
        Command::Servo => &[
            (PI_BAD_USER_GPIO, BAD_USER_GPIO),
            (PI_BAD_PULSEWIDTH, "given pulse width is out of valid range"),
            (PI_NOT_PERMITTED, NOT_PERMITTED),
        ],
        Command::Pwm => &[
            (PI_BAD_USER_GPIO, BAD_USER_GPIO),
            (PI_BAD_DUTYCYCLE, "given dutycycle is out of valid range"),
            (PI_NOT_PERMITTED, NOT_PERMITTED),
        ],
        Command::Prs => &[
            (PI_BAD_USER_GPIO, BAD_USER_GPIO),
            (PI_BAD_DUTYRANGE, "given range is not valid"),
            (PI_NOT_PERMITTED, NOT_PERMITTED),
        ],
        Command::Pfs => &[
            (PI_BAD_USER_GPIO, BAD_USER_GPIO),
            (PI_NOT_PERMITTED, NOT_PERMITTED),
        ],
        Command::Prg | Command::Pfg => &[(PI_BAD_USER_GPIO, BAD_USER_GPIO)],
        Command::Gdc => &[
            (PI_BAD_USER_GPIO, BAD_USER_GPIO),
            (PI_NOT_PWM_GPIO, "GPIO is not in use for PWM"),
        ],
        Command::Gpw => &[
            (PI_BAD_USER_GPIO, BAD_USER_GPIO),
            (PI_NOT_SERVO_GPIO, "GPIO is not in use for servo pulses"),
        ],
        Command::Modes => &[
            (PI_BAD_GPIO, BAD_GPIO),
            (PI_BAD_MODE, "bad mode given"),
            (PI_NOT_PERMITTED, NOT_PERMITTED),
        ],
        Command::Modeg | Command::Read => &[(PI_BAD_GPIO, BAD_GPIO)],
        Command::Pud => &[
            (PI_BAD_GPIO, BAD_GPIO),
            (PI_BAD_PUD, "bad pull-up/down given"),
            (PI_NOT_PERMITTED, NOT_PERMITTED),
        ],
        Command::Write => &[
            (PI_BAD_GPIO, BAD_GPIO),
            (PI_BAD_LEVEL, "bad level given"),
            (PI_NOT_PERMITTED, NOT_PERMITTED),
        ],
        Command::Spio => &[
            (PI_SPI_OPEN_FAILED, "opening SPI device failed"),
            (PI_BAD_SPI_CHANNEL, "bad SPI channel given"),
            (PI_BAD_FLAGS, "bad flags given"),
            (PI_BAD_SPI_SPEED, "bad speed given"),
            (PI_NO_AUX_SPI, "no AUX SPI available"),
        ],
        Command::Spic => &[(PI_BAD_HANDLE, BAD_HANDLE)],
        Command::Spir | Command::Spiw | Command::Spix => &[
            (PI_BAD_HANDLE, BAD_HANDLE),
            (PI_BAD_SPI_COUNT, BAD_SPI_COUNT),
            (PI_SPI_XFER_FAILED, SPI_XFER_FAILED),
        ],
        Command::Bspio => &[
            (PI_BAD_USER_GPIO, BAD_USER_GPIO),
            (PI_GPIO_IN_USE, "GPIO is already in use"),
            (PI_BAD_SPI_BAUD, "bad baud rate given"),
        ],
        Command::Bspic | Command::Bspix => &[
            (PI_BAD_USER_GPIO, BAD_USER_GPIO),
            (PI_NOT_SPI_GPIO, NOT_SPI_GPIO),
        ],
        // Notification lifecycle failures carry their own error kinds.
        Command::No | Command::Nb | Command::Np | Command::Nc => &[],
    }
}

/// Looks up the cause text for a (command, status code) pair.
pub fn cause(command: Command, code: i32) -> Option<&'static str> {
    causes(command)
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, text)| *text)
}

/// Renders the failure message for a (command, status code) pair.
///
/// A mapped code yields `"<NAME> command failed => <cause> (status code
/// <code>)"`; an unmapped code still carries the raw value:
/// `"<NAME> command failed with status code <code>"`.
pub fn failure_message(command: Command, code: i32) -> String {
    match cause(command, code) {
        Some(text) => format!("{command} command failed => {text} (status code {code})"),
        None => format!("{command} command failed with status code {code}"),
    }
}
