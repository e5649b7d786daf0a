//! Status word definitions for APDU responses

use std::fmt;

use tracing::Level;

/// Status Word (SW1-SW2) from an APDU response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusWord {
    /// First status byte (SW1)
    pub sw1: u8,
    /// Second status byte (SW2)
    pub sw2: u8,
}

impl StatusWord {
    /// Create a new status word
    pub const fn new(sw1: u8, sw2: u8) -> Self {
        Self { sw1, sw2 }
    }

    /// Split a big-endian `SW1SW2` value
    pub const fn from_u16(status: u16) -> Self {
        let [sw1, sw2] = status.to_be_bytes();
        Self { sw1, sw2 }
    }

    /// Join into a big-endian `SW1SW2` value
    pub const fn to_u16(&self) -> u16 {
        u16::from_be_bytes([self.sw1, self.sw2])
    }

    /// Exact comparison against an expected status word
    pub const fn matches(&self, expected: Self) -> bool {
        self.sw1 == expected.sw1 && self.sw2 == expected.sw2
    }

    /// Check if this status word indicates success (90 00)
    pub const fn is_success(&self) -> bool {
        self.matches(common::SUCCESS)
    }

    /// Check if this status word indicates a warning (62 XX or 63 XX)
    pub const fn is_warning(&self) -> bool {
        self.sw1 == 0x62 || self.sw1 == 0x63
    }

    /// Level at which a response carrying this status is logged
    pub const fn tracing_level(&self) -> Level {
        if self.is_success() {
            Level::DEBUG
        } else if self.is_warning() {
            Level::INFO
        } else {
            Level::WARN
        }
    }

    /// ISO 7816-4 meaning, used when logging rejected commands
    pub const fn description(&self) -> &'static str {
        match self.to_u16() {
            0x9000 => "Success",
            0x6700 => "Wrong length",
            0x6982 => "Security status not satisfied",
            0x6983 => "Authentication method blocked",
            0x6985 => "Conditions of use not satisfied",
            0x6986 => "Command not allowed",
            0x6A80 => "Wrong data",
            0x6A81 => "Function not supported",
            0x6A82 => "File not found",
            0x6A86 => "Incorrect P1-P2",
            0x6A88 => "Referenced data not found",
            0x6D00 => "Instruction not supported",
            0x6E00 => "Class not supported",
            _ => match self.sw1 {
                0x61 => "Response bytes still available",
                0x62 | 0x63 => "Warning, non-volatile memory may have changed",
                0x64 | 0x65 => "Execution error",
                0x68 => "Function in CLA not supported",
                0x69 => "Command not allowed",
                0x6A | 0x6B => "Wrong parameters",
                0x6C => "Wrong Le field",
                0x6F => "No precise diagnosis",
                _ => "Unknown status word",
            },
        }
    }
}

/// Exact status word comparison on raw `(SW1, SW2)` pairs
///
/// No masking is applied: `(0x90, 0x01)` does not satisfy `(0x90, 0x00)`.
pub const fn status_ok(sw: (u8, u8), expected: (u8, u8)) -> bool {
    sw.0 == expected.0 && sw.1 == expected.1
}

impl From<(u8, u8)> for StatusWord {
    fn from(tuple: (u8, u8)) -> Self {
        Self::new(tuple.0, tuple.1)
    }
}

impl From<u16> for StatusWord {
    fn from(status: u16) -> Self {
        Self::from_u16(status)
    }
}

impl From<StatusWord> for u16 {
    fn from(status: StatusWord) -> Self {
        status.to_u16()
    }
}

impl fmt::Display for StatusWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X} {:02X}", self.sw1, self.sw2)
    }
}

/// Common status words
pub mod common {
    use super::StatusWord;

    /// Success (90 00)
    pub const SUCCESS: StatusWord = StatusWord::new(0x90, 0x00);

    /// Application / file not found (6A 82)
    pub const FILE_NOT_FOUND: StatusWord = StatusWord::new(0x6A, 0x82);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_word_from_to_u16() {
        let sw = StatusWord::from_u16(0x9000);
        assert_eq!(sw.sw1, 0x90);
        assert_eq!(sw.sw2, 0x00);
        assert_eq!(sw.to_u16(), 0x9000);
    }

    #[test]
    fn test_status_ok_is_exact() {
        assert!(status_ok((0x90, 0x00), (0x90, 0x00)));
        assert!(!status_ok((0x90, 0x01), (0x90, 0x00)));
        assert!(!status_ok((0x91, 0x00), (0x90, 0x00)));
        assert!(status_ok((0x6A, 0x82), (0x6A, 0x82)));

        assert!(StatusWord::new(0x90, 0x00).is_success());
        assert!(!StatusWord::new(0x90, 0x01).is_success());
    }

    #[test]
    fn test_tracing_level() {
        assert_eq!(common::SUCCESS.tracing_level(), Level::DEBUG);
        assert_eq!(StatusWord::new(0x63, 0xC2).tracing_level(), Level::INFO);
        assert_eq!(common::FILE_NOT_FOUND.tracing_level(), Level::WARN);
    }

    #[test]
    fn test_status_word_description() {
        assert_eq!(StatusWord::new(0x90, 0x00).description(), "Success");
        assert_eq!(StatusWord::new(0x6A, 0x82).description(), "File not found");
        assert_eq!(
            StatusWord::new(0x69, 0x82).description(),
            "Security status not satisfied"
        );
        assert_eq!(StatusWord::new(0x6A, 0x84).description(), "Wrong parameters");
        assert_eq!(StatusWord::new(0x12, 0x34).description(), "Unknown status word");
    }
}
