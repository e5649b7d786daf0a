//! Reader chip firmware information
//!
//! NXP PN532 based readers answer GetFirmwareVersion with four bytes:
//! IC type, version, revision and a bitmask of supported card families.

use std::fmt;

/// IC identifier reported by a PN532
pub const IC_PN532: u8 = 0x32;

/// Card families supported by the reader firmware
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FirmwareFeatures(u8);

impl FirmwareFeatures {
    /// ISO/IEC 14443 type A (MIFARE)
    pub const MIFARE: Self = Self(0x01);
    /// ISO/IEC 14443-4 (ISO-DEP)
    pub const ISO_DEP: Self = Self(0x02);
    /// FeliCa
    pub const FELICA: Self = Self(0x04);

    /// Wrap a raw support byte
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Raw support byte
    pub const fn bits(&self) -> u8 {
        self.0
    }

    /// Whether every flag in `other` is set
    pub const fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl fmt::Display for FirmwareFeatures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = [
            (Self::MIFARE, "MIFARE"),
            (Self::ISO_DEP, "ISO-DEP"),
            (Self::FELICA, "FeliCa"),
        ];

        let mut first = true;
        for (flag, name) in names {
            if self.contains(flag) {
                if !first {
                    f.write_str(" + ")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        if first {
            f.write_str("Unknown")?;
        }

        write!(f, " (0x{:02X})", self.0)
    }
}

/// Decoded firmware version of the reader chip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FirmwareVersion {
    /// IC type, 0x32 for a PN532
    pub ic: u8,
    /// Major firmware version
    pub major: u8,
    /// Minor firmware version
    pub minor: u8,
    /// Supported card families
    pub features: FirmwareFeatures,
}

impl FirmwareVersion {
    /// Decode the packed 32-bit form (`IC << 24 | major << 16 | minor << 8 | flags`)
    pub const fn from_u32(raw: u32) -> Self {
        Self {
            ic: (raw >> 24) as u8,
            major: (raw >> 16) as u8,
            minor: (raw >> 8) as u8,
            features: FirmwareFeatures::from_bits(raw as u8),
        }
    }

    /// Re-pack into the 32-bit form
    pub const fn to_u32(&self) -> u32 {
        ((self.ic as u32) << 24)
            | ((self.major as u32) << 16)
            | ((self.minor as u32) << 8)
            | self.features.bits() as u32
    }

    /// Decode the four data bytes following the `D5 03` response code
    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Self::from_u32(u32::from_be_bytes(bytes))
    }

    /// Whether the chip identifies itself as a PN532
    pub const fn is_pn532(&self) -> bool {
        self.ic == IC_PN532
    }
}

impl fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let chip = if self.is_pn532() { "PN532" } else { "Unknown" };
        writeln!(f, "Raw firmware: 0x{:08X}", self.to_u32())?;
        writeln!(f, "IC Chip: {}", chip)?;
        writeln!(f, "Firmware: {}.{}", self.major, self.minor)?;
        write!(f, "Features: {}", self.features)
    }
}
