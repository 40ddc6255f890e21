//! Driver for the Analog Devices AD5761/AD5761R single channel 16-bit
//! bipolar precision DAC.
//!
//! The device is driven over a 3-wire SPI interface. Every transaction is a
//! 24-bit frame clocked out MSB first while ~SYNC is held low: a 4-bit
//! command in the top nibble, four reserved bits (zero) and a 16-bit
//! register payload. The frame layout follows the input shift register
//! command table of the datasheet.
//!
//! The driver is built on [`embedded_hal::spi::SpiDevice`], so the ~SYNC
//! (chip select) pin belongs to the `SpiDevice` implementation and every
//! write is performed as one exclusive bus transaction. One [`Ad5761`]
//! handle corresponds to one physical chip select line; use
//! `embedded-hal-bus` to share a bus between several devices.
//!
//! The bus has to be configured for [`SPI_MODE`] at up to [`SPI_CLOCK_HZ`]
//! before constructing the driver. After construction the device must be
//! brought up once through [`Ad5761::init`], which resets the device,
//! programs the control register and disables daisy-chain mode. Writes on a
//! handle that was not initialized fail with [`Error::NotInitialized`]
//! instead of clocking out a frame, since a partial or mis-ordered bring-up
//! can leave the output at an undefined voltage.

#![deny(unsafe_code, missing_docs)]
#![no_std]

use bitfield_struct::bitfield;
use embedded_hal::spi::{Mode, MODE_2};

/// Required SPI mode: clock idle high, data sampled on the falling edge.
pub const SPI_MODE: Mode = MODE_2;
/// Maximum supported SCLK rate in Hz.
pub const SPI_CLOCK_HZ: u32 = 10_000_000;

/// AD5761 DAC accessed through an owned or shared-bus SPI device
pub struct Ad5761<DEV> {
    spi: DEV,
    cfg: Config,
    initialized: bool,
}

/// Errors for this crate
#[derive(Debug)]
pub enum Error<E> {
    /// SPI communication error
    Spi(E),
    /// Write attempted before [`Ad5761::init`]
    NotInitialized,
}

/// Input shift register commands of the AD5761.
///
/// The discriminants are the 4-bit command codes from the datasheet command
/// table. Codes 0x5, 0x6, 0x8, 0xD and 0xE are reserved by the device and
/// have no variant, so they can never be clocked out through this driver.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[repr(u8)]
pub enum Command {
    /// No operation
    Nop = 0x0,
    /// Write to the input register without updating the DAC register
    WriteInputRegister = 0x1,
    /// Update the DAC register (and the output) from the input register
    UpdateDacRegister = 0x2,
    /// Write to the input register and update the DAC register in one frame
    WriteAndUpdateDacRegister = 0x3,
    /// Write the control register
    WriteControlRegister = 0x4,
    /// Software data reset: input and DAC registers to the clear code
    SoftwareDataReset = 0x7,
    /// Disable daisy-chain mode
    DisableDaisyChain = 0x9,
    /// Read back the input register
    ReadInputRegister = 0xA,
    /// Read back the DAC register
    ReadDacRegister = 0xB,
    /// Read back the control register
    ReadControlRegister = 0xC,
    /// Software full reset: data registers and control register to defaults
    SoftwareFullReset = 0xF,
}

/// A raw command nibble that is not part of the AD5761 command table.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct InvalidCommand(u8);

impl InvalidCommand {
    /// The rejected nibble.
    pub fn nibble(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Command {
    type Error = InvalidCommand;
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x0 => Ok(Self::Nop),
            0x1 => Ok(Self::WriteInputRegister),
            0x2 => Ok(Self::UpdateDacRegister),
            0x3 => Ok(Self::WriteAndUpdateDacRegister),
            0x4 => Ok(Self::WriteControlRegister),
            0x7 => Ok(Self::SoftwareDataReset),
            0x9 => Ok(Self::DisableDaisyChain),
            0xA => Ok(Self::ReadInputRegister),
            0xB => Ok(Self::ReadDacRegister),
            0xC => Ok(Self::ReadControlRegister),
            0xF => Ok(Self::SoftwareFullReset),
            _ => Err(InvalidCommand(value)),
        }
    }
}

/// Available output ranges for the DAC output.
/// These are the RA codes of the control register; the resulting voltages
/// assume the nominal 2.5V reference, consult the datasheet for other
/// reference voltages.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
#[repr(u8)]
pub enum OutputRange {
    /// -10V to +10V
    Bipolar10V = 0b000,
    /// 0V to +10V
    Unipolar10V = 0b001,
    /// -5V to +5V
    Bipolar5V = 0b010,
    /// 0V to +5V
    Unipolar5V = 0b011,
    /// -2.5V to +7.5V
    Bipolar2V5To7V5 = 0b100,
    /// -3V to +3V
    Bipolar3V = 0b101,
    /// 0V to +16V
    Unipolar16V = 0b110,
    /// 0V to +20V
    Unipolar20V = 0b111,
}

impl From<u8> for OutputRange {
    fn from(value: u8) -> Self {
        match value & 0b111 {
            0b000 => Self::Bipolar10V,
            0b001 => Self::Unipolar10V,
            0b010 => Self::Bipolar5V,
            0b011 => Self::Unipolar5V,
            0b100 => Self::Bipolar2V5To7V5,
            0b101 => Self::Bipolar3V,
            0b110 => Self::Unipolar16V,
            _ => Self::Unipolar20V,
        }
    }
}

// First byte of the 24-bit frame: command nibble on top, the reserved
// nibble below it is always zero.
#[bitfield(u8)]
pub(crate) struct CommandByte {
    #[bits(4)]
    _reserved: u8,

    #[bits(4)]
    cmd: u8,
}

/// Definition of the configuration in the Control Register
///
/// The default value encodes the power-up configuration used by this driver:
/// -10V to +10V output range, midscale power-up voltage, thermal shutdown
/// enabled, straight binary coding (0b0000000001001000). The configuration
/// takes effect on the device once written through [`Ad5761::init`] or
/// [`Ad5761::set_config`].
#[bitfield(u16)]
pub struct Config {
    /// RA: output range selection, see [`OutputRange`] for the codes.
    #[bits(3)]
    pub range: u8,

    /// PV: voltage the output powers up at.
    /// `0b00` zero scale, `0b01` midscale, `0b10`/`0b11` full scale.
    #[bits(2, default = 0b01)]
    pub power_up_voltage: u8,

    /// IRO: set to power up the internal reference (AD5761R only). Cleared
    /// for an external reference (default).
    #[bits(default = false)]
    pub internal_reference: bool,

    /// ETS: set to power down the output when the die temperature exceeds
    /// 150°C (default). Cleared to disable thermal shutdown.
    #[bits(default = true)]
    pub thermal_shutdown: bool,

    /// B2C: set for twos complement DAC coding, cleared for straight binary
    /// (default).
    #[bits(default = false)]
    pub twos_complement: bool,

    /// OVR: set to enable the 5% overrange on the selected output range.
    #[bits(default = false)]
    pub overrange: bool,

    /// CV: voltage a data reset clears the output to.
    /// `0b00` zero scale, `0b01` midscale, `0b10`/`0b11` full scale.
    #[bits(2, default = 0b00)]
    pub clear_voltage: u8,

    /// Rest of the bits are reserved and must be written as zero
    #[bits(5)]
    _unused: u8,
}

impl Config {
    /// Set the output range.
    pub const fn with_output_range(self, range: OutputRange) -> Self {
        self.with_range(range as u8)
    }
    /// Get the output range.
    pub fn output_range(&self) -> OutputRange {
        OutputRange::from(self.range())
    }
}

mod common;
