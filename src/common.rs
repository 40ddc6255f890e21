use embedded_hal::spi::SpiDevice;

use crate::{Ad5761, Command, CommandByte, Config, Error};

/// Assemble the 24-bit input shift register frame: command in the top
/// nibble, reserved nibble zero, 16 bits of register data, MSB first.
fn frame(cmd: Command, data: u16) -> [u8; 3] {
    [
        CommandByte::new().with_cmd(cmd as u8).into(),
        (data >> 8) as u8,
        data as u8,
    ]
}

impl<DEV, E> Ad5761<DEV>
where
    DEV: SpiDevice<Error = E>,
{
    /// Create a new AD5761 driver from an SPI device.
    ///
    /// The `SpiDevice` owns the ~SYNC line of this DAC; with ~LDAC tied low
    /// the device latches a frame on the rising edge of ~SYNC. The device is
    /// not touched until [`Ad5761::init`] is called.
    pub fn new(spi: DEV) -> Self {
        Self {
            spi,
            cfg: Config::default(),
            initialized: false,
        }
    }

    /// Bring the device into a known state and arm the driver.
    ///
    /// Issues a software full reset, writes `cfg` to the control register
    /// and disables daisy-chain mode, each as its own ~SYNC framed
    /// transaction. Must complete once before any other write; on an SPI
    /// error the driver stays unarmed and `init` can be retried.
    pub fn init(&mut self, cfg: Config) -> Result<(), Error<E>> {
        self.spi_write(&frame(Command::SoftwareFullReset, 0x0000))?;
        self.spi_write(&frame(Command::WriteControlRegister, cfg.into()))?;
        // DDC = 1 keeps SDO out of the shift path on a standalone device
        self.spi_write(&frame(Command::DisableDaisyChain, 0x0001))?;
        self.cfg = cfg;
        self.initialized = true;
        Ok(())
    }

    /// Transmit one command and data frame to the device.
    ///
    /// This is the single primitive every other write operation goes
    /// through: ~SYNC asserted low, 24 bits clocked out MSB first, ~SYNC
    /// released. The `SpiDevice` contract guarantees the transaction is
    /// exclusive, so frames to devices sharing the bus can never interleave.
    /// The meaning of `data` depends on `cmd`: a DAC code for the data
    /// register commands, a control word for [`Command::WriteControlRegister`],
    /// don't care (pass zero) for the reset and update commands.
    pub fn write(&mut self, cmd: Command, data: u16) -> Result<(), Error<E>> {
        if !self.initialized {
            return Err(Error::NotInitialized);
        }
        self.spi_write(&frame(cmd, data))
    }

    /// Write a 16 bit value to the input register without updating the DAC
    /// register. Push it to the output with [`Ad5761::update_dac`].
    pub fn set_input_register(&mut self, val: u16) -> Result<(), Error<E>> {
        self.write(Command::WriteInputRegister, val)
    }

    /// Update the DAC register, and consequently the output, from the input
    /// register.
    pub fn update_dac(&mut self) -> Result<(), Error<E>> {
        self.write(Command::UpdateDacRegister, 0x0000)
    }

    /// Write a 16 bit value to the input register and update the DAC output
    /// in a single frame.
    ///
    /// The actual output voltage depends on the reference voltage, the
    /// configured output range and, for bipolar ranges, the coding selected
    /// in the control register.
    /// ```ignore
    /// ad5761.set_dac_output(0x8000);
    /// ```
    pub fn set_dac_output(&mut self, val: u16) -> Result<(), Error<E>> {
        self.write(Command::WriteAndUpdateDacRegister, val)
    }

    /// Set the device configuration
    pub fn set_config(&mut self, cfg: Config) -> Result<(), Error<E>> {
        self.write(Command::WriteControlRegister, cfg.into())?;
        self.cfg = cfg;
        Ok(())
    }

    /// The configuration last written to the device.
    pub fn config(&self) -> Config {
        self.cfg
    }

    /// Reset the input and DAC registers to the clear voltage selected in
    /// the control register. The control register itself is kept.
    pub fn software_data_reset(&mut self) -> Result<(), Error<E>> {
        self.write(Command::SoftwareDataReset, 0x0000)
    }

    /// Reset the device to its power-on state, control register included.
    ///
    /// This disarms the driver: the device configuration is back at the
    /// datasheet defaults, so [`Ad5761::init`] has to run again before the
    /// next write.
    pub fn software_full_reset(&mut self) -> Result<(), Error<E>> {
        self.write(Command::SoftwareFullReset, 0x0000)?;
        self.initialized = false;
        Ok(())
    }

    /// Disable daisy-chain mode. Issued as part of [`Ad5761::init`]; only
    /// needed separately after the device was returned to daisy-chain
    /// operation by a full reset on a shared ~SYNC line.
    pub fn disable_daisy_chain(&mut self) -> Result<(), Error<E>> {
        self.write(Command::DisableDaisyChain, 0x0001)
    }

    /// Release the underlying SPI device.
    pub fn destroy(self) -> DEV {
        self.spi
    }

    fn spi_write(&mut self, payload: &[u8; 3]) -> Result<(), Error<E>> {
        self.spi.write(payload).map_err(Error::Spi)
    }

    /// Read back the input register.
    #[cfg(feature = "readback")]
    pub fn read_input_register(&mut self) -> Result<u16, Error<E>> {
        self.read(Command::ReadInputRegister)
    }

    /// Read back the DAC register.
    #[cfg(feature = "readback")]
    pub fn read_dac_register(&mut self) -> Result<u16, Error<E>> {
        self.read(Command::ReadDacRegister)
    }

    /// Read back the control register. The low 16 bits convert into a
    /// [`Config`] via `Config::from`.
    #[cfg(feature = "readback")]
    pub fn read_control_register(&mut self) -> Result<u16, Error<E>> {
        self.read(Command::ReadControlRegister)
    }

    #[cfg(feature = "readback")]
    fn read(&mut self, cmd: Command) -> Result<u16, Error<E>> {
        if !self.initialized {
            return Err(Error::NotInitialized);
        }
        // First frame selects the register, the register contents are
        // clocked out on SDO during the following NOP frame.
        self.spi_write(&frame(cmd, 0x0000))?;
        let mut rx: [u8; 3] = [0x00; 3];
        self.spi
            .transfer(&mut rx, &frame(Command::Nop, 0x0000))
            .map_err(Error::Spi)?;
        Ok(((rx[1] as u16) << 8) | rx[2] as u16)
    }
}
