use ad5761::{Ad5761, Command, Config, Error, OutputRange};
use embedded_hal_mock::eh1::spi::{Mock as MockSpi, Transaction as MockTransaction};

/// The three ~SYNC framed transactions issued by `init` with the default
/// configuration: software full reset, control register write (0x0048),
/// daisy-chain disable.
fn init_transactions() -> Vec<MockTransaction<u8>> {
    vec![
        MockTransaction::transaction_start(),
        MockTransaction::write_vec(vec![0xF0, 0x00, 0x00]),
        MockTransaction::transaction_end(),
        MockTransaction::transaction_start(),
        MockTransaction::write_vec(vec![0x40, 0x00, 0x48]),
        MockTransaction::transaction_end(),
        MockTransaction::transaction_start(),
        MockTransaction::write_vec(vec![0x90, 0x00, 0x01]),
        MockTransaction::transaction_end(),
    ]
}

#[test]
fn default_config_is_power_up_control_word() {
    assert_eq!(u16::from(Config::default()), 0b0000000001001000);
    assert_eq!(Config::default().output_range(), OutputRange::Bipolar10V);
    assert_eq!(
        u16::from(Config::default().with_output_range(OutputRange::Unipolar10V)),
        0x0049
    );
}

#[test]
fn init_sequence() {
    let spi = MockSpi::new(&init_transactions());

    let mut dac = Ad5761::new(spi);
    dac.init(Config::default()).unwrap();
    dac.destroy().done();
}

#[test]
fn frame_layout_for_all_commands() {
    let commands = [
        Command::Nop,
        Command::WriteInputRegister,
        Command::UpdateDacRegister,
        Command::WriteAndUpdateDacRegister,
        Command::WriteControlRegister,
        Command::SoftwareDataReset,
        Command::DisableDaisyChain,
        Command::ReadInputRegister,
        Command::ReadDacRegister,
        Command::ReadControlRegister,
        Command::SoftwareFullReset,
    ];
    let data = 0xA5C3u16;

    // Command nibble on top, reserved nibble zero, data MSB first
    let mut trans = init_transactions();
    for cmd in commands {
        trans.push(MockTransaction::transaction_start());
        trans.push(MockTransaction::write_vec(vec![(cmd as u8) << 4, 0xA5, 0xC3]));
        trans.push(MockTransaction::transaction_end());
    }
    let spi = MockSpi::new(&trans);

    let mut dac = Ad5761::new(spi);
    dac.init(Config::default()).unwrap();
    for cmd in commands {
        dac.write(cmd, data).unwrap();
    }
    dac.destroy().done();
}

#[test]
fn write_and_update_frame() {
    let mut trans = init_transactions();
    trans.extend([
        MockTransaction::transaction_start(),
        MockTransaction::write_vec(vec![0x30, 0xF0, 0x0F]),
        MockTransaction::transaction_end(),
    ]);
    let spi = MockSpi::new(&trans);

    let mut dac = Ad5761::new(spi);
    dac.init(Config::default()).unwrap();
    dac.set_dac_output(0xF00F).unwrap();
    dac.destroy().done();
}

#[test]
fn consecutive_writes_are_separate_sync_pulses() {
    // The mock fails on any out-of-order or nested start/end marker, so a
    // passing run shows one complete ~SYNC pulse per sample write.
    let mut trans = init_transactions();
    for val in [0x0000u16, 0x4000, 0x8000] {
        trans.push(MockTransaction::transaction_start());
        trans.push(MockTransaction::write_vec(vec![
            0x30,
            (val >> 8) as u8,
            val as u8,
        ]));
        trans.push(MockTransaction::transaction_end());
    }
    let spi = MockSpi::new(&trans);

    let mut dac = Ad5761::new(spi);
    dac.init(Config::default()).unwrap();
    for val in [0x0000u16, 0x4000, 0x8000] {
        dac.set_dac_output(val).unwrap();
    }
    dac.destroy().done();
}

#[test]
fn write_before_init_is_rejected_without_traffic() {
    let spi: MockSpi<u8> = MockSpi::new(&[]);

    let mut dac = Ad5761::new(spi);
    assert!(matches!(
        dac.write(Command::WriteAndUpdateDacRegister, 0x8000),
        Err(Error::NotInitialized)
    ));
    assert!(matches!(dac.set_dac_output(0x8000), Err(Error::NotInitialized)));
    assert!(matches!(
        dac.set_config(Config::default()),
        Err(Error::NotInitialized)
    ));
    dac.destroy().done();
}

#[test]
fn full_reset_requires_reinit() {
    let mut trans = init_transactions();
    trans.extend([
        MockTransaction::transaction_start(),
        MockTransaction::write_vec(vec![0xF0, 0x00, 0x00]),
        MockTransaction::transaction_end(),
    ]);
    let spi = MockSpi::new(&trans);

    let mut dac = Ad5761::new(spi);
    dac.init(Config::default()).unwrap();
    dac.software_full_reset().unwrap();
    assert!(matches!(dac.set_dac_output(0x8000), Err(Error::NotInitialized)));
    dac.destroy().done();
}

#[test]
fn reserved_command_nibbles_are_rejected() {
    for raw in [0x5u8, 0x6, 0x8, 0xD, 0xE] {
        let err = Command::try_from(raw).unwrap_err();
        assert_eq!(err.nibble(), raw);
    }
    // The defined nibbles round-trip
    for raw in [0x0u8, 0x1, 0x2, 0x3, 0x4, 0x7, 0x9, 0xA, 0xB, 0xC, 0xF] {
        assert_eq!(Command::try_from(raw).unwrap() as u8, raw);
    }
}

#[cfg(feature = "readback")]
#[test]
fn read_control_register() {
    let mut trans = init_transactions();
    trans.extend([
        MockTransaction::transaction_start(),
        MockTransaction::write_vec(vec![0xC0, 0x00, 0x00]),
        MockTransaction::transaction_end(),
        MockTransaction::transaction_start(),
        MockTransaction::transfer(vec![0x00, 0x00, 0x00], vec![0x00, 0x00, 0x48]),
        MockTransaction::transaction_end(),
    ]);
    let spi = MockSpi::new(&trans);

    let mut dac = Ad5761::new(spi);
    dac.init(Config::default()).unwrap();
    let ctrl = dac.read_control_register().unwrap();
    assert_eq!(u16::from(Config::default()), ctrl);
    dac.destroy().done();
}
