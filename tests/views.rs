// Thu Oct 15 2026 - Alex

use amiberry_probe::memory::{Address, MemoryError};
use amiberry_probe::runtime::{M68kRegister, MemoryBank, PC_OFFSET};
use amiberry_probe::testing::EmulatorImageBuilder;
use amiberry_probe::Runtime;

const REGS: Address = EmulatorImageBuilder::REGISTER_BANK;

#[test]
fn test_register_reads() {
    let runtime = Runtime::new(EmulatorImageBuilder::new().build());
    let host = runtime.host();
    host.write_u32(REGS, 0x0000_0042).unwrap();
    host.write_u32(REGS + 15 * 4, 0x00c0_0000).unwrap();
    host.write_u32(REGS + PC_OFFSET, 0x00f8_00d2).unwrap();

    let regs = runtime.registers().unwrap();
    assert_eq!(regs.d0().unwrap(), 0x42);
    assert_eq!(regs.a7().unwrap(), 0x00c0_0000);
    assert_eq!(regs.read(M68kRegister::A7).unwrap(), 0x00c0_0000);
    assert_eq!(regs.pc().unwrap(), 0x00f8_00d2);

    host.write_u32(REGS + PC_OFFSET, 0x00f8_00d4).unwrap();
    assert_eq!(regs.pc().unwrap(), 0x00f8_00d4);
}

#[test]
fn test_bank_data() {
    let runtime = Runtime::new(EmulatorImageBuilder::new().build());

    for bank in MemoryBank::ALL {
        let view = runtime.memory(bank).unwrap();
        let data = view.data().unwrap();
        assert_eq!(data.len(), EmulatorImageBuilder::BANK_SIZE as usize);
        assert!(data.iter().all(|&b| b == bank.index() as u8 + 1), "{}", bank);
    }
}

#[test]
fn test_bank_views_are_live() {
    let runtime = Runtime::new(EmulatorImageBuilder::new().build());
    let chip = runtime.cram().unwrap();
    let routine = chip.accessor();

    let before = chip.snapshot().unwrap();
    assert_eq!(before.base, EmulatorImageBuilder::bank_base(MemoryBank::Cram));

    // Emulator reallocated chip RAM and shrank it.
    let moved = EmulatorImageBuilder::DATA_BASE + 0x8000;
    runtime.host().set_accessor(routine, moved, 0x80);
    assert_eq!(chip.base().unwrap(), moved);
    assert_eq!(chip.size().unwrap(), 0x80);
    assert_eq!(chip.data().unwrap().len(), 0x80);
}

#[test]
fn test_accessor_failure_surfaces() {
    let runtime = Runtime::new(EmulatorImageBuilder::new().build());
    let bram = runtime.bram().unwrap();
    runtime.host().set_accessor(bram.accessor(), Address::new(0x7000_0000), 0x100);
    assert!(matches!(bram.data(), Err(MemoryError::OutOfBounds { .. })));
}
