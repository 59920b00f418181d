// Thu Oct 15 2026 - Alex

use amiberry_probe::analysis::Architecture;
use amiberry_probe::finders::{AddressResolver, MemoryBank};
use amiberry_probe::memory::{Address, BinaryMemory, Host, MemoryError, MemoryReader, Protection};
use amiberry_probe::testing::EmulatorImageBuilder;
use amiberry_probe::{LocateError, ProbeConfig, Runtime};
use std::io::Write;

const EM_ARM: u16 = 40;
const EM_X86_64: u16 = 62;
const EM_AARCH64: u16 = 183;
const PT_LOAD: u32 = 1;
const PF_X: u32 = 1;
const PF_W: u32 = 2;
const PF_R: u32 = 4;

const CODE_OFFSET: usize = 0x1000;
const DATA_OFFSET: usize = 0x3000;
const DATA_FILESZ: usize = 0x200;

struct Load {
    offset: usize,
    vaddr: u64,
    filesz: usize,
    memsz: usize,
    flags: u32,
}

/// A little-endian ELF32 executable with the given PT_LOAD segments and no
/// section headers.
fn elf32(machine: u16, loads: &[Load], contents: &[(usize, &[u8])]) -> Vec<u8> {
    let phoff = 52;
    let size = loads.iter().map(|l| l.offset + l.filesz).max().unwrap_or(phoff);
    let mut out = vec![0u8; size.max(phoff + loads.len() * 32)];

    let mut header = Vec::new();
    header.extend_from_slice(&[0x7f, b'E', b'L', b'F', 1, 1, 1, 0]);
    header.extend_from_slice(&[0; 8]);
    header.extend_from_slice(&2u16.to_le_bytes()); // ET_EXEC
    header.extend_from_slice(&machine.to_le_bytes());
    header.extend_from_slice(&1u32.to_le_bytes());
    header.extend_from_slice(&0x10000u32.to_le_bytes()); // e_entry
    header.extend_from_slice(&(phoff as u32).to_le_bytes());
    header.extend_from_slice(&0u32.to_le_bytes()); // e_shoff
    header.extend_from_slice(&0x0500_0400u32.to_le_bytes()); // EABI5, hard float
    header.extend_from_slice(&52u16.to_le_bytes());
    header.extend_from_slice(&32u16.to_le_bytes());
    header.extend_from_slice(&(loads.len() as u16).to_le_bytes());
    header.extend_from_slice(&40u16.to_le_bytes());
    header.extend_from_slice(&0u16.to_le_bytes());
    header.extend_from_slice(&0u16.to_le_bytes());

    for load in loads {
        for field in [
            PT_LOAD,
            load.offset as u32,
            load.vaddr as u32,
            load.vaddr as u32,
            load.filesz as u32,
            load.memsz as u32,
            load.flags,
            0x1000,
        ] {
            header.extend_from_slice(&field.to_le_bytes());
        }
    }

    out[..header.len()].copy_from_slice(&header);
    for (offset, bytes) in contents {
        out[*offset..*offset + bytes.len()].copy_from_slice(bytes);
    }
    out
}

/// A little-endian ELF64 executable with a single PT_LOAD segment.
fn elf64(machine: u16, load: &Load) -> Vec<u8> {
    let phoff = 64u64;
    let mut out = vec![0u8; (load.offset + load.filesz).max(phoff as usize + 56)];

    let mut header = Vec::new();
    header.extend_from_slice(&[0x7f, b'E', b'L', b'F', 2, 1, 1, 0]);
    header.extend_from_slice(&[0; 8]);
    header.extend_from_slice(&2u16.to_le_bytes()); // ET_EXEC
    header.extend_from_slice(&machine.to_le_bytes());
    header.extend_from_slice(&1u32.to_le_bytes());
    header.extend_from_slice(&load.vaddr.to_le_bytes()); // e_entry
    header.extend_from_slice(&phoff.to_le_bytes());
    header.extend_from_slice(&0u64.to_le_bytes()); // e_shoff
    header.extend_from_slice(&0u32.to_le_bytes());
    header.extend_from_slice(&64u16.to_le_bytes());
    header.extend_from_slice(&56u16.to_le_bytes());
    header.extend_from_slice(&1u16.to_le_bytes());
    header.extend_from_slice(&64u16.to_le_bytes());
    header.extend_from_slice(&0u16.to_le_bytes());
    header.extend_from_slice(&0u16.to_le_bytes());

    header.extend_from_slice(&PT_LOAD.to_le_bytes());
    header.extend_from_slice(&load.flags.to_le_bytes());
    for field in [
        load.offset as u64,
        load.vaddr,
        load.vaddr,
        load.filesz as u64,
        load.memsz as u64,
        0x1000,
    ] {
        header.extend_from_slice(&field.to_le_bytes());
    }

    out[..header.len()].copy_from_slice(&header);
    out
}

fn emulator_elf(machine: u16) -> Vec<u8> {
    let code = EmulatorImageBuilder::new().code().to_bytes();
    let mut data = vec![0u8; DATA_FILESZ];
    let regs = (EmulatorImageBuilder::REGISTER_BANK.as_u64() - EmulatorImageBuilder::DATA_BASE.as_u64()) as usize;
    data[regs..regs + 4].copy_from_slice(&0x1234u32.to_le_bytes());

    let loads = [
        Load {
            offset: CODE_OFFSET,
            vaddr: EmulatorImageBuilder::CODE_BASE.as_u64(),
            filesz: code.len(),
            memsz: code.len(),
            flags: PF_R | PF_X,
        },
        Load {
            offset: DATA_OFFSET,
            vaddr: EmulatorImageBuilder::DATA_BASE.as_u64(),
            filesz: DATA_FILESZ,
            memsz: EmulatorImageBuilder::DATA_SIZE,
            flags: PF_R | PF_W,
        },
    ];
    elf32(machine, &loads, &[(CODE_OFFSET, code.as_slice()), (DATA_OFFSET, data.as_slice())])
}

#[test]
fn test_segments_and_architecture() {
    let image = BinaryMemory::from_bytes("amiberry", emulator_elf(EM_ARM)).unwrap();
    assert_eq!(image.architecture(), Architecture::Arm);
    assert_eq!(image.pointer_size(), 4);

    let regions = image.regions();
    assert_eq!(regions.len(), 2);
    assert_eq!(regions[0].protection(), Protection::READ_EXECUTE);
    assert_eq!(regions[1].protection(), Protection::READ_WRITE);
    assert_eq!(regions[1].size(), EmulatorImageBuilder::DATA_SIZE as u64);

    let modules = image.enumerate_modules().unwrap();
    assert_eq!(modules.len(), 1);
    let code = image.enumerate_ranges(&modules[0], Protection::READ_EXECUTE).unwrap();
    assert_eq!(code.len(), 1);
    assert_eq!(code[0].start(), EmulatorImageBuilder::CODE_BASE);
}

#[test]
fn test_reads_past_file_data_are_zero() {
    let image = BinaryMemory::from_bytes("amiberry", emulator_elf(EM_ARM)).unwrap();
    let tail = EmulatorImageBuilder::DATA_BASE + DATA_FILESZ as u64 - 2;
    assert_eq!(image.read_bytes(tail, 4).unwrap(), vec![0, 0, 0, 0]);
    assert!(image.read_bytes(Address::new(0x5000_0000), 4).is_err());
}

#[test]
fn test_resolves_image_on_disk() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&emulator_elf(EM_ARM)).unwrap();

    let image = BinaryMemory::load(file.path()).unwrap();
    let api = AddressResolver::new(&image, &ProbeConfig::default()).resolve().unwrap();
    assert_eq!(api.register_bank(), EmulatorImageBuilder::REGISTER_BANK);
    assert_eq!(api.accessors(), EmulatorImageBuilder::accessors());
}

#[test]
fn test_runtime_over_image() {
    let image = BinaryMemory::from_bytes("amiberry", emulator_elf(EM_ARM)).unwrap();
    let runtime = Runtime::new(image);

    assert_eq!(runtime.registers().unwrap().d0().unwrap(), 0x1234);

    // The accessors exist in the image but cannot be called from a file.
    let rom = runtime.memory(MemoryBank::Bootrom).unwrap();
    assert_eq!(rom.accessor(), EmulatorImageBuilder::DISPATCHER);
    assert!(matches!(rom.base(), Err(MemoryError::NotSupported(_))));
}

#[test]
fn test_wrong_machine_is_unsupported() {
    let image = BinaryMemory::from_bytes("amiberry", emulator_elf(EM_X86_64)).unwrap();
    let err = AddressResolver::new(&image, &ProbeConfig::default()).resolve().unwrap_err();
    assert_eq!(err, LocateError::UnsupportedArchitecture(Architecture::X64));
}

#[test]
fn test_truncated_image_is_rejected() {
    let mut bytes = emulator_elf(EM_ARM);
    bytes.truncate(CODE_OFFSET + 0x100);
    assert!(BinaryMemory::from_bytes("amiberry", bytes).is_err());
    assert!(BinaryMemory::from_bytes("garbage", vec![0u8; 64]).is_err());
}

#[test]
fn test_segment_wrapping_address_space_is_rejected() {
    let load = Load {
        offset: CODE_OFFSET,
        vaddr: u64::MAX - 0xfff,
        filesz: 0x10,
        memsz: 0x2000,
        flags: PF_R | PF_X,
    };
    let result = BinaryMemory::from_bytes("amiberry", elf64(EM_AARCH64, &load));
    assert!(matches!(result, Err(MemoryError::BinaryParseError(_))));
}
