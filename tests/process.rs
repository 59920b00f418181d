// Thu Oct 15 2026 - Alex

#![cfg(any(target_os = "linux", target_os = "android"))]

use amiberry_probe::memory::{Host, MemoryReader, ProcessMemory, Protection};
use amiberry_probe::process_runtime;

#[test]
fn test_enumerates_own_process() {
    let process = ProcessMemory::current();
    let modules = process.enumerate_modules().unwrap();
    let main = modules.first().unwrap();

    assert_eq!(process.read_bytes(main.base(), 4).unwrap(), b"\x7fELF".to_vec());

    let code = process.enumerate_ranges(main, Protection::READ_EXECUTE).unwrap();
    assert!(!code.is_empty());
    assert!(code.windows(2).all(|w| w[0].start() < w[1].start()));
    assert!(code.iter().all(|r| r.is_executable()));
}

#[test]
fn test_process_runtime_fails_outside_the_emulator() {
    // The test binary is not Amiberry: either the architecture is wrong or
    // the signatures are missing.
    let runtime = process_runtime();
    let first = runtime.registers().err();
    assert!(first.is_some());
    assert_eq!(runtime.bootrom().err(), first);
}
