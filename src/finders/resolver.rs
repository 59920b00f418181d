// Wed Oct 14 2026 - Alex

use crate::analysis::decoder_for;
use crate::config::ProbeConfig;
use crate::finders::{LocateError, MemoryBankFinder, RegisterBankFinder, ResolvedApi};
use crate::memory::Host;

/// Turns the emulator's code into a `ResolvedApi`.
///
/// Order matters: the architecture is checked before anything is read, then
/// the register bank is located, then the memory-bank accessors. The first
/// failure ends resolution.
pub struct AddressResolver<'a, H: Host + ?Sized> {
    host: &'a H,
    config: &'a ProbeConfig,
}

impl<'a, H: Host + ?Sized> AddressResolver<'a, H> {
    pub fn new(host: &'a H, config: &'a ProbeConfig) -> Self {
        Self { host, config }
    }

    pub fn resolve(&self) -> Result<ResolvedApi, LocateError> {
        let arch = self.host.architecture();
        let decoder = decoder_for(&arch).ok_or_else(|| LocateError::UnsupportedArchitecture(arch.clone()))?;
        log::debug!("Resolving for {}", arch);

        self.config.validate().map_err(LocateError::Config)?;
        let signatures = self.config.signatures.compile()?;
        let protection = self.config.protection().map_err(LocateError::Config)?;

        let modules = self.host.enumerate_modules()?;
        let module = modules
            .get(self.config.module_index)
            .ok_or(LocateError::ModuleNotFound(self.config.module_index))?;
        let regions = self.host.enumerate_ranges(module, protection)?;
        log::debug!(
            "Module {} at {}: {} {} range(s)",
            module.name(),
            module.base(),
            regions.len(),
            protection
        );
        for region in &regions {
            log::trace!("  {}", region);
        }

        let scanner = self.config.scanner();

        let register_bank = RegisterBankFinder::new(&*decoder, &scanner).find(
            self.host,
            &signatures.register_bank,
            &regions,
        )?;

        let accessors = MemoryBankFinder::new(&*decoder, &scanner, self.config.delimiter_window).find(
            self.host,
            &signatures.memory_dispatcher,
            &regions,
        )?;

        let api = ResolvedApi::new(register_bank, &accessors)?;
        log::info!("Resolved emulator API:\n{}", api);
        Ok(api)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Architecture;
    use crate::finders::MemoryBank;
    use crate::testing::EmulatorImageBuilder;

    #[test]
    fn test_resolves_fabricated_image() {
        let host = EmulatorImageBuilder::new().build();
        let config = ProbeConfig::default();
        let api = AddressResolver::new(&host, &config).resolve().unwrap();

        assert_eq!(api.register_bank(), EmulatorImageBuilder::REGISTER_BANK);
        assert_eq!(api.accessors(), EmulatorImageBuilder::accessors());
        assert_eq!(api.accessor(MemoryBank::Cram).as_u64(), 0x10128);
    }

    #[test]
    fn test_architecture_checked_before_any_scan() {
        let host = EmulatorImageBuilder::new().build().with_architecture(Architecture::X64);
        let config = ProbeConfig::default();
        let err = AddressResolver::new(&host, &config).resolve().unwrap_err();

        assert_eq!(err, LocateError::UnsupportedArchitecture(Architecture::X64));
        assert_eq!(host.range_queries(), 0);
        assert_eq!(host.reads(), 0);
    }

    #[test]
    fn test_missing_module() {
        let host = EmulatorImageBuilder::new().build();
        let config = ProbeConfig::default().with_module_index(3);
        let err = AddressResolver::new(&host, &config).resolve().unwrap_err();
        assert_eq!(err, LocateError::ModuleNotFound(3));
    }

    #[test]
    fn test_invalid_config_is_reported() {
        let host = EmulatorImageBuilder::new().build();
        let config = ProbeConfig::default().with_delimiter_window(0);
        let err = AddressResolver::new(&host, &config).resolve().unwrap_err();
        assert!(matches!(err, LocateError::Config(_)));
    }
}
