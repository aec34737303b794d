use core::sync::atomic::{compiler_fence, Ordering};

use utralib::{Field, Register};

#[cfg(not(target_os = "none"))]
pub mod sim;

pub const WORD_SIZE: usize = core::mem::size_of::<u32>();

/// Word-wide access to the SoC's physical address space.
///
/// Every call is performed against the target: implementations must not
/// cache, merge, elide or reorder accesses.
pub trait Bus {
    fn read(&self, addr: usize) -> u32;
    fn write(&mut self, addr: usize, value: u32);
}

/// The live bus, reached through volatile pointer accesses.
pub struct Mmio {
    _private: (),
}

impl Mmio {
    /// # Safety
    ///
    /// Whoever holds an `Mmio` may touch any address the platform maps. The
    /// firmware creates one for the main loop and short-lived ones inside
    /// drivers that own their block exclusively (the UART).
    pub const unsafe fn new() -> Self { Mmio { _private: () } }
}

impl Bus for Mmio {
    fn read(&self, addr: usize) -> u32 {
        // prevent re-ordering
        compiler_fence(Ordering::SeqCst);
        // safety: addresses come from the generated register map
        unsafe { (addr as *const u32).read_volatile() }
    }

    fn write(&mut self, addr: usize, value: u32) {
        // safety: addresses come from the generated register map
        unsafe { (addr as *mut u32).write_volatile(value) };
        // SeqCst, because Acquire would only order later accesses against reads
        compiler_fence(Ordering::SeqCst);
    }
}

/// A CSR block at `base`, addressed with the register map's descriptors.
pub struct Csr<'a, B: Bus> {
    bus: &'a mut B,
    base: usize,
}

impl<'a, B: Bus> Csr<'a, B> {
    pub fn new(bus: &'a mut B, base: usize) -> Self { Csr { bus, base } }

    fn addr(&self, reg: Register) -> usize { self.base + reg.offset() * WORD_SIZE }

    /// Read the contents of this register
    pub fn r(&self, reg: Register) -> u32 { self.bus.read(self.addr(reg)) }

    /// Read a field from this CSR
    pub fn rf(&self, field: Field) -> u32 {
        (self.r(field.register()) >> field.offset()) & field.mask() as u32
    }

    /// Write the entire contents of a register without reading it first
    pub fn wo(&mut self, reg: Register, value: u32) {
        let addr = self.addr(reg);
        self.bus.write(addr, value);
    }

    /// Write a given field without reading it first
    pub fn wfo(&mut self, field: Field, value: u32) {
        let value = self.ms(field, value);
        self.wo(field.register(), value);
    }

    /// Read-modify-write a given field in this CSR
    pub fn rmwf(&mut self, field: Field, value: u32) {
        let previous = self.r(field.register()) & !((field.mask() as u32) << field.offset());
        let value = self.ms(field, value);
        self.wo(field.register(), previous | value);
    }

    /// Shift & mask a value to its final field position
    pub fn ms(&self, field: Field, value: u32) -> u32 { (value & field.mask() as u32) << field.offset() }
}

/// A contiguous, word-aligned span of bus addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    base: usize,
    len: usize,
}

impl Region {
    pub const fn new(base: usize, len: usize) -> Self { Region { base, len } }

    pub const fn base(&self) -> usize { self.base }

    /// Length in bytes
    pub const fn len(&self) -> usize { self.len }

    pub const fn words(&self) -> usize { self.len / WORD_SIZE }

    pub fn read_word<B: Bus>(&self, bus: &B, index: usize) -> u32 {
        debug_assert!(index < self.words(), "word {} outside region @{:x}", index, self.base);
        bus.read(self.base + index * WORD_SIZE)
    }

    pub fn write_word<B: Bus>(&self, bus: &mut B, index: usize, value: u32) {
        debug_assert!(index < self.words(), "word {} outside region @{:x}", index, self.base);
        bus.write(self.base + index * WORD_SIZE, value);
    }

    /// Sets every byte of the region to `byte`.
    pub fn fill<B: Bus>(&self, bus: &mut B, byte: u8) {
        let word = u32::from_ne_bytes([byte; WORD_SIZE]);
        for index in 0..self.words() {
            self.write_word(bus, index, word);
        }
    }

    /// Compares the first `len` bytes of `self` and `other`, byte for byte.
    pub fn same_bytes<B: Bus>(&self, other: &Region, bus: &B, len: usize) -> bool {
        debug_assert!(len <= self.len && len <= other.len);
        let full_words = len / WORD_SIZE;
        for index in 0..full_words {
            if self.read_word(bus, index) != other.read_word(bus, index) {
                return false;
            }
        }
        let tail = len % WORD_SIZE;
        if tail != 0 {
            let a = self.read_word(bus, full_words).to_ne_bytes();
            let b = other.read_word(bus, full_words).to_ne_bytes();
            if a[..tail] != b[..tail] {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::sim::SimBus;
    use super::*;

    const BLOCK: usize = 0x2000_0000;
    const CFG: Register = Register::new(2, 0xff);
    const CFG_MODE: Field = Field::new(3, 4, CFG);

    #[test]
    fn csr_addresses_registers_by_word_offset() {
        let mut bus = SimBus::new();
        let mut csr = Csr::new(&mut bus, BLOCK);
        csr.wo(CFG, 0xa5);
        assert_eq!(csr.r(CFG), 0xa5);
        assert_eq!(bus.writes(), &[(BLOCK + 8, 0xa5)]);
    }

    #[test]
    fn field_writes_shift_and_mask() {
        let mut bus = SimBus::new();
        let mut csr = Csr::new(&mut bus, BLOCK);
        csr.wfo(CFG_MODE, 0xf);
        assert_eq!(csr.r(CFG), 0x70);
        assert_eq!(csr.rf(CFG_MODE), 0x7);

        csr.wo(CFG, 0x0f);
        csr.rmwf(CFG_MODE, 0x2);
        assert_eq!(csr.r(CFG), 0x2f);
    }

    #[test]
    fn region_fill_and_compare() {
        let mut bus = SimBus::new();
        let a = Region::new(0x3000_0000, 16);
        let b = Region::new(0x3000_1000, 16);
        a.fill(&mut bus, 0xff);
        b.fill(&mut bus, 0xff);
        assert_eq!(a.read_word(&bus, 3), 0xffff_ffff);
        assert!(a.same_bytes(&b, &bus, 16));

        b.write_word(&mut bus, 3, 0xffff_ff00);
        assert!(!a.same_bytes(&b, &bus, 16));
        // only the bytes inside the compared length matter
        assert!(a.same_bytes(&b, &bus, 12));
    }

    #[test]
    fn region_compare_honours_partial_words() {
        let mut bus = SimBus::new();
        let a = Region::new(0x3000_0000, 8);
        let b = Region::new(0x3000_1000, 8);
        a.write_word(&mut bus, 0, u32::from_ne_bytes([1, 2, 3, 4]));
        b.write_word(&mut bus, 0, u32::from_ne_bytes([1, 2, 9, 9]));
        assert!(a.same_bytes(&b, &bus, 2));
        assert!(!a.same_bytes(&b, &bus, 3));
    }
}
