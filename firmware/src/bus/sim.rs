//! A simulated SoC bus for hosted runs and unit tests.
//!
//! Memory is a sparse word store that reads back 0 where nothing was written.
//! The two CDMA engines of the register map are modelled: a rising edge on an
//! engine's `valid` register runs its transfer immediately and raises
//! `status.done`, unless the engine is configured as a no-op.

use std::collections::BTreeMap;
use std::ops::Range;

use utralib::utra::cdma0;
use utralib::{Register, HW_CDMA0_BASE, HW_CDMA1_BASE};

use super::{Bus, WORD_SIZE};

/// How a simulated engine reacts when triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DmaModel {
    /// Copies `len` bytes from `read_addr` to `write_addr`.
    Copy,
    /// Copies, but reads landing in `from..from + len` are served from the
    /// same offset in the window at `to`. Models an interconnect that routes
    /// the engine's read master somewhere other than where it was pointed.
    Remap { from: usize, to: usize, len: usize },
    /// Ignores the strobe and never reports completion.
    NoOp,
}

#[derive(Debug)]
struct SimEngine {
    base: usize,
    model: DmaModel,
    strobe: u32,
    transfers: usize,
}

impl SimEngine {
    fn new(base: usize) -> Self { SimEngine { base, model: DmaModel::Copy, strobe: 0, transfers: 0 } }

    fn reg(&self, reg: Register) -> usize { self.base + reg.offset() * WORD_SIZE }
}

#[derive(Debug)]
pub struct SimBus {
    mem: BTreeMap<usize, u32>,
    stuck_at_zero: Vec<Range<usize>>,
    writes: Vec<(usize, u32)>,
    engines: Vec<SimEngine>,
}

impl Default for SimBus {
    fn default() -> Self { Self::new() }
}

impl SimBus {
    /// Healthy memory everywhere, both engines copying faithfully.
    pub fn new() -> Self {
        SimBus {
            mem: BTreeMap::new(),
            stuck_at_zero: Vec::new(),
            writes: Vec::new(),
            engines: vec![SimEngine::new(HW_CDMA0_BASE), SimEngine::new(HW_CDMA1_BASE)],
        }
    }

    /// Selects the behaviour of the engine whose CSR block is at `engine_base`.
    pub fn with_dma_model(mut self, engine_base: usize, model: DmaModel) -> Self {
        match self.engines.iter_mut().find(|e| e.base == engine_base) {
            Some(engine) => engine.model = model,
            None => log::warn!("no simulated engine at {:08x}", engine_base),
        }
        self
    }

    /// Makes every byte address in `range` drop writes and read back as 0.
    pub fn with_stuck_at_zero(mut self, range: Range<usize>) -> Self {
        self.stuck_at_zero.push(range);
        self
    }

    /// CPU-side writes in issue order. Engine bus-master traffic is not logged.
    pub fn writes(&self) -> &[(usize, u32)] { &self.writes }

    /// Values written to `addr`, in issue order.
    pub fn writes_to(&self, addr: usize) -> Vec<u32> {
        self.writes.iter().filter(|(a, _)| *a == addr).map(|(_, v)| *v).collect()
    }

    pub fn clear_log(&mut self) { self.writes.clear(); }

    /// Number of transfers the engine at `engine_base` has carried out.
    pub fn transfers(&self, engine_base: usize) -> usize {
        self.engines.iter().find(|e| e.base == engine_base).map(|e| e.transfers).unwrap_or(0)
    }

    fn stuck(&self, addr: usize) -> bool { self.stuck_at_zero.iter().any(|r| r.contains(&addr)) }

    fn load(&self, addr: usize) -> u32 {
        if self.stuck(addr) { 0 } else { self.mem.get(&addr).copied().unwrap_or(0) }
    }

    fn store(&mut self, addr: usize, value: u32) {
        if !self.stuck(addr) {
            self.mem.insert(addr, value);
        }
    }

    fn run_engine(&mut self, index: usize) {
        let (model, src, dst, len, status) = {
            let engine = &self.engines[index];
            (
                engine.model,
                self.load(engine.reg(cdma0::READ_ADDR)) as usize,
                self.load(engine.reg(cdma0::WRITE_ADDR)) as usize,
                self.load(engine.reg(cdma0::LEN)) as usize,
                engine.reg(cdma0::STATUS),
            )
        };
        // a new transfer always clears the previous completion
        self.store(status, 0);
        if model == DmaModel::NoOp {
            return;
        }
        for offset in (0..len).step_by(WORD_SIZE) {
            let from = match model {
                DmaModel::Remap { from, to, len } if (from..from + len).contains(&(src + offset)) => {
                    to + (src + offset - from)
                }
                _ => src + offset,
            };
            let word = self.load(from);
            self.store(dst + offset, word);
        }
        self.engines[index].transfers += 1;
        self.store(status, 1 << cdma0::STATUS_DONE.offset());
    }
}

impl Bus for SimBus {
    fn read(&self, addr: usize) -> u32 { self.load(addr) }

    fn write(&mut self, addr: usize, value: u32) {
        self.writes.push((addr, value));
        self.store(addr, value);
        if let Some(index) = self.engines.iter().position(|e| e.reg(cdma0::VALID) == addr) {
            let level = value & cdma0::VALID_VALID.mask() as u32;
            let rising = self.engines[index].strobe == 0 && level != 0;
            self.engines[index].strobe = level;
            if rising {
                self.run_engine(index);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trigger(bus: &mut SimBus, base: usize, src: usize, dst: usize, len: u32) {
        bus.write(base, src as u32);
        bus.write(base + 4, dst as u32);
        bus.write(base + 8, len);
        bus.write(base + 12, 1);
        bus.write(base + 12, 0);
    }

    #[test]
    fn unwritten_memory_reads_zero() {
        let bus = SimBus::new();
        assert_eq!(bus.read(0x4000_0000), 0);
    }

    #[test]
    fn stuck_range_drops_writes() {
        let mut bus = SimBus::new().with_stuck_at_zero(0x4000_0000..0x4000_1000);
        bus.write(0x4000_0000, 0x1234_5678);
        bus.write(0x4000_1000, 0x1234_5678);
        assert_eq!(bus.read(0x4000_0000), 0);
        assert_eq!(bus.read(0x4000_1000), 0x1234_5678);
        assert_eq!(bus.writes_to(0x4000_0000), vec![0x1234_5678]);
    }

    #[test]
    fn rising_edge_copies_once() {
        let mut bus = SimBus::new();
        bus.write(0x5000_0000, 0xdead_beef);
        trigger(&mut bus, HW_CDMA0_BASE, 0x5000_0000, 0x5000_1000, 8);
        assert_eq!(bus.read(0x5000_1000), 0xdead_beef);
        assert_eq!(bus.read(HW_CDMA0_BASE + 16), 1);
        assert_eq!(bus.transfers(HW_CDMA0_BASE), 1);

        // a fresh edge runs again, holding the level high does not
        bus.write(HW_CDMA0_BASE + 12, 1);
        assert_eq!(bus.transfers(HW_CDMA0_BASE), 2);
        bus.write(HW_CDMA0_BASE + 12, 1);
        assert_eq!(bus.transfers(HW_CDMA0_BASE), 2);
    }

    #[test]
    fn noop_engine_never_completes() {
        let mut bus = SimBus::new().with_dma_model(HW_CDMA1_BASE, DmaModel::NoOp);
        bus.write(0x5000_2000, 0xdead_beef);
        trigger(&mut bus, HW_CDMA1_BASE, 0x5000_2000, 0x5000_3000, 8);
        assert_eq!(bus.read(0x5000_3000), 0);
        assert_eq!(bus.read(HW_CDMA1_BASE + 16), 0);
        assert_eq!(bus.transfers(HW_CDMA1_BASE), 0);
    }

    #[test]
    fn remapped_reads_come_from_the_other_window() {
        let mut bus = SimBus::new().with_dma_model(
            HW_CDMA0_BASE,
            DmaModel::Remap { from: 0x5000_0000, to: 0x5000_2000, len: 64 },
        );
        bus.write(0x5000_0000, 0x1111_1111);
        bus.write(0x5000_2000, 0x2222_2222);
        trigger(&mut bus, HW_CDMA0_BASE, 0x5000_0000, 0x5000_1000, 4);
        assert_eq!(bus.read(0x5000_1000), 0x2222_2222);
    }
}
