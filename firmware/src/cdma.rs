//! Driver for the two AXI CDMA engines.
//!
//! Each engine moves `len` bytes from `read_addr` to `write_addr` when its
//! `valid` strobe sees a rising edge, and raises `status.done` once the last
//! beat has landed. Both instances share the `cdma0` register layout.

use utralib::utra::cdma0;
use utralib::*;

use crate::bus::{Bus, Csr, Region};

/// Polls of `status.done` before an engine is declared stuck.
pub const DONE_POLL_BUDGET: u32 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CdmaError {
    /// `status.done` never rose within the poll budget.
    Timeout { engine: &'static str, polls: u32 },
}

/// Source and destination buffers statically wired to one engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferPair {
    pub src: Region,
    pub dst: Region,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cdma {
    name: &'static str,
    base: usize,
    buffers: BufferPair,
}

impl Cdma {
    pub const fn new(name: &'static str, base: usize, buffers: BufferPair) -> Self {
        Cdma { name, base, buffers }
    }

    /// Engine A, bound to the CDMA0 buffer pair.
    pub const fn engine_a() -> Self {
        Cdma::new(
            "cdma0",
            HW_CDMA0_BASE,
            BufferPair {
                src: Region::new(HW_CDMA0_SRC_MEM, HW_CDMA0_SRC_MEM_LEN),
                dst: Region::new(HW_CDMA0_DST_MEM, HW_CDMA0_DST_MEM_LEN),
            },
        )
    }

    /// Engine B, bound to the CDMA1 buffer pair.
    pub const fn engine_b() -> Self {
        Cdma::new(
            "cdma1",
            HW_CDMA1_BASE,
            BufferPair {
                src: Region::new(HW_CDMA1_SRC_MEM, HW_CDMA1_SRC_MEM_LEN),
                dst: Region::new(HW_CDMA1_DST_MEM, HW_CDMA1_DST_MEM_LEN),
            },
        )
    }

    pub fn name(&self) -> &'static str { self.name }

    pub fn base(&self) -> usize { self.base }

    pub fn buffers(&self) -> &BufferPair { &self.buffers }

    /// Points the engine at its own buffer pair. `len` always covers the
    /// whole destination buffer.
    pub fn program<B: Bus>(&self, bus: &mut B) {
        let mut csr = Csr::new(bus, self.base);
        let BufferPair { src, dst } = self.buffers;
        log::debug!("{}: {:08x} -> {:08x}, {} bytes", self.name, src.base(), dst.base(), dst.len());
        csr.wo(cdma0::READ_ADDR, src.base() as u32);
        csr.wo(cdma0::WRITE_ADDR, dst.base() as u32);
        csr.wo(cdma0::LEN, dst.len() as u32);
    }

    /// Drives one rising edge on `valid`: 1 then 0. Starts exactly one
    /// transfer; the strobe is left low so the next pulse is a fresh edge.
    pub fn pulse<B: Bus>(&self, bus: &mut B) {
        let mut csr = Csr::new(bus, self.base);
        csr.wfo(cdma0::VALID_VALID, 1);
        csr.wfo(cdma0::VALID_VALID, 0);
    }

    /// Programs the engine and pulses its strobe.
    pub fn start<B: Bus>(&self, bus: &mut B) {
        self.program(bus);
        self.pulse(bus);
    }

    /// Spins on `status.done` for at most `budget` polls. Returns the number
    /// of polls it took.
    pub fn wait_done<B: Bus>(&self, bus: &mut B, budget: u32) -> Result<u32, CdmaError> {
        let csr = Csr::new(bus, self.base);
        for polls in 1..=budget {
            if csr.rf(cdma0::STATUS_DONE) != 0 {
                return Ok(polls);
            }
        }
        Err(CdmaError::Timeout { engine: self.name, polls: budget })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::sim::{DmaModel, SimBus};

    #[test]
    fn trigger_writes_registers_in_order() {
        let mut bus = SimBus::new();
        let a = Cdma::engine_a();
        a.start(&mut bus);
        assert_eq!(
            bus.writes(),
            &[
                (HW_CDMA0_BASE, HW_CDMA0_SRC_MEM as u32),
                (HW_CDMA0_BASE + 4, HW_CDMA0_DST_MEM as u32),
                (HW_CDMA0_BASE + 8, HW_CDMA0_DST_MEM_LEN as u32),
                (HW_CDMA0_BASE + 12, 1),
                (HW_CDMA0_BASE + 12, 0),
            ]
        );
    }

    #[test]
    fn engines_touch_only_their_own_block() {
        let mut bus = SimBus::new();
        Cdma::engine_b().start(&mut bus);
        assert!(bus.writes().iter().all(|(addr, _)| (HW_CDMA1_BASE..HW_CDMA1_BASE + 0x20).contains(addr)));
        assert_eq!(bus.transfers(HW_CDMA1_BASE), 1);
        assert_eq!(bus.transfers(HW_CDMA0_BASE), 0);
    }

    #[test]
    fn completed_transfer_is_observed() {
        let mut bus = SimBus::new();
        let a = Cdma::engine_a();
        a.start(&mut bus);
        assert_eq!(a.wait_done(&mut bus, DONE_POLL_BUDGET), Ok(1));
    }

    #[test]
    fn silent_engine_times_out() {
        let mut bus = SimBus::new().with_dma_model(HW_CDMA1_BASE, DmaModel::NoOp);
        let b = Cdma::engine_b();
        b.start(&mut bus);
        assert_eq!(b.wait_done(&mut bus, 16), Err(CdmaError::Timeout { engine: "cdma1", polls: 16 }));
    }

    #[test]
    fn pulse_starts_exactly_one_transfer() {
        let mut bus = SimBus::new();
        let a = Cdma::engine_a();
        a.start(&mut bus);
        a.pulse(&mut bus);
        assert_eq!(bus.transfers(HW_CDMA0_BASE), 2);
    }
}
