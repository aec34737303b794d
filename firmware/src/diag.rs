//! Hardware exercisers: the AXI RAM smoke test and the dual CDMA verifier.
//!
//! Both report to the operator sink and return their mismatch count. Neither
//! ever aborts; a failing check only bumps the count.

use core::fmt::Write;

use utralib::*;

use crate::bus::{Bus, Region};
use crate::cdma::{Cdma, DONE_POLL_BUDGET};

/// Written to word 0 and word 1 of every region under test.
pub const RAM_PATTERNS: [u32; 2] = [0x5aa5_5aa5, 0x1234_5678];

/// Every byte of every CDMA buffer before the markers go in.
pub const SENTINEL: u8 = 0xff;
/// (word offset, value) written into engine A's source buffer.
pub const MARKER_A: (usize, u32) = (1, 0x1234_5678);
/// (word offset, value) written into engine B's source buffer.
pub const MARKER_B: (usize, u32) = (2, 0xaabb_ccdd);

const DUMP_COLUMNS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryRegion {
    pub name: &'static str,
    pub base: usize,
    pub size: usize,
}

impl MemoryRegion {
    pub const fn new(name: &'static str, base: usize, size: usize) -> Self { MemoryRegion { name, base, size } }
}

/// The AXI slaves checked at boot, in test order.
pub static AXI_REGIONS: [MemoryRegion; 7] = [
    MemoryRegion::new("AXI-RAM", HW_AXI_RAM_MEM, HW_AXI_RAM_MEM_LEN),
    MemoryRegion::new("AXI-DP-RAM-A", HW_AXI_DP_RAM_A_MEM, HW_AXI_DP_RAM_A_MEM_LEN),
    MemoryRegion::new("AXI-DP-RAM-B", HW_AXI_DP_RAM_B_MEM, HW_AXI_DP_RAM_B_MEM_LEN),
    MemoryRegion::new("AXI-RAM-REG", HW_AXI_RAM_REG_MEM, HW_AXI_RAM_REG_MEM_LEN),
    MemoryRegion::new("AXI-RAM-FIFO", HW_AXI_RAM_FIFO_MEM, HW_AXI_RAM_FIFO_MEM_LEN),
    MemoryRegion::new("AXI-RAM-XBAR", HW_AXI_RAM_XBAR_MEM, HW_AXI_RAM_XBAR_MEM_LEN),
    MemoryRegion::new("AXI-RAM-INT", HW_AXI_RAM_INT_MEM, HW_AXI_RAM_INT_MEM_LEN),
];

/// Wiring smoke test: two patterns into the first two words, read back.
///
/// This only proves the slave decodes, accepts writes and returns data. It
/// is not a memory test and is deliberately not extended over the region.
pub fn test_ram<B: Bus>(bus: &mut B, region: &MemoryRegion, out: &mut dyn Write) -> u32 {
    let ram = Region::new(region.base, region.size);
    let mut errors = 0;

    writeln!(out, "\nTesting {} at @0x{:08x}...", region.name, region.base).ok();

    for (index, &pattern) in RAM_PATTERNS.iter().enumerate() {
        ram.write_word(bus, index, pattern);
    }
    for (index, &pattern) in RAM_PATTERNS.iter().enumerate() {
        if ram.read_word(bus, index) != pattern {
            errors += 1;
        }
    }

    writeln!(out, "errors: {}", errors).ok();
    errors
}

/// Runs `test_ram` over `regions` in order; returns the summed errors.
pub fn test_ram_all<B: Bus>(bus: &mut B, regions: &[MemoryRegion], out: &mut dyn Write) -> u32 {
    let total: u32 = regions.iter().map(|region| test_ram(bus, region, out)).sum();
    log::info!("ram tests: {} regions, {} errors", regions.len(), total);
    total
}

/// Sentinel-fills all four buffers and plants each engine's marker.
pub fn init_buffers<B: Bus>(bus: &mut B, a: &Cdma, b: &Cdma) {
    for region in [a.buffers().src, a.buffers().dst, b.buffers().src, b.buffers().dst] {
        region.fill(bus, SENTINEL);
    }
    a.buffers().src.write_word(bus, MARKER_A.0, MARKER_A.1);
    b.buffers().src.write_word(bus, MARKER_B.0, MARKER_B.1);
}

/// (B.src, A.dst) and (A.src, B.dst), compared over each destination's size.
fn cross_pairs<B: Bus>(bus: &B, a: &Cdma, b: &Cdma) -> [bool; 2] {
    let (pa, pb) = (a.buffers(), b.buffers());
    [pb.src.same_bytes(&pa.dst, bus, pa.dst.len()), pa.src.same_bytes(&pb.dst, bus, pb.dst.len())]
}

/// Before any transfer the engines were never connected, so each cross pair
/// must differ. Counts the pairs that are equal.
pub fn precondition_errors<B: Bus>(bus: &B, a: &Cdma, b: &Cdma) -> u32 {
    cross_pairs(bus, a, b).iter().filter(|&&same| same).count() as u32
}

/// After the transfers each engine's destination must hold the *other*
/// engine's source. Counts the pairs that differ.
pub fn postcondition_errors<B: Bus>(bus: &B, a: &Cdma, b: &Cdma) -> u32 {
    cross_pairs(bus, a, b).iter().filter(|&&same| !same).count() as u32
}

fn dump_region<B: Bus>(bus: &B, label: &str, region: &Region, out: &mut dyn Write) {
    write!(out, "{} @0x{:08x}:", label, region.base()).ok();
    for index in 0..region.words() {
        if index % DUMP_COLUMNS == 0 {
            write!(out, "\n  {:08x}: ", region.base() + index * crate::bus::WORD_SIZE).ok();
        }
        write!(out, "{:08x} ", region.read_word(bus, index)).ok();
    }
    out.write_str("\n").ok();
}

fn dump_buffers<B: Bus>(bus: &B, phase: &str, a: &Cdma, b: &Cdma, out: &mut dyn Write) {
    writeln!(out, "-- {} --", phase).ok();
    for engine in [a, b] {
        let pair = engine.buffers();
        write!(out, "{}.", engine.name()).ok();
        dump_region(bus, "src", &pair.src, out);
        write!(out, "{}.", engine.name()).ok();
        dump_region(bus, "dst", &pair.dst, out);
    }
}

/// Dual CDMA transfer check over engines `a` and `b`.
pub fn test_dma<B: Bus>(bus: &mut B, name: &str, a: &Cdma, b: &Cdma, out: &mut dyn Write) -> u32 {
    let mut errors = 0;
    writeln!(out, "\nTesting {}...", name).ok();

    init_buffers(bus, a, b);
    errors += precondition_errors(bus, a, b);
    dump_buffers(bus, "before", a, b, out);

    for engine in [a, b] {
        engine.start(bus);
    }
    // the verification below is only meaningful once both engines are idle
    for engine in [a, b] {
        match engine.wait_done(bus, DONE_POLL_BUDGET) {
            Ok(polls) => log::debug!("{}: done after {} polls", engine.name(), polls),
            Err(e) => log::warn!("{}: no completion: {:?}", engine.name(), e),
        }
    }

    dump_buffers(bus, "after", a, b, out);
    errors += postcondition_errors(bus, a, b);

    writeln!(out, "errors: {}", errors).ok();
    errors
}
