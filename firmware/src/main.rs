#![cfg_attr(target_os = "none", no_main)]
#![cfg_attr(target_os = "none", no_std)]

extern crate alloc;
// contains runtime setup
#[cfg(target_os = "none")]
mod asm;

mod bus;
mod cdma;
mod cmds;
mod diag;
mod irq;
mod platform;
mod repl;

use alloc::collections::VecDeque;
use core::cell::RefCell;
use core::fmt::Write;

use bus::Bus;
use cmds::Action;
use critical_section::Mutex;
use diag::MemoryRegion;
#[allow(unused_imports)]
use platform::*;
use repl::Repl;

static UART_RX: Mutex<RefCell<VecDeque<u8>>> = Mutex::new(RefCell::new(VecDeque::new()));

/// Queues one received console byte. Safe to call from interrupt context.
pub fn uart_rx_push(byte: u8) {
    critical_section::with(|cs| {
        UART_RX.borrow(cs).borrow_mut().push_back(byte);
    });
}

/// True when received bytes are waiting for the console.
#[cfg_attr(not(target_os = "none"), allow(dead_code))]
pub fn rx_pending() -> bool { critical_section::with(|cs| !UART_RX.borrow(cs).borrow().is_empty()) }

/// Feeds every queued byte to the console. The queue is only locked while a
/// byte is popped; commands run with interrupts enabled.
pub fn drain_rx<B: Bus>(repl: &mut Repl<B>, bus: &mut B, out: &mut dyn Write) -> Action {
    loop {
        let byte = critical_section::with(|cs| UART_RX.borrow(cs).borrow_mut().pop_front());
        match byte {
            Some(c) => {
                if repl.rx_char(c, bus, out) == Action::Reset {
                    return Action::Reset;
                }
            }
            None => return Action::Continue,
        }
    }
}

/// Boot sequence up to the first prompt: RAM tests over `regions`, then the
/// banner. Returns the console, ready for input.
pub fn boot<B: Bus>(bus: &mut B, regions: &'static [MemoryRegion], out: &mut dyn Write) -> Repl<B> {
    diag::test_ram_all(bus, regions, out);
    #[cfg(feature = "dma-boot")]
    diag::test_dma(bus, "CDMA", &cdma::Cdma::engine_a(), &cdma::Cdma::engine_b(), out);

    let repl = Repl::with_default_commands(regions);
    repl.help(out);
    repl.prompt(out);
    repl
}

#[cfg(target_os = "none")]
pub fn uart_irq_handler() {
    use crate::debug::SerialRead;
    let mut uart = crate::debug::Uart {};

    while let Some(c) = uart.getc() {
        uart_rx_push(c);
    }
}

/// Entrypoint
///
/// # Safety
///
/// This function is safe to call exactly once.
#[cfg(target_os = "none")]
#[export_name = "rust_entry"]
pub unsafe extern "C" fn rust_entry() -> ! {
    crate::platform::early_init();

    let mut bus = bus::Mmio::new();
    let mut uart = crate::debug::Uart {};
    let mut repl = boot(&mut bus, &diag::AXI_REGIONS, &mut uart);

    loop {
        if drain_rx(&mut repl, &mut bus, &mut uart) == Action::Reset {
            // the SoC is going down; stay quiet until it does
            loop {
                riscv::asm::wfi();
            }
        }
        // With MIE clear a byte can't slip in between the check and the
        // sleep; a pending interrupt still wakes wfi and is taken once MIE
        // is set again.
        riscv::register::mstatus::clear_mie();
        if !rx_pending() {
            riscv::asm::wfi();
        }
        riscv::register::mstatus::set_mie();
    }
}

#[cfg(not(target_os = "none"))]
fn main() -> Result<(), platform::hosted::SimConfigError> { platform::hosted::run() }

#[cfg(test)]
mod tests {
    use utralib::*;

    use super::*;
    use crate::bus::sim::SimBus;

    #[test]
    fn boot_reports_ram_then_banner_then_prompt() {
        let mut bus = SimBus::new();
        let mut out = String::new();
        let repl = boot(&mut bus, &diag::AXI_REGIONS[..1], &mut out);

        let ram = out.find("Testing AXI-RAM at @0x40000000...\nerrors: 0\n").unwrap();
        let banner = out.find("AXI-MMAP test firmware").unwrap();
        assert!(ram < banner);
        assert!(out.ends_with(repl::PROMPT));
        assert!(!repl.halted());
    }

    #[test]
    fn queued_input_reaches_the_console() {
        let mut bus = SimBus::new();
        let mut out = String::new();
        let mut repl = boot(&mut bus, &diag::AXI_REGIONS[..1], &mut out);
        bus.clear_log();
        out.clear();

        assert!(!rx_pending());
        for &c in b"frobnicate\rreboot\r" {
            uart_rx_push(c);
        }
        assert!(rx_pending());
        assert_eq!(drain_rx(&mut repl, &mut bus, &mut out), Action::Reset);
        assert!(!rx_pending());
        assert_eq!(out, format!("frobnicate\n{}reboot\n", repl::PROMPT));
        assert_eq!(bus.writes_to(HW_CTRL_BASE), vec![1]);
        assert_eq!(bus.writes().len(), 1);
    }
}
