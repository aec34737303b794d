use utralib::utra;

/// Routes one interrupt entry. Only the UART source is serviced; any other
/// bit in `pending & mask` is left alone. Returns the active set.
pub fn dispatch(pending: u32, mask: u32, uart_isr: impl FnOnce()) -> u32 {
    let active = pending & mask;
    if active & (1 << utra::uart::UART_IRQ) != 0 {
        uart_isr();
    }
    active
}

#[cfg(all(target_os = "none", target_arch = "riscv32"))]
mod trap {
    use riscv::register::{mcause, mepc, mie, mstatus};
    use vexriscv::register::vexriscv::{mim, mip};

    /// mcause of a machine external interrupt
    const MACHINE_EXTERNAL: usize = 0x8000_000b;

    // Caller-saved registers go on the interrupted stack; the Rust handler
    // preserves the rest.
    core::arch::global_asm!(
        ".section .text._start_trap",
        ".global _start_trap",
        ".align 4",
        "_start_trap:",
        "addi   sp, sp, -16*4",
        "sw     ra, 0*4(sp)",
        "sw     t0, 1*4(sp)",
        "sw     t1, 2*4(sp)",
        "sw     t2, 3*4(sp)",
        "sw     t3, 4*4(sp)",
        "sw     t4, 5*4(sp)",
        "sw     t5, 6*4(sp)",
        "sw     t6, 7*4(sp)",
        "sw     a0, 8*4(sp)",
        "sw     a1, 9*4(sp)",
        "sw     a2, 10*4(sp)",
        "sw     a3, 11*4(sp)",
        "sw     a4, 12*4(sp)",
        "sw     a5, 13*4(sp)",
        "sw     a6, 14*4(sp)",
        "sw     a7, 15*4(sp)",
        "jal    ra, _start_trap_rust",
        "lw     ra, 0*4(sp)",
        "lw     t0, 1*4(sp)",
        "lw     t1, 2*4(sp)",
        "lw     t2, 3*4(sp)",
        "lw     t3, 4*4(sp)",
        "lw     t4, 5*4(sp)",
        "lw     t5, 6*4(sp)",
        "lw     t6, 7*4(sp)",
        "lw     a0, 8*4(sp)",
        "lw     a1, 9*4(sp)",
        "lw     a2, 10*4(sp)",
        "lw     a3, 11*4(sp)",
        "lw     a4, 12*4(sp)",
        "lw     a5, 13*4(sp)",
        "lw     a6, 14*4(sp)",
        "lw     a7, 15*4(sp)",
        "addi   sp, sp, 16*4",
        "mret",
    );

    pub fn irq_setup() {
        unsafe {
            #[rustfmt::skip]
            core::arch::asm!(
                // Set trap handler, which will be called
                // on interrupts and cpu faults
                "la   t0, _start_trap",
                "csrw mtvec, t0",
                out("t0") _,
            );
        }

        mim::write(0x0); // first make sure everything is disabled, so we aren't OR'ing in garbage
        unsafe {
            mstatus::set_mie();
        }
        // must enable external interrupts on the CPU for any of the above to matter
        unsafe { mie::set_mext() };
    }

    pub fn enable_irq(irq_no: usize) {
        // Note that the vexriscv "IRQ Mask" register is inverse-logic --
        // that is, setting a bit in the "mask" register unmasks (i.e. enables) it.
        mim::write(mim::read() | (1 << irq_no));
    }

    #[export_name = "_start_trap_rust"]
    pub extern "C" fn trap_handler() {
        let cause = mcause::read();
        if cause.bits() == MACHINE_EXTERNAL {
            let active = super::dispatch(mip::read() as u32, mim::read() as u32, crate::uart_irq_handler);
            log::trace!("irq: {:x}", active);
        } else {
            panic!("Unhandled trap {:x} @ {:x}", cause.bits(), mepc::read());
        }
    }
}

#[cfg(all(target_os = "none", target_arch = "riscv32"))]
pub use trap::*;

#[cfg(test)]
mod tests {
    use super::*;

    const UART_BIT: u32 = 1 << utra::uart::UART_IRQ;
    const TIMER_BIT: u32 = 1 << utra::timer0::TIMER0_IRQ;

    #[test]
    fn uart_pending_and_unmasked_is_forwarded() {
        let mut calls = 0;
        let active = dispatch(UART_BIT | TIMER_BIT, UART_BIT, || calls += 1);
        assert_eq!(calls, 1);
        assert_eq!(active, UART_BIT);
    }

    #[test]
    fn masked_uart_is_not_forwarded() {
        let mut calls = 0;
        dispatch(UART_BIT, TIMER_BIT, || calls += 1);
        assert_eq!(calls, 0);
    }

    #[test]
    fn other_sources_are_ignored() {
        let mut calls = 0;
        let active = dispatch(TIMER_BIT, TIMER_BIT | UART_BIT, || calls += 1);
        assert_eq!(calls, 0);
        assert_eq!(active, TIMER_BIT);
    }
}
