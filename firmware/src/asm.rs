use core::arch::asm;

use utralib::HW_UART_BASE;

use crate::platform;
// Assembly stubs for entering the firmware, and for dying loudly.

#[link_section = ".text.init"]
#[export_name = "_start"]
pub extern "C" fn _start() {
    unsafe {
        #[rustfmt::skip]
        asm! (
            // Place the stack pointer at the end of RAM
            "mv          sp, {ram_top}",

            ".option push",
            ".option norelax",
            "la          gp, __global_pointer$",
            ".option pop",

            // Copy initialized data out of ROM
            "la          t0, _sidata",
            "la          t1, _sdata",
            "la          t2, _edata",
        "20:",
            "bgeu        t1, t2, 21f",
            "lw          t3, 0(t0)",
            "sw          t3, 0(t1)",
            "addi        t0, t0, 4",
            "addi        t1, t1, 4",
            "j           20b",
        "21:",

            // Clear .bss
            "la          t0, _sbss",
            "la          t1, _ebss",
        "30:",
            "bgeu        t0, t1, 31f",
            "sw          x0, 0(t0)",
            "addi        t0, t0, 4",
            "j           30b",
        "31:",

            // Install a machine mode trap handler until interrupts are set up
            "la          t0, abort",
            "csrw        mtvec, t0",

            // Start Rust
            "j   rust_entry",

            ram_top = in(reg) (platform::RAM_BASE + platform::RAM_SIZE),
            options(noreturn)
        );
    }
}

#[link_section = ".text.init"]
#[export_name = "abort"]
/// Early trap target: prints `!` to the UART forever.
pub extern "C" fn abort() -> ! {
    unsafe {
        #[rustfmt::skip]
        asm!(
            "li          t0, {uart}",
            "li          t1, 0x21",
        "40:", // wait for TXFULL to clear, then send
            "lw          t2, 0x4(t0)",
            "bne         x0, t2, 40b",
            "sw          t1, 0x0(t0)",
            "j           40b",
            uart = const HW_UART_BASE,
            options(noreturn)
        );
    }
}
