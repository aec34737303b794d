use core::fmt::{Error, Write};

use utralib::*;

use crate::bus::{Csr, Mmio};

/// A trait for serial like drivers which allows reading from a source.
pub trait SerialRead {
    /// Read a single byte.
    fn getc(&mut self) -> Option<u8>;
}

/// The LiteX UART. Stateless: every call goes straight to the CSR block.
pub struct Uart {}

impl Uart {
    fn csr<R>(f: impl FnOnce(&mut Csr<'_, Mmio>) -> R) -> R {
        // safety: the UART block is only ever driven through this type
        let mut bus = unsafe { Mmio::new() };
        let mut uart = Csr::new(&mut bus, HW_UART_BASE);
        f(&mut uart)
    }

    pub fn putc(&self, c: u8) {
        Self::csr(|uart| {
            // Wait until TXFULL is `0`
            while uart.r(utra::uart::TXFULL) != 0 {}
            uart.wo(utra::uart::RXTX, c as u32)
        })
    }

    pub fn enable_rx(enable: bool) {
        Self::csr(|uart| {
            uart.wfo(utra::uart::EV_PENDING_RX, 1);
            uart.rmwf(utra::uart::EV_ENABLE_RX, enable as u32);
        })
    }
}

impl Write for Uart {
    fn write_str(&mut self, s: &str) -> Result<(), Error> {
        for c in s.bytes() {
            if c == b'\n' {
                self.putc(b'\r');
            }
            self.putc(c);
        }
        Ok(())
    }
}

impl SerialRead for Uart {
    fn getc(&mut self) -> Option<u8> {
        Self::csr(|uart| match uart.rf(utra::uart::RXEMPTY_RXEMPTY) {
            1 => None,
            _ => {
                let ret = Some(uart.r(utra::uart::RXTX) as u8);
                uart.wfo(utra::uart::EV_PENDING_RX, 1);
                ret
            }
        })
    }
}

#[macro_use]
pub mod debug_print_hardware {
    #[macro_export]
    macro_rules! print
    {
        ($($args:tt)+) => ({
                use core::fmt::Write;
                let _ = write!(crate::debug::Uart {}, $($args)+);
        });
    }
}

#[macro_export]
macro_rules! println
{
    () => ({
        $crate::print!("\n")
    });
    ($fmt:expr) => ({
        $crate::print!(concat!($fmt, "\n"))
    });
    ($fmt:expr, $($args:tt)+) => ({
        $crate::print!(concat!($fmt, "\n"), $($args)+)
    });
}

#[derive(Debug)]
pub enum LogError {
    LoggerExists,
}

struct UartLogger;
static UART_LOGGER: UartLogger = UartLogger {};

impl log::Log for UartLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool { metadata.level() <= log::max_level() }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            crate::println!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

pub fn init_logger() -> Result<(), LogError> {
    log::set_logger(&UART_LOGGER).map_err(|_| LogError::LoggerExists)?;
    #[cfg(feature = "verbose-debug")]
    log::set_max_level(log::LevelFilter::Debug);
    #[cfg(not(feature = "verbose-debug"))]
    log::set_max_level(log::LevelFilter::Info);
    Ok(())
}
