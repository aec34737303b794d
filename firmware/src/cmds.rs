use core::fmt::Write;

use crate::bus::{Bus, WORD_SIZE};

/////////////////////////// Common items to all commands

/// What the console does once a command returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    /// A reset was requested; nothing further is printed.
    Reset,
}

pub struct CmdEnv<'a, B: Bus> {
    pub bus: &'a mut B,
    pub out: &'a mut dyn Write,
    /// (verb, description) of every registered command, in registration order.
    pub usage: &'a [(&'static str, &'static str)],
}

pub trait ShellCmdApi<B: Bus> {
    // returns my verb
    fn verb(&self) -> &'static str;
    // one-line description shown by `help`
    fn usage(&self) -> &'static str;
    // called to process the command with the remainder of the line attached
    fn process(&mut self, args: &str, env: &mut CmdEnv<'_, B>) -> Action;
}

/*
    To add a new command:
        0. implement ShellCmdApi for it in its own module under cmds/
        1. mod/use the new module below
        2. register it in Repl::with_default_commands()
*/
mod help;
pub use help::*;
mod reboot;
pub use reboot::*;
mod ramtest;
pub use ramtest::*;
mod dmatest;
pub use dmatest::*;
mod peek;
pub use peek::*;
mod poke;
pub use poke::*;

/// Most words a single `peek` or `poke` touches.
pub const MAX_WORDS: usize = 1024;

/// Address of word `index` past `base`, or `None` past the end of the address space.
pub fn word_addr(base: usize, index: usize) -> Option<usize> {
    index.checked_mul(WORD_SIZE).and_then(|offset| base.checked_add(offset))
}

/// Banner and command list, as printed at boot and by `help`.
pub fn print_help(out: &mut dyn Write, usage: &[(&'static str, &'static str)]) {
    writeln!(out, "\nAXI-MMAP test firmware v{}\n", env!("CARGO_PKG_VERSION")).ok();
    writeln!(out, "Available commands:").ok();
    for (verb, description) in usage {
        writeln!(out, "{:<19}- {}", verb, description).ok();
    }
}
