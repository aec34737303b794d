use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::fmt::Write;

use crate::bus::Bus;
use crate::cdma::Cdma;
use crate::cmds::*;
use crate::diag::MemoryRegion;

pub const PROMPT: &str = "\x1b[92;1maxi-mmap\x1b[0m> ";

/// Bytes of line storage, one of which is kept for the terminator.
pub const LINE_CAPACITY: usize = 64;

/// Assembles console bytes into lines, echoing as it goes.
pub struct LineReader {
    buf: [u8; LINE_CAPACITY],
    len: usize,
}

impl Default for LineReader {
    fn default() -> Self { Self::new() }
}

impl LineReader {
    pub const fn new() -> Self { LineReader { buf: [0; LINE_CAPACITY], len: 0 } }

    /// Feeds one received byte. Returns the finished line when `c` ends it.
    pub fn rx_char(&mut self, c: u8, echo: &mut dyn Write) -> Option<&str> {
        match c {
            // DEL and backspace
            0x7f | 0x08 => {
                if self.len > 0 {
                    self.len -= 1;
                    echo.write_str("\x08 \x08").ok();
                }
                None
            }
            // bell
            0x07 => None,
            b'\r' | b'\n' => {
                echo.write_str("\n").ok();
                let len = self.len;
                self.len = 0;
                core::str::from_utf8(&self.buf[..len]).ok()
            }
            c if c.is_ascii() && !c.is_ascii_control() => {
                if self.len < LINE_CAPACITY - 1 {
                    self.buf[self.len] = c;
                    self.len += 1;
                    echo.write_char(c as char).ok();
                }
                None
            }
            _ => None,
        }
    }
}

pub struct Repl<B: Bus> {
    reader: LineReader,
    commands: BTreeMap<&'static str, Box<dyn ShellCmdApi<B>>>,
    usage: Vec<(&'static str, &'static str)>,
    halted: bool,
}

impl<B: Bus> Default for Repl<B> {
    fn default() -> Self { Self::new() }
}

impl<B: Bus> Repl<B> {
    /// A console with no commands registered.
    pub fn new() -> Self {
        Repl { reader: LineReader::new(), commands: BTreeMap::new(), usage: Vec::new(), halted: false }
    }

    pub fn with_default_commands(regions: &'static [MemoryRegion]) -> Self {
        let mut repl = Self::new();
        repl.register(Help {});
        repl.register(Reboot {});
        repl.register(RamTest::new(regions));
        repl.register(DmaTest::new(Cdma::engine_a(), Cdma::engine_b()));
        repl.register(Peek {});
        repl.register(Poke {});
        repl
    }

    /// Adds `cmd` to the registry. A later command with the same verb
    /// replaces the earlier one.
    pub fn register<C: ShellCmdApi<B> + 'static>(&mut self, cmd: C) {
        let verb = cmd.verb();
        self.usage.retain(|(v, _)| *v != verb);
        self.usage.push((verb, cmd.usage()));
        self.commands.insert(verb, Box::new(cmd));
    }

    pub fn help(&self, out: &mut dyn Write) { print_help(out, &self.usage) }

    pub fn prompt(&self, out: &mut dyn Write) { out.write_str(PROMPT).ok(); }

    /// True once a command has requested a reset.
    pub fn halted(&self) -> bool { self.halted }

    /// Handles one received byte. When it completes a line, the first
    /// space-delimited token selects the command and the rest is passed as
    /// its arguments; unknown tokens are ignored. The prompt is re-displayed
    /// after every line unless the command asked for a reset.
    pub fn rx_char(&mut self, c: u8, bus: &mut B, out: &mut dyn Write) -> Action {
        if self.halted {
            return Action::Reset;
        }
        let line = match self.reader.rx_char(c, out) {
            Some(line) => line,
            None => return Action::Continue,
        };
        let (verb, args) = line.split_once(' ').unwrap_or((line, ""));

        let action = match self.commands.get_mut(verb) {
            Some(cmd) => {
                let mut env = CmdEnv { bus: &mut *bus, out: &mut *out, usage: &self.usage };
                cmd.process(args, &mut env)
            }
            None => {
                if !verb.is_empty() {
                    log::debug!("ignoring unknown command {:?}", verb);
                }
                Action::Continue
            }
        };

        match action {
            Action::Reset => self.halted = true,
            Action::Continue => self.prompt(out),
        }
        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::sim::SimBus;
    use crate::bus::WORD_SIZE;

    fn feed(repl: &mut Repl<SimBus>, bus: &mut SimBus, input: &str, out: &mut String) -> Action {
        let mut action = Action::Continue;
        for c in input.bytes() {
            action = repl.rx_char(c, bus, out);
        }
        action
    }

    #[test]
    fn line_is_echoed_and_returned() {
        let mut reader = LineReader::new();
        let mut echo = String::new();
        for c in b"help".iter() {
            assert_eq!(reader.rx_char(*c, &mut echo), None);
        }
        assert_eq!(reader.rx_char(b'\r', &mut echo), Some("help"));
        assert_eq!(echo, "help\n");
    }

    #[test]
    fn backspace_and_del_erase() {
        let mut reader = LineReader::new();
        let mut echo = String::new();
        for &c in b"abx\x08c\x7fd" {
            reader.rx_char(c, &mut echo);
        }
        assert_eq!(reader.rx_char(b'\n', &mut echo), Some("abd"));
        assert_eq!(echo, "abx\x08 \x08c\x08 \x08d\n");
    }

    #[test]
    fn backspace_on_empty_line_is_silent() {
        let mut reader = LineReader::new();
        let mut echo = String::new();
        reader.rx_char(0x08, &mut echo);
        assert_eq!(echo, "");
        assert_eq!(reader.rx_char(b'\r', &mut echo), Some(""));
    }

    #[test]
    fn bell_is_ignored() {
        let mut reader = LineReader::new();
        let mut echo = String::new();
        for &c in b"a\x07b" {
            reader.rx_char(c, &mut echo);
        }
        assert_eq!(reader.rx_char(b'\r', &mut echo), Some("ab"));
        assert_eq!(echo, "ab\n");
    }

    #[test]
    fn overlong_input_is_dropped() {
        let mut reader = LineReader::new();
        let mut echo = String::new();
        for _ in 0..100 {
            reader.rx_char(b'x', &mut echo);
        }
        let line = reader.rx_char(b'\r', &mut echo).map(|l| l.len());
        assert_eq!(line, Some(LINE_CAPACITY - 1));
        assert_eq!(echo.len(), LINE_CAPACITY - 1 + 1);
    }

    #[test]
    fn unknown_command_reprompts() {
        let mut repl = Repl::with_default_commands(&crate::diag::AXI_REGIONS[..1]);
        let mut bus = SimBus::new();
        let mut out = String::new();
        assert_eq!(feed(&mut repl, &mut bus, "frobnicate\n", &mut out), Action::Continue);
        assert_eq!(out, format!("frobnicate\n{}", PROMPT));
        assert!(bus.writes().is_empty());
    }

    #[test]
    fn empty_line_reprompts() {
        let mut repl = Repl::with_default_commands(&crate::diag::AXI_REGIONS[..1]);
        let mut bus = SimBus::new();
        let mut out = String::new();
        feed(&mut repl, &mut bus, "\r", &mut out);
        assert_eq!(out, format!("\n{}", PROMPT));
    }

    #[test]
    fn help_lists_commands_in_registration_order() {
        let mut repl = Repl::with_default_commands(&crate::diag::AXI_REGIONS[..1]);
        let mut bus = SimBus::new();
        let mut out = String::new();
        feed(&mut repl, &mut bus, "help\r", &mut out);
        assert!(out.contains("AXI-MMAP test firmware v"));
        assert!(out.contains("Available commands:\nhelp               - Show this command\nreboot             - Reboot CPU\n"));
        let ramtest = out.find("ramtest").unwrap();
        let poke = out.find("poke").unwrap();
        assert!(ramtest < poke);
        assert!(out.ends_with(PROMPT));
    }

    #[test]
    fn reboot_writes_reset_once_and_goes_quiet() {
        let mut repl = Repl::with_default_commands(&crate::diag::AXI_REGIONS[..1]);
        let mut bus = SimBus::new();
        let mut out = String::new();
        assert_eq!(feed(&mut repl, &mut bus, "reboot\n", &mut out), Action::Reset);
        assert_eq!(bus.writes(), &[(utralib::HW_CTRL_BASE, 1)]);
        assert_eq!(out, "reboot\n");
        assert!(repl.halted());

        assert_eq!(feed(&mut repl, &mut bus, "help\n", &mut out), Action::Reset);
        assert_eq!(out, "reboot\n");
        assert_eq!(bus.writes().len(), 1);
    }

    #[test]
    fn arguments_follow_the_first_space() {
        let mut repl = Repl::with_default_commands(&crate::diag::AXI_REGIONS[..1]);
        let mut bus = SimBus::new();
        let mut out = String::new();
        feed(&mut repl, &mut bus, "poke 40000000 cafef00d 2\n", &mut out);
        assert_eq!(bus.writes(), &[(0x4000_0000, 0xcafe_f00d), (0x4000_0004, 0xcafe_f00d)]);
        assert!(out.contains("Poked cafef00d into 40000000, 2 times\n"));
    }

    #[test]
    fn peek_dumps_in_rows() {
        let mut repl = Repl::with_default_commands(&crate::diag::AXI_REGIONS[..1]);
        let mut bus = SimBus::new();
        bus.write(0x4000_0010, 0x1234_5678);
        bus.clear_log();
        let mut out = String::new();
        feed(&mut repl, &mut bus, "peek 40000000 5\n", &mut out);
        assert!(out.contains("\n40000000: 00000000 00000000 00000000 00000000 \n40000010: 12345678 \n"));
        assert!(bus.writes().is_empty());
    }

    #[test]
    fn malformed_arguments_print_usage() {
        let mut repl = Repl::with_default_commands(&crate::diag::AXI_REGIONS[..1]);
        let mut bus = SimBus::new();
        let mut out = String::new();
        feed(&mut repl, &mut bus, "peek\n", &mut out);
        assert!(out.contains("Help: peek <addr> [count]"));
        out.clear();
        feed(&mut repl, &mut bus, "poke zz 1\n", &mut out);
        assert!(out.contains("Poke address is in hex"));
        out.clear();
        feed(&mut repl, &mut bus, "poke 40000002 1\n", &mut out);
        assert!(out.contains("Poke address must be word aligned"));
        out.clear();
        feed(&mut repl, &mut bus, "poke 40000000 xyz\n", &mut out);
        assert!(out.contains("Poke value is in hex"));
        assert!(bus.writes().is_empty());
    }

    #[test]
    fn ranges_past_the_top_of_memory_are_refused() {
        let mut repl = Repl::with_default_commands(&crate::diag::AXI_REGIONS[..1]);
        let mut bus = SimBus::new();
        let mut out = String::new();
        let top = usize::MAX - (WORD_SIZE - 1);
        assert_eq!(feed(&mut repl, &mut bus, &format!("peek {:x} 2\n", top), &mut out), Action::Continue);
        assert!(out.contains("Peek range runs past the end of memory"));
        assert!(out.ends_with(PROMPT));
        out.clear();
        feed(&mut repl, &mut bus, &format!("poke {:x} 1 2\n", top), &mut out);
        assert!(out.contains("Poke range runs past the end of memory"));
        assert!(bus.writes().is_empty());

        // the last word itself is still reachable
        out.clear();
        feed(&mut repl, &mut bus, &format!("peek {:x}\n", top), &mut out);
        assert!(out.contains(&format!("{:08x}: 00000000 ", top)));
    }

    #[test]
    fn huge_counts_are_capped() {
        let mut repl = Repl::with_default_commands(&crate::diag::AXI_REGIONS[..1]);
        let mut bus = SimBus::new();
        let mut out = String::new();
        feed(&mut repl, &mut bus, "poke 40000000 1 99999999\n", &mut out);
        assert!(out.contains(&format!("Poke count limited to {}", MAX_WORDS)));
        assert_eq!(bus.writes().len(), MAX_WORDS);
        out.clear();
        feed(&mut repl, &mut bus, "peek 40000000 99999999\n", &mut out);
        assert!(out.contains(&format!("Peek count limited to {}", MAX_WORDS)));
        assert_eq!(out.matches("00000001 ").count(), MAX_WORDS);
    }

    #[test]
    fn ramtest_reports_a_total() {
        let mut repl = Repl::with_default_commands(&crate::diag::AXI_REGIONS);
        let mut bus = SimBus::new();
        let mut out = String::new();
        feed(&mut repl, &mut bus, "ramtest\n", &mut out);
        assert!(out.contains("Testing AXI-RAM-INT at @0x40060000..."));
        assert!(out.contains("7 regions, total errors: 0\n"));
    }

    #[test]
    fn dmatest_runs_both_engines() {
        let mut repl = Repl::with_default_commands(&crate::diag::AXI_REGIONS[..1]);
        let mut bus = SimBus::new();
        let mut out = String::new();
        feed(&mut repl, &mut bus, "dmatest\n", &mut out);
        assert_eq!(bus.transfers(utralib::HW_CDMA0_BASE), 1);
        assert_eq!(bus.transfers(utralib::HW_CDMA1_BASE), 1);
        assert!(out.contains("Testing CDMA..."));
    }
}
