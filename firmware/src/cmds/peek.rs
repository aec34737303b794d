use alloc::vec::Vec;

use crate::bus::{Bus, WORD_SIZE};
use crate::cmds::{word_addr, Action, CmdEnv, ShellCmdApi, MAX_WORDS};

const COLUMNS: usize = 4;

#[derive(Debug, Default)]
pub struct Peek {}

impl<B: Bus> ShellCmdApi<B> for Peek {
    fn verb(&self) -> &'static str { "peek" }

    fn usage(&self) -> &'static str { "Read words: peek <addr> [count]" }

    fn process(&mut self, args: &str, env: &mut CmdEnv<'_, B>) -> Action {
        let args: Vec<&str> = args.split_whitespace().collect();
        if args.len() != 1 && args.len() != 2 {
            writeln!(env.out, "Help: peek <addr> [count], addr is in hex, count in decimal").ok();
            return Action::Continue;
        }
        let addr = match usize::from_str_radix(args[0], 16) {
            Ok(addr) if addr % WORD_SIZE == 0 => addr,
            Ok(_) => {
                writeln!(env.out, "Peek address must be word aligned").ok();
                return Action::Continue;
            }
            Err(_) => {
                writeln!(env.out, "Peek address is in hex").ok();
                return Action::Continue;
            }
        };
        let count = args.get(1).and_then(|c| c.parse::<usize>().ok()).unwrap_or(1);
        if count > MAX_WORDS {
            writeln!(env.out, "Peek count limited to {}", MAX_WORDS).ok();
        }
        let count = count.min(MAX_WORDS);
        if word_addr(addr, count.saturating_sub(1)).is_none() {
            writeln!(env.out, "Peek range runs past the end of memory").ok();
            return Action::Continue;
        }

        for (i, at) in (0..count).filter_map(|i| word_addr(addr, i)).enumerate() {
            if i % COLUMNS == 0 {
                write!(env.out, "\n{:08x}: ", at).ok();
            }
            write!(env.out, "{:08x} ", env.bus.read(at)).ok();
        }
        writeln!(env.out).ok();
        Action::Continue
    }
}
