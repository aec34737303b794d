use alloc::vec::Vec;

use crate::bus::{Bus, WORD_SIZE};
use crate::cmds::{word_addr, Action, CmdEnv, ShellCmdApi, MAX_WORDS};

#[derive(Debug, Default)]
pub struct Poke {}

impl<B: Bus> ShellCmdApi<B> for Poke {
    fn verb(&self) -> &'static str { "poke" }

    fn usage(&self) -> &'static str { "Write words: poke <addr> <value> [count]" }

    fn process(&mut self, args: &str, env: &mut CmdEnv<'_, B>) -> Action {
        let args: Vec<&str> = args.split_whitespace().collect();
        if args.len() != 2 && args.len() != 3 {
            writeln!(env.out, "Help: poke <addr> <value> [count], addr/value is in hex, count in decimal").ok();
            return Action::Continue;
        }
        let addr = match usize::from_str_radix(args[0], 16) {
            Ok(addr) if addr % WORD_SIZE == 0 => addr,
            Ok(_) => {
                writeln!(env.out, "Poke address must be word aligned").ok();
                return Action::Continue;
            }
            Err(_) => {
                writeln!(env.out, "Poke address is in hex").ok();
                return Action::Continue;
            }
        };
        let value = match u32::from_str_radix(args[1], 16) {
            Ok(value) => value,
            Err(_) => {
                writeln!(env.out, "Poke value is in hex").ok();
                return Action::Continue;
            }
        };
        let count = args.get(2).and_then(|c| c.parse::<usize>().ok()).unwrap_or(1);
        if count > MAX_WORDS {
            writeln!(env.out, "Poke count limited to {}", MAX_WORDS).ok();
        }
        let count = count.min(MAX_WORDS);
        // refuse the whole range rather than write part of it
        if word_addr(addr, count.saturating_sub(1)).is_none() {
            writeln!(env.out, "Poke range runs past the end of memory").ok();
            return Action::Continue;
        }

        for at in (0..count).filter_map(|i| word_addr(addr, i)) {
            env.bus.write(at, value);
        }
        writeln!(env.out, "Poked {:x} into {:x}, {} times", value, addr, count).ok();
        Action::Continue
    }
}
