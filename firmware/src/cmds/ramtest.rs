use crate::bus::Bus;
use crate::cmds::{Action, CmdEnv, ShellCmdApi};
use crate::diag::{test_ram_all, MemoryRegion};

pub struct RamTest {
    regions: &'static [MemoryRegion],
}

impl RamTest {
    pub fn new(regions: &'static [MemoryRegion]) -> Self { RamTest { regions } }
}

impl<B: Bus> ShellCmdApi<B> for RamTest {
    fn verb(&self) -> &'static str { "ramtest" }

    fn usage(&self) -> &'static str { "Re-run the AXI RAM tests" }

    fn process(&mut self, _args: &str, env: &mut CmdEnv<'_, B>) -> Action {
        let errors = test_ram_all(env.bus, self.regions, env.out);
        writeln!(env.out, "\n{} regions, total errors: {}", self.regions.len(), errors).ok();
        Action::Continue
    }
}
