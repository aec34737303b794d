use utralib::*;

use crate::bus::{Bus, Csr};
use crate::cmds::{Action, CmdEnv, ShellCmdApi};

#[derive(Debug, Default)]
pub struct Reboot {}

impl<B: Bus> ShellCmdApi<B> for Reboot {
    fn verb(&self) -> &'static str { "reboot" }

    fn usage(&self) -> &'static str { "Reboot CPU" }

    fn process(&mut self, _args: &str, env: &mut CmdEnv<'_, B>) -> Action {
        log::debug!("reboot requested");
        let mut ctrl = Csr::new(env.bus, HW_CTRL_BASE);
        ctrl.wo(utra::ctrl::RESET, 1);
        Action::Reset
    }
}
