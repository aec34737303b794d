use crate::bus::Bus;
use crate::cmds::{print_help, Action, CmdEnv, ShellCmdApi};

#[derive(Debug, Default)]
pub struct Help {}

impl<B: Bus> ShellCmdApi<B> for Help {
    fn verb(&self) -> &'static str { "help" }

    fn usage(&self) -> &'static str { "Show this command" }

    fn process(&mut self, _args: &str, env: &mut CmdEnv<'_, B>) -> Action {
        print_help(env.out, env.usage);
        Action::Continue
    }
}
