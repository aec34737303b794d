use crate::bus::Bus;
use crate::cdma::Cdma;
use crate::cmds::{Action, CmdEnv, ShellCmdApi};
use crate::diag::test_dma;

pub struct DmaTest {
    a: Cdma,
    b: Cdma,
}

impl DmaTest {
    pub fn new(a: Cdma, b: Cdma) -> Self { DmaTest { a, b } }
}

impl<B: Bus> ShellCmdApi<B> for DmaTest {
    fn verb(&self) -> &'static str { "dmatest" }

    fn usage(&self) -> &'static str { "Run the dual CDMA transfer test" }

    fn process(&mut self, _args: &str, env: &mut CmdEnv<'_, B>) -> Action {
        test_dma(env.bus, "CDMA", &self.a, &self.b, env.out);
        Action::Continue
    }
}
