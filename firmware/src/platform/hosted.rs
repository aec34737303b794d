//! Runs the firmware on the development machine against a simulated bus.
//!
//! Console input is read from stdin and fed through the same receive queue
//! the UART interrupt fills on hardware; console output goes to stdout.

use core::fmt;
use std::io::{self, Read, Write};
use std::str::FromStr;

use crate::bus::sim::{DmaModel, SimBus};
use crate::cdma::Cdma;
use crate::cmds::Action;
use crate::diag::AXI_REGIONS;

/// Selects the simulated CDMA behaviour.
pub const DMA_MODEL_VAR: &str = "AXI_MMAP_SIM_DMA";

#[derive(Debug)]
pub enum SimConfigError {
    UnknownDmaModel(String),
}

/// How both simulated engines behave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimDma {
    /// Each engine copies its own source to its own destination.
    Copy,
    /// Each engine's reads are routed to the other engine's source.
    Crossed,
    /// Neither engine responds.
    NoOp,
}

impl FromStr for SimDma {
    type Err = SimConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "copy" => Ok(SimDma::Copy),
            "crossed" => Ok(SimDma::Crossed),
            "noop" => Ok(SimDma::NoOp),
            _ => Err(SimConfigError::UnknownDmaModel(s.to_string())),
        }
    }
}

/// Reads the model from the environment; `Crossed` when unset.
pub fn dma_model_from_env() -> Result<SimDma, SimConfigError> {
    match std::env::var(DMA_MODEL_VAR) {
        Ok(value) => value.parse(),
        Err(_) => Ok(SimDma::Crossed),
    }
}

pub fn build_bus(dma: SimDma) -> SimBus {
    let (a, b) = (Cdma::engine_a(), Cdma::engine_b());
    let (model_a, model_b) = match dma {
        SimDma::Copy => (DmaModel::Copy, DmaModel::Copy),
        SimDma::NoOp => (DmaModel::NoOp, DmaModel::NoOp),
        SimDma::Crossed => {
            let (pa, pb) = (a.buffers(), b.buffers());
            (
                DmaModel::Remap { from: pa.src.base(), to: pb.src.base(), len: pa.src.len() },
                DmaModel::Remap { from: pb.src.base(), to: pa.src.base(), len: pb.src.len() },
            )
        }
    };
    SimBus::new().with_dma_model(a.base(), model_a).with_dma_model(b.base(), model_b)
}

/// Console sink on stdout. Flushed on every write so prompts show up
/// before the next read.
struct Stdout;

impl fmt::Write for Stdout {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let mut stdout = io::stdout().lock();
        stdout.write_all(s.as_bytes()).map_err(|_| fmt::Error)?;
        stdout.flush().map_err(|_| fmt::Error)
    }
}

pub fn run() -> Result<(), SimConfigError> {
    env_logger::init();
    let dma = dma_model_from_env()?;
    log::info!("simulated CDMA engines: {:?}", dma);

    let mut bus = build_bus(dma);
    let mut out = Stdout;
    let mut repl = crate::boot(&mut bus, &AXI_REGIONS, &mut out);

    for byte in io::stdin().lock().bytes() {
        let byte = match byte {
            Ok(byte) => byte,
            Err(e) => {
                log::warn!("console input closed: {}", e);
                break;
            }
        };
        crate::uart_rx_push(byte);
        if crate::drain_rx(&mut repl, &mut bus, &mut out) == Action::Reset {
            log::info!("reset requested, leaving simulation");
            break;
        }
    }
    Ok(())
}
