#[cfg(target_os = "none")]
mod litex;
#[cfg(target_os = "none")]
pub use litex::*;

#[cfg(not(target_os = "none"))]
pub mod hosted;
