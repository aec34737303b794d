// Feature flags are mutually exclusive, so at most one register map is
// pulled in here.

#[cfg(feature="axi-mmap")]
mod axi_mmap;
#[cfg(feature="axi-mmap")]
pub use axi_mmap::*;
