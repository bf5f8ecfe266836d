//! Workload simulators.
//!
//! - [`cpu`]: floating-point loop sized by an iteration count
//! - [`io`]: temp-file write/read round trip sized in kilobytes
//! - [`delay`]: async sleep

pub mod cpu;
pub mod delay;
pub mod io;

pub use io::IoSimulator;
