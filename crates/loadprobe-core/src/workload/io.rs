use crate::error::{ProbeError, ProbeResult};
use crate::observer::{TracingObserver, WorkloadObserver};
use rand::RngCore;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

const FILE_PREFIX: &str = "loadprobe-";
const FILE_SUFFIX: &str = ".bin";

/// Writes random bytes to a fresh temp file, reads them back and deletes it.
///
/// Every call uses its own uniquely named file, so concurrent calls never
/// collide. A failed delete goes to the observer and is otherwise ignored;
/// failures to create, write or read are returned.
#[derive(Clone)]
pub struct IoSimulator {
    dir: Option<PathBuf>,
    observer: Arc<dyn WorkloadObserver>,
    /// Removes the file out from under the simulator so cleanup fails.
    #[cfg(test)]
    unlink_before_close: bool,
}

impl Default for IoSimulator {
    fn default() -> Self {
        Self::new(Arc::new(TracingObserver))
    }
}

impl IoSimulator {
    /// Files go to the OS temp dir until [`IoSimulator::with_dir`] says otherwise.
    pub fn new(observer: Arc<dyn WorkloadObserver>) -> Self {
        Self {
            dir: None,
            observer,
            #[cfg(test)]
            unlink_before_close: false,
        }
    }

    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    /// Round-trips `size_kb * 1024` bytes and returns the byte count read back.
    pub fn run(&self, size_kb: u64) -> ProbeResult<u64> {
        let len = size_kb
            .checked_mul(1024)
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| {
                ProbeError::io(
                    "sizing buffer",
                    io::Error::new(
                        io::ErrorKind::InvalidInput,
                        format!("{size_kb} KiB does not fit in memory"),
                    ),
                )
            })?;

        let mut data = vec![0u8; len];
        rand::thread_rng().fill_bytes(&mut data);

        let mut builder = tempfile::Builder::new();
        builder.prefix(FILE_PREFIX).suffix(FILE_SUFFIX);
        let mut file = match &self.dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .map_err(|e| ProbeError::io("creating temp file", e))?;

        file.write_all(&data)
            .map_err(|e| ProbeError::io("writing temp file", e))?;

        // Closes the handle; the path still deletes itself if we bail out below
        let path = file.into_temp_path();

        let read_back = std::fs::read(&path).map_err(|e| ProbeError::io("reading temp file", e))?;
        let bytes = read_back.len() as u64;

        let location = path.to_path_buf();
        #[cfg(test)]
        if self.unlink_before_close {
            std::fs::remove_file(&location).ok();
        }
        if let Err(e) = path.close() {
            self.observer.cleanup_failed(&location, &e);
        }

        debug!(size_kb, bytes, "I/O workload round trip complete");
        Ok(bytes)
    }
}
