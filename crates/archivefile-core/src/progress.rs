//! Progress reporting for archive creation.

use std::io::Read;
use std::path::Path;

/// Callback trait for progress reporting during archive creation.
///
/// # Examples
///
/// ```
/// use archivefile_core::ProgressCallback;
/// use std::path::Path;
///
/// struct PrintProgress;
///
/// impl ProgressCallback for PrintProgress {
///     fn on_entry_start(&mut self, path: &Path, total: usize, current: usize) {
///         println!("[{current}/{total}] {}", path.display());
///     }
///
///     fn on_bytes_written(&mut self, _bytes: u64) {}
///
///     fn on_entry_complete(&mut self, _path: &Path) {}
///
///     fn on_complete(&mut self) {
///         println!("done");
///     }
/// }
/// ```
pub trait ProgressCallback: Send {
    /// Called before an entry is written.
    ///
    /// `current` is 1-indexed.
    fn on_entry_start(&mut self, path: &Path, total: usize, current: usize);

    /// Called as entry content is read into the archive.
    fn on_bytes_written(&mut self, bytes: u64);

    /// Called after an entry has been written.
    fn on_entry_complete(&mut self, path: &Path);

    /// Called once after the archive has been finalized.
    fn on_complete(&mut self);
}

/// No-op implementation of `ProgressCallback`.
#[derive(Debug, Default)]
pub struct NoopProgress;

impl ProgressCallback for NoopProgress {
    fn on_entry_start(&mut self, _path: &Path, _total: usize, _current: usize) {}

    fn on_bytes_written(&mut self, _bytes: u64) {}

    fn on_entry_complete(&mut self, _path: &Path) {}

    fn on_complete(&mut self) {}
}

/// Reader wrapper that counts bytes and reports them in batches.
///
/// Remaining bytes are flushed to the callback on drop.
pub(crate) struct ProgressReader<'a, R> {
    inner: R,
    progress: &'a mut dyn ProgressCallback,
    total: u64,
    pending: u64,
}

/// Bytes accumulated before `on_bytes_written` fires.
const BATCH_THRESHOLD: u64 = 1024 * 1024;

impl<'a, R> ProgressReader<'a, R> {
    pub(crate) fn new(inner: R, progress: &'a mut dyn ProgressCallback) -> Self {
        Self {
            inner,
            progress,
            total: 0,
            pending: 0,
        }
    }

    /// Total bytes read so far.
    pub(crate) const fn total(&self) -> u64 {
        self.total
    }
}

impl<R: Read> Read for ProgressReader<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.inner.read(buf)?;
        let n64 = n as u64;
        self.total += n64;
        self.pending += n64;
        if self.pending >= BATCH_THRESHOLD {
            self.progress.on_bytes_written(self.pending);
            self.pending = 0;
        }
        Ok(n)
    }
}

impl<R> Drop for ProgressReader<'_, R> {
    fn drop(&mut self) {
        if self.pending > 0 {
            self.progress.on_bytes_written(self.pending);
        }
    }
}
