//! Output plumbing for the binary.

use derive_new::new;
use minus::Pager;
use std::io::{self, Write};

/// `Write` adapter feeding command output into a [`minus`] pager.
///
/// ```ignore
/// let pager = Pager::new();
/// repository = Repository::new(path, Box::new(PagerWriter::new(pager.clone())))?;
/// repository.diff(&options)?;
/// minus::page_all(pager)?;
/// ```
#[derive(new)]
pub struct PagerWriter {
    pager: Pager,
    /// Bytes of an incomplete UTF-8 sequence left over from the previous write
    #[new(default)]
    pending: Vec<u8>,
}

impl Write for PagerWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);

        let valid_up_to = match std::str::from_utf8(&self.pending) {
            Ok(_) => self.pending.len(),
            Err(error) if error.error_len().is_none() => error.valid_up_to(),
            Err(error) => return Err(io::Error::new(io::ErrorKind::InvalidData, error)),
        };

        let text = String::from_utf8_lossy(&self.pending[..valid_up_to]).into_owned();
        self.pager.push_str(text).map_err(io::Error::other)?;
        self.pending.drain(..valid_up_to);

        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
