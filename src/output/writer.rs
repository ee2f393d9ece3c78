//! Output writer trait and destinations.

use crate::error::Result;
use crate::pipeline::ImageOutcome;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Trait for writing per-image results.
pub trait OutputWriter {
    /// Write the file header (if applicable).
    fn write_header(&mut self) -> Result<()>;

    /// Write the result of one image.
    fn write_outcome(&mut self, outcome: &ImageOutcome) -> Result<()>;

    /// Finalize the output (flush, close, etc.).
    fn finalize(&mut self) -> Result<()>;
}

/// Where a writer sends its bytes.
pub(crate) struct Sink {
    pub(crate) writer: Box<dyn Write>,
    pub(crate) label: PathBuf,
}

impl Sink {
    pub(crate) fn file(path: &Path) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: Box::new(BufWriter::new(file)),
            label: path.to_path_buf(),
        })
    }

    pub(crate) fn stdout() -> Self {
        Self {
            writer: Box::new(BufWriter::new(std::io::stdout())),
            label: PathBuf::from("<stdout>"),
        }
    }

    #[cfg(test)]
    pub(crate) fn memory(buffer: std::rc::Rc<std::cell::RefCell<Vec<u8>>>) -> Self {
        struct Shared(std::rc::Rc<std::cell::RefCell<Vec<u8>>>);
        impl Write for Shared {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                self.0.borrow_mut().write(buf)
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }
        Self {
            writer: Box::new(Shared(buffer)),
            label: PathBuf::from("<memory>"),
        }
    }
}
