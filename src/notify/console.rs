use std::io::Write;

use super::{Notice, Notifier, NotifyError};

/// Writes notices as plain text to any stream.
pub struct ConsoleNotifier<W: Write> {
    out: W,
}

impl ConsoleNotifier<std::io::Stderr> {
    pub fn stderr() -> Self {
        Self::new(std::io::stderr())
    }
}

impl<W: Write> ConsoleNotifier<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Notifier for ConsoleNotifier<W> {
    fn notify(&mut self, notice: &Notice) -> Result<(), NotifyError> {
        writeln!(self.out, "== {} ==", notice.title)?;
        self.out.write_all(notice.body.as_bytes())?;
        if !notice.body.ends_with('\n') {
            writeln!(self.out)?;
        }
        self.out.flush()?;
        Ok(())
    }
}
