//! Session Log Stream
//!
//! Pumps a child's stdout and stderr line by line to an observer while the
//! process runs. Each channel is read on its own scoped thread, so per
//! channel order is kept but the two channels may interleave.

use std::io::{self, BufRead, BufReader, Read};
use std::process::Child;
use std::thread;

use tracing::warn;

use crate::domain::ports::LogObserver;
use crate::domain::value_objects::{Channel, LogEvent};
use crate::error::RolloutResult;

/// Streams sanitized lines from a running process
pub struct SessionLogStream<'a> {
    observer: &'a dyn LogObserver,
}

impl<'a> SessionLogStream<'a> {
    pub fn new(observer: &'a dyn LogObserver) -> Self {
        Self { observer }
    }

    /// Forward every line of `reader` until EOF; returns the line count
    ///
    /// Invalid UTF-8 is replaced rather than treated as an error.
    pub fn pump<R: Read>(&self, reader: R, channel: Channel) -> io::Result<usize> {
        let mut reader = BufReader::new(reader);
        let mut buf = Vec::with_capacity(256);
        let mut count = 0;
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                return Ok(count);
            }
            let line = String::from_utf8_lossy(&buf);
            self.observer.on_line(LogEvent::new(channel, line.as_ref()));
            count += 1;
        }
    }

    /// Stream both output channels of `child`, then wait for it
    ///
    /// Returns the exit code; `-1` when the process was killed by a signal.
    pub fn run(&self, child: &mut Child) -> RolloutResult<i32> {
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        thread::scope(|scope| {
            if let Some(out) = stdout {
                scope.spawn(move || {
                    if let Err(e) = self.pump(out, Channel::Out) {
                        warn!(error = %e, "reading stdout failed");
                    }
                });
            }
            if let Some(err) = stderr {
                scope.spawn(move || {
                    if let Err(e) = self.pump(err, Channel::Err) {
                        warn!(error = %e, "reading stderr failed");
                    }
                });
            }
        });

        let status = child.wait()?;
        Ok(status.code().unwrap_or(-1))
    }
}
