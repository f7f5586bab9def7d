// SPDX-License-Identifier: PMPL-1.0-or-later

use std::io::{Read, Result};
use std::time::{Duration, Instant};

const FIRST_TICK: Duration = Duration::from_millis(200);
const TICK: Duration = Duration::from_millis(100);

/// Bytes received so far, and the expected size when the server sent one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadProgress {
    pub bytes: u64,
    pub total: Option<u64>,
}

/// Reader adapter reporting progress to a callback at most once per tick,
/// plus once more when dropped.
pub struct ProgressReader<'a, R> {
    stream: R,
    bytes: u64,
    total: Option<u64>,
    tick: Instant,
    callback: &'a mut dyn FnMut(DownloadProgress),
}

impl<'a, R> ProgressReader<'a, R> {
    pub fn new(
        stream: R,
        total: Option<u64>,
        callback: &'a mut dyn FnMut(DownloadProgress),
    ) -> Self {
        ProgressReader {
            stream,
            bytes: 0,
            total,
            tick: Instant::now() + FIRST_TICK,
            callback,
        }
    }

    pub fn bytes_read(&self) -> u64 {
        self.bytes
    }

    fn report(&mut self) {
        (self.callback)(DownloadProgress {
            bytes: self.bytes,
            total: self.total,
        });
    }
}

impl<R: Read> Read for ProgressReader<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let num = self.stream.read(buf)?;
        self.bytes += num as u64;
        let now = Instant::now();
        if now > self.tick {
            self.tick = now + TICK;
            self.report();
        }
        Ok(num)
    }
}

impl<R> Drop for ProgressReader<'_, R> {
    fn drop(&mut self) {
        self.report();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn final_report_carries_byte_count() {
        let mut seen = Vec::new();
        let mut callback = |progress: DownloadProgress| seen.push(progress);
        {
            let mut reader = ProgressReader::new(Cursor::new(vec![7u8; 4096]), Some(4096), &mut callback);
            let mut sink = Vec::new();
            std::io::copy(&mut reader, &mut sink).unwrap();
            assert_eq!(reader.bytes_read(), 4096);
        }
        assert_eq!(
            seen.last(),
            Some(&DownloadProgress {
                bytes: 4096,
                total: Some(4096)
            })
        );
    }
}
