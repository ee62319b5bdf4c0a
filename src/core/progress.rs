use std::io::{self, Write};

/// Single live-updating progress line, redrawn with `\r` after every block.
pub struct Progress<'a, W: Write> {
    out: &'a mut W,
    total: u64,
    downloaded: u64,
}

impl<'a, W: Write> Progress<'a, W> {
    /// `total` of 0 means the size is unknown.
    pub fn new(out: &'a mut W, total: u64) -> Self {
        Self {
            out,
            total,
            downloaded: 0,
        }
    }

    pub fn advance(&mut self, bytes: usize) -> io::Result<()> {
        self.downloaded += bytes as u64;
        write!(self.out, "{}", status_line(self.downloaded, self.total))?;
        self.out.flush()
    }

    pub fn finish(self) -> io::Result<u64> {
        writeln!(self.out)?;
        Ok(self.downloaded)
    }
}

pub fn status_line(downloaded: u64, total: u64) -> String {
    if total > 0 {
        let percent = downloaded as f64 * 100.0 / total as f64;
        format!("\r{downloaded:>10}  [{percent:3.2}%]")
    } else {
        format!("\r{downloaded:>10}")
    }
}
