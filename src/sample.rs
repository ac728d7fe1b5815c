//! Building sample sets from JSONL event dumps.
//!
//! Relay dumps contain events the binary codec cannot represent (uppercase
//! hex, `e` tags holding something other than an id, broken coordinates).
//! [`filter_events`] keeps only the ones that encode, so a benchmark can run
//! every codec over the same input.

use std::fmt;
use std::io::{self, BufRead, Read, Write};

use crate::event::Event;
use crate::writer::Writer;

/// Limits for [`filter_events`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterOptions {
    /// Stop after this many accepted events.
    pub limit: usize,
    /// Lines longer than this many bytes are skipped.
    pub max_line_len: usize,
}

impl Default for FilterOptions {
    fn default() -> Self {
        FilterOptions {
            limit: 10_000,
            max_line_len: 1_000_000,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterStats {
    pub accepted: usize,
    pub skipped: usize,
}

#[derive(Debug)]
pub enum SampleError {
    Io(io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for SampleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleError::Io(e) => write!(f, "IO error: {}", e),
            SampleError::Json(e) => write!(f, "JSON error: {}", e),
        }
    }
}

impl std::error::Error for SampleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SampleError::Io(e) => Some(e),
            SampleError::Json(e) => Some(e),
        }
    }
}

impl From<io::Error> for SampleError {
    fn from(e: io::Error) -> Self {
        SampleError::Io(e)
    }
}

impl From<serde_json::Error> for SampleError {
    fn from(e: serde_json::Error) -> Self {
        SampleError::Json(e)
    }
}

/// Copy the events of `input` that parse and encode to `output`, one JSON
/// object per line, until `options.limit` have been written.
///
/// Blank lines are ignored. Unparseable, unencodable and oversized lines are
/// counted as skipped. At most `options.max_line_len + 1` bytes of a line are
/// held in memory; the rest of an oversized line is discarded unread.
pub fn filter_events<R, W>(
    mut input: R,
    mut output: W,
    options: &FilterOptions,
) -> Result<FilterStats, SampleError>
where
    R: BufRead,
    W: Write,
{
    let mut stats = FilterStats::default();
    let mut writer = Writer::new();
    let mut line = Vec::new();
    let mut number = 0;

    while stats.accepted < options.limit {
        let read = next_line(&mut input, &mut line, options.max_line_len)?;
        number += 1;
        match read {
            Line::End => break,
            Line::TooLong => {
                log::warn!("line {}: exceeds {} bytes", number, options.max_line_len);
                stats.skipped += 1;
                continue;
            }
            Line::Fits => {}
        }
        let Ok(text) = std::str::from_utf8(&line) else {
            log::debug!("line {}: not UTF-8", number);
            stats.skipped += 1;
            continue;
        };
        let text = text.trim();
        if text.is_empty() {
            continue;
        }

        let event = match Event::from_json(text) {
            Ok(event) => event,
            Err(err) => {
                log::debug!("line {}: {}", number, err);
                stats.skipped += 1;
                continue;
            }
        };
        writer.clear();
        if let Err(err) = writer.write_event(&event) {
            log::debug!("line {}: event {} does not encode: {}", number, event.id, err);
            stats.skipped += 1;
            continue;
        }

        serde_json::to_writer(&mut output, &event)?;
        output.write_all(b"\n")?;
        stats.accepted += 1;
    }

    output.flush()?;
    log::info!(
        "kept {} events, skipped {}",
        stats.accepted,
        stats.skipped
    );
    Ok(stats)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Line {
    Fits,
    TooLong,
    End,
}

/// Read the next line into `line` without its newline, buffering at most
/// `max_len + 1` bytes. An oversized line is consumed up to and including
/// its newline and reported as [`Line::TooLong`].
fn next_line<R: BufRead>(
    input: &mut R,
    line: &mut Vec<u8>,
    max_len: usize,
) -> io::Result<Line> {
    line.clear();
    let limit = u64::try_from(max_len).unwrap_or(u64::MAX).saturating_add(1);
    if input.by_ref().take(limit).read_until(b'\n', line)? == 0 {
        return Ok(Line::End);
    }
    if line.last() == Some(&b'\n') {
        line.pop();
        return Ok(Line::Fits);
    }
    if line.len() <= max_len {
        // last line, no trailing newline
        return Ok(Line::Fits);
    }
    skip_line(input)?;
    line.clear();
    Ok(Line::TooLong)
}

fn skip_line<R: BufRead>(input: &mut R) -> io::Result<()> {
    loop {
        let (used, done) = {
            let available = input.fill_buf()?;
            match available.iter().position(|&b| b == b'\n') {
                Some(i) => (i + 1, true),
                None => (available.len(), available.is_empty()),
            }
        };
        input.consume(used);
        if done {
            return Ok(());
        }
    }
}
