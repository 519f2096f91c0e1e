//! Request traces.
//!
//! A trace is a text file with one request per line, in the same syntax that
//! [`RequestPacket`]'s `Display` produces:
//!
//! ```text
//! # comment
//! read 0x1a 0
//! write 0x1a 0 0x12
//! inval global
//! clean 0x08
//! zero 0x20
//! prefetch 0x30
//! line_read 0x10 4
//! line_write 0x10 4 0xff 0b0001
//! ```
//!
//! Numbers are decimal, `0x` hexadecimal, or `0b` binary. Blank lines and
//! everything after `#` are ignored.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::common::AccessSize;
use crate::protocol::{RequestPacket, Scope};

/// Errors produced while reading a trace.
#[derive(Debug, Error)]
pub enum TraceError {
    /// A line could not be parsed.
    #[error("line {line}: {message}")]
    Parse {
        /// One-based line number.
        line: usize,
        /// What was wrong with the line.
        message: String,
    },

    /// The trace file could not be read.
    #[error("failed to read trace: {0}")]
    Io(#[from] std::io::Error),
}

/// Parses an unsigned number in decimal, `0x` hex, or `0b` binary.
///
/// Prefixes are case-insensitive and `_` may separate digits.
///
/// # Errors
///
/// Returns a message naming `token` when it is not a valid `u64`.
pub fn parse_number(token: &str) -> Result<u64, String> {
    let lower = token.to_ascii_lowercase();
    let parsed = if let Some(hex) = lower.strip_prefix("0x") {
        u64::from_str_radix(&hex.replace('_', ""), 16)
    } else if let Some(bin) = lower.strip_prefix("0b") {
        u64::from_str_radix(&bin.replace('_', ""), 2)
    } else {
        lower.replace('_', "").parse()
    };
    parsed.map_err(|e| format!("invalid number '{token}': {e}"))
}

fn parse_scope(token: &str) -> Result<Scope, String> {
    if token.eq_ignore_ascii_case("global") {
        Ok(Scope::Global)
    } else {
        parse_number(token).map(Scope::Address)
    }
}

fn parse_size(token: &str) -> Result<AccessSize, String> {
    let class = parse_number(token)?;
    u8::try_from(class)
        .ok()
        .and_then(AccessSize::from_class)
        .ok_or_else(|| format!("size class must be 0..=3, got {class}"))
}

fn parse_line_size(token: &str) -> Result<usize, String> {
    let size = parse_number(token)?;
    usize::try_from(size).map_err(|_| format!("line size {size} is too large"))
}

/// Parses one non-empty, comment-free line.
fn parse_request(text: &str) -> Result<RequestPacket, String> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let (op, args) = tokens
        .split_first()
        .ok_or_else(|| "empty request".to_owned())?;

    let expect = |n: usize| {
        if args.len() == n {
            Ok(())
        } else {
            Err(format!("'{op}' takes {n} argument(s), got {}", args.len()))
        }
    };

    let packet = match op.to_ascii_lowercase().as_str() {
        "read" => {
            expect(2)?;
            RequestPacket::Read {
                addr: parse_number(args[0])?,
                size: parse_size(args[1])?,
            }
        }
        "write" => {
            expect(3)?;
            RequestPacket::Write {
                addr: parse_number(args[0])?,
                size: parse_size(args[1])?,
                value: parse_number(args[2])?,
            }
        }
        "inval" => {
            expect(1)?;
            RequestPacket::Inval {
                scope: parse_scope(args[0])?,
            }
        }
        "clean" => {
            expect(1)?;
            RequestPacket::Clean {
                scope: parse_scope(args[0])?,
            }
        }
        "flush" => {
            expect(1)?;
            RequestPacket::Flush {
                scope: parse_scope(args[0])?,
            }
        }
        "zero" => {
            expect(1)?;
            RequestPacket::Zero {
                addr: parse_number(args[0])?,
            }
        }
        "prefetch" => {
            expect(1)?;
            RequestPacket::Prefetch {
                addr: parse_number(args[0])?,
            }
        }
        "line_read" => {
            expect(2)?;
            RequestPacket::LineRead {
                addr: parse_number(args[0])?,
                line_size: parse_line_size(args[1])?,
            }
        }
        "line_write" => {
            expect(4)?;
            RequestPacket::LineWrite {
                addr: parse_number(args[0])?,
                line_size: parse_line_size(args[1])?,
                data: parse_number(args[2])?,
                write_mask: parse_number(args[3])?,
            }
        }
        other => return Err(format!("unknown request '{other}'")),
    };
    Ok(packet)
}

/// Parses a whole trace.
///
/// # Errors
///
/// Returns [`TraceError::Parse`] for the first malformed line.
pub fn parse_trace(text: &str) -> Result<Vec<RequestPacket>, TraceError> {
    let mut requests = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let content = raw.split('#').next().unwrap_or_default().trim();
        if content.is_empty() {
            continue;
        }
        let request = parse_request(content).map_err(|message| TraceError::Parse {
            line: idx + 1,
            message,
        })?;
        requests.push(request);
    }
    Ok(requests)
}

/// Reads and parses a trace file.
///
/// # Errors
///
/// Returns [`TraceError::Io`] if the file cannot be read, or the first parse error.
pub fn load_trace(path: impl AsRef<Path>) -> Result<Vec<RequestPacket>, TraceError> {
    let text = fs::read_to_string(path)?;
    parse_trace(&text)
}
