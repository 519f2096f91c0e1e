//! Line mutation observers.
//!
//! A controller can report every completed line mutation to an external
//! observer (a visualizer, a trace writer, a test harness). Reporting is optional
//! and has no effect on cache behavior.

use std::fmt;

use serde::Serialize;

use super::line::CacheLine;

/// What happened to a line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineEventKind {
    /// Fetched data installed on a miss.
    Install,
    /// Resident line hit; only its recency stamp changed.
    Touch,
    /// Resident data modified by a write.
    Update,
    /// Line allocated as zeroed and dirty.
    Zero,
    /// Dirty data written back; the line stays valid.
    Clean,
    /// Line discarded.
    Invalidate,
}

impl fmt::Display for LineEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Install => "install",
            Self::Touch => "touch",
            Self::Update => "update",
            Self::Zero => "zero",
            Self::Clean => "clean",
            Self::Invalidate => "invalidate",
        };
        f.write_str(name)
    }
}

/// A completed mutation of one line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LineEvent {
    /// Name of the cache that owns the line.
    pub cache: String,
    /// Set index.
    pub set: usize,
    /// Way index.
    pub way: usize,
    /// Mutation kind.
    pub kind: LineEventKind,
    /// Line state after the mutation.
    pub line: CacheLine,
}

/// Receiver of line mutation events.
pub trait LineObserver: Send + Sync {
    /// Called after each line mutation completes.
    fn on_line_event(&mut self, event: &LineEvent);
}

impl<F> LineObserver for F
where
    F: FnMut(&LineEvent) + Send + Sync,
{
    fn on_line_event(&mut self, event: &LineEvent) {
        self(event);
    }
}
