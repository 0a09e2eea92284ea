//! Module diagnostic channel
//!
//! Lines the module prints go to `tracing` under the `module` target and into
//! a bounded history the host can drain.

use std::collections::VecDeque;

/// How a line reached the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticSource {
    /// `print_slice`
    Slice,
    /// `printf`
    Formatted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticLine {
    pub source: DiagnosticSource,
    pub text: String,
}

/// Bounded history of diagnostic lines, oldest first
#[derive(Debug)]
pub struct Diagnostics {
    lines: VecDeque<DiagnosticLine>,
    capacity: usize,
    dropped: u64,
}

impl Diagnostics {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
            dropped: 0,
        }
    }

    /// Record a line, evicting the oldest when full
    pub fn push(&mut self, source: DiagnosticSource, text: String) {
        tracing::info!(target: "module", "{}", text);

        if self.capacity == 0 {
            self.dropped += 1;
            return;
        }
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
            self.dropped += 1;
        }
        self.lines.push_back(DiagnosticLine { source, text });
    }

    /// Take every retained line
    pub fn drain(&mut self) -> Vec<DiagnosticLine> {
        self.lines.drain(..).collect()
    }

    pub fn lines(&self) -> impl Iterator<Item = &DiagnosticLine> {
        self.lines.iter()
    }

    /// Text of the retained lines
    pub fn texts(&self) -> Vec<&str> {
        self.lines.iter().map(|line| line.text.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Lines evicted or never retained
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}
