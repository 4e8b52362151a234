//! Buffered run diagnostics, printed once when the run is over

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleLine {
    pub level: ConsoleLevel,
    pub message: String,
}

/// Diagnostic lines collected during a run
#[derive(Debug, Default)]
pub struct ConsoleOutput {
    lines: Vec<ConsoleLine>,
}

impl ConsoleOutput {
    pub fn info(&mut self, message: impl Into<String>) {
        self.push(ConsoleLevel::Info, message);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.push(ConsoleLevel::Warning, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(ConsoleLevel::Error, message);
    }

    fn push(&mut self, level: ConsoleLevel, message: impl Into<String>) {
        self.lines.push(ConsoleLine {
            level,
            message: message.into(),
        });
    }

    pub fn lines(&self) -> &[ConsoleLine] {
        &self.lines
    }

    pub fn has_errors(&self) -> bool {
        self.has_errors_since(0)
    }

    /// Whether an error was pushed after the first `start` lines
    pub fn has_errors_since(&self, start: usize) -> bool {
        self.lines
            .iter()
            .skip(start)
            .any(|l| l.level == ConsoleLevel::Error)
    }

    /// Whether any line contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|l| l.message.contains(needle))
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
