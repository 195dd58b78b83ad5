/// Line-oriented transfer log.
///
/// A line may be built in several steps: the mirror writes
/// `Downloading file /a/b.txt ` first and appends `success` or `failed` once
/// the transfer is over. A line is forwarded to the [`log`] facade when the
/// next line starts or on [`TransferLog::flush`], and dropped afterwards
/// unless the log was built [`with_history`](TransferLog::with_history).
#[derive(Debug)]
pub struct TransferLog {
    lines: Vec<String>,
    emitted: usize,
    enabled: bool,
    history: bool,
}

impl TransferLog {
    #[must_use]
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            emitted: 0,
            enabled: true,
            history: false,
        }
    }

    /// Keeps every line after it was flushed, see [`TransferLog::lines`]
    #[must_use]
    pub fn with_history() -> Self {
        Self {
            lines: Vec::new(),
            emitted: 0,
            enabled: true,
            history: true,
        }
    }

    /// Starts a new line
    pub fn add<L: Into<String>>(&mut self, line: L) {
        if !self.enabled {
            return;
        }

        self.flush();
        self.lines.push(line.into());
    }

    /// Appends to the line started last
    pub fn append_last_line(&mut self, suffix: &str) {
        if !self.enabled {
            return;
        }

        match self.lines.get_mut(self.emitted..).and_then(|lines| lines.last_mut()) {
            Some(line) => line.push_str(suffix),
            None => self.add(suffix),
        }
    }

    /// Turns output on or off. Lines written while disabled are dropped
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Forwards pending lines to the logger
    pub fn flush(&mut self) {
        for line in &self.lines[self.emitted..] {
            info!("{}", line);
        }

        if self.history {
            self.emitted = self.lines.len();
        } else {
            self.lines.clear();
            self.emitted = 0;
        }
    }

    /// Lines kept so far: all of them with history, otherwise only the ones
    /// not flushed yet
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl Default for TransferLog {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TransferLog {
    fn drop(&mut self) {
        self.flush();
    }
}
