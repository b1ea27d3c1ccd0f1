/// One parsed subtitle entry.
///
/// Times are signed microseconds; `duration` is not guaranteed to be positive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cue {
    pub(crate) index: usize,
    pub(crate) start: String,
    pub(crate) end: String,
    pub(crate) start_micros: i64,
    pub(crate) end_micros: i64,
    pub(crate) duration: i64,
    pub(crate) text: String,
}

impl Cue {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            ..Self::default()
        }
    }

    pub fn set_range(&mut self, range: crate::time::TimeRange<'_>) {
        self.start = range.start.to_string();
        self.end = range.end.to_string();
        self.start_micros = range.start_micros;
        self.end_micros = range.end_micros;
        self.duration = range.end_micros - range.start_micros;
    }

    /// Builds a finished cue from known times, e.g. when reading one back out of a draft.
    pub fn from_micros(index: usize, start_micros: i64, end_micros: i64, text: String) -> Self {
        Self {
            index,
            start: String::new(),
            end: String::new(),
            start_micros,
            end_micros,
            duration: end_micros - start_micros,
            text,
        }
    }

    pub fn push_line(&mut self, line: &str) {
        if !self.text.is_empty() {
            self.text.push('\n');
        }
        self.text.push_str(line);
    }
}
