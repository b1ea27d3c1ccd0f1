use crate::cue::Cue;
use crate::time::{time_range, TimeRange};

const BOM: char = '\u{FEFF}';

/// What a single trimmed, non-blank line is.
enum Line<'a> {
    Index,
    Range(TimeRange<'a>),
    Text(&'a str),
}

impl<'a> Line<'a> {
    fn classify(line: &'a str) -> Self {
        if line.bytes().all(|b| b.is_ascii_digit()) {
            Line::Index
        } else if let Some(range) = time_range(line) {
            Line::Range(range)
        } else {
            Line::Text(line)
        }
    }
}

/// Nothing open yet, a cue opened by its index line, or a cue that has also
/// seen its time range.
enum State {
    Idle,
    HasIndex(Cue),
    HasRange(Cue),
}

impl State {
    fn take(self) -> Option<Cue> {
        match self {
            State::Idle => None,
            State::HasIndex(cue) | State::HasRange(cue) => Some(cue),
        }
    }
}

/// Permissive SRT reader. Lines that fit nowhere are dropped, never reported.
pub struct Parser {
    state: State,
    cues: Vec<Cue>,
}

impl Parser {
    pub fn new() -> Self {
        Self {
            state: State::Idle,
            cues: Vec::new(),
        }
    }

    pub fn parse(mut self, input: &str) -> Vec<Cue> {
        let input = input.strip_prefix(BOM).unwrap_or(input);
        for (line_num, raw) in input.split('\n').enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            self.feed(line_num + 1, line);
        }
        self.finish()
    }

    fn feed(&mut self, line_num: usize, line: &str) {
        let state = std::mem::replace(&mut self.state, State::Idle);
        self.state = match (state, Line::classify(line)) {
            (state, Line::Index) => {
                if let Some(cue) = state.take() {
                    self.cues.push(cue);
                }
                State::HasIndex(Cue::new(self.cues.len() + 1))
            }
            (State::HasIndex(mut cue), Line::Range(range))
            | (State::HasRange(mut cue), Line::Range(range)) => {
                cue.set_range(range);
                State::HasRange(cue)
            }
            (State::HasIndex(mut cue), Line::Text(text)) => {
                cue.push_line(text);
                State::HasIndex(cue)
            }
            (State::HasRange(mut cue), Line::Text(text)) => {
                cue.push_line(text);
                State::HasRange(cue)
            }
            (State::Idle, _) => {
                log::debug!("Line {}: no open cue, skipping '{}'", line_num, line);
                State::Idle
            }
        };
    }

    fn finish(mut self) -> Vec<Cue> {
        if let Some(cue) = self.state.take() {
            self.cues.push(cue);
        }
        self.cues
    }
}

pub fn parse(input: &str) -> Vec<Cue> {
    Parser::new().parse(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_cue() {
        let cues = parse("1\n00:00:01,000 --> 00:00:03,500\nHello world\n");

        assert_eq!(cues.len(), 1);
        let cue = &cues[0];
        assert_eq!(cue.index, 1);
        assert_eq!(cue.start, "00:00:01,000");
        assert_eq!(cue.end, "00:00:03,500");
        assert_eq!(cue.start_micros, 1_000_000);
        assert_eq!(cue.end_micros, 3_500_000);
        assert_eq!(cue.duration, 2_500_000);
        assert_eq!(cue.text, "Hello world");
    }

    #[test]
    fn multi_line_text_and_crlf() {
        let cues = parse(
            "1\r\n00:00:01,000 --> 00:00:02,000\r\n  First line  \r\nSecond line\r\n\r\n\
             2\r\n00:00:03,000 --> 00:00:04,000\r\nThird\r\n",
        );

        assert_eq!(cues.len(), 2);
        assert_eq!(cues[0].text, "First line\nSecond line");
        assert_eq!(cues[1].text, "Third");
    }

    #[test]
    fn indices_are_rederived() {
        let cues = parse(
            "7\n00:00:01,000 --> 00:00:02,000\nA\n\n\
             3\n00:00:02,000 --> 00:00:03,000\nB\n\n\
             3\n00:00:03,000 --> 00:00:04,000\nC\n",
        );

        let indices: Vec<usize> = cues.iter().map(|c| c.index).collect();
        assert_eq!(indices, vec![1, 2, 3]);
    }

    #[test]
    fn blank_and_indexless_input_is_empty() {
        assert!(parse("").is_empty());
        assert!(parse("\n \n\t\n").is_empty());
        assert!(parse("00:00:01,000 --> 00:00:02,000\nOrphan text\n").is_empty());
    }

    #[test]
    fn drops_lines_before_first_index() {
        let cues = parse("Preamble\n1\n00:00:01,000 --> 00:00:02,000\nText\n");

        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].text, "Text");
    }

    #[test]
    fn cue_without_range_keeps_zero_times() {
        let cues = parse("1\nJust text\n");

        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].start, "");
        assert_eq!(cues[0].start_micros, 0);
        assert_eq!(cues[0].duration, 0);
        assert_eq!(cues[0].text, "Just text");
    }

    #[test]
    fn later_range_overrides_earlier() {
        let cues = parse(
            "1\n00:00:01,000 --> 00:00:02,000\n00:00:05,000 --> 00:00:09,000\nText\n",
        );

        assert_eq!(cues[0].start_micros, 5_000_000);
        assert_eq!(cues[0].duration, 4_000_000);
        assert_eq!(cues[0].text, "Text");
    }

    #[test]
    fn negative_duration_passes_through() {
        let cues = parse("1\n00:00:05,000 --> 00:00:01,000\nBackwards\n");

        assert_eq!(cues[0].duration, -4_000_000);
    }

    #[test]
    fn strips_bom() {
        let cues = parse("\u{FEFF}1\n00:00:01,000 --> 00:00:02,000\nText\n");

        assert_eq!(cues.len(), 1);
    }

    #[test]
    fn cue_without_trailing_newline() {
        let cues = parse("1\n00:00:01,000 --> 00:00:02,000\nLast");

        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].text, "Last");
    }
}
