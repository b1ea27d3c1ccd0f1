use crate::cue::Cue;
use crate::draft::Draft;
use crate::time::{MICROS_PER_HOUR, MICROS_PER_MILLI, MICROS_PER_MINUTE, MICROS_PER_SECOND};

/// Compact JSON, the way the editor writes its own drafts.
pub fn draft_to_vec(draft: &Draft) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec(draft)
}

pub fn srt_to_string(cues: &[Cue]) -> String {
    let mut out = String::new();
    for cue in cues {
        push_cue(&mut out, cue);
    }
    out
}

/// Index, time line, text lines, then the blank separator line.
fn push_cue(out: &mut String, cue: &Cue) {
    out.push_str(&cue.index.to_string());
    out.push('\n');
    out.push_str(&time_line(cue.start_micros, cue.end_micros));
    out.push('\n');
    for line in cue.text.lines() {
        out.push_str(line);
        out.push('\n');
    }
    out.push('\n');
}

pub fn time_line(start_micros: i64, end_micros: i64) -> String {
    format!("{} --> {}", format_ts(start_micros), format_ts(end_micros))
}

/// `HH:MM:SS,mmm`, with hours widening past two digits when needed. Negative
/// times are written as zero and sub-millisecond parts are cut off.
pub fn format_ts(micros: i64) -> String {
    let micros = micros.max(0);
    format!(
        "{:02}:{:02}:{:02},{:03}",
        micros / MICROS_PER_HOUR,
        (micros % MICROS_PER_HOUR) / MICROS_PER_MINUTE,
        (micros % MICROS_PER_MINUTE) / MICROS_PER_SECOND,
        (micros % MICROS_PER_SECOND) / MICROS_PER_MILLI
    )
}
