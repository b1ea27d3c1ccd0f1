use crate::draft::TEXT_TRACK;
use crate::serialiser::time_line;
use crate::time::{time_range, MICROS_PER_SECOND};

use std::collections::HashMap;

use anyhow::{anyhow, Context, Result};
use regex::Regex;
use serde_json::Value;

/// Spreads cues apart: the k-th time line moves `k * gap_secs` later.
/// Time lines running backwards are left untouched and do not count.
pub fn shift_srt(input: &str, gap_secs: i64) -> Result<String> {
    let gap = gap_micros(gap_secs)?;
    let mut out = String::with_capacity(input.len() + input.len() / 4);
    let mut cumulative: i64 = 0;

    for line in input.lines() {
        match time_range(line) {
            Some(range) if range.end_micros >= range.start_micros => {
                let duration = range.end_micros - range.start_micros;
                let start = range
                    .start_micros
                    .checked_add(cumulative)
                    .ok_or_else(|| overflow(line))?
                    .max(0);
                let end = start.checked_add(duration).ok_or_else(|| overflow(line))?;
                out.push_str(&time_line(start, end));
                cumulative = cumulative.checked_add(gap).ok_or_else(|| overflow(line))?;
            }
            Some(_) => {
                log::warn!("Negative duration, leaving '{}' as is", line);
                out.push_str(line);
            }
            None => out.push_str(line),
        }
        out.push('\n');
    }

    Ok(out)
}

/// Same as [`shift_srt`] for a draft: segment `i` of each text track starts
/// `i * gap_secs` later. Everything else in the document is kept.
pub fn shift_draft(draft: &mut Value, gap_secs: i64) -> Result<()> {
    let gap = gap_micros(gap_secs)?;
    let tracks = draft
        .get_mut("tracks")
        .and_then(Value::as_array_mut)
        .ok_or_else(|| anyhow!("Draft has no track list"))?;

    for track in tracks.iter_mut().filter(|t| t["type"] == TEXT_TRACK) {
        let segments = match track.get_mut("segments").and_then(Value::as_array_mut) {
            Some(segments) => segments,
            None => continue,
        };
        for (i, segment) in segments.iter_mut().enumerate().skip(1) {
            let start = match segment.pointer_mut("/target_timerange/start") {
                Some(start) => start,
                None => continue,
            };
            let old = match start.as_i64().or_else(|| start.as_f64().map(|f| f as i64)) {
                Some(old) => old,
                None => continue,
            };
            let new = i64::try_from(i)
                .ok()
                .and_then(|i| gap.checked_mul(i))
                .and_then(|offset| old.checked_add(offset))
                .ok_or_else(|| anyhow!("Shifting segment {} by {}s overflows", i, gap_secs))?;
            *start = Value::from(new.max(0));
        }
    }
    Ok(())
}

fn gap_micros(gap_secs: i64) -> Result<i64> {
    gap_secs
        .checked_mul(MICROS_PER_SECOND)
        .ok_or_else(|| anyhow!("Gap of {}s is too large", gap_secs))
}

fn overflow(line: &str) -> anyhow::Error {
    anyhow!("Shifting '{}' overflows the time range", line)
}

/// Literal find-and-replace over a fixed table. At each position the longest
/// matching key wins; replaced text is not scanned again.
pub struct Replacer {
    pattern: Option<Regex>,
    table: HashMap<String, String>,
}

impl Replacer {
    pub fn new(table: HashMap<String, String>) -> Result<Self> {
        let mut keys: Vec<&String> = table.keys().filter(|k| !k.is_empty()).collect();
        keys.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        let pattern = if keys.is_empty() {
            None
        } else {
            let alternation = keys
                .iter()
                .map(|k| regex::escape(k))
                .collect::<Vec<_>>()
                .join("|");
            Some(Regex::new(&alternation).context("Failed to compile replacement table.")?)
        };
        Ok(Self { pattern, table })
    }

    pub fn from_json(config: &str) -> Result<Self> {
        let table: HashMap<String, String> =
            serde_json::from_str(config).context("Replacement table must map strings to strings.")?;
        Self::new(table)
    }

    pub fn replace(&self, text: &str) -> String {
        match &self.pattern {
            Some(pattern) => pattern
                .replace_all(text, |caps: &regex::Captures| self.table[&caps[0]].clone())
                .into_owned(),
            None => text.to_string(),
        }
    }

    /// Rewrites the subtitle text of a draft: the text between the markup tags
    /// of every text material's `content`, and the `text` of its words. The
    /// tags themselves (font path, colour, size), ids and style fields are
    /// left alone. Returns how many strings changed.
    pub fn replace_draft(&self, draft: &mut Value) -> usize {
        let texts = match draft
            .pointer_mut("/materials/texts")
            .and_then(Value::as_array_mut)
        {
            Some(texts) => texts,
            None => return 0,
        };

        let mut changed = 0;
        for text in texts.iter_mut() {
            changed += update_string(text, "content", |s| self.replace_between_tags(s));
            if let Some(words) = text.get_mut("words").and_then(Value::as_array_mut) {
                for word in words.iter_mut() {
                    changed += update_string(word, "text", |s| self.replace(s));
                }
            }
        }
        changed
    }

    /// Applies the table to everything outside `<...>` tags.
    fn replace_between_tags(&self, content: &str) -> String {
        let mut out = String::with_capacity(content.len());
        let mut rest = content;
        while !rest.is_empty() {
            let (text, tail) = rest.split_at(rest.find('<').unwrap_or(rest.len()));
            out.push_str(&self.replace(text));
            let tag_len = tail.find('>').map_or(tail.len(), |i| i + 1);
            out.push_str(&tail[..tag_len]);
            rest = &tail[tag_len..];
        }
        out
    }
}

fn update_string<F: Fn(&str) -> String>(object: &mut Value, field: &str, f: F) -> usize {
    match object.get_mut(field) {
        Some(Value::String(s)) => {
            let replaced = f(s);
            if replaced != *s {
                *s = replaced;
                1
            } else {
                0
            }
        }
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::projector::project;

    use serde_json::json;

    #[test]
    fn shift_srt_spreads_cues() {
        let input = "1\n00:00:01,000 --> 00:00:02,000\nA\n\n\
                     2\n00:00:03,000 --> 00:00:04,500\nB\n\n\
                     3\n00:00:05,000 --> 00:00:06,000\nC\n";

        let out = shift_srt(input, 10).unwrap();

        let cues = parse(&out);
        let starts: Vec<i64> = cues.iter().map(|c| c.start_micros).collect();
        let durations: Vec<i64> = cues.iter().map(|c| c.duration).collect();
        assert_eq!(starts, vec![1_000_000, 13_000_000, 25_000_000]);
        assert_eq!(durations, vec![1_000_000, 1_500_000, 1_000_000]);
        assert!(out.contains("\nB\n"));
    }

    #[test]
    fn shift_srt_skips_backwards_lines() {
        let input = "1\n00:00:05,000 --> 00:00:01,000\nA\n\n\
                     2\n00:00:06,000 --> 00:00:07,000\nB\n";

        let out = shift_srt(input, 10).unwrap();

        assert!(out.contains("00:00:05,000 --> 00:00:01,000\n"));
        assert!(out.contains("00:00:06,000 --> 00:00:07,000\n"));
    }

    #[test]
    fn shift_draft_moves_later_segments() {
        let cues = parse(
            "1\n00:00:01,000 --> 00:00:02,000\nA\n\n\
             2\n00:00:03,000 --> 00:00:04,000\nB\n\n\
             3\n00:00:05,000 --> 00:00:06,000\nC\n",
        );
        let mut draft = serde_json::to_value(project(&cues)).unwrap();

        shift_draft(&mut draft, 2).unwrap();

        let starts: Vec<i64> = draft["tracks"][1]["segments"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["target_timerange"]["start"].as_i64().unwrap())
            .collect();
        assert_eq!(starts, vec![1_000_000, 5_000_000, 9_000_000]);
        assert_eq!(draft["tracks"][1]["segments"][1]["target_timerange"]["duration"], 1_000_000);
    }

    #[test]
    fn shift_draft_clamps_and_needs_tracks() {
        let mut draft = json!({"tracks": [{"type": "text", "segments": [
            {"target_timerange": {"start": 0, "duration": 1}},
            {"target_timerange": {"start": 1_000_000, "duration": 1}}
        ]}]});

        shift_draft(&mut draft, -5).unwrap();

        assert_eq!(draft["tracks"][0]["segments"][1]["target_timerange"]["start"], 0);
        assert!(shift_draft(&mut json!({}), 1).is_err());
    }

    #[test]
    fn shift_srt_rejects_huge_gap() {
        let input = "1\n00:00:01,000 --> 00:00:02,000\nA\n\n\
                     2\n00:00:03,000 --> 00:00:04,000\nB\n";

        assert!(shift_srt(input, 10_000_000_000_000).is_err());
        assert!(shift_srt(input, i64::MIN).is_err());
    }

    #[test]
    fn shift_srt_rejects_overflowing_total() {
        // The gap itself fits, but the second cue start plus the gap does not.
        let gap = i64::MAX / MICROS_PER_SECOND;
        let input = "1\n00:00:01,000 --> 00:00:02,000\nA\n\n\
                     2\n00:00:03,000 --> 00:00:04,000\nB\n\n\
                     3\n00:00:05,000 --> 00:00:06,000\nC\n";

        assert!(shift_srt(input, gap).is_err());
    }

    #[test]
    fn shift_draft_rejects_huge_gap() {
        let mut draft = json!({"tracks": [{"type": "text", "segments": [
            {"target_timerange": {"start": 0, "duration": 1}},
            {"target_timerange": {"start": 0, "duration": 1}},
            {"target_timerange": {"start": 0, "duration": 1}}
        ]}]});

        assert!(shift_draft(&mut draft.clone(), 10_000_000_000_000).is_err());
        assert!(shift_draft(&mut draft, i64::MAX / MICROS_PER_SECOND).is_err());
    }

    fn table(pairs: &[(&str, &str)]) -> Replacer {
        Replacer::new(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn replace_prefers_longest_key() {
        let replacer = table(&[("a", "1"), ("ab", "2"), ("b", "3")]);

        assert_eq!(replacer.replace("abab a b"), "22 1 3");
    }

    #[test]
    fn replace_does_not_rescan_output() {
        let replacer = table(&[("cat", "dog"), ("dog", "cat")]);

        assert_eq!(replacer.replace("cat dog"), "dog cat");
    }

    #[test]
    fn replace_escapes_keys() {
        let replacer = table(&[("1.5", "one and a half"), ("(x)", "[x]")]);

        assert_eq!(replacer.replace("1.5 1x5 (x)"), "one and a half 1x5 [x]");
    }

    #[test]
    fn empty_table_is_identity() {
        let replacer = table(&[]);

        assert_eq!(replacer.replace("unchanged"), "unchanged");
    }

    #[test]
    fn replace_from_json_config() {
        let replacer = Replacer::from_json(r#"{"colour": "color"}"#).unwrap();

        assert_eq!(replacer.replace("colour"), "color");
        assert!(Replacer::from_json(r#"{"a": 1}"#).is_err());
    }

    #[test]
    fn replace_draft_leaves_markup_alone() {
        let cues = parse("1\n00:00:01,000 --> 00:00:02,000\nHello world\n");
        let mut draft = serde_json::to_value(project(&cues)).unwrap();
        let original = draft["materials"]["texts"][0]["content"]
            .as_str()
            .unwrap()
            .to_string();
        let replacer = table(&[("world", "there"), ("Font", "XXX"), ("1.000000", "0.5")]);

        let changed = replacer.replace_draft(&mut draft);

        let content = draft["materials"]["texts"][0]["content"].as_str().unwrap();
        assert_eq!(content, original.replace("[Hello world]", "[Hello there]"));
        assert!(!content.contains("XXX"));
        assert!(!draft["materials"]["texts"][0]["font_path"]
            .as_str()
            .unwrap()
            .contains("XXX"));
        assert_eq!(changed, 1);
    }

    #[test]
    fn replace_between_tags_handles_unclosed_tag() {
        let replacer = table(&[("a", "b")]);

        assert_eq!(replacer.replace_between_tags("a<i>a</i>a<a"), "b<i>b</i>b<a");
        assert_eq!(replacer.replace_between_tags("plain a"), "plain b");
    }

    #[test]
    fn replace_draft_rewrites_words() {
        let mut draft = json!({"materials": {"texts": [
            {"id": "t", "content": "[hi]", "words": [{"begin": 0, "end": 1, "text": "hi"}]}
        ]}});

        let changed = table(&[("hi", "hey")]).replace_draft(&mut draft);

        assert_eq!(changed, 2);
        assert_eq!(draft["materials"]["texts"][0]["words"][0]["text"], "hey");
    }
}
