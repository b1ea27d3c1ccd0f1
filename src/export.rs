//! Reading subtitles back out of a draft.

use crate::cue::Cue;
use crate::draft::{Timerange, TEXT_TRACK};

use std::collections::HashMap;

use serde::Deserialize;

/// Only the parts of a draft that carry subtitle text and timing. Drafts
/// written by the editor itself have many more fields; they are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct DraftTexts {
    #[serde(default)]
    materials: TextMaterials,
    #[serde(default)]
    tracks: Vec<TextTrack>,
}

#[derive(Debug, Default, Deserialize)]
struct TextMaterials {
    #[serde(default)]
    texts: Vec<Text>,
}

#[derive(Debug, Deserialize)]
struct Text {
    id: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    words: Vec<Word>,
}

/// Word-level timing, present on auto-captioned texts.
#[derive(Debug, Deserialize)]
struct Word {
    begin: i64,
    end: i64,
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct TextTrack {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    segments: Vec<TextSegment>,
}

#[derive(Debug, Deserialize)]
struct TextSegment {
    material_id: String,
    target_timerange: Timerange,
}

/// One cue per text segment, or one per word when the text has word timing.
/// Cues are numbered from 1 in track order.
pub fn extract_cues(draft: &DraftTexts) -> Vec<Cue> {
    let texts: HashMap<&str, &Text> = draft
        .materials
        .texts
        .iter()
        .map(|t| (t.id.as_str(), t))
        .collect();

    let mut cues = Vec::new();
    let mut push = |start: i64, end: i64, content: &str| {
        let index = cues.len() + 1;
        cues.push(Cue::from_micros(index, start, end, clean_text(content)));
    };

    for track in draft.tracks.iter().filter(|t| t.kind == TEXT_TRACK) {
        for segment in &track.segments {
            let text = match texts.get(segment.material_id.as_str()) {
                Some(text) => text,
                None => {
                    log::warn!(
                        "Segment refers to unknown text material '{}', skipping",
                        segment.material_id
                    );
                    continue;
                }
            };

            if text.words.is_empty() {
                let range = segment.target_timerange;
                push(range.start, range.start + range.duration, &text.content);
            } else {
                for word in &text.words {
                    push(word.begin, word.end, &word.text);
                }
            }
        }
    }
    cues
}

/// Strips rich-text markup: tags and brackets are dropped, `&lt;`/`&gt;`
/// are decoded.
pub fn clean_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_tag = false;
    let mut rest = input;

    while let Some(c) = rest.chars().next() {
        if let Some(tail) = rest.strip_prefix("&lt;") {
            out.push('<');
            rest = tail;
            continue;
        }
        if let Some(tail) = rest.strip_prefix("&gt;") {
            out.push('>');
            rest = tail;
            continue;
        }
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            '[' | ']' => {}
            _ if !in_tag => out.push(c),
            _ => {}
        }
        rest = &rest[c.len_utf8()..];
    }
    out
}
