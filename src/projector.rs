use crate::cue::Cue;
use crate::draft::{Draft, Segment, TextMaterial, Timerange, ANIMATION_POOL_SIZE, TEXT_TRACK};

use uuid::Uuid;

/// Render index of the first cue; each following cue sits one lower.
pub const BASE_RENDER_INDEX: i64 = 14_000;

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

pub fn project(cues: &[Cue]) -> Draft {
    project_with(cues, &mut new_id)
}

/// Builds the draft for `cues`, drawing every id from `next_id`.
pub fn project_with<F: FnMut() -> String>(cues: &[Cue], next_id: &mut F) -> Draft {
    let mut draft = Draft::skeleton(next_id);

    for (i, cue) in cues.iter().enumerate() {
        log::trace!("Cue {}: {} --> {}", cue.index, cue.start, cue.end);
        let text_id = next_id();
        let animation_id = draft.materials.material_animations[i % ANIMATION_POOL_SIZE]
            .id
            .clone();

        draft
            .materials
            .texts
            .push(TextMaterial::subtitle(text_id.clone(), &cue.text));

        let segment = Segment::text(
            next_id(),
            text_id,
            animation_id,
            BASE_RENDER_INDEX - i as i64,
            Timerange {
                duration: cue.duration,
                start: cue.start_micros,
            },
        );
        match draft.track_mut(TEXT_TRACK) {
            Some(track) => track.segments.push(segment),
            None => log::warn!("Draft has no text track, dropping cue {}", cue.index),
        }
    }

    log::debug!("Projected {} cues onto track '{}'", cues.len(), TEXT_TRACK);
    draft
}
