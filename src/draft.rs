//! Typed model of the editor's `draft_content.json`.
//!
//! Field declaration order is serialisation order, and the editor is picky
//! about the shape, so fields here are listed exactly as the editor writes
//! them. Lists the converter never fills are typed as raw JSON values.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const APP_VERSION: &str = "1.5.0";
pub const FONT_PATH: &str =
    "C:/Users/os/AppData/Local/CapCut/Apps/1.5.0.230/Resources/Font/SystemFont/en.ttf";
pub const DRAFT_DURATION: i64 = 32_600_000;
pub const ANIMATION_POOL_SIZE: usize = 2;
pub const TEXT_TRACK: &str = "text";
pub const VIDEO_TRACK: &str = "video";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    pub canvas_config: CanvasConfig,
    pub color_space: i32,
    pub config: Config,
    pub cover: Option<Value>,
    pub create_time: i64,
    pub duration: i64,
    pub extra_info: Option<Value>,
    pub fps: f64,
    pub free_render_index_mode_on: bool,
    pub group_container: Option<Value>,
    pub id: String,
    pub keyframes: Keyframes,
    pub last_modified_platform: Platform,
    pub materials: Materials,
    pub mutable_config: Option<Value>,
    pub name: String,
    pub new_version: String,
    pub platform: Platform,
    pub relationships: Vec<Value>,
    pub render_index_track_mode_on: bool,
    pub retouch_cover: Option<Value>,
    pub source: String,
    pub static_cover_image_path: String,
    pub tracks: Vec<Track>,
    pub update_time: i64,
    pub version: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasConfig {
    pub height: u32,
    pub ratio: String,
    pub width: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub adjust_max_index: i32,
    pub attachment_info: Vec<Value>,
    pub combination_max_index: i32,
    pub export_range: Option<Value>,
    pub extract_audio_last_index: i32,
    pub lyrics_recognition_id: String,
    pub lyrics_sync: bool,
    pub lyrics_taskinfo: Vec<Value>,
    pub maintrack_adsorb: bool,
    pub material_save_mode: i32,
    pub original_sound_last_index: i32,
    pub record_audio_last_index: i32,
    pub sticker_max_index: i32,
    pub subtitle_recognition_id: String,
    pub subtitle_sync: bool,
    pub subtitle_taskinfo: Vec<SubtitleTask>,
    pub video_mute: bool,
    pub zoom_info_params: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtitleTask {
    pub id: String,
    pub language: String,
    pub remove_invalid_task_id: String,
    #[serde(rename = "type")]
    pub kind: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Keyframes {
    pub adjusts: Vec<Value>,
    pub audios: Vec<Value>,
    pub filters: Vec<Value>,
    pub handwrites: Vec<Value>,
    pub stickers: Vec<Value>,
    pub texts: Vec<Value>,
    pub videos: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub app_id: i64,
    pub app_source: String,
    pub app_version: String,
    pub device_id: String,
    pub hard_disk_id: String,
    pub mac_address: String,
    pub os: String,
    pub os_version: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Materials {
    pub audio_balances: Vec<Value>,
    pub audio_effects: Vec<Value>,
    pub audio_fades: Vec<Value>,
    pub audios: Vec<Value>,
    pub beats: Vec<Value>,
    pub canvases: Vec<Value>,
    pub chromas: Vec<Value>,
    pub color_curves: Vec<Value>,
    pub drafts: Vec<Value>,
    pub effects: Vec<Value>,
    pub handwrites: Vec<Value>,
    pub hsl: Vec<Value>,
    pub images: Vec<Value>,
    pub log_color_wheels: Vec<Value>,
    pub manual_deformations: Vec<Value>,
    pub masks: Vec<Value>,
    pub material_animations: Vec<MaterialAnimation>,
    pub placeholders: Vec<Value>,
    pub plugin_effects: Vec<Value>,
    pub primary_color_wheels: Vec<Value>,
    pub realtime_denoises: Vec<Value>,
    pub speeds: Vec<Value>,
    pub stickers: Vec<Value>,
    pub tail_leaders: Vec<Value>,
    pub text_templates: Vec<Value>,
    pub texts: Vec<TextMaterial>,
    pub transitions: Vec<Value>,
    pub video_effects: Vec<Value>,
    pub video_trackings: Vec<Value>,
    pub videos: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialAnimation {
    pub animations: Vec<Value>,
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// A styled subtitle text. Everything except `id` and `content` is the
/// editor's default subtitle preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextMaterial {
    pub add_type: i32,
    pub alignment: i32,
    pub background_alpha: f64,
    pub background_color: String,
    pub background_height: f64,
    pub background_horizontal_offset: f64,
    pub background_round_radius: f64,
    pub background_style: i32,
    pub background_vertical_offset: f64,
    pub background_width: f64,
    pub bold_width: f64,
    pub border_color: String,
    pub border_width: f64,
    pub check_flag: i32,
    pub content: String,
    pub font_category_id: String,
    pub font_category_name: String,
    pub font_id: String,
    pub font_name: String,
    pub font_path: String,
    pub font_resource_id: String,
    pub font_size: f64,
    pub font_source_platform: i32,
    pub font_team_id: String,
    pub font_title: String,
    pub font_url: String,
    pub fonts: Vec<Value>,
    pub global_alpha: f64,
    pub group_id: String,
    pub has_shadow: bool,
    pub id: String,
    pub initial_scale: f64,
    pub is_rich_text: bool,
    pub italic_degree: i32,
    pub ktv_color: String,
    pub layer_weight: i32,
    pub letter_spacing: f64,
    pub line_spacing: f64,
    pub name: String,
    pub recognize_type: i32,
    pub shadow_alpha: f64,
    pub shadow_angle: f64,
    pub shadow_color: String,
    pub shadow_distance: f64,
    pub shadow_point: Point,
    pub shadow_smoothing: f64,
    pub shape_clip_x: bool,
    pub shape_clip_y: bool,
    pub style_name: String,
    pub sub_type: i32,
    pub text_alpha: f64,
    pub text_color: String,
    pub text_preset_resource_id: String,
    pub text_size: i32,
    pub text_to_audio_ids: Vec<Value>,
    pub tts_auto_update: bool,
    #[serde(rename = "type")]
    pub kind: String,
    pub typesetting: i32,
    pub underline: bool,
    pub underline_offset: f64,
    pub underline_width: f64,
    pub use_effect_default_color: bool,
    pub words: Vec<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub attribute: i32,
    pub flag: i32,
    pub id: String,
    pub segments: Vec<Segment>,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub cartoon: bool,
    pub clip: Clip,
    pub enable_adjust: bool,
    pub enable_color_curves: bool,
    pub enable_color_wheels: bool,
    pub enable_lut: bool,
    pub extra_material_refs: Vec<String>,
    pub group_id: String,
    pub hdr_settings: Option<Value>,
    pub id: String,
    pub intensifies_audio: bool,
    pub is_placeholder: bool,
    pub is_tone_modify: bool,
    pub keyframe_refs: Vec<Value>,
    pub last_nonzero_volume: f64,
    pub material_id: String,
    pub render_index: i64,
    pub reverse: bool,
    pub source_timerange: Option<Timerange>,
    pub speed: f64,
    pub target_timerange: Timerange,
    pub template_id: String,
    pub track_attribute: i32,
    pub track_render_index: i32,
    pub visible: bool,
    pub volume: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    pub alpha: f64,
    pub flip: Flip,
    pub rotation: f64,
    pub scale: Point,
    pub transform: Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Flip {
    pub horizontal: bool,
    pub vertical: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timerange {
    pub duration: i64,
    pub start: i64,
}

impl Draft {
    /// The empty project every conversion starts from: a video track, a
    /// text track and a pool of animation groups. `next_id` is called once
    /// per id slot.
    pub fn skeleton<F: FnMut() -> String>(next_id: &mut F) -> Self {
        let subtitle_task = SubtitleTask {
            id: next_id(),
            language: String::new(),
            remove_invalid_task_id: String::new(),
            kind: 10,
        };
        let draft_id = next_id();
        let material_animations = (0..ANIMATION_POOL_SIZE)
            .map(|_| MaterialAnimation {
                animations: Vec::new(),
                id: next_id(),
                kind: "sticker_animation".to_string(),
            })
            .collect();
        let tracks = vec![
            Track::empty(VIDEO_TRACK, 0, next_id()),
            Track::empty(TEXT_TRACK, 1, next_id()),
        ];

        Draft {
            canvas_config: CanvasConfig {
                height: 1080,
                ratio: "original".to_string(),
                width: 1920,
            },
            color_space: 0,
            config: Config {
                adjust_max_index: 1,
                attachment_info: Vec::new(),
                combination_max_index: 1,
                export_range: None,
                extract_audio_last_index: 1,
                lyrics_recognition_id: String::new(),
                lyrics_sync: true,
                lyrics_taskinfo: Vec::new(),
                maintrack_adsorb: true,
                material_save_mode: 0,
                original_sound_last_index: 1,
                record_audio_last_index: 1,
                sticker_max_index: 1,
                subtitle_recognition_id: String::new(),
                subtitle_sync: true,
                subtitle_taskinfo: vec![subtitle_task],
                video_mute: false,
                zoom_info_params: None,
            },
            cover: None,
            create_time: 0,
            duration: DRAFT_DURATION,
            extra_info: None,
            fps: 30.0,
            free_render_index_mode_on: false,
            group_container: None,
            id: draft_id,
            keyframes: Keyframes::default(),
            last_modified_platform: Platform::windows(),
            materials: Materials {
                material_animations,
                ..Materials::default()
            },
            mutable_config: None,
            name: String::new(),
            new_version: "68.0.1".to_string(),
            platform: Platform::windows(),
            relationships: Vec::new(),
            render_index_track_mode_on: false,
            retouch_cover: None,
            source: "default".to_string(),
            static_cover_image_path: String::new(),
            tracks,
            update_time: 0,
            version: 360_000,
        }
    }

    pub fn track_mut(&mut self, kind: &str) -> Option<&mut Track> {
        self.tracks.iter_mut().find(|t| t.kind == kind)
    }

    pub fn track(&self, kind: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.kind == kind)
    }
}

impl Platform {
    fn windows() -> Self {
        Platform {
            app_id: 359_289,
            app_source: "cc".to_string(),
            app_version: APP_VERSION.to_string(),
            device_id: "839a3a0281bf298bb7a04ef106f6f838".to_string(),
            hard_disk_id: "2042ebf3be3c78787b62a7cf8ea27d5d".to_string(),
            mac_address: "72859f122da5bc1c1d727bfd8490ee4f".to_string(),
            os: "windows".to_string(),
            os_version: "10.0.19044".to_string(),
        }
    }
}

impl Track {
    fn empty(kind: &str, flag: i32, id: String) -> Self {
        Track {
            attribute: 0,
            flag,
            id,
            segments: Vec::new(),
            kind: kind.to_string(),
        }
    }
}

impl TextMaterial {
    /// The default subtitle preset carrying `text`.
    pub fn subtitle(id: String, text: &str) -> Self {
        TextMaterial {
            add_type: 1,
            alignment: 1,
            background_alpha: 1.0,
            background_color: String::new(),
            background_height: 1.0,
            background_horizontal_offset: 0.0,
            background_round_radius: 0.0,
            background_style: 0,
            background_vertical_offset: 0.0,
            background_width: 1.0,
            bold_width: 0.0,
            border_color: String::new(),
            border_width: 0.08,
            check_flag: 7,
            content: rich_text(text),
            font_category_id: String::new(),
            font_category_name: String::new(),
            font_id: String::new(),
            font_name: String::new(),
            font_path: FONT_PATH.to_string(),
            font_resource_id: String::new(),
            font_size: 5.0,
            font_source_platform: 0,
            font_team_id: String::new(),
            font_title: "none".to_string(),
            font_url: String::new(),
            fonts: Vec::new(),
            global_alpha: 1.0,
            group_id: String::new(),
            has_shadow: false,
            id,
            initial_scale: 1.0,
            is_rich_text: false,
            italic_degree: 0,
            ktv_color: String::new(),
            layer_weight: 1,
            letter_spacing: 0.0,
            line_spacing: 0.02,
            name: String::new(),
            recognize_type: 0,
            shadow_alpha: 0.8,
            shadow_angle: -45.0,
            shadow_color: String::new(),
            shadow_distance: 8.0,
            shadow_point: Point {
                x: 1.018_233_764_908_628_4,
                y: -1.018_233_764_908_628_4,
            },
            shadow_smoothing: 1.0,
            shape_clip_x: false,
            shape_clip_y: false,
            style_name: String::new(),
            sub_type: 0,
            text_alpha: 1.0,
            text_color: "#FFFFFF".to_string(),
            text_preset_resource_id: String::new(),
            text_size: 30,
            text_to_audio_ids: Vec::new(),
            tts_auto_update: false,
            kind: "subtitle".to_string(),
            typesetting: 0,
            underline: false,
            underline_offset: 0.22,
            underline_width: 0.05,
            use_effect_default_color: true,
            words: Vec::new(),
        }
    }
}

impl Segment {
    /// A text-track segment placing `material_id` at `target_timerange`.
    pub fn text(
        id: String,
        material_id: String,
        animation_id: String,
        render_index: i64,
        target_timerange: Timerange,
    ) -> Self {
        Segment {
            cartoon: false,
            clip: Clip {
                alpha: 1.0,
                flip: Flip {
                    horizontal: false,
                    vertical: false,
                },
                rotation: 0.0,
                scale: Point { x: 1.0, y: 1.0 },
                transform: Point { x: 0.0, y: -0.73 },
            },
            enable_adjust: false,
            enable_color_curves: true,
            enable_color_wheels: true,
            enable_lut: false,
            extra_material_refs: vec![animation_id],
            group_id: String::new(),
            hdr_settings: None,
            id,
            intensifies_audio: false,
            is_placeholder: false,
            is_tone_modify: false,
            keyframe_refs: Vec::new(),
            last_nonzero_volume: 1.0,
            material_id,
            render_index,
            reverse: false,
            source_timerange: None,
            speed: 1.0,
            target_timerange,
            template_id: String::new(),
            track_attribute: 0,
            track_render_index: 0,
            visible: true,
            volume: 1.0,
        }
    }
}

/// Wraps subtitle text in the editor's rich-text markup.
pub fn rich_text(text: &str) -> String {
    format!(
        "<font id=\"\" path=\"{}\"><color=(1.000000, 1.000000, 1.000000, 1.000000)><size=5.000000>[{}]</size></color></font>",
        FONT_PATH, text
    )
}
