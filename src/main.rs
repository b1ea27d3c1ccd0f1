mod cue;
mod draft;
mod error;
mod export;
mod files;
mod parser;
mod processor;
mod projector;
mod serialiser;
mod time;

use crate::draft::TEXT_TRACK;
use crate::error::DraftError;
use crate::export::DraftTexts;
use crate::files::{read_input, write_output};
use crate::processor::Replacer;

use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser as ClapParser, Subcommand, ValueEnum};
use env_logger::Env;
use log::{error, info, warn};

fn main() {
    let cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    match run(cli) {
        Ok(()) => (),
        Err(err) => {
            error!("An error occurred: {}", err);
            for cause in err.chain().skip(1) {
                error!("    {}", cause);
            }
            let code = err
                .chain()
                .find_map(|e| e.downcast_ref::<DraftError>())
                .map_or(1, DraftError::exit_code);
            std::process::exit(code);
        }
    }
}

/// Ten years, in seconds.
const MAX_GAP_SECS: i64 = 315_360_000;

#[derive(ClapParser)]
#[command(about = "Turn SRT subtitles into a video editor draft, and back")]
struct Cli {
    #[arg(short, long, global = true, help = "Log debug output.")]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[command(about = "Convert SRT subtitles into a draft with one text segment per cue")]
    Convert {
        #[arg(
            short,
            long,
            value_name = "FILE",
            help = "The SRT file to read from. Use '-' for standard input.",
            default_value = "subtitles.srt"
        )]
        input: String,
        #[arg(
            short,
            long,
            value_name = "FILE",
            help = "The draft to write. Use '-' for standard output.",
            default_value = "draft_content.json"
        )]
        output: String,
    },
    #[command(about = "Write the subtitles of a draft back out as SRT")]
    Export {
        #[arg(
            short,
            long,
            value_name = "FILE",
            help = "The draft to read from. Use '-' for standard input.",
            default_value = "draft_content.json"
        )]
        input: String,
        #[arg(
            short,
            long,
            value_name = "FILE",
            help = "The SRT file to write. If not supplied, the subtitles will be written to standard output.",
            default_value = "-"
        )]
        output: String,
    },
    #[command(about = "Insert a growing gap between consecutive subtitles")]
    Shift {
        #[arg(short, long, value_name = "FILE", help = "The SRT file or draft to shift.")]
        input: String,
        #[arg(
            short,
            long,
            value_name = "FILE",
            help = "Where to write the result. Defaults to overwriting the input."
        )]
        output: Option<String>,
        #[arg(
            short,
            long,
            value_name = "SECONDS",
            help = "Gap added before each subtitle, on top of the gaps before it.",
            default_value_t = 10,
            allow_negative_numbers = true,
            value_parser = clap::value_parser!(i64).range(-MAX_GAP_SECS..=MAX_GAP_SECS)
        )]
        gap: i64,
        #[arg(
            short,
            long,
            value_enum,
            help = "Input format. Guessed from the file extension if not supplied."
        )]
        format: Option<Format>,
    },
    #[command(about = "Replace words in subtitle text using a JSON table of {\"old\": \"new\"} pairs")]
    Replace {
        #[arg(short, long, value_name = "FILE", help = "The SRT file, text file or draft to rewrite.")]
        input: String,
        #[arg(
            short,
            long,
            value_name = "FILE",
            help = "Where to write the result. Defaults to overwriting the input."
        )]
        output: Option<String>,
        #[arg(
            short,
            long,
            value_name = "FILE",
            help = "The replacement table.",
            default_value = "replacements.json"
        )]
        table: String,
        #[arg(
            short,
            long,
            value_enum,
            help = "Input format. Guessed from the file extension if not supplied."
        )]
        format: Option<Format>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    /// SRT or any other plain text
    Srt,
    /// Editor draft JSON
    Draft,
}

impl Format {
    fn guess(path: &str) -> Self {
        match Path::new(path).extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Format::Draft,
            _ => Format::Srt,
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Convert { input, output } => convert(&input, &output),
        Command::Export { input, output } => export(&input, &output),
        Command::Shift {
            input,
            output,
            gap,
            format,
        } => {
            let output = output.unwrap_or_else(|| input.clone());
            let format = format.unwrap_or_else(|| Format::guess(&input));
            shift(&input, &output, gap, format)
        }
        Command::Replace {
            input,
            output,
            table,
            format,
        } => {
            let output = output.unwrap_or_else(|| input.clone());
            let format = format.unwrap_or_else(|| Format::guess(&input));
            replace(&input, &output, &table, format)
        }
    }
}

fn convert(input: &str, output: &str) -> Result<()> {
    let data = read_input(input)?;

    let cues = parser::parse(&data);
    if cues.is_empty() {
        warn!("No subtitles found in '{}', writing an empty draft.", input);
    }
    info!("Parsed {} subtitles from '{}'", cues.len(), input);

    let draft = projector::project(&cues);
    let placed = draft
        .track(TEXT_TRACK)
        .map_or(0, |track| track.segments.len());
    info!("Placed {} text segments", placed);
    let json = serialiser::draft_to_vec(&draft).context("Failed to serialise draft.")?;
    write_output(output, &json)?;

    info!("Successfully converted '{}' to '{}'", input, output);
    Ok(())
}

fn export(input: &str, output: &str) -> Result<()> {
    let data = read_input(input)?;
    let draft: DraftTexts = decode_draft(input, &data)?;

    let cues = export::extract_cues(&draft);
    if cues.is_empty() {
        warn!("Draft '{}' has no subtitles.", input);
    }
    write_output(output, serialiser::srt_to_string(&cues).as_bytes())?;

    info!("Exported {} subtitles from '{}'", cues.len(), input);
    Ok(())
}

fn shift(input: &str, output: &str, gap: i64, format: Format) -> Result<()> {
    let data = read_input(input)?;

    let shifted = match format {
        Format::Srt => processor::shift_srt(&data, gap)
            .context(format!("Failed to shift subtitles: '{}'", input))?
            .into_bytes(),
        Format::Draft => {
            let mut draft: serde_json::Value = decode_draft(input, &data)?;
            processor::shift_draft(&mut draft, gap)
                .context(format!("Failed to shift draft: '{}'", input))?;
            encode_draft(output, &draft)?
        }
    };
    write_output(output, &shifted)?;

    info!("Shifted '{}' by {}s per subtitle into '{}'", input, gap, output);
    Ok(())
}

fn replace(input: &str, output: &str, table: &str, format: Format) -> Result<()> {
    let config = read_input(table).context("Failed to load replacement table.")?;
    let replacer = Replacer::from_json(&config)
        .context(format!("Invalid replacement table: '{}'", table))?;

    let data = read_input(input)?;
    let replaced = match format {
        Format::Srt => replacer.replace(&data).into_bytes(),
        Format::Draft => {
            let mut draft: serde_json::Value = decode_draft(input, &data)?;
            let changed = replacer.replace_draft(&mut draft);
            info!("Rewrote {} subtitle texts", changed);
            encode_draft(output, &draft)?
        }
    };
    write_output(output, &replaced)?;

    info!("Text replacement in '{}' completed successfully", input);
    Ok(())
}

fn decode_draft<T: serde::de::DeserializeOwned>(path: &str, data: &str) -> Result<T, DraftError> {
    serde_json::from_str(data).map_err(|source| DraftError::Json {
        path: path.into(),
        source,
    })
}

fn encode_draft(path: &str, draft: &serde_json::Value) -> Result<Vec<u8>, DraftError> {
    serde_json::to_vec(draft).map_err(|source| DraftError::Json {
        path: path.into(),
        source,
    })
}
