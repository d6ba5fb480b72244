use crate::map::{HitObject, HitSound, MapFile};
use crate::parsing::lane::LanePicker;
use log::{debug, warn};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str;

#[derive(Debug)]
pub enum ParseError {
    Io(io::Error),
    AudioNotFound { name: String, dir: PathBuf },
    UnsupportedMode(i8),
    MissingAudio,
}

/// Why a line inside a recognized section was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Key/value line with no `:` separator.
    MissingSeparator,
    /// An integer field failed to parse.
    BadInteger(String),
    /// A floating-point field failed to parse.
    BadFloat(String),
    /// Hit object record with fewer fields than required.
    ShortRecord(usize),
}

/// One dropped line, with its 1-based source line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineSkip {
    pub line: usize,
    pub reason: SkipReason,
}

/// A successfully parsed beatmap plus the lines that were dropped on the way.
#[derive(Debug)]
pub struct ParsedBeatmap {
    pub map: MapFile,
    pub skipped: Vec<LineSkip>,
}

/// Section currently being consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    General,
    Metadata,
    Difficulty,
    HitObjects,
}

impl Section {
    /// Dispatches a header line. Unrecognized headers fall back to `None`,
    /// which ignores the section body until the next header.
    fn from_header(line: &str) -> Section {
        match line {
            "[General]" => Section::General,
            "[Metadata]" => Section::Metadata,
            "[Difficulty]" => Section::Difficulty,
            "[HitObjects]" => Section::HitObjects,
            _ => Section::None,
        }
    }
}

/// Verdict for one line handed to a section handler.
enum LineVerdict {
    Handled,
    Skipped(SkipReason),
}

/// Parses one beatmap file, resolving file references against its directory.
pub fn parse_beatmap(path: &Path, lanes: &mut dyn LanePicker) -> Result<ParsedBeatmap, ParseError> {
    debug!("Parsing beatmap: {:?}", path);
    let dir = path.parent().ok_or_else(|| {
        ParseError::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            "beatmap path has no parent directory",
        ))
    })?;

    let bytes = fs::read(path)?;
    match str::from_utf8(&bytes) {
        Ok(content) => parse_beatmap_content(content, dir, lanes),
        Err(e) => {
            warn!("UTF-8 decoding failed for {:?}, trying latin1: {}", path, e);
            let latin1: String = bytes.iter().map(|&b| b as char).collect();
            parse_beatmap_content(&latin1, dir, lanes)
        }
    }
}

/// Parses beatmap text. `dir` is the directory the beatmap lives in, used to
/// resolve the audio file reference.
///
/// Malformed lines are dropped with a logged reason; the whole map is
/// rejected only for an unresolvable or missing audio reference or an
/// unsupported game mode.
pub fn parse_beatmap_content(
    content: &str,
    dir: &Path,
    lanes: &mut dyn LanePicker,
) -> Result<ParsedBeatmap, ParseError> {
    let mut map = MapFile::new();
    let mut skipped = Vec::new();
    let mut section = Section::None;
    let mut objects: Vec<HitObject> = Vec::new();

    for (index, raw_line) in content.lines().enumerate() {
        let line = raw_line.trim();
        if !is_valid_line(line) {
            continue;
        }
        if line.starts_with('[') {
            // A new header ends the current section.
            if section == Section::HitObjects {
                map.objects = std::mem::take(&mut objects);
            }
            section = Section::from_header(line);
            continue;
        }

        let verdict = match section {
            Section::None => LineVerdict::Handled,
            Section::General => general_line(line, dir, &mut map)?,
            Section::Metadata => metadata_line(line, &mut map),
            Section::Difficulty => difficulty_line(line, &mut map),
            Section::HitObjects => match parse_hit_object(line, lanes) {
                Ok(object) => {
                    objects.push(object);
                    LineVerdict::Handled
                }
                Err(reason) => LineVerdict::Skipped(reason),
            },
        };

        if let LineVerdict::Skipped(reason) = verdict {
            warn!("Skipping line {}: {} ('{}')", index + 1, reason, line);
            skipped.push(LineSkip { line: index + 1, reason });
        }
    }
    if section == Section::HitObjects {
        map.objects = std::mem::take(&mut objects);
    }

    // A map is only valid with a resolved audio reference.
    if map.audio.is_none() {
        return Err(ParseError::MissingAudio);
    }
    Ok(ParsedBeatmap { map, skipped })
}

/// Returns false for lines too short to carry data or commented out.
fn is_valid_line(line: &str) -> bool {
    line.len() > 1 && !line.starts_with("//")
}

/// Splits a key/value line at the first `:` into trimmed halves.
fn tokenize(line: &str) -> Option<(&str, &str)> {
    line.split_once(':').map(|(key, value)| (key.trim(), value.trim()))
}

fn general_line(line: &str, dir: &Path, map: &mut MapFile) -> Result<LineVerdict, ParseError> {
    let Some((key, value)) = tokenize(line) else {
        return Ok(LineVerdict::Skipped(SkipReason::MissingSeparator));
    };
    match key {
        "AudioFilename" => map.audio = Some(resolve_audio_file(dir, value)?),
        "Mode" => match value.parse::<i8>() {
            // Only the default osu! mode maps onto the Windsong playfield.
            Ok(0) => {}
            Ok(mode) => return Err(ParseError::UnsupportedMode(mode)),
            Err(_) => {
                return Ok(LineVerdict::Skipped(SkipReason::BadInteger(value.to_string())));
            }
        },
        _ => {}
    }
    Ok(LineVerdict::Handled)
}

fn metadata_line(line: &str, map: &mut MapFile) -> LineVerdict {
    let Some((key, value)) = tokenize(line) else {
        return LineVerdict::Skipped(SkipReason::MissingSeparator);
    };
    match key {
        "Title" => map.title = value.to_string(),
        "Artist" => map.artist = value.to_string(),
        "Creator" => map.creator = value.to_string(),
        _ => {}
    }
    LineVerdict::Handled
}

fn difficulty_line(line: &str, map: &mut MapFile) -> LineVerdict {
    let Some((key, value)) = tokenize(line) else {
        return LineVerdict::Skipped(SkipReason::MissingSeparator);
    };
    if key == "OverallDifficulty" {
        match value.parse::<f32>() {
            Ok(od) => map.difficulty = od.round() as i32,
            Err(_) => return LineVerdict::Skipped(SkipReason::BadFloat(value.to_string())),
        }
    }
    LineVerdict::Handled
}

/// Parses one osu! hit object record. Only the start time (field 2) and the
/// hit sound selector (field 4) are consumed; the lane comes from the picker.
fn parse_hit_object(line: &str, lanes: &mut dyn LanePicker) -> Result<HitObject, SkipReason> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() < 5 {
        return Err(SkipReason::ShortRecord(fields.len()));
    }
    let time = fields[2]
        .parse::<i32>()
        .map_err(|_| SkipReason::BadInteger(fields[2].to_string()))?;
    let sound = match fields[4]
        .parse::<i32>()
        .map_err(|_| SkipReason::BadInteger(fields[4].to_string()))?
    {
        0 => HitSound::Normal,
        _ => HitSound::Clap,
    };
    Ok(HitObject { time, lane: lanes.pick(), sound })
}

/// Resolves an `AudioFilename` value against the beatmap's directory: exact
/// name first, then a case-insensitive scan of the directory entries. The
/// returned string is the actual on-disk file name.
fn resolve_audio_file(dir: &Path, name: &str) -> Result<String, ParseError> {
    let exact = dir.join(name);
    if exact.is_file() {
        return Ok(exact
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| name.to_string()));
    }

    let wanted = name.to_lowercase();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let entry_name = entry.file_name().to_string_lossy().into_owned();
        if entry_name.to_lowercase() == wanted {
            return Ok(entry_name);
        }
    }

    warn!("Audio file '{}' not found in directory {:?}", name, dir);
    Err(ParseError::AudioNotFound { name: name.to_string(), dir: dir.to_path_buf() })
}

impl From<io::Error> for ParseError {
    fn from(err: io::Error) -> Self {
        ParseError::Io(err)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Io(e) => write!(f, "IO error: {}", e),
            ParseError::AudioNotFound { name, dir } => {
                write!(f, "audio file '{}' not found in directory {:?}", name, dir)
            }
            ParseError::UnsupportedMode(mode) => write!(f, "unsupported game mode {}", mode),
            ParseError::MissingAudio => write!(f, "no audio file reference"),
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingSeparator => write!(f, "no ':' separator"),
            SkipReason::BadInteger(value) => write!(f, "invalid integer '{}'", value),
            SkipReason::BadFloat(value) => write!(f, "invalid number '{}'", value),
            SkipReason::ShortRecord(count) => {
                write!(f, "hit object has {} fields, expected at least 5", count)
            }
        }
    }
}
