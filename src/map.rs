use crate::config;
use std::fmt;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Hit sound cue carried by a converted hit object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitSound {
    Normal = 0,
    Clap = 1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitObject {
    /// Start time in milliseconds.
    pub time: i32,
    /// Lane on the 9-lane playfield, 0..=8.
    pub lane: u8,
    pub sound: HitSound,
}

impl fmt::Display for HitObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.time, self.lane, self.sound as u8)
    }
}

/// Accumulator for one converted beatmap.
///
/// Everything except the audio reference has a safe default; a map without a
/// resolved audio file is never written out.
#[derive(Debug, Clone)]
pub struct MapFile {
    /// On-disk file name of the associated audio asset, once resolved.
    pub audio: Option<String>,
    pub title: String,
    pub artist: String,
    pub creator: String,
    pub difficulty: i32,
    /// Hit objects in source order.
    pub objects: Vec<HitObject>,
}

impl MapFile {
    /// Creates an empty map: no audio reference, empty text fields,
    /// difficulty 1, no hit objects.
    pub fn new() -> Self {
        MapFile {
            audio: None,
            title: String::new(),
            artist: String::new(),
            creator: String::new(),
            difficulty: config::DEFAULT_DIFFICULTY,
            objects: Vec::new(),
        }
    }

    /// Writes the map in the Windsong text format.
    ///
    /// Refuses maps whose audio reference was never resolved.
    pub fn write(&self, path: &Path) -> io::Result<()> {
        let audio = self.audio.as_deref().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "map has no audio reference")
        })?;

        let file = fs::File::create(path)?;
        let mut out = BufWriter::new(file);
        writeln!(out, "[Metadata]")?;
        writeln!(out, "AudioFilename: {}", audio)?;
        writeln!(out, "Title: {}", self.title)?;
        writeln!(out, "Artist: {}", self.artist)?;
        writeln!(out, "Creator: {}", self.creator)?;
        writeln!(out, "Difficulty: {}", self.difficulty)?;
        writeln!(out)?;
        writeln!(out, "[HitObjects]")?;
        for object in &self.objects {
            writeln!(out, "{}", object)?;
        }
        out.flush()
    }
}
