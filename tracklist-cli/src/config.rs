//! CLI configuration

use std::path::PathBuf;

/// Which playlist of the archive to print
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaylistSelector {
    /// 1-based position in the export
    Index(usize),
    /// Exact playlist name
    Name(String),
}

impl PlaylistSelector {
    /// Numbers select by position, anything else by name
    pub fn parse(value: &str) -> Self {
        match value.trim().parse::<usize>() {
            Ok(index) => PlaylistSelector::Index(index),
            Err(_) => PlaylistSelector::Name(value.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// One rendered line per track
    #[default]
    Text,
    /// Filtered playlists with resolved collection entries
    Json,
    /// Playlist names only
    List,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Export file to read
    pub input: PathBuf,
    /// All playlists when unset
    pub playlist: Option<PlaylistSelector>,
    /// 1-based first track to print
    pub start_track: usize,
    /// Skip tracks only pre-listened on headphones
    pub only_public: bool,
    pub template: String,
    pub output: OutputMode,
}

impl Config {
    /// Zero-based start for [`tracklist_core::Playlist::filter`]
    pub fn start_index(&self) -> usize {
        self.start_track.saturating_sub(1)
    }
}
