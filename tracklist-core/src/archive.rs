//! Canonical archive model
//!
//! Every parser produces the same shape: an [`Archive`] holding a
//! deduplicated [`Collection`] and ordered [`Playlist`]s whose tracks refer
//! back into the collection by key.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::time::{self, PlayedDate, PlayedTime};

/// One known track in a collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveTrack {
    /// Unique within the owning collection
    pub key: String,
    /// Empty when the source has no title
    pub title: String,
    /// Empty when the source has no artist
    pub artist: String,
}

impl ArchiveTrack {
    pub fn new(key: impl Into<String>, title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            artist: artist.into(),
        }
    }
}

/// Tracks of an archive keyed by [`ArchiveTrack::key`]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Collection {
    tracks: HashMap<String, ArchiveTrack>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a track, replacing any previous track with the same key
    pub fn insert(&mut self, track: ArchiveTrack) -> Option<ArchiveTrack> {
        self.tracks.insert(track.key.clone(), track)
    }

    pub fn get(&self, key: &str) -> Option<&ArchiveTrack> {
        self.tracks.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut ArchiveTrack> {
        self.tracks.get_mut(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.tracks.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Iterate in no particular order
    pub fn iter(&self) -> impl Iterator<Item = &ArchiveTrack> {
        self.tracks.values()
    }
}

impl FromIterator<ArchiveTrack> for Collection {
    fn from_iter<I: IntoIterator<Item = ArchiveTrack>>(iter: I) -> Self {
        let mut collection = Collection::new();
        for track in iter {
            collection.insert(track);
        }
        collection
    }
}

/// One entry of a playlist
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaylistTrack {
    /// Collection key; the entry itself is resolved with [`Archive::entry`]
    pub key: String,
    /// False for tracks only pre-listened on a headphone cue
    pub played_public: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<PlayedTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<PlayedDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_instant: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_offset_seconds: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_offset_string: Option<String>,
}

impl PlaylistTrack {
    /// A publicly played entry without timing data
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            played_public: true,
            start_time: None,
            start_date: None,
            start_instant: None,
            time_offset_seconds: None,
            time_offset_string: None,
        }
    }
}

/// How a playlist behaves when filtered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum PlaylistKind {
    /// Plain ordered list
    #[default]
    Plain,
    /// Recorded set whose tracks carry start instants; offsets are
    /// recomputed from the first remaining track after every filter
    LiveSet,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Playlist {
    pub name: String,
    pub tracks: Vec<PlaylistTrack>,
    #[serde(skip)]
    kind: PlaylistKind,
}

impl Playlist {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_kind(name, PlaylistKind::Plain)
    }

    pub fn with_kind(name: impl Into<String>, kind: PlaylistKind) -> Self {
        Self {
            name: name.into(),
            tracks: Vec::new(),
            kind,
        }
    }

    pub fn kind(&self) -> PlaylistKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Derive a new playlist starting at `start_index` (zero-based),
    /// optionally keeping only publicly played tracks.
    pub fn filter(&self, start_index: usize, only_public: bool) -> Playlist {
        let tracks = self
            .tracks
            .iter()
            .skip(start_index)
            .filter(|track| !only_public || track.played_public)
            .cloned()
            .collect();

        let mut result = Playlist {
            name: self.name.clone(),
            tracks,
            kind: self.kind,
        };
        if result.kind == PlaylistKind::LiveSet {
            time::compute_offsets(&mut result.tracks);
        }
        result
    }
}

/// Result of one successful parse
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Archive {
    pub collection: Collection,
    pub playlists: Vec<Playlist>,
    /// Display label of the source format
    pub format: &'static str,
}

impl Archive {
    pub fn new(format: &'static str) -> Self {
        Self {
            collection: Collection::new(),
            playlists: Vec::new(),
            format,
        }
    }

    /// Resolve a playlist entry against the collection.
    ///
    /// `None` when the source referenced a key it never declared.
    pub fn entry(&self, track: &PlaylistTrack) -> Option<&ArchiveTrack> {
        self.collection.get(&track.key)
    }
}

/// Key for sources that carry no track identifier.
///
/// Random, so two parses of the same file produce different keys.
pub(crate) fn generated_key() -> String {
    format!("{:016x}", rand::random::<u64>())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_playlist() -> Playlist {
        let mut playlist = Playlist::new("Rezidence 22");
        for (key, public) in [("1", true), ("2", false), ("3", true), ("4", true)] {
            let mut track = PlaylistTrack::new(key);
            track.played_public = public;
            playlist.tracks.push(track);
        }
        playlist
    }

    fn keys(playlist: &Playlist) -> Vec<&str> {
        playlist.tracks.iter().map(|t| t.key.as_str()).collect()
    }

    #[test]
    fn test_collection_last_write_wins() {
        let mut collection = Collection::new();
        assert!(collection.insert(ArchiveTrack::new("01", "First", "")).is_none());
        let replaced = collection.insert(ArchiveTrack::new("01", "Second", "Artist"));

        assert_eq!(replaced.unwrap().title, "First");
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.get("01").unwrap().title, "Second");
    }

    #[test]
    fn test_collection_lookup_and_iteration() {
        let collection: Collection = [
            ArchiveTrack::new("01", "Channel", "Nile Delta"),
            ArchiveTrack::new("02", "Westcoast Boogie", "Bronx Cheer"),
        ]
        .into_iter()
        .collect();

        assert!(collection.contains_key("01"));
        assert!(!collection.contains_key("03"));

        let mut titles: Vec<_> = collection.iter().map(|t| t.title.as_str()).collect();
        titles.sort();
        assert_eq!(titles, ["Channel", "Westcoast Boogie"]);
    }

    #[test]
    fn test_filter_identity() {
        let playlist = make_playlist();
        let filtered = playlist.filter(0, false);
        assert_eq!(filtered, playlist);
    }

    #[test]
    fn test_filter_start_index() {
        let playlist = make_playlist();
        for n in 0..6 {
            let filtered = playlist.filter(n, false);
            assert_eq!(filtered.len(), playlist.len().saturating_sub(n));
        }
        assert_eq!(keys(&playlist.filter(2, false)), ["3", "4"]);
    }

    #[test]
    fn test_filter_only_public() {
        let playlist = make_playlist();
        assert_eq!(keys(&playlist.filter(0, true)), ["1", "3", "4"]);
        assert_eq!(keys(&playlist.filter(1, true)), ["3", "4"]);
        // original is untouched
        assert_eq!(playlist.len(), 4);
    }

    #[test]
    fn test_filter_keeps_name_and_kind() {
        let playlist = Playlist::with_kind("History", PlaylistKind::LiveSet);
        let filtered = playlist.filter(3, true);
        assert_eq!(filtered.name, "History");
        assert_eq!(filtered.kind(), PlaylistKind::LiveSet);
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_filter_plain_playlist_leaves_offsets() {
        let mut playlist = make_playlist();
        playlist.tracks[1].time_offset_string = Some("01:00".into());
        let filtered = playlist.filter(1, false);
        assert_eq!(filtered.tracks[0].time_offset_string.as_deref(), Some("01:00"));
    }

    #[test]
    fn test_archive_entry_missing_reference() {
        let mut archive = Archive::new("Test");
        archive.collection.insert(ArchiveTrack::new("1", "Channel", "Nile Delta"));

        assert_eq!(archive.entry(&PlaylistTrack::new("1")).unwrap().title, "Channel");
        assert!(archive.entry(&PlaylistTrack::new("2")).is_none());
    }

    #[test]
    fn test_generated_keys_differ() {
        assert_ne!(generated_key(), generated_key());
    }
}
