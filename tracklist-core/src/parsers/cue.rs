//! CUE sheet parser
//!
//! A cue sheet is read one command per line through a forward-only state
//! machine:
//!
//! ```text
//! Header --FILE--> Playlist --TRACK--> Track --TRACK--> Track ...
//! ```
//!
//! The disc-level TITLE and PERFORMER seen in `Header` name the single
//! playlist created on the first FILE. Every TRACK adds one collection
//! entry, which the TITLE and PERFORMER commands that follow fill in.
//!
//! See <https://wiki.hydrogenaud.io/index.php?title=Cue_sheet>

use tracing::trace;

use crate::archive::{self, Archive, ArchiveTrack, Playlist, PlaylistTrack};
use crate::parsers::Parser;
use crate::reader;

const FORMAT: &str = "CUE";
/// rekordbox starts every sheet with this, other writers need not
const MARKER: &str = "REM DATE ";
const QUOTE: char = '"';
const NAME_SEPARATOR: &str = " - ";

/// One line of a cue sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command<'l> {
    line: &'l str,
    name: String,
    rest: &'l str,
}

impl<'l> Command<'l> {
    pub fn new(line: &'l str) -> Self {
        let line = line.trim();
        let (token, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let name = if !token.is_empty() && token.chars().all(is_word) {
            token.to_uppercase()
        } else {
            String::new()
        };

        Self { line, name, rest }
    }

    /// Upper-cased command word, empty if the line has none
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Text parameter of `TITLE`, `PERFORMER` and friends.
    ///
    /// A quoted value runs to the last quote on the line, dropping any
    /// trailing `WAVE`-style suffix. Otherwise the whole remainder is the
    /// value, quotes included.
    pub fn string_param(&self) -> Option<&'l str> {
        if self.name.is_empty() {
            return None;
        }
        if let Some(quoted) = self.rest.strip_prefix(QUOTE) {
            if let Some(end) = quoted.rfind(QUOTE) {
                return Some(&quoted[..end]);
            }
        }

        let rest = self.rest.trim_start();
        (!rest.is_empty()).then_some(rest)
    }

    /// Space separated word `index`, the command itself being word 0
    pub fn param(&self, index: usize) -> Option<&'l str> {
        self.line.split(' ').nth(index)
    }
}

fn is_word(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum CueState {
    Header {
        title: Option<String>,
        performer: Option<String>,
    },
    Playlist,
    Track {
        key: String,
    },
}

impl CueState {
    fn step(self, archive: &mut Archive, command: &Command) -> CueState {
        match (self, command.name()) {
            (CueState::Header { performer, .. }, "TITLE") => CueState::Header {
                title: command.string_param().map(str::to_string),
                performer,
            },
            (CueState::Header { title, .. }, "PERFORMER") => CueState::Header {
                title,
                performer: command.string_param().map(str::to_string),
            },
            (CueState::Header { title, performer }, "FILE") => {
                let name = [title, performer]
                    .into_iter()
                    .flatten()
                    .filter(|field| !field.is_empty())
                    .collect::<Vec<_>>()
                    .join(NAME_SEPARATOR);
                trace!("Playlist '{}'", name);
                archive.playlists.push(Playlist::new(name));
                CueState::Playlist
            }
            (CueState::Playlist | CueState::Track { .. }, "TRACK") => enter_track(archive, command),
            (CueState::Track { key }, "TITLE") => {
                if let Some(track) = archive.collection.get_mut(&key) {
                    track.title = command.string_param().unwrap_or("").to_string();
                }
                CueState::Track { key }
            }
            (CueState::Track { key }, "PERFORMER") => {
                if let Some(track) = archive.collection.get_mut(&key) {
                    track.artist = command.string_param().unwrap_or("").to_string();
                }
                CueState::Track { key }
            }
            (state, _) => state,
        }
    }
}

/// Add an empty track for `TRACK <id> ...` to the collection and playlist
fn enter_track(archive: &mut Archive, command: &Command) -> CueState {
    let key = command
        .param(1)
        .filter(|id| !id.is_empty())
        .map_or_else(archive::generated_key, str::to_string);
    trace!("Track '{}'", key);

    if let Some(playlist) = archive.playlists.last_mut() {
        playlist.tracks.push(PlaylistTrack::new(key.as_str()));
    }
    archive.collection.insert(ArchiveTrack::new(key.as_str(), "", ""));
    CueState::Track { key }
}

/// Commands of `contents` in file order, blank lines skipped
pub fn commands(contents: &str) -> impl Iterator<Item = Command<'_>> {
    reader::lines(contents).map(Command::new)
}

/// Run the state machine over a whole sheet.
///
/// Never fails: a sheet without FILE has no playlists.
pub fn parse_cue(contents: &str) -> Archive {
    let mut archive = Archive::new(FORMAT);
    let mut state = CueState::Header {
        title: None,
        performer: None,
    };

    for command in commands(contents) {
        trace!("{:?} <- {}", state, command.line);
        state = state.step(&mut archive, &command);
    }

    archive
}

pub struct CueParser<'a> {
    contents: &'a str,
}

impl<'a> Parser<'a> for CueParser<'a> {
    const FORMAT: &'static str = FORMAT;
    const EXTENSIONS: &'static [&'static str] = &[".cue"];

    fn new(contents: &'a str) -> Self {
        Self { contents }
    }

    fn supports(&self) -> bool {
        self.contents.trim_start().starts_with(MARKER)
    }

    fn parse(&self) -> Option<Archive> {
        self.supports().then(|| parse_cue(self.contents))
    }
}
