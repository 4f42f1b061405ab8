//! rekordbox XML parser
//!
//! - DJ_PLAYLISTS > COLLECTION > TRACK[TrackID, Name, Artist]
//! - DJ_PLAYLISTS > PLAYLISTS > ... > NODE[Type=1, Name] > TRACK[Key]
//!
//! Folder nodes are `Type="0"` and only group other nodes.

use roxmltree::{Document, Node};
use tracing::debug;

use crate::archive::{Archive, ArchiveTrack, Collection, Playlist, PlaylistTrack};
use crate::parsers::Parser;
use crate::reader::{self, attribute_or_empty, Step};

const ROOT: &str = "DJ_PLAYLISTS";
const PLAYLIST_NODE_TYPE: &str = "1";

const COLLECTION_TRACKS: [Step<'static>; 3] = [
    Step::child(ROOT),
    Step::child("COLLECTION"),
    Step::child("TRACK"),
];

const PLAYLIST_NODES: [Step<'static>; 3] = [
    Step::child(ROOT),
    Step::child("PLAYLISTS"),
    Step::descendant("NODE").with_attribute("Type", PLAYLIST_NODE_TYPE),
];

const PLAYLIST_TRACKS: [Step<'static>; 1] = [Step::child("TRACK")];

pub struct RekordboxXmlParser<'a> {
    document: Option<Document<'a>>,
}

impl<'a> Parser<'a> for RekordboxXmlParser<'a> {
    const FORMAT: &'static str = "RekordBox";
    const EXTENSIONS: &'static [&'static str] = &[".xml"];

    fn new(contents: &'a str) -> Self {
        Self {
            document: reader::parse_document(contents).ok(),
        }
    }

    /// Well-formed XML containing a DJ_PLAYLISTS element
    fn supports(&self) -> bool {
        self.document.as_ref().is_some_and(|doc| {
            doc.descendants()
                .any(|n| n.is_element() && n.tag_name().name() == ROOT)
        })
    }

    fn parse(&self) -> Option<Archive> {
        let doc = self.document.as_ref()?;
        if doc.root_element().tag_name().name() != ROOT {
            debug!("DJ_PLAYLISTS element is not the document root");
            return None;
        }

        let mut archive = Archive::new(Self::FORMAT);
        archive.collection = parse_collection(doc);
        archive.playlists = reader::select(doc.root(), &PLAYLIST_NODES)
            .into_iter()
            .map(parse_playlist)
            .collect();

        debug!(
            "Parsed {} collection tracks and {} playlists",
            archive.collection.len(),
            archive.playlists.len()
        );
        Some(archive)
    }
}

fn parse_collection(doc: &Document) -> Collection {
    reader::select(doc.root(), &COLLECTION_TRACKS)
        .into_iter()
        .map(|track| {
            ArchiveTrack::new(
                attribute_or_empty(track, "TrackID"),
                attribute_or_empty(track, "Name"),
                attribute_or_empty(track, "Artist"),
            )
        })
        .collect()
}

fn parse_playlist(node: Node) -> Playlist {
    let mut playlist = Playlist::new(attribute_or_empty(node, "Name"));
    playlist.tracks = reader::select(node, &PLAYLIST_TRACKS)
        .into_iter()
        .map(|track| PlaylistTrack::new(attribute_or_empty(track, "Key")))
        .collect();
    playlist
}
