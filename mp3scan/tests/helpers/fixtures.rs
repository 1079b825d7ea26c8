//! MP3 fixture files
//!
//! The payload is filler, not decodable audio; the tag readers only look at
//! the ID3v2 header and the ID3v1 trailer.

use std::fs;
use std::path::{Path, PathBuf};

/// Tag values written into a fixture
#[derive(Debug, Clone, Copy, Default)]
pub struct TagFixture<'a> {
    pub title: &'a str,
    pub artist: &'a str,
    pub album: &'a str,
    pub year: &'a str,
}

impl<'a> TagFixture<'a> {
    pub fn new(title: &'a str, artist: &'a str, album: &'a str, year: &'a str) -> Self {
        Self {
            title,
            artist,
            album,
            year,
        }
    }
}

fn payload() -> Vec<u8> {
    vec![0xFF; 1024]
}

fn id3v1_trailer(tags: &TagFixture<'_>) -> Vec<u8> {
    fn padded(text: &str, width: usize) -> Vec<u8> {
        let mut bytes = text.as_bytes().to_vec();
        bytes.resize(width, 0);
        bytes
    }

    let mut tag = b"TAG".to_vec();
    tag.extend(padded(tags.title, 30));
    tag.extend(padded(tags.artist, 30));
    tag.extend(padded(tags.album, 30));
    tag.extend(padded(tags.year, 4));
    tag.extend(padded("", 30));
    tag.push(255);
    tag
}

fn write_id3v2(path: &Path, tags: &TagFixture<'_>) {
    use id3::TagLike;

    let mut tag = id3::Tag::new();
    if !tags.title.is_empty() {
        tag.set_title(tags.title);
    }
    if !tags.artist.is_empty() {
        tag.set_artist(tags.artist);
    }
    if !tags.album.is_empty() {
        tag.set_album(tags.album);
    }
    if let Ok(year) = tags.year.parse::<i32>() {
        tag.set_year(year);
    }
    tag.write_to_path(path, id3::Version::Id3v23).unwrap();
}

fn target(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    path
}

/// File without any tag
pub fn write_untagged(dir: &Path, name: &str) -> PathBuf {
    let path = target(dir, name);
    fs::write(&path, payload()).unwrap();
    path
}

/// File with an ID3v1 trailer only
pub fn write_v1(dir: &Path, name: &str, tags: TagFixture<'_>) -> PathBuf {
    let path = target(dir, name);
    let mut bytes = payload();
    bytes.extend(id3v1_trailer(&tags));
    fs::write(&path, bytes).unwrap();
    path
}

/// File with an ID3v2 header only
pub fn write_v2(dir: &Path, name: &str, tags: TagFixture<'_>) -> PathBuf {
    let path = write_untagged(dir, name);
    write_id3v2(&path, &tags);
    path
}

/// File with both standards
pub fn write_v1_v2(dir: &Path, name: &str, v1: TagFixture<'_>, v2: TagFixture<'_>) -> PathBuf {
    let path = write_v1(dir, name, v1);
    write_id3v2(&path, &v2);
    path
}
