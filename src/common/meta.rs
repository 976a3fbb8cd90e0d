use std::path;
use crate::common;

use audiotags;

/// The tag fields needed to shelve one episode file. The disc number is
/// the season and the track number is the episode; either defaults to
/// zero when the file doesn't carry it.
#[derive(Debug, Default)]
pub struct TrackMeta {
    pub title : String,
    pub album : String,
    pub track_number : u16,
    pub disc_number : u16,
}

/// Reads the embedded tags of `file_path`. This is the only place the
/// decoder is named, so swapping it out touches nothing else.
pub fn parse(file_path : &path::Path) -> common::Result<TrackMeta> {
    let tag = audiotags::Tag::new().read_from_path(file_path)?;
    Ok(TrackMeta {
        title : tag.title().unwrap_or_default().to_string(),
        album : tag.album_title().unwrap_or_default().to_string(),
        track_number : tag.track_number().unwrap_or(0),
        disc_number : tag.disc_number().unwrap_or(0),
    })
}
