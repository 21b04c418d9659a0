/// Text shown in the info block for one marker.
#[derive(Clone, Copy, Debug)]
pub struct TrackInfo<'a> {
    pub title: &'a str,
    pub ordinal: u32,
    pub category: &'a str,
}

/// Lines of the info block, one `<div>` each; `None` renders the neutral
/// placeholder. Set as text content, never parsed as markup.
pub fn info_lines(track: Option<TrackInfo<'_>>, total: u32) -> [String; 3] {
    match track {
        Some(t) => [
            format!("Track: {}", t.title),
            format!("No: {:02}/{}", t.ordinal, total),
            format!("Genre: {}", t.category),
        ],
        None => [
            "Track: No track selected".to_string(),
            format!("No: 00/{}", total),
            "Genre: No track selected".to_string(),
        ],
    }
}
