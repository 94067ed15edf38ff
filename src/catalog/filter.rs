use crate::song_store::Song;

/// Optional filters applied to a page of songs after it has been fetched.
///
/// `group` and `title` match case-sensitive substrings, `release_date` must
/// match exactly. Empty strings are treated as absent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SongFilter {
    pub group: Option<String>,
    pub title: Option<String>,
    pub release_date: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl SongFilter {
    pub fn is_empty(&self) -> bool {
        non_empty(&self.group).is_none()
            && non_empty(&self.title).is_none()
            && non_empty(&self.release_date).is_none()
    }

    pub fn matches(&self, song: &Song) -> bool {
        if let Some(group) = non_empty(&self.group) {
            if !song.group.contains(group) {
                return false;
            }
        }
        if let Some(title) = non_empty(&self.title) {
            if !song.title.contains(title) {
                return false;
            }
        }
        if let Some(release_date) = non_empty(&self.release_date) {
            if song.release_date != release_date {
                return false;
            }
        }
        true
    }

    /// Keeps the songs that match, preserving order.
    pub fn apply(&self, songs: Vec<Song>) -> Vec<Song> {
        if self.is_empty() {
            return songs;
        }
        songs.into_iter().filter(|s| self.matches(s)).collect()
    }
}
