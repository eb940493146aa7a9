use heapless::Vec;

use crate::pattern::PatternId;

/// Maximum number of entries in a rotation
pub const MAX_PLAYLIST_LEN: usize = 8;

/// Fixed rotation of patterns played by the scheduler
///
/// N is the number of entries the playlist can hold
#[derive(Debug, Clone, Default)]
pub struct Playlist<const N: usize> {
    inner: Vec<PatternId, N>,
    cursor: usize,
}

impl<const N: usize> Playlist<N> {
    pub const fn new() -> Self {
        Self {
            inner: Vec::new(),
            cursor: 0,
        }
    }

    /// Build a playlist from a slice of ids
    ///
    /// Returns the first id that does not fit
    pub fn from_slice(ids: &[PatternId]) -> Result<Self, PatternId> {
        let mut playlist = Self::new();
        for &id in ids {
            playlist.push(id)?;
        }
        Ok(playlist)
    }

    /// Append a pattern to the rotation
    ///
    /// Returns the id if the playlist is full
    pub fn push(&mut self, id: PatternId) -> Result<(), PatternId> {
        self.inner.push(id)
    }

    /// Pattern at the cursor
    ///
    /// Returns None if the playlist is empty
    pub fn current(&self) -> Option<PatternId> {
        self.inner.get(self.cursor).copied()
    }

    /// Move the cursor to the next pattern, wrapping around
    ///
    /// Returns true when the rotation wrapped back to its first entry
    pub fn advance(&mut self) -> bool {
        if self.inner.is_empty() {
            return false;
        }
        self.cursor += 1;
        if self.cursor >= self.inner.len() {
            self.cursor = 0;
            return true;
        }
        false
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn as_slice(&self) -> &[PatternId] {
        &self.inner
    }
}
