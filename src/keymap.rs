//! Pad key layout: letter keys bound to clips in row-major QWERTY order.
//!
//! Clips are addressed by their position in the store; the first ten map to
//! the `qwertyuiop` row, the next nine to `asdfghjkl`, the last seven to
//! `zxcvbnm`. The same mapping drives both the player's pad triggering and
//! the `clips` listing, so the key printed next to a clip is the key that
//! fires it.

use crate::constants::KEY_ROWS;

/// Number of bindable pads (26 with the standard rows).
pub fn pad_count() -> usize {
    KEY_ROWS.iter().map(|row| row.chars().count()).sum()
}

/// Pad index for a key, case-insensitive. `None` for non-pad keys.
pub fn pad_index(key: char) -> Option<usize> {
    let key = key.to_ascii_lowercase();
    KEY_ROWS
        .iter()
        .flat_map(|row| row.chars())
        .position(|c| c == key)
}

/// Key bound to a pad index. `None` when the index is past the last row.
pub fn pad_key(index: usize) -> Option<char> {
    KEY_ROWS.iter().flat_map(|row| row.chars()).nth(index)
}
