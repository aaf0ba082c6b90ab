//! Deterministic colors for clip tags.
//!
//! Every tag maps to a stable RGB color derived from an md5 digest of the tag
//! text, so the same tag looks the same across sessions, presets, and the two
//! rendering surfaces (CLI listings and the terminal player). Each channel is
//! folded into the 120-255 band, which keeps tag chips readable on dark
//! backgrounds. Results are memoized process-wide; repeated lookups are map
//! hits.

use std::collections::HashMap;
use std::sync::{LazyLock, Mutex};

/// Lowest channel value a tag color may have. Channels span
/// `LUMINANCE_FLOOR..=255`.
pub const LUMINANCE_FLOOR: u8 = 120;

static TAG_COLORS: LazyLock<Mutex<HashMap<String, TagColor>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

/// An RGB color assigned to a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl TagColor {
    /// Render as a lowercase `#rrggbb` code.
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Map a tag to its color, computing and caching it on first use.
pub fn color_for_tag(tag: &str) -> TagColor {
    let mut cache = match TAG_COLORS.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    if let Some(color) = cache.get(tag) {
        return *color;
    }

    let digest = md5::compute(tag.as_bytes());
    let color = TagColor {
        r: fold_channel(digest[0]),
        g: fold_channel(digest[1]),
        b: fold_channel(digest[2]),
    };
    cache.insert(tag.to_string(), color);
    color
}

/// Fold a digest byte into the readable luminance band.
fn fold_channel(byte: u8) -> u8 {
    byte % (u8::MAX - LUMINANCE_FLOOR + 1) + LUMINANCE_FLOOR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_is_deterministic() {
        let first = color_for_tag("ambient");
        let second = color_for_tag("ambient");
        assert_eq!(first, second);
    }

    #[test]
    fn test_channels_stay_in_luminance_band() {
        for tag in ["kick", "snare", "vox", "fx", "intro", "outro", ""] {
            let color = color_for_tag(tag);
            assert!(color.r >= LUMINANCE_FLOOR);
            assert!(color.g >= LUMINANCE_FLOOR);
            assert!(color.b >= LUMINANCE_FLOOR);
        }
    }

    #[test]
    fn test_different_tags_usually_differ() {
        // Not a guarantee in general, but these known inputs do differ.
        assert_ne!(color_for_tag("drums"), color_for_tag("bass"));
    }

    #[test]
    fn test_hex_format() {
        let color = TagColor {
            r: 0xab,
            g: 0xcd,
            b: 0xef,
        };
        assert_eq!(color.hex(), "#abcdef");
    }

    #[test]
    fn test_fold_channel_range() {
        assert_eq!(fold_channel(0), LUMINANCE_FLOOR);
        assert_eq!(fold_channel(135), 255);
        assert_eq!(fold_channel(136), LUMINANCE_FLOOR);
        assert_eq!(fold_channel(255), 239);
    }
}
