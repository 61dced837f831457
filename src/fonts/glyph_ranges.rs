use crate::{ShowcaseError, ShowcaseResult};
use imgui::FontGlyphRanges;

use super::icons::{ICON_MAX, ICON_MIN};

/// Highest code point the atlas can store. imgui-sys is built with 32 bits `ImWchar`.
pub const MAX_CODE_POINT: u32 = char::MAX as u32;

/// A zero terminated list of inclusive code point pairs.
///
/// Ranges are `'static` because imgui keeps a pointer to them until the atlas is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphRanges(&'static [u32]);

impl GlyphRanges {
    /// Basic Latin + Latin Supplement. Same as imgui's default ranges.
    pub const DEFAULT: GlyphRanges = GlyphRanges(&[0x0020, 0x00FF, 0]);

    /// Latin Extended-A and B on top of the default ranges (Polish, Czech, ...).
    pub const LATIN_EXTENDED: GlyphRanges = GlyphRanges(&[0x0020, 0x00FF, 0x0100, 0x01FF, 0]);

    /// Miscellaneous Symbols + Dingbats, used as the icon set.
    pub const ICONS: GlyphRanges = GlyphRanges(&[ICON_MIN, ICON_MAX, 0]);

    pub fn new(ranges: &'static [u32]) -> ShowcaseResult<Self> {
        let invalid = |reason: String| Err(ShowcaseError::InvalidGlyphRanges(reason));

        match ranges.split_last() {
            None => return invalid("ranges are empty".into()),
            Some((last, _)) if *last != 0 => {
                return invalid("ranges must be terminated by 0".into())
            }
            Some((_, pairs)) if pairs.is_empty() => {
                return invalid("ranges contain no interval".into())
            }
            Some((_, pairs)) if pairs.len() % 2 != 0 => {
                return invalid(format!("{} bounds do not form pairs", pairs.len()))
            }
            Some(_) => {}
        }

        for pair in ranges[..ranges.len() - 1].chunks_exact(2) {
            let (lo, hi) = (pair[0], pair[1]);
            if lo == 0 || hi == 0 {
                return invalid("0 is only allowed as terminator".into());
            }
            if lo > hi {
                return invalid(format!("{:#06X} is greater than {:#06X}", lo, hi));
            }
            if hi > MAX_CODE_POINT {
                return invalid(format!(
                    "{:#06X} is above the maximum code point {:#06X}",
                    hi, MAX_CODE_POINT
                ));
            }
        }

        Ok(Self(ranges))
    }

    /// Inclusive `(first, last)` code point pairs.
    pub fn pairs(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.0[..self.0.len() - 1]
            .chunks_exact(2)
            .map(|pair| (pair[0], pair[1]))
    }

    pub fn contains(&self, c: char) -> bool {
        let c = c as u32;
        self.pairs().any(|(lo, hi)| (lo..=hi).contains(&c))
    }

    /// Distinct characters of `text` a font loaded with these ranges will not render,
    /// in order of first appearance. Control characters are ignored.
    pub fn missing_chars(&self, text: &str) -> Vec<char> {
        let mut missing = Vec::new();
        for c in text.chars().filter(|c| !c.is_control()) {
            if !self.contains(c) && !missing.contains(&c) {
                missing.push(c);
            }
        }
        missing
    }

    pub fn glyph_count(&self) -> u32 {
        self.pairs().map(|(lo, hi)| hi - lo + 1).sum()
    }

    pub(crate) fn to_imgui(self) -> FontGlyphRanges {
        if self == Self::DEFAULT {
            FontGlyphRanges::default()
        } else {
            FontGlyphRanges::from_slice(self.0)
        }
    }
}

impl Default for GlyphRanges {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_ranges_are_valid() {
        for ranges in [
            GlyphRanges::DEFAULT,
            GlyphRanges::LATIN_EXTENDED,
            GlyphRanges::ICONS,
        ] {
            assert_eq!(GlyphRanges::new(ranges.0).unwrap(), ranges);
        }
    }

    #[test]
    fn rejects_malformed_ranges() {
        static EMPTY: [u32; 0] = [];
        assert!(GlyphRanges::new(&EMPTY).is_err());
        assert!(GlyphRanges::new(&[0]).is_err());
        assert!(GlyphRanges::new(&[0x20, 0xFF]).is_err());
        assert!(GlyphRanges::new(&[0x20, 0xFF, 0x100, 0]).is_err());
        assert!(GlyphRanges::new(&[0xFF, 0x20, 0]).is_err());
        assert!(GlyphRanges::new(&[0x20, 0, 0x100, 0x1FF, 0]).is_err());
        assert!(GlyphRanges::new(&[0x20, 0x11_0000, 0]).is_err());
    }

    #[test]
    fn accepts_supplementary_planes() {
        let emoji = GlyphRanges::new(&[0x1F300, 0x1F5FF, 0]).unwrap();

        assert!(emoji.contains('\u{1F308}'));
        assert_eq!(emoji.glyph_count(), 0x300);
        assert!(matches!(
            GlyphRanges::new(&[0x1F300, 0x11_0000, 0]),
            Err(ShowcaseError::InvalidGlyphRanges(_))
        ));
    }

    #[test]
    fn polish_text_needs_extended_latin() {
        let text = "Witaj świecie !";

        assert_eq!(GlyphRanges::DEFAULT.missing_chars(text), vec!['ś']);
        assert!(GlyphRanges::LATIN_EXTENDED.missing_chars(text).is_empty());
    }

    #[test]
    fn missing_chars_are_distinct_and_ordered() {
        let missing = GlyphRanges::DEFAULT.missing_chars("ć, ń, ó, ś, ź, ż, ą, ę, ł, ć\n");

        assert_eq!(missing, vec!['ć', 'ń', 'ś', 'ź', 'ż', 'ą', 'ę', 'ł']);
    }

    #[test]
    fn counts_glyphs() {
        assert_eq!(GlyphRanges::DEFAULT.glyph_count(), 0xE0);
        assert_eq!(GlyphRanges::LATIN_EXTENDED.glyph_count(), 0x1E0);
    }

    #[test]
    fn icons_are_in_icon_ranges() {
        assert!(GlyphRanges::ICONS.contains('\u{2714}'));
        assert!(!GlyphRanges::ICONS.contains('a'));
    }
}
