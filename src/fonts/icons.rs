//! Icon code points available in the symbol font (`DejaVuSans.ttf`).
//!
//! The set covers Miscellaneous Symbols and Dingbats. It is not a complete icon font.

pub const ICON_MIN: u32 = 0x2600;
pub const ICON_MAX: u32 = 0x27BF;

pub const ICON_SUN: &str = "\u{2600}";
pub const ICON_STAR: &str = "\u{2605}";
pub const ICON_TELEPHONE: &str = "\u{260E}";
pub const ICON_FROWN: &str = "\u{2639}";
pub const ICON_SMILE: &str = "\u{263A}";
pub const ICON_MUSIC: &str = "\u{266B}";
pub const ICON_GEAR: &str = "\u{2699}";
pub const ICON_WARNING: &str = "\u{26A0}";
pub const ICON_SCISSORS: &str = "\u{2702}";
pub const ICON_ENVELOPE: &str = "\u{2709}";
pub const ICON_CHECK: &str = "\u{2714}";
pub const ICON_CROSS: &str = "\u{2716}";

/// Every icon, for listing.
pub const ALL: [(&str, &str); 12] = [
    ("sun", ICON_SUN),
    ("star", ICON_STAR),
    ("telephone", ICON_TELEPHONE),
    ("frown", ICON_FROWN),
    ("smile", ICON_SMILE),
    ("music", ICON_MUSIC),
    ("gear", ICON_GEAR),
    ("warning", ICON_WARNING),
    ("scissors", ICON_SCISSORS),
    ("envelope", ICON_ENVELOPE),
    ("check", ICON_CHECK),
    ("cross", ICON_CROSS),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::GlyphRanges;

    #[test]
    fn icons_are_single_chars_inside_icon_range() {
        for (name, icon) in ALL {
            let mut chars = icon.chars();
            let c = chars.next().unwrap();
            assert!(chars.next().is_none(), "{name} is more than one char");
            assert!((ICON_MIN..=ICON_MAX).contains(&(c as u32)), "{name}");
            assert!(GlyphRanges::ICONS.contains(c));
        }
    }
}
