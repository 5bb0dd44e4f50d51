//! Per-cell display attributes and the SGR parameter mapping.

use bitflags::bitflags;
use strum::FromRepr;

/// The eight classical ANSI colors.
///
/// The discriminant ordering is significant: bit 0 of the index is the red
/// channel, bit 1 green, bit 2 blue. There are no bright variants and no
/// palette beyond these eight.
#[derive(Debug, PartialOrd, Ord, PartialEq, Eq, Clone, Copy, Hash, FromRepr)]
#[repr(u8)]
pub enum Color {
    Black = 0,
    Red = 1,
    Green = 2,
    Yellow = 3,
    Blue = 4,
    Magenta = 5,
    Cyan = 6,
    White = 7,
}

impl Color {
    /// The (red, green, blue) channel bits of this color, for renderers
    /// that map the index onto an actual pixel value.
    #[must_use]
    pub const fn channels(self) -> (bool, bool, bool) {
        let index = self as u8;
        (index & 1 != 0, index & 2 != 0, index & 4 != 0)
    }
}

bitflags! {
    /// Display-property flags of a single cell.
    ///
    /// `BLINK` and `CONCEAL` are honored by the renderer, not here: the
    /// interpreter only records them.
    #[derive(Debug, PartialOrd, PartialEq, Eq, Clone, Copy, Hash)]
    pub struct AttrFlags: u8 {
        const BOLD = 0b0000_0001;
        const UNDERSCORE = 0b0000_0010;
        const BLINK = 0b0000_0100;
        const REVERSE = 0b0000_1000;
        const CONCEAL = 0b0001_0000;
    }
}

/// The display attributes of one cell: flags plus a foreground and a
/// background color. Eleven bits of information, packed into three bytes.
///
/// The default is the terminal's reset state: no flags, white on black.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct CellAttributes {
    pub flags: AttrFlags,
    pub foreground: Color,
    pub background: Color,
}

impl Default for CellAttributes {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl CellAttributes {
    /// The reset state: all flags clear, white on black.
    pub const DEFAULT: Self = Self {
        flags: AttrFlags::empty(),
        foreground: Color::White,
        background: Color::Black,
    };

    /// Apply one Select Graphic Rendition parameter.
    ///
    /// `0` resets to [`Self::DEFAULT`]; `1`/`4`/`5`/`7`/`8` set the bold,
    /// underscore, blink, reverse-video and conceal flags; `30`–`37` and
    /// `40`–`47` select the foreground and background color. Anything else
    /// is ignored.
    pub fn apply_sgr(&mut self, code: u16) {
        match code {
            0 => *self = Self::DEFAULT,
            1 => self.flags |= AttrFlags::BOLD,
            4 => self.flags |= AttrFlags::UNDERSCORE,
            5 => self.flags |= AttrFlags::BLINK,
            7 => self.flags |= AttrFlags::REVERSE,
            8 => self.flags |= AttrFlags::CONCEAL,
            #[allow(clippy::cast_possible_truncation)]
            30..=37 => {
                if let Some(color) = Color::from_repr((code - 30) as u8) {
                    self.foreground = color;
                }
            }
            #[allow(clippy::cast_possible_truncation)]
            40..=47 => {
                if let Some(color) = Color::from_repr((code - 40) as u8) {
                    self.background = color;
                }
            }
            _ => {}
        }
    }

    #[must_use]
    pub const fn bold(self) -> bool {
        self.flags.contains(AttrFlags::BOLD)
    }

    #[must_use]
    pub const fn underscore(self) -> bool {
        self.flags.contains(AttrFlags::UNDERSCORE)
    }

    #[must_use]
    pub const fn blink(self) -> bool {
        self.flags.contains(AttrFlags::BLINK)
    }

    #[must_use]
    pub const fn reverse_video(self) -> bool {
        self.flags.contains(AttrFlags::REVERSE)
    }

    #[must_use]
    pub const fn conceal(self) -> bool {
        self.flags.contains(AttrFlags::CONCEAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn color_channel_bits_follow_the_index() {
        assert_eq!(Color::Black.channels(), (false, false, false));
        assert_eq!(Color::Red.channels(), (true, false, false));
        assert_eq!(Color::Green.channels(), (false, true, false));
        assert_eq!(Color::Yellow.channels(), (true, true, false));
        assert_eq!(Color::Blue.channels(), (false, false, true));
        assert_eq!(Color::Magenta.channels(), (true, false, true));
        assert_eq!(Color::Cyan.channels(), (false, true, true));
        assert_eq!(Color::White.channels(), (true, true, true));
    }

    #[test]
    fn default_is_white_on_black_with_no_flags() {
        let attr = CellAttributes::default();
        assert_eq!(attr.foreground, Color::White);
        assert_eq!(attr.background, Color::Black);
        assert!(attr.flags.is_empty());
    }

    #[test]
    fn sgr_flags_accumulate() {
        let mut attr = CellAttributes::default();
        attr.apply_sgr(1);
        attr.apply_sgr(4);
        attr.apply_sgr(5);
        attr.apply_sgr(7);
        attr.apply_sgr(8);
        assert!(attr.bold());
        assert!(attr.underscore());
        assert!(attr.blink());
        assert!(attr.reverse_video());
        assert!(attr.conceal());
    }

    #[test]
    fn sgr_colors_select_by_offset() {
        let mut attr = CellAttributes::default();
        attr.apply_sgr(31);
        attr.apply_sgr(44);
        assert_eq!(attr.foreground, Color::Red);
        assert_eq!(attr.background, Color::Blue);
    }

    #[test]
    fn sgr_reset_restores_the_default() {
        let mut attr = CellAttributes::default();
        attr.apply_sgr(1);
        attr.apply_sgr(33);
        attr.apply_sgr(40);
        attr.apply_sgr(0);
        assert_eq!(attr, CellAttributes::DEFAULT);
    }

    #[test]
    fn sgr_reset_is_idempotent() {
        let mut once = CellAttributes::default();
        once.apply_sgr(1);
        once.apply_sgr(0);
        let mut twice = once;
        twice.apply_sgr(0);
        assert_eq!(once, twice);
    }

    #[test]
    fn unknown_sgr_codes_are_ignored() {
        let mut attr = CellAttributes::default();
        attr.apply_sgr(31);
        for code in [2, 3, 6, 9, 22, 38, 39, 48, 49, 90, 107, 9999] {
            attr.apply_sgr(code);
        }
        let mut expected = CellAttributes::default();
        expected.apply_sgr(31);
        assert_eq!(attr, expected);
    }
}
