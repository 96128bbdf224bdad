/// Colour roles and the two palettes (colour / monochrome).
///
/// Colours are indices into the 16-entry CGA palette. Indices 8..=15 are the
/// bright half, which text mode cannot show as a background.

/// A palette index, 0..=15.
pub type ColorIndex = u8;

pub const BLACK: ColorIndex = 0;
pub const WHITE: ColorIndex = 15;

/// Is this one of the bright colours that only work as a foreground?
#[inline]
pub fn is_bright(c: ColorIndex) -> bool {
    c > 7
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Palette {
    pub snakes: [ColorIndex; 2],
    pub wall: ColorIndex,
    pub background: ColorIndex,
    pub dialog_fg: ColorIndex,
    pub dialog_bg: ColorIndex,
}

impl Palette {
    pub const COLOR: Palette = Palette {
        snakes: [14, 13],
        wall: 12,
        background: 1,
        dialog_fg: 15,
        dialog_bg: 4,
    };

    pub const MONO: Palette = Palette {
        snakes: [15, 7],
        wall: 7,
        background: 0,
        dialog_fg: 15,
        dialog_bg: 0,
    };

    pub fn select(monochrome: bool) -> Palette {
        if monochrome { Palette::MONO } else { Palette::COLOR }
    }
}
