/// Level catalog: wall layouts and snake start positions.
///
/// Levels 1..=9 are hand-made. Anything past the catalog uses a generated
/// striped lattice so play can continue indefinitely. Every layout sits
/// inside the same permanent border:
///   - pixel rows 3 and 50, full width
///   - columns 1 and 80, rows 4..=49

use super::palette::{ColorIndex, Palette};
use super::screen::Screen;
use super::snake::{Direction, Point};
use super::surface::PixelSurface;

pub const CATALOG_SIZE: u32 = 9;

/// First and last pixel rows inside the border.
pub const FIELD_TOP: usize = 4;
pub const FIELD_BOTTOM: usize = 49;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LevelLayout {
    /// Hand-made layout, 1..=CATALOG_SIZE.
    Catalog(u32),
    /// Striped lattice used beyond the catalog.
    Generated,
}

/// Start position and heading for both snakes.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Spawn {
    pub starts: [(Point, Direction); 2],
}

impl LevelLayout {
    pub fn for_level(level: u32) -> LevelLayout {
        match level {
            1..=CATALOG_SIZE => LevelLayout::Catalog(level),
            _ => LevelLayout::Generated,
        }
    }

    /// Wall pixels on top of the border, in drawing order.
    pub fn walls(self) -> Vec<Point> {
        let mut w = Vec::new();
        let mut add = |row: usize, col: usize| w.push(Point::new(row, col));
        match self {
            LevelLayout::Catalog(1) => {}
            LevelLayout::Catalog(2) => {
                for i in 20..=60 {
                    add(25, i);
                }
            }
            LevelLayout::Catalog(3) => {
                for i in 10..=40 {
                    add(i, 20);
                    add(i, 60);
                }
            }
            LevelLayout::Catalog(4) => {
                for i in 4..=30 {
                    add(i, 20);
                    add(53 - i, 60);
                }
                for i in 2..=40 {
                    add(38, i);
                    add(15, 81 - i);
                }
            }
            LevelLayout::Catalog(5) => {
                for i in 13..=39 {
                    add(i, 21);
                    add(i, 59);
                }
                for i in 23..=57 {
                    add(11, i);
                    add(41, i);
                }
            }
            LevelLayout::Catalog(6) => {
                // Seven posts with a gap across the middle.
                for i in FIELD_TOP..=FIELD_BOTTOM {
                    if i > 30 || i < 23 {
                        for col in (10..=70).step_by(10) {
                            add(i, col);
                        }
                    }
                }
            }
            LevelLayout::Catalog(7) => {
                for i in (FIELD_TOP..=FIELD_BOTTOM).step_by(2) {
                    add(i, 40);
                }
            }
            LevelLayout::Catalog(8) => {
                // Alternating half-height posts: a serpentine corridor.
                for i in 4..=40 {
                    add(i, 10);
                    add(53 - i, 20);
                    add(i, 30);
                    add(53 - i, 40);
                    add(i, 50);
                    add(53 - i, 60);
                    add(i, 70);
                }
            }
            LevelLayout::Catalog(9) => {
                for i in 6..=47 {
                    add(i, i);
                    add(i, i + 28);
                }
            }
            LevelLayout::Catalog(_) | LevelLayout::Generated => {
                for i in (FIELD_TOP..=FIELD_BOTTOM).step_by(2) {
                    add(i, 10);
                    add(i + 1, 20);
                    add(i, 30);
                    add(i + 1, 40);
                    add(i, 50);
                    add(i + 1, 60);
                    add(i, 70);
                }
            }
        }
        w
    }

    pub fn spawn(self) -> Spawn {
        use Direction::*;
        let at = |row, col| Point::new(row, col);
        let starts = match self {
            LevelLayout::Catalog(1) => [(at(25, 50), Right), (at(25, 30), Left)],
            LevelLayout::Catalog(2) | LevelLayout::Catalog(4) => {
                [(at(7, 60), Left), (at(43, 20), Right)]
            }
            LevelLayout::Catalog(3) | LevelLayout::Catalog(5) => {
                [(at(25, 50), Up), (at(25, 30), Down)]
            }
            LevelLayout::Catalog(9) => [(at(40, 75), Up), (at(15, 5), Down)],
            _ => [(at(7, 65), Down), (at(43, 15), Up)],
        };
        Spawn { starts }
    }
}

/// Pixels of the permanent border.
pub fn border() -> Vec<Point> {
    let mut b = Vec::new();
    for col in 1..=80 {
        b.push(Point::new(3, col));
        b.push(Point::new(50, col));
    }
    for row in FIELD_TOP..=FIELD_BOTTOM {
        b.push(Point::new(row, 1));
        b.push(Point::new(row, 80));
    }
    b
}

/// Clear the board and draw `level`. Returns where the snakes start.
pub fn build_level(
    surface: &mut PixelSurface,
    screen: &mut Screen,
    level: u32,
    palette: &Palette,
) -> Spawn {
    surface.reset(screen, palette.background);
    let layout = LevelLayout::for_level(level);
    paint_all(surface, screen, &border(), palette.wall);
    paint_all(surface, screen, &layout.walls(), palette.wall);
    log::debug!("built level {level} as {layout:?}");
    layout.spawn()
}

fn paint_all(surface: &mut PixelSurface, screen: &mut Screen, points: &[Point], color: ColorIndex) {
    for p in points {
        surface.paint(screen, p.row, p.col, color);
    }
}
