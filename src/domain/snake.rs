/// Snakes: heading, position on the pixel grid, and per-player bookkeeping.

use super::palette::ColorIndex;
use super::ring::BodyRing;

pub const START_LIVES: u32 = 5;

/// Score lost when a snake dies (shown x100 on the HUD).
pub const DEATH_PENALTY: i32 = 10;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// (row, col) step for one tick.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// A pixel coordinate. Row 0 means "nowhere".
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Point {
    pub row: usize,
    pub col: usize,
}

impl Point {
    pub const NOWHERE: Point = Point { row: 0, col: 0 };

    pub fn new(row: usize, col: usize) -> Self {
        Point { row, col }
    }

    pub fn is_nowhere(self) -> bool {
        self.row == 0
    }

    /// One step in `dir`. Walls keep snakes inside the grid, so leaving it
    /// would mean a level was authored without its border.
    pub fn step(self, dir: Direction) -> Point {
        let (dr, dc) = dir.delta();
        let row = self.row as isize + dr;
        let col = self.col as isize + dc;
        assert!(row >= 1 && col >= 1, "snake stepped off the grid at ({row}, {col})");
        Point { row: row as usize, col: col as usize }
    }
}

#[derive(Clone, Debug)]
pub struct Snake {
    pub name: &'static str,
    pub pos: Point,
    pub direction: Direction,
    pub lives: u32,
    pub score: i32,
    pub color: ColorIndex,
    pub alive: bool,
    pub body: BodyRing,
}

impl Snake {
    pub fn new(name: &'static str, color: ColorIndex, lives: u32) -> Self {
        Snake {
            name,
            pos: Point::NOWHERE,
            direction: Direction::Right,
            lives,
            score: 0,
            color,
            alive: true,
            body: BodyRing::new(),
        }
    }

    /// Put the snake at a level start for a fresh life.
    pub fn respawn(&mut self, pos: Point, direction: Direction) {
        self.pos = pos;
        self.direction = direction;
        self.alive = true;
        self.body.reset();
    }

    /// Turn, unless it would reverse straight into the neck.
    /// Returns whether the heading changed.
    pub fn steer(&mut self, dir: Direction) -> bool {
        if dir == self.direction.opposite() {
            return false;
        }
        self.direction = dir;
        true
    }

    /// Park an inactive snake on the sentinel row so it never collides or
    /// picks anything up.
    pub fn park(&mut self) {
        self.pos = Point::NOWHERE;
    }

    pub fn is_parked(&self) -> bool {
        self.pos.is_nowhere()
    }

    pub fn die(&mut self) {
        self.alive = false;
        self.lives = self.lives.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reversal_is_ignored() {
        let mut s = Snake::new("Sammy", 14, START_LIVES);
        s.direction = Direction::Left;
        assert!(!s.steer(Direction::Right));
        assert_eq!(s.direction, Direction::Left);
        assert!(s.steer(Direction::Up));
        assert_eq!(s.direction, Direction::Up);
    }

    #[test]
    fn step_follows_delta() {
        let p = Point::new(25, 50);
        assert_eq!(p.step(Direction::Up), Point::new(24, 50));
        assert_eq!(p.step(Direction::Down), Point::new(26, 50));
        assert_eq!(p.step(Direction::Left), Point::new(25, 49));
        assert_eq!(p.step(Direction::Right), Point::new(25, 51));
    }

    #[test]
    fn die_costs_one_life() {
        let mut s = Snake::new("Jake", 13, 2);
        s.die();
        assert!(!s.alive);
        assert_eq!(s.lives, 1);
        s.respawn(Point::new(7, 60), Direction::Left);
        assert!(s.alive);
        assert_eq!(s.lives, 1);
    }
}
