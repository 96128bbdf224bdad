/// The step function: advances a round by one tick.
///
/// Processing order:
///   1. Steering (at most one turn per snake, reversals ignored)
///   2. Next head position for every playing snake
///   3. Target pickup (score, growth, next number, level clear)
///   4. Collision against the board as it was before anyone moved
///   5. Commit surviving moves: paint head, advance ring, erase tail
///
/// Steps 2 and 4 read only the pre-move board, so the outcome never
/// depends on which snake is processed first. Placing a target and pacing
/// happen in the caller before the tick.

use crate::domain::ring::GROWTH_PER_POINT;
use crate::domain::snake::{Direction, Point, DEATH_PENALTY};
use super::event::GameEvent;
use super::session::{Phase, Session};

/// Steering requested for this tick, one slot per snake.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickInput {
    pub steer: [Option<Direction>; 2],
}

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn step(s: &mut Session, input: TickInput) -> Vec<GameEvent> {
    if s.phase != Phase::Playing { return vec![]; }

    let mut events = Vec::new();

    resolve_steering(s, input);
    let next = planned_heads(s);
    if resolve_pickups(s, &next, &mut events) {
        return events;
    }
    let dead = judge_collisions(s, &next);
    resolve_deaths(s, &dead, &mut events);
    commit_moves(s, &next, &dead);

    events
}

// ══════════════════════════════════════════════════════════════
// Phases
// ══════════════════════════════════════════════════════════════

fn resolve_steering(s: &mut Session, input: TickInput) {
    for i in s.active() {
        if let Some(dir) = input.steer[i] {
            s.snakes[i].steer(dir);
        }
    }
}

/// Where each playing snake's head goes this tick. Parked snakes stay put.
fn planned_heads(s: &Session) -> [Point; 2] {
    let mut next = [Point::NOWHERE; 2];
    for i in s.active() {
        let snake = &s.snakes[i];
        if !snake.is_parked() {
            next[i] = snake.pos.step(snake.direction);
        }
    }
    next
}

/// Returns true when the level was cleared and the tick ends here.
fn resolve_pickups(s: &mut Session, next: &[Point; 2], events: &mut Vec<GameEvent>) -> bool {
    for i in s.active() {
        let target = match s.round.target {
            Some(t) if t.hit_by(next[i]) => t,
            _ => continue,
        };
        s.clear_target();
        let snake = &mut s.snakes[i];
        snake.score += target.value as i32;
        snake.body.grow(GROWTH_PER_POINT * target.value as usize);
        events.push(GameEvent::TargetEaten { snake: i, value: target.value });

        s.round.number += 1;
        if s.sequence_done() {
            s.phase = Phase::LevelComplete;
            events.push(GameEvent::LevelCleared { level: s.level });
            return true;
        }
    }
    false
}

/// Which snakes die moving to `next`, judged on the board as it stands.
pub fn judge_collisions(s: &Session, next: &[Point; 2]) -> [bool; 2] {
    let head_on = s.players() == 2 && !next[0].is_nowhere() && next[0] == next[1];
    let mut dead = [false; 2];
    for i in s.active() {
        if next[i].is_nowhere() { continue; }
        dead[i] = head_on || s.is_occupied(next[i]);
    }
    dead
}

fn resolve_deaths(s: &mut Session, dead: &[bool; 2], events: &mut Vec<GameEvent>) {
    if !dead.iter().any(|&d| d) { return; }
    for i in s.active() {
        if dead[i] {
            let snake = &mut s.snakes[i];
            snake.die();
            snake.score -= DEATH_PENALTY;
            log::info!("{} died, {} lives left", snake.name, snake.lives);
            events.push(GameEvent::SnakeDied { snake: i });
        }
    }
    s.clear_target();
    s.phase = Phase::LifeLost;
}

fn commit_moves(s: &mut Session, next: &[Point; 2], dead: &[bool; 2]) {
    let bg = s.palette.background;
    for i in s.active() {
        if dead[i] || next[i].is_nowhere() { continue; }
        let snake = &mut s.snakes[i];
        snake.pos = next[i];
        let fallen = snake.body.advance(next[i]);
        let color = snake.color;
        if let Some(tail) = fallen {
            s.surface.paint(&mut s.screen, tail.row, tail.col, bg);
        }
        s.surface.paint(&mut s.screen, next[i].row, next[i].col, color);
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ring::{ERASE_PASSES, INITIAL_LENGTH};
    use crate::sim::session::tests::session;
    use crate::sim::session::Target;

    fn idle() -> TickInput {
        TickInput::default()
    }

    fn steer0(dir: Direction) -> TickInput {
        TickInput { steer: [Some(dir), None] }
    }

    #[test]
    fn snake_eats_target_three_cells_ahead() {
        let mut s = session(1);
        // Level 1: Sammy starts at (25, 50) heading right.
        assert_eq!(s.snakes[0].pos, Point::new(25, 50));
        assert_eq!(s.snakes[0].direction, Direction::Right);
        s.place_target(Target { value: 1, char_row: 13, col: 53 });

        assert!(step(&mut s, idle()).is_empty());
        assert!(step(&mut s, idle()).is_empty());
        let events = step(&mut s, idle());

        assert_eq!(events, vec![GameEvent::TargetEaten { snake: 0, value: 1 }]);
        assert_eq!(s.snakes[0].pos, Point::new(25, 53));
        assert_eq!(s.snakes[0].score, 1);
        assert_eq!(s.snakes[0].body.len(), INITIAL_LENGTH + 4);
        assert_eq!(s.round.number, 2);
        assert_eq!(s.round.target, None);

        let next = s.ensure_target().unwrap();
        assert_eq!(next.value, 2);
        assert_ne!((next.char_row, next.col), (13, 53));
    }

    #[test]
    fn moving_paints_head_and_erases_tail() {
        let mut s = session(1);
        let bg = s.palette.background;
        for _ in 0..3 {
            step(&mut s, idle());
        }
        assert!(s.surface.occupied(25, 53, bg));
        assert!(s.surface.occupied(25, 52, bg));
        assert!(!s.surface.occupied(25, 51, bg));
        assert_eq!(s.snakes[0].body.segments().count(), INITIAL_LENGTH);
    }

    #[test]
    fn reversal_is_suppressed() {
        let mut s = session(1);
        s.snakes[0].direction = Direction::Left;
        let before = s.snakes[0].pos;
        step(&mut s, steer0(Direction::Right));
        assert_eq!(s.snakes[0].direction, Direction::Left);
        assert_eq!(s.snakes[0].pos, Point::new(before.row, before.col - 1));
        assert_eq!(s.phase, Phase::Playing);
    }

    #[test]
    fn steering_applies_before_movement() {
        let mut s = session(1);
        step(&mut s, steer0(Direction::Up));
        assert_eq!(s.snakes[0].pos, Point::new(24, 50));
    }

    #[test]
    fn head_on_meeting_kills_both() {
        let mut s = session(2);
        s.snakes[0].pos = Point::new(25, 40);
        s.snakes[0].direction = Direction::Left;
        s.snakes[1].pos = Point::new(25, 38);
        s.snakes[1].direction = Direction::Right;
        assert!(!s.is_occupied(Point::new(25, 39)));

        let events = step(&mut s, idle());

        assert!(events.contains(&GameEvent::SnakeDied { snake: 0 }));
        assert!(events.contains(&GameEvent::SnakeDied { snake: 1 }));
        assert_eq!(s.snakes[0].lives, 4);
        assert_eq!(s.snakes[1].lives, 4);
        assert_eq!(s.snakes[0].score, -DEATH_PENALTY);
        assert_eq!(s.phase, Phase::LifeLost);
    }

    #[test]
    fn wall_kills_only_the_snake_that_hits_it() {
        let mut s = session(2);
        s.snakes[0].pos = Point::new(25, 79);
        s.snakes[0].direction = Direction::Right;
        let events = step(&mut s, idle());
        assert_eq!(events, vec![GameEvent::SnakeDied { snake: 0 }]);
        assert_eq!(s.snakes[1].lives, 5);
        assert!(s.snakes[1].alive);
    }

    fn lay_body(s: &mut Session, idx: usize, cells: &[(usize, usize)]) {
        let color = s.snakes[idx].color;
        for &(r, c) in cells {
            s.snakes[idx].body.advance(Point::new(r, c));
            s.surface.paint(&mut s.screen, r, c, color);
        }
        let &(r, c) = cells.last().unwrap();
        s.snakes[idx].pos = Point::new(r, c);
    }

    /// Snake `a` heads into the oldest segment of snake `b`, which `b`'s own
    /// move is about to erase.
    fn chase_tail(a: usize, b: usize) -> [bool; 2] {
        let mut s = session(2);
        lay_body(&mut s, b, &[(30, 40), (30, 41)]);
        s.snakes[b].direction = Direction::Right;
        lay_body(&mut s, a, &[(32, 40), (31, 40)]);
        s.snakes[a].direction = Direction::Up;
        step(&mut s, idle());
        [!s.snakes[0].alive, !s.snakes[1].alive]
    }

    #[test]
    fn collision_outcome_does_not_depend_on_snake_order() {
        assert_eq!(chase_tail(0, 1), [true, false]);
        assert_eq!(chase_tail(1, 0), [false, true]);
    }

    #[test]
    fn judging_is_symmetric_for_swapped_heads() {
        let s = session(2);
        let a = Point::new(25, 45);
        let b = Point::new(25, 46);
        assert_eq!(judge_collisions(&s, &[a, b]), [false, false]);
        assert_eq!(judge_collisions(&s, &[a, a]), [true, true]);
        assert_eq!(judge_collisions(&s, &[Point::new(3, 10), b]), [true, false]);
        assert_eq!(judge_collisions(&s, &[b, Point::new(3, 10)]), [false, true]);
    }

    #[test]
    fn parked_snake_never_collides() {
        let mut s = session(1);
        for _ in 0..5 {
            step(&mut s, idle());
        }
        assert!(s.snakes[1].is_parked());
        assert_eq!(s.snakes[1].lives, 5);
        assert_eq!(s.phase, Phase::Playing);
    }

    fn clear_level(ramp: bool) -> Session {
        let mut s = session(1);
        s.settings.increase_speed = ramp;
        s.round.number = 9;
        s.place_target(Target { value: 9, char_row: 13, col: 51 });
        let events = step(&mut s, idle());
        assert!(events.contains(&GameEvent::LevelCleared { level: 1 }));
        assert_eq!(s.phase, Phase::LevelComplete);
        assert_eq!(s.screen.cell(13, 51).glyph, ' ', "eaten digit is blanked before the erase");
        for pass in 0..ERASE_PASSES {
            s.erase_pass(0, pass);
        }
        s.next_level();
        s
    }

    #[test]
    fn tenth_number_advances_the_level() {
        let s = clear_level(false);
        assert_eq!(s.level, 2);
        // Level 2 has a bar across row 25.
        assert!(s.is_occupied(Point::new(25, 40)));
        assert_eq!(s.snakes[0].pos, Point::new(7, 60));
        assert_eq!(s.round.number, 1);
        assert_eq!(s.phase, Phase::LevelIntro);
        assert_eq!(s.delay_ms, s.settings.tick_delay_ms());
    }

    #[test]
    fn pickup_blanks_the_digit_even_when_the_eater_dies() {
        let mut s = session(2);
        s.place_target(Target { value: 1, char_row: 13, col: 51 });
        // Jake heads into the same pixel from the right: a head-on meeting.
        lay_body(&mut s, 1, &[(25, 53), (25, 52)]);
        s.snakes[1].direction = Direction::Left;

        let events = step(&mut s, idle());

        assert!(events.contains(&GameEvent::TargetEaten { snake: 0, value: 1 }));
        assert!(events.contains(&GameEvent::SnakeDied { snake: 0 }));
        assert_eq!(s.round.target, None);
        assert_eq!(s.screen.cell(13, 51).glyph, ' ');
    }

    #[test]
    fn speed_ramp_shortens_the_delay() {
        let s = clear_level(true);
        assert_eq!(s.delay_ms, s.settings.tick_delay_ms() - 10);
    }

    #[test]
    fn level_clear_keeps_score_from_last_pickup() {
        let s = clear_level(false);
        assert_eq!(s.snakes[0].score, 9);
    }

    #[test]
    fn growth_is_capped() {
        let mut s = session(1);
        for _ in 0..100 {
            s.snakes[0].body.grow(GROWTH_PER_POINT * 9);
        }
        let b = &s.snakes[0].body;
        assert_eq!(b.len(), b.max_len());
    }
}
