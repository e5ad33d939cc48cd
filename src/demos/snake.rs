//! Snake on the character matrix. The body lives in a fixed-capacity ring
//! buffer; collision is a screen-RAM read, the way the machine-language
//! versions peek the cell ahead of the head.

use log::debug;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::Demo;
use crate::charset;
use crate::joystick::Joystick;
use crate::sid::{Sid, Waveform};
use crate::vic::{Color, Screen};

/// Playfield interior: walls at columns 0/39 and rows 1/24, score on row 0.
const MIN_X: u8 = 1;
const MAX_X: u8 = 38;
const MIN_Y: u8 = 2;
const MAX_Y: u8 = 23;

const BODY_CAP: usize = 256;
const GROWTH_PER_FOOD: u32 = 2;

const FOOD_CHAR: u8 = charset::DIAMOND;
const BODY_CHAR: u8 = charset::BLOCK;
const HEAD_CHAR: u8 = charset::BALL;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dir {
    Up,
    Down,
    Left,
    Right,
}

impl Dir {
    fn opposite(self) -> Self {
        match self {
            Dir::Up => Dir::Down,
            Dir::Down => Dir::Up,
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }

    fn step(self, (x, y): (u8, u8)) -> (u8, u8) {
        match self {
            Dir::Up => (x, y.wrapping_sub(1)),
            Dir::Down => (x, y + 1),
            Dir::Left => (x.wrapping_sub(1), y),
            Dir::Right => (x + 1, y),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Title,
    Playing,
    GameOver,
}

pub struct Snake {
    phase: Phase,
    body: [(u8, u8); BODY_CAP],
    head: usize,
    len: usize,
    dir: Dir,
    next_dir: Dir,
    pending_growth: u32,
    food: (u8, u8),
    foods_eaten: u32,
    score: u32,
    frame: u32,
    prev_fire: bool,
    rng: Pcg32,
}

impl Snake {
    pub fn new(seed: u64) -> Self {
        Self {
            phase: Phase::Title,
            body: [(0, 0); BODY_CAP],
            head: 0,
            len: 0,
            dir: Dir::Right,
            next_dir: Dir::Right,
            pending_growth: 0,
            food: (0, 0),
            foods_eaten: 0,
            score: 0,
            frame: 0,
            prev_fire: false,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    fn draw_title(&self, screen: &mut Screen) {
        screen.clear();
        screen.background = Color::Black as u8;
        screen.border = Color::Green as u8;
        screen.text(13, 6, "S N A K E", Color::LightGreen as u8);
        screen.text(6, 13, "PRESS FIRE TO START", Color::Cyan as u8);
        screen.text(6, 16, "STEER WITH CURSOR KEYS", Color::Grey as u8);
    }

    fn enter_game(&mut self, screen: &mut Screen) {
        screen.clear();
        screen.background = Color::Black as u8;
        screen.border = Color::Green as u8;

        for x in 0..40 {
            screen.set(x, 1, charset::BLOCK, Color::Grey as u8);
            screen.set(x, 24, charset::BLOCK, Color::Grey as u8);
        }
        for y in 1..25 {
            screen.set(0, y, charset::BLOCK, Color::Grey as u8);
            screen.set(39, y, charset::BLOCK, Color::Grey as u8);
        }

        self.score = 0;
        self.foods_eaten = 0;
        self.pending_growth = 0;
        self.dir = Dir::Right;
        self.next_dir = Dir::Right;

        self.head = 0;
        self.len = 0;
        for (i, pos) in [(16, 12), (17, 12), (18, 12)].into_iter().enumerate() {
            self.head = i;
            self.body[i] = pos;
            self.len += 1;
            screen.set(pos.0 as usize, pos.1 as usize, BODY_CHAR, Color::Green as u8);
        }
        let head = self.head_pos();
        screen.set(
            head.0 as usize,
            head.1 as usize,
            HEAD_CHAR,
            Color::LightGreen as u8,
        );

        self.spawn_food(screen);
        self.draw_score(screen);
        self.phase = Phase::Playing;
        debug!("game start");
    }

    fn head_pos(&self) -> (u8, u8) {
        self.body[self.head]
    }

    /// Push a new head cell; returns the evicted tail unless growing.
    fn advance_body(&mut self, pos: (u8, u8), grow: bool) -> Option<(u8, u8)> {
        self.head = (self.head + 1) % BODY_CAP;
        self.body[self.head] = pos;
        if grow && self.len < BODY_CAP {
            self.len += 1;
            None
        } else {
            let tail = (self.head + BODY_CAP - self.len) % BODY_CAP;
            Some(self.body[tail])
        }
    }

    fn spawn_food(&mut self, screen: &mut Screen) {
        for _ in 0..1000 {
            let x = self.rng.gen_range(MIN_X..=MAX_X);
            let y = self.rng.gen_range(MIN_Y..=MAX_Y);
            if screen.char_at(x as usize, y as usize) == charset::SPACE {
                self.food = (x, y);
                screen.set(x as usize, y as usize, FOOD_CHAR, Color::Yellow as u8);
                return;
            }
        }
        // Board nearly full: first free cell, scanned in order
        for y in MIN_Y..=MAX_Y {
            for x in MIN_X..=MAX_X {
                if screen.char_at(x as usize, y as usize) == charset::SPACE {
                    self.food = (x, y);
                    screen.set(x as usize, y as usize, FOOD_CHAR, Color::Yellow as u8);
                    return;
                }
            }
        }
    }

    fn draw_score(&self, screen: &mut Screen) {
        screen.text(1, 0, &format!("SCORE {:05}", self.score), Color::White as u8);
        screen.text(
            28,
            0,
            &format!("LENGTH {:3}", self.len),
            Color::LightGreen as u8,
        );
    }

    /// Frames between moves; shrinks as food is eaten.
    fn step_interval(&self) -> u32 {
        6u32.saturating_sub(self.foods_eaten / 5).max(2)
    }

    fn steer(&mut self, input: Joystick) {
        let wanted = if input.up {
            Some(Dir::Up)
        } else if input.down {
            Some(Dir::Down)
        } else if input.left {
            Some(Dir::Left)
        } else if input.right {
            Some(Dir::Right)
        } else {
            None
        };
        if let Some(dir) = wanted {
            if dir != self.dir.opposite() {
                self.next_dir = dir;
            }
        }
    }

    fn step(&mut self, screen: &mut Screen, sid: &mut Sid) {
        self.dir = self.next_dir;
        let new_head = self.dir.step(self.head_pos());
        let cell = screen.char_at(new_head.0 as usize, new_head.1 as usize);

        if cell != charset::SPACE && cell != FOOD_CHAR {
            sid.play(0, 150.0, Waveform::Noise);
            screen.text(14, 11, "GAME OVER!", Color::Red as u8);
            screen.text(9, 13, "PRESS FIRE TO RESTART", Color::White as u8);
            self.phase = Phase::GameOver;
            debug!("game over, score {} length {}", self.score, self.len);
            return;
        }

        let ate = cell == FOOD_CHAR;
        if ate {
            self.score += 10;
            self.foods_eaten += 1;
            self.pending_growth += GROWTH_PER_FOOD;
            sid.play(0, 800.0, Waveform::Pulse);
        }

        // Old head becomes a body cell
        let old_head = self.head_pos();
        screen.set(
            old_head.0 as usize,
            old_head.1 as usize,
            BODY_CHAR,
            Color::Green as u8,
        );

        let grow = self.pending_growth > 0;
        if grow {
            self.pending_growth -= 1;
        }
        if let Some(tail) = self.advance_body(new_head, grow) {
            if tail != new_head {
                screen.set_char(tail.0 as usize, tail.1 as usize, charset::SPACE);
            }
        }
        screen.set(
            new_head.0 as usize,
            new_head.1 as usize,
            HEAD_CHAR,
            Color::LightGreen as u8,
        );

        if ate {
            self.spawn_food(screen);
            self.draw_score(screen);
        }
    }
}

impl Demo for Snake {
    fn tick(&mut self, input: Joystick, screen: &mut Screen, sid: &mut Sid) {
        let fire_edge = input.fire && !self.prev_fire;

        match self.phase {
            Phase::Title => {
                if self.frame == 0 {
                    self.draw_title(screen);
                }
                if fire_edge {
                    self.enter_game(screen);
                }
            }
            Phase::Playing => {
                if self.frame % 8 == 0 {
                    sid.release(0);
                }
                self.steer(input);
                if self.frame % self.step_interval() == 0 {
                    self.step(screen, sid);
                }
            }
            Phase::GameOver => {
                if fire_edge {
                    self.enter_game(screen);
                }
            }
        }

        self.prev_fire = input.fire;
        self.frame += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn world() -> (Snake, Screen, Sid) {
        (Snake::new(11), Screen::new(), Sid::new())
    }

    fn start(game: &mut Snake, screen: &mut Screen, sid: &mut Sid) {
        game.tick(Joystick::default(), screen, sid);
        game.tick(Joystick::fire_only(), screen, sid);
    }

    fn run_frames(game: &mut Snake, screen: &mut Screen, sid: &mut Sid, input: Joystick, n: u32) {
        for _ in 0..n {
            game.tick(input, screen, sid);
        }
    }

    /// Move the food to a corner so it cannot interfere with the path under test.
    fn park_food(game: &mut Snake, screen: &mut Screen) {
        screen.set_char(game.food.0 as usize, game.food.1 as usize, charset::SPACE);
        game.food = (1, 2);
        screen.set(1, 2, FOOD_CHAR, Color::Yellow as u8);
    }

    #[test]
    fn starts_with_three_cells_heading_right() {
        let (mut game, mut screen, mut sid) = world();
        start(&mut game, &mut screen, &mut sid);
        assert_eq!(game.phase, Phase::Playing);
        assert_eq!(game.len, 3);
        assert_eq!(game.head_pos(), (18, 12));
        assert_eq!(screen.char_at(18, 12), HEAD_CHAR);
        assert_eq!(screen.char_at(16, 12), BODY_CHAR);
    }

    #[test]
    fn snake_moves_and_vacates_tail() {
        let (mut game, mut screen, mut sid) = world();
        start(&mut game, &mut screen, &mut sid);
        park_food(&mut game, &mut screen);
        run_frames(&mut game, &mut screen, &mut sid, Joystick::default(), 6);
        assert_eq!(game.head_pos(), (19, 12));
        assert_eq!(game.len, 3);
        assert_eq!(screen.char_at(16, 12), charset::SPACE);
        assert_eq!(screen.char_at(18, 12), BODY_CHAR);
    }

    #[test]
    fn reversal_is_ignored() {
        let (mut game, mut screen, mut sid) = world();
        start(&mut game, &mut screen, &mut sid);
        let left = Joystick {
            left: true,
            ..Joystick::default()
        };
        run_frames(&mut game, &mut screen, &mut sid, left, 6);
        assert_eq!(game.dir, Dir::Right);
        assert_eq!(game.phase, Phase::Playing);
    }

    #[test]
    fn eating_food_grows_and_scores() {
        let (mut game, mut screen, mut sid) = world();
        start(&mut game, &mut screen, &mut sid);
        // Clear the spawned food and plant one directly ahead
        screen.set_char(game.food.0 as usize, game.food.1 as usize, charset::SPACE);
        game.food = (19, 12);
        screen.set(19, 12, FOOD_CHAR, Color::Yellow as u8);

        run_frames(&mut game, &mut screen, &mut sid, Joystick::default(), 6);
        assert_eq!(game.score, 10);
        assert_eq!(game.len, 4);
        park_food(&mut game, &mut screen);
        // Second growth unit applies on the next step
        run_frames(&mut game, &mut screen, &mut sid, Joystick::default(), 6);
        assert_eq!(game.len, 5);
        run_frames(&mut game, &mut screen, &mut sid, Joystick::default(), 6);
        assert_eq!(game.len, 5);
    }

    #[test]
    fn hitting_wall_ends_game() {
        let (mut game, mut screen, mut sid) = world();
        start(&mut game, &mut screen, &mut sid);
        park_food(&mut game, &mut screen);
        // 18 -> 38 is 20 moves; the 21st hits the right wall
        run_frames(&mut game, &mut screen, &mut sid, Joystick::default(), 6 * 21);
        assert_eq!(game.phase, Phase::GameOver);
    }

    proptest! {
        #[test]
        fn body_stays_bounded_under_random_steering(dirs in prop::collection::vec(0u8..4, 0..300)) {
            let (mut game, mut screen, mut sid) = world();
            start(&mut game, &mut screen, &mut sid);
            for d in dirs {
                let input = match d {
                    0 => Joystick { up: true, ..Joystick::default() },
                    1 => Joystick { down: true, ..Joystick::default() },
                    2 => Joystick { left: true, ..Joystick::default() },
                    _ => Joystick { right: true, ..Joystick::default() },
                };
                game.tick(input, &mut screen, &mut sid);
                prop_assert!(game.len <= BODY_CAP);
                if game.phase == Phase::Playing {
                    let (x, y) = game.head_pos();
                    prop_assert!((MIN_X..=MAX_X).contains(&x));
                    prop_assert!((MIN_Y..=MAX_Y).contains(&y));
                }
            }
        }
    }
}
