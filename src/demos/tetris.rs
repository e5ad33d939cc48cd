//! Tetris: a 10x20 well in the middle of the screen, seven pieces with
//! fixed rotation tables, gravity that tightens with the level, and a
//! next-piece box on the side panel.

use log::debug;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::Demo;
use crate::charset;
use crate::joystick::Joystick;
use crate::sid::{Sid, Waveform};
use crate::vic::{Color, Screen};

const WELL_W: i32 = 10;
const WELL_H: i32 = 20;

/// Screen position of the well interior's top-left cell.
const WELL_X: usize = 15;
const WELL_Y: usize = 2;

const NUM_PIECES: usize = 7;

/// Cell offsets inside a 4x4 box, one entry per rotation.
#[rustfmt::skip]
const PIECES: [[[(i32, i32); 4]; 4]; NUM_PIECES] = [
    // I
    [
        [(0, 1), (1, 1), (2, 1), (3, 1)],
        [(2, 0), (2, 1), (2, 2), (2, 3)],
        [(0, 1), (1, 1), (2, 1), (3, 1)],
        [(2, 0), (2, 1), (2, 2), (2, 3)],
    ],
    // O
    [
        [(1, 0), (2, 0), (1, 1), (2, 1)],
        [(1, 0), (2, 0), (1, 1), (2, 1)],
        [(1, 0), (2, 0), (1, 1), (2, 1)],
        [(1, 0), (2, 0), (1, 1), (2, 1)],
    ],
    // T
    [
        [(1, 0), (0, 1), (1, 1), (2, 1)],
        [(1, 0), (1, 1), (2, 1), (1, 2)],
        [(0, 1), (1, 1), (2, 1), (1, 2)],
        [(1, 0), (0, 1), (1, 1), (1, 2)],
    ],
    // S
    [
        [(1, 0), (2, 0), (0, 1), (1, 1)],
        [(1, 0), (1, 1), (2, 1), (2, 2)],
        [(1, 0), (2, 0), (0, 1), (1, 1)],
        [(1, 0), (1, 1), (2, 1), (2, 2)],
    ],
    // Z
    [
        [(0, 0), (1, 0), (1, 1), (2, 1)],
        [(2, 0), (1, 1), (2, 1), (1, 2)],
        [(0, 0), (1, 0), (1, 1), (2, 1)],
        [(2, 0), (1, 1), (2, 1), (1, 2)],
    ],
    // J
    [
        [(0, 0), (0, 1), (1, 1), (2, 1)],
        [(1, 0), (2, 0), (1, 1), (1, 2)],
        [(0, 1), (1, 1), (2, 1), (2, 2)],
        [(1, 0), (1, 1), (0, 2), (1, 2)],
    ],
    // L
    [
        [(2, 0), (0, 1), (1, 1), (2, 1)],
        [(1, 0), (1, 1), (1, 2), (2, 2)],
        [(0, 1), (1, 1), (2, 1), (0, 2)],
        [(0, 0), (1, 0), (1, 1), (1, 2)],
    ],
];

const PIECE_COLORS: [Color; NUM_PIECES] = [
    Color::Cyan,
    Color::Yellow,
    Color::Purple,
    Color::Green,
    Color::Red,
    Color::Blue,
    Color::Orange,
];

/// Score for 0-4 cleared lines, multiplied by the level.
const LINE_SCORES: [u32; 5] = [0, 40, 100, 300, 1200];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Title,
    Playing,
    GameOver,
}

pub struct Tetris {
    phase: Phase,
    /// 0 = empty, otherwise the locked cell's color.
    well: [[u8; WELL_W as usize]; WELL_H as usize],
    piece: usize,
    rot: usize,
    px: i32,
    py: i32,
    next: usize,
    fall_timer: u32,
    held_frames: u32,
    score: u32,
    lines: u32,
    level: u32,
    frame: u32,
    prev_fire: bool,
    prev_up: bool,
    rng: Pcg32,
}

impl Tetris {
    pub fn new(seed: u64) -> Self {
        Self {
            phase: Phase::Title,
            well: [[0; WELL_W as usize]; WELL_H as usize],
            piece: 0,
            rot: 0,
            px: 3,
            py: 0,
            next: 0,
            fall_timer: 0,
            held_frames: 0,
            score: 0,
            lines: 0,
            level: 1,
            frame: 0,
            prev_fire: false,
            prev_up: false,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    fn draw_title(&self, screen: &mut Screen) {
        screen.clear();
        screen.background = Color::Black as u8;
        screen.border = Color::Blue as u8;
        screen.text(13, 6, "T E T R I S", Color::Cyan as u8);
        screen.text(6, 13, "PRESS FIRE TO START", Color::White as u8);
        screen.text(4, 16, "CURSOR KEYS MOVE, UP ROTATES", Color::Grey as u8);
    }

    fn enter_game(&mut self, screen: &mut Screen) {
        screen.clear();
        screen.background = Color::Black as u8;
        screen.border = Color::Blue as u8;

        // Well walls and floor
        for y in 0..WELL_H as usize {
            screen.set(WELL_X - 1, WELL_Y + y, charset::BLOCK, Color::Grey as u8);
            screen.set(
                WELL_X + WELL_W as usize,
                WELL_Y + y,
                charset::BLOCK,
                Color::Grey as u8,
            );
        }
        for x in (WELL_X - 1)..=(WELL_X + WELL_W as usize) {
            screen.set(x, WELL_Y + WELL_H as usize, charset::BLOCK, Color::Grey as u8);
        }
        screen.text(3, 4, "NEXT", Color::White as u8);

        self.well = [[0; WELL_W as usize]; WELL_H as usize];
        self.score = 0;
        self.lines = 0;
        self.level = 1;
        self.fall_timer = 0;
        self.held_frames = 0;
        self.next = self.rng.gen_range(0..NUM_PIECES);
        self.spawn(screen);
        self.draw_status(screen);
        self.phase = Phase::Playing;
        debug!("game start");
    }

    fn cells(piece: usize, rot: usize) -> [(i32, i32); 4] {
        PIECES[piece][rot & 3]
    }

    fn collides(&self, piece: usize, rot: usize, px: i32, py: i32) -> bool {
        Self::cells(piece, rot).iter().any(|&(cx, cy)| {
            let wx = px + cx;
            let wy = py + cy;
            wx < 0
                || wx >= WELL_W
                || wy >= WELL_H
                || (wy >= 0 && self.well[wy as usize][wx as usize] != 0)
        })
    }

    fn spawn(&mut self, screen: &mut Screen) {
        self.piece = self.next;
        self.next = self.rng.gen_range(0..NUM_PIECES);
        self.rot = 0;
        self.px = 3;
        self.py = 0;
        self.fall_timer = 0;
        self.draw_next(screen);
        if self.collides(self.piece, self.rot, self.px, self.py) {
            screen.text(15, 10, "GAME OVER!", Color::Red as u8);
            screen.text(9, 12, "PRESS FIRE TO RESTART", Color::White as u8);
            self.phase = Phase::GameOver;
            debug!("game over, score {} lines {}", self.score, self.lines);
        }
    }

    fn draw_next(&self, screen: &mut Screen) {
        for y in 0..4 {
            for x in 0..4 {
                screen.set(3 + x, 6 + y, charset::SPACE, 0);
            }
        }
        for (cx, cy) in Self::cells(self.next, 0) {
            screen.set(
                3 + cx as usize,
                6 + cy as usize,
                charset::BLOCK,
                PIECE_COLORS[self.next] as u8,
            );
        }
    }

    fn draw_status(&self, screen: &mut Screen) {
        screen.text(29, 4, "SCORE", Color::White as u8);
        screen.text(29, 5, &format!("{:06}", self.score), Color::White as u8);
        screen.text(29, 8, "LEVEL", Color::Yellow as u8);
        screen.text(29, 9, &format!("{:3}", self.level), Color::Yellow as u8);
        screen.text(29, 12, "LINES", Color::Green as u8);
        screen.text(29, 13, &format!("{:3}", self.lines), Color::Green as u8);
    }

    fn draw_well(&self, screen: &mut Screen) {
        for y in 0..WELL_H as usize {
            for x in 0..WELL_W as usize {
                let cell = self.well[y][x];
                if cell != 0 {
                    screen.set(WELL_X + x, WELL_Y + y, charset::BLOCK, cell);
                } else {
                    screen.set(WELL_X + x, WELL_Y + y, charset::SPACE, 0);
                }
            }
        }
        for (cx, cy) in Self::cells(self.piece, self.rot) {
            let wx = self.px + cx;
            let wy = self.py + cy;
            if wy >= 0 {
                screen.set(
                    WELL_X + wx as usize,
                    WELL_Y + wy as usize,
                    charset::BLOCK,
                    PIECE_COLORS[self.piece] as u8,
                );
            }
        }
    }

    /// Frames per gravity step at the current level.
    fn fall_delay(&self) -> u32 {
        22u32.saturating_sub(3 * self.level).max(3)
    }

    fn try_move(&mut self, dx: i32, dy: i32) -> bool {
        if self.collides(self.piece, self.rot, self.px + dx, self.py + dy) {
            false
        } else {
            self.px += dx;
            self.py += dy;
            true
        }
    }

    fn try_rotate(&mut self, sid: &mut Sid) {
        let rot = (self.rot + 1) & 3;
        if !self.collides(self.piece, rot, self.px, self.py) {
            self.rot = rot;
            sid.play(1, 600.0, Waveform::Pulse);
        }
    }

    fn clear_full_rows(&mut self) -> u32 {
        let mut cleared = 0;
        for y in 0..WELL_H as usize {
            if self.well[y].iter().all(|&c| c != 0) {
                cleared += 1;
                for yy in (1..=y).rev() {
                    self.well[yy] = self.well[yy - 1];
                }
                self.well[0] = [0; WELL_W as usize];
            }
        }
        cleared
    }

    fn lock(&mut self, screen: &mut Screen, sid: &mut Sid) {
        for (cx, cy) in Self::cells(self.piece, self.rot) {
            let wx = self.px + cx;
            let wy = self.py + cy;
            if wy >= 0 {
                self.well[wy as usize][wx as usize] = PIECE_COLORS[self.piece] as u8;
            }
        }
        let cleared = self.clear_full_rows();
        if cleared > 0 {
            self.lines += cleared;
            self.score += LINE_SCORES[cleared as usize] * self.level;
            self.level = 1 + self.lines / 10;
            sid.play(0, 1000.0, Waveform::Pulse);
        } else {
            sid.play(0, 200.0, Waveform::Triangle);
        }
        self.draw_status(screen);
        self.spawn(screen);
    }

    fn handle_input(&mut self, input: Joystick, sid: &mut Sid) {
        if input.left || input.right {
            self.held_frames += 1;
        } else {
            self.held_frames = 0;
        }
        // Move on the first frame, then repeat after a short hold
        let repeat = self.held_frames >= 12 && self.held_frames % 4 == 0;
        if self.held_frames == 1 || repeat {
            if input.left {
                self.try_move(-1, 0);
            } else if input.right {
                self.try_move(1, 0);
            }
        }

        let rotate_edge =
            (input.up && !self.prev_up) || (input.fire && !self.prev_fire);
        if rotate_edge {
            self.try_rotate(sid);
        }
    }

    fn apply_gravity(&mut self, input: Joystick, screen: &mut Screen, sid: &mut Sid) {
        self.fall_timer += 1;
        let delay = if input.down { 2 } else { self.fall_delay() };
        if self.fall_timer >= delay {
            self.fall_timer = 0;
            if !self.try_move(0, 1) {
                self.lock(screen, sid);
            }
        }
    }
}

impl Demo for Tetris {
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
                    sid.release(1);
                }
                self.handle_input(input, sid);
                self.apply_gravity(input, screen, sid);
                if self.phase == Phase::Playing {
                    self.draw_well(screen);
                }
            }
            Phase::GameOver => {
                if fire_edge {
                    self.enter_game(screen);
                }
            }
        }

        self.prev_fire = input.fire;
        self.prev_up = input.up;
        self.frame += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn world() -> (Tetris, Screen, Sid) {
        (Tetris::new(21), Screen::new(), Sid::new())
    }

    fn start(game: &mut Tetris, screen: &mut Screen, sid: &mut Sid) {
        game.tick(Joystick::default(), screen, sid);
        game.tick(Joystick::fire_only(), screen, sid);
    }

    #[test]
    fn rotation_tables_hold_four_distinct_cells() {
        for piece in PIECES.iter() {
            for rot in piece.iter() {
                let unique: HashSet<_> = rot.iter().collect();
                assert_eq!(unique.len(), 4);
                for &(x, y) in rot {
                    assert!((0..4).contains(&x) && (0..4).contains(&y));
                }
            }
        }
    }

    #[test]
    fn spawned_piece_fits_the_well() {
        let (mut game, mut screen, mut sid) = world();
        start(&mut game, &mut screen, &mut sid);
        assert_eq!(game.phase, Phase::Playing);
        assert!(!game.collides(game.piece, game.rot, game.px, game.py));
    }

    #[test]
    fn gravity_lowers_the_piece() {
        let (mut game, mut screen, mut sid) = world();
        start(&mut game, &mut screen, &mut sid);
        let y0 = game.py;
        for _ in 0..game.fall_delay() {
            game.tick(Joystick::default(), &mut screen, &mut sid);
        }
        assert_eq!(game.py, y0 + 1);
    }

    #[test]
    fn soft_drop_locks_piece_into_well() {
        let (mut game, mut screen, mut sid) = world();
        start(&mut game, &mut screen, &mut sid);
        let down = Joystick {
            down: true,
            ..Joystick::default()
        };
        // Two frames per row plus the lock step
        for _ in 0..2 * (WELL_H as u32 + 2) {
            game.tick(down, &mut screen, &mut sid);
        }
        let occupied: usize = game
            .well
            .iter()
            .flatten()
            .filter(|&&c| c != 0)
            .count();
        assert_eq!(occupied, 4);
    }

    #[test]
    fn full_rows_shift_the_stack_down() {
        let (mut game, _, _) = world();
        game.well[19] = [Color::Red as u8; WELL_W as usize];
        game.well[18][0] = Color::Blue as u8;
        assert_eq!(game.clear_full_rows(), 1);
        assert_eq!(game.well[19][0], Color::Blue as u8);
        assert!(game.well[18].iter().all(|&c| c == 0));
    }

    #[test]
    fn double_clear_scores_by_table() {
        let (mut game, mut screen, mut sid) = world();
        start(&mut game, &mut screen, &mut sid);
        // Fill the two bottom rows, leaving the piece out of the way up top
        for y in 18..20 {
            game.well[y] = [Color::Red as u8; WELL_W as usize];
        }
        game.lock(&mut screen, &mut sid);
        assert_eq!(game.lines, 2);
        assert_eq!(game.score, LINE_SCORES[2]);
    }

    #[test]
    fn blocked_spawn_ends_game() {
        let (mut game, mut screen, mut sid) = world();
        start(&mut game, &mut screen, &mut sid);
        // Choke the spawn rows
        for y in 0..4 {
            game.well[y] = [Color::Grey as u8; WELL_W as usize];
        }
        game.spawn(&mut screen);
        assert_eq!(game.phase, Phase::GameOver);
    }

    proptest! {
        #[test]
        fn piece_never_leaves_the_well(moves in prop::collection::vec(0u8..5, 0..400)) {
            let (mut game, mut screen, mut sid) = world();
            start(&mut game, &mut screen, &mut sid);
            for m in moves {
                let input = match m {
                    0 => Joystick { left: true, ..Joystick::default() },
                    1 => Joystick { right: true, ..Joystick::default() },
                    2 => Joystick { down: true, ..Joystick::default() },
                    3 => Joystick { up: true, ..Joystick::default() },
                    _ => Joystick::default(),
                };
                game.tick(input, &mut screen, &mut sid);
                if game.phase == Phase::Playing {
                    for (cx, cy) in Tetris::cells(game.piece, game.rot) {
                        let wx = game.px + cx;
                        let wy = game.py + cy;
                        prop_assert!((0..WELL_W).contains(&wx));
                        prop_assert!(wy < WELL_H);
                    }
                }
            }
        }
    }
}
