//! Breakout: sprite paddle and ball, character-matrix brick wall.
//!
//! Coordinates are sprite pixels in the C64 convention, so the left play
//! wall at screen column 1 sits at sprite X 32.

use log::debug;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::Demo;
use crate::charset;
use crate::joystick::Joystick;
use crate::sid::{Sid, Waveform};
use crate::vic::{Color, Screen};

const WALL_LEFT: i32 = 32;
const WALL_RIGHT: i32 = 248;
const WALL_TOP: i32 = 58;
const PADDLE_Y: i32 = 216;
const PADDLE_WIDTH: i32 = 18;
const BALL_SIZE: i32 = 8;
const PADDLE_SPEED: i32 = 4;

const BRICK_ROWS: usize = 5;
const BRICK_COLS: usize = 7;
const BRICK_WIDTH: usize = 4;
const BRICK_START_COL: usize = 1;
const BRICK_START_ROW: usize = 3;

const ROW_COLORS: [Color; BRICK_ROWS] = [
    Color::Red,
    Color::Orange,
    Color::Yellow,
    Color::Green,
    Color::Cyan,
];

// Horizontal bar, 18 pixels wide
#[rustfmt::skip]
const PADDLE_SPRITE: [u8; 63] = [
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x3F, 0xFF, 0x80,
    0x7F, 0xFF, 0xC0,
    0x7F, 0xFF, 0xC0,
    0x3F, 0xFF, 0x80,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

// Small circle
#[rustfmt::skip]
const BALL_SPRITE: [u8; 63] = [
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x78, 0x00,
    0x00, 0xFC, 0x00,
    0x01, 0xFE, 0x00,
    0x01, 0xFE, 0x00,
    0x00, 0xFC, 0x00,
    0x00, 0x78, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Title,
    Serve,
    Playing,
    LevelClear { timer: u32 },
    GameOver,
}

pub struct Breakout {
    phase: Phase,
    paddle_x: i32,
    ball_x: i32,
    ball_y: i32,
    ball_dx: i32,
    ball_dy: i32,
    bricks: [[bool; BRICK_COLS]; BRICK_ROWS],
    bricks_left: u8,
    score: u32,
    lives: u8,
    level: u32,
    frame: u32,
    prev_fire: bool,
    rng: Pcg32,
}

impl Breakout {
    pub fn new(seed: u64) -> Self {
        Self {
            phase: Phase::Title,
            paddle_x: WALL_LEFT + 90,
            ball_x: 0,
            ball_y: 0,
            ball_dx: 2,
            ball_dy: -2,
            bricks: [[false; BRICK_COLS]; BRICK_ROWS],
            bricks_left: 0,
            score: 0,
            lives: 3,
            level: 1,
            frame: 0,
            prev_fire: false,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    fn draw_title(&self, screen: &mut Screen) {
        screen.clear();
        screen.background = Color::Black as u8;
        screen.border = Color::Blue as u8;
        screen.text(10, 6, "B R E A K O U T", Color::Yellow as u8);
        screen.text(6, 13, "PRESS FIRE TO START", Color::Cyan as u8);
        screen.text(7, 16, "CURSOR KEYS + SPACE", Color::Green as u8);
    }

    fn enter_game(&mut self, screen: &mut Screen) {
        self.score = 0;
        self.lives = 3;
        self.level = 1;
        self.draw_field(screen);
        self.init_bricks(screen);
        self.init_sprites(screen);
        self.start_serve();
        self.draw_status(screen);
        debug!("game start");
    }

    fn draw_field(&self, screen: &mut Screen) {
        screen.clear();
        screen.background = Color::Black as u8;
        screen.border = Color::Blue as u8;

        for y in 1..25 {
            screen.set(0, y, charset::BLOCK, Color::Grey as u8);
            screen.set(29, y, charset::BLOCK, Color::Grey as u8);
        }
        for x in 0..30 {
            screen.set(x, 1, charset::BLOCK, Color::Grey as u8);
        }
    }

    fn init_bricks(&mut self, screen: &mut Screen) {
        self.bricks_left = 0;
        for r in 0..BRICK_ROWS {
            for c in 0..BRICK_COLS {
                self.bricks[r][c] = true;
                self.bricks_left += 1;
                self.draw_brick(screen, r, c, true);
            }
        }
    }

    fn draw_brick(&self, screen: &mut Screen, row: usize, col: usize, visible: bool) {
        let code = if visible { charset::BLOCK } else { charset::SPACE };
        let y = BRICK_START_ROW + row;
        let x0 = BRICK_START_COL + col * BRICK_WIDTH;
        for i in 0..BRICK_WIDTH {
            screen.set(x0 + i, y, code, ROW_COLORS[row] as u8);
        }
    }

    fn init_sprites(&self, screen: &mut Screen) {
        let paddle = &mut screen.sprites[0];
        paddle.enabled = true;
        paddle.color = Color::LightBlue as u8;
        paddle.data = PADDLE_SPRITE;

        let ball = &mut screen.sprites[1];
        ball.enabled = true;
        ball.color = Color::White as u8;
        ball.data = BALL_SPRITE;
    }

    fn start_serve(&mut self) {
        self.paddle_x = WALL_LEFT + 90;
        self.ball_x = self.paddle_x + 6;
        self.ball_y = PADDLE_Y - 12;
        self.ball_dx = 2;
        self.ball_dy = -2;
        self.phase = Phase::Serve;
    }

    fn draw_status(&self, screen: &mut Screen) {
        screen.text(30, 2, "SCORE", Color::White as u8);
        screen.text(30, 3, &format!("{:05}", self.score), Color::White as u8);
        screen.text(30, 6, "LEVEL", Color::Yellow as u8);
        screen.text(32, 7, &format!("{}", self.level), Color::Yellow as u8);
        screen.text(30, 10, "LIVES", Color::Red as u8);
        screen.text(32, 11, &format!("{}", self.lives), Color::Red as u8);
    }

    fn update_sprites(&self, screen: &mut Screen) {
        screen.sprites[0].x = self.paddle_x;
        screen.sprites[0].y = PADDLE_Y;
        screen.sprites[1].x = self.ball_x;
        screen.sprites[1].y = self.ball_y;
    }

    fn move_paddle(&mut self, input: Joystick) {
        if input.left && self.paddle_x > WALL_LEFT + 4 {
            self.paddle_x -= PADDLE_SPEED;
        }
        if input.right && self.paddle_x < WALL_RIGHT - PADDLE_WIDTH - 4 {
            self.paddle_x += PADDLE_SPEED;
        }
    }

    /// Short SID blip; pitch is the frequency high byte like the register poke.
    fn bounce(&self, sid: &mut Sid, pitch: u8) {
        sid.play(0, f32::from(pitch) * 15.26, Waveform::Triangle);
    }

    /// Sprite corner to brick grid; knocks the brick out on a hit.
    fn check_brick_hit(&mut self, screen: &mut Screen, sid: &mut Sid, bx: i32, by: i32) -> bool {
        if bx < 24 || by < 50 {
            return false;
        }
        let scr_col = ((bx - 24) / 8) as usize;
        let scr_row = ((by - 50) / 8) as usize;

        if scr_row < BRICK_START_ROW || scr_row >= BRICK_START_ROW + BRICK_ROWS {
            return false;
        }
        let brick_row = scr_row - BRICK_START_ROW;
        if scr_col < BRICK_START_COL {
            return false;
        }
        let brick_col = (scr_col - BRICK_START_COL) / BRICK_WIDTH;
        if brick_col >= BRICK_COLS {
            return false;
        }

        if self.bricks[brick_row][brick_col] {
            self.bricks[brick_row][brick_col] = false;
            self.bricks_left -= 1;
            self.draw_brick(screen, brick_row, brick_col, false);
            self.score += 10 * self.level;
            self.bounce(sid, 0x30 + brick_row as u8 * 8);
            return true;
        }
        false
    }

    fn move_ball(&mut self, screen: &mut Screen, sid: &mut Sid) {
        let mut new_x = self.ball_x + self.ball_dx;
        let mut new_y = self.ball_y + self.ball_dy;

        if new_x <= WALL_LEFT + 8 {
            self.ball_dx = -self.ball_dx;
            new_x = WALL_LEFT + 9;
            self.bounce(sid, 0x20);
        }
        if new_x >= WALL_RIGHT - BALL_SIZE {
            self.ball_dx = -self.ball_dx;
            new_x = WALL_RIGHT - BALL_SIZE - 1;
            self.bounce(sid, 0x20);
        }
        if new_y <= WALL_TOP {
            self.ball_dy = -self.ball_dy;
            new_y = WALL_TOP + 1;
            self.bounce(sid, 0x28);
        }

        // Check all four ball corners against the brick grid
        let hit = self.check_brick_hit(screen, sid, new_x + 2, new_y + 2)
            || self.check_brick_hit(screen, sid, new_x + BALL_SIZE - 2, new_y + 2)
            || self.check_brick_hit(screen, sid, new_x + 2, new_y + BALL_SIZE - 2)
            || self.check_brick_hit(screen, sid, new_x + BALL_SIZE - 2, new_y + BALL_SIZE - 2);
        if hit {
            self.ball_dy = -self.ball_dy;
        }

        // Paddle deflection: angle follows the hit offset from paddle center
        if new_y >= PADDLE_Y - 10
            && self.ball_dy > 0
            && new_x + BALL_SIZE >= self.paddle_x
            && new_x <= self.paddle_x + PADDLE_WIDTH
        {
            let offset = (new_x + BALL_SIZE / 2) - (self.paddle_x + PADDLE_WIDTH / 2);
            self.ball_dx = (offset / 3).clamp(-3, 3);
            if self.ball_dx == 0 {
                self.ball_dx = if self.rng.gen::<bool>() { 1 } else { -1 };
            }
            self.ball_dy = -2;
            new_y = PADDLE_Y - 11;
            self.bounce(sid, 0x38);
        }

        // Ball lost below the paddle
        if new_y > PADDLE_Y + 20 {
            self.lives -= 1;
            self.bounce(sid, 0x10);
            if self.lives == 0 {
                screen.text(10, 12, "GAME OVER!", Color::Red as u8);
                screen.text(6, 14, "PRESS FIRE TO RESTART", Color::White as u8);
                self.phase = Phase::GameOver;
                debug!("game over, score {}", self.score);
            } else {
                self.start_serve();
            }
            return;
        }

        self.ball_x = new_x;
        self.ball_y = new_y;
    }
}

impl Demo for Breakout {
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
            Phase::Serve => {
                self.move_paddle(input);
                self.ball_x = self.paddle_x + PADDLE_WIDTH / 2 - BALL_SIZE / 2;
                self.ball_y = PADDLE_Y - 12;
                if fire_edge {
                    self.ball_dx = if self.rng.gen::<bool>() { 2 } else { -2 };
                    self.ball_dy = -2;
                    self.phase = Phase::Playing;
                }
                self.update_sprites(screen);
            }
            Phase::Playing => {
                if self.frame % 8 == 0 {
                    sid.release(0);
                }
                self.move_paddle(input);
                self.move_ball(screen, sid);
                self.update_sprites(screen);
                if self.frame % 32 == 0 {
                    self.draw_status(screen);
                }
                if self.bricks_left == 0 && self.phase == Phase::Playing {
                    self.level += 1;
                    self.score += 100 * self.level;
                    screen.text(
                        10,
                        12,
                        &format!("LEVEL {} COMPLETE!", self.level),
                        Color::Yellow as u8,
                    );
                    self.phase = Phase::LevelClear { timer: 120 };
                }
            }
            Phase::LevelClear { timer } => {
                if timer == 0 {
                    self.draw_field(screen);
                    self.init_bricks(screen);
                    self.start_serve();
                    self.draw_status(screen);
                    self.update_sprites(screen);
                } else {
                    self.phase = Phase::LevelClear { timer: timer - 1 };
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
