//! Holiday greeting: a decorated tree on a snowy ground, falling snow that
//! restores the backdrop behind it, and a looping Jingle Bells lead on the
//! pulse voice.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::Demo;
use crate::charset;
use crate::joystick::Joystick;
use crate::sid::{Sid, Waveform};
use crate::vic::{Color, Screen, SCREEN_H, SCREEN_W};

/// SID frequency register value to Hz.
const SID_HZ_PER_UNIT: f32 = 15.26 / 256.0;

const REST: u16 = 0;
const C4: u16 = 4291;
const D4: u16 = 4817;
const E4: u16 = 5407;
const F4: u16 = 5728;
const G4: u16 = 6430;

#[rustfmt::skip]
const MELODY: [u16; 64] = [
    E4, E4, E4, REST,
    E4, E4, E4, REST,
    E4, G4, C4, D4,
    E4, REST, REST, REST,
    F4, F4, F4, F4,
    F4, E4, E4, E4,
    E4, D4, D4, E4,
    D4, REST, G4, REST,
    E4, E4, E4, REST,
    E4, E4, E4, REST,
    E4, G4, C4, D4,
    E4, REST, REST, REST,
    F4, F4, F4, F4,
    F4, E4, E4, E4,
    G4, G4, F4, D4,
    C4, REST, REST, REST,
];

/// Frames per melody step at 50 Hz.
const NOTE_DURATION: u32 = 20;

const MAX_SNOW: usize = 30;
/// Frames between snow movement steps.
const SNOW_STEP: u32 = 4;

const TREE_X: i32 = 20;
const TREE_TOP: usize = 7;
const TREE_BOTTOM: usize = 19;
const GROUND_ROW: usize = 22;

#[derive(Debug, Clone, Copy, Default)]
struct Flake {
    active: bool,
    x: usize,
    y: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Title,
    Running,
}

pub struct Holiday {
    phase: Phase,
    flakes: [Flake; MAX_SNOW],
    backdrop_chars: [[u8; SCREEN_W]; SCREEN_H],
    backdrop_colors: [[u8; SCREEN_W]; SCREEN_H],
    melody_pos: usize,
    note_timer: u32,
    frame: u32,
    prev_fire: bool,
    rng: Pcg32,
}

impl Holiday {
    pub fn new(seed: u64) -> Self {
        Self {
            phase: Phase::Title,
            flakes: [Flake::default(); MAX_SNOW],
            backdrop_chars: [[charset::SPACE; SCREEN_W]; SCREEN_H],
            backdrop_colors: [[0; SCREEN_W]; SCREEN_H],
            melody_pos: 0,
            note_timer: 0,
            frame: 0,
            prev_fire: false,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    fn draw_title_screen(&self, screen: &mut Screen) {
        screen.clear();
        screen.background = Color::Black as u8;
        screen.border = Color::LightBlue as u8;
        screen.text(8, 10, "H O L I D A Y  D E M O", Color::White as u8);
        screen.text(9, 13, "SEASONS GREETINGS IN 8 BIT", Color::LightGreen as u8);
        screen.text(10, 16, "PRESS FIRE TO START", Color::LightGrey as u8);
    }

    fn draw_scene(&mut self, screen: &mut Screen) {
        screen.clear();
        screen.background = Color::Black as u8;
        screen.border = Color::LightBlue as u8;

        screen.text_centered(2, "MERRY CHRISTMAS!", Color::Yellow as u8);
        screen.text_centered(4, "AND A HAPPY NEW YEAR", Color::LightGreen as u8);

        // Snowy ground
        for y in GROUND_ROW..SCREEN_H {
            for x in 0..SCREEN_W {
                screen.set(x, y, charset::BLOCK, Color::White as u8);
            }
        }

        // Tree: a triangle of green blocks with a brown trunk
        for y in TREE_TOP + 1..=TREE_BOTTOM {
            let half = (y - TREE_TOP) as i32 * 2 / 3 + 1;
            for x in (TREE_X - half)..=(TREE_X + half) {
                screen.set(x as usize, y, charset::BLOCK, Color::Green as u8);
            }
        }
        for y in TREE_BOTTOM + 1..GROUND_ROW {
            screen.set(TREE_X as usize - 1, y, charset::BLOCK, Color::Brown as u8);
            screen.set(TREE_X as usize, y, charset::BLOCK, Color::Brown as u8);
        }
        screen.set(TREE_X as usize, TREE_TOP, charset::STAR, Color::Yellow as u8);

        // Ornaments
        for &(x, y, color) in &[
            (17, 12, Color::Red),
            (23, 14, Color::Cyan),
            (19, 16, Color::LightRed),
            (22, 18, Color::Purple),
            (16, 18, Color::Cyan),
        ] {
            screen.set(x, y, charset::BALL, color as u8);
        }

        for y in 0..SCREEN_H {
            for x in 0..SCREEN_W {
                self.backdrop_chars[y][x] = screen.char_at(x, y);
                self.backdrop_colors[y][x] = screen.color_at(x, y);
            }
        }
    }

    fn enter_scene(&mut self, screen: &mut Screen, sid: &mut Sid) {
        self.draw_scene(screen);
        self.flakes = [Flake::default(); MAX_SNOW];
        self.melody_pos = 0;
        self.note_timer = 0;
        sid.set_volume(15);
        sid.set_decay(0, 4.0);
        self.phase = Phase::Running;
    }

    fn step_music(&mut self, sid: &mut Sid) {
        self.note_timer += 1;
        if self.note_timer < NOTE_DURATION {
            return;
        }
        self.note_timer = 0;
        if self.melody_pos >= MELODY.len() {
            self.melody_pos = 0;
        }
        let note = MELODY[self.melody_pos];
        if note == REST {
            sid.release(0);
        } else {
            sid.play(0, note as f32 * SID_HZ_PER_UNIT, Waveform::Pulse);
        }
        self.melody_pos += 1;
    }

    fn restore_backdrop(&self, screen: &mut Screen, x: usize, y: usize) {
        screen.set(x, y, self.backdrop_chars[y][x], self.backdrop_colors[y][x]);
    }

    fn step_snow(&mut self, screen: &mut Screen) {
        if self.rng.gen_bool(0.5) {
            if let Some(flake) = self.flakes.iter_mut().find(|f| !f.active) {
                flake.active = true;
                flake.x = self.rng.gen_range(0..SCREEN_W);
                flake.y = 1;
                screen.set(flake.x, flake.y, charset::SNOWFLAKE, Color::White as u8);
            }
        }

        for i in 0..MAX_SNOW {
            let flake = self.flakes[i];
            if !flake.active {
                continue;
            }
            self.restore_backdrop(screen, flake.x, flake.y);
            let new_y = flake.y + 1;
            if new_y > SCREEN_H - 1 {
                self.flakes[i].active = false;
            } else {
                self.flakes[i].y = new_y;
                screen.set(flake.x, new_y, charset::SNOWFLAKE, Color::White as u8);
            }
        }
    }
}

impl Demo for Holiday {
    fn tick(&mut self, input: Joystick, screen: &mut Screen, sid: &mut Sid) {
        let fire_edge = input.fire && !self.prev_fire;

        match self.phase {
            Phase::Title => {
                if self.frame == 0 {
                    self.draw_title_screen(screen);
                }
                if fire_edge {
                    self.enter_scene(screen, sid);
                }
            }
            Phase::Running => {
                self.step_music(sid);
                if self.frame % SNOW_STEP == 0 {
                    self.step_snow(screen);
                }
            }
        }

        self.prev_fire = input.fire;
        self.frame += 1;
    }
}
