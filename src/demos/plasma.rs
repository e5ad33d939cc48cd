//! Plasma: four overlapping sine lookups summed per cell, averaged down to
//! a 16-entry color cycle and written into color RAM over solid blocks.

use super::Demo;
use crate::charset;
use crate::joystick::Joystick;
use crate::sid::Sid;
use crate::vic::{Color, Screen, SCREEN_H, SCREEN_W};

#[rustfmt::skip]
const SINETAB: [u8; 64] = [
     8,  9, 10, 11, 12, 13, 14, 14,
    15, 15, 15, 15, 15, 14, 14, 13,
    12, 11, 10,  9,  8,  7,  6,  5,
     4,  3,  2,  2,  1,  1,  1,  1,
     1,  2,  2,  3,  4,  5,  6,  7,
     8,  9, 10, 11, 12, 13, 14, 14,
    15, 15, 15, 15, 15, 14, 14, 13,
    12, 11, 10,  9,  8,  7,  6,  5,
];

/// Plasma intensity to C64 color, dark greys up through yellow and white.
const COLOR_CYCLE: [u8; 16] = [0, 11, 12, 15, 1, 13, 5, 3, 14, 6, 4, 10, 2, 8, 7, 1];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Title,
    Running,
}

pub struct Plasma {
    phase: Phase,
    offset1: u8,
    offset2: u8,
    offset3: u8,
    frame: u32,
    prev_fire: bool,
}

impl Plasma {
    pub fn new() -> Self {
        Self {
            phase: Phase::Title,
            offset1: 0,
            offset2: 0,
            offset3: 0,
            frame: 0,
            prev_fire: false,
        }
    }

    fn draw_title_screen(&self, screen: &mut Screen) {
        screen.clear();
        screen.background = Color::Black as u8;
        screen.border = Color::Black as u8;
        screen.text(14, 10, "P L A S M A", Color::White as u8);
        screen.text(10, 13, "COLOR CYCLING EFFECT", Color::LightBlue as u8);
        screen.text(10, 16, "PRESS FIRE TO START", Color::LightGrey as u8);
    }

    fn plasma_value(&self, x: u8, y: u8) -> u8 {
        let v1 = SINETAB[(x.wrapping_add(self.offset1) & 63) as usize];
        let v2 = SINETAB[(y.wrapping_add(self.offset2) & 63) as usize];
        let v3 = SINETAB[(x.wrapping_add(y).wrapping_add(self.offset3) & 63) as usize];
        let v4 = SINETAB[(x
            .wrapping_sub(y)
            .wrapping_add(32)
            .wrapping_add(self.offset1)
            & 63) as usize];
        (v1 + v2 + v3 + v4) >> 2
    }

    fn update_plasma(&mut self, screen: &mut Screen) {
        for y in 0..SCREEN_H {
            for x in 0..SCREEN_W {
                let v = self.plasma_value(x as u8, y as u8);
                screen.set_color(x, y, COLOR_CYCLE[(v & 15) as usize]);
            }
        }
        self.offset1 = self.offset1.wrapping_add(1);
        self.offset2 = self.offset2.wrapping_add(2);
        self.offset3 = self.offset3.wrapping_add(3);
    }
}

impl Default for Plasma {
    fn default() -> Self {
        Self::new()
    }
}

impl Demo for Plasma {
    fn tick(&mut self, input: Joystick, screen: &mut Screen, _sid: &mut Sid) {
        let fire_edge = input.fire && !self.prev_fire;

        match self.phase {
            Phase::Title => {
                if self.frame == 0 {
                    self.draw_title_screen(screen);
                }
                if fire_edge {
                    screen.fill(charset::BLOCK, Color::Black as u8);
                    self.phase = Phase::Running;
                }
            }
            Phase::Running => {
                self.update_plasma(screen);
            }
        }

        self.prev_fire = input.fire;
        self.frame += 1;
    }
}
