//! Sine scroller: a looping message marching right to left along row 12,
//! bent by a signed sine table and colored by a rainbow cycle.

use super::Demo;
use crate::charset;
use crate::joystick::Joystick;
use crate::sid::Sid;
use crate::vic::{Color, Screen, SCREEN_W};

const SCROLL_ROW: i32 = 12;

const MESSAGE: &[u8] = b"     WELCOME TO THE C64 SCROLLER DEMO!     \
THIS TEXT SCROLLS SMOOTHLY FROM RIGHT TO LEFT...     \
THE COMMODORE 64 WAS RELEASED IN 1982 AND BECAME \
THE BEST-SELLING COMPUTER OF ALL TIME!     \
GREETINGS TO ALL RETRO COMPUTING FANS!     \
                    ";

#[rustfmt::skip]
const SINETAB: [i8; 32] = [
     0,  1,  2,  2,  3,  3,  4,  4,
     4,  4,  3,  3,  2,  2,  1,  0,
     0, -1, -2, -2, -3, -3, -4, -4,
    -4, -4, -3, -3, -2, -2, -1,  0,
];

const RAINBOW: [u8; 8] = [2, 8, 7, 5, 3, 14, 6, 4];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Title,
    Running,
}

pub struct Scroller {
    phase: Phase,
    scroll_pos: usize,
    wave_offset: u8,
    color_offset: u8,
    frame: u32,
    prev_fire: bool,
}

impl Scroller {
    pub fn new() -> Self {
        Self {
            phase: Phase::Title,
            scroll_pos: 0,
            wave_offset: 0,
            color_offset: 0,
            frame: 0,
            prev_fire: false,
        }
    }

    fn draw_title_screen(&self, screen: &mut Screen) {
        screen.clear();
        screen.background = Color::Black as u8;
        screen.border = Color::Blue as u8;
        screen.text(13, 10, "S C R O L L E R", Color::White as u8);
        screen.text(10, 13, "SINE WAVE TEXT DEMO", Color::Cyan as u8);
        screen.text(10, 16, "PRESS FIRE TO START", Color::LightGrey as u8);
    }

    fn enter_effect(&mut self, screen: &mut Screen) {
        screen.clear();
        screen.background = Color::Black as u8;
        screen.border = Color::Blue as u8;
        screen.text(13, 2, "SINE SCROLLER", Color::Yellow as u8);
        for x in 0..SCREEN_W {
            screen.set(x, 6, charset::HBAR, Color::Blue as u8);
            screen.set(x, 18, charset::HBAR, Color::Blue as u8);
        }
        self.scroll_pos = 0;
        self.wave_offset = 0;
        self.color_offset = 0;
        self.phase = Phase::Running;
    }

    fn draw_scroll(&self, screen: &mut Screen) {
        for row in 8..=16 {
            for x in 0..SCREEN_W {
                screen.set_char(x, row, charset::SPACE);
            }
        }
        for x in 0..SCREEN_W {
            let idx = (self.scroll_pos + x) % MESSAGE.len();
            let ch = charset::from_ascii(MESSAGE[idx]);
            let wave = SINETAB[((x as u8).wrapping_add(self.wave_offset) & 31) as usize];
            let row = (SCROLL_ROW + wave as i32).clamp(8, 16) as usize;
            let color = RAINBOW[((x as u8).wrapping_add(self.color_offset) & 7) as usize];
            screen.set(x, row, ch, color);
        }
    }
}

impl Default for Scroller {
    fn default() -> Self {
        Self::new()
    }
}

impl Demo for Scroller {
    fn tick(&mut self, input: Joystick, screen: &mut Screen, _sid: &mut Sid) {
        let fire_edge = input.fire && !self.prev_fire;

        match self.phase {
            Phase::Title => {
                if self.frame == 0 {
                    self.draw_title_screen(screen);
                }
                if fire_edge {
                    self.enter_effect(screen);
                }
            }
            Phase::Running => {
                if self.frame & 1 == 0 {
                    self.scroll_pos = (self.scroll_pos + 1) % MESSAGE.len();
                }
                self.wave_offset = self.wave_offset.wrapping_add(1);
                if self.frame & 3 == 0 {
                    self.color_offset = self.color_offset.wrapping_add(1);
                }
                self.draw_scroll(screen);
            }
        }

        self.prev_fire = input.fire;
        self.frame += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running() -> (Scroller, Screen, Sid) {
        let mut demo = Scroller::new();
        let mut screen = Screen::new();
        let mut sid = Sid::new();
        demo.tick(Joystick::default(), &mut screen, &mut sid);
        demo.tick(Joystick::fire_only(), &mut screen, &mut sid);
        (demo, screen, sid)
    }

    #[test]
    fn one_glyph_per_column_inside_the_band() {
        let (mut demo, mut screen, mut sid) = running();
        demo.tick(Joystick::default(), &mut screen, &mut sid);
        for x in 0..SCREEN_W {
            let glyphs: Vec<usize> = (8..=16)
                .filter(|&y| screen.char_at(x, y) != charset::SPACE)
                .collect();
            assert!(glyphs.len() <= 1);
        }
    }

    #[test]
    fn scroll_advances_every_other_frame() {
        let (mut demo, mut screen, mut sid) = running();
        let start = demo.scroll_pos;
        for _ in 0..8 {
            demo.tick(Joystick::default(), &mut screen, &mut sid);
        }
        assert_eq!(demo.scroll_pos, start + 4);
    }

    #[test]
    fn glyph_colors_come_from_the_rainbow() {
        let (mut demo, mut screen, mut sid) = running();
        demo.tick(Joystick::default(), &mut screen, &mut sid);
        for x in 0..SCREEN_W {
            for y in 8..=16 {
                if screen.char_at(x, y) != charset::SPACE {
                    assert!(RAINBOW.contains(&screen.color_at(x, y)));
                }
            }
        }
    }

    #[test]
    fn scroll_position_wraps_at_message_end() {
        let (mut demo, mut screen, mut sid) = running();
        for _ in 0..2 * MESSAGE.len() {
            demo.tick(Joystick::default(), &mut screen, &mut sid);
        }
        assert!(demo.scroll_pos < MESSAGE.len());
    }
}
