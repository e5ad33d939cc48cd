//! Raster bars: six five-line gradient stripes riding the same sine wave
//! at staggered phases, redrawn into color RAM every frame over a screen
//! of solid blocks.

use super::Demo;
use crate::charset;
use crate::joystick::Joystick;
use crate::sid::Sid;
use crate::vic::{Color, Screen, SCREEN_H, SCREEN_W};

const NUM_BARS: usize = 6;
const BAR_HEIGHT: usize = 5;

/// Gradient per bar, dark edges toward a bright core.
#[rustfmt::skip]
const BAR_COLORS: [[u8; BAR_HEIGHT]; NUM_BARS] = [
    [0,  9, 2, 10, 2],
    [0,  9, 8,  7, 8],
    [0, 11, 5, 13, 5],
    [0, 11, 6, 14, 6],
    [0, 11, 4, 10, 4],
    [0, 11, 3,  1, 3],
];

#[rustfmt::skip]
const SINETAB: [u8; 32] = [
    12, 14, 16, 17, 19, 20, 21, 21,
    22, 21, 21, 20, 19, 17, 16, 14,
    12, 10,  8,  7,  5,  4,  3,  3,
     2,  3,  3,  4,  5,  7,  8, 10,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Title,
    Running,
}

pub struct RasterBars {
    phase: Phase,
    bar_phase: [u8; NUM_BARS],
    frame: u32,
    prev_fire: bool,
}

impl RasterBars {
    pub fn new() -> Self {
        let mut bar_phase = [0; NUM_BARS];
        for (i, p) in bar_phase.iter_mut().enumerate() {
            *p = (i * 5) as u8;
        }
        Self {
            phase: Phase::Title,
            bar_phase,
            frame: 0,
            prev_fire: false,
        }
    }

    fn draw_title_screen(&self, screen: &mut Screen) {
        screen.clear();
        screen.background = Color::Black as u8;
        screen.border = Color::Black as u8;
        screen.text(10, 10, "R A S T E R  B A R S", Color::White as u8);
        screen.text(9, 13, "COLORFUL MOVING STRIPES", Color::Cyan as u8);
        screen.text(10, 16, "PRESS FIRE TO START", Color::LightGrey as u8);
    }

    fn enter_effect(&mut self, screen: &mut Screen) {
        screen.fill(charset::BLOCK, Color::Black as u8);
        self.phase = Phase::Running;
    }

    fn draw_bar(&self, screen: &mut Screen, bar: usize, row: usize) {
        for y in 0..BAR_HEIGHT {
            if row + y >= SCREEN_H {
                continue;
            }
            let color = BAR_COLORS[bar][y];
            for x in 0..SCREEN_W {
                // A brighter bar wins where two overlap
                let current = screen.color_at(x, row + y);
                if current < color || current == Color::Black as u8 {
                    screen.set_color(x, row + y, color);
                }
            }
        }
    }

    fn update_bars(&mut self, screen: &mut Screen) {
        for y in 0..SCREEN_H {
            for x in 0..SCREEN_W {
                screen.set_color(x, y, Color::Black as u8);
            }
        }
        for i in 0..NUM_BARS {
            self.bar_phase[i] = self.bar_phase[i].wrapping_add(1);
            let row = SINETAB[(self.bar_phase[i] & 31) as usize] as usize;
            self.draw_bar(screen, i, row);
        }
    }

    fn draw_banner(&self, screen: &mut Screen) {
        screen.text(12, 0, "RASTER BARS", Color::White as u8);
    }
}

impl Default for RasterBars {
    fn default() -> Self {
        Self::new()
    }
}

impl Demo for RasterBars {
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
                self.update_bars(screen);
                if self.frame & 15 == 0 {
                    self.draw_banner(screen);
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

    fn running() -> (RasterBars, Screen, Sid) {
        let mut demo = RasterBars::new();
        let mut screen = Screen::new();
        let mut sid = Sid::new();
        demo.tick(Joystick::default(), &mut screen, &mut sid);
        demo.tick(Joystick::fire_only(), &mut screen, &mut sid);
        (demo, screen, sid)
    }

    #[test]
    fn bars_paint_gradient_rows() {
        let (mut demo, mut screen, mut sid) = running();
        demo.tick(Joystick::default(), &mut screen, &mut sid);
        let painted = (0..SCREEN_H)
            .filter(|&y| screen.color_at(0, y) != Color::Black as u8)
            .count();
        assert!(painted > 0);
        for y in 0..SCREEN_H {
            assert_eq!(screen.char_at(0, y), charset::BLOCK);
        }
    }

    #[test]
    fn bar_rows_follow_the_sine_table() {
        let (mut demo, mut screen, mut sid) = running();
        for _ in 0..40 {
            demo.tick(Joystick::default(), &mut screen, &mut sid);
            // Row 0 belongs to the banner overlay
            for y in 1..SCREEN_H {
                for x in 0..SCREEN_W {
                    if screen.color_at(x, y) != Color::Black as u8 {
                        let min = *SINETAB.iter().min().unwrap() as usize;
                        let max = *SINETAB.iter().max().unwrap() as usize;
                        assert!(y + 1 >= min && y < max + BAR_HEIGHT);
                    }
                }
            }
        }
    }

    #[test]
    fn overlapping_bars_keep_the_brighter_color() {
        let (mut demo, mut screen, _) = running();
        screen.set_color(5, 10, 14);
        demo.draw_bar(&mut screen, 0, 9);
        // Row 10 carries gradient value 9 which must not beat 14
        assert_eq!(screen.color_at(5, 10), 14);
    }
}
