//! Flame effect: a 40x20 heat buffer fed from a hot bottom row, averaged
//! upward with random cooling, and mapped through an 8-entry fire palette
//! onto solid blocks.

use super::Demo;
use crate::charset;
use crate::joystick::Joystick;
use crate::sid::Sid;
use crate::vic::{Color, Screen};

const FIRE_W: usize = 40;
const FIRE_H: usize = 20;
const FIRE_START_ROW: usize = 5;

/// Heat value to C64 color, black through white.
const FIRE_COLORS: [u8; 8] = [0, 9, 2, 10, 8, 7, 7, 1];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Title,
    Running,
}

pub struct Fire {
    phase: Phase,
    /// One extra row at the bottom holds the generated heat source.
    heat: [[u8; FIRE_W]; FIRE_H + 1],
    lfsr: u8,
    frame: u32,
    prev_fire: bool,
}

impl Fire {
    pub fn new(seed: u64) -> Self {
        let lfsr = seed as u8;
        Self {
            phase: Phase::Title,
            heat: [[0; FIRE_W]; FIRE_H + 1],
            lfsr: if lfsr == 0 { 0x42 } else { lfsr },
            frame: 0,
            prev_fire: false,
        }
    }

    fn fast_rand(&mut self) -> u8 {
        self.lfsr = (self.lfsr >> 1) ^ ((self.lfsr & 1).wrapping_neg() & 0xB8);
        self.lfsr
    }

    fn draw_title(&self, screen: &mut Screen) {
        screen.clear();
        screen.background = Color::Black as u8;
        screen.border = Color::Black as u8;
        screen.text(16, 10, "F I R E", Color::Orange as u8);
        screen.text(12, 13, "FLAME EFFECT DEMO", Color::Yellow as u8);
        screen.text(10, 16, "PRESS FIRE TO START", Color::LightGrey as u8);
    }

    fn enter_effect(&mut self, screen: &mut Screen) {
        screen.fill(charset::BLOCK, Color::Black as u8);
        screen.background = Color::Black as u8;
        screen.border = Color::Black as u8;
        self.heat = [[0; FIRE_W]; FIRE_H + 1];
        self.phase = Phase::Running;
    }

    fn generate_heat(&mut self) {
        for x in 0..FIRE_W {
            self.heat[FIRE_H][x] = 5 + (self.fast_rand() & 3);
        }
    }

    fn propagate(&mut self) {
        for y in 0..FIRE_H {
            let below = self.heat[y + 1];

            let sum = 2 * below[0] as u16 + below[1] as u16;
            let mut v = ((sum >> 2) + (sum >> 4)) as u8;
            if v > 0 && self.fast_rand() & 7 == 0 {
                v -= 1;
            }
            self.heat[y][0] = v;

            for x in 1..FIRE_W - 1 {
                let sum =
                    below[x - 1] as u16 + 2 * below[x] as u16 + below[x + 1] as u16;
                let mut v = (sum >> 2) as u8;
                if v > 0 && self.fast_rand() & 15 == 0 {
                    v -= 1;
                }
                self.heat[y][x] = v;
            }

            let sum = below[FIRE_W - 2] as u16 + 2 * below[FIRE_W - 1] as u16;
            let mut v = ((sum >> 2) + (sum >> 4)) as u8;
            if v > 0 && self.fast_rand() & 7 == 0 {
                v -= 1;
            }
            self.heat[y][FIRE_W - 1] = v;
        }
    }

    fn render(&self, screen: &mut Screen) {
        for y in 0..FIRE_H {
            for x in 0..FIRE_W {
                let val = self.heat[y][x].min(7) as usize;
                screen.set(x, FIRE_START_ROW + y, charset::BLOCK, FIRE_COLORS[val]);
            }
        }
    }
}

impl Demo for Fire {
    fn tick(&mut self, input: Joystick, screen: &mut Screen, _sid: &mut Sid) {
        let fire_edge = input.fire && !self.prev_fire;

        match self.phase {
            Phase::Title => {
                if self.frame == 0 {
                    self.draw_title(screen);
                }
                if fire_edge {
                    self.enter_effect(screen);
                }
            }
            Phase::Running => {
                self.generate_heat();
                self.propagate();
                self.render(screen);
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

    fn running() -> (Fire, Screen, Sid) {
        let mut demo = Fire::new(7);
        let mut screen = Screen::new();
        let mut sid = Sid::new();
        demo.tick(Joystick::default(), &mut screen, &mut sid);
        demo.tick(Joystick::fire_only(), &mut screen, &mut sid);
        (demo, screen, sid)
    }

    #[test]
    fn heat_source_stays_in_range() {
        let (mut demo, mut screen, mut sid) = running();
        for _ in 0..50 {
            demo.tick(Joystick::default(), &mut screen, &mut sid);
            for &v in &demo.heat[FIRE_H] {
                assert!((5..=8).contains(&v));
            }
        }
    }

    #[test]
    fn flames_rise_after_a_few_frames() {
        let (mut demo, mut screen, mut sid) = running();
        for _ in 0..FIRE_H {
            demo.tick(Joystick::default(), &mut screen, &mut sid);
        }
        let top_half: u32 = demo.heat[..FIRE_H / 2]
            .iter()
            .flatten()
            .map(|&v| v as u32)
            .sum();
        assert!(top_half > 0);
    }

    #[test]
    fn rendered_cells_use_the_fire_palette() {
        let (_, screen, _) = running();
        for y in FIRE_START_ROW..FIRE_START_ROW + FIRE_H {
            for x in 0..FIRE_W {
                assert_eq!(screen.char_at(x, y), charset::BLOCK);
                assert!(FIRE_COLORS.contains(&screen.color_at(x, y)));
            }
        }
    }

    proptest! {
        #[test]
        fn propagation_never_amplifies_heat(seed in 1u64..u64::MAX) {
            let mut demo = Fire::new(seed);
            demo.generate_heat();
            for _ in 0..30 {
                let max_before =
                    demo.heat.iter().flatten().copied().max().unwrap_or(0);
                demo.propagate();
                demo.generate_heat();
                let max_after =
                    demo.heat[..FIRE_H].iter().flatten().copied().max().unwrap_or(0);
                prop_assert!(max_after <= max_before.max(8));
            }
        }
    }
}
