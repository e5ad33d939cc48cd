//! Three-layer starfield. Stars fly out from the screen center at a speed
//! set by their depth layer and respawn near the center once they drift
//! off the 40x25 grid.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::Demo;
use crate::charset;
use crate::joystick::Joystick;
use crate::sid::Sid;
use crate::vic::{Color, Screen, SCREEN_H, SCREEN_W};

const STARS_FAR: usize = 25;
const STARS_MED: usize = 20;
const STARS_NEAR: usize = 15;
const TOTAL_STARS: usize = STARS_FAR + STARS_MED + STARS_NEAR;

const CENTER_X: i32 = 20;
const CENTER_Y: i32 = 12;

#[derive(Debug, Clone, Copy)]
struct Star {
    x: i32,
    y: i32,
    dx: i32,
    dy: i32,
    layer: u8,
}

impl Star {
    fn glyph(&self) -> (u8, u8) {
        match self.layer {
            0 => (charset::DOT, Color::DarkGrey as u8),
            1 => (charset::BALL, Color::Grey as u8),
            _ => (charset::DIAMOND, Color::White as u8),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Title,
    Running,
}

pub struct Starfield {
    phase: Phase,
    stars: [Star; TOTAL_STARS],
    frame: u32,
    prev_fire: bool,
    rng: Pcg32,
}

impl Starfield {
    pub fn new(seed: u64) -> Self {
        Self {
            phase: Phase::Title,
            stars: [Star {
                x: 0,
                y: 0,
                dx: 1,
                dy: 0,
                layer: 0,
            }; TOTAL_STARS],
            frame: 0,
            prev_fire: false,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    fn layer_for(i: usize) -> u8 {
        if i < STARS_FAR {
            0
        } else if i < STARS_FAR + STARS_MED {
            1
        } else {
            2
        }
    }

    /// Respawn a star near the center with a random outward direction.
    fn init_star(&mut self, i: usize) {
        let (mut dx, mut dy) = (0, 0);
        while dx == 0 && dy == 0 {
            dx = self.rng.gen_range(-2..=2);
            dy = self.rng.gen_range(-2..=2);
        }
        self.stars[i] = Star {
            x: CENTER_X + self.rng.gen_range(-2..=2),
            y: CENTER_Y + self.rng.gen_range(-1..=1),
            dx,
            dy,
            layer: Self::layer_for(i),
        };
    }

    fn init_stars(&mut self) {
        for i in 0..TOTAL_STARS {
            self.init_star(i);
            // First generation is scattered over the whole screen
            self.stars[i].x = self.rng.gen_range(0..SCREEN_W as i32);
            self.stars[i].y = self.rng.gen_range(0..SCREEN_H as i32);
        }
    }

    fn draw_title_screen(&self, screen: &mut Screen) {
        screen.clear();
        screen.background = Color::Black as u8;
        screen.border = Color::Black as u8;
        screen.text(12, 10, "S T A R F I E L D", Color::White as u8);
        screen.text(10, 13, "FLYING THROUGH SPACE", Color::LightGrey as u8);
        screen.text(10, 16, "PRESS FIRE TO START", Color::Grey as u8);
    }

    fn move_stars(&mut self, screen: &mut Screen) {
        for i in 0..TOTAL_STARS {
            let star = self.stars[i];
            if (0..SCREEN_W as i32).contains(&star.x)
                && (0..SCREEN_H as i32).contains(&star.y)
            {
                screen.set_char(star.x as usize, star.y as usize, charset::SPACE);
            }

            let speed = star.layer as i32 + 1;
            let new_x = star.x + star.dx * speed / 2;
            let new_y = star.y + star.dy * speed / 2;

            if !(0..SCREEN_W as i32).contains(&new_x)
                || !(0..SCREEN_H as i32).contains(&new_y)
            {
                self.init_star(i);
            } else {
                self.stars[i].x = new_x;
                self.stars[i].y = new_y;
            }

            let star = self.stars[i];
            let (chr, col) = star.glyph();
            screen.set(star.x as usize, star.y as usize, chr, col);
        }
    }

    fn draw_banner(&self, screen: &mut Screen) {
        screen.text(14, 0, "STARFIELD", Color::White as u8);
    }
}

impl Demo for Starfield {
    fn tick(&mut self, input: Joystick, screen: &mut Screen, _sid: &mut Sid) {
        let fire_edge = input.fire && !self.prev_fire;

        match self.phase {
            Phase::Title => {
                if self.frame == 0 {
                    self.draw_title_screen(screen);
                }
                if fire_edge {
                    screen.clear();
                    self.init_stars();
                    self.phase = Phase::Running;
                }
            }
            Phase::Running => {
                self.move_stars(screen);
                // Redrawn rarely to limit flicker over passing stars
                if self.frame & 63 == 0 {
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

    fn running() -> (Starfield, Screen, Sid) {
        let mut demo = Starfield::new(3);
        let mut screen = Screen::new();
        let mut sid = Sid::new();
        demo.tick(Joystick::default(), &mut screen, &mut sid);
        demo.tick(Joystick::fire_only(), &mut screen, &mut sid);
        (demo, screen, sid)
    }

    #[test]
    fn stars_stay_on_screen() {
        let (mut demo, mut screen, mut sid) = running();
        for _ in 0..200 {
            demo.tick(Joystick::default(), &mut screen, &mut sid);
            for star in &demo.stars {
                assert!((0..SCREEN_W as i32).contains(&star.x));
                assert!((0..SCREEN_H as i32).contains(&star.y));
            }
        }
    }

    #[test]
    fn layers_keep_their_population() {
        let (mut demo, mut screen, mut sid) = running();
        for _ in 0..100 {
            demo.tick(Joystick::default(), &mut screen, &mut sid);
        }
        let far = demo.stars.iter().filter(|s| s.layer == 0).count();
        let med = demo.stars.iter().filter(|s| s.layer == 1).count();
        let near = demo.stars.iter().filter(|s| s.layer == 2).count();
        assert_eq!((far, med, near), (STARS_FAR, STARS_MED, STARS_NEAR));
    }

    #[test]
    fn respawned_stars_always_move() {
        let (mut demo, mut screen, mut sid) = running();
        for _ in 0..300 {
            demo.tick(Joystick::default(), &mut screen, &mut sid);
            for star in &demo.stars {
                assert!(star.dx != 0 || star.dy != 0);
            }
        }
    }
}
