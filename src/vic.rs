//! VIC-II style text screen: 40x25 screen RAM, color RAM, border/background
//! colors, 8 single-color sprites, and a minifb window that rasterizes it all.
//!
//! `Screen` is a pure model so demos (and tests) can poke it without a window;
//! `Display` owns the window and the pixel buffer.

use minifb::{Scale, Window, WindowOptions};
use thiserror::Error;

use crate::charset;

pub const SCREEN_W: usize = 40;
pub const SCREEN_H: usize = 25;
pub const SCREEN_CELLS: usize = SCREEN_W * SCREEN_H;

/// Character pixel area (320x200).
pub const PIXELS_W: usize = SCREEN_W * 8;
pub const PIXELS_H: usize = SCREEN_H * 8;

const BORDER_H: usize = 32;
const BORDER_V: usize = 36;

/// Display size including borders.
pub const DISPLAY_W: usize = PIXELS_W + 2 * BORDER_H;
pub const DISPLAY_H: usize = PIXELS_H + 2 * BORDER_V;

/// Sprite coordinate origin: sprite (24, 50) sits at the top-left of the
/// character area, as on the real machine.
pub const SPRITE_X0: i32 = 24;
pub const SPRITE_Y0: i32 = 50;
pub const SPRITE_W: i32 = 24;
pub const SPRITE_H: i32 = 21;
pub const NUM_SPRITES: usize = 8;

/// The fixed C64 color set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Black = 0,
    White = 1,
    Red = 2,
    Cyan = 3,
    Purple = 4,
    Green = 5,
    Blue = 6,
    Yellow = 7,
    Orange = 8,
    Brown = 9,
    LightRed = 10,
    DarkGrey = 11,
    Grey = 12,
    LightGreen = 13,
    LightBlue = 14,
    LightGrey = 15,
}

/// RGB values for the 16 colors, 0x00RRGGBB as minifb wants them.
pub const PALETTE: [u32; 16] = [
    0x000000, // black
    0xFFFFFF, // white
    0x68372B, // red
    0x70A4B2, // cyan
    0x6F3D86, // purple
    0x588D43, // green
    0x352879, // blue
    0xB8C76F, // yellow
    0x6F4F25, // orange
    0x433900, // brown
    0x9A6759, // light red
    0x444444, // dark grey
    0x6C6C6C, // grey
    0x9AD284, // light green
    0x6C5EB5, // light blue
    0x959595, // light grey
];

/// A single-color hardware sprite: 24x21 pixels, 3 bytes per row.
#[derive(Debug, Clone, Copy)]
pub struct Sprite {
    pub enabled: bool,
    pub x: i32,
    pub y: i32,
    pub color: u8,
    pub data: [u8; 63],
}

impl Default for Sprite {
    fn default() -> Self {
        Self {
            enabled: false,
            x: SPRITE_X0,
            y: SPRITE_Y0,
            color: Color::White as u8,
            data: [0; 63],
        }
    }
}

/// Text screen model: screen RAM, color RAM, border/background, sprites.
#[derive(Debug, Clone)]
pub struct Screen {
    chars: [u8; SCREEN_CELLS],
    colors: [u8; SCREEN_CELLS],
    pub border: u8,
    pub background: u8,
    pub sprites: [Sprite; NUM_SPRITES],
}

impl Screen {
    pub fn new() -> Self {
        Self {
            chars: [charset::SPACE; SCREEN_CELLS],
            colors: [Color::LightBlue as u8; SCREEN_CELLS],
            border: Color::LightBlue as u8,
            background: Color::Blue as u8,
            sprites: [Sprite::default(); NUM_SPRITES],
        }
    }

    /// Clear screen RAM to spaces and disable all sprites.
    pub fn clear(&mut self) {
        self.chars = [charset::SPACE; SCREEN_CELLS];
        self.colors = [self.background; SCREEN_CELLS];
        for sprite in &mut self.sprites {
            sprite.enabled = false;
        }
    }

    /// Fill the whole screen with one character and color.
    pub fn fill(&mut self, code: u8, color: u8) {
        self.chars = [code; SCREEN_CELLS];
        self.colors = [color & 0x0F; SCREEN_CELLS];
    }

    /// Write one cell. Out-of-range coordinates are ignored, like a poke past
    /// the visible area.
    pub fn set(&mut self, x: usize, y: usize, code: u8, color: u8) {
        if x < SCREEN_W && y < SCREEN_H {
            let pos = y * SCREEN_W + x;
            self.chars[pos] = code;
            self.colors[pos] = color & 0x0F;
        }
    }

    /// Write a character, keeping the cell's color.
    pub fn set_char(&mut self, x: usize, y: usize, code: u8) {
        if x < SCREEN_W && y < SCREEN_H {
            self.chars[y * SCREEN_W + x] = code;
        }
    }

    /// Write color RAM only.
    pub fn set_color(&mut self, x: usize, y: usize, color: u8) {
        if x < SCREEN_W && y < SCREEN_H {
            self.colors[y * SCREEN_W + x] = color & 0x0F;
        }
    }

    pub fn char_at(&self, x: usize, y: usize) -> u8 {
        if x < SCREEN_W && y < SCREEN_H {
            self.chars[y * SCREEN_W + x]
        } else {
            charset::SPACE
        }
    }

    pub fn color_at(&self, x: usize, y: usize) -> u8 {
        if x < SCREEN_W && y < SCREEN_H {
            self.colors[y * SCREEN_W + x]
        } else {
            0
        }
    }

    /// Write text left to right, converting ASCII to screen codes. Clips at
    /// the right edge.
    pub fn text(&mut self, x: usize, y: usize, s: &str, color: u8) {
        for (i, ch) in s.bytes().enumerate() {
            self.set(x + i, y, charset::from_ascii(ch), color);
        }
    }

    /// Center a line of text.
    pub fn text_centered(&mut self, y: usize, s: &str, color: u8) {
        let x = (SCREEN_W.saturating_sub(s.len())) / 2;
        self.text(x, y, s, color);
    }

    /// Rasterize into a DISPLAY_W x DISPLAY_H pixel buffer: border, then the
    /// character matrix through the charset, then sprites on top.
    pub fn rasterize(&self, frame: &mut [u32]) {
        debug_assert_eq!(frame.len(), DISPLAY_W * DISPLAY_H);
        let border = PALETTE[(self.border & 0x0F) as usize];
        let background = PALETTE[(self.background & 0x0F) as usize];

        for px in frame.iter_mut() {
            *px = border;
        }

        for cy in 0..SCREEN_H {
            for cx in 0..SCREEN_W {
                let pos = cy * SCREEN_W + cx;
                let glyph = charset::glyph(self.chars[pos]);
                let fg = PALETTE[self.colors[pos] as usize];
                let base = (BORDER_V + cy * 8) * DISPLAY_W + BORDER_H + cx * 8;
                for (row, bits) in glyph.iter().enumerate() {
                    let line = base + row * DISPLAY_W;
                    for bit in 0..8 {
                        frame[line + bit] = if bits & (0x80 >> bit) != 0 {
                            fg
                        } else {
                            background
                        };
                    }
                }
            }
        }

        for sprite in self.sprites.iter().filter(|s| s.enabled) {
            self.rasterize_sprite(sprite, frame);
        }
    }

    fn rasterize_sprite(&self, sprite: &Sprite, frame: &mut [u32]) {
        let color = PALETTE[(sprite.color & 0x0F) as usize];
        for row in 0..SPRITE_H {
            let py = sprite.y - SPRITE_Y0 + row + BORDER_V as i32;
            if py < 0 || py >= DISPLAY_H as i32 {
                continue;
            }
            for col in 0..SPRITE_W {
                let byte = sprite.data[(row * 3 + col / 8) as usize];
                if byte & (0x80 >> (col % 8)) == 0 {
                    continue;
                }
                let px = sprite.x - SPRITE_X0 + col + BORDER_H as i32;
                if px < 0 || px >= DISPLAY_W as i32 {
                    continue;
                }
                frame[py as usize * DISPLAY_W + px as usize] = color;
            }
        }
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("failed to open window: {0}")]
    Window(#[from] minifb::Error),
}

/// PAL frame time, ~50 Hz.
const FRAME_MICROS: u64 = 20_000;

/// The minifb window plus its pixel buffer. Presenting is the stand-in for
/// the raster-poll frame lock of the originals: minifb's update-rate limit
/// holds the loop to one frame per PAL field.
pub struct Display {
    window: Window,
    frame: Vec<u32>,
}

impl Display {
    pub fn new(title: &str, scale: Scale) -> Result<Self, DisplayError> {
        let mut window = Window::new(
            title,
            DISPLAY_W,
            DISPLAY_H,
            WindowOptions {
                scale,
                ..WindowOptions::default()
            },
        )?;
        window.limit_update_rate(Some(std::time::Duration::from_micros(FRAME_MICROS)));
        Ok(Self {
            window,
            frame: vec![0; DISPLAY_W * DISPLAY_H],
        })
    }

    pub fn present(&mut self, screen: &Screen) -> Result<(), DisplayError> {
        screen.rasterize(&mut self.frame);
        self.window
            .update_with_buffer(&self.frame, DISPLAY_W, DISPLAY_H)?;
        Ok(())
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open() && !self.window.is_key_down(minifb::Key::Escape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn text_converts_ascii_to_screen_codes() {
        let mut screen = Screen::new();
        screen.text(3, 5, "AZ 09", Color::White as u8);
        assert_eq!(screen.char_at(3, 5), 1); // A
        assert_eq!(screen.char_at(4, 5), 26); // Z
        assert_eq!(screen.char_at(5, 5), charset::SPACE);
        assert_eq!(screen.char_at(6, 5), b'0');
        assert_eq!(screen.char_at(7, 5), b'9');
        assert_eq!(screen.color_at(3, 5), Color::White as u8);
    }

    #[test]
    fn set_clips_out_of_range() {
        let mut screen = Screen::new();
        screen.set(SCREEN_W, 0, charset::BLOCK, 1);
        screen.set(0, SCREEN_H, charset::BLOCK, 1);
        for y in 0..SCREEN_H {
            for x in 0..SCREEN_W {
                assert_eq!(screen.char_at(x, y), charset::SPACE);
            }
        }
    }

    #[test]
    fn rasterize_solid_block_cell() {
        let mut screen = Screen::new();
        screen.background = Color::Black as u8;
        screen.border = Color::Black as u8;
        screen.set(0, 0, charset::BLOCK, Color::Red as u8);

        let mut frame = vec![0u32; DISPLAY_W * DISPLAY_H];
        screen.rasterize(&mut frame);

        let red = PALETTE[Color::Red as usize];
        for row in 0..8 {
            for col in 0..8 {
                let px = frame[(BORDER_V + row) * DISPLAY_W + BORDER_H + col];
                assert_eq!(px, red);
            }
        }
        // Neighbor cell stays background
        assert_eq!(frame[BORDER_V * DISPLAY_W + BORDER_H + 8], PALETTE[0]);
    }

    #[test]
    fn sprite_draws_over_characters() {
        let mut screen = Screen::new();
        screen.background = Color::Black as u8;
        screen.fill(charset::BLOCK, Color::Blue as u8);

        let sprite = &mut screen.sprites[0];
        sprite.enabled = true;
        sprite.x = SPRITE_X0;
        sprite.y = SPRITE_Y0;
        sprite.color = Color::White as u8;
        sprite.data[0] = 0x80; // single pixel, top-left

        let mut frame = vec![0u32; DISPLAY_W * DISPLAY_H];
        screen.rasterize(&mut frame);
        assert_eq!(
            frame[BORDER_V * DISPLAY_W + BORDER_H],
            PALETTE[Color::White as usize]
        );
        assert_eq!(
            frame[BORDER_V * DISPLAY_W + BORDER_H + 1],
            PALETTE[Color::Blue as usize]
        );
    }

    #[test]
    fn sprite_clips_at_display_edges() {
        let mut screen = Screen::new();
        let sprite = &mut screen.sprites[0];
        sprite.enabled = true;
        sprite.x = -40;
        sprite.y = -40;
        sprite.data = [0xFF; 63];

        let mut frame = vec![0u32; DISPLAY_W * DISPLAY_H];
        // Must not panic
        screen.rasterize(&mut frame);
    }
}
