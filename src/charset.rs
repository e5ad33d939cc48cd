//! 8x8 glyphs for the screen-code subset the demos use.
//!
//! Codes follow the C64 screen-code layout: 0 = `@`, 1-26 = `A`-`Z`,
//! 32-63 = ASCII punctuation and digits, 64-127 graphics. Bit 7 selects
//! reverse video, which makes 160 (reverse space) the solid block.

pub const SPACE: u8 = 32;
pub const STAR: u8 = 42;
pub const DOT: u8 = 46;
pub const VBAR: u8 = 66;
pub const HBAR: u8 = 67;
pub const BALL: u8 = 81;
pub const HEART: u8 = 83;
pub const CIRCLE: u8 = 87;
pub const DIAMOND: u8 = 90;
pub const SHADE: u8 = 102;
pub const SNOWFLAKE: u8 = 120;
pub const BLOCK: u8 = 160;

/// ASCII byte to screen code. Lowercase folds to uppercase.
pub fn from_ascii(ch: u8) -> u8 {
    match ch {
        b'@' => 0,
        b'A'..=b'Z' => ch - 64,
        b'a'..=b'z' => ch - 96,
        b'[' => 27,
        b']' => 29,
        b' '..=b'?' => ch,
        _ => SPACE,
    }
}

/// Glyph bitmap for a screen code, one byte per row, MSB leftmost.
pub fn glyph(code: u8) -> [u8; 8] {
    let bits = base_glyph(code & 0x7F);
    if code & 0x80 != 0 {
        let mut inverted = [0u8; 8];
        for (i, row) in bits.iter().enumerate() {
            inverted[i] = !row;
        }
        inverted
    } else {
        bits
    }
}

#[rustfmt::skip]
fn base_glyph(code: u8) -> [u8; 8] {
    match code {
        0 => [0x3C, 0x66, 0x6E, 0x6E, 0x60, 0x62, 0x3C, 0x00], // @
        1 => [0x18, 0x3C, 0x66, 0x7E, 0x66, 0x66, 0x66, 0x00], // A
        2 => [0x7C, 0x66, 0x66, 0x7C, 0x66, 0x66, 0x7C, 0x00], // B
        3 => [0x3C, 0x66, 0x60, 0x60, 0x60, 0x66, 0x3C, 0x00], // C
        4 => [0x78, 0x6C, 0x66, 0x66, 0x66, 0x6C, 0x78, 0x00], // D
        5 => [0x7E, 0x60, 0x60, 0x78, 0x60, 0x60, 0x7E, 0x00], // E
        6 => [0x7E, 0x60, 0x60, 0x78, 0x60, 0x60, 0x60, 0x00], // F
        7 => [0x3C, 0x66, 0x60, 0x6E, 0x66, 0x66, 0x3C, 0x00], // G
        8 => [0x66, 0x66, 0x66, 0x7E, 0x66, 0x66, 0x66, 0x00], // H
        9 => [0x3C, 0x18, 0x18, 0x18, 0x18, 0x18, 0x3C, 0x00], // I
        10 => [0x1E, 0x0C, 0x0C, 0x0C, 0x0C, 0x6C, 0x38, 0x00], // J
        11 => [0x66, 0x6C, 0x78, 0x70, 0x78, 0x6C, 0x66, 0x00], // K
        12 => [0x60, 0x60, 0x60, 0x60, 0x60, 0x60, 0x7E, 0x00], // L
        13 => [0x63, 0x77, 0x7F, 0x6B, 0x63, 0x63, 0x63, 0x00], // M
        14 => [0x66, 0x76, 0x7E, 0x7E, 0x6E, 0x66, 0x66, 0x00], // N
        15 => [0x3C, 0x66, 0x66, 0x66, 0x66, 0x66, 0x3C, 0x00], // O
        16 => [0x7C, 0x66, 0x66, 0x7C, 0x60, 0x60, 0x60, 0x00], // P
        17 => [0x3C, 0x66, 0x66, 0x66, 0x66, 0x3C, 0x0E, 0x00], // Q
        18 => [0x7C, 0x66, 0x66, 0x7C, 0x78, 0x6C, 0x66, 0x00], // R
        19 => [0x3C, 0x66, 0x60, 0x3C, 0x06, 0x66, 0x3C, 0x00], // S
        20 => [0x7E, 0x18, 0x18, 0x18, 0x18, 0x18, 0x18, 0x00], // T
        21 => [0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x3C, 0x00], // U
        22 => [0x66, 0x66, 0x66, 0x66, 0x66, 0x3C, 0x18, 0x00], // V
        23 => [0x63, 0x63, 0x63, 0x6B, 0x7F, 0x77, 0x63, 0x00], // W
        24 => [0x66, 0x66, 0x3C, 0x18, 0x3C, 0x66, 0x66, 0x00], // X
        25 => [0x66, 0x66, 0x66, 0x3C, 0x18, 0x18, 0x18, 0x00], // Y
        26 => [0x7E, 0x06, 0x0C, 0x18, 0x30, 0x60, 0x7E, 0x00], // Z
        27 => [0x3C, 0x30, 0x30, 0x30, 0x30, 0x30, 0x3C, 0x00], // [
        29 => [0x3C, 0x0C, 0x0C, 0x0C, 0x0C, 0x0C, 0x3C, 0x00], // ]
        33 => [0x18, 0x18, 0x18, 0x18, 0x00, 0x00, 0x18, 0x00], // !
        34 => [0x66, 0x66, 0x66, 0x00, 0x00, 0x00, 0x00, 0x00], // "
        35 => [0x66, 0x66, 0xFF, 0x66, 0xFF, 0x66, 0x66, 0x00], // #
        36 => [0x18, 0x3E, 0x60, 0x3C, 0x06, 0x7C, 0x18, 0x00], // $
        37 => [0x62, 0x66, 0x0C, 0x18, 0x30, 0x66, 0x46, 0x00], // %
        38 => [0x3C, 0x66, 0x3C, 0x38, 0x67, 0x66, 0x3F, 0x00], // &
        39 => [0x06, 0x0C, 0x18, 0x00, 0x00, 0x00, 0x00, 0x00], // '
        40 => [0x0C, 0x18, 0x30, 0x30, 0x30, 0x18, 0x0C, 0x00], // (
        41 => [0x30, 0x18, 0x0C, 0x0C, 0x0C, 0x18, 0x30, 0x00], // )
        42 => [0x00, 0x66, 0x3C, 0xFF, 0x3C, 0x66, 0x00, 0x00], // *
        43 => [0x00, 0x18, 0x18, 0x7E, 0x18, 0x18, 0x00, 0x00], // +
        44 => [0x00, 0x00, 0x00, 0x00, 0x00, 0x18, 0x18, 0x30], // ,
        45 => [0x00, 0x00, 0x00, 0x7E, 0x00, 0x00, 0x00, 0x00], // -
        46 => [0x00, 0x00, 0x00, 0x00, 0x00, 0x18, 0x18, 0x00], // .
        47 => [0x00, 0x03, 0x06, 0x0C, 0x18, 0x30, 0x60, 0x00], // /
        48 => [0x3C, 0x66, 0x6E, 0x76, 0x66, 0x66, 0x3C, 0x00], // 0
        49 => [0x18, 0x18, 0x38, 0x18, 0x18, 0x18, 0x7E, 0x00], // 1
        50 => [0x3C, 0x66, 0x06, 0x0C, 0x30, 0x60, 0x7E, 0x00], // 2
        51 => [0x3C, 0x66, 0x06, 0x1C, 0x06, 0x66, 0x3C, 0x00], // 3
        52 => [0x06, 0x0E, 0x1E, 0x66, 0x7F, 0x06, 0x06, 0x00], // 4
        53 => [0x7E, 0x60, 0x7C, 0x06, 0x06, 0x66, 0x3C, 0x00], // 5
        54 => [0x3C, 0x66, 0x60, 0x7C, 0x66, 0x66, 0x3C, 0x00], // 6
        55 => [0x7E, 0x66, 0x0C, 0x18, 0x18, 0x18, 0x18, 0x00], // 7
        56 => [0x3C, 0x66, 0x66, 0x3C, 0x66, 0x66, 0x3C, 0x00], // 8
        57 => [0x3C, 0x66, 0x66, 0x3E, 0x06, 0x66, 0x3C, 0x00], // 9
        58 => [0x00, 0x00, 0x18, 0x00, 0x00, 0x18, 0x00, 0x00], // :
        59 => [0x00, 0x00, 0x18, 0x00, 0x00, 0x18, 0x18, 0x30], // ;
        60 => [0x0E, 0x18, 0x30, 0x60, 0x30, 0x18, 0x0E, 0x00], // <
        61 => [0x00, 0x00, 0x7E, 0x00, 0x7E, 0x00, 0x00, 0x00], // =
        62 => [0x70, 0x18, 0x0C, 0x06, 0x0C, 0x18, 0x70, 0x00], // >
        63 => [0x3C, 0x66, 0x06, 0x0C, 0x18, 0x00, 0x18, 0x00], // ?
        66 => [0x18, 0x18, 0x18, 0x18, 0x18, 0x18, 0x18, 0x18], // vertical bar
        67 => [0x00, 0x00, 0x00, 0xFF, 0x00, 0x00, 0x00, 0x00], // horizontal bar
        81 => [0x00, 0x3C, 0x7E, 0x7E, 0x7E, 0x7E, 0x3C, 0x00], // filled ball
        83 => [0x36, 0x7F, 0x7F, 0x7F, 0x3E, 0x1C, 0x08, 0x00], // heart
        87 => [0x00, 0x3C, 0x42, 0x42, 0x42, 0x42, 0x3C, 0x00], // open circle
        90 => [0x08, 0x1C, 0x3E, 0x7F, 0x3E, 0x1C, 0x08, 0x00], // diamond
        102 => [0x55, 0xAA, 0x55, 0xAA, 0x55, 0xAA, 0x55, 0xAA], // checkered shade
        120 => [0x00, 0x08, 0x2A, 0x1C, 0x1C, 0x2A, 0x08, 0x00], // snowflake
        _ => [0x00; 8],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_mapping_matches_screen_codes() {
        assert_eq!(from_ascii(b'@'), 0);
        assert_eq!(from_ascii(b'A'), 1);
        assert_eq!(from_ascii(b'z'), 26);
        assert_eq!(from_ascii(b' '), SPACE);
        assert_eq!(from_ascii(b'5'), 53);
        assert_eq!(from_ascii(b'~'), SPACE);
    }

    #[test]
    fn reverse_space_is_solid_block() {
        assert_eq!(glyph(BLOCK), [0xFF; 8]);
    }

    #[test]
    fn reverse_video_inverts_every_row() {
        let a = glyph(1);
        let reverse_a = glyph(1 | 0x80);
        for (plain, rev) in a.iter().zip(reverse_a.iter()) {
            assert_eq!(*plain, !*rev);
        }
    }
}
