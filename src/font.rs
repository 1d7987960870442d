/// Bytes per glyph; every hex digit sprite is 8 pixels wide and 5 rows tall.
pub const GLYPH_SIZE: usize = 5;

pub type FontBytes = [u8; GLYPH_SIZE * 16];

const DEFAULT_FONT: FontBytes = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// Supplies the character sprites seeded into memory when a machine is built.
pub trait FontLoader {
    fn font(&self) -> &[u8];
}

/// The conventional 0-F hex font.
#[derive(Debug, Clone, Copy)]
pub struct StaticFont {
    data: FontBytes,
}

impl Default for StaticFont {
    fn default() -> Self {
        Self { data: DEFAULT_FONT }
    }
}

impl FontLoader for StaticFont {
    fn font(&self) -> &[u8] {
        &self.data
    }
}

// custom glyph sets, e.g. loaded from a file
impl FontLoader for Vec<u8> {
    fn font(&self) -> &[u8] {
        self
    }
}

#[test]
fn test_default_font_glyphs() {
    let font = StaticFont::default();
    assert_eq!(font.font().len(), 80);
    // "0" is a closed box, "F" has an open bottom
    assert_eq!(&font.font()[..GLYPH_SIZE], &[0xF0, 0x90, 0x90, 0x90, 0xF0]);
    assert_eq!(&font.font()[15 * GLYPH_SIZE..], &[0xF0, 0x80, 0xF0, 0x80, 0x80]);
}
