pub const WIDTH: usize = 64;
pub const HEIGHT: usize = 32;

/// Monochrome screen contents, addressed `[row][col]`.
pub type Pixels = [[bool; WIDTH]; HEIGHT];

/// Receives the whole screen whenever a dirty buffer is flushed.
pub trait PixelSink {
    fn draw(&mut self, pixels: &Pixels);
}

/// The machine's display memory.
///
/// Drawing happens at instruction rate and only marks the buffer dirty; the 60 Hz
/// step decides when a sink gets to see it.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    bit_buffer: Pixels,
    dirty: bool,
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            bit_buffer: [[false; WIDTH]; HEIGHT],
            dirty: false,
        }
    }

    pub fn clear_buffer(&mut self) {
        self.bit_buffer = [[false; WIDTH]; HEIGHT];
        self.dirty = true;
    }

    pub fn pixels(&self) -> &Pixels {
        &self.bit_buffer
    }

    pub fn get(&self, x: usize, y: usize) -> bool {
        self.bit_buffer[y % HEIGHT][x % WIDTH]
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// XORs an 8-pixel-wide sprite in at (x, y), wrapping around both edges.
    /// Returns true if any lit pixel was switched off.
    pub fn paint(&mut self, x: u8, y: u8, sprite: &[u8]) -> bool {
        let mut collision = false;
        for (i, row) in sprite.iter().enumerate() {
            let ny = (y as usize + i) % HEIGHT;
            for j in 0..8 {
                let nx = (x as usize + j) % WIDTH;
                let bit = (row >> (7 - j)) & 1 == 1;
                if !bit {
                    continue;
                }
                let previous = self.bit_buffer[ny][nx];
                self.bit_buffer[ny][nx] = !previous;
                self.dirty = true;
                if previous {
                    collision = true;
                }
            }
        }
        collision
    }

    /// Hands the buffer to `sink` if it changed since the last flush.
    pub fn flush(&mut self, sink: &mut dyn PixelSink) -> bool {
        if !self.dirty {
            return false;
        }
        sink.draw(&self.bit_buffer);
        self.dirty = false;
        true
    }
}
