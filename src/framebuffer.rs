pub const CHIP8_DISPLAY_WIDTH: usize = 64;
pub const CHIP8_DISPLAY_HEIGHT: usize = 32;

/// one bit per pixel
pub const CHIP8_DISPLAY_BYTES: usize = CHIP8_DISPLAY_WIDTH * CHIP8_DISPLAY_HEIGHT / 8;

/// 64x32 monochrome pixels, packed 8 to a byte, row-major and MSB first, so
/// pixel (x, y) is bit `7 - x % 8` of byte `(y * 64 + x) / 8`. This is the
/// layout the COSMAC VIP kept in its display page and the one `Display` takes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    bytes: [u8; CHIP8_DISPLAY_BYTES],
    dirty: bool,
}

impl Framebuffer {
    pub fn new() -> Self {
        Framebuffer {
            bytes: [0; CHIP8_DISPLAY_BYTES],
            dirty: false,
        }
    }

    pub fn clear(&mut self) {
        self.bytes = [0; CHIP8_DISPLAY_BYTES];
        self.dirty = true;
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        let (byte, bit) = Self::locate(x, y);
        self.bytes[byte] & bit != 0
    }

    /// XOR a single pixel; true if it was lit before
    fn flip(&mut self, x: usize, y: usize) -> bool {
        let (byte, bit) = Self::locate(x, y);
        let was_set = self.bytes[byte] & bit != 0;
        self.bytes[byte] ^= bit;
        was_set
    }

    fn locate(x: usize, y: usize) -> (usize, u8) {
        let n = y * CHIP8_DISPLAY_WIDTH + x;
        (n / 8, 0x80 >> (n % 8))
    }

    /// XOR an 8-pixel wide sprite onto the screen with its top-left corner at
    /// (x mod 64, y mod 32). Rows and columns that fall off the right or bottom
    /// edge are clipped rather than wrapped. Returns true if any lit pixel was
    /// turned off.
    pub fn draw_sprite(&mut self, x: u8, y: u8, rows: &[u8]) -> bool {
        let x0 = x as usize % CHIP8_DISPLAY_WIDTH;
        let y0 = y as usize % CHIP8_DISPLAY_HEIGHT;
        let mut collision = false;
        for (h, &row) in rows.iter().enumerate() {
            let py = y0 + h;
            if py >= CHIP8_DISPLAY_HEIGHT {
                break;
            }
            for b in 0..8 {
                let px = x0 + b;
                if px >= CHIP8_DISPLAY_WIDTH {
                    break;
                }
                if (row >> (7 - b)) & 1 == 1 && self.flip(px, py) {
                    collision = true;
                }
            }
        }
        if !rows.is_empty() {
            self.dirty = true;
        }
        collision
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// hand the packed pixels to whoever presents them; this consumes the
    /// dirty flag
    pub fn snapshot(&mut self) -> &[u8] {
        self.dirty = false;
        &self.bytes
    }

    /// look without consuming the dirty flag
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}
