use crate::framebuffer::{CHIP8_DISPLAY_BYTES, CHIP8_DISPLAY_HEIGHT, CHIP8_DISPLAY_WIDTH};
use log::debug;
use std::io;
use tui::backend::CrosstermBackend;
use tui::layout::Rect;
use tui::style::{Color, Style};
use tui::symbols::Marker;
use tui::widgets::canvas::{Canvas, Points};
use tui::widgets::{Block, Borders};
use tui::Terminal;

/// Display is used by the interpreter to present the framebuffer. It should
/// abstract the implementation details, so a variety of kinds of screen would
/// work.
pub trait Display {
    /// draw packed 1bpp pixel data, row-major, MSB first
    fn draw(&mut self, data: &[u8]) -> Result<(), io::Error>;
}

// store useful metadata about the terminal
struct Resolution(usize, usize);

impl Resolution {
    fn pixel_count(&self) -> usize {
        self.0 * self.1
    }

    fn byte_count(&self) -> usize {
        self.pixel_count() / 8
    }

    fn x_bounds(&self) -> [f64; 2] {
        [0.0, (self.0 - 1) as f64]
    }

    fn y_bounds(&self) -> [f64; 2] {
        [-1.0 * (self.1 - 1) as f64, 0.0]
    }

    /// canvas coordinates of every pixel whose bit equals `bitplane`; y runs
    /// downwards from 0 so row 0 ends up at the top
    fn bitplane_from_data<'a>(
        &self,
        data: &'a [u8],
        bitplane: u8,
    ) -> impl std::iter::Iterator<Item = (f64, f64)> + 'a {
        let mut count = self.pixel_count();
        let w = self.0;
        std::iter::from_fn(move || {
            while count > 0 {
                count -= 1;
                let bit = 1 & (data[count / 8] >> (7 - count % 8));
                if bit == bitplane {
                    return Some((
                        (count % w) as f64,        // x
                        -1.0 * (count / w) as f64, // y
                    ));
                }
            }
            None
        })
    }
}

/// monochrome display in a terminal, rendered using TUI and crossterm
pub struct MonoTermDisplay {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    resolution: Resolution,
}

impl MonoTermDisplay {
    pub fn new() -> Result<MonoTermDisplay, io::Error> {
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;
        terminal.hide_cursor()?;
        debug!("terminal display ready");
        Ok(MonoTermDisplay {
            terminal,
            resolution: Resolution(CHIP8_DISPLAY_WIDTH, CHIP8_DISPLAY_HEIGHT),
        })
    }
}

impl Drop for MonoTermDisplay {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        // shove some junk on stdout to stop the cli messing up the last frame
        for _ in 0..2 + CHIP8_DISPLAY_HEIGHT / 4 {
            println!();
        }
    }
}

impl Display for MonoTermDisplay {
    fn draw(&mut self, data: &[u8]) -> Result<(), io::Error> {
        // make sure we're given exactly the right amount of data to draw
        assert_eq!(
            data.len(),
            self.resolution.byte_count(),
            "MonoTermDisplay must have correct-sized data to draw"
        );

        let lit: Vec<(f64, f64)> = self.resolution.bitplane_from_data(data, 1).collect();
        let unlit: Vec<(f64, f64)> = self.resolution.bitplane_from_data(data, 0).collect();
        let size = Rect::new(
            0,
            0,
            2 + self.resolution.0 as u16,
            2 + self.resolution.1 as u16,
        );
        let x_bounds = self.resolution.x_bounds();
        let y_bounds = self.resolution.y_bounds();

        // for now this assumes a 1:1 ratio between terminal, chip8 and the
        // internal TUI canvas
        self.terminal.draw(|f| {
            let canvas = Canvas::default()
                .block(
                    Block::default()
                        .title("CHIP-8")
                        .borders(Borders::ALL)
                        .style(Style::default().bg(Color::Black)),
                )
                .x_bounds(x_bounds)
                .y_bounds(y_bounds)
                .marker(Marker::Block)
                .paint(|ctx| {
                    ctx.draw(&Points {
                        coords: &unlit,
                        color: Color::Black,
                    });
                    ctx.draw(&Points {
                        coords: &lit,
                        color: Color::White,
                    });
                });
            f.render_widget(canvas, size);
        })?;
        Ok(())
    }
}

/// useful for testing non-display routines; remembers what it was last asked
/// to draw
#[derive(Default)]
pub struct DummyDisplay {
    pub frames: usize,
    pub last_frame: Vec<u8>,
}

impl DummyDisplay {
    pub fn new() -> DummyDisplay {
        DummyDisplay::default()
    }

    /// whether pixel (x, y) was lit in the last frame drawn
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        let n = y * CHIP8_DISPLAY_WIDTH + x;
        self.last_frame
            .get(n / 8)
            .map(|b| b & (0x80 >> (n % 8)) != 0)
            .unwrap_or(false)
    }
}

impl Display for DummyDisplay {
    fn draw(&mut self, data: &[u8]) -> Result<(), io::Error> {
        assert_eq!(data.len(), CHIP8_DISPLAY_BYTES);
        self.frames += 1;
        self.last_frame = data.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Resolution tests
    #[test]
    fn test_pixel_count() {
        let r = Resolution(64, 32);
        assert_eq!(r.pixel_count(), 2048)
    }

    #[test]
    fn test_byte_count() {
        let r = Resolution(64, 32);
        assert_eq!(r.byte_count(), CHIP8_DISPLAY_BYTES)
    }

    #[test]
    fn test_x_bounds() {
        let r = Resolution(64, 32);
        assert_eq!(r.x_bounds(), [0.0, 63.0]);
    }

    #[test]
    fn test_y_bounds() {
        let r = Resolution(64, 32);
        assert_eq!(r.y_bounds(), [-31.0, 0.0]);
    }

    #[test]
    fn test_bitplanes_partition_pixels() {
        let r = Resolution(64, 32);
        let mut data = [0u8; CHIP8_DISPLAY_BYTES];
        data[0] = 0x80; // (0, 0)
        data[255] = 0x01; // (63, 31)
        let lit: Vec<_> = r.bitplane_from_data(&data, 1).collect();
        assert_eq!(lit, vec![(63.0, -31.0), (0.0, -0.0)]);
        assert_eq!(r.bitplane_from_data(&data, 0).count(), 2046);
    }

    #[test]
    fn test_dummy_display_remembers_frame() -> Result<(), io::Error> {
        let mut d = DummyDisplay::new();
        let mut data = [0u8; CHIP8_DISPLAY_BYTES];
        data[8] = 0x40; // (1, 1)
        d.draw(&data)?;
        assert_eq!(d.frames, 1);
        assert!(d.pixel(1, 1));
        assert!(!d.pixel(0, 1));
        Ok(())
    }

    // MonoTermDisplay tests
    #[test]
    #[ignore]
    #[should_panic]
    // NB. figure out how to stop rendering during tests
    fn test_draw_rejects_wrong_data() {
        let mut d = MonoTermDisplay::new().unwrap();
        let _ = d.draw(&[0; 257]);
    }

    #[test]
    #[ignore]
    fn test_draw_blank_frame() -> Result<(), io::Error> {
        let mut d = MonoTermDisplay::new()?;
        d.draw(&[0; CHIP8_DISPLAY_BYTES])
    }
}
