use std::io::{self, Write};

use crate::error::RaytraceError;
use crate::vec::V3;

/// A 2-D grid of clamped RGB samples in `[0,1]`, row-major with row 0 at
/// the top. Scoped to a single raytrace invocation: created fresh at the
/// start and released after write-out (spec §5).
pub struct Image {
    width: usize,
    height: usize,
    pixels: Vec<V3>,
}

impl Image {
    /// Fails if either dimension is non-positive — spec §7 names this a
    /// fatal condition, not a routine one.
    pub fn new(width: i64, height: i64) -> Result<Image, RaytraceError> {
        if width <= 0 || height <= 0 {
            return Err(RaytraceError::InvalidImageDimensions { width, height });
        }
        let (width, height) = (width as usize, height as usize);
        Ok(Image {
            width,
            height,
            pixels: vec![V3::ZERO; width * height],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn set(&mut self, x: usize, y: usize, color: V3) {
        self.pixels[y * self.width + x] = color.clamp01();
    }

    pub fn get(&self, x: usize, y: usize) -> V3 {
        self.pixels[y * self.width + x]
    }

    pub fn rows(&self) -> usize {
        self.height
    }

    /// Writes the image as P3 ASCII PPM: header `P3 <W> <H> 255`
    /// followed by `round(255*r) round(255*g) round(255*b)` per pixel,
    /// scanning rows top-to-bottom, pixels left-to-right.
    pub fn write_ppm<W: Write>(&self, mut out: W) -> io::Result<()> {
        writeln!(out, "P3 {} {} 255", self.width, self.height)?;
        for y in 0..self.height {
            for x in 0..self.width {
                let c = self.get(x, y);
                writeln!(
                    out,
                    "{} {} {}",
                    (255.0 * c.x()).round() as u32,
                    (255.0 * c.y()).round() as u32,
                    (255.0 * c.z()).round() as u32
                )?;
            }
        }
        Ok(())
    }
}
