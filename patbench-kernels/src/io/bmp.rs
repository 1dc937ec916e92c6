//! Uncompressed 24-bit BMP codec
//!
//! Only the layout the kernels produce and consume is supported: a 14-byte
//! file header, a `BITMAPINFOHEADER` (or larger) info header, one plane,
//! 24 bits per pixel, no compression, rows stored bottom-up and padded to a
//! multiple of four bytes.
//!
//! Pixels are kept as three separate planes in file order, so a decoded and
//! re-encoded image is byte-identical to its input.

use crate::error::FormatError;
use std::path::Path;

const FILE_HEADER_LEN: usize = 14;
const INFO_HEADER_LEN: usize = 40;
const HEADER_LEN: usize = FILE_HEADER_LEN + INFO_HEADER_LEN;

/// 72 dpi expressed in pixels per metre
const PIXELS_PER_METRE: u32 = 0x0B13;

/// One 24-bit pixel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rgb {
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
}

/// A decoded bitmap split into colour planes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BmpImage {
    width: usize,
    height: usize,
    header: Vec<u8>,
    red: Vec<u8>,
    green: Vec<u8>,
    blue: Vec<u8>,
}

fn read_u16(bytes: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([bytes[at], bytes[at + 1]])
}

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

fn read_i32(bytes: &[u8], at: usize) -> i32 {
    i32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

/// Padding bytes after each row of `width` pixels
fn row_padding(width: usize) -> usize {
    (4 - (width * 3) % 4) % 4
}

impl BmpImage {
    /// Decode a BMP file image.
    pub fn decode(bytes: &[u8]) -> Result<Self, FormatError> {
        if bytes.len() < HEADER_LEN {
            return Err(FormatError::Truncated {
                needed: HEADER_LEN,
                actual: bytes.len(),
            });
        }
        if &bytes[..2] != b"BM" {
            return Err(FormatError::UnsupportedBitmap("missing BM magic".into()));
        }

        let pixel_offset = read_u32(bytes, 10) as usize;
        if pixel_offset < HEADER_LEN {
            return Err(FormatError::UnsupportedBitmap(format!(
                "pixel data offset {} overlaps the header",
                pixel_offset
            )));
        }
        if bytes.len() < pixel_offset {
            return Err(FormatError::Truncated {
                needed: pixel_offset,
                actual: bytes.len(),
            });
        }

        let width = read_i32(bytes, 18);
        let height = read_i32(bytes, 22);
        let planes = read_u16(bytes, 26);
        let bit_count = read_u16(bytes, 28);
        let compression = read_u32(bytes, 30);

        if planes != 1 || bit_count != 24 || compression != 0 {
            return Err(FormatError::UnsupportedBitmap(format!(
                "planes={}, bits={}, compression={}",
                planes, bit_count, compression
            )));
        }
        if width < 0 || height < 0 {
            return Err(FormatError::UnsupportedBitmap(format!(
                "negative dimensions {}x{}",
                width, height
            )));
        }

        let (width, height) = (width as usize, height as usize);
        let stride = width * 3 + row_padding(width);
        let needed = pixel_offset + stride * height;
        if bytes.len() < needed {
            return Err(FormatError::Truncated {
                needed,
                actual: bytes.len(),
            });
        }

        let pixels = width * height;
        let mut red = Vec::with_capacity(pixels);
        let mut green = Vec::with_capacity(pixels);
        let mut blue = Vec::with_capacity(pixels);
        for row in bytes[pixel_offset..needed].chunks_exact(stride.max(1)).take(height) {
            for px in row[..width * 3].chunks_exact(3) {
                blue.push(px[0]);
                green.push(px[1]);
                red.push(px[2]);
            }
        }

        Ok(Self {
            width,
            height,
            header: bytes[..pixel_offset].to_vec(),
            red,
            green,
            blue,
        })
    }

    /// Build a new image from planes, generating a fresh header
    pub fn from_planes(
        width: usize,
        height: usize,
        red: Vec<u8>,
        green: Vec<u8>,
        blue: Vec<u8>,
    ) -> Result<Self, FormatError> {
        let pixels = width * height;
        for plane in [&red, &green, &blue] {
            if plane.len() != pixels {
                return Err(FormatError::Truncated {
                    needed: pixels,
                    actual: plane.len(),
                });
            }
        }
        Ok(Self {
            width,
            height,
            header: Self::fresh_header(width, height),
            red,
            green,
            blue,
        })
    }

    /// Build a new image from row-major pixels
    pub fn from_rgb(width: usize, height: usize, pixels: &[Rgb]) -> Result<Self, FormatError> {
        let red = pixels.iter().map(|p| p.r).collect();
        let green = pixels.iter().map(|p| p.g).collect();
        let blue = pixels.iter().map(|p| p.b).collect();
        Self::from_planes(width, height, red, green, blue)
    }

    fn fresh_header(width: usize, height: usize) -> Vec<u8> {
        let data_len = (width * 3 + row_padding(width)) * height;
        let file_len = data_len + HEADER_LEN;

        let mut header = Vec::with_capacity(HEADER_LEN);
        header.extend_from_slice(b"BM");
        header.extend_from_slice(&(file_len as u32).to_le_bytes());
        header.extend_from_slice(&[0; 4]);
        header.extend_from_slice(&(HEADER_LEN as u32).to_le_bytes());

        header.extend_from_slice(&(INFO_HEADER_LEN as u32).to_le_bytes());
        header.extend_from_slice(&(width as i32).to_le_bytes());
        header.extend_from_slice(&(height as i32).to_le_bytes());
        header.extend_from_slice(&1u16.to_le_bytes());
        header.extend_from_slice(&24u16.to_le_bytes());
        header.extend_from_slice(&0u32.to_le_bytes());
        header.extend_from_slice(&(data_len as u32).to_le_bytes());
        header.extend_from_slice(&PIXELS_PER_METRE.to_le_bytes());
        header.extend_from_slice(&PIXELS_PER_METRE.to_le_bytes());
        header.extend_from_slice(&[0; 8]);
        header
    }

    /// Encode to BMP bytes, reusing the stored header
    pub fn encode(&self) -> Vec<u8> {
        let padding = row_padding(self.width);
        let mut out =
            Vec::with_capacity(self.header.len() + (self.width * 3 + padding) * self.height);
        out.extend_from_slice(&self.header);

        for row in 0..self.height {
            for col in 0..self.width {
                let i = row * self.width + col;
                out.extend_from_slice(&[self.blue[i], self.green[i], self.red[i]]);
            }
            out.extend(std::iter::repeat_n(0u8, padding));
        }
        out
    }

    /// Read and decode a BMP file
    pub fn read(path: impl AsRef<Path>) -> Result<Self, FormatError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| FormatError::io(path, e))?;
        let image = Self::decode(&bytes)?;
        tracing::debug!(
            path = %path.display(),
            width = image.width,
            height = image.height,
            "decoded bitmap"
        );
        Ok(image)
    }

    /// Encode and write to `path`
    pub fn write(&self, path: impl AsRef<Path>) -> Result<(), FormatError> {
        let path = path.as_ref();
        std::fs::write(path, self.encode()).map_err(|e| FormatError::io(path, e))
    }

    /// Width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Header bytes preceding the pixel data
    pub fn header(&self) -> &[u8] {
        &self.header
    }

    /// Red, green and blue planes
    pub fn planes(&self) -> [&[u8]; 3] {
        [&self.red, &self.green, &self.blue]
    }

    /// Same geometry and header with replaced planes
    pub fn with_planes(&self, [red, green, blue]: [Vec<u8>; 3]) -> Result<Self, FormatError> {
        let pixels = self.width * self.height;
        for plane in [&red, &green, &blue] {
            if plane.len() != pixels {
                return Err(FormatError::Truncated {
                    needed: pixels,
                    actual: plane.len(),
                });
            }
        }
        Ok(Self {
            width: self.width,
            height: self.height,
            header: self.header.clone(),
            red,
            green,
            blue,
        })
    }

    /// Pixel at flat index `i`
    pub fn pixel(&self, i: usize) -> Rgb {
        Rgb {
            r: self.red[i],
            g: self.green[i],
            b: self.blue[i],
        }
    }
}
