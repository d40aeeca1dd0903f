/// A single captured frame: contiguous RGB bytes in row-major order.
///
/// Pixel format conversion happens at the capture boundary; everything
/// downstream (gray conversion, annotation, display) reads RGB.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
    index: usize,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * (channels as usize),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
            index,
        }
    }

    /// A frame filled with one RGB color.
    pub fn filled(width: u32, height: u32, rgb: [u8; 3], index: usize) -> Self {
        let data = rgb.repeat((width as usize) * (height as usize));
        Self::new(data, width, height, 3, index)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// RGB value at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        let offset = self.offset(x, y)?;
        let px = &self.data[offset..offset + self.channels as usize];
        Some(match px.len() {
            1 => [px[0]; 3],
            _ => [px[0], px[1], px[2]],
        })
    }

    /// Expands to RGBA with an opaque alpha channel, the layout image
    /// widgets expect.
    pub fn to_rgba(&self) -> Vec<u8> {
        let pixels = (self.width as usize) * (self.height as usize);
        let channels = self.channels as usize;
        let mut rgba = Vec::with_capacity(pixels * 4);
        for px in self.data.chunks_exact(channels) {
            match channels {
                1 => rgba.extend_from_slice(&[px[0], px[0], px[0], 255]),
                3 => rgba.extend_from_slice(&[px[0], px[1], px[2], 255]),
                _ => rgba.extend_from_slice(&[px[0], px[1], px[2], px[3]]),
            }
        }
        rgba
    }

    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(((y as usize) * (self.width as usize) + x as usize) * self.channels as usize)
    }
}
