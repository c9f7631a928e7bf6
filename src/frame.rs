//! Frame buffer sizing and the ndarray-backed buffers frames are decoded into.

use image::{DynamicImage, ImageBuffer, Luma, Rgb};
use ndarray::{Array2, Array3, Axis};

use crate::common::ImageType;
use crate::error::{AsiError, AsiResult};

/// Layout of a decoded frame for a given geometry and [`ImageType`].
///
/// | type        | planes | element | shape         |
/// |-------------|--------|---------|---------------|
/// | RAW8, Y8    | 1      | 8 bit   | `(h, w)`      |
/// | RAW16       | 1      | 16 bit  | `(h, w)`      |
/// | RGB24       | 3      | 8 bit   | `(3, h, w)`   |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameBufferSpec {
    pub width: u32,
    pub height: u32,
    pub image_type: ImageType,
}

impl FrameBufferSpec {
    pub fn allocate(width: u32, height: u32, image_type: ImageType) -> AsiResult<Self> {
        if width == 0 || height == 0 {
            return Err(AsiError::validation(format!(
                "frame geometry must be positive, got {width}x{height}"
            )));
        }
        let spec = FrameBufferSpec { width, height, image_type };
        // Reject geometries whose byte size does not fit in memory arithmetic.
        spec.checked_byte_len().ok_or_else(|| {
            AsiError::validation(format!("frame {width}x{height} {image_type} is too large"))
        })?;
        Ok(spec)
    }

    /// Entry point for values taken straight from the SDK, where the image
    /// type is still an `ASI_IMG_TYPE` integer.
    pub fn allocate_raw(width: i64, height: i64, image_type: i32) -> AsiResult<Self> {
        let image_type =
            ImageType::from_raw(image_type).ok_or(AsiError::UnsupportedImageType(image_type))?;
        let width = u32::try_from(width)
            .map_err(|_| AsiError::validation(format!("invalid frame width {width}")))?;
        let height = u32::try_from(height)
            .map_err(|_| AsiError::validation(format!("invalid frame height {height}")))?;
        Self::allocate(width, height, image_type)
    }

    pub fn element_bits(&self) -> u32 {
        match self.image_type {
            ImageType::Raw16 => 16,
            ImageType::Raw8 | ImageType::Y8 | ImageType::Rgb24 => 8,
        }
    }

    pub fn planes(&self) -> usize {
        match self.image_type {
            ImageType::Rgb24 => 3,
            ImageType::Raw8 | ImageType::Y8 | ImageType::Raw16 => 1,
        }
    }

    pub fn shape(&self) -> Vec<usize> {
        let (h, w) = (self.height as usize, self.width as usize);
        match self.planes() {
            1 => vec![h, w],
            planes => vec![planes, h, w],
        }
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Number of bytes the SDK writes for one frame of this layout.
    pub fn byte_len(&self) -> usize {
        self.pixel_count() * self.planes() * (self.element_bits() as usize / 8)
    }

    fn checked_byte_len(&self) -> Option<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)?
            .checked_mul(self.planes())?
            .checked_mul(self.element_bits() as usize / 8)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FrameData {
    Mono8(Array2<u8>),
    Mono16(Array2<u16>),
    /// Planes in R, G, B order.
    Rgb24(Array3<u8>),
}

/// A frame buffer shaped by a [`FrameBufferSpec`], reusable across captures.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    spec: FrameBufferSpec,
    data: FrameData,
}

impl FrameBuffer {
    pub fn new(spec: FrameBufferSpec) -> Self {
        let (h, w) = (spec.height as usize, spec.width as usize);
        let data = match spec.image_type {
            ImageType::Raw8 | ImageType::Y8 => FrameData::Mono8(Array2::zeros((h, w))),
            ImageType::Raw16 => FrameData::Mono16(Array2::zeros((h, w))),
            ImageType::Rgb24 => FrameData::Rgb24(Array3::zeros((3, h, w))),
        };
        FrameBuffer { spec, data }
    }

    pub fn from_bytes(spec: FrameBufferSpec, bytes: &[u8]) -> AsiResult<Self> {
        let mut buffer = FrameBuffer::new(spec);
        buffer.fill_from_bytes(bytes)?;
        Ok(buffer)
    }

    pub fn spec(&self) -> &FrameBufferSpec {
        &self.spec
    }

    pub fn data(&self) -> &FrameData {
        &self.data
    }

    pub fn into_data(self) -> FrameData {
        self.data
    }

    pub fn shape(&self) -> &[usize] {
        match &self.data {
            FrameData::Mono8(a) => a.shape(),
            FrameData::Mono16(a) => a.shape(),
            FrameData::Rgb24(a) => a.shape(),
        }
    }

    /// Overwrite the buffer with one frame as delivered by the SDK.
    ///
    /// 16-bit samples are little-endian. RGB24 arrives interleaved in B, G, R
    /// order and is split into R, G, B planes.
    pub fn fill_from_bytes(&mut self, bytes: &[u8]) -> AsiResult<()> {
        let expected = self.spec.byte_len();
        if bytes.len() != expected {
            return Err(AsiError::validation(format!(
                "frame data is {} bytes, expected {expected} for {:?}",
                bytes.len(),
                self.spec
            )));
        }
        let width = self.spec.width as usize;
        match &mut self.data {
            FrameData::Mono8(array) => {
                for (dst, src) in array.iter_mut().zip(bytes) {
                    *dst = *src;
                }
            }
            FrameData::Mono16(array) => {
                for (dst, src) in array.iter_mut().zip(bytes.chunks_exact(2)) {
                    *dst = u16::from_le_bytes([src[0], src[1]]);
                }
            }
            FrameData::Rgb24(array) => {
                for (i, bgr) in bytes.chunks_exact(3).enumerate() {
                    let (y, x) = (i / width, i % width);
                    array[[0, y, x]] = bgr[2];
                    array[[1, y, x]] = bgr[1];
                    array[[2, y, x]] = bgr[0];
                }
            }
        }
        Ok(())
    }

    /// Copy into an [`image::DynamicImage`], e.g. for saving to disk.
    pub fn to_image(&self) -> AsiResult<DynamicImage> {
        let (w, h) = (self.spec.width, self.spec.height);
        let too_small = || AsiError::validation(format!("buffer does not hold {w}x{h} pixels"));
        let image = match &self.data {
            FrameData::Mono8(array) => {
                let pixels: Vec<u8> = array.iter().copied().collect();
                DynamicImage::ImageLuma8(
                    ImageBuffer::<Luma<u8>, _>::from_raw(w, h, pixels).ok_or_else(too_small)?,
                )
            }
            FrameData::Mono16(array) => {
                let pixels: Vec<u16> = array.iter().copied().collect();
                DynamicImage::ImageLuma16(
                    ImageBuffer::<Luma<u16>, _>::from_raw(w, h, pixels).ok_or_else(too_small)?,
                )
            }
            FrameData::Rgb24(array) => {
                let (r, g, b) = (
                    array.index_axis(Axis(0), 0),
                    array.index_axis(Axis(0), 1),
                    array.index_axis(Axis(0), 2),
                );
                let mut pixels = Vec::with_capacity(self.spec.byte_len());
                for ((r, g), b) in r.iter().zip(g.iter()).zip(b.iter()) {
                    pixels.extend_from_slice(&[*r, *g, *b]);
                }
                DynamicImage::ImageRgb8(
                    ImageBuffer::<Rgb<u8>, _>::from_raw(w, h, pixels).ok_or_else(too_small)?,
                )
            }
        };
        Ok(image)
    }
}
