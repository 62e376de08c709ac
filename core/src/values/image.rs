//! 8-bit images shown by image views

use std::borrow::Cow;

/// Row-major, tightly packed 8-bit image
///
/// `channels` is 1 (gray) or 3 (BGR).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DebugImage {
    width: u32,
    height: u32,
    channels: u8,
    data: Vec<u8>,
}

impl DebugImage {
    /// An image with no pixels. Image views skip it and keep their last frame.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build an image from raw pixels
    ///
    /// Returns `None` if `channels` is not 1 or 3, or if `data` does not hold
    /// exactly `width * height * channels` bytes.
    pub fn from_raw(width: u32, height: u32, channels: u8, data: Vec<u8>) -> Option<Self> {
        if channels != 1 && channels != 3 {
            return None;
        }
        let expected = width as usize * height as usize * channels as usize;
        if data.len() != expected {
            return None;
        }
        Some(Self {
            width,
            height,
            channels,
            data,
        })
    }

    pub fn gray(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        Self::from_raw(width, height, 1, data)
    }

    pub fn bgr(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        Self::from_raw(width, height, 3, data)
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

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.data.is_empty()
    }

    /// Pixels as 3-channel BGR, replicating gray into every channel
    pub fn to_bgr(&self) -> Cow<'_, [u8]> {
        if self.channels == 1 {
            Cow::Owned(self.data.iter().flat_map(|&v| [v, v, v]).collect())
        } else {
            Cow::Borrowed(&self.data)
        }
    }
}
