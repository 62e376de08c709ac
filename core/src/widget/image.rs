//! Image view bound to a [`DebugImage`]

use super::Widget;
use crate::toolkit::{ElementId, PixelFormat, Sampler, TextureId, TextureUpload, Toolkit};
use crate::values::{DebugImage, ValueKey, ValueStore};

/// Uploads a bound image into one texture owned for the binding's lifetime
#[derive(Debug, Clone)]
pub struct ImageView {
    element: ElementId,
    key: ValueKey<DebugImage>,
    texture: Option<TextureId>,
}

impl ImageView {
    pub fn new(element: ElementId, key: ValueKey<DebugImage>, texture: TextureId) -> Self {
        Self {
            element,
            key,
            texture: Some(texture),
        }
    }
}

impl Widget for ImageView {
    fn element(&self) -> ElementId {
        self.element
    }

    fn refresh(&mut self, values: &ValueStore, toolkit: &mut dyn Toolkit) {
        let Some(texture) = self.texture else {
            return;
        };
        let Some(image) = values.get(self.key) else {
            return;
        };
        if image.is_empty() {
            return;
        }

        let pixels = image.to_bgr();
        toolkit.upload_texture(
            texture,
            &TextureUpload {
                width: image.width(),
                height: image.height(),
                format: PixelFormat::Bgr8,
                pixels: &pixels,
                sampler: Sampler::IMAGE_VIEW,
            },
        );
        toolkit.bind_texture(self.element, texture);
    }

    fn texture(&self) -> Option<TextureId> {
        self.texture
    }

    fn release(&mut self, toolkit: &mut dyn Toolkit) {
        if let Some(texture) = self.texture.take() {
            toolkit.release_texture(texture);
            log::debug!("overlay: released texture {:?}", texture);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toolkit::{Filter, HeadlessToolkit, Wrap};

    fn fixture() -> (HeadlessToolkit, ElementId, TextureId) {
        let mut toolkit = HeadlessToolkit::new(100, 100);
        let panel = toolkit.create_panel("p");
        let texture = toolkit.allocate_texture();
        let element = toolkit.create_image_view(panel, texture, [240, 180]);
        (toolkit, element, texture)
    }

    #[test]
    fn test_empty_image_is_skipped() {
        let (mut toolkit, element, texture) = fixture();
        let mut values = ValueStore::new();
        let key = values.insert(DebugImage::empty());

        let mut view = ImageView::new(element, key, texture);
        view.refresh(&values, &mut toolkit);
        assert_eq!(toolkit.uploads(), 0);
        assert!(toolkit.texture(texture).is_none());
    }

    #[test]
    fn test_gray_upload_is_expanded() {
        let (mut toolkit, element, texture) = fixture();
        let mut values = ValueStore::new();
        let key = values.insert(DebugImage::gray(2, 1, vec![0, 255]).unwrap());

        let mut view = ImageView::new(element, key, texture);
        view.refresh(&values, &mut toolkit);

        let uploaded = toolkit.texture(texture).unwrap();
        assert_eq!((uploaded.width, uploaded.height), (2, 1));
        assert_eq!(uploaded.format, PixelFormat::Bgr8);
        assert_eq!(uploaded.pixels, vec![0, 0, 0, 255, 255, 255]);
        assert_eq!(uploaded.sampler.magnification, Filter::Nearest);
        assert_eq!(uploaded.sampler.minification, Filter::Linear);
        assert_eq!(uploaded.sampler.wrap, Wrap::ClampToEdge);
        assert_eq!(toolkit.bound_texture(element), Some(texture));
    }

    #[test]
    fn test_empty_after_frame_keeps_last_upload() {
        let (mut toolkit, element, texture) = fixture();
        let mut values = ValueStore::new();
        let key = values.insert(DebugImage::bgr(1, 1, vec![1, 2, 3]).unwrap());

        let mut view = ImageView::new(element, key, texture);
        view.refresh(&values, &mut toolkit);
        values.set(key, DebugImage::empty()).unwrap();
        view.refresh(&values, &mut toolkit);

        assert_eq!(toolkit.uploads(), 1);
        assert_eq!(toolkit.texture(texture).unwrap().pixels, vec![1, 2, 3]);
    }

    #[test]
    fn test_release_frees_texture_once() {
        let (mut toolkit, element, texture) = fixture();
        let mut values = ValueStore::new();
        let key = values.insert(DebugImage::empty());

        let mut view = ImageView::new(element, key, texture);
        assert_eq!(toolkit.live_textures(), 1);
        view.release(&mut toolkit);
        view.release(&mut toolkit);
        assert_eq!(toolkit.live_textures(), 0);
        assert_eq!(view.texture(), None);
    }
}
