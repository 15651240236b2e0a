/// Drawable size in physical pixels.
///
/// Renderers size their depth targets from this and derive the projection
/// aspect ratio from it.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// `width / height`, or `None` for a zero-sized viewport.
    #[inline]
    pub fn aspect(self) -> Option<f32> {
        self.is_valid()
            .then(|| self.width as f32 / self.height as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_of_valid_viewport() {
        assert_eq!(Viewport::new(1280, 720).aspect(), Some(1280.0 / 720.0));
    }

    #[test]
    fn zero_sized_viewport_has_no_aspect() {
        assert!(!Viewport::new(0, 720).is_valid());
        assert_eq!(Viewport::new(0, 720).aspect(), None);
        assert_eq!(Viewport::new(640, 0).aspect(), None);
    }
}
