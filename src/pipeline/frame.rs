use super::color::{Color, BLACK};
use super::primitives::Fragment;

/// Depth of a pixel nothing was drawn to since the last `begin_frame`.
pub const FAR: f32 = f32::INFINITY;

/// Render target, holding its width, height, color buffer and z-buffer as flat arrays.
/// (0, 0) is the top left pixel, index of (x, y) is x + y * width.
pub struct FrameTarget {
    pub width: u32,
    pub height: u32,
    clear_color: Color,
    color_buffer: Vec<Color>,
    z_buffer: Vec<f32>, // Smaller is closer.
}

impl FrameTarget {
    /// Allocates a cleared target.
    pub fn new(width: u32, height: u32) -> FrameTarget {
        let n_pixels = width as usize * height as usize;
        return FrameTarget {
            width,
            height,
            clear_color: BLACK,
            color_buffer: vec![BLACK; n_pixels],
            z_buffer: vec![FAR; n_pixels],
        };
    }

    pub fn with_clear_color(mut self, clear_color: Color) -> FrameTarget {
        self.clear_color = clear_color;
        self.begin_frame();
        return self;
    }

    pub fn clear_color(&self) -> Color {
        return self.clear_color;
    }

    /// Sets every pixel to the clear color and every z-buffer value to FAR.
    pub fn begin_frame(&mut self) {
        self.color_buffer.fill(self.clear_color);
        self.z_buffer.fill(FAR);
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        return Some((x + y * self.width as i64) as usize);
    }

    /// Depth test and write. The fragment lands on the nearest pixel and wins only when strictly
    /// closer than what is there. Returns whether anything was written.
    pub fn composite(&mut self, fragment: &Fragment) -> bool {
        let x = fragment.position.x.round();
        let y = fragment.position.y.round();
        let z = fragment.position.z;
        if !(x.is_finite() && y.is_finite()) {
            return false;
        }
        let index = match self.index(x as i64, y as i64) {
            Some(index) => index,
            None => return false,
        };
        if !(z < self.z_buffer[index]) {
            return false;
        }
        self.z_buffer[index] = z;
        self.color_buffer[index] = fragment.color;
        return true;
    }

    /// Folds another target of the same size into this one, pixel by pixel with the same
    /// depth rule as `composite`.
    pub fn merge(&mut self, other: &FrameTarget) {
        debug_assert_eq!((self.width, self.height), (other.width, other.height));
        let pixels = self.z_buffer.iter_mut().zip(self.color_buffer.iter_mut());
        let other_pixels = other.z_buffer.iter().zip(other.color_buffer.iter());
        for ((z, color), (other_z, other_color)) in pixels.zip(other_pixels) {
            if *other_z < *z {
                *z = *other_z;
                *color = *other_color;
            }
        }
    }

    pub fn color_at(&self, x: u32, y: u32) -> Option<Color> {
        return self.index(x as i64, y as i64).map(|index| self.color_buffer[index]);
    }

    pub fn depth_at(&self, x: u32, y: u32) -> Option<f32> {
        return self.index(x as i64, y as i64).map(|index| self.z_buffer[index]);
    }

    pub fn color_buffer(&self) -> &[Color] {
        return &self.color_buffer[..];
    }

    pub fn depth_buffer(&self) -> &[f32] {
        return &self.z_buffer[..];
    }

    /// Rendered frame as rgb8 data of size 3 * (number of pixels).
    pub fn as_rgb_data(&self) -> Vec<u8> {
        return self.color_buffer.iter().flat_map(|color| color.to_rgb()).collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::vector;

    fn fragment(x: f32, y: f32, z: f32, color: Color) -> Fragment {
        return Fragment::new(vector![x, y, z], color);
    }

    #[test]
    fn nearest_wins_in_any_order() {
        let candidates = [
            fragment(2.0, 1.0, 0.7, Color::rgb(1, 0, 0)),
            fragment(2.0, 1.0, 0.2, Color::rgb(2, 0, 0)),
            fragment(2.0, 1.0, 0.5, Color::rgb(3, 0, 0)),
        ];
        let orders = [[0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]];
        for order in orders {
            let mut target = FrameTarget::new(4, 4);
            for i in order {
                target.composite(&candidates[i]);
            }
            assert_eq!(target.depth_at(2, 1), Some(0.2));
            assert_eq!(target.color_at(2, 1), Some(Color::rgb(2, 0, 0)));
        }
    }

    #[test]
    fn equal_depth_keeps_first() {
        let mut target = FrameTarget::new(2, 2);
        assert!(target.composite(&fragment(0.0, 0.0, 0.5, Color::rgb(1, 1, 1))));
        assert!(!target.composite(&fragment(0.0, 0.0, 0.5, Color::rgb(2, 2, 2))));
        assert_eq!(target.color_at(0, 0), Some(Color::rgb(1, 1, 1)));
    }

    #[test]
    fn out_of_bounds_is_ignored() {
        let mut target = FrameTarget::new(3, 2);
        for (x, y) in [(-1.0, 0.0), (0.0, -1.0), (3.0, 0.0), (0.0, 2.0), (f32::NAN, 0.0)] {
            assert!(!target.composite(&fragment(x, y, 0.0, Color::rgb(9, 9, 9))));
        }
        assert!(target.depth_buffer().iter().all(|z| *z == FAR));
        assert!(target.color_buffer().iter().all(|c| *c == BLACK));
    }

    #[test]
    fn rounds_to_nearest_pixel() {
        let mut target = FrameTarget::new(3, 3);
        assert!(target.composite(&fragment(1.4, 1.6, 0.0, Color::rgb(5, 5, 5))));
        assert_eq!(target.color_at(1, 2), Some(Color::rgb(5, 5, 5)));
    }

    #[test]
    fn begin_frame_resets_both_buffers() {
        let mut target = FrameTarget::new(2, 2).with_clear_color(Color::rgb(10, 20, 30));
        target.composite(&fragment(1.0, 1.0, -3.0, Color::rgb(1, 2, 3)));
        assert_eq!(target.clear_color(), Color::rgb(10, 20, 30));
        target.begin_frame();
        assert!(target.depth_buffer().iter().all(|z| *z == FAR));
        assert!(target.color_buffer().iter().all(|c| *c == target.clear_color()));
    }

    #[test]
    fn merge_takes_nearer_pixels() {
        let mut left = FrameTarget::new(2, 1);
        let mut right = FrameTarget::new(2, 1);
        left.composite(&fragment(0.0, 0.0, 0.3, Color::rgb(1, 0, 0)));
        left.composite(&fragment(1.0, 0.0, 0.9, Color::rgb(1, 0, 0)));
        right.composite(&fragment(0.0, 0.0, 0.3, Color::rgb(0, 1, 0)));
        right.composite(&fragment(1.0, 0.0, 0.1, Color::rgb(0, 1, 0)));
        left.merge(&right);
        assert_eq!(left.color_at(0, 0), Some(Color::rgb(1, 0, 0)));
        assert_eq!(left.color_at(1, 0), Some(Color::rgb(0, 1, 0)));
        assert_eq!(left.depth_at(1, 0), Some(0.1));
    }

    #[test]
    fn rgb_data_layout() {
        let mut target = FrameTarget::new(2, 1);
        target.composite(&fragment(1.0, 0.0, 0.0, Color::rgb(7, 8, 9)));
        assert_eq!(target.as_rgb_data(), vec![0, 0, 0, 7, 8, 9]);
    }
}
