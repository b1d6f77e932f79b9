//! Image-space to display-space mapping for corner handles.
//!
//! The display box shows the image scaled to fit inside a fixed border, with
//! four round handles addressed by their top-left corner. These functions
//! are the only place where the two coordinate systems meet.

use crate::model::{Point, Quad, Rect, to_i32};

/// Display box geometry that all conversions are computed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinateMapper {
    pub display_width: u32,
    pub display_height: u32,
    /// Horizontal border between the display edge and the image.
    pub border_x: i32,
    /// Vertical border between the display edge and the image.
    pub border_y: i32,
    /// Handle radius; handles are `2 * radius` wide.
    pub handle_radius: i32,
}

/// Placement of one scaled image inside the display box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    /// Display pixels per image pixel.
    pub ratio: f64,
    /// Where the scaled image is drawn, anchored at the border offset.
    pub image_rect: Rect,
}

impl CoordinateMapper {
    /// Create a mapper for a display box with the given border and handle radius.
    pub fn new(
        display_width: u32,
        display_height: u32,
        border_x: i32,
        border_y: i32,
        handle_radius: i32,
    ) -> Self {
        Self {
            display_width,
            display_height,
            border_x,
            border_y,
            handle_radius,
        }
    }

    fn border(&self) -> Point {
        Point::new(self.border_x, self.border_y)
    }

    fn radius(&self) -> Point {
        Point::new(self.handle_radius, self.handle_radius)
    }

    /// Fit an image inside the bordered display box, keeping its aspect ratio.
    ///
    /// The height-bound size is tried first and used whenever its truncated
    /// width fits; otherwise the image takes the whole available width.
    /// `ratio` is derived from the scaled width.
    pub fn compute_layout(&self, image_width: u32, image_height: u32) -> Layout {
        let avail_w = (self.display_width as i64 - 2 * self.border_x as i64).max(0);
        let avail_h = (self.display_height as i64 - 2 * self.border_y as i64).max(0);
        let (iw, ih) = (image_width.max(1) as i64, image_height.max(1) as i64);

        let height_bound_w = avail_h * iw / ih;
        let (scaled_w, scaled_h) = if height_bound_w <= avail_w {
            (height_bound_w, avail_h)
        } else {
            (avail_w, avail_w * ih / iw)
        };

        Layout {
            ratio: scaled_w as f64 / iw as f64,
            image_rect: Rect::new(
                self.border_x,
                self.border_y,
                u32::try_from(scaled_w).unwrap_or(u32::MAX),
                u32::try_from(scaled_h).unwrap_or(u32::MAX),
            ),
        }
    }

    /// Whether the border leaves any room for the image.
    pub fn has_drawable_area(&self) -> bool {
        to_i32(self.display_width) > self.border_x.saturating_mul(2)
            && to_i32(self.display_height) > self.border_y.saturating_mul(2)
    }

    /// Keep a handle fully inside the visible display box.
    pub fn clamp_handle(&self, point: Point) -> Point {
        let r = self.handle_radius;
        let max_x = to_i32(self.display_width).saturating_sub(r).max(r);
        let max_y = to_i32(self.display_height).saturating_sub(r).max(r);
        Point::new(point.x.clamp(r, max_x), point.y.clamp(r, max_y))
    }

    /// Convert an image-space corner to a handle position in display space.
    pub fn to_display(&self, point: Point, ratio: f64) -> Point {
        let scaled = Point::new(
            (point.x as f64 * ratio) as i32,
            (point.y as f64 * ratio) as i32,
        );
        self.clamp_handle(scaled - self.radius() + self.border())
    }

    /// Convert a handle position back to an image-space corner.
    ///
    /// Truncation toward zero biases results down-left; the trailing `+1`
    /// keeps stored coordinates in line with what the handle shows. A zero
    /// ratio saturates instead of dividing into overflow.
    pub fn to_image(&self, point: Point, ratio: f64) -> Point {
        let shifted = point - self.border() + self.radius();
        Point::new(
            ((shifted.x as f64 / ratio) as i32).saturating_add(1),
            ((shifted.y as f64 / ratio) as i32).saturating_add(1),
        )
    }

    /// Map all four corners to display space.
    pub fn quad_to_display(&self, points: &Quad, ratio: f64) -> Quad {
        points.map(|p| self.to_display(p, ratio))
    }

    /// Map all four handles back to image space.
    pub fn quad_to_image(&self, points: &Quad, ratio: f64) -> Quad {
        points.map(|p| self.to_image(p, ratio))
    }

    /// Center of a handle addressed by its top-left corner.
    pub fn handle_center(&self, point: Point) -> Point {
        point + self.radius()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper() -> CoordinateMapper {
        CoordinateMapper::new(700, 600, 50, 50, 5)
    }

    #[test]
    fn test_layout_width_bound() {
        // 600x500 available, 800x600 image is limited by width
        let layout = mapper().compute_layout(800, 600);
        assert_eq!(layout.ratio, 0.75);
        assert_eq!(layout.image_rect, Rect::new(50, 50, 600, 450));
    }

    #[test]
    fn test_layout_height_bound() {
        let layout = mapper().compute_layout(400, 1000);
        assert_eq!(layout.image_rect, Rect::new(50, 50, 200, 500));
        assert_eq!(layout.ratio, 0.5);
    }

    #[test]
    fn test_layout_upscales_small_images() {
        let layout = mapper().compute_layout(300, 250);
        assert_eq!(layout.image_rect, Rect::new(50, 50, 600, 500));
        assert_eq!(layout.ratio, 2.0);
    }

    #[test]
    fn test_layout_prefers_height_bound_when_it_fits() {
        // 500 * 1201 / 1000 truncates to exactly the available width
        let layout = mapper().compute_layout(1201, 1000);
        assert_eq!(layout.image_rect, Rect::new(50, 50, 600, 500));
        assert_eq!(layout.ratio, 600.0 / 1201.0);
    }

    #[test]
    fn test_border_swallowing_display_box() {
        let m = CoordinateMapper::new(100, 100, 50, 50, 5);
        assert!(!m.has_drawable_area());
        assert!(mapper().has_drawable_area());

        let layout = m.compute_layout(800, 600);
        assert_eq!(layout.ratio, 0.0);
        assert_eq!(layout.image_rect, Rect::new(50, 50, 0, 0));
        assert_eq!(
            m.to_image(Point::new(60, 60), layout.ratio),
            Point::new(i32::MAX, i32::MAX)
        );
    }

    #[test]
    fn test_far_coordinates_clamp_instead_of_overflowing() {
        let m = mapper();
        assert_eq!(
            m.to_display(Point::new(2_000_000_000, 10), 5.0),
            Point::new(695, 95)
        );
        assert_eq!(
            m.to_display(Point::new(i32::MIN, i32::MAX), 1.0),
            Point::new(5, 595)
        );
    }

    #[test]
    fn test_to_display_applies_border_and_radius() {
        let m = mapper();
        assert_eq!(m.to_display(Point::new(400, 300), 0.75), Point::new(345, 270));
    }

    #[test]
    fn test_to_display_clamps_to_visible_area() {
        let m = mapper();
        assert_eq!(m.to_display(Point::new(-200, -200), 0.75), Point::new(5, 5));
        assert_eq!(
            m.to_display(Point::new(5000, 5000), 0.75),
            Point::new(695, 595)
        );
    }

    #[test]
    fn test_to_image_keeps_plus_one_bias() {
        let m = mapper();
        // (345 - 50 + 5) / 0.75 = 400 exactly, then +1
        assert_eq!(m.to_image(Point::new(345, 270), 0.75), Point::new(401, 301));
    }

    #[test]
    fn test_round_trip_within_one_pixel() {
        let m = mapper();
        let layout = m.compute_layout(800, 600);
        for x in (1..800).step_by(7) {
            for y in (1..600).step_by(11) {
                let p = Point::new(x, y);
                let back = m.to_image(m.to_display(p, layout.ratio), layout.ratio);
                assert!(
                    (back.x - p.x).abs() <= 1 && (back.y - p.y).abs() <= 1,
                    "{:?} came back as {:?}",
                    p,
                    back
                );
            }
        }
    }

    #[test]
    fn test_quad_mapping_is_per_point() {
        let m = mapper();
        let quad = [
            Point::new(50, 50),
            Point::new(750, 50),
            Point::new(750, 550),
            Point::new(50, 550),
        ];
        let display = m.quad_to_display(&quad, 0.75);
        for (d, p) in display.iter().zip(quad.iter()) {
            assert_eq!(*d, m.to_display(*p, 0.75));
        }
        // 50 * 0.75 truncates to 37, which maps back to 49 before the bias
        assert_eq!(m.quad_to_image(&display, 0.75)[0], Point::new(50, 50));
    }

    #[test]
    fn test_handle_center() {
        assert_eq!(mapper().handle_center(Point::new(10, 20)), Point::new(15, 25));
    }
}
