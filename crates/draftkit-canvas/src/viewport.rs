//! Viewport and coordinate transformation for canvas rendering.
//!
//! Converts between pixel coordinates (screen space) and world
//! coordinates (drawing space). Both spaces are y-down with (0,0) at
//! the top-left; the viewport only scales and translates. Pixel-space
//! tolerances cross into world space through [`Viewport::world_tolerance`],
//! which keeps hit targets a constant on-screen size at any zoom.

use std::fmt;

use draftkit_core::constants::{MAX_ZOOM, MIN_ZOOM, VIEW_PADDING};
use draftkit_core::geometry::Point;

/// The viewport transformation state (zoom and pan).
#[derive(Debug, Clone)]
pub struct Viewport {
    zoom: f64,
    pan_x: f64,
    pan_y: f64,
    canvas_width: f64,
    canvas_height: f64,
}

impl Viewport {
    /// Creates a new viewport at 1:1 zoom with the origin at the
    /// top-left corner.
    pub fn new(canvas_width: f64, canvas_height: f64) -> Self {
        Self {
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
            canvas_width,
            canvas_height,
        }
    }

    pub fn canvas_width(&self) -> f64 {
        self.canvas_width
    }

    pub fn canvas_height(&self) -> f64 {
        self.canvas_height
    }

    /// Sets the canvas dimensions (typically called when the window
    /// resizes).
    pub fn set_canvas_size(&mut self, width: f64, height: f64) {
        self.canvas_width = width;
        self.canvas_height = height;
    }

    /// Gets the current zoom level (1.0 = 100%).
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Sets the zoom level, clamped to the supported range.
    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        }
    }

    /// Zooms in by one 1.2x step.
    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom * 1.2);
    }

    /// Zooms out by one 1.2x step.
    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom / 1.2);
    }

    pub fn reset_zoom(&mut self) {
        self.zoom = 1.0;
    }

    pub fn pan_x(&self) -> f64 {
        self.pan_x
    }

    pub fn pan_y(&self) -> f64 {
        self.pan_y
    }

    pub fn set_pan(&mut self, x: f64, y: f64) {
        self.pan_x = x;
        self.pan_y = y;
    }

    /// Pans by a pixel delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    pub fn reset_pan(&mut self) {
        self.pan_x = 0.0;
        self.pan_y = 0.0;
    }

    /// Converts a pixel-space tolerance into world units so hit targets
    /// stay a constant apparent size regardless of zoom.
    ///
    /// ```text
    /// world_tolerance = pixels / zoom
    /// ```
    pub fn world_tolerance(&self, pixels: f64) -> f64 {
        pixels / self.zoom
    }

    /// Converts pixel coordinates to world coordinates.
    ///
    /// ```text
    /// world_x = (pixel_x - pan_x) / zoom
    /// world_y = (pixel_y - pan_y) / zoom
    /// ```
    pub fn pixel_to_world(&self, pixel_x: f64, pixel_y: f64) -> Point {
        Point::new(
            (pixel_x - self.pan_x) / self.zoom,
            (pixel_y - self.pan_y) / self.zoom,
        )
    }

    /// Converts world coordinates to pixel coordinates.
    ///
    /// ```text
    /// pixel_x = world_x * zoom + pan_x
    /// pixel_y = world_y * zoom + pan_y
    /// ```
    pub fn world_to_pixel(&self, world_x: f64, world_y: f64) -> (f64, f64) {
        (
            world_x * self.zoom + self.pan_x,
            world_y * self.zoom + self.pan_y,
        )
    }

    pub fn world_point_to_pixel(&self, point: &Point) -> (f64, f64) {
        self.world_to_pixel(point.x, point.y)
    }

    /// Fits the given bounding box into the viewport with padding.
    ///
    /// `padding` is the fraction of each viewport dimension reserved
    /// around the content (0.0 - 0.5). Degenerate boxes are ignored.
    pub fn fit_to_bounds(&mut self, min_x: f64, min_y: f64, max_x: f64, max_y: f64, padding: f64) {
        if min_x >= max_x || min_y >= max_y {
            return;
        }

        let width = max_x - min_x;
        let height = max_y - min_y;

        let padding_factor = 1.0 - (padding * 2.0);
        let zoom_x = (self.canvas_width * padding_factor) / width;
        let zoom_y = (self.canvas_height * padding_factor) / height;
        let new_zoom = zoom_x.min(zoom_y).clamp(MIN_ZOOM, MAX_ZOOM);

        // Center the content: solve pixel = world * zoom + pan for pan
        // with the content center pinned to the canvas center.
        self.zoom = new_zoom;
        self.pan_x = self.canvas_width / 2.0 - (min_x + width / 2.0) * new_zoom;
        self.pan_y = self.canvas_height / 2.0 - (min_y + height / 2.0) * new_zoom;
    }

    /// Fits the viewport to the content box with the default padding.
    pub fn fit_to_view(&mut self, min_x: f64, min_y: f64, max_x: f64, max_y: f64) {
        self.fit_to_bounds(min_x, min_y, max_x, max_y, VIEW_PADDING);
    }

    /// Changes zoom while keeping `world_point` at the same screen
    /// position. Useful for zoom-to-cursor.
    pub fn zoom_to_point(&mut self, world_point: &Point, new_zoom: f64) {
        if !new_zoom.is_finite() {
            return;
        }
        let clamped = new_zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        let (pixel_x, pixel_y) = self.world_to_pixel(world_point.x, world_point.y);
        self.zoom = clamped;
        self.pan_x = pixel_x - world_point.x * clamped;
        self.pan_y = pixel_y - world_point.y * clamped;
    }

    /// Zooms in one step about a world point.
    pub fn zoom_in_at(&mut self, world_point: &Point) {
        self.zoom_to_point(world_point, self.zoom * 1.2);
    }

    /// Zooms out one step about a world point.
    pub fn zoom_out_at(&mut self, world_point: &Point) {
        self.zoom_to_point(world_point, self.zoom / 1.2);
    }

    /// Centers the viewport on a world coordinate.
    pub fn center_on(&mut self, world_x: f64, world_y: f64) {
        self.pan_x = self.canvas_width / 2.0 - world_x * self.zoom;
        self.pan_y = self.canvas_height / 2.0 - world_y * self.zoom;
    }

    pub fn center_on_point(&mut self, point: &Point) {
        self.center_on(point.x, point.y);
    }

    /// Resets to 1:1 zoom with the origin at the top-left.
    pub fn reset(&mut self) {
        self.zoom = 1.0;
        self.pan_x = 0.0;
        self.pan_y = 0.0;
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Zoom: {:.2}x | Pan: ({:.1}, {:.1})",
            self.zoom, self.pan_x, self.pan_y
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1200.0, 800.0)
    }
}
