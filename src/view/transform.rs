use kurbo::{Affine, Point, Size, Vec2};
use std::time::{Duration, Instant};

/// Interaction limits for [`ViewTransform`] and [`ZoomThrottle`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Smallest allowed zoom.
    pub min_zoom: f64,
    /// Largest allowed zoom.
    pub max_zoom: f64,
    /// Multiplier for one zoom-in step; zooming out divides by it.
    pub zoom_in_factor: f64,
    /// Degrees per rotate step.
    pub rotation_step_deg: f64,
    /// Minimum time between accepted zoom events, in milliseconds.
    pub zoom_throttle_ms: u64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            min_zoom: 0.05,
            max_zoom: 20.0,
            zoom_in_factor: 1.15,
            rotation_step_deg: 15.0,
            zoom_throttle_ms: 50,
        }
    }
}

/// Placement of a preview image inside a viewport.
///
/// The image is zoomed and rotated about its center, which sits at the viewport center plus
/// `pan`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    /// Image size in pixels.
    pub image: Size,
    /// Viewport size in pixels.
    pub view: Size,
    /// Current zoom (view pixels per image pixel).
    pub zoom: f64,
    /// Clockwise rotation in degrees, normalized to `[0, 360)`.
    pub rotation_deg: f64,
    /// Offset of the image center from the viewport center.
    pub pan: Vec2,
    config: ViewConfig,
}

impl ViewTransform {
    /// Fit `image` into `view` keeping its aspect ratio, centered and unrotated.
    pub fn fit_in_view(image: Size, view: Size, config: ViewConfig) -> Self {
        let zoom = if image.width > 0.0 && image.height > 0.0 {
            (view.width / image.width).min(view.height / image.height)
        } else {
            1.0
        };
        Self {
            image,
            view,
            zoom: if zoom.is_finite() && zoom > 0.0 { zoom } else { 1.0 },
            rotation_deg: 0.0,
            pan: Vec2::ZERO,
            config,
        }
    }

    /// Image-to-view transform.
    pub fn to_affine(&self) -> Affine {
        let view_center = Vec2::new(self.view.width / 2.0, self.view.height / 2.0);
        let image_center = Vec2::new(self.image.width / 2.0, self.image.height / 2.0);
        Affine::translate(view_center + self.pan)
            * Affine::rotate(self.rotation_deg.to_radians())
            * Affine::scale(self.zoom)
            * Affine::translate(-image_center)
    }

    /// View point to image coordinates.
    pub fn map_to_image(&self, view_point: Point) -> Point {
        self.to_affine().inverse() * view_point
    }

    /// Zoom one step in (`zoom_in`) or out, keeping the image point under `anchor` fixed.
    ///
    /// Steps that would leave `[min_zoom, max_zoom]` are rejected and return `false`.
    pub fn zoom_at(&mut self, zoom_in: bool, anchor: Point) -> bool {
        let factor = if zoom_in {
            self.config.zoom_in_factor
        } else {
            1.0 / self.config.zoom_in_factor
        };
        let next = self.zoom * factor;
        if !(self.config.min_zoom..=self.config.max_zoom).contains(&next) {
            return false;
        }
        let fixed = self.map_to_image(anchor);
        self.zoom = next;
        let moved = self.to_affine() * fixed;
        self.pan += anchor - moved;
        true
    }

    /// Rotate one step counter-clockwise.
    pub fn rotate_left(&mut self) {
        self.rotate_by(-self.config.rotation_step_deg);
    }

    /// Rotate one step clockwise.
    pub fn rotate_right(&mut self) {
        self.rotate_by(self.config.rotation_step_deg);
    }

    /// Clear zoom, pan and rotation back to the fitted state.
    pub fn reset(&mut self) {
        *self = Self::fit_in_view(self.image, self.view, self.config);
    }

    fn rotate_by(&mut self, deg: f64) {
        self.rotation_deg = (self.rotation_deg + deg).rem_euclid(360.0);
    }
}

/// Drops zoom events that arrive faster than the configured interval.
#[derive(Clone, Debug)]
pub struct ZoomThrottle {
    interval: Duration,
    last: Option<Instant>,
}

impl ZoomThrottle {
    /// A throttle accepting at most one event per `interval`.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// A throttle using [`ViewConfig::zoom_throttle_ms`].
    pub fn from_config(config: &ViewConfig) -> Self {
        Self::new(Duration::from_millis(config.zoom_throttle_ms))
    }

    /// Whether an event at `now` should be handled. Rejected events do not restart the interval.
    pub fn allow(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last
            && now.saturating_duration_since(last) < self.interval
        {
            return false;
        }
        self.last = Some(now);
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/view/transform.rs"]
mod tests;
