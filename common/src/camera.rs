//! Pan/zoom camera for 2D simulations

use glam::{Mat4, Vec2, Vec3};

/// Zoom change per scroll notch, scaled by the current zoom so that zooming
/// feels uniform across magnifications
const ZOOM_STEP: f32 = 0.05;

/// 2D orthographic camera.
///
/// `position` is the world point shown at the centre of the viewport and
/// `zoom` is the number of screen pixels per world unit. Screen coordinates
/// have their origin at the top-left with y pointing down; world coordinates
/// have y pointing up.
#[derive(Debug, Clone)]
pub struct Camera2D {
    pub position: Vec2,
    pub zoom: f32,
    pub viewport: Vec2,
    pub min_zoom: f32,
    pub max_zoom: f32,
}

impl Camera2D {
    pub fn new(viewport: Vec2) -> Self {
        Self {
            position: Vec2::ZERO,
            zoom: 1.0,
            viewport: viewport.max(Vec2::ONE),
            min_zoom: 0.1,
            max_zoom: 3.0,
        }
    }

    /// Centre on `center` and pick the zoom that fits `extent` into the viewport
    pub fn fit(&mut self, center: Vec2, extent: Vec2) {
        self.position = center;
        let fit = (self.viewport / extent.max(Vec2::ONE)).min_element() * 0.95;
        self.min_zoom = self.min_zoom.min(fit * 0.5);
        self.zoom = fit.clamp(self.min_zoom, self.max_zoom);
    }

    /// Get the view-projection matrix
    pub fn view_projection(&self) -> Mat4 {
        let half = self.viewport / (2.0 * self.zoom);

        let projection = Mat4::orthographic_rh(-half.x, half.x, -half.y, half.y, -1.0, 1.0);
        let view = Mat4::from_translation(-self.position.extend(0.0));

        projection * view
    }

    pub fn set_viewport(&mut self, viewport: Vec2) {
        self.viewport = viewport.max(Vec2::ONE);
    }

    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        let offset = screen - self.viewport * 0.5;
        self.position + Vec2::new(offset.x, -offset.y) / self.zoom
    }

    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        let offset = (world - self.position) * self.zoom;
        self.viewport * 0.5 + Vec2::new(offset.x, -offset.y)
    }

    /// Move the view by a mouse drag of `delta` pixels (content follows the cursor)
    pub fn drag(&mut self, delta: Vec2) {
        self.position -= Vec2::new(delta.x, -delta.y) / self.zoom;
    }

    /// Move the view by a fraction of the visible extent (keyboard panning)
    pub fn pan(&mut self, direction: Vec2, fraction: f32) {
        let extent = self.viewport / self.zoom;
        self.position += direction * extent.min_element() * fraction;
    }

    /// Zoom by `steps` scroll notches, keeping the world point under `anchor`
    /// (a screen position) fixed
    pub fn zoom_at(&mut self, anchor: Vec2, steps: f32) {
        let before = self.screen_to_world(anchor);
        let speed = 0.5 + self.zoom / 3.0;
        self.zoom = (self.zoom + steps * ZOOM_STEP * speed).clamp(self.min_zoom, self.max_zoom);
        let after = self.screen_to_world(anchor);
        self.position += before - after;
    }

    /// World-space rectangle currently visible, as (min, max)
    pub fn visible_rect(&self) -> (Vec2, Vec2) {
        let half = self.viewport / (2.0 * self.zoom);
        (self.position - half, self.position + half)
    }

    /// Whether a circle at `center` with `radius` intersects the visible rectangle
    pub fn is_visible(&self, center: Vec2, radius: f32) -> bool {
        let (min, max) = self.visible_rect();
        center.x + radius >= min.x
            && center.x - radius <= max.x
            && center.y + radius >= min.y
            && center.y - radius <= max.y
    }
}

/// Camera uniform data for shaders
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    /// x, y: camera centre; z: pixels per world unit; w: unused
    pub position: [f32; 4],
}

impl CameraUniform {
    pub fn from_camera_2d(camera: &Camera2D) -> Self {
        let center: Vec3 = camera.position.extend(0.0);
        Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            position: [center.x, center.y, camera.zoom, 1.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera2D {
        let mut camera = Camera2D::new(Vec2::new(800.0, 600.0));
        camera.position = Vec2::new(100.0, 50.0);
        camera.zoom = 2.0;
        camera
    }

    #[test]
    fn viewport_centre_maps_to_camera_position() {
        let camera = camera();
        assert_eq!(camera.screen_to_world(Vec2::new(400.0, 300.0)), camera.position);
    }

    #[test]
    fn world_and_screen_transforms_agree() {
        let camera = camera();
        let world = Vec2::new(-37.5, 212.0);
        let back = camera.screen_to_world(camera.world_to_screen(world));
        assert!((back - world).length() < 1e-3);
    }

    #[test]
    fn screen_y_points_down() {
        let camera = camera();
        let above = camera.screen_to_world(Vec2::new(400.0, 0.0));
        assert!(above.y > camera.position.y);
    }

    #[test]
    fn zoom_keeps_anchor_fixed() {
        let mut camera = camera();
        let anchor = Vec2::new(650.0, 120.0);
        let before = camera.screen_to_world(anchor);
        camera.zoom_at(anchor, -1.0);
        let after = camera.screen_to_world(anchor);
        assert!((before - after).length() < 1e-3);
        assert!(camera.zoom < 2.0);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut camera = camera();
        for _ in 0..200 {
            camera.zoom_at(Vec2::ZERO, 1.0);
        }
        assert_eq!(camera.zoom, camera.max_zoom);
    }

    #[test]
    fn drag_moves_content_with_cursor() {
        let mut camera = camera();
        let grabbed = camera.screen_to_world(Vec2::new(300.0, 300.0));
        camera.drag(Vec2::new(40.0, -10.0));
        let under_cursor = camera.screen_to_world(Vec2::new(340.0, 290.0));
        assert!((grabbed - under_cursor).length() < 1e-3);
    }

    #[test]
    fn culls_circles_outside_view() {
        let camera = camera();
        assert!(camera.is_visible(camera.position, 1.0));
        assert!(!camera.is_visible(camera.position + Vec2::new(1000.0, 0.0), 5.0));
    }
}
