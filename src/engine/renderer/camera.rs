// Camera for 2D rendering in window pixel space

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

/// Orthographic camera with the origin at the top-left of the window and
/// y growing downwards, one unit per physical pixel
#[derive(Debug, Clone)]
pub struct Camera {
    /// Viewport width
    viewport_width: f32,
    /// Viewport height
    viewport_height: f32,
    /// View-projection matrix
    view_proj: Mat4,
}

impl Camera {
    /// Create a new camera
    pub fn new(viewport_width: f32, viewport_height: f32) -> Self {
        let mut camera = Self {
            viewport_width,
            viewport_height,
            view_proj: Mat4::IDENTITY,
        };
        camera.update_view_proj();
        camera
    }

    /// Update the view-projection matrix
    fn update_view_proj(&mut self) {
        self.view_proj = Mat4::orthographic_rh(
            0.0,
            self.viewport_width.max(1.0),
            self.viewport_height.max(1.0),
            0.0,
            -1.0, // Near plane
            1.0,  // Far plane
        );
    }

    /// Resize the viewport
    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport_width = width;
        self.viewport_height = height;
        self.update_view_proj();
    }

    /// Get the view-projection matrix
    pub fn view_proj_matrix(&self) -> Mat4 {
        self.view_proj
    }
}

/// Camera uniform for GPU
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    /// Create a new camera uniform from a camera
    pub fn new(camera: &Camera) -> Self {
        Self {
            view_proj: camera.view_proj_matrix().to_cols_array_2d(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::{Vec2, Vec4};

    /// Project a window pixel position to normalized device coordinates
    fn to_ndc(camera: &Camera, screen_pos: Vec2) -> Vec2 {
        let clip = camera.view_proj_matrix() * Vec4::new(screen_pos.x, screen_pos.y, 0.0, 1.0);
        Vec2::new(clip.x, clip.y) / clip.w
    }

    #[test]
    fn test_corners_map_to_ndc() {
        let camera = Camera::new(800.0, 600.0);

        let top_left = to_ndc(&camera, Vec2::ZERO);
        assert_relative_eq!(top_left.x, -1.0);
        assert_relative_eq!(top_left.y, 1.0);

        let bottom_right = to_ndc(&camera, Vec2::new(800.0, 600.0));
        assert_relative_eq!(bottom_right.x, 1.0);
        assert_relative_eq!(bottom_right.y, -1.0);
    }

    #[test]
    fn test_resize_updates_projection() {
        let mut camera = Camera::new(800.0, 600.0);
        camera.resize(400.0, 300.0);
        let center = to_ndc(&camera, Vec2::new(200.0, 150.0));
        assert_relative_eq!(center.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(center.y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_uniform_matches_matrix() {
        let camera = Camera::new(320.0, 240.0);
        let uniform = CameraUniform::new(&camera);
        assert_eq!(
            uniform.view_proj,
            camera.view_proj_matrix().to_cols_array_2d()
        );
    }
}
