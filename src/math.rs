//! Math types, re-exported from `cgmath`, and the transforms of the frame loop.

pub use cgmath::{ortho, Matrix4, SquareMatrix, Vector2, Vector3, Vector4};

/// An orthographic projection mapping `[-aspect, aspect] x [-1, 1]` to clip
/// space, so a unit square stays square whatever the window's aspect ratio.
pub fn projection(width: u32, height: u32) -> Matrix4<f32> {
    let aspect = if width == 0 || height == 0 {
        1.0
    } else {
        width as f32 / height as f32
    };

    ortho(-aspect, aspect, -1.0, 1.0, -1.0, 1.0)
}

/// The combined model-view-projection transform.
#[inline]
pub fn mvp(projection: &Matrix4<f32>, view: &Matrix4<f32>, model: &Matrix4<f32>) -> Matrix4<f32> {
    projection * view * model
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vector4<f32>, b: Vector4<f32>) -> bool {
        (a - b).x.abs() < 1e-5 && (a - b).y.abs() < 1e-5 && (a - b).z.abs() < 1e-5 && (a - b).w.abs() < 1e-5
    }

    #[test]
    fn square_projection() {
        let p = projection(480, 480);
        let v = p * Vector4::new(1.0, -1.0, 0.0, 1.0);
        assert!(close(v, Vector4::new(1.0, -1.0, 0.0, 1.0)));
    }

    #[test]
    fn aspect_projection() {
        let p = projection(800, 400);
        let v = p * Vector4::new(1.0, 1.0, 0.0, 1.0);
        assert!(close(v, Vector4::new(0.5, 1.0, 0.0, 1.0)));
        assert_eq!(projection(0, 0), projection(1, 1));
    }

    #[test]
    fn translation() {
        let model = Matrix4::from_translation(Vector3::new(0.25, -0.5, 0.0));
        let m = mvp(&projection(640, 640), &Matrix4::identity(), &model);
        let v = m * Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert!(close(v, Vector4::new(0.25, -0.5, 0.0, 1.0)));
    }
}
