use crate::{Aabb, Vec3};

/// Plane in `normal . p + d = 0` form; the positive side is "inside".
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub d: f32,
}

impl Plane {
    #[inline]
    pub fn from_point_normal(point: Vec3, normal: Vec3) -> Self {
        let normal = normal.normalized();
        Self {
            normal,
            d: -normal.dot(point),
        }
    }

    #[inline]
    pub fn signed_distance(&self, p: Vec3) -> f32 {
        self.normal.dot(p) + self.d
    }
}

/// Six inward-facing planes of a perspective view volume.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frustum {
    pub planes: [Plane; 6],
}

impl Frustum {
    /// Builds the view volume of a perspective camera. `fovy_deg` is the full
    /// vertical field of view.
    pub fn from_camera(
        eye: Vec3,
        forward: Vec3,
        up: Vec3,
        fovy_deg: f32,
        aspect: f32,
        near: f32,
        far: f32,
    ) -> Self {
        let f = forward.normalized();
        let r = f.cross(up).normalized();
        let u = r.cross(f);
        let half_v = (fovy_deg.to_radians() * 0.5).tan();
        let half_h = half_v * aspect;

        let planes = [
            Plane::from_point_normal(eye + f * near, f),
            Plane::from_point_normal(eye + f * far, -f),
            Plane::from_point_normal(eye, r + f * half_h),
            Plane::from_point_normal(eye, -r + f * half_h),
            Plane::from_point_normal(eye, u + f * half_v),
            Plane::from_point_normal(eye, -u + f * half_v),
        ];
        Self { planes }
    }

    /// A volume that accepts every box. Handy for headless runs and tests.
    pub fn everything() -> Self {
        let p = Plane {
            normal: Vec3::ZERO,
            d: 1.0,
        };
        Self { planes: [p; 6] }
    }

    /// Conservative box test: false only when the box is fully outside one plane.
    pub fn intersects_aabb(&self, b: &Aabb) -> bool {
        for p in &self.planes {
            let n = p.normal;
            let positive = Vec3::new(
                if n.x >= 0.0 { b.max.x } else { b.min.x },
                if n.y >= 0.0 { b.max.y } else { b.min.y },
                if n.z >= 0.0 { b.max.z } else { b.min.z },
            );
            if p.signed_distance(positive) < 0.0 {
                return false;
            }
        }
        true
    }

    pub fn contains_point(&self, p: Vec3) -> bool {
        self.planes.iter().all(|pl| pl.signed_distance(p) >= 0.0)
    }
}
