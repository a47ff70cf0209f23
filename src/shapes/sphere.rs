// pbrt
use crate::core::geometry::{vec3_dot_vec3f, Normal3f, Point3f, Ray, Vector3f};
use crate::core::interaction::SurfaceInteraction;
use crate::core::pbrt::{quadratic, Float};
use crate::shapes::Shape;

#[derive(Debug, Default, Copy, Clone)]
pub struct Sphere {
    pub center: Point3f,
    pub radius: Float,
}

impl Sphere {
    pub fn new(center: Point3f, radius: Float) -> Self {
        Sphere { center, radius }
    }
}

impl Shape for Sphere {
    fn intersect(&self, ray: &mut Ray, isect: &mut SurfaceInteraction) -> bool {
        let oc: Vector3f = ray.o - self.center;
        let a: Float = vec3_dot_vec3f(&ray.d, &ray.d);
        let b: Float = 2.0 as Float * vec3_dot_vec3f(&oc, &ray.d);
        let c: Float = vec3_dot_vec3f(&oc, &oc) - self.radius * self.radius;
        let mut t0: Float = 0.0;
        let mut t1: Float = 0.0;
        if !quadratic(a, b, c, &mut t0, &mut t1) {
            return false;
        }
        // pick the closest root inside the ray's interval (the far
        // root handles rays starting inside the sphere)
        let t: Float;
        if t0 > ray.t_min && t0 < ray.t_max {
            t = t0;
        } else if t1 > ray.t_min && t1 < ray.t_max {
            t = t1;
        } else {
            return false;
        }
        ray.t_max = t;
        isect.p = ray.position(t);
        let n: Normal3f = Normal3f::from((isect.p - self.center) / self.radius);
        isect.n_g = n;
        isect.n_s = n;
        isect.epsilon = 1.0e-4 as Float * self.radius;
        true
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn hits_from_outside_and_inside() {
        let sphere = Sphere::new(Point3f::default(), 1.0);
        let mut isect = SurfaceInteraction::default();
        let mut ray = Ray::new(
            Point3f {
                x: 0.0,
                y: 0.0,
                z: -3.0,
            },
            Vector3f {
                x: 0.0,
                y: 0.0,
                z: 1.0,
            },
        );
        assert!(sphere.intersect(&mut ray, &mut isect));
        assert!((ray.t_max - 2.0).abs() < 1e-4);
        assert!((isect.n_g.z - -1.0).abs() < 1e-4);
        // from the center, the far root is the hit
        let mut inside = Ray::new(
            Point3f::default(),
            Vector3f {
                x: 1.0,
                y: 0.0,
                z: 0.0,
            },
        );
        assert!(sphere.intersect(&mut inside, &mut isect));
        assert!((inside.t_max - 1.0).abs() < 1e-4);
    }

    #[test]
    fn respects_ray_interval() {
        let sphere = Sphere::new(Point3f::default(), 1.0);
        let mut isect = SurfaceInteraction::default();
        let mut ray = Ray::new(
            Point3f {
                x: 0.0,
                y: 0.0,
                z: -3.0,
            },
            Vector3f {
                x: 0.0,
                y: 0.0,
                z: 1.0,
            },
        );
        ray.t_max = 1.5;
        assert!(!sphere.intersect(&mut ray, &mut isect));
    }
}
