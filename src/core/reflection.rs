//! Surface scattering. A **Bsdf** describes how a surface reflects
//! or transmits light; the photon tracer asks it three questions:
//! evaluate a response, sample an outgoing direction, and classify
//! its lobes (a purely specular surface never stores photons, and a
//! forward lobe carries transparency for the camera-side
//! pass-through split).

// pbrt
use crate::core::geometry::{vec3_coordinate_system, vec3_dot_vec3f};
use crate::core::geometry::{Normal3f, Ray, Vector3f};
use crate::core::interaction::SurfaceInteraction;
use crate::core::pbrt::{Float, Spectrum, INV_PI};
use crate::core::sampler::Sampler;
use crate::core::sampling::{cosine_hemisphere_pdf, cosine_sample_hemisphere};

#[repr(u8)]
pub enum LobeType {
    Diffuse = 1,
    Glossy = 2,
    Specular = 4,
    Forward = 8,
}

pub const LOBE_ALL: u8 =
    LobeType::Diffuse as u8 | LobeType::Glossy as u8 | LobeType::Specular as u8 | LobeType::Forward as u8;

/// True when the lobe set contains nothing an area density estimate
/// could resolve (delta lobes only). Such surfaces never receive
/// surface photons.
pub fn is_pure_specular(lobes: u8) -> bool {
    lobes != 0_u8 && (lobes & !(LobeType::Specular as u8 | LobeType::Forward as u8)) == 0_u8
}

/// An orthonormal basis around the shading normal. Scatter events are
/// expressed in this frame with the normal along +z.
#[derive(Debug, Default, Copy, Clone)]
pub struct ShadingFrame {
    pub tangent: Vector3f,
    pub bitangent: Vector3f,
    pub normal: Vector3f,
}

impl ShadingFrame {
    pub fn new(n: &Normal3f) -> Self {
        let normal: Vector3f = Vector3f::from(*n);
        let mut tangent: Vector3f = Vector3f::default();
        let mut bitangent: Vector3f = Vector3f::default();
        vec3_coordinate_system(&normal, &mut tangent, &mut bitangent);
        ShadingFrame {
            tangent,
            bitangent,
            normal,
        }
    }
    pub fn to_local(&self, v: &Vector3f) -> Vector3f {
        Vector3f {
            x: vec3_dot_vec3f(v, &self.tangent),
            y: vec3_dot_vec3f(v, &self.bitangent),
            z: vec3_dot_vec3f(v, &self.normal),
        }
    }
    pub fn to_global(&self, v: &Vector3f) -> Vector3f {
        self.tangent * v.x + self.bitangent * v.y + self.normal * v.z
    }
}

/// One scattering event at a surface, expressed in the local shading
/// frame. `wi` points towards the origin of the arriving ray, `wo` is
/// the sampled continuation.
#[derive(Debug, Default, Copy, Clone)]
pub struct SurfaceScatterEvent {
    pub frame: ShadingFrame,
    pub wi: Vector3f,
    pub wo: Vector3f,
    pub weight: Spectrum,
    pub pdf: Float,
    pub requested_lobe: u8,
    pub sampled_lobe: u8,
}

impl SurfaceScatterEvent {
    pub fn new(isect: &SurfaceInteraction, ray: &Ray) -> Self {
        let frame: ShadingFrame = ShadingFrame::new(&isect.n_s);
        let wi: Vector3f = frame.to_local(&-ray.d);
        SurfaceScatterEvent {
            frame,
            wi,
            wo: Vector3f::default(),
            weight: Spectrum::new(1.0 as Float),
            pdf: 1.0 as Float,
            requested_lobe: LOBE_ALL,
            sampled_lobe: 0_u8,
        }
    }
    /// The straight-through event used to query a surface's
    /// transparency magnitude.
    pub fn make_forward_event(&self) -> Self {
        let mut event: SurfaceScatterEvent = *self;
        event.wo = -event.wi;
        event.requested_lobe = LobeType::Forward as u8;
        event
    }
}

#[derive(Debug, Copy, Clone)]
pub struct LambertBsdf {
    pub albedo: Spectrum,
}

#[derive(Debug, Copy, Clone)]
pub struct MirrorBsdf {
    pub reflectance: Spectrum,
}

#[derive(Debug, Copy, Clone)]
pub struct ForwardBsdf {
    pub transmittance: Spectrum,
}

/// The surface scattering models the tracer can resolve. Evaluated
/// responses are weighted by the outgoing cosine; the surface gather
/// divides that cosine back out because photon density already
/// accounts for it.
#[derive(Debug, Copy, Clone)]
pub enum Bsdf {
    Lambert(LambertBsdf),
    Mirror(MirrorBsdf),
    Forward(ForwardBsdf),
}

impl Bsdf {
    pub fn lobes(&self) -> u8 {
        match self {
            Bsdf::Lambert(_) => LobeType::Diffuse as u8,
            Bsdf::Mirror(_) => LobeType::Specular as u8,
            Bsdf::Forward(_) => LobeType::Forward as u8,
        }
    }
    pub fn eval(&self, event: &SurfaceScatterEvent, _adjoint: bool) -> Spectrum {
        match self {
            Bsdf::Lambert(bsdf) => {
                if event.requested_lobe & LobeType::Diffuse as u8 == 0_u8 {
                    return Spectrum::default();
                }
                // reflection only: both directions on the same side
                if event.wi.z * event.wo.z <= 0.0 as Float {
                    return Spectrum::default();
                }
                bsdf.albedo * (INV_PI * event.wo.z.abs())
            }
            // delta lobes have no evaluable density
            Bsdf::Mirror(_) => Spectrum::default(),
            Bsdf::Forward(bsdf) => {
                if event.requested_lobe == LobeType::Forward as u8 {
                    bsdf.transmittance
                } else {
                    Spectrum::default()
                }
            }
        }
    }
    pub fn sample(
        &self,
        event: &mut SurfaceScatterEvent,
        sampler: &mut dyn Sampler,
        _adjoint: bool,
    ) -> bool {
        match self {
            Bsdf::Lambert(bsdf) => {
                if event.requested_lobe & LobeType::Diffuse as u8 == 0_u8 {
                    return false;
                }
                let mut wo: Vector3f = cosine_sample_hemisphere(&sampler.get_2d());
                if event.wi.z < 0.0 as Float {
                    wo.z = -wo.z;
                }
                let pdf: Float = cosine_hemisphere_pdf(wo.z.abs());
                if pdf == 0.0 as Float {
                    return false;
                }
                event.wo = wo;
                event.pdf = pdf;
                // cosine and pdf cancel against the evaluated response
                event.weight = bsdf.albedo;
                event.sampled_lobe = LobeType::Diffuse as u8;
                true
            }
            Bsdf::Mirror(bsdf) => {
                if event.requested_lobe & LobeType::Specular as u8 == 0_u8 {
                    return false;
                }
                event.wo = Vector3f {
                    x: -event.wi.x,
                    y: -event.wi.y,
                    z: event.wi.z,
                };
                event.pdf = 1.0 as Float;
                event.weight = bsdf.reflectance;
                event.sampled_lobe = LobeType::Specular as u8;
                true
            }
            Bsdf::Forward(bsdf) => {
                if event.requested_lobe & LobeType::Forward as u8 == 0_u8 {
                    return false;
                }
                event.wo = -event.wi;
                event.pdf = 1.0 as Float;
                event.weight = bsdf.transmittance;
                event.sampled_lobe = LobeType::Forward as u8;
                true
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::geometry::Point3f;

    #[test]
    fn lobe_classification() {
        let mirror = Bsdf::Mirror(MirrorBsdf {
            reflectance: Spectrum::new(1.0),
        });
        let lambert = Bsdf::Lambert(LambertBsdf {
            albedo: Spectrum::new(0.5),
        });
        let forward = Bsdf::Forward(ForwardBsdf {
            transmittance: Spectrum::new(1.0),
        });
        assert!(is_pure_specular(mirror.lobes()));
        assert!(is_pure_specular(forward.lobes()));
        assert!(!is_pure_specular(lambert.lobes()));
    }

    #[test]
    fn forward_event_reports_transparency() {
        let bsdf = Bsdf::Forward(ForwardBsdf {
            transmittance: Spectrum::rgb(0.25, 0.5, 0.75),
        });
        let isect = SurfaceInteraction {
            n_s: Normal3f {
                x: 0.0,
                y: 0.0,
                z: 1.0,
            },
            n_g: Normal3f {
                x: 0.0,
                y: 0.0,
                z: 1.0,
            },
            ..SurfaceInteraction::default()
        };
        let ray = Ray::new(
            Point3f {
                x: 0.0,
                y: 0.0,
                z: 1.0,
            },
            Vector3f {
                x: 0.0,
                y: 0.0,
                z: -1.0,
            },
        );
        let event = SurfaceScatterEvent::new(&isect, &ray);
        let transparency = bsdf.eval(&event.make_forward_event(), false);
        assert_eq!(transparency, Spectrum::rgb(0.25, 0.5, 0.75));
        // the full-lobe query must not see the delta forward lobe
        assert!(bsdf.eval(&event, false).is_black());
    }

    #[test]
    fn lambert_eval_is_cosine_weighted() {
        let bsdf = Bsdf::Lambert(LambertBsdf {
            albedo: Spectrum::new(0.8),
        });
        let mut event = SurfaceScatterEvent {
            wi: Vector3f {
                x: 0.0,
                y: 0.0,
                z: 1.0,
            },
            wo: Vector3f {
                x: 0.0,
                y: 0.0,
                z: 1.0,
            },
            requested_lobe: LOBE_ALL,
            ..SurfaceScatterEvent::default()
        };
        let f = bsdf.eval(&event, false);
        assert!((f.c[0] - 0.8 * INV_PI).abs() < 1e-6);
        // transmission side evaluates to black
        event.wo.z = -1.0;
        assert!(bsdf.eval(&event, false).is_black());
    }
}
