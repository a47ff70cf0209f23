//! The photon tracer. `trace_photon` constructs one light-sampled
//! path and deposits surface, volume, and path photon records into
//! the bounded buffers. `trace_sample` drives one eye ray through
//! media and specular or transparent surface events, collecting
//! in-scattered radiance from one of two volumetric estimators along
//! the way, and finishes with a k-nearest-neighbour density estimate
//! over the surface photons.

// pbrt
use crate::accelerators::beam_bvh::{BeamBvh, BeamVisitor};
use crate::accelerators::photon_kdtree::{PhotonKdTree, VolumePhotonVisitor};
use crate::core::geometry::{nrm_dot_vec3f, vec3_cross_vec3, vec3_dot_nrmf, vec3_dot_vec3f};
use crate::core::geometry::{Point2i, Ray, Vector3f};
use crate::core::interaction::{DirectionSample, PositionSample, SurfaceInteraction};
use crate::core::medium::{Medium, MediumSample, MediumState, PhaseSample};
use crate::core::pbrt::{Float, Spectrum, INV_PI};
use crate::core::photon::{
    PathInfo, PathPhoton, PathPhotonRange, Photon, SurfacePhotonRange, VolumePhoton,
    VolumePhotonRange,
};
use crate::core::reflection::{is_pure_specular, LobeType, SurfaceScatterEvent};
use crate::core::sampler::Sampler;
use crate::core::scene::Scene;
use crate::integrators::PhotonMapSettings;

use std::sync::Arc;

/// One of the two interchangeable volumetric density estimation
/// strategies. The camera path tracer only sees this interface; which
/// strategy runs is decided by which spatial index the caller wraps.
pub trait VolumeEstimator {
    /// In-scattered radiance collected along the ray segment from the
    /// stored photons, before scaling by the camera throughput.
    fn beam_estimate(
        &self,
        sampler: &mut dyn Sampler,
        medium: &dyn Medium,
        ray: &Ray,
        bounce: i32,
        settings: &PhotonMapSettings,
    ) -> Spectrum;
}

/// Point-photon strategy: query every stored volume photon whose
/// kernel disc overlaps the ray and weight it by a radially symmetric
/// cone kernel.
pub struct PointPhotonEstimator<'a> {
    pub tree: &'a PhotonKdTree<VolumePhoton>,
}

struct PointQueryVisitor<'a, 'b> {
    sampler: &'a mut dyn Sampler,
    medium: &'b dyn Medium,
    ray: Ray,
    bounce: i32,
    min_bounces: i32,
    max_bounces: i32,
    estimate: Spectrum,
}

impl VolumePhotonVisitor for PointQueryVisitor<'_, '_> {
    fn visit(&mut self, photon: &VolumePhoton, t: Float, dist_sq: Float) {
        let full_path_bounce: i32 = self.bounce + photon.bounce - 1;
        if full_path_bounce < self.min_bounces || full_path_bounce >= self.max_bounces {
            return;
        }
        let mut segment: Ray = self.ray;
        segment.t_max = t;
        let x: Float = 1.0 as Float - dist_sq / photon.radius_sq;
        let kernel: Float = 3.0 as Float * INV_PI * x * x / photon.radius_sq;
        let phase: Float = self
            .medium
            .phase_function(&photon.pos)
            .eval(&self.ray.d, &-photon.dir);
        self.estimate += self.medium.transmittance(self.sampler, &segment)
            * photon.power
            * (kernel * phase);
    }
}

impl VolumeEstimator for PointPhotonEstimator<'_> {
    fn beam_estimate(
        &self,
        sampler: &mut dyn Sampler,
        medium: &dyn Medium,
        ray: &Ray,
        bounce: i32,
        settings: &PhotonMapSettings,
    ) -> Spectrum {
        let mut visitor = PointQueryVisitor {
            sampler,
            medium,
            ray: *ray,
            bounce,
            min_bounces: settings.min_bounces,
            max_bounces: settings.max_bounces,
            estimate: Spectrum::default(),
        };
        self.tree.beam_query(ray, &mut visitor);
        visitor.estimate
    }
}

/// Beam strategy: intersect the ray with the stored photon path
/// segments and weight each crossing by a line kernel.
pub struct BeamEstimator<'a> {
    pub bvh: &'a BeamBvh,
    pub path_photons: &'a [PathPhoton],
}

struct BeamQueryVisitor<'a, 'b, 'c> {
    sampler: &'a mut dyn Sampler,
    medium: &'b dyn Medium,
    path_photons: &'c [PathPhoton],
    ray: Ray,
    bounce: i32,
    min_bounces: i32,
    max_bounces: i32,
    radius: Float,
    estimate: Spectrum,
}

impl BeamVisitor for BeamQueryVisitor<'_, '_, '_> {
    fn visit(&mut self, index: usize) {
        let p0: &PathPhoton = &self.path_photons[index];
        let p1: &PathPhoton = &self.path_photons[index + 1];
        let full_path_bounce: i32 = self.bounce + p0.info.bounce;
        if full_path_bounce < self.min_bounces || full_path_bounce >= self.max_bounces {
            return;
        }
        // minimal distance between the two skew lines
        let u: Vector3f = vec3_cross_vec3(&self.ray.d, &p0.dir);
        let sin_theta: Float = u.length();
        if sin_theta <= 0.0 as Float {
            // ray and beam are parallel
            return;
        }
        let inv_sin_theta: Float = 1.0 as Float / sin_theta;
        let l: Vector3f = p0.pos - self.ray.o;
        let d: Float = inv_sin_theta * vec3_dot_vec3f(&u, &l);
        if d.abs() > self.radius {
            return;
        }
        let n: Vector3f = vec3_cross_vec3(&p0.dir, &u);
        let denom: Float = vec3_dot_vec3f(&n, &self.ray.d);
        if denom == 0.0 as Float {
            return;
        }
        let t: Float = vec3_dot_vec3f(&n, &l) / denom;
        let hit_point = self.ray.position(t);
        let s: Float = vec3_dot_vec3f(&p0.dir, &(hit_point - p0.pos));
        if t >= self.ray.t_min
            && t <= self.ray.t_max
            && s >= 0.0 as Float
            && s <= p0.length
        {
            let mut segment: Ray = self.ray;
            segment.t_max = t;
            let phase: Float = self
                .medium
                .phase_function(&hit_point)
                .eval(&self.ray.d, &-p0.dir);
            self.estimate += self.medium.sigma_t(&hit_point)
                * self.medium.transmittance(self.sampler, &segment)
                * p1.power
                * (inv_sin_theta / (2.0 as Float * self.radius) * phase);
        }
    }
}

impl VolumeEstimator for BeamEstimator<'_> {
    fn beam_estimate(
        &self,
        sampler: &mut dyn Sampler,
        medium: &dyn Medium,
        ray: &Ray,
        bounce: i32,
        settings: &PhotonMapSettings,
    ) -> Spectrum {
        let mut visitor = BeamQueryVisitor {
            sampler,
            medium,
            path_photons: self.path_photons,
            ray: *ray,
            bounce,
            min_bounces: settings.min_bounces,
            max_bounces: settings.max_bounces,
            radius: settings.volume_gather_radius,
            estimate: Spectrum::default(),
        };
        self.bvh.trace(ray, &mut visitor);
        visitor.estimate
    }
}

/// Resolve a surface scattering event: sample the BSDF, update the
/// throughput, pick the medium on the side the new direction points
/// to, and respawn the ray. Returns false when the path terminates
/// (a rejected sample, not an error).
fn handle_surface(
    event: &mut SurfaceScatterEvent,
    isect: &SurfaceInteraction,
    scene: &Scene,
    medium: &mut Option<Arc<dyn Medium + Send + Sync>>,
    ray: &mut Ray,
    throughput: &mut Spectrum,
    sampler: &mut dyn Sampler,
    adjoint: bool,
) -> bool {
    let primitive = &scene.primitives[isect.primitive];
    if !primitive.bsdf.sample(event, sampler, adjoint) {
        return false;
    }
    let wo_world: Vector3f = event.frame.to_global(&event.wo);
    *throughput *= event.weight;
    let geometric_backside: bool = vec3_dot_nrmf(&wo_world, &isect.n_g) < 0.0 as Float;
    *medium = primitive.select_medium(medium, geometric_backside);
    *ray = ray.scatter(&isect.p, &wo_world, isect.epsilon);
    true
}

/// A per-thread photon tracing and gathering unit. The scratch query
/// buffers are allocated once per instance and reused on every
/// surface gather; instances are never shared across threads.
pub struct PhotonTracer {
    settings: PhotonMapSettings,
    photon_query: Vec<u32>,
    distance_query: Vec<Float>,
}

impl PhotonTracer {
    pub fn new(settings: &PhotonMapSettings) -> Self {
        PhotonTracer {
            settings: *settings,
            photon_query: vec![0_u32; settings.gather_count],
            distance_query: vec![0.0 as Float; settings.gather_count],
        }
    }
    pub fn settings(&self) -> &PhotonMapSettings {
        &self.settings
    }
    /// Construct one photon path from an importance-sampled light and
    /// record its vertices into the three bounded buffers. All
    /// termination conditions (rejected samples, exhausted bounce
    /// budget, saturated buffers, non-finite state) leave behind a
    /// valid, possibly zero-length sample.
    pub fn trace_photon(
        &self,
        scene: &Scene,
        surface_range: &mut SurfacePhotonRange,
        volume_range: &mut VolumePhotonRange,
        path_range: &mut PathPhotonRange,
        sampler: &mut dyn Sampler,
    ) {
        let mut light_pdf: Float = 0.0;
        let u_light: Float = sampler.get_1d();
        let light = match scene.choose_light_adjoint(u_light, &mut light_pdf) {
            Some(light) => light,
            None => return,
        };
        let mut medium: Option<Arc<dyn Medium + Send + Sync>> = light.ext_medium();

        let mut point: PositionSample = PositionSample::default();
        if !light.sample_position(sampler, &mut point) {
            return;
        }
        let mut direction: DirectionSample = DirectionSample::default();
        if !light.sample_direction(sampler, &point, &mut direction) {
            return;
        }

        let mut ray: Ray = Ray::new(point.p, direction.d);
        let mut throughput: Spectrum = point.weight * direction.weight / light_pdf;

        let mut state: MediumState = MediumState::default();
        state.reset();

        if !path_range.full() {
            let p: &mut PathPhoton = path_range.add_photon();
            p.pos = point.p;
            p.power = throughput;
            p.info = PathInfo {
                bounce: 0,
                in_volume: false,
            };
        }

        let mut bounce: i32 = 0;
        let mut isect: SurfaceInteraction = SurfaceInteraction::default();
        let mut did_hit: bool = scene.intersect(&mut ray, &mut isect);
        while (did_hit || medium.is_some()) && bounce < self.settings.max_bounces - 1 {
            bounce += 1;

            let mut hit_surface: bool = true;
            if let Some(ref med) = medium {
                let mut medium_sample: MediumSample = MediumSample::default();
                if !med.sample_distance(sampler, &ray, &mut state, &mut medium_sample) {
                    break;
                }
                throughput *= medium_sample.weight;
                hit_surface = medium_sample.exited;

                if !hit_surface {
                    if !volume_range.full() {
                        let p: &mut VolumePhoton = volume_range.add_photon();
                        p.pos = medium_sample.p;
                        p.dir = ray.d;
                        p.power = throughput;
                        p.bounce = bounce;
                    }
                    if !path_range.full() {
                        let p: &mut PathPhoton = path_range.add_photon();
                        p.pos = medium_sample.p;
                        p.power = throughput;
                        p.info = PathInfo {
                            bounce,
                            in_volume: true,
                        };
                    }

                    let mut phase_sample: PhaseSample = PhaseSample::default();
                    if !med
                        .phase_function(&medium_sample.p)
                        .sample(sampler, &ray.d, &mut phase_sample)
                    {
                        break;
                    }
                    ray = ray.scatter(&medium_sample.p, &phase_sample.w, 0.0 as Float);
                    throughput *= phase_sample.weight;
                }
            }

            if hit_surface {
                if !did_hit {
                    // a degenerate medium reported an exit with no
                    // boundary to exit through
                    break;
                }
                let primitive = &scene.primitives[isect.primitive];
                if !is_pure_specular(primitive.bsdf.lobes()) && !surface_range.full() {
                    let p: &mut Photon = surface_range.add_photon();
                    p.pos = isect.p;
                    p.dir = ray.d;
                    // offset the shading-normal asymmetry here so the
                    // gather can use the plain (non-adjoint) response
                    p.power = throughput
                        * (nrm_dot_vec3f(&isect.n_s, &ray.d) / nrm_dot_vec3f(&isect.n_g, &ray.d))
                            .abs();
                    p.bounce = bounce;
                }
                if !path_range.full() {
                    let p: &mut PathPhoton = path_range.add_photon();
                    p.pos = isect.p;
                    p.power = throughput;
                    p.info = PathInfo {
                        bounce,
                        in_volume: false,
                    };
                }
            }

            if volume_range.full() && surface_range.full() && path_range.full() {
                break;
            }

            if hit_surface {
                let mut event: SurfaceScatterEvent = SurfaceScatterEvent::new(&isect, &ray);
                if !handle_surface(
                    &mut event,
                    &isect,
                    scene,
                    &mut medium,
                    &mut ray,
                    &mut throughput,
                    sampler,
                    true,
                ) {
                    break;
                }
            }

            if throughput.max_component_value() == 0.0 as Float {
                break;
            }
            if !ray.d.is_finite() || !ray.o.is_finite() || !throughput.is_finite() {
                break;
            }

            if bounce < self.settings.max_bounces {
                did_hit = scene.intersect(&mut ray, &mut isect);
            }
        }
    }
    /// Trace one eye ray for the given pixel and reconstruct its
    /// radiance from the photon maps. Exactly one volumetric strategy
    /// runs per medium segment (whichever index the caller supplied);
    /// a surviving surface hit always ends in the surface gather.
    pub fn trace_sample(
        &mut self,
        scene: &Scene,
        pixel: Point2i,
        surface_tree: &PhotonKdTree<Photon>,
        volume_estimator: Option<&dyn VolumeEstimator>,
        sampler: &mut dyn Sampler,
    ) -> Spectrum {
        let mut point: PositionSample = PositionSample::default();
        if !scene.camera.sample_position(sampler, &mut point) {
            return Spectrum::default();
        }
        let mut direction: DirectionSample = DirectionSample::default();
        if !scene
            .camera
            .sample_direction(sampler, &point, pixel, &mut direction)
        {
            return Spectrum::default();
        }

        let mut throughput: Spectrum = point.weight * direction.weight;
        let mut ray: Ray = Ray::new(point.p, direction.d);
        let mut medium: Option<Arc<dyn Medium + Send + Sync>> = scene.camera.medium();

        let mut result: Spectrum = Spectrum::default();
        let mut bounce: i32 = 0;
        let mut isect: SurfaceInteraction = SurfaceInteraction::default();
        let mut did_hit: bool = scene.intersect(&mut ray, &mut isect);
        while (medium.is_some() || did_hit) && bounce < self.settings.max_bounces {
            bounce += 1;

            if let Some(ref med) = medium {
                if let Some(estimator) = volume_estimator {
                    result += throughput
                        * estimator.beam_estimate(
                            sampler,
                            med.as_ref(),
                            &ray,
                            bounce,
                            &self.settings,
                        );
                }
                throughput *= med.transmittance(sampler, &ray);
            }
            if !did_hit {
                break;
            }

            let primitive = &scene.primitives[isect.primitive];
            let mut event: SurfaceScatterEvent = SurfaceScatterEvent::new(&isect, &ray);

            // stochastically split between pass-through and
            // specular-only scattering; dividing by the probability
            // keeps the estimator's expectation unchanged
            let transparency: Spectrum = primitive.bsdf.eval(&event.make_forward_event(), false);
            let transparency_scalar: Float = transparency.avg();

            let wo_world: Vector3f;
            if sampler.next_bool(transparency_scalar) {
                wo_world = ray.d;
                throughput *= transparency / transparency_scalar;
            } else {
                event.requested_lobe = LobeType::Specular as u8;
                if !primitive.bsdf.sample(&mut event, sampler, false) {
                    break;
                }
                wo_world = event.frame.to_global(&event.wo);
                throughput *= event.weight;
            }

            let geometric_backside: bool = vec3_dot_nrmf(&wo_world, &isect.n_g) < 0.0 as Float;
            medium = primitive.select_medium(&medium, geometric_backside);

            ray = ray.scatter(&isect.p, &wo_world, isect.epsilon);

            if !ray.d.is_finite() || !ray.o.is_finite() || !throughput.is_finite() {
                break;
            }

            if bounce < self.settings.max_bounces {
                did_hit = scene.intersect(&mut ray, &mut isect);
            }
        }

        if !did_hit {
            if medium.is_none()
                && bounce > self.settings.min_bounces
                && scene.intersect_infinites(&ray, &mut isect)
            {
                result +=
                    throughput * scene.primitives[isect.primitive].eval_direct(&isect, &ray.d);
            }
            return result;
        }
        let primitive = &scene.primitives[isect.primitive];
        if primitive.is_emissive() && bounce > self.settings.min_bounces {
            result += throughput * primitive.eval_direct(&isect, &ray.d);
        }

        // surface gather: bounded k-nearest-neighbour density
        // estimate at the hit point
        let count: usize = surface_tree.nearest_neighbours(
            &isect.p,
            &mut self.photon_query[..],
            &mut self.distance_query[..],
            self.settings.gather_count,
            self.settings.gather_radius,
        );
        if count == 0 {
            return result;
        }

        let mut event: SurfaceScatterEvent = SurfaceScatterEvent::new(&isect, &ray);
        let mut surface_estimate: Spectrum = Spectrum::default();
        for i in 0..count {
            let photon: &Photon = &surface_tree.photons[self.photon_query[i] as usize];
            let full_path_bounce: i32 = bounce + photon.bounce - 1;
            if full_path_bounce < self.settings.min_bounces
                || full_path_bounce >= self.settings.max_bounces
            {
                continue;
            }
            event.wo = event.frame.to_local(&-photon.dir);
            if event.wo.z == 0.0 as Float {
                continue;
            }
            // the shading-normal asymmetry was compensated when the
            // photon was stored, so the plain (non-adjoint) response
            // applies; its cosine is divided back out because photon
            // density already accounts for it
            surface_estimate +=
                photon.power * primitive.bsdf.eval(&event, false) / event.wo.z.abs();
        }
        let radius_sq: Float = if count == self.settings.gather_count {
            self.distance_query[0]
        } else {
            self.settings.gather_radius * self.settings.gather_radius
        };
        result += throughput * surface_estimate * (INV_PI / radius_sq);

        result
    }
}
