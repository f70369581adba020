use glam::Vec2;
use rand::Rng;

/// Default pixels of viewport area per particle.
pub const DENSITY_DIVISOR: f32 = 30_000.0;
/// Default upper bound on the particle count, keeps the pair scan bounded.
pub const MAX_PARTICLES: u32 = 90;

const DRIFT_SPEED: f32 = 0.2;
const RADIUS_MIN: f32 = 0.6;
const RADIUS_MAX: f32 = 2.2;

/// A drifting dot. Particles carry no identity, the whole set is thrown away
/// and respawned whenever the viewport changes.
#[repr(C)]
#[derive(bytemuck::Zeroable, Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
    pub _pad: f32,
}

unsafe impl bytemuck::Pod for Particle {}

/// How many particles a viewport gets.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnParams {
    pub density_divisor: f32,
    pub max_particles: u32,
}

impl Default for SpawnParams {
    fn default() -> Self {
        Self {
            density_divisor: DENSITY_DIVISOR,
            max_particles: MAX_PARTICLES,
        }
    }
}

/// `min(max_particles, floor(area / density_divisor))`
pub fn particle_count(width: f32, height: f32, params: SpawnParams) -> u32 {
    ((width * height / params.density_divisor) as u32).min(params.max_particles)
}

/// Generate a fresh set of particles, uniform over the viewport, with a small
/// symmetric drift velocity and a radius in a fixed band.
pub fn spawn_particles<R: Rng>(rng: &mut R, width: f32, height: f32, count: u32) -> Vec<Particle> {
    (0..count)
        .map(|_| Particle {
            position: Vec2::new(rng.gen_range(0.0..width), rng.gen_range(0.0..height)),
            velocity: Vec2::new(
                rng.gen_range(-DRIFT_SPEED..DRIFT_SPEED),
                rng.gen_range(-DRIFT_SPEED..DRIFT_SPEED),
            ),
            radius: rng.gen_range(RADIUS_MIN..RADIUS_MAX),
            _pad: 0.0,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn count_follows_density_rule() {
        assert_eq!(particle_count(300.0, 300.0, SpawnParams::default()), 3);
        assert_eq!(particle_count(600.0, 300.0, SpawnParams::default()), 6);
    }

    #[test]
    fn count_is_capped() {
        let params = SpawnParams::default();
        assert_eq!(
            particle_count(10_000.0, 10_000.0, params),
            params.max_particles
        );
    }

    #[test]
    fn tiny_viewport_gets_no_particles() {
        assert_eq!(particle_count(100.0, 100.0, SpawnParams::default()), 0);
        assert!(spawn_particles(&mut StdRng::seed_from_u64(0), 100.0, 100.0, 0).is_empty());
    }

    #[test]
    fn spawn_stays_within_bands() {
        let mut rng = StdRng::seed_from_u64(7);
        for p in spawn_particles(&mut rng, 640.0, 360.0, 90) {
            assert!(p.position.x >= 0.0 && p.position.x < 640.0);
            assert!(p.position.y >= 0.0 && p.position.y < 360.0);
            assert!(p.velocity.x >= -DRIFT_SPEED && p.velocity.x < DRIFT_SPEED);
            assert!(p.velocity.y >= -DRIFT_SPEED && p.velocity.y < DRIFT_SPEED);
            assert!(p.radius >= RADIUS_MIN && p.radius < RADIUS_MAX);
        }
    }

    #[test]
    fn seeded_spawn_is_reproducible() {
        let a = spawn_particles(&mut StdRng::seed_from_u64(42), 800.0, 600.0, 16);
        let b = spawn_particles(&mut StdRng::seed_from_u64(42), 800.0, 600.0, 16);
        assert_eq!(a, b);
    }
}
