use rand::Rng;

use crate::particle::{particle_count, spawn_particles, Particle, SpawnParams};

/// The live particle store plus the bounds it drifts inside.
pub struct ParticleField {
    width: f32,
    height: f32,
    params: SpawnParams,
    particles: Vec<Particle>,
}

impl ParticleField {
    pub fn new<R: Rng>(rng: &mut R, width: f32, height: f32, params: SpawnParams) -> Self {
        let count = particle_count(width, height, params);
        Self {
            width,
            height,
            params,
            particles: spawn_particles(rng, width, height, count),
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// Replace the whole store for a new viewport. The count is recomputed
    /// from the new area; old particles are discarded, never migrated.
    pub fn rebuild<R: Rng>(&mut self, rng: &mut R, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        let count = particle_count(width, height, self.params);
        self.particles = spawn_particles(rng, width, height, count);
    }

    /// Replace the store in place with new spawn parameters.
    pub fn respawn<R: Rng>(&mut self, rng: &mut R, params: SpawnParams) {
        self.params = params;
        let count = particle_count(self.width, self.height, params);
        self.particles = spawn_particles(rng, self.width, self.height, count);
    }

    /// One physics step: drift every particle by its velocity, then reflect
    /// off any of the four edges it crossed. Positions are not clamped, the
    /// flipped velocity walks the particle back on later steps.
    pub fn advance(&mut self) {
        for p in &mut self.particles {
            p.position += p.velocity;
            if p.position.x < 0.0 || p.position.x > self.width {
                p.velocity.x = -p.velocity.x;
            }
            if p.position.y < 0.0 || p.position.y > self.height {
                p.velocity.y = -p.velocity.y;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    fn field_with(width: f32, height: f32, particles: Vec<Particle>) -> ParticleField {
        ParticleField {
            width,
            height,
            params: SpawnParams::default(),
            particles,
        }
    }

    fn particle(position: Vec2, velocity: Vec2) -> Particle {
        Particle {
            position,
            velocity,
            radius: 1.0,
            _pad: 0.0,
        }
    }

    #[test]
    fn advance_moves_by_velocity() {
        let mut field = field_with(
            100.0,
            100.0,
            vec![particle(Vec2::new(50.0, 50.0), Vec2::new(0.1, -0.2))],
        );
        field.advance();
        let p = field.particles()[0];
        assert!(p.position.distance(Vec2::new(50.1, 49.8)) < 1e-4);
        assert_eq!(p.velocity, Vec2::new(0.1, -0.2));
    }

    #[test]
    fn reflects_at_right_edge() {
        let mut field = field_with(
            300.0,
            300.0,
            vec![particle(Vec2::new(299.9, 150.0), Vec2::new(0.3, 0.0))],
        );
        field.advance();
        let p = field.particles()[0];
        assert!((p.position.x - 300.2).abs() < 1e-4);
        assert!((p.velocity.x + 0.3).abs() < 1e-6);
    }

    #[test]
    fn reflects_at_left_and_top_edges() {
        let mut field = field_with(
            200.0,
            200.0,
            vec![particle(Vec2::new(0.05, 0.05), Vec2::new(-0.2, -0.2))],
        );
        field.advance();
        let p = field.particles()[0];
        assert_eq!(p.velocity, Vec2::new(0.2, 0.2));
    }

    #[test]
    fn reflection_flips_one_axis_at_a_time() {
        let mut field = field_with(
            100.0,
            100.0,
            vec![particle(Vec2::new(99.95, 50.0), Vec2::new(0.1, 0.15))],
        );
        field.advance();
        let p = field.particles()[0];
        assert!((p.velocity.x + 0.1).abs() < 1e-6);
        assert!((p.velocity.y - 0.15).abs() < 1e-6);
    }

    #[test]
    fn advance_on_empty_field_is_a_noop() {
        let mut field = field_with(50.0, 50.0, Vec::new());
        field.advance();
        assert!(field.is_empty());
    }

    #[test]
    fn rebuild_recomputes_count_and_replaces_particles() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut field = ParticleField::new(&mut rng, 300.0, 300.0, SpawnParams::default());
        assert_eq!(field.len(), 3);

        field.rebuild(&mut rng, 600.0, 600.0);
        assert_eq!(field.len(), 12);
        assert_eq!(field.width(), 600.0);

        field.rebuild(&mut rng, 100.0, 100.0);
        assert!(field.is_empty());
    }

    #[test]
    fn respawn_applies_new_params() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut field = ParticleField::new(&mut rng, 1000.0, 1000.0, SpawnParams::default());
        assert_eq!(field.len(), 33);

        field.respawn(
            &mut rng,
            SpawnParams {
                density_divisor: 30_000.0,
                max_particles: 10,
            },
        );
        assert_eq!(field.len(), 10);
    }
}
