use plexus::field::ParticleField;
use plexus::links::links;
use plexus::particle::SpawnParams;
use rand::{rngs::StdRng, SeedableRng};

fn seeded_field(seed: u64, width: f32, height: f32) -> ParticleField {
    let mut rng = StdRng::seed_from_u64(seed);
    ParticleField::new(&mut rng, width, height, SpawnParams::default())
}

// ==================================================================================
// Density rule
// ==================================================================================

#[test]
fn density_rule_end_to_end() {
    // 300 * 300 / 30000 = 3
    assert_eq!(seeded_field(1, 300.0, 300.0).len(), 3);

    // A large viewport saturates at the cap.
    assert_eq!(seeded_field(1, 3840.0, 2160.0).len(), 90);
}

#[test]
fn resize_replaces_the_whole_store() {
    let mut rng = StdRng::seed_from_u64(2);
    let mut field = ParticleField::new(&mut rng, 1920.0, 1080.0, SpawnParams::default());
    let before = field.particles().to_vec();

    field.rebuild(&mut rng, 1920.0, 1080.0);
    let after = field.particles();

    // Same dimensions, same count, but every particle is a new draw.
    assert_eq!(before.len(), after.len());
    assert_ne!(before, after);
}

// ==================================================================================
// Long-run physics invariants
// ==================================================================================

#[test]
fn particles_never_escape_the_bounds() {
    let mut field = seeded_field(3, 800.0, 600.0);

    // Reflection happens after the move, so a particle can overshoot an edge
    // by at most one velocity step (|v| < 0.2 per axis).
    for _ in 0..10_000 {
        field.advance();
        for p in field.particles() {
            assert!(p.position.x > -0.2 && p.position.x < 800.2);
            assert!(p.position.y > -0.2 && p.position.y < 600.2);
        }
    }
}

#[test]
fn reflection_preserves_speed() {
    let mut field = seeded_field(4, 640.0, 480.0);
    let speeds: Vec<f32> = field
        .particles()
        .iter()
        .map(|p| (p.velocity.x.abs(), p.velocity.y.abs()))
        .map(|(x, y)| x + y)
        .collect();

    for _ in 0..10_000 {
        field.advance();
    }

    for (p, speed) in field.particles().iter().zip(speeds) {
        let now = p.velocity.x.abs() + p.velocity.y.abs();
        assert!((now - speed).abs() < 1e-5);
    }
}

// ==================================================================================
// Proximity scan
// ==================================================================================

#[test]
fn link_alphas_stay_in_range_across_frames() {
    let mut field = seeded_field(5, 1280.0, 720.0);

    for _ in 0..500 {
        field.advance();
        for link in links(field.particles(), 120.0) {
            assert!(link.alpha > 0.0 && link.alpha <= 1.0);
            assert!(link.a.distance(link.b) < 120.0);
        }
    }
}

#[test]
fn widening_the_threshold_never_drops_links() {
    let field = seeded_field(6, 1280.0, 720.0);
    let narrow = links(field.particles(), 80.0);
    let wide = links(field.particles(), 160.0);
    assert!(wide.len() >= narrow.len());
}
