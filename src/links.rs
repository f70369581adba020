use glam::Vec2;

use crate::particle::Particle;

/// Default maximum distance at which two particles are joined by a line.
pub const CONNECTION_DIST: f32 = 120.0;

/// A connection between two particles that drifted close enough.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Link {
    pub a: Vec2,
    pub b: Vec2,
    /// 1 at zero separation, fading to 0 at the connection distance.
    pub alpha: f32,
}

/// Scan every unordered pair and emit a link for each one closer than
/// `connection_dist`. O(n^2), bounded by the particle cap.
pub fn links(particles: &[Particle], connection_dist: f32) -> Vec<Link> {
    let mut out = Vec::new();
    for (i, a) in particles.iter().enumerate() {
        for b in &particles[i + 1..] {
            let dist = a.position.distance(b.position);
            if dist < connection_dist {
                out.push(Link {
                    a: a.position,
                    b: b.position,
                    alpha: 1.0 - dist / connection_dist,
                });
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(x: f32, y: f32) -> Particle {
        Particle {
            position: Vec2::new(x, y),
            velocity: Vec2::ZERO,
            radius: 1.0,
            _pad: 0.0,
        }
    }

    #[test]
    fn no_link_at_exact_threshold() {
        let particles = [at(0.0, 0.0), at(120.0, 0.0)];
        assert!(links(&particles, 120.0).is_empty());
    }

    #[test]
    fn link_just_inside_threshold_has_small_positive_alpha() {
        let particles = [at(0.0, 0.0), at(119.9, 0.0)];
        let out = links(&particles, 120.0);
        assert_eq!(out.len(), 1);
        assert!(out[0].alpha > 0.0 && out[0].alpha <= 1.0);
        assert!(out[0].alpha < 0.01);
    }

    #[test]
    fn alpha_fades_linearly_with_distance() {
        let out = links(&[at(0.0, 0.0), at(0.0, 60.0)], 120.0);
        assert_eq!(out.len(), 1);
        assert!((out[0].alpha - 0.5).abs() < 1e-6);
    }

    #[test]
    fn every_unordered_pair_is_considered_once() {
        let particles = [at(0.0, 0.0), at(10.0, 0.0), at(0.0, 10.0)];
        assert_eq!(links(&particles, 120.0).len(), 3);
    }

    #[test]
    fn scan_is_deterministic() {
        let particles = [at(5.0, 5.0), at(40.0, 90.0), at(200.0, 200.0)];
        assert_eq!(links(&particles, 120.0), links(&particles, 120.0));
    }
}
