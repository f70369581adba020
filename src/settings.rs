use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{cli::Args, links, particle, particle::SpawnParams, theme::Theme};

/// On-disk preferences. The theme flag is the one value the effect persists;
/// the tunables ride along in the same file so hand edits stick.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub theme: Theme,
    pub density_divisor: f32,
    pub max_particles: u32,
    pub connection_dist: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            density_divisor: particle::DENSITY_DIVISOR,
            max_particles: particle::MAX_PARTICLES,
            connection_dist: links::CONNECTION_DIST,
        }
    }
}

impl Settings {
    /// A missing file is not an error, it just means defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Command-line flags win over the preference file.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(theme) = args.theme {
            self.theme = theme;
        }
        if let Some(density_divisor) = args.density_divisor {
            self.density_divisor = density_divisor;
        }
        if let Some(max_particles) = args.max_particles {
            self.max_particles = max_particles;
        }
        if let Some(connection_dist) = args.connection_dist {
            self.connection_dist = connection_dist;
        }
    }

    pub fn spawn_params(&self) -> SpawnParams {
        SpawnParams {
            density_divisor: self.density_divisor,
            max_particles: self.max_particles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_effect_constants() {
        let settings = Settings::default();
        assert_eq!(settings.theme, Theme::Dark);
        assert_eq!(settings.density_divisor, 30_000.0);
        assert_eq!(settings.max_particles, 90);
        assert_eq!(settings.connection_dist, 120.0);
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let settings: Settings = toml::from_str("theme = \"light\"").unwrap();
        assert_eq!(settings.theme, Theme::Light);
        assert_eq!(settings.max_particles, 90);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let loaded = Settings::load(Path::new("does/not/exist.toml")).unwrap();
        assert_eq!(loaded, Settings::default());
    }
}
