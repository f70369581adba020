use std::path::PathBuf;

use clap::Parser;

use crate::theme::Theme;

/// An ambient connected-particle background in a native window
#[derive(Parser)]
#[command()]
pub struct Args {
    /// Upper bound on the particle count
    #[arg(long)]
    pub max_particles: Option<u32>,

    /// Pixels of viewport area per particle
    #[arg(long)]
    pub density_divisor: Option<f32>,

    /// Maximum distance at which two particles are joined by a line
    #[arg(long)]
    pub connection_dist: Option<f32>,

    /// The framerate the effect will run at
    ///
    /// if unset the effect runs as fast as the display presents frames
    #[arg(short, long)]
    pub framerate: Option<u32>,

    /// Palette override; otherwise the persisted preference is used
    #[arg(short, long, value_enum)]
    pub theme: Option<Theme>,

    /// Seed for reproducible particle placement
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Preference file, written back when the theme is toggled
    #[arg(long, default_value = "plexus.toml")]
    pub config: PathBuf,
}
