use tracing::info;

/// Parameters of a one-shot celebratory particle burst.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleBurst {
    pub particle_count: u32,
    /// Spread angle in degrees.
    pub spread: u32,
    /// Vertical origin as a fraction of the viewport height, 0.0 at the top.
    pub origin_y: f32,
}

impl Default for ParticleBurst {
    fn default() -> Self {
        Self {
            particle_count: 150,
            spread: 70,
            origin_y: 0.6,
        }
    }
}

/// Optional visual-effects capability injected into pages.
///
/// Calls are fire-and-forget. A page that was built without one simply skips
/// the effect.
pub trait VisualEffects: Send + Sync {
    fn particle_burst(&self, burst: ParticleBurst);
}

/// Effects backend for headless runs: records the burst in the log.
#[derive(Debug, Default)]
pub struct LogEffects;

impl VisualEffects for LogEffects {
    fn particle_burst(&self, burst: ParticleBurst) {
        info!(
            particles = burst.particle_count,
            spread = burst.spread,
            origin_y = burst.origin_y,
            "Particle burst"
        );
    }
}
