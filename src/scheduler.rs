use rand::Rng;

use crate::manager::{KindConfig, KindId, StreamHost};
use crate::placement::{self, SpawnDecision};
use crate::pool::{Handle, Pool};
use crate::viewport::{Vec2, ViewWindow};

/// Counters for one spawn pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpawnStats {
    /// Candidate slots evaluated, spawned or skipped.
    pub considered: usize,
    pub spawned: usize,
}

/// Per-kind cursor that materializes entities just ahead of the viewport's
/// leading edge. The frontier only ever moves right during a tick; `seed`
/// rewinds it at (re)initialization time.
pub struct SpawnScheduler {
    frontier_x: f32,
}

impl SpawnScheduler {
    pub fn new(frontier_x: f32) -> Self {
        Self { frontier_x }
    }

    pub fn frontier_x(&self) -> f32 {
        self.frontier_x
    }

    pub fn seed(&mut self, frontier_x: f32) {
        self.frontier_x = frontier_x;
    }

    /// Fill the interval up to `window.right + ahead_margin` with entities.
    ///
    /// Spacing draws are strictly positive, so this loop runs at most
    /// `ceil((right + ahead - frontier) / min_spacing) + 1` times.
    pub fn run<H: StreamHost>(
        &mut self,
        kind: KindId,
        config: &KindConfig,
        window: ViewWindow,
        fallback_y: f32,
        pool: &mut Pool<H::Entity>,
        active: &mut Vec<Handle>,
        host: &mut H,
        rng: &mut impl Rng,
    ) -> SpawnStats {
        let mut stats = SpawnStats::default();
        let limit = window.right + config.ahead_margin;
        while self.frontier_x < limit {
            let (next_x, decision) = placement::next_slot(
                self.frontier_x,
                &config.placement,
                |x| host.ground_top(x),
                fallback_y,
                rng,
            );
            self.frontier_x = next_x;
            stats.considered += 1;

            if let SpawnDecision::SpawnAt(y) = decision {
                let handle = pool.acquire(|| host.create(kind));
                let position = Vec2::new(next_x, y);
                host.activate(kind, pool.entity_mut(handle), position);
                active.push(handle);
                stats.spawned += 1;
                log::trace!("spawned {kind:?} slot {} at {next_x:.2},{y:.2}", handle.slot());
            }
        }
        stats
    }
}
