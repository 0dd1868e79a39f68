use serde::Serialize;
use thiserror::Error;

use crate::pool::{Handle, Pool};
use crate::recycler;
use crate::rng::RngManager;
use crate::scheduler::SpawnScheduler;
use crate::viewport::{Vec2, ViewWindow, ViewpointState};

pub use crate::placement::PlacementParams;

/// Index of a registered content kind, in registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KindId(usize);

impl KindId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

/// Capabilities the surrounding world provides to the streaming core. The
/// manager owns pooling, placement and recycling; everything that touches an
/// actual entity instance goes through these hooks, synchronously.
pub trait StreamHost {
    type Entity;

    /// Produce a fresh pool member. Called during pre-warm and when an empty
    /// pool must grow.
    fn create(&mut self, kind: KindId) -> Self::Entity;

    /// Position and enable an entity taken from the pool. Any per-kind
    /// initialization (wiring a chase target, choosing a variant) happens
    /// here; reused instances must be fully re-initialized.
    fn activate(&mut self, kind: KindId, entity: &mut Self::Entity, position: Vec2);

    /// Disable an entity on its way back to the pool.
    fn deactivate(&mut self, kind: KindId, entity: &mut Self::Entity);

    /// Current world X of an active entity. Entities may move after spawn.
    fn position_x(&self, kind: KindId, entity: &Self::Entity) -> f32;

    /// Horizontal half-extent used for precise recycling.
    fn half_width(&self, _kind: KindId, _entity: &Self::Entity) -> f32 {
        0.0
    }

    /// Whether the instance still exists. The world may destroy entities
    /// out-of-band (a collected pickup, a defeated enemy); the recycler then
    /// reclaims the handle without a deactivation callback.
    fn is_alive(&self, _kind: KindId, _entity: &Self::Entity) -> bool {
        true
    }

    /// Top surface Y of ground at a world X, if any ground exists there.
    fn ground_top(&self, world_x: f32) -> Option<f32>;
}

/// Full configuration for one streamed content kind.
#[derive(Debug, Clone, PartialEq)]
pub struct KindConfig {
    pub name: String,
    pub placement: PlacementParams,
    /// Spawn lookahead past the right viewport edge.
    pub ahead_margin: f32,
    /// Recycle hysteresis past the left viewport edge.
    pub behind_margin: f32,
    pub initial_pool_size: usize,
    /// Fill the whole window at initialization so there is no visible gap on
    /// the first frame. Terrain wants this; sparse kinds usually do not.
    pub backfill: bool,
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("no content kinds configured")]
    NoKinds,
    #[error("duplicate kind name `{name}`")]
    DuplicateKind { name: String },
    #[error("kind `{name}`: spacing must be positive, got {value}")]
    NonPositiveSpacing { name: String, value: f32 },
    #[error("kind `{name}`: min_spacing {min} exceeds max_spacing {max}")]
    SpacingOrder { name: String, min: f32, max: f32 },
}

impl KindConfig {
    /// Reject broken invariants, clamp tolerant knobs.
    fn validated(mut self) -> Result<Self, ConfigError> {
        if !(self.placement.min_spacing > 0.0) {
            return Err(ConfigError::NonPositiveSpacing {
                name: self.name,
                value: self.placement.min_spacing,
            });
        }
        if self.placement.min_spacing > self.placement.max_spacing {
            return Err(ConfigError::SpacingOrder {
                name: self.name,
                min: self.placement.min_spacing,
                max: self.placement.max_spacing,
            });
        }
        self.placement.spawn_probability = self.placement.spawn_probability.clamp(0.0, 1.0);
        self.ahead_margin = self.ahead_margin.max(0.0);
        self.behind_margin = self.behind_margin.max(0.0);
        Ok(self)
    }
}

struct KindRuntime<E> {
    config: KindConfig,
    pool: Pool<E>,
    scheduler: SpawnScheduler,
    active: Vec<Handle>,
}

/// Per-tick counters for one kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KindReport {
    pub kind: KindId,
    pub considered: usize,
    pub spawned: usize,
    pub recycled: usize,
    pub reclaimed: usize,
    pub frontier_x: f32,
}

/// What one call to [`StreamManager::tick`] did.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    pub window: ViewWindow,
    pub kinds: Vec<KindReport>,
}

impl TickReport {
    pub fn spawned(&self) -> usize {
        self.kinds.iter().map(|k| k.spawned).sum()
    }

    pub fn recycled(&self) -> usize {
        self.kinds.iter().map(|k| k.recycled).sum()
    }
}

/// Point-in-time view of one kind's pool and cursor, for snapshots and tests.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KindStats {
    pub name: String,
    pub frontier_x: f32,
    pub active: usize,
    pub idle: usize,
    pub created: usize,
}

/// The streaming pool manager: one (pool, scheduler, recycler, config)
/// runtime per content kind, driven once per frame in registration order.
/// Single-threaded and synchronous; nothing here suspends or blocks.
pub struct StreamManager<H: StreamHost> {
    kinds: Vec<KindRuntime<H::Entity>>,
    rng: RngManager,
    tick: u64,
}

impl<H: StreamHost> StreamManager<H> {
    /// Validate configuration, pre-warm every pool through the host factory,
    /// seed the frontiers against the initial viewpoint, and run the spawn
    /// loop once for backfill kinds so their window starts populated.
    pub fn new(
        configs: Vec<KindConfig>,
        seed: u64,
        viewpoint: &ViewpointState,
        host: &mut H,
    ) -> Result<Self, ConfigError> {
        if configs.is_empty() {
            return Err(ConfigError::NoKinds);
        }
        let window = ViewWindow::of(viewpoint);
        let mut rng = RngManager::new(seed);
        let mut kinds: Vec<KindRuntime<H::Entity>> = Vec::with_capacity(configs.len());

        for config in configs {
            let config = config.validated()?;
            if kinds.iter().any(|k| k.config.name == config.name) {
                return Err(ConfigError::DuplicateKind { name: config.name });
            }
            let kind = KindId(kinds.len());
            let mut pool = Pool::new(kind);
            pool.prewarm(config.initial_pool_size, || host.create(kind));
            let scheduler = SpawnScheduler::new(seed_frontier(&config, window, viewpoint));
            kinds.push(KindRuntime {
                config,
                pool,
                scheduler,
                active: Vec::new(),
            });
        }

        for (index, runtime) in kinds.iter_mut().enumerate() {
            if !runtime.config.backfill {
                continue;
            }
            let mut stream = rng.stream(&runtime.config.name);
            runtime.scheduler.run(
                KindId(index),
                &runtime.config,
                window,
                viewpoint.position.y,
                &mut runtime.pool,
                &mut runtime.active,
                host,
                &mut stream,
            );
        }

        Ok(Self {
            kinds,
            rng,
            tick: 0,
        })
    }

    /// One frame: for every kind in registration order, recycle what fell
    /// behind the trailing edge, then spawn up to the leading edge. Per-entity
    /// anomalies are isolated and logged; this never fails mid-stream.
    pub fn tick(&mut self, viewpoint: &ViewpointState, host: &mut H) -> TickReport {
        let window = ViewWindow::of(viewpoint);
        self.tick += 1;
        let mut reports = Vec::with_capacity(self.kinds.len());

        for (index, runtime) in self.kinds.iter_mut().enumerate() {
            let kind = KindId(index);
            let sweep = recycler::sweep(
                kind,
                &runtime.config,
                window,
                &mut runtime.pool,
                &mut runtime.active,
                host,
            );
            let mut stream = self.rng.stream(&runtime.config.name);
            let spawn = runtime.scheduler.run(
                kind,
                &runtime.config,
                window,
                viewpoint.position.y,
                &mut runtime.pool,
                &mut runtime.active,
                host,
                &mut stream,
            );
            reports.push(KindReport {
                kind,
                considered: spawn.considered,
                spawned: spawn.spawned,
                recycled: sweep.recycled,
                reclaimed: sweep.reclaimed,
                frontier_x: runtime.scheduler.frontier_x(),
            });
        }

        TickReport {
            tick: self.tick,
            window,
            kinds: reports,
        }
    }

    /// Level reload: release every active handle back to its pool, rewind the
    /// RNG streams and reseed every frontier. Call between ticks only. The
    /// next tick's spawn loop repopulates the window in a single pass.
    pub fn reset(&mut self, viewpoint: &ViewpointState, host: &mut H) {
        let window = ViewWindow::of(viewpoint);
        for (index, runtime) in self.kinds.iter_mut().enumerate() {
            let kind = KindId(index);
            for handle in runtime.active.drain(..) {
                // Entities destroyed out-of-band get no second teardown,
                // matching the recycler's sweep.
                if host.is_alive(kind, runtime.pool.entity(handle)) {
                    host.deactivate(kind, runtime.pool.entity_mut(handle));
                }
                if let Err(err) = runtime.pool.release(handle) {
                    log::warn!("reset release of {kind:?} failed: {err}");
                }
            }
            runtime
                .scheduler
                .seed(seed_frontier(&runtime.config, window, viewpoint));
        }
        self.rng.reset();
        self.tick = 0;
    }

    pub fn kind_id(&self, name: &str) -> Option<KindId> {
        self.kinds
            .iter()
            .position(|k| k.config.name == name)
            .map(KindId)
    }

    pub fn kind_name(&self, kind: KindId) -> &str {
        &self.kinds[kind.0].config.name
    }

    pub fn frontier_x(&self, kind: KindId) -> f32 {
        self.kinds[kind.0].scheduler.frontier_x()
    }

    pub fn active_count(&self, kind: KindId) -> usize {
        self.kinds[kind.0].active.len()
    }

    /// Handles currently materialized for a kind, in no particular order.
    pub fn active_handles(&self, kind: KindId) -> &[Handle] {
        &self.kinds[kind.0].active
    }

    pub fn entity(&self, handle: Handle) -> &H::Entity {
        self.kinds[handle.kind().index()].pool.entity(handle)
    }

    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    pub fn stats(&self) -> Vec<KindStats> {
        self.kinds
            .iter()
            .map(|k| KindStats {
                name: k.config.name.clone(),
                frontier_x: k.scheduler.frontier_x(),
                active: k.active.len(),
                idle: k.pool.idle(),
                created: k.pool.created(),
            })
            .collect()
    }
}

/// Backfill kinds start one spacing behind the left edge so the first spawn
/// lands on it; everything else starts at the viewpoint X, matching the
/// behavior the spawners had before unification.
fn seed_frontier(config: &KindConfig, window: ViewWindow, viewpoint: &ViewpointState) -> f32 {
    if config.backfill {
        window.left - config.placement.min_spacing
    } else {
        viewpoint.position.x
    }
}
