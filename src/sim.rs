use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;

use crate::camera::CameraFollow;
use crate::manager::{StreamManager, TickReport};
use crate::scenario::Scenario;
use crate::snapshot::{SnapshotWriter, StreamSnapshot};
use crate::world::DemoWorld;

pub struct SimSettings {
    pub scenario_name: String,
    pub seed: u64,
    pub snapshot_interval_ticks: u64,
    pub snapshot_dir: PathBuf,
}

/// Frame driver for the demo: advances the world and the follow camera, then
/// hands the fresh viewpoint to the streaming manager, once per tick.
pub struct Simulation {
    world: DemoWorld,
    camera: CameraFollow,
    manager: StreamManager<DemoWorld>,
    snapshot_writer: SnapshotWriter,
    scenario_name: String,
    dt: f32,
}

impl Simulation {
    pub fn from_scenario(scenario: &Scenario, settings: SimSettings) -> Result<Self> {
        let mut world = scenario.build_world();
        let camera = scenario.build_camera();
        let manager = StreamManager::new(
            scenario.kind_configs(),
            settings.seed,
            &camera.viewpoint(),
            &mut world,
        )
        .with_context(|| format!("Invalid kind configuration in '{}'", settings.scenario_name))?;
        Ok(Self {
            world,
            camera,
            manager,
            snapshot_writer: SnapshotWriter::new(
                &settings.snapshot_dir,
                settings.snapshot_interval_ticks,
            ),
            scenario_name: settings.scenario_name,
            dt: scenario.dt,
        })
    }

    /// One frame: world movement, camera follow, then recycle-and-spawn.
    pub fn step(&mut self) -> TickReport {
        self.world.step(self.dt);
        self.camera.follow(self.world.player.position, self.dt);
        let viewpoint = self.camera.viewpoint();
        self.manager.tick(&viewpoint, &mut self.world)
    }

    pub fn run(&mut self, ticks: u64) -> Result<()> {
        self.run_with_hook(ticks, |_| {})
    }

    pub fn run_with_hook(
        &mut self,
        ticks: u64,
        mut hook: impl FnMut(&TickReport),
    ) -> Result<()> {
        for _ in 0..ticks {
            let report = self.step();
            hook(&report);
            let snapshot = self.snapshot(&report);
            self.snapshot_writer.maybe_write(&snapshot)?;
        }
        Ok(())
    }

    /// Reload the level: clear streamed content and rewind cursors. The next
    /// tick repopulates the window.
    pub fn reset(&mut self) {
        let viewpoint = self.camera.viewpoint();
        self.manager.reset(&viewpoint, &mut self.world);
    }

    fn snapshot(&self, report: &TickReport) -> StreamSnapshot {
        StreamSnapshot {
            scenario: self.scenario_name.clone(),
            tick: report.tick,
            captured_at: Utc::now(),
            window: report.window,
            player_x: self.world.player.position.x,
            coins_collected: self.world.coins_collected(),
            kinds: self.manager.stats(),
        }
    }

    pub fn world(&self) -> &DemoWorld {
        &self.world
    }

    pub fn manager(&self) -> &StreamManager<DemoWorld> {
        &self.manager
    }

    pub fn scenario_name(&self) -> &str {
        &self.scenario_name
    }
}
