use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::camera::{CameraFollow, WorldBounds};
use crate::manager::{KindConfig, PlacementParams};
use crate::viewport::Vec2;
use crate::world::{DemoWorld, KindProfile, KindRole, Player};

fn default_dt() -> f32 {
    1.0 / 60.0
}

fn default_snapshot_interval_ticks() -> u64 {
    120
}

fn default_ground_y() -> f32 {
    -2.0
}

fn default_spawn_probability() -> f32 {
    1.0
}

fn default_ahead_margin() -> f32 {
    8.0
}

fn default_behind_margin() -> f32 {
    12.0
}

fn default_pool_size() -> usize {
    10
}

fn default_player_speed() -> f32 {
    6.0
}

fn default_smooth_speed() -> f32 {
    5.0
}

fn default_half_height() -> f32 {
    5.0
}

fn default_aspect() -> f32 {
    16.0 / 9.0
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub description: Option<String>,
    pub seed: u64,
    #[serde(default = "default_dt")]
    pub dt: f32,
    #[serde(default)]
    pub ticks: Option<u64>,
    #[serde(default = "default_snapshot_interval_ticks")]
    pub snapshot_interval_ticks: u64,
    #[serde(default = "default_ground_y")]
    pub ground_y: f32,
    #[serde(default)]
    pub player: PlayerSpec,
    #[serde(default)]
    pub camera: CameraSpec,
    pub kinds: Vec<KindSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayerSpec {
    #[serde(default)]
    pub start_x: f32,
    #[serde(default)]
    pub start_y: Option<f32>,
    #[serde(default = "default_player_speed")]
    pub speed: f32,
}

impl Default for PlayerSpec {
    fn default() -> Self {
        Self {
            start_x: 0.0,
            start_y: None,
            speed: default_player_speed(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CameraSpec {
    #[serde(default = "default_smooth_speed")]
    pub smooth_speed: f32,
    #[serde(default = "default_half_height")]
    pub half_height: f32,
    #[serde(default = "default_aspect")]
    pub aspect: f32,
    #[serde(default)]
    pub offset_x: f32,
    #[serde(default)]
    pub offset_y: f32,
    #[serde(default)]
    pub bounds: Option<WorldBounds>,
}

impl Default for CameraSpec {
    fn default() -> Self {
        Self {
            smooth_speed: default_smooth_speed(),
            half_height: default_half_height(),
            aspect: default_aspect(),
            offset_x: 0.0,
            offset_y: 0.0,
            bounds: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct KindSpec {
    pub name: String,
    pub role: KindRole,
    pub min_spacing: f32,
    pub max_spacing: f32,
    #[serde(default = "default_spawn_probability")]
    pub spawn_probability: f32,
    #[serde(default = "default_ahead_margin")]
    pub ahead_margin: f32,
    #[serde(default = "default_behind_margin")]
    pub behind_margin: f32,
    #[serde(default)]
    pub vertical_offset: f32,
    #[serde(default = "default_pool_size")]
    pub initial_pool_size: usize,
    #[serde(default)]
    pub backfill: bool,
    #[serde(default)]
    pub half_width: Option<f32>,
    #[serde(default)]
    pub half_height: Option<f32>,
}

pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Scenario> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        let scenario: Scenario = serde_yaml::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        if let Some(bounds) = &scenario.camera.bounds {
            bounds
                .validate()
                .with_context(|| format!("Invalid camera bounds in {}", path.display()))?;
        }
        Ok(scenario)
    }
}

impl Scenario {
    pub fn kind_configs(&self) -> Vec<KindConfig> {
        self.kinds
            .iter()
            .map(|spec| KindConfig {
                name: spec.name.clone(),
                placement: PlacementParams {
                    min_spacing: spec.min_spacing,
                    max_spacing: spec.max_spacing,
                    spawn_probability: spec.spawn_probability,
                    vertical_offset: spec.vertical_offset,
                },
                ahead_margin: spec.ahead_margin,
                behind_margin: spec.behind_margin,
                initial_pool_size: spec.initial_pool_size,
                backfill: spec.backfill,
            })
            .collect()
    }

    pub fn build_world(&self) -> DemoWorld {
        let profiles = self
            .kinds
            .iter()
            .map(|spec| {
                let half_extents = match (spec.half_width, spec.half_height) {
                    (None, None) => None,
                    (x, y) => {
                        let defaults = KindProfile::new(spec.role, None).half_extents;
                        Some(Vec2::new(
                            x.unwrap_or(defaults.x),
                            y.unwrap_or(defaults.y),
                        ))
                    }
                };
                KindProfile::new(spec.role, half_extents)
            })
            .collect();
        let player = Player {
            position: Vec2::new(
                self.player.start_x,
                self.player.start_y.unwrap_or(self.ground_y + 1.0),
            ),
            speed: self.player.speed,
        };
        DemoWorld::new(profiles, player, self.ground_y)
    }

    pub fn build_camera(&self) -> CameraFollow {
        let start = Vec2::new(
            self.player.start_x + self.camera.offset_x,
            self.player.start_y.unwrap_or(self.ground_y + 1.0) + self.camera.offset_y,
        );
        let mut camera = CameraFollow::new(
            start,
            Vec2::new(self.camera.offset_x, self.camera.offset_y),
            self.camera.smooth_speed,
            self.camera.half_height,
            self.camera.aspect,
        );
        if let Some(bounds) = self.camera.bounds {
            camera = camera.with_bounds(bounds);
        }
        camera
    }

    pub fn ticks(&self, override_ticks: Option<u64>) -> u64 {
        override_ticks.or(self.ticks).unwrap_or(600)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
name: strip
seed: 11
kinds:
  - name: terrain
    role: terrain
    min_spacing: 10.0
    max_spacing: 10.0
    backfill: true
"#;

    #[test]
    fn minimal_scenario_fills_in_defaults() {
        let scenario: Scenario = serde_yaml::from_str(MINIMAL).unwrap();
        assert_eq!(scenario.name, "strip");
        assert_eq!(scenario.snapshot_interval_ticks, 120);
        assert_eq!(scenario.player.speed, 6.0);
        assert_eq!(scenario.kinds.len(), 1);
        let kind = &scenario.kinds[0];
        assert_eq!(kind.spawn_probability, 1.0);
        assert_eq!(kind.initial_pool_size, 10);
        assert!(kind.backfill);
    }

    #[test]
    fn kind_configs_carry_the_placement_knobs() {
        let scenario: Scenario = serde_yaml::from_str(MINIMAL).unwrap();
        let configs = scenario.kind_configs();
        assert_eq!(configs.len(), 1);
        assert_eq!(configs[0].placement.min_spacing, 10.0);
        assert_eq!(configs[0].ahead_margin, 8.0);
        assert_eq!(configs[0].behind_margin, 12.0);
    }
}
