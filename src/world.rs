use serde::Deserialize;

use crate::manager::{KindId, StreamHost};
use crate::viewport::Vec2;

/// What a streamed kind represents inside the demo world. Determines entity
/// sizing and per-kind activation behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KindRole {
    Terrain,
    Enemy,
    Object,
}

impl KindRole {
    fn default_half_extents(self) -> Vec2 {
        match self {
            KindRole::Terrain => Vec2::new(5.0, 0.5),
            KindRole::Enemy => Vec2::new(0.4, 0.9),
            KindRole::Object => Vec2::new(0.3, 0.3),
        }
    }
}

/// World-side description of one registered kind, in registration order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KindProfile {
    pub role: KindRole,
    pub half_extents: Vec2,
}

impl KindProfile {
    pub fn new(role: KindRole, half_extents: Option<Vec2>) -> Self {
        Self {
            role,
            half_extents: half_extents.unwrap_or_else(|| role.default_half_extents()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorldEntity {
    pub role: KindRole,
    pub position: Vec2,
    pub half_extents: Vec2,
    pub velocity_x: f32,
    pub active: bool,
    pub alive: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Player {
    pub position: Vec2,
    pub speed: f32,
}

const ENEMY_WALK_SPEED: f32 = 1.5;
const COLLECT_RADIUS: f32 = 0.8;

/// Minimal side-scroller world: a player running right, terrain strips that
/// answer the ground query, enemies that walk toward the player, and
/// collectable objects the player picks up. Entity instances live in an arena
/// that only grows; the streaming manager references them by index.
pub struct DemoWorld {
    kinds: Vec<KindProfile>,
    entities: Vec<WorldEntity>,
    pub player: Player,
    ground_y: f32,
    coins_collected: u64,
}

impl DemoWorld {
    pub fn new(kinds: Vec<KindProfile>, player: Player, ground_y: f32) -> Self {
        Self {
            kinds,
            entities: Vec::new(),
            player,
            ground_y,
            coins_collected: 0,
        }
    }

    /// Advance the world one frame: the player runs, active enemies walk, and
    /// objects the player touches are collected, which destroys them
    /// out-of-band from the streaming manager's point of view.
    pub fn step(&mut self, dt: f32) {
        self.player.position.x += self.player.speed * dt;
        let player = self.player.position;

        for entity in &mut self.entities {
            if !entity.active || !entity.alive {
                continue;
            }
            match entity.role {
                KindRole::Enemy => {
                    entity.position.x += entity.velocity_x * dt;
                }
                KindRole::Object => {
                    let dx = entity.position.x - player.x;
                    let dy = entity.position.y - player.y;
                    if dx * dx + dy * dy <= COLLECT_RADIUS * COLLECT_RADIUS {
                        entity.alive = false;
                        self.coins_collected += 1;
                    }
                }
                KindRole::Terrain => {}
            }
        }
    }

    pub fn coins_collected(&self) -> u64 {
        self.coins_collected
    }

    pub fn ground_y(&self) -> f32 {
        self.ground_y
    }

    pub fn entity(&self, id: usize) -> &WorldEntity {
        &self.entities[id]
    }

    pub fn active_entities(&self) -> impl Iterator<Item = &WorldEntity> {
        self.entities.iter().filter(|e| e.active && e.alive)
    }

    fn profile(&self, kind: KindId) -> KindProfile {
        self.kinds[kind.index()]
    }
}

impl StreamHost for DemoWorld {
    type Entity = usize;

    fn create(&mut self, kind: KindId) -> usize {
        let profile = self.profile(kind);
        let id = self.entities.len();
        self.entities.push(WorldEntity {
            role: profile.role,
            position: Vec2::default(),
            half_extents: profile.half_extents,
            velocity_x: 0.0,
            active: false,
            alive: true,
        });
        id
    }

    fn activate(&mut self, kind: KindId, entity: &mut usize, position: Vec2) {
        let profile = self.profile(kind);
        let player_x = self.player.position.x;
        let ground_y = self.ground_y;
        let slot = &mut self.entities[*entity];
        slot.position = match profile.role {
            // Terrain keeps its fixed surface height; only X comes from the
            // placement policy.
            KindRole::Terrain => Vec2::new(position.x, ground_y),
            _ => position,
        };
        if profile.role == KindRole::Enemy {
            // Freshly activated enemies walk toward the player.
            let direction = if player_x < slot.position.x { -1.0 } else { 1.0 };
            slot.velocity_x = direction * ENEMY_WALK_SPEED;
        } else {
            slot.velocity_x = 0.0;
        }
        slot.active = true;
        slot.alive = true;
    }

    fn deactivate(&mut self, _kind: KindId, entity: &mut usize) {
        let slot = &mut self.entities[*entity];
        slot.active = false;
    }

    fn position_x(&self, _kind: KindId, entity: &usize) -> f32 {
        self.entities[*entity].position.x
    }

    fn half_width(&self, _kind: KindId, entity: &usize) -> f32 {
        self.entities[*entity].half_extents.x
    }

    fn is_alive(&self, _kind: KindId, entity: &usize) -> bool {
        self.entities[*entity].alive
    }

    fn ground_top(&self, world_x: f32) -> Option<f32> {
        self.entities
            .iter()
            .find(|e| {
                e.role == KindRole::Terrain
                    && e.active
                    && (e.position.x - world_x).abs() <= e.half_extents.x
            })
            .map(|e| e.position.y + e.half_extents.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world_with(kinds: Vec<KindProfile>) -> DemoWorld {
        DemoWorld::new(
            kinds,
            Player {
                position: Vec2::new(0.0, -1.0),
                speed: 6.0,
            },
            -2.0,
        )
    }

    #[test]
    fn terrain_answers_the_ground_query_only_while_active() {
        let mut world = world_with(vec![KindProfile::new(KindRole::Terrain, None)]);
        let kind = KindId::from_index(0);
        let mut id = world.create(kind);
        assert_eq!(world.ground_top(3.0), None);

        world.activate(kind, &mut id, Vec2::new(3.0, 99.0));
        // Terrain snaps to the world's ground height, not the requested Y.
        assert_eq!(world.ground_top(3.0), Some(-1.5));
        assert_eq!(world.ground_top(8.1), None);

        world.deactivate(kind, &mut id);
        assert_eq!(world.ground_top(3.0), None);
    }

    #[test]
    fn touching_an_object_collects_it_out_of_band() {
        let mut world = world_with(vec![KindProfile::new(KindRole::Object, None)]);
        let kind = KindId::from_index(0);
        let mut id = world.create(kind);
        world.activate(kind, &mut id, Vec2::new(0.3, -1.0));

        world.step(0.016);
        assert_eq!(world.coins_collected(), 1);
        assert!(!world.is_alive(kind, &id));
    }

    #[test]
    fn enemies_walk_toward_the_player() {
        let mut world = world_with(vec![KindProfile::new(KindRole::Enemy, None)]);
        let kind = KindId::from_index(0);
        let mut id = world.create(kind);
        world.activate(kind, &mut id, Vec2::new(20.0, -1.1));

        let before = world.position_x(kind, &id);
        world.step(0.5);
        assert!(world.position_x(kind, &id) < before);
    }
}
