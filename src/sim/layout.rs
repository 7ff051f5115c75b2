//! Level layout
//!
//! The only level: ground, two walls, the pot and plant near the bottom,
//! a faucet top-left and a band of diggable soil across the full width.

use glam::Vec2;

use super::body::{BodyDesc, BodyId, BodyRole, Material, PlantState, Visual};
use super::world::PhysicsWorld;
use crate::consts::*;

/// Bodies the game needs to find again after the level is built
#[derive(Debug, Clone, PartialEq)]
pub struct LevelBodies {
    pub pot_sensor: BodyId,
    pub plant: BodyId,
    /// Row-major, top-left first
    pub dirt: Vec<BodyId>,
}

const GROUND_COLOR: &str = "#4a3520";
const WALL_COLOR: &str = "#3b2a1a";
const WATER_COLOR: &str = "#1e90ff";

/// Centre of the pot sensor
pub const POT_SENSOR_POS: Vec2 = Vec2::new(GAME_WIDTH / 2.0, GAME_HEIGHT - 50.0);

/// Ground and the two side walls
fn boundaries() -> [BodyDesc; 3] {
    let w = GAME_WIDTH;
    let h = GAME_HEIGHT;
    [
        BodyDesc::static_rect(BodyRole::Ground, Vec2::new(w / 2.0, h), w, 20.0)
            .with_visual(Visual::Fill(GROUND_COLOR)),
        BodyDesc::static_rect(BodyRole::Wall, Vec2::new(0.0, h / 2.0), 20.0, h)
            .with_visual(Visual::Fill(WALL_COLOR)),
        BodyDesc::static_rect(BodyRole::Wall, Vec2::new(w, h / 2.0), 20.0, h)
            .with_visual(Visual::Fill(WALL_COLOR)),
    ]
}

pub fn pot_sensor() -> BodyDesc {
    BodyDesc::static_rect(BodyRole::PotSensor, POT_SENSOR_POS, 100.0, 20.0).detector()
}

fn pot_visual() -> BodyDesc {
    BodyDesc::static_rect(
        BodyRole::PotVisual,
        Vec2::new(GAME_WIDTH / 2.0, GAME_HEIGHT - 30.0),
        120.0,
        60.0,
    )
    .decorative()
    .with_visual(Visual::Sprite("plant_pot.jpg"))
}

fn faucet() -> BodyDesc {
    BodyDesc::static_rect(BodyRole::Faucet, Vec2::new(100.0, 50.0), 80.0, 50.0)
        .decorative()
        .with_visual(Visual::Sprite("faucet.png"))
}

fn plant() -> BodyDesc {
    BodyDesc::static_rect(
        BodyRole::Plant,
        Vec2::new(GAME_WIDTH / 2.0, GAME_HEIGHT - 95.0),
        128.0,
        128.0,
    )
    .decorative()
    .with_visual(Visual::Plant(PlantState::Wilting))
}

/// Number of dirt columns spanning the playfield
pub fn dirt_columns() -> u32 {
    (GAME_WIDTH / DIRT_BLOCK_SIZE) as u32
}

/// Centres of every dirt cell, row-major
pub fn dirt_cells() -> impl Iterator<Item = Vec2> {
    let columns = dirt_columns();
    (DIRT_FIRST_ROW..=DIRT_LAST_ROW).flat_map(move |row| {
        (0..columns).map(move |col| {
            Vec2::new(
                col as f32 * DIRT_BLOCK_SIZE + DIRT_BLOCK_SIZE / 2.0,
                row as f32 * DIRT_BLOCK_SIZE + DIRT_BLOCK_SIZE / 2.0,
            )
        })
    })
}

pub fn dirt_block(center: Vec2) -> BodyDesc {
    BodyDesc::static_rect(BodyRole::Dirt, center, DIRT_BLOCK_SIZE, DIRT_BLOCK_SIZE)
        .with_visual(Visual::Sprite("dirt_block.png"))
}

/// One water particle leaving the faucet
pub fn water_particle() -> BodyDesc {
    let material = Material {
        restitution: WATER_RESTITUTION,
        friction: WATER_FRICTION,
        density: WATER_DENSITY,
    };
    BodyDesc::dynamic_circle(
        BodyRole::Water,
        Vec2::new(FAUCET_SPOUT.0, FAUCET_SPOUT.1),
        WATER_PARTICLE_SIZE,
        material,
    )
    .with_visual(Visual::Fill(WATER_COLOR))
}

/// Add the level to an empty world
pub fn build_level<W: PhysicsWorld + ?Sized>(world: &mut W) -> LevelBodies {
    for desc in boundaries() {
        world.add_body(desc);
    }
    let pot_sensor = world.add_body(pot_sensor());
    world.add_body(pot_visual());
    world.add_body(faucet());
    let plant = world.add_body(plant());

    let dirt: Vec<BodyId> = dirt_cells().map(|c| world.add_body(dirt_block(c))).collect();

    log::info!(
        "Level built: {} bodies, {} dirt blocks",
        world.body_count(),
        dirt.len()
    );

    LevelBodies {
        pot_sensor,
        plant,
        dirt,
    }
}
