//! Body descriptions handed to the physics world
//!
//! Every body carries a [`BodyRole`] so collision pairs can be matched on
//! role instead of string labels.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Opaque handle to a body in the physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BodyId(pub u32);

/// What a body is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyRole {
    Ground,
    Wall,
    /// Non-colliding region that detects water arriving in the pot
    PotSensor,
    PotVisual,
    Plant,
    Faucet,
    /// Destructible soil cell
    Dirt,
    /// One unit of falling water
    Water,
}

/// Static bodies never move; dynamic bodies fall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyKind {
    Static,
    Dynamic,
}

/// Collision shape, sized in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Rect { width: f32, height: f32 },
    Circle { radius: f32 },
}

impl Shape {
    /// Whether `point` lies inside this shape centred at `center` (edges inclusive)
    pub fn contains(&self, center: Vec2, point: Vec2) -> bool {
        let d = point - center;
        match *self {
            Shape::Rect { width, height } => {
                d.x.abs() <= width / 2.0 && d.y.abs() <= height / 2.0
            }
            Shape::Circle { radius } => d.length_squared() <= radius * radius,
        }
    }
}

/// Surface and mass properties
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub restitution: f32,
    pub friction: f32,
    pub density: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            restitution: 0.0,
            friction: 0.1,
            density: 0.001,
        }
    }
}

/// Plant sprite state, derived from the water percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlantState {
    #[default]
    Wilting,
    Healthy,
    Drowning,
}

impl PlantState {
    pub fn texture(&self) -> &'static str {
        match self {
            PlantState::Wilting => "plant_wilting.jpg",
            PlantState::Healthy => "plant_healthy.jpg",
            PlantState::Drowning => "plant_drowning.jpg",
        }
    }
}

/// How a body should be drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visual {
    /// Image file drawn over the body's bounds
    Sprite(&'static str),
    /// Solid CSS colour
    Fill(&'static str),
    Plant(PlantState),
}

impl Visual {
    /// Texture to draw, if the visual is image-based
    pub fn texture(&self) -> Option<&'static str> {
        match *self {
            Visual::Sprite(texture) => Some(texture),
            Visual::Plant(state) => Some(state.texture()),
            Visual::Fill(_) => None,
        }
    }
}

/// Everything the physics world needs to create a body
#[derive(Debug, Clone, PartialEq)]
pub struct BodyDesc {
    pub role: BodyRole,
    pub kind: BodyKind,
    pub shape: Shape,
    /// Centre position (pixels)
    pub position: Vec2,
    pub material: Material,
    /// Sensors report overlaps but never push anything
    pub sensor: bool,
    /// Sensors with this flag emit collision-start events
    pub events: bool,
    pub visual: Option<Visual>,
}

impl BodyDesc {
    /// Solid static rectangle
    pub fn static_rect(role: BodyRole, position: Vec2, width: f32, height: f32) -> Self {
        Self {
            role,
            kind: BodyKind::Static,
            shape: Shape::Rect { width, height },
            position,
            material: Material::default(),
            sensor: false,
            events: false,
            visual: None,
        }
    }

    /// Dynamic circle
    pub fn dynamic_circle(role: BodyRole, position: Vec2, radius: f32, material: Material) -> Self {
        Self {
            role,
            kind: BodyKind::Dynamic,
            shape: Shape::Circle { radius },
            position,
            material,
            sensor: false,
            events: false,
            visual: None,
        }
    }

    /// Turn into a sensor that reports collision starts
    pub fn detector(mut self) -> Self {
        self.sensor = true;
        self.events = true;
        self
    }

    /// Turn into a sensor that nothing collides with and that reports nothing
    pub fn decorative(mut self) -> Self {
        self.sensor = true;
        self.events = false;
        self
    }

    pub fn with_visual(mut self, visual: Visual) -> Self {
        self.visual = Some(visual);
        self
    }
}
