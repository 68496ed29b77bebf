use std::f32::consts::TAU;

use glam::{Vec2, Vec3};

use crate::forest_core::archetype::{build, Species, TreeInstance, TreeMaterials};
use crate::forest_core::layer::Layer;
use crate::forest_core::random::UniformSource;
use crate::forest_core::scene::{NodeId, Scene};

pub const SCALE_MIN: f32 = 0.8;
pub const SCALE_RANGE: f32 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub scale: f32,
    pub position: Vec3,
    pub yaw: f32,
}

impl Placement {
    pub fn radius(&self) -> f32 {
        Vec2::new(self.position.x, self.position.z).length()
    }

    fn apply(&self, scene: &mut Scene, node: NodeId) {
        scene.set_scale(node, self.scale);
        scene.set_position(node, self.position);
        scene.set_yaw(node, self.yaw);
    }
}

#[derive(Debug, Clone)]
pub struct PlacedTree {
    pub instance: TreeInstance,
    pub placement: Placement,
    pub node: NodeId,
}

pub struct ForestInput<'a> {
    pub count: usize,
    pub rng: &'a mut dyn UniformSource,
    pub materials: &'a TreeMaterials,
    pub scene: &'a mut Scene,
}

/// Scatters trees over an annulus. Radius is drawn uniformly, so trees bunch up
/// towards the centre of the disc.
#[derive(Debug, Clone, Copy)]
pub struct ForestSampler {
    outer_radius: f32,
    inner_margin: f32,
}

impl ForestSampler {
    pub fn new(outer_radius: f32, inner_margin: f32) -> Self {
        assert!(
            outer_radius > 0.0,
            "outer radius must be positive, got {outer_radius}"
        );
        assert!(
            (0.0..outer_radius).contains(&inner_margin),
            "inner margin {inner_margin} must lie in [0, {outer_radius})"
        );
        Self {
            outer_radius,
            inner_margin,
        }
    }

    /// One iteration's worth of draws: species, scale, angle, radius, yaw.
    pub fn draw(&self, rng: &mut dyn UniformSource) -> (Species, Placement) {
        let index =
            ((rng.next() * Species::ALL.len() as f32) as usize).min(Species::ALL.len() - 1);
        let species = Species::ALL[index];

        let scale = (SCALE_MIN + rng.next() * SCALE_RANGE).min(SCALE_MIN + SCALE_RANGE);

        let phi = rng.next() * TAU;
        let radius = self.inner_margin + rng.next() * (self.outer_radius - self.inner_margin);
        let offset = self.clamp_to_annulus(Vec2::from_angle(phi) * radius);
        let position = Vec3::new(offset.x, 0.0, offset.y);

        let yaw = (rng.next() * TAU).rem_euclid(TAU);

        (
            species,
            Placement {
                scale,
                position,
                yaw,
            },
        )
    }

    /// cos/sin rounding can leave the length an ulp outside the annulus; step it
    /// back in one ulp at a time. Each step strictly changes a non-zero offset.
    fn clamp_to_annulus(&self, mut offset: Vec2) -> Vec2 {
        while offset.length() < self.inner_margin {
            offset *= 1.0 + f32::EPSILON;
        }
        while offset.length() > self.outer_radius {
            offset *= 1.0 - f32::EPSILON;
        }
        offset
    }

    pub fn populate(
        &self,
        count: usize,
        rng: &mut dyn UniformSource,
        materials: &TreeMaterials,
        scene: &mut Scene,
    ) -> Vec<PlacedTree> {
        let mut trees = Vec::with_capacity(count);
        for _ in 0..count {
            let (species, placement) = self.draw(rng);
            let instance = build(species, materials);
            let node = instance.attach(scene);
            placement.apply(scene, node);
            scene.add(node);
            log::debug!(
                "placed {} at ({:.2}, {:.2}) scale {:.3} yaw {:.3}",
                species.name(),
                placement.position.x,
                placement.position.z,
                placement.scale,
                placement.yaw
            );
            trees.push(PlacedTree {
                instance,
                placement,
                node,
            });
        }
        trees
    }
}

impl<'a> Layer<ForestInput<'a>, Vec<PlacedTree>> for ForestSampler {
    fn generate(&self, input: ForestInput<'a>) -> Vec<PlacedTree> {
        self.populate(input.count, input.rng, input.materials, input.scene)
    }
}

/// Free-function form of the sampler.
pub fn populate(
    count: usize,
    outer_radius: f32,
    inner_margin: f32,
    rng: &mut dyn UniformSource,
    materials: &TreeMaterials,
    scene: &mut Scene,
) -> Vec<PlacedTree> {
    ForestSampler::new(outer_radius, inner_margin).populate(count, rng, materials, scene)
}
