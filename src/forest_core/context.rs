use crate::forest_core::archetype::{Species, TreeMaterials};
use crate::forest_core::config::ForestConfig;
use crate::forest_core::layer::Layer;
use crate::forest_core::placement::{ForestInput, ForestSampler, PlacedTree};
use crate::forest_core::random::{SeededSource, UniformSource};
use crate::forest_core::scene::{rgb_hex, Scene};
use crate::forest_core::stage::Stage;

/// Everything the forest needs at startup, built once and passed by reference.
pub struct SceneContext {
    pub scene: Scene,
    pub stage: Stage,
    pub materials: TreeMaterials,
    sampler: ForestSampler,
    tree_count: usize,
    seed: u64,
    rng: Box<dyn UniformSource>,
}

impl SceneContext {
    pub fn new(config: &ForestConfig) -> Self {
        let source = match config.forest.seed {
            Some(seed) => SeededSource::new(seed),
            None => SeededSource::from_entropy(),
        };
        let seed = source.seed();
        Self::with_source(config, seed, Box::new(source))
    }

    /// Build with a caller-supplied random source. `seed` is informational only.
    pub fn with_source(config: &ForestConfig, seed: u64, rng: Box<dyn UniformSource>) -> Self {
        let mut scene = Scene::new(rgb_hex(config.stage.background));
        let stage = Stage::build(&mut scene, config);
        let materials = TreeMaterials::register(
            &mut scene,
            config.stage.foliage_color,
            config.stage.bark_color,
        );
        Self {
            scene,
            stage,
            materials,
            sampler: ForestSampler::new(config.forest.floor_radius, config.forest.inner_margin),
            tree_count: config.forest.tree_count,
            seed,
            rng,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn plant_forest(&mut self) -> Vec<PlacedTree> {
        let trees = self.sampler.generate(ForestInput {
            count: self.tree_count,
            rng: self.rng.as_mut(),
            materials: &self.materials,
            scene: &mut self.scene,
        });

        let tally = species_tally(&trees);
        log::info!(
            "planted {} trees (seed {}): {} pine, {} oak, {} bushy",
            trees.len(),
            self.seed,
            tally[0],
            tally[1],
            tally[2]
        );
        trees
    }
}

/// Counts per species, in `Species::ALL` order.
pub fn species_tally(trees: &[PlacedTree]) -> [usize; 3] {
    let mut tally = [0; 3];
    for tree in trees {
        let index = match tree.instance.species {
            Species::Pine => 0,
            Species::Oak => 1,
            Species::Bushy => 2,
        };
        tally[index] += 1;
    }
    tally
}
