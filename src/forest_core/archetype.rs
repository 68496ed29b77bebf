use glam::Vec3;

use crate::forest_core::scene::{MaterialId, NodeId, Primitive, Scene};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Species {
    Pine,
    Oak,
    Bushy,
}

impl Species {
    pub const ALL: [Species; 3] = [Species::Pine, Species::Oak, Species::Bushy];

    pub fn name(self) -> &'static str {
        match self {
            Species::Pine => "pine",
            Species::Oak => "oak",
            Species::Bushy => "bushy",
        }
    }
}

/// The two surfaces every tree shares. Registered once per scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeMaterials {
    pub foliage: MaterialId,
    pub bark: MaterialId,
}

impl TreeMaterials {
    pub fn register(scene: &mut Scene, foliage_hex: u32, bark_hex: u32) -> Self {
        Self {
            foliage: scene.add_material("foliage", foliage_hex),
            bark: scene.add_material("bark", bark_hex),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreePart {
    pub shape: Primitive,
    pub material: MaterialId,
    pub offset: Vec3,
    pub scale: f32,
    pub cast_shadow: bool,
}

impl TreePart {
    fn new(shape: Primitive, material: MaterialId, offset_y: f32) -> Self {
        Self {
            shape,
            material,
            offset: Vec3::new(0.0, offset_y, 0.0),
            scale: 1.0,
            cast_shadow: true,
        }
    }

    /// The primitive as it appears once the part's local scale is applied.
    pub fn scaled_shape(&self) -> Primitive {
        self.shape.scaled(self.scale)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TreeInstance {
    pub species: Species,
    pub trunk: TreePart,
    pub foliage: Vec<TreePart>,
}

impl TreeInstance {
    pub fn parts(&self) -> impl Iterator<Item = &TreePart> {
        std::iter::once(&self.trunk).chain(self.foliage.iter())
    }

    /// Materialise the instance as a group of mesh nodes. The group is returned
    /// detached and untransformed.
    pub fn attach(&self, scene: &mut Scene) -> NodeId {
        let group = scene.create_group();
        for part in self.parts() {
            let mesh = scene.create_mesh(part.shape, part.material);
            scene.set_position(mesh, part.offset);
            scene.set_scale(mesh, part.scale);
            scene.set_cast_shadow(mesh, part.cast_shadow);
            scene.add_child(group, mesh);
        }
        group
    }
}

fn trunk(top_radius: f32, bottom_radius: f32, height: f32, bark: MaterialId) -> TreePart {
    TreePart::new(
        Primitive::Cylinder {
            top_radius,
            bottom_radius,
            height,
            radial_segments: 6,
        },
        bark,
        height * 0.5,
    )
}

pub fn build(species: Species, materials: &TreeMaterials) -> TreeInstance {
    match species {
        Species::Pine => TreeInstance {
            species,
            trunk: trunk(1.5, 2.0, 15.0, materials.bark),
            foliage: vec![TreePart::new(
                Primitive::Cone {
                    radius: 6.0,
                    height: 20.0,
                    radial_segments: 6,
                },
                materials.foliage,
                25.0,
            )],
        },
        Species::Oak => TreeInstance {
            species,
            trunk: trunk(2.0, 3.0, 20.0, materials.bark),
            foliage: vec![TreePart::new(
                Primitive::Sphere {
                    radius: 10.0,
                    width_segments: 8,
                    height_segments: 8,
                },
                materials.foliage,
                25.0,
            )],
        },
        Species::Bushy => {
            let lower = TreePart::new(
                Primitive::Sphere {
                    radius: 8.0,
                    width_segments: 6,
                    height_segments: 6,
                },
                materials.foliage,
                12.0,
            );
            let upper = TreePart {
                offset: Vec3::new(0.0, 18.0, 0.0),
                scale: 0.8,
                ..lower
            };
            TreeInstance {
                species,
                trunk: trunk(1.5, 1.5, 10.0, materials.bark),
                foliage: vec![lower, upper],
            }
        }
    }
}
