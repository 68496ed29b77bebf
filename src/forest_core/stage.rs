use glam::{Mat4, Vec3};

use crate::forest_core::config::{ForestConfig, StageConfig};
use crate::forest_core::scene::{NodeId, Primitive, Scene};

pub const FLOOR_SEGMENTS: u32 = 64;

pub struct CameraRig {
    pub position: Vec3,
    pub target: Vec3,
    pub fov_y_radians: f32,
    pub near: f32,
    pub far: f32,
    aspect: f32,
}

impl CameraRig {
    pub fn new(width: u32, height: u32) -> Self {
        let mut rig = Self {
            position: Vec3::new(0.0, 60.0, 120.0),
            target: Vec3::ZERO,
            fov_y_radians: 60.0f32.to_radians(),
            near: 1.0,
            far: 1000.0,
            aspect: 1.0,
        };
        rig.resize(width, height);
        rig
    }

    /// Track a new viewport size. Zero-sized viewports (minimised windows) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn view_projection(&self) -> Mat4 {
        let view = Mat4::look_at_rh(self.position, self.target, Vec3::Y);
        let projection = Mat4::perspective_rh(self.fov_y_radians, self.aspect, self.near, self.far);
        projection * view
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AmbientLight {
    pub color: Vec3,
    pub intensity: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct DirectionalLight {
    pub color: Vec3,
    pub intensity: f32,
    pub position: Vec3,
    pub cast_shadow: bool,
}

impl DirectionalLight {
    /// Direction the light travels, towards the origin.
    pub fn direction(&self) -> Vec3 {
        (-self.position).normalize_or_zero()
    }
}

pub struct Stage {
    pub camera: CameraRig,
    pub ambient: AmbientLight,
    pub sun: DirectionalLight,
    pub floor: NodeId,
}

impl Stage {
    /// Adds the ground disc to `scene` and sets up camera and lights.
    pub fn build(scene: &mut Scene, config: &ForestConfig) -> Self {
        let StageConfig {
            floor_color,
            viewport_width,
            viewport_height,
            ..
        } = config.stage;

        let floor_material = scene.add_material("floor", floor_color);
        let floor = scene.create_mesh(
            Primitive::Disc {
                radius: config.forest.floor_radius,
                segments: FLOOR_SEGMENTS,
            },
            floor_material,
        );
        scene.set_receive_shadow(floor, true);
        scene.add(floor);

        Self {
            camera: CameraRig::new(viewport_width, viewport_height),
            ambient: AmbientLight {
                color: Vec3::ONE,
                intensity: 0.5,
            },
            sun: DirectionalLight {
                color: Vec3::ONE,
                intensity: 1.0,
                position: Vec3::new(50.0, 100.0, 50.0),
                cast_shadow: true,
            },
            floor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CameraRig, Stage};
    use crate::forest_core::config::ForestConfig;
    use crate::forest_core::scene::{rgb_hex, NodeKind, Primitive, Scene};
    use glam::{Vec3, Vec4Swizzles};

    #[test]
    fn resize_updates_aspect_and_ignores_zero() {
        let mut camera = CameraRig::new(1600, 900);
        assert!((camera.aspect() - 16.0 / 9.0).abs() < 1e-6);
        camera.resize(800, 800);
        assert_eq!(camera.aspect(), 1.0);
        camera.resize(0, 600);
        assert_eq!(camera.aspect(), 1.0);
    }

    #[test]
    fn origin_projects_to_screen_centre() {
        let camera = CameraRig::new(1600, 900);
        let clip = camera.view_projection() * Vec3::ZERO.extend(1.0);
        let ndc = clip.xyz() / clip.w;
        assert!(ndc.x.abs() < 1e-4 && ndc.y.abs() < 1e-4, "{ndc}");
        assert!((0.0..1.0).contains(&ndc.z));
    }

    #[test]
    fn floor_receives_but_does_not_cast_shadows() {
        let config = ForestConfig::default();
        let mut scene = Scene::new(rgb_hex(config.stage.background));
        let stage = Stage::build(&mut scene, &config);

        let floor = scene.node(stage.floor);
        assert!(floor.receive_shadow);
        assert!(!floor.cast_shadow);
        assert_eq!(floor.parent(), Some(scene.root()));
        let NodeKind::Mesh { shape, material } = floor.kind else {
            panic!("floor must be a mesh");
        };
        assert_eq!(
            shape,
            Primitive::Disc {
                radius: 100.0,
                segments: 64
            }
        );
        assert_eq!(scene.material(material).color, rgb_hex(0x228833));
        assert!(stage.sun.cast_shadow);
        assert!(stage.sun.direction().y < 0.0);
    }
}
