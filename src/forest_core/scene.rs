use glam::{Mat4, Quat, Vec3};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialId(usize);

/// Solid primitives, sized like the usual three-style geometry constructors.
/// Cylinders, cones and spheres are centred on their local origin; the axis is +Y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    Cylinder {
        top_radius: f32,
        bottom_radius: f32,
        height: f32,
        radial_segments: u32,
    },
    Cone {
        radius: f32,
        height: f32,
        radial_segments: u32,
    },
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },
    /// Flat disc in the XZ plane facing +Y.
    Disc { radius: f32, segments: u32 },
}

impl Primitive {
    /// Same primitive with every linear dimension multiplied by `factor`.
    pub fn scaled(self, factor: f32) -> Self {
        match self {
            Primitive::Cylinder {
                top_radius,
                bottom_radius,
                height,
                radial_segments,
            } => Primitive::Cylinder {
                top_radius: top_radius * factor,
                bottom_radius: bottom_radius * factor,
                height: height * factor,
                radial_segments,
            },
            Primitive::Cone {
                radius,
                height,
                radial_segments,
            } => Primitive::Cone {
                radius: radius * factor,
                height: height * factor,
                radial_segments,
            },
            Primitive::Sphere {
                radius,
                width_segments,
                height_segments,
            } => Primitive::Sphere {
                radius: radius * factor,
                width_segments,
                height_segments,
            },
            Primitive::Disc { radius, segments } => Primitive::Disc {
                radius: radius * factor,
                segments,
            },
        }
    }
}

/// Flat-shaded opaque surface keyed by one colour.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub label: String,
    pub color: Vec3,
}

pub fn rgb_hex(hex: u32) -> Vec3 {
    Vec3::new(
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    )
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeKind {
    Group,
    Mesh { shape: Primitive, material: MaterialId },
}

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub position: Vec3,
    pub scale: f32,
    pub yaw: f32,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            position: Vec3::ZERO,
            scale: 1.0,
            yaw: 0.0,
            cast_shadow: false,
            receive_shadow: false,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn is_mesh(&self) -> bool {
        matches!(self.kind, NodeKind::Mesh { .. })
    }
}

/// Arena-backed scene graph. Nodes are never removed, so ids stay valid for the
/// lifetime of the scene.
pub struct Scene {
    nodes: Vec<Node>,
    materials: Vec<Material>,
    root: NodeId,
    pub background: Vec3,
}

impl Scene {
    pub fn new(background: Vec3) -> Self {
        Self {
            nodes: vec![Node::new(NodeKind::Group)],
            materials: Vec::new(),
            root: NodeId(0),
            background,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Node count, root included, so never zero.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn add_material(&mut self, label: &str, hex: u32) -> MaterialId {
        self.materials.push(Material {
            label: label.to_string(),
            color: rgb_hex(hex),
        });
        MaterialId(self.materials.len() - 1)
    }

    pub fn material(&self, id: MaterialId) -> &Material {
        &self.materials[id.0]
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn create_group(&mut self) -> NodeId {
        self.push(Node::new(NodeKind::Group))
    }

    pub fn create_mesh(&mut self, shape: Primitive, material: MaterialId) -> NodeId {
        assert!(material.0 < self.materials.len(), "unknown material {material:?}");
        self.push(Node::new(NodeKind::Mesh { shape, material }))
    }

    fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Attach `child` under `parent`, detaching it from any previous parent.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        assert!(parent != child, "node {child:?} cannot parent itself");
        assert!(
            !self.is_ancestor(child, parent),
            "attaching {child:?} under {parent:?} would form a cycle"
        );
        if let Some(old) = self.nodes[child.0].parent.take() {
            self.nodes[old.0].children.retain(|&c| c != child);
        }
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    pub fn add(&mut self, child: NodeId) {
        self.add_child(self.root, child);
    }

    fn is_ancestor(&self, candidate: NodeId, mut node: NodeId) -> bool {
        while let Some(parent) = self.nodes[node.0].parent {
            if parent == candidate {
                return true;
            }
            node = parent;
        }
        false
    }

    pub fn set_scale(&mut self, id: NodeId, scale: f32) {
        self.nodes[id.0].scale = scale;
    }

    pub fn set_position(&mut self, id: NodeId, position: Vec3) {
        self.nodes[id.0].position = position;
    }

    pub fn set_yaw(&mut self, id: NodeId, yaw: f32) {
        self.nodes[id.0].yaw = yaw;
    }

    pub fn set_cast_shadow(&mut self, id: NodeId, cast: bool) {
        self.nodes[id.0].cast_shadow = cast;
    }

    pub fn set_receive_shadow(&mut self, id: NodeId, receive: bool) {
        self.nodes[id.0].receive_shadow = receive;
    }

    pub fn local_transform(&self, id: NodeId) -> Mat4 {
        let node = &self.nodes[id.0];
        Mat4::from_scale_rotation_translation(
            Vec3::splat(node.scale),
            Quat::from_rotation_y(node.yaw),
            node.position,
        )
    }

    pub fn world_transform(&self, id: NodeId) -> Mat4 {
        let mut transform = self.local_transform(id);
        let mut current = self.nodes[id.0].parent;
        while let Some(parent) = current {
            transform = self.local_transform(parent) * transform;
            current = self.nodes[parent.0].parent;
        }
        transform
    }

    /// Every mesh node reachable from the root, depth first, with its world transform.
    pub fn mesh_nodes(&self) -> Vec<(NodeId, Mat4)> {
        let mut out = Vec::new();
        let mut stack = vec![(self.root, self.local_transform(self.root))];
        while let Some((id, transform)) = stack.pop() {
            if self.nodes[id.0].is_mesh() {
                out.push((id, transform));
            }
            for &child in self.nodes[id.0].children.iter().rev() {
                stack.push((child, transform * self.local_transform(child)));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::{rgb_hex, Primitive, Scene};
    use glam::Vec3;

    fn sphere() -> Primitive {
        Primitive::Sphere {
            radius: 1.0,
            width_segments: 4,
            height_segments: 4,
        }
    }

    #[test]
    fn hex_colour_unpacks_channels() {
        let c = rgb_hex(0xff8000);
        assert!((c - Vec3::new(1.0, 128.0 / 255.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn fresh_scene_holds_only_the_root() {
        let scene = Scene::new(Vec3::ZERO);
        assert_eq!(scene.len(), 1);
        assert!(scene.children(scene.root()).is_empty());
    }

    #[test]
    fn reparenting_moves_child() {
        let mut scene = Scene::new(Vec3::ZERO);
        let a = scene.create_group();
        let b = scene.create_group();
        let leaf = scene.create_group();
        scene.add_child(a, leaf);
        scene.add_child(b, leaf);
        assert!(scene.children(a).is_empty());
        assert_eq!(scene.children(b), &[leaf]);
        assert_eq!(scene.node(leaf).parent(), Some(b));
    }

    #[test]
    #[should_panic]
    fn cycles_are_rejected() {
        let mut scene = Scene::new(Vec3::ZERO);
        let a = scene.create_group();
        let b = scene.create_group();
        scene.add_child(a, b);
        scene.add_child(b, a);
    }

    #[test]
    fn world_transform_composes_parent_chain() {
        let mut scene = Scene::new(Vec3::ZERO);
        let mat = scene.add_material("m", 0xffffff);
        let group = scene.create_group();
        let mesh = scene.create_mesh(sphere(), mat);
        scene.add(group);
        scene.add_child(group, mesh);
        scene.set_position(group, Vec3::new(10.0, 0.0, 0.0));
        scene.set_scale(group, 2.0);
        scene.set_yaw(group, std::f32::consts::FRAC_PI_2);
        scene.set_position(mesh, Vec3::new(1.0, 3.0, 0.0));

        let p = scene.world_transform(mesh).transform_point3(Vec3::ZERO);
        // local (1,3,0) -> scaled (2,6,0) -> yaw 90deg about Y -> (0,6,-2) -> +10 x
        assert!((p - Vec3::new(10.0, 6.0, -2.0)).length() < 1e-4, "{p}");
    }

    #[test]
    fn detached_meshes_are_not_reachable() {
        let mut scene = Scene::new(Vec3::ZERO);
        let mat = scene.add_material("m", 0xffffff);
        let attached = scene.create_mesh(sphere(), mat);
        let _detached = scene.create_mesh(sphere(), mat);
        scene.add(attached);
        let meshes = scene.mesh_nodes();
        assert_eq!(meshes.len(), 1);
        assert_eq!(meshes[0].0, attached);
    }

    #[test]
    fn scaled_primitive_keeps_segments() {
        let scaled = Primitive::Cylinder {
            top_radius: 1.0,
            bottom_radius: 2.0,
            height: 10.0,
            radial_segments: 6,
        }
        .scaled(0.5);
        assert_eq!(
            scaled,
            Primitive::Cylinder {
                top_radius: 0.5,
                bottom_radius: 1.0,
                height: 5.0,
                radial_segments: 6,
            }
        );
    }
}
