// Binary entry point: builds the forest scene headlessly and reports what a
// renderer would receive.

fn main() -> anyhow::Result<()> {
    use anyhow::Context;

    use forest_gen::forest_core::config::{CliOverrides, ForestConfig};
    use forest_gen::forest_core::context::SceneContext;
    use forest_gen::renderer::mesh::{build_scene_mesh, build_shadow_caster_mesh};

    env_logger::init();

    let overrides = CliOverrides::from_env_args()?;
    let mut config = ForestConfig::load(overrides.config_path());
    overrides.apply(&mut config);
    config.validate().context("invalid forest configuration")?;

    log::info!(
        "forest: {} trees, radius {}, inner margin {}",
        config.forest.tree_count,
        config.forest.floor_radius,
        config.forest.inner_margin
    );

    let mut ctx = SceneContext::new(&config);
    let trees = ctx.plant_forest();

    let mesh = build_scene_mesh(&ctx.scene);
    let shadows = build_shadow_caster_mesh(&ctx.scene);
    log::info!(
        "scene: {} nodes, {} materials, {} triangles ({} shadow casting), {} vertices",
        ctx.scene.len(),
        ctx.scene.materials().len(),
        mesh.triangle_count(),
        shadows.triangle_count(),
        mesh.vertices.len()
    );
    log::info!(
        "camera at {} (aspect {:.3}), sun from {}",
        ctx.stage.camera.position,
        ctx.stage.camera.aspect(),
        ctx.stage.sun.position
    );

    if let Some(farthest) = trees
        .iter()
        .map(|t| t.placement.radius())
        .max_by(|a, b| a.total_cmp(b))
    {
        log::info!("farthest tree {farthest:.2} from centre");
    }

    Ok(())
}
