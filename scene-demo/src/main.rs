//! Scene graph demo
//!
//! Drives a small solar-system hierarchy through the per-frame contract:
//! mutate transforms, update once, then draw. Set `RUST_LOG=debug` to see
//! the graph's own diagnostics.

use anyhow::{Context, Result};
use glam::Vec2;
use scene_debug::{line_vertices, vertex_bytes, DebugOptions, DebugOverlay};
use scene_graph::{
    Color, CommandList, GraphConfig, NodeId, Quad, SceneGraph, Transform2D, TransformSpace,
};

const FRAMES: u32 = 8;
const FRAME_TIME: f32 = 1.0 / 60.0;

struct System {
    sun: NodeId,
    planet: NodeId,
    moon: NodeId,
}

fn build(graph: &mut SceneGraph) -> Result<System> {
    let sun = graph.create_child(graph.root(), Transform2D::from_position(Vec2::new(400.0, 300.0)))?;
    let planet = graph.create_child(sun, Transform2D::from_position(Vec2::new(150.0, 0.0)))?;
    let moon = graph.create_child(
        planet,
        Transform2D::new(Vec2::new(30.0, 0.0), 0.0, Vec2::splat(0.5)),
    )?;

    graph.set_name(sun, "sun")?;
    graph.set_name(planet, "planet")?;
    graph.set_name(moon, "moon")?;

    graph.attach_drawable(sun, Quad::new(Vec2::splat(40.0)).with_color(Color::new(1.0, 0.8, 0.1, 1.0)).shared())?;
    graph.attach_drawable(planet, Quad::new(Vec2::splat(12.0)).with_color(Color::new(0.2, 0.4, 1.0, 1.0)).shared())?;
    graph.attach_drawable(moon, Quad::new(Vec2::splat(6.0)).shared())?;

    Ok(System { sun, planet, moon })
}

fn main() -> Result<()> {
    env_logger::init();

    let mut graph = SceneGraph::new(GraphConfig::default());
    let system = build(&mut graph).context("building demo hierarchy")?;

    let mut overlay = DebugOverlay::new(DebugOptions::default());
    overlay.register(graph.id());

    let mut commands = CommandList::with_capacity(graph.len());
    for frame in 0..FRAMES {
        // Gameplay: spin the sun (carrying the planet around) and the planet
        // (carrying the moon around)
        graph.rotate(system.sun, 0.5 * FRAME_TIME, TransformSpace::Local)?;
        graph.rotate(system.planet, 2.0 * FRAME_TIME, TransformSpace::Local)?;
        graph.translate(system.sun, Vec2::new(10.0 * FRAME_TIME, 0.0), TransformSpace::World)?;

        let recomputed = graph.update();

        commands.clear();
        let drawn = graph.draw(&mut commands);
        let debug_lines = overlay.collect(&graph);
        let debug_vertices = line_vertices(&debug_lines);

        let moon = graph.derived_position(system.moon)?;
        log::info!(
            "frame {frame}: recomputed {recomputed} nodes, {drawn} drawables, {} commands, {} debug bytes, moon at ({:.1}, {:.1})",
            commands.len(),
            vertex_bytes(&debug_vertices).len(),
            moon.x,
            moon.y,
        );
    }

    let bounds = graph.aabb(system.sun)?;
    println!(
        "system bounds: center ({:.1}, {:.1}), half extents ({:.1}, {:.1})",
        bounds.center.x, bounds.center.y, bounds.half_extents.x, bounds.half_extents.y
    );

    let freed = graph.remove_and_dispose_child(graph.root(), system.sun)?;
    println!("disposed {freed} nodes, {} remain", graph.len());
    Ok(())
}
