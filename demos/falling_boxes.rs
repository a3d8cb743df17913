//! Falling boxes example
//!
//! Drops a tilted box, an axis-aligned box and a ball onto a static floor
//! and logs where they settle.

use rigidcore::prelude::*;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("rigidcore v{}", env!("CARGO_PKG_VERSION"));

    let mut world = World::new(WorldConfig::default().with_gravity(Vec3::new(0.0, -9.81, 0.0)));

    // Static floor, top surface at Y=0.5
    world.create_body(
        RigidBodyDesc::fixed()
            .with_collider(Collider::new(Shape::aabb(Vec3::new(10.0, 0.5, 10.0)))?),
    )?;

    let tilted = world.create_body(
        RigidBodyDesc::dynamic()
            .with_position(Vec3::new(-2.0, 4.0, 0.0))
            .with_orientation(Quat::from_axis_angle(Vec3::new(1.0, 0.0, 1.0).normalize(), 0.4))
            .with_mass(2.0)
            .with_collider(Collider::new(Shape::obb(Vec3::splat(0.5)))?.with_restitution(0.1)),
    )?;
    let upright = world.create_body(
        RigidBodyDesc::dynamic()
            .with_position(Vec3::new(0.0, 3.0, 0.0))
            .with_collider(Collider::new(Shape::aabb(Vec3::new(0.75, 0.25, 0.5)))?),
    )?;
    let ball = world.create_body(
        RigidBodyDesc::dynamic()
            .with_position(Vec3::new(2.0, 5.0, 0.0))
            .with_mass(0.5)
            .with_collider(Collider::new(Shape::sphere(0.5))?.with_restitution(0.6)),
    )?;

    let dt = 1.0 / 60.0;
    let total_time = 3.0;
    let steps = (total_time / dt) as usize;
    info!(steps, hz = 1.0 / dt, "simulating {} seconds", total_time);

    for i in 0..steps {
        let stats = world.step(dt)?;

        // Every half second
        if i % 30 == 0 {
            for (name, handle) in [("tilted", tilted), ("upright", upright), ("ball", ball)] {
                if let Some(body) = world.body(handle) {
                    let p = body.position;
                    let v = body.linear_velocity;
                    info!(
                        "t={:.2}s {name:>7}: position=({:.3}, {:.3}, {:.3}) velocity=({:.3}, {:.3}, {:.3})",
                        world.time(),
                        p.x, p.y, p.z,
                        v.x, v.y, v.z
                    );
                }
            }
            info!(contacts = stats.contacts, pairs = stats.pairs_tested, "step stats");
        }
    }

    for dbg_info in world.debug_colliders() {
        info!(
            body = ?dbg_info.body,
            kind = ?dbg_info.kind,
            touching = dbg_info.was_collided,
            "final centre ({:.3}, {:.3}, {:.3})",
            dbg_info.pose.position.x,
            dbg_info.pose.position.y,
            dbg_info.pose.position.z
        );
    }

    Ok(())
}
