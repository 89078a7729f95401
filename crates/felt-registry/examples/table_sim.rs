//! Minimal consumer: a toy card-table update loop.
//!
//! Spawns a handful of cards, integrates their positions for a few ticks,
//! then knocks one off the table to show slot reuse.

use felt_registry::prelude::*;

fn main() -> Result<(), RegistryError> {
    let mut registry = Registry::new();
    registry.set_entity_capacity(32);
    registry.register_kind::<Position>("position");
    registry.register_kind::<Velocity>("velocity");
    registry.set_kind_capacity("position", 32);
    registry.set_kind_capacity("velocity", 32);

    let mut cards = Vec::new();
    for i in 0..5 {
        let card = registry.create()?;
        registry.add_component(
            card,
            "position",
            Position {
                x: 40.0 * i as f32,
                y: 100.0,
            },
        )?;
        registry.add_component(card, "velocity", Velocity { dx: 2.0, dy: -0.5 })?;
        cards.push(card);
    }

    for tick in 0..10 {
        for &card in &cards {
            let Some(&Velocity { dx, dy }) = registry.get_component(card, "velocity") else {
                continue;
            };
            if let Some(pos) = registry.get_component_mut::<Position>(card, "position") {
                pos.x += dx;
                pos.y += dy;
            }
        }
        println!("tick {tick}: {} cards on the table", registry.entity_count());
    }

    // Discard the first card; its id and slots become reusable.
    let discarded = cards.remove(0);
    registry.destroy(discarded)?;
    let fresh = registry.create()?;
    println!("discarded {discarded}, dealt {fresh}");

    for &card in &cards {
        if let Some(pos) = registry.get_component::<Position>(card, "position") {
            println!("card {card} at ({:.1}, {:.1})", pos.x, pos.y);
        }
    }
    Ok(())
}
