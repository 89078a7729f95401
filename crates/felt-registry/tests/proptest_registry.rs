//! Property tests for registry operations.
//!
//! These tests use `proptest` to generate random sequences of lifecycle and
//! component operations and verify, after every step, that the registry's
//! cross-referential invariants hold: live ids are unique and bounded, index
//! entries always point at live slots, and every dense slot is either live
//! or sitting on its kind's free list.

use std::collections::HashMap;

use felt_registry::prelude::*;
use proptest::prelude::*;

const ENTITY_CAPACITY: u32 = 16;

/// Operations we can perform on the registry.
#[derive(Debug, Clone)]
enum RegistryOp {
    Create,
    Destroy(usize),
    AddPos(usize, f32, f32),
    RemovePos(usize),
    AddVel(usize, f32, f32),
    RemoveVel(usize),
}

/// Strategy that generates finite (non-NaN, non-Inf) f32 values.
fn finite_f32() -> impl Strategy<Value = f32> {
    (-1_000_000i32..1_000_000i32).prop_map(|v| v as f32 * 0.01)
}

fn registry_op_strategy() -> impl Strategy<Value = RegistryOp> {
    prop_oneof![
        3 => Just(RegistryOp::Create),
        2 => (0..100usize).prop_map(RegistryOp::Destroy),
        2 => (0..100usize, finite_f32(), finite_f32())
            .prop_map(|(i, x, y)| RegistryOp::AddPos(i, x, y)),
        1 => (0..100usize).prop_map(RegistryOp::RemovePos),
        2 => (0..100usize, finite_f32(), finite_f32())
            .prop_map(|(i, dx, dy)| RegistryOp::AddVel(i, dx, dy)),
        1 => (0..100usize).prop_map(RegistryOp::RemoveVel),
    ]
}

/// Shadow model the registry must agree with after every operation.
#[derive(Default)]
struct Model {
    alive: Vec<EntityId>,
    pos: HashMap<EntityId, (f32, f32)>,
    vel: HashMap<EntityId, (f32, f32)>,
}

impl Model {
    fn pick(&self, i: usize) -> Option<EntityId> {
        if self.alive.is_empty() {
            None
        } else {
            Some(self.alive[i % self.alive.len()])
        }
    }
}

fn check_against_model(registry: &Registry, model: &Model) {
    assert_eq!(registry.entity_count(), model.alive.len());

    // Live ids are unique and inside [0, capacity).
    let mut indices: Vec<u32> = model.alive.iter().map(|e| e.index()).collect();
    indices.sort();
    let len = indices.len();
    indices.dedup();
    assert_eq!(indices.len(), len, "duplicate live entity id");
    assert!(indices.iter().all(|&i| i < ENTITY_CAPACITY));

    // Every dense slot is live xor free-listed; live counts match the model.
    for (kind, expected) in [("position", &model.pos), ("velocity", &model.vel)] {
        let len = registry.kind_len(kind).unwrap();
        let live = registry.kind_live_count(kind).unwrap();
        let free = registry.kind_free_count(kind).unwrap();
        assert_eq!(len, live + free, "slot not partitioned live/free for {kind}");
        assert_eq!(live, expected.len());
    }

    // Every index entry resolves to the value the model expects, and no
    // entity carries a component the model does not know about.
    for &e in &model.alive {
        match model.pos.get(&e) {
            Some(&(x, y)) => {
                assert_eq!(
                    registry.get_component::<Position>(e, "position"),
                    Some(&Position { x, y })
                );
            }
            None => assert!(!registry.has_component(e, "position")),
        }
        match model.vel.get(&e) {
            Some(&(dx, dy)) => {
                assert_eq!(
                    registry.get_component::<Velocity>(e, "velocity"),
                    Some(&Velocity { dx, dy })
                );
            }
            None => assert!(!registry.has_component(e, "velocity")),
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2_000))]

    #[test]
    fn random_ops_preserve_invariants(ops in prop::collection::vec(registry_op_strategy(), 1..60)) {
        let mut registry = Registry::new();
        registry.set_entity_capacity(ENTITY_CAPACITY);
        registry.register_kind::<Position>("position");
        registry.register_kind::<Velocity>("velocity");

        let mut model = Model::default();

        for op in ops {
            match op {
                RegistryOp::Create => {
                    let result = registry.create();
                    if model.alive.len() < ENTITY_CAPACITY as usize {
                        let e = result.expect("create below capacity must succeed");
                        assert!(!model.alive.contains(&e), "recycled id still live");
                        model.alive.push(e);
                    } else {
                        assert!(matches!(result, Err(RegistryError::StorageExhausted { .. })));
                    }
                }
                RegistryOp::Destroy(i) => {
                    if let Some(e) = model.pick(i) {
                        registry.destroy(e).expect("destroy of live entity");
                        model.alive.retain(|&a| a != e);
                        model.pos.remove(&e);
                        model.vel.remove(&e);
                        // Second destroy is rejected and changes nothing.
                        assert!(registry.destroy(e).is_err());
                    }
                }
                RegistryOp::AddPos(i, x, y) => {
                    if let Some(e) = model.pick(i) {
                        let result = registry.add_component(e, "position", Position { x, y });
                        if model.pos.contains_key(&e) {
                            assert!(matches!(
                                result,
                                Err(RegistryError::ComponentAlreadyPresent { .. })
                            ));
                        } else {
                            result.expect("attach of absent kind");
                            model.pos.insert(e, (x, y));
                        }
                    }
                }
                RegistryOp::RemovePos(i) => {
                    if let Some(e) = model.pick(i) {
                        let result = registry.remove_component(e, "position");
                        if model.pos.remove(&e).is_some() {
                            result.expect("detach of present kind");
                        } else {
                            assert!(matches!(
                                result,
                                Err(RegistryError::ComponentNotPresent { .. })
                            ));
                        }
                    }
                }
                RegistryOp::AddVel(i, dx, dy) => {
                    if let Some(e) = model.pick(i) {
                        let result = registry.add_component(e, "velocity", Velocity { dx, dy });
                        if model.vel.contains_key(&e) {
                            assert!(matches!(
                                result,
                                Err(RegistryError::ComponentAlreadyPresent { .. })
                            ));
                        } else {
                            result.expect("attach of absent kind");
                            model.vel.insert(e, (dx, dy));
                        }
                    }
                }
                RegistryOp::RemoveVel(i) => {
                    if let Some(e) = model.pick(i) {
                        let result = registry.remove_component(e, "velocity");
                        if model.vel.remove(&e).is_some() {
                            result.expect("detach of present kind");
                        } else {
                            assert!(matches!(
                                result,
                                Err(RegistryError::ComponentNotPresent { .. })
                            ));
                        }
                    }
                }
            }

            check_against_model(&registry, &model);
        }
    }

    #[test]
    fn dense_arrays_never_grow_past_peak_live(count in 1..50usize) {
        // Repeatedly attach and detach on a single entity: the dense array
        // must stay at length 1, with the freed slot reused every time.
        let mut registry = Registry::new();
        registry.set_entity_capacity(1);
        registry.register_kind::<Position>("position");
        let e = registry.create().unwrap();

        for i in 0..count {
            let v = i as f32;
            registry.add_component(e, "position", Position { x: v, y: v }).unwrap();
            registry.remove_component(e, "position").unwrap();
        }
        prop_assert_eq!(registry.kind_len("position"), Some(1));
        prop_assert_eq!(registry.kind_free_count("position"), Some(1));
    }
}
