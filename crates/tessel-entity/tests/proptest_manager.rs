//! Property tests for the entity manager.
//!
//! Random sequences of queue / flush / destroy / sweep operations are applied
//! and the manager's bookkeeping is checked against a simple model after
//! every step.

use proptest::prelude::*;
use tessel_entity::prelude::*;

#[derive(Debug, Clone)]
enum ManagerOp {
    Add(f64),
    AddProjectile(f64),
    Spawn(bool),
    SpawnNamed(bool),
    Flush,
    Destroy(usize),
    Sweep,
}

fn op_strategy() -> impl Strategy<Value = ManagerOp> {
    prop_oneof![
        (0..1000i32).prop_map(|x| ManagerOp::Add(x as f64)),
        (0..1000i32).prop_map(|x| ManagerOp::AddProjectile(x as f64)),
        any::<bool>().prop_map(ManagerOp::Spawn),
        any::<bool>().prop_map(ManagerOp::SpawnNamed),
        Just(ManagerOp::Flush),
        (0..64usize).prop_map(ManagerOp::Destroy),
        Just(ManagerOp::Sweep),
    ]
}

fn factory() -> EntityFactory {
    let mut factory = EntityFactory::new();
    factory.register("rock", |x, y| Ok(Entity::inert(Body::new("rock", x, y, 8.0, 8.0))));
    factory
}

fn body(projectile: bool, x: f64) -> Body {
    let layer = if projectile {
        PhysicsLayer::EnemyProjectile
    } else {
        PhysicsLayer::Enemy
    };
    Body::new("thing", x, 0.0, 4.0, 4.0).with_layer(layer)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn random_ops_keep_bookkeeping_consistent(ops in prop::collection::vec(op_strategy(), 1..80)) {
        let factory = factory();
        let mut manager = EntityManager::new();
        let mut queued = 0usize;
        let mut live = 0usize;
        let mut flagged: Vec<EntityId> = Vec::new();
        let mut evicted: Vec<EntityId> = Vec::new();

        for op in &ops {
            match op {
                ManagerOp::Add(x) => { manager.add(Entity::inert(body(false, *x))); queued += 1; }
                ManagerOp::AddProjectile(x) => { manager.add_projectile(Entity::inert(body(true, *x))); queued += 1; }
                ManagerOp::Spawn(p) => { manager.spawn(Entity::inert(body(*p, 0.0))); queued += 1; }
                ManagerOp::SpawnNamed(known) => {
                    manager.spawn_named(if *known { "rock" } else { "ghost" }, 0.0, 0.0);
                    queued += 1;
                }
                ManagerOp::Flush => {
                    let report = manager.flush_pending(&factory);
                    prop_assert_eq!(report.spawned + report.failed, queued);
                    live += report.spawned;
                    queued = 0;
                }
                ManagerOp::Destroy(i) => {
                    let ids = manager.ids();
                    if !ids.is_empty() {
                        let id = ids[i % ids.len()];
                        if manager.get_mut(id).unwrap().body_mut().destroy() {
                            flagged.push(id);
                        }
                    }
                }
                ManagerOp::Sweep => {
                    let n = manager.remove_destroyed();
                    prop_assert_eq!(n, flagged.len());
                    live -= n;
                    evicted.append(&mut flagged);
                }
            }

            prop_assert_eq!(manager.len(), live);
            prop_assert_eq!(manager.pending_len(), queued);
            prop_assert_eq!(manager.general_len() + manager.projectile_len(), live);

            // Canonical order: general partition first, then projectiles.
            let ids = manager.ids();
            prop_assert_eq!(ids.len(), live);
            let split = manager.general_len();
            for (i, id) in ids.iter().enumerate() {
                let expected = if i < split { Partition::General } else { Partition::Projectile };
                prop_assert_eq!(manager.partition_of(*id), Some(expected));
            }

            // Evicted ids never resolve again.
            for id in &evicted {
                prop_assert!(manager.get(*id).is_none());
            }
        }
    }
}
