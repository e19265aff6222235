// HashTable property tests.
//
// Model: hashbrown::HashMap<u16, u32> holding the same key-value pairs.
// Operations: set, remove, take, get, clear, shrink_to_fit.
// Invariants checked after every step:
//  - len() equals the model's len();
//  - capacity() is a power of two >= 16 and len() <= 3/4 * capacity();
//  - set reports insert vs update the way the model does;
//  - remove/take of an absent key return false and leave len() unchanged.
// At the end every model entry is retrievable and no other key is.
use core::hash::Hasher;

use proptest::prelude::*;
use robin_table::Config;
use robin_table::HashTable;
use robin_table::hash::equal_bytes;
use siphasher::sip::SipHasher;

fn sip_hash(key: &[u8], seed: u64) -> u64 {
    let mut hasher = SipHasher::new_with_keys(seed, seed.rotate_left(17));
    hasher.write(key);
    hasher.finish()
}

// Keys collide in groups of 32 and the ideal slots are adjacent, so every
// record lands in one long run.
fn clustered_hash(key: &[u8], _: u64) -> u64 {
    u64::from(u16::from_ne_bytes([key[0], key[1]]) / 32)
}

#[derive(Debug, Clone)]
enum Op {
    Set(u16, u32),
    Remove(u16),
    Take(u16),
    Get(u16),
    Clear,
    ShrinkToFit,
}

fn op_strategy(keys: u16) -> impl Strategy<Value = Op> {
    prop_oneof![
        12 => (0..keys, any::<u32>()).prop_map(|(k, v)| Op::Set(k, v)),
        3 => (0..keys).prop_map(Op::Remove),
        1 => (0..keys).prop_map(Op::Take),
        2 => (0..keys).prop_map(Op::Get),
        1 => Just(Op::ShrinkToFit),
        1 => Just(Op::Clear),
    ]
}

fn get_u32(table: &HashTable, key: u16) -> Option<u32> {
    table
        .get(&key.to_ne_bytes())
        .map(|v| u32::from_ne_bytes(v.try_into().unwrap()))
}

fn run_against_model(table: &mut HashTable, ops: Vec<Op>, keys: u16) -> Result<(), TestCaseError> {
    let mut model = hashbrown::HashMap::<u16, u32>::new();

    for op in ops {
        match op {
            Op::Set(k, v) => {
                let inserted = table.set(&k.to_ne_bytes(), &v.to_ne_bytes()).unwrap();
                prop_assert_eq!(inserted, model.insert(k, v).is_none());
            }
            Op::Remove(k) => {
                let before = table.len();
                let removed = table.remove(&k.to_ne_bytes());
                prop_assert_eq!(removed, model.remove(&k).is_some());
                if !removed {
                    prop_assert_eq!(table.len(), before);
                }
            }
            Op::Take(k) => {
                let mut out = [0u8; 4];
                let taken = table.take(&k.to_ne_bytes(), &mut out);
                let expected = model.remove(&k);
                prop_assert_eq!(taken, expected.is_some());
                if let Some(v) = expected {
                    prop_assert_eq!(u32::from_ne_bytes(out), v);
                }
            }
            Op::Get(k) => {
                prop_assert_eq!(get_u32(table, k), model.get(&k).copied());
            }
            Op::Clear => {
                table.clear();
                model.clear();
            }
            Op::ShrinkToFit => {
                table.shrink_to_fit().unwrap();
            }
        }

        prop_assert_eq!(table.len(), model.len());
        prop_assert!(table.capacity().is_power_of_two());
        prop_assert!(table.capacity() >= 16);
        prop_assert!(table.len() * 4 <= table.capacity() * 3);
    }

    for k in 0..keys {
        prop_assert_eq!(get_u32(table, k), model.get(&k).copied());
    }
    prop_assert_eq!(table.iter().count(), model.len());

    #[cfg(feature = "stats")]
    {
        let stats = table.debug_stats();
        prop_assert!(stats.max_displacement <= table.capacity());
        prop_assert_eq!(table.probe_histogram().iter().sum::<usize>(), table.len());
    }

    Ok(())
}

proptest! {
    #[test]
    fn prop_table_matches_model(
        seed in any::<u64>(),
        hint in 0usize..100,
        ops in proptest::collection::vec(op_strategy(600), 1..600),
    ) {
        let mut table = Config::map(2, 4)
            .hash_fn(sip_hash)
            .equal_fn(equal_bytes)
            .capacity(hint)
            .seed(seed)
            .build()
            .unwrap();
        run_against_model(&mut table, ops, 600)?;
    }

    #[test]
    fn prop_clustered_table_matches_model(
        ops in proptest::collection::vec(op_strategy(1024), 1..800),
    ) {
        let mut table = Config::map(2, 4)
            .hash_fn(clustered_hash)
            .equal_fn(equal_bytes)
            .build()
            .unwrap();
        run_against_model(&mut table, ops, 1024)?;
    }

    #[test]
    fn prop_set_then_get_returns_last_value(
        entries in proptest::collection::vec((any::<u16>(), any::<u32>()), 1..300),
    ) {
        let mut table = Config::map(2, 4)
            .hash_fn(sip_hash)
            .equal_fn(equal_bytes)
            .seed(7)
            .build()
            .unwrap();
        let mut last = hashbrown::HashMap::new();
        for (k, v) in entries {
            table.set(&k.to_ne_bytes(), &v.to_ne_bytes()).unwrap();
            last.insert(k, v);
        }
        prop_assert_eq!(table.len(), last.len());
        for (k, v) in last {
            prop_assert_eq!(get_u32(&table, k), Some(v));
        }
    }

    #[test]
    fn prop_clone_is_independent(
        keys in proptest::collection::hash_set(any::<u16>(), 1..200),
    ) {
        let mut table = Config::set(2)
            .hash_fn(sip_hash)
            .equal_fn(equal_bytes)
            .build()
            .unwrap();
        for k in &keys {
            prop_assert!(table.set(&k.to_ne_bytes(), &[]).unwrap());
        }

        let copy = table.clone();
        for k in &keys {
            prop_assert!(table.remove(&k.to_ne_bytes()));
        }
        prop_assert!(table.is_empty());
        prop_assert_eq!(copy.len(), keys.len());
        for k in &keys {
            prop_assert!(copy.contains(&k.to_ne_bytes()));
        }
    }
}
