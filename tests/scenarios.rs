use robin_table::Config;
use robin_table::Error;
use robin_table::HashMap;
use robin_table::hash::equal_bytes;

fn hash_i32(key: &[u8], seed: u64) -> u64 {
    let k = i32::from_ne_bytes(key.try_into().unwrap()) as u64;
    (k ^ seed).wrapping_mul(0x9E37_79B9_7F4A_7C15).rotate_left(29)
}

fn stub_hash(_: &[u8], _: u64) -> u64 {
    7
}

fn i32_table(hash: robin_table::hash::HashFn) -> robin_table::HashTable {
    Config::map(4, 4)
        .hash_fn(hash)
        .equal_fn(equal_bytes)
        .seed(0xC0FFEE)
        .build()
        .unwrap()
}

fn get(table: &robin_table::HashTable, key: i32) -> Option<i32> {
    table
        .get(&key.to_ne_bytes())
        .map(|v| i32::from_ne_bytes(v.try_into().unwrap()))
}

#[test]
fn thirteenth_insert_grows() {
    let mut table = i32_table(hash_i32);
    assert_eq!(table.capacity(), 16);

    for key in 0..12i32 {
        table.set(&key.to_ne_bytes(), &(key + 100).to_ne_bytes()).unwrap();
    }
    assert_eq!(table.capacity(), 16);

    table.set(&12i32.to_ne_bytes(), &112i32.to_ne_bytes()).unwrap();
    assert_eq!(table.capacity(), 32);
    for key in 0..=12i32 {
        assert_eq!(get(&table, key), Some(key + 100));
    }
}

#[test]
fn constant_hash_keys_are_retrievable() {
    let mut table = i32_table(stub_hash);
    for key in [10i32, -20, 30] {
        table.set(&key.to_ne_bytes(), &(key * 2).to_ne_bytes()).unwrap();
    }
    assert_eq!(get(&table, 10), Some(20));
    assert_eq!(get(&table, -20), Some(-40));
    assert_eq!(get(&table, 30), Some(60));
    assert_eq!(get(&table, 40), None);
}

#[test]
fn removing_most_keys_shrinks() {
    let mut table = i32_table(hash_i32);
    for key in 0..20i32 {
        table.set(&key.to_ne_bytes(), &key.to_ne_bytes()).unwrap();
    }
    let grown = table.capacity();

    for key in 0..18i32 {
        assert!(table.remove(&key.to_ne_bytes()));
    }
    assert!(table.capacity() < grown);
    assert_eq!(get(&table, 18), Some(18));
    assert_eq!(get(&table, 19), Some(19));
}

#[test]
fn overwrite_keeps_count() {
    let mut table = i32_table(hash_i32);
    assert_eq!(table.set(&1i32.to_ne_bytes(), &1i32.to_ne_bytes()), Ok(true));
    assert_eq!(table.set(&1i32.to_ne_bytes(), &2i32.to_ne_bytes()), Ok(false));
    assert_eq!(table.len(), 1);
    assert_eq!(get(&table, 1), Some(2));
}

#[test]
fn heavy_collisions_do_not_reject_inserts() {
    let mut map = HashMap::<i32, i32>::with_hash_fn(stub_hash, 0, 0).unwrap();
    for key in 0..600 {
        assert_eq!(map.try_insert(key, -key), Ok(None));
    }
    assert_eq!(map.len(), 600);
    for key in 0..600 {
        assert_eq!(map.get(&key), Some(-key));
    }
    assert_eq!(map.get(&600), None);
}

#[test]
fn destroyed_table_rejects_inserts() {
    let mut table = i32_table(hash_i32);
    table.destroy();
    assert_eq!(
        table.set(&1i32.to_ne_bytes(), &1i32.to_ne_bytes()),
        Err(Error::Destroyed)
    );
    assert_eq!(get(&table, 1), None);
}
