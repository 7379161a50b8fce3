#![no_main]

use chainlru::ChainedLru;
use libfuzzer_sys::fuzz_target;
use std::collections::VecDeque;

// Fuzz arbitrary operation sequences on ChainedLru
//
// The first two bytes pick bucket count and capacity. The rest drives add,
// search, remove, peek and clear against an MRU-ordered reference list.
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let bucket_count = usize::from(data[0] % 16) + 1;
    let capacity = usize::from(data[1] % 24);
    let mut cache: ChainedLru<u8, u8> = ChainedLru::new(bucket_count, capacity);
    let mut reference: VecDeque<(u8, u8)> = VecDeque::new();

    let mut idx = 2;
    while idx + 1 < data.len() {
        let op = data[idx] % 5;
        let key = data[idx + 1] % 48;

        match op {
            0 => {
                // add
                let value = data[idx + 1];
                let result = cache.add(key, value);

                if let Some(pos) = reference.iter().position(|&(k, _)| k == key) {
                    reference.remove(pos);
                    reference.push_front((key, value));
                    assert!(result.is_ok());
                } else if capacity == 0 {
                    assert!(result.is_err());
                } else {
                    assert!(result.is_ok());
                    if reference.len() == capacity {
                        reference.pop_back();
                    }
                    reference.push_front((key, value));
                }
            }
            1 => {
                // search
                let found = cache.get(key).copied();
                let expected = reference
                    .iter()
                    .position(|&(k, _)| k == key)
                    .and_then(|pos| reference.remove(pos));
                if let Some(item) = expected {
                    reference.push_front(item);
                }
                assert_eq!(found, expected.map(|(_, v)| v));
            }
            2 => {
                // remove
                let removed = cache.remove(key);
                let expected = reference
                    .iter()
                    .position(|&(k, _)| k == key)
                    .and_then(|pos| reference.remove(pos))
                    .map(|(_, v)| v);
                assert_eq!(removed, expected);
            }
            3 => {
                // peek (read-only)
                let expected = reference.iter().find(|&&(k, _)| k == key).map(|&(_, v)| v);
                assert_eq!(cache.peek(key).copied(), expected);
            }
            4 => {
                // clear, rarely
                if data[idx + 1] == 0 {
                    cache.clear();
                    reference.clear();
                }
            }
            _ => unreachable!(),
        }

        assert_eq!(cache.len(), reference.len());
        assert!(cache.len() <= cache.capacity());
        let order: Vec<(u8, u8)> = cache.iter().map(|(k, v)| (k, *v)).collect();
        assert!(order.iter().eq(reference.iter()));
        cache.check_invariants().unwrap();

        idx += 2;
    }
});
