#![no_main]

use chainlru::{CacheError, ChainedLru, EntryId};
use libfuzzer_sys::fuzz_target;

// Fuzz the low-level pop/push/allocate/release primitives
//
// Handles are kept after they go stale so that Null and NotFound paths get
// exercised alongside the happy path. Every failed call must leave the cache
// unchanged.
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let bucket_count = usize::from(data[0] % 8) + 1;
    let capacity = usize::from(data[1] % 12) + 1;
    let mut cache: ChainedLru<i16, u8> = ChainedLru::new(bucket_count, capacity);
    let mut handles: Vec<EntryId> = Vec::new();

    for chunk in data[2..].chunks_exact(2) {
        let op = chunk[0] % 6;
        let arg = chunk[1];
        let pick = |handles: &[EntryId]| handles.get(usize::from(arg) % handles.len().max(1)).copied();

        let before: Vec<i16> = cache.iter().map(|(k, _)| k).collect();
        let len_before = cache.len();

        match op {
            0 => {
                // add
                if let Ok(id) = cache.add(i16::from(arg as i8), arg) {
                    handles.push(id);
                    assert_eq!(cache.head(), Some(id));
                }
            }
            1 => {
                // allocate a detached entry
                if let Ok(id) = cache.allocate(i16::from(arg as i8), arg) {
                    handles.push(id);
                    assert_eq!(cache.len(), len_before);
                }
            }
            2 => {
                // pop
                if let Some(id) = pick(&handles) {
                    match cache.pop(id) {
                        Ok(()) => {
                            assert_eq!(cache.len(), len_before - 1);
                            assert!(!cache.entry(id).is_some_and(|e| e.is_linked()));
                        }
                        Err(CacheError::Null | CacheError::NotFound) => {
                            let after: Vec<i16> = cache.iter().map(|(k, _)| k).collect();
                            assert_eq!(after, before);
                        }
                        Err(other) => panic!("unexpected pop error: {other}"),
                    }
                }
            }
            3 => {
                // push
                if let Some(id) = pick(&handles) {
                    match cache.push(id) {
                        Ok(()) => {
                            assert_eq!(cache.len(), len_before + 1);
                            assert_eq!(cache.head(), Some(id));
                        }
                        Err(
                            CacheError::Null
                            | CacheError::Linked
                            | CacheError::Duplicate
                            | CacheError::Full,
                        ) => {
                            assert_eq!(cache.len(), len_before);
                        }
                        Err(other) => panic!("unexpected push error: {other}"),
                    }
                }
            }
            4 => {
                // release
                if let Some(id) = pick(&handles) {
                    let was_linked = cache.entry(id).map(|e| e.is_linked());
                    let result = cache.release(id);
                    match was_linked {
                        None => assert_eq!(result, Err(CacheError::Null)),
                        Some(true) => assert_eq!(result, Err(CacheError::Linked)),
                        Some(false) => assert!(result.is_ok()),
                    }
                }
            }
            5 => {
                // search
                let _ = cache.search(i16::from(arg as i8));
            }
            _ => unreachable!(),
        }

        cache.check_invariants().unwrap();
    }
});
