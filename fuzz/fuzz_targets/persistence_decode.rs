#![no_main]

use libfuzzer_sys::fuzz_target;
use recency_cache::persist::PersistenceCodec;
use recency_cache::OrderedCacheIndex;

// Fuzz decoding of untrusted cache files
//
// Any input must either fail with an encoding error or produce a cache whose
// structure is sound and whose order survives a second round trip.
fuzz_target!(|data: &[u8]| {
    let codec = PersistenceCodec::new();
    let cache: OrderedCacheIndex<i64> = match codec.decode(data) {
        Ok(cache) => cache,
        Err(err) => {
            assert!(err.is_encoding());
            return;
        }
    };

    assert!(cache.check_invariants().is_ok());

    let bytes = codec.encode(&cache).expect("re-encoding a decoded cache");
    let again: OrderedCacheIndex<i64> = codec.decode(&bytes).expect("decoding own output");
    assert_eq!(again.all_keys(), cache.all_keys());
    assert_eq!(again.all_values(), cache.all_values());
});
