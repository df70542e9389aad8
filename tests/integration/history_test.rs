use sysglance::core::system_monitor::{HistoryBuffer, HistoryStore, RESOURCE_HISTORY_CAPACITY};

#[test]
fn test_oldest_sample_evicted() {
    let mut history = HistoryBuffer::with_capacity(RESOURCE_HISTORY_CAPACITY);
    for i in 0..=RESOURCE_HISTORY_CAPACITY {
        history.push(i as f64);
    }

    assert_eq!(history.len(), RESOURCE_HISTORY_CAPACITY);
    assert_eq!(history.first(), Some(&1.0));
    assert_eq!(history.latest(), Some(&(RESOURCE_HISTORY_CAPACITY as f64)));

    let snapshot = history.snapshot();
    assert!(snapshot.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_store_keys_are_independent() {
    let mut store = HistoryStore::with_capacity(3);
    for i in 0..5 {
        store.push("eth0", i);
    }
    store.push("wlan0", 42);

    assert_eq!(store.snapshot("eth0"), vec![2, 3, 4]);
    assert_eq!(store.snapshot("wlan0"), vec![42]);
    assert!(store.snapshot("lo").is_empty());

    let mut keys = store.keys();
    keys.sort();
    assert_eq!(keys, vec!["eth0".to_string(), "wlan0".to_string()]);
}
