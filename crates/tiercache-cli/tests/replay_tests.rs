//! End-to-end tests: configuration file plus command script

use std::io::Write;
use tiercache::TieredCacheConfig;
use tiercache_cli::{StringCache, replay};

fn cache_from_toml(toml: &str) -> StringCache {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(toml.as_bytes()).unwrap();

    let config = TieredCacheConfig::load(file.path()).unwrap();
    StringCache::from_config(&config).unwrap()
}

#[test]
fn test_script_promotes_through_levels() {
    let cache = cache_from_toml(
        r#"
        [[levels]]
        capacity = 1
        policy = "lru"

        [[levels]]
        capacity = 4
        policy = "lfu"
        "#,
    );
    // Seed the deep level directly; scripts can only write level 0
    cache.level(1).unwrap().put("k".into(), "deep".into());

    let script = "get k\nshow\n";
    let mut out = Vec::new();
    replay(&cache, script.as_bytes(), &mut out).unwrap();

    let output = String::from_utf8(out).unwrap();
    assert_eq!(
        output,
        "deep\n\
         Cache Level 1 (recency, 1/1): [\"k\": \"deep\"]\n\
         Cache Level 2 (frequency, 1/4): [\"k\": \"deep\"]\n"
    );
}

#[test]
fn test_script_manages_levels() {
    let cache = cache_from_toml("");
    let script = "\
        add-level 2 recency\n\
        put a 1\n\
        add-level 2 frequency\n\
        remove-level 0\n\
        get a\n\
        put b 2\n\
        get b\n";
    let mut out = Vec::new();

    let executed = replay(&cache, script.as_bytes(), &mut out).unwrap();
    assert_eq!(executed, 7);
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "added level 0\nadded level 1\n(absent)\n2\n"
    );
    assert_eq!(cache.level_count(), 1);
}

#[test]
fn test_script_put_without_levels_is_ignored() {
    let cache = cache_from_toml("");
    let mut out = Vec::new();

    replay(&cache, "put a 1\nget a\n".as_bytes(), &mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "(absent)\n");
}
