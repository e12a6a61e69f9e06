// tests/file_store_cache.rs
//
// ScoreCache over the JSON file store: records survive a "restart" (new cache
// instance over the same directory) and damaged files are recomputed.

use std::fs;

use site_readiness::{CacheOutcome, JsonFileStore, NoteBook, ScoreCache, ScoreStore, CURRENT_VERSION};

#[test]
fn cached_score_survives_new_cache_instance() {
    let tmp = tempfile::tempdir().unwrap();
    let book = NoteBook::new();
    book.add(21, Some("kim"), Some("Substation across the road; HVAC chillers on roof"));

    {
        let cache = ScoreCache::new(JsonFileStore::open(tmp.path()).unwrap());
        let texts = vec![Some("Substation across the road; HVAC chillers on roof".to_string())];
        let (r, o) = cache.get_or_compute_traced(21, &texts).unwrap();
        assert_eq!(o, CacheOutcome::Miss);
        assert_eq!(r.score, 18 + 22);
    }

    let cache = ScoreCache::new(JsonFileStore::open(tmp.path()).unwrap());
    let r = cache.get_or_compute_building_score(&book, 21).unwrap();
    assert_eq!(r.score, 40);
    let rec = cache.store().find(21, CURRENT_VERSION).unwrap().unwrap();
    assert_eq!(rec.entity_id, 21);
    assert_eq!(rec.version, CURRENT_VERSION);
    assert_eq!(rec.input_fingerprint.len(), 64);
}

#[test]
fn damaged_record_file_is_recomputed_and_replaced() {
    let tmp = tempfile::tempdir().unwrap();
    let cache = ScoreCache::new(JsonFileStore::open(tmp.path()).unwrap());
    let texts = vec![Some("container yard".to_string())];
    cache.get_or_compute(3, &texts).unwrap();

    let path = tmp.path().join(format!("3__{CURRENT_VERSION}.json"));
    assert!(path.exists());
    fs::write(&path, b"\x00\x01 not json").unwrap();

    let (r, o) = cache.get_or_compute_traced(3, &texts).unwrap();
    assert_eq!(o, CacheOutcome::Miss);
    assert_eq!(r.score, 12 + 18);

    let (_, o) = cache.get_or_compute_traced(3, &texts).unwrap();
    assert_eq!(o, CacheOutcome::Hit);
}

#[test]
fn version_bump_orphans_old_files() {
    let tmp = tempfile::tempdir().unwrap();
    let texts = vec![Some("parking".to_string())];

    let v1 = ScoreCache::new(JsonFileStore::open(tmp.path()).unwrap());
    v1.get_or_compute(1, &texts).unwrap();
    let v2 = ScoreCache::new(JsonFileStore::open(tmp.path()).unwrap()).with_version("v2");
    let (_, o) = v2.get_or_compute_traced(1, &texts).unwrap();
    assert_eq!(o, CacheOutcome::Miss);

    // both files present; nothing is deleted on a bump
    assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 2);
    assert_eq!(v2.store().remove_entity(1).unwrap(), 2);
}
