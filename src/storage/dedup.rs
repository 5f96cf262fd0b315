// src/storage/dedup.rs
// =============================================================================
// DedupSet: an exact-membership set that lives on disk.
//
// How it works:
// 1. The keyspace is split into 512 buckets, one file each
// 2. A key's bucket is fnv1a_32(key) % 512, so every operation on a key
//    touches exactly one file
// 3. has() reads that bucket and scans it line by line
// 4. add() appends one record to that bucket if has() said no
//
// The cost of has() grows with bucket occupancy, not with the whole set.
// length and byte usage are tracked in memory as keys go in; nothing is
// ever removed, so membership only grows.
// =============================================================================

use super::{append_record, create_empty, encode_record, fnv1a_32, read_all};
use crate::error::Result;
use std::path::{Path, PathBuf};

/// Number of bucket files per set.
pub const BUCKET_COUNT: usize = 512;

/// One bucket file of a DedupSet.
#[derive(Debug)]
struct Bucket {
    path: PathBuf,
}

impl Bucket {
    fn create(root: &Path, set_name: &str, id: usize) -> Result<Self> {
        let path = root.join(format!("{}_bucket_{:x}", set_name, id));
        create_empty(&path)?;
        Ok(Bucket { path })
    }

    fn contains(&self, key: &str) -> Result<bool> {
        let encoded = encode_record(key);
        let contents = read_all(&self.path)?;

        // split_terminator: a file ending in '\n' has no phantom empty record
        Ok(contents.split_terminator('\n').any(|record| record == encoded))
    }

    fn push(&self, key: &str) -> Result<()> {
        append_record(&self.path, key)
    }
}

/// A disk-bucketed set of strings.
#[derive(Debug)]
pub struct DedupSet {
    name: String,
    buckets: Vec<Bucket>,
    len: usize,
    byte_usage: u64,
}

impl DedupSet {
    /// Creates all bucket files for `name` under `root`.
    ///
    /// Usually called through [`super::StorageManager::dedup_set`], which
    /// checks the root was initialized first.
    pub fn create(root: &Path, name: &str) -> Result<Self> {
        let buckets = (0..BUCKET_COUNT)
            .map(|id| Bucket::create(root, name, id))
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(set = name, buckets = BUCKET_COUNT, "created dedup set");

        Ok(DedupSet {
            name: name.to_string(),
            buckets,
            len: 0,
            byte_usage: 0,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of distinct keys inserted.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Total UTF-8 bytes of all inserted keys.
    pub fn byte_usage(&self) -> u64 {
        self.byte_usage
    }

    pub fn has(&self, key: &str) -> Result<bool> {
        self.bucket_for(key).contains(key)
    }

    /// Inserts `key` if absent. Returns true only when it was newly added.
    pub fn add(&mut self, key: &str) -> Result<bool> {
        let bucket = self.bucket_for(key);
        if bucket.contains(key)? {
            return Ok(false);
        }

        bucket.push(key)?;
        self.len += 1;
        self.byte_usage += key.len() as u64;
        Ok(true)
    }

    fn bucket_for(&self, key: &str) -> &Bucket {
        &self.buckets[bucket_index(key)]
    }
}

fn bucket_index(key: &str) -> usize {
    fnv1a_32(key) as usize % BUCKET_COUNT
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn new_set(dir: &TempDir) -> DedupSet {
        DedupSet::create(dir.path(), "test").unwrap()
    }

    #[test]
    fn test_creates_one_file_per_bucket() {
        let dir = TempDir::new().unwrap();
        let _set = new_set(&dir);

        let files = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(files, BUCKET_COUNT);
        assert!(dir.path().join("test_bucket_0").exists());
        assert!(dir.path().join("test_bucket_1ff").exists());
    }

    #[test]
    fn test_add_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let mut set = new_set(&dir);

        assert!(!set.has("https://a.com/").unwrap());
        assert!(set.add("https://a.com/").unwrap());
        assert!(set.has("https://a.com/").unwrap());

        assert!(!set.add("https://a.com/").unwrap());
        assert_eq!(set.len(), 1);
        assert_eq!(set.byte_usage(), "https://a.com/".len() as u64);
    }

    #[test]
    fn test_many_keys_stay_distinct() {
        let dir = TempDir::new().unwrap();
        let mut set = new_set(&dir);

        for i in 0..2000 {
            assert!(set.add(&format!("key-{}", i)).unwrap());
        }
        assert_eq!(set.len(), 2000);

        for i in 0..2000 {
            assert!(set.has(&format!("key-{}", i)).unwrap());
        }
        assert!(!set.has("key-2000").unwrap());
    }

    #[test]
    fn test_key_with_newline() {
        let dir = TempDir::new().unwrap();
        let mut set = new_set(&dir);

        let key = "first\nsecond";
        assert!(set.add(key).unwrap());
        assert!(set.has(key).unwrap());
        // The halves are not members on their own
        assert!(!set.has("first").unwrap());
        assert!(!set.has("second").unwrap());
    }

    #[test]
    fn test_empty_key() {
        let dir = TempDir::new().unwrap();
        let mut set = new_set(&dir);

        assert!(!set.has("").unwrap());
        assert!(set.add("").unwrap());
        assert!(set.has("").unwrap());
        assert!(!set.add("").unwrap());
        assert_eq!(set.byte_usage(), 0);
    }

    #[test]
    fn test_byte_usage_counts_utf8_bytes() {
        let dir = TempDir::new().unwrap();
        let mut set = new_set(&dir);

        set.add("ñ").unwrap();
        set.add("ab").unwrap();
        assert_eq!(set.byte_usage(), 4);
    }

    #[test]
    fn test_missing_bucket_file_is_storage_error() {
        let dir = TempDir::new().unwrap();
        let set = new_set(&dir);

        let victim = dir.path().join(format!("test_bucket_{:x}", bucket_index("gone")));
        fs::remove_file(victim).unwrap();

        assert!(matches!(
            set.has("gone"),
            Err(crate::error::CrawlError::Storage { .. })
        ));
    }

    #[test]
    fn test_final_record_without_newline_is_found() {
        let dir = TempDir::new().unwrap();
        let mut set = new_set(&dir);

        set.add("https://ex.com/a").unwrap();
        let id = bucket_index("https://ex.com/b");
        let bucket = dir.path().join(format!("test_bucket_{:x}", id));
        // Simulate an append cut short before its newline
        let mut contents = fs::read_to_string(&bucket).unwrap();
        contents.push_str("https://ex.com/b");
        fs::write(&bucket, contents).unwrap();

        assert!(set.has("https://ex.com/b").unwrap());
        assert!(set.has("https://ex.com/a").unwrap());
        assert!(!set.has("https://ex.com/").unwrap());
    }
}
