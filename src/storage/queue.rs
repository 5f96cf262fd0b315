// src/storage/queue.rs
// =============================================================================
// FrontierQueue: a FIFO queue whose contents live in chunk files.
//
// Layout:
//   chunks[0]      head, records are dequeued from the front of this file
//   chunks[last]   tail, records are appended to this file
//
// Rules:
// - A chunk holds at most 1024 records; a full tail gets a fresh chunk
// - Dequeue rewrites the rest of the head chunk, so its cost is bounded by
//   the chunk size, not by the queue length
// - A drained head chunk's file is deleted right away
// - There is always one tail chunk to append to, even when empty
// =============================================================================

use super::{append_record, create_empty, decode_record, encode_record, read_all};
use crate::error::{CrawlError, Result};
use std::collections::VecDeque;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Maximum records per chunk file.
pub const CHUNK_CAPACITY: usize = 1024;

#[derive(Debug)]
struct Chunk {
    path: PathBuf,
    len: usize,
}

impl Chunk {
    fn create(root: &Path, queue_name: &str, id: u64) -> Result<Self> {
        let path = root.join(format!("{}_chunk_{:x}", queue_name, id));
        create_empty(&path)?;
        Ok(Chunk { path, len: 0 })
    }

    fn is_full(&self) -> bool {
        self.len >= CHUNK_CAPACITY
    }

    // Returns the record's stored size in bytes
    fn push(&mut self, value: &str) -> Result<u64> {
        append_record(&self.path, value)?;
        self.len += 1;
        Ok(encode_record(value).len() as u64)
    }

    // Returns the decoded record and its stored size in bytes
    fn pop_front(&mut self) -> Result<(String, u64)> {
        let contents = read_all(&self.path)?;
        if contents.is_empty() {
            return Err(CrawlError::storage(
                &self.path,
                io::Error::new(io::ErrorKind::UnexpectedEof, "chunk file is empty"),
            ));
        }

        // A final record without its newline is returned as-is
        let (first, rest) = contents.split_once('\n').unwrap_or((contents.as_str(), ""));

        fs::write(&self.path, rest).map_err(|e| CrawlError::storage(&self.path, e))?;
        self.len -= 1;
        Ok((decode_record(first), first.len() as u64))
    }

    fn delete(self) -> Result<()> {
        fs::remove_file(&self.path).map_err(|e| CrawlError::storage(&self.path, e))
    }
}

/// A disk-chunked FIFO queue of strings.
#[derive(Debug)]
pub struct FrontierQueue {
    name: String,
    root: PathBuf,
    chunks: VecDeque<Chunk>,
    next_chunk_id: u64,
    len: usize,
    byte_usage: u64,
}

impl FrontierQueue {
    /// Creates an empty queue with one tail chunk under `root`.
    pub fn create(root: &Path, name: &str) -> Result<Self> {
        let mut queue = FrontierQueue {
            name: name.to_string(),
            root: root.to_path_buf(),
            chunks: VecDeque::new(),
            next_chunk_id: 0,
            len: 0,
            byte_usage: 0,
        };
        queue.push_chunk()?;
        Ok(queue)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bytes of all queued records as stored on disk.
    ///
    /// A record with an embedded newline is stored one byte longer per
    /// newline. Enqueue and dequeue both count the stored form, so the
    /// counter returns to zero once the queue drains.
    pub fn byte_usage(&self) -> u64 {
        self.byte_usage
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn enqueue(&mut self, value: &str) -> Result<()> {
        let needs_chunk = self.chunks.back().map_or(true, Chunk::is_full);
        let tail = if needs_chunk {
            self.push_chunk()?
        } else {
            self.tail_mut()?
        };
        let stored = tail.push(value)?;

        self.len += 1;
        self.byte_usage += stored;
        Ok(())
    }

    /// Removes the oldest record. Returns `None` when the queue is empty.
    pub fn dequeue(&mut self) -> Result<Option<String>> {
        if self.len == 0 {
            return Ok(None);
        }

        let Some(head) = self.chunks.front_mut() else {
            return Ok(None);
        };
        let (value, stored) = head.pop_front()?;

        if head.len == 0 {
            if let Some(drained) = self.chunks.pop_front() {
                drained.delete()?;
            }
        }
        if self.chunks.is_empty() {
            self.push_chunk()?;
        }

        self.len -= 1;
        self.byte_usage -= stored;
        Ok(Some(value))
    }

    fn push_chunk(&mut self) -> Result<&mut Chunk> {
        let chunk = Chunk::create(&self.root, &self.name, self.next_chunk_id)?;
        self.next_chunk_id += 1;
        self.chunks.push_back(chunk);
        self.tail_mut()
    }

    fn tail_mut(&mut self) -> Result<&mut Chunk> {
        let root = &self.root;
        self.chunks.back_mut().ok_or_else(|| {
            CrawlError::storage(
                root,
                io::Error::new(io::ErrorKind::NotFound, "queue has no tail chunk"),
            )
        })
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why VecDeque for the chunks?
//    - Chunks leave from the front and arrive at the back
//    - pop_front() and push_back() are both O(1)
//    - Only the chunk metadata is in memory, never the records
//
// 2. Why not one big file?
//    - Dropping the first line of a file means rewriting the rest of it
//    - With chunks, that rewrite is at most 1023 records
//
// 3. Chunk ids keep counting up and are never reused, so a deleted chunk's
//    file name never comes back while the queue is alive.
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn new_queue(dir: &TempDir) -> FrontierQueue {
        FrontierQueue::create(dir.path(), "nodes").unwrap()
    }

    #[test]
    fn test_new_queue_has_a_tail_chunk() {
        let dir = TempDir::new().unwrap();
        let queue = new_queue(&dir);

        assert!(queue.is_empty());
        assert_eq!(queue.chunk_count(), 1);
        assert!(dir.path().join("nodes_chunk_0").exists());
    }

    #[test]
    fn test_fifo_order_with_interleaving() {
        let dir = TempDir::new().unwrap();
        let mut queue = new_queue(&dir);

        queue.enqueue("a").unwrap();
        queue.enqueue("b").unwrap();
        assert_eq!(queue.dequeue().unwrap().as_deref(), Some("a"));
        queue.enqueue("c").unwrap();
        assert_eq!(queue.dequeue().unwrap().as_deref(), Some("b"));
        assert_eq!(queue.dequeue().unwrap().as_deref(), Some("c"));
        assert_eq!(queue.dequeue().unwrap(), None);
        assert_eq!(queue.len(), 0);
    }

    #[test]
    fn test_spills_into_new_chunks() {
        let dir = TempDir::new().unwrap();
        let mut queue = new_queue(&dir);

        let total = CHUNK_CAPACITY * 2 + 10;
        for i in 0..total {
            queue.enqueue(&i.to_string()).unwrap();
        }
        assert_eq!(queue.len(), total);
        assert_eq!(queue.chunk_count(), 3);

        for i in 0..total {
            assert_eq!(queue.dequeue().unwrap(), Some(i.to_string()));
            assert_eq!(queue.len(), total - i - 1);
        }
    }

    #[test]
    fn test_drained_chunk_file_is_deleted() {
        let dir = TempDir::new().unwrap();
        let mut queue = new_queue(&dir);

        for i in 0..=CHUNK_CAPACITY {
            queue.enqueue(&i.to_string()).unwrap();
        }
        assert_eq!(queue.chunk_count(), 2);

        for _ in 0..CHUNK_CAPACITY {
            queue.dequeue().unwrap();
        }
        assert_eq!(queue.chunk_count(), 1);
        assert!(!dir.path().join("nodes_chunk_0").exists());
        assert!(dir.path().join("nodes_chunk_1").exists());
    }

    #[test]
    fn test_emptied_queue_gets_fresh_tail() {
        let dir = TempDir::new().unwrap();
        let mut queue = new_queue(&dir);

        queue.enqueue("only").unwrap();
        assert_eq!(queue.dequeue().unwrap().as_deref(), Some("only"));

        assert_eq!(queue.chunk_count(), 1);
        assert!(!dir.path().join("nodes_chunk_0").exists());
        assert!(dir.path().join("nodes_chunk_1").exists());

        queue.enqueue("again").unwrap();
        assert_eq!(queue.dequeue().unwrap().as_deref(), Some("again"));
    }

    #[test]
    fn test_byte_usage_tracks_records() {
        let dir = TempDir::new().unwrap();
        let mut queue = new_queue(&dir);

        queue.enqueue("abc").unwrap();
        queue.enqueue("ñ").unwrap();
        assert_eq!(queue.byte_usage(), 5);

        queue.dequeue().unwrap();
        assert_eq!(queue.byte_usage(), 2);
        queue.dequeue().unwrap();
        assert_eq!(queue.byte_usage(), 0);
    }

    #[test]
    fn test_newline_record_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut queue = new_queue(&dir);

        queue.enqueue("https://a.com/\nx").unwrap();
        queue.enqueue("next").unwrap();

        assert_eq!(queue.dequeue().unwrap().as_deref(), Some("https://a.com/\nx"));
        assert_eq!(queue.dequeue().unwrap().as_deref(), Some("next"));
    }

    #[test]
    fn test_byte_usage_drains_to_zero_with_escaped_text() {
        let dir = TempDir::new().unwrap();
        let mut queue = new_queue(&dir);

        // Literal backslash-n reads back as a real newline
        queue.enqueue(r"https://ex.com/p?q=a\nb").unwrap();
        queue.enqueue("https://ex.com/\n").unwrap();
        assert!(queue.byte_usage() > 0);

        assert_eq!(queue.dequeue().unwrap().as_deref(), Some("https://ex.com/p?q=a\nb"));
        queue.dequeue().unwrap();

        assert_eq!(queue.len(), 0);
        assert_eq!(queue.byte_usage(), 0);
    }

    #[test]
    fn test_final_record_without_newline_is_returned() {
        let dir = TempDir::new().unwrap();
        let mut queue = new_queue(&dir);

        queue.enqueue("first").unwrap();
        queue.enqueue("https://ex.com/last").unwrap();
        // Simulate an append cut short before its newline
        fs::write(dir.path().join("nodes_chunk_0"), "first\nhttps://ex.com/last").unwrap();

        assert_eq!(queue.dequeue().unwrap().as_deref(), Some("first"));
        assert_eq!(queue.dequeue().unwrap().as_deref(), Some("https://ex.com/last"));
        assert_eq!(queue.byte_usage(), 0);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_empty_record() {
        let dir = TempDir::new().unwrap();
        let mut queue = new_queue(&dir);

        queue.enqueue("").unwrap();
        queue.enqueue("x").unwrap();
        assert_eq!(queue.dequeue().unwrap().as_deref(), Some(""));
        assert_eq!(queue.dequeue().unwrap().as_deref(), Some("x"));
    }
}
