//! Concurrent writers sharing one `RotatingFileWriter`.

use rollsink::naming::{file_index, indexed_files};
use rollsink::RotatingFileWriter;
use std::fs;
use std::io::Write;
use std::sync::Arc;
use std::thread;
use tempfile::tempdir;

const THREADS: usize = 8;
const RECORDS: usize = 200;
/// `t{thread:02}-{seq:05}\n`
const RECORD_LEN: usize = 10;

fn record(thread: usize, seq: usize) -> String {
    format!("t{thread:02}-{seq:05}\n")
}

#[test]
fn concurrent_writes_rotate_cleanly() {
    let dir = tempdir().unwrap();
    let template = dir.path().join("stream.log");
    let limit = (RECORD_LEN * 10) as u64;
    let writer = Arc::new(RotatingFileWriter::with_template(&template, limit));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let writer = Arc::clone(&writer);
            thread::spawn(move || {
                for seq in 0..RECORDS {
                    writer.write_all_bytes(record(t, seq).as_bytes()).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let files = indexed_files(&template).unwrap();
    let expected_files = THREADS * RECORDS * RECORD_LEN / limit as usize;
    assert_eq!(files.len(), expected_files);

    let mut last_seq = vec![None::<usize>; THREADS];
    for (i, path) in files.iter().enumerate() {
        assert_eq!(file_index(path.to_str().unwrap()), Some(i as u64));

        let contents = fs::read_to_string(path).unwrap();
        assert_eq!(contents.len() as u64, limit);

        for line in contents.lines() {
            let (thread, seq) = line[1..].split_once('-').unwrap();
            let thread: usize = thread.parse().unwrap();
            let seq: usize = seq.parse().unwrap();
            assert!(last_seq[thread].map_or(true, |prev| seq > prev));
            last_seq[thread] = Some(seq);
        }
    }
    assert!(last_seq.iter().all(|s| *s == Some(RECORDS - 1)));
}

#[test]
fn concurrent_io_write_through_shared_reference() {
    let dir = tempdir().unwrap();
    let template = dir.path().join("shared.log");
    let writer = Arc::new(RotatingFileWriter::with_template(&template, 0));

    thread::scope(|scope| {
        for t in 0..THREADS {
            let writer = Arc::clone(&writer);
            scope.spawn(move || {
                let mut sink = &*writer;
                for seq in 0..RECORDS {
                    sink.write_all(record(t, seq).as_bytes()).unwrap();
                }
                sink.flush().unwrap();
            });
        }
    });

    let files = indexed_files(&template).unwrap();
    assert_eq!(files.len(), 1);
    let contents = fs::read_to_string(&files[0]).unwrap();
    assert_eq!(contents.len(), THREADS * RECORDS * RECORD_LEN);
    assert_eq!(writer.current_file_size(), contents.len() as u64);
}
