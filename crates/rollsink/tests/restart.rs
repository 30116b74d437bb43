//! Restart behaviour: a new writer continues the on-disk sequence.

use rollsink::naming::{file_index, indexed_files};
use rollsink::{RotatingFileWriter, WriterConfig};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn indices(template: &Path) -> Vec<u64> {
    indexed_files(template)
        .unwrap()
        .iter()
        .filter_map(|p| file_index(p.to_str().unwrap()))
        .collect()
}

#[test]
fn restarted_writer_never_overwrites() {
    let dir = tempdir().unwrap();
    let template = dir.path().join("capture.pcap");

    {
        let writer = RotatingFileWriter::new(WriterConfig::new(&template).size_limit(4));
        for chunk in [b"aaaa", b"bbbb", b"cccc"] {
            writer.write_all_bytes(chunk).unwrap();
        }
    }
    assert_eq!(indices(&template), [0, 1, 2]);

    {
        let writer = RotatingFileWriter::new(WriterConfig::new(&template).size_limit(4));
        writer.write_all_bytes(b"dddd").unwrap();
        assert_eq!(writer.current_name(), Some(dir.path().join("capture_3.pcap")));
    }

    assert_eq!(indices(&template), [0, 1, 2, 3]);
    assert_eq!(fs::read(dir.path().join("capture_0.pcap")).unwrap(), b"aaaa");
    assert_eq!(fs::read(dir.path().join("capture_2.pcap")).unwrap(), b"cccc");
    assert_eq!(fs::read(dir.path().join("capture_3.pcap")).unwrap(), b"dddd");
}

#[test]
fn unbounded_restart_skips_gaps() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("base_0.ext"), b"zero").unwrap();
    fs::write(dir.path().join("base_3.ext"), b"three").unwrap();

    let writer = RotatingFileWriter::with_template(dir.path().join("base.ext"), 0);
    assert_eq!(writer.next_name(), dir.path().join("base_4.ext"));

    writer.write_all_bytes(b"four").unwrap();
    writer.write_all_bytes(b"!").unwrap();
    assert_eq!(fs::read(dir.path().join("base_4.ext")).unwrap(), b"four!");
    assert_eq!(indices(&dir.path().join("base.ext")), [0, 3, 4]);
}

#[test]
fn each_writer_opens_a_fresh_file() {
    let dir = tempdir().unwrap();
    let template = dir.path().join("out.log");

    for expected in 0..3u64 {
        let writer = RotatingFileWriter::with_template(&template, 0);
        writer.write_all_bytes(b"x").unwrap();
        let name = writer.current_name().unwrap();
        assert_eq!(file_index(name.to_str().unwrap()), Some(expected));
    }
}

#[test]
fn rotation_bumps_index_by_exactly_one() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("out_41.log"), b"").unwrap();

    let writer = RotatingFileWriter::with_template(dir.path().join("out.log"), 3);
    let mut seen = Vec::new();
    for _ in 0..5 {
        writer.write_all_bytes(b"abc").unwrap();
        seen.push(file_index(writer.current_name().unwrap().to_str().unwrap()).unwrap());
    }

    assert_eq!(seen, [42, 43, 44, 45, 46]);
}

#[test]
fn files_exceed_limit_by_at_most_one_write() {
    let dir = tempdir().unwrap();
    let template = dir.path().join("out.log");
    let limit = 10u64;
    let sizes = [3usize, 7, 1, 9, 4, 4, 4, 12, 2, 5, 6, 1];

    let writer = RotatingFileWriter::with_template(&template, limit);
    for (i, size) in sizes.iter().enumerate() {
        writer.write_all_bytes(&vec![i as u8; *size]).unwrap();
    }

    let largest = *sizes.iter().max().unwrap() as u64;
    let mut total = 0;
    for path in indexed_files(&template).unwrap() {
        let len = fs::metadata(&path).unwrap().len();
        assert!(len < limit + largest, "{} holds {len} bytes", path.display());
        total += len;
    }
    assert_eq!(total, sizes.iter().sum::<usize>() as u64);
}
