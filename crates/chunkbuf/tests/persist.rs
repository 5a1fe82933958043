//! Persisting buffers to files and restoring them, the way a producer and a
//! consumer on different sides of a file would.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Seek, SeekFrom, Write},
};

use chunkbuf::{ChunkedBuffer, Error, KiB, Options, Result, SIZE_OF_HEADER_V1};
use tempfile::TempDir;

fn payload(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

#[test]
fn test_file_round_trip() -> Result<()> {
    let temp = TempDir::new()?;
    let path = temp.path().join("buffer");

    let data = payload(10 * KiB + 123);
    let options = Options::new(KiB, 16 * KiB);

    let mut producer = ChunkedBuffer::with_options(options)?;
    producer.append_slice(&data)?;
    assert_eq!(producer.chunk_count(), 11);

    let mut writer = BufWriter::new(File::create(&path)?);
    producer.serialize(&mut writer)?;
    writer.flush()?;
    drop(writer);

    assert_eq!(
        std::fs::metadata(&path)?.len(),
        (SIZE_OF_HEADER_V1 + data.len()) as u64
    );

    let mut consumer = ChunkedBuffer::with_options(options)?;
    consumer.deserialize(&mut BufReader::new(File::open(&path)?))?;

    assert_eq!(consumer.len(), data.len() as u64);
    let mut restored = Vec::new();
    consumer.open_read_view().read_to_end(&mut restored)?;
    assert_eq!(restored, data);

    Ok(())
}

#[test]
fn test_consecutive_buffers_in_one_stream() -> Result<()> {
    let temp = TempDir::new()?;
    let mut file = tempfile::tempfile_in(temp.path())?;

    let mut buffer = ChunkedBuffer::new(64, 1024)?;
    buffer.append_slice(b"first")?;
    buffer.serialize(&mut file)?;

    buffer.reset();
    buffer.append_slice(&payload(300))?;
    buffer.serialize(&mut file)?;

    file.seek(SeekFrom::Start(0))?;
    let mut reader = BufReader::new(file);

    // One buffer reused for both records
    let mut restored = ChunkedBuffer::new(64, 1024)?;
    restored.deserialize(&mut reader)?;
    assert_eq!(restored.open_read_view().collect::<Vec<_>>(), b"first");

    restored.deserialize(&mut reader)?;
    assert_eq!(restored.open_read_view().collect::<Vec<_>>(), payload(300));

    // Stream is exhausted
    let mut rest = Vec::new();
    reader.read_to_end(&mut rest)?;
    assert!(rest.is_empty());

    Ok(())
}

#[test]
fn test_truncated_file() -> Result<()> {
    let temp = TempDir::new()?;
    let path = temp.path().join("buffer");

    let mut buffer = ChunkedBuffer::new(100, 1000)?;
    buffer.append_slice(&payload(700))?;
    let mut bytes = buffer.serialize_to_vec()?;
    bytes.truncate(SIZE_OF_HEADER_V1 + 650);
    std::fs::write(&path, &bytes)?;

    let mut restored = ChunkedBuffer::new(100, 1000)?;
    let result = restored.deserialize(&mut File::open(&path)?);
    assert!(matches!(
        result,
        Err(Error::TruncatedInput {
            expected: 700,
            missing: 50
        })
    ));

    // Reset brings it back to a usable state
    restored.reset();
    restored.append_slice(b"ok")?;
    assert_eq!(restored.open_read_view().collect::<Vec<_>>(), b"ok");

    Ok(())
}

#[test]
fn test_copy_view_into_sink() -> Result<()> {
    let mut source = ChunkedBuffer::new(16, 256)?;
    source.append_slice(&payload(200))?;

    // A view is a reader, a buffer is a writer
    let mut sink = ChunkedBuffer::new(50, 256)?;
    let copied = std::io::copy(&mut source.open_read_view(), &mut sink)?;

    assert_eq!(copied, 200);
    assert_eq!(sink.len(), 200);
    assert_eq!(
        sink.serialize_to_vec()?[SIZE_OF_HEADER_V1..],
        source.serialize_to_vec()?[SIZE_OF_HEADER_V1..]
    );

    Ok(())
}
