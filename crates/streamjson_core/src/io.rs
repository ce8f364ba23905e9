//! `std::io` adapters so a buffer can be handed to readers and writers.
//!
//! Writes keep their insert semantics: `io::Write` never overwrites.

use crate::buffer::StreamJson;
use crate::error::BufferError;
use crate::stream::Whence;
use std::io::{self, SeekFrom};

impl io::Read for StreamJson {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let bytes = StreamJson::read(self, buf.len())?;
        buf[..bytes.len()].copy_from_slice(&bytes);
        Ok(bytes.len())
    }
}

impl io::Write for StreamJson {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(StreamJson::write(self, buf)?)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.store_mut()?.flush().map_err(BufferError::from)?;
        Ok(())
    }
}

impl io::Seek for StreamJson {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let (offset, whence) = match pos {
            SeekFrom::Start(offset) => {
                let offset = i64::try_from(offset).map_err(|_| {
                    io::Error::new(io::ErrorKind::InvalidInput, "seek offset too large")
                })?;
                (offset, Whence::Start)
            }
            SeekFrom::Current(offset) => (offset, Whence::Current),
            SeekFrom::End(offset) => (offset, Whence::End),
        };
        Ok(StreamJson::seek(self, offset, whence)?)
    }
}

#[cfg(test)]
mod tests {
    use crate::StreamJson;
    use std::io::{self, Read, Seek, SeekFrom, Write};

    #[test]
    fn read_to_string_from_cursor() {
        let mut buffer = StreamJson::new();
        buffer.set("foo", "bar").unwrap();
        buffer.rewind().unwrap();

        let mut text = String::new();
        buffer.read_to_string(&mut text).unwrap();
        assert_eq!(text, r#"{"foo":"bar"}"#);
        assert!(buffer.eof());
    }

    #[test]
    fn write_all_inserts() {
        let mut buffer = StreamJson::new();
        io::Seek::seek(&mut buffer, SeekFrom::Start(1)).unwrap();
        buffer.write_all(br#""k":1"#).unwrap();
        io::Write::flush(&mut buffer).unwrap();

        assert_eq!(buffer.contents(), r#"{"k":1}"#);
    }

    #[test]
    fn seek_from_variants() {
        let mut buffer = StreamJson::new();
        buffer.set("a", &1).unwrap();

        assert_eq!(io::Seek::seek(&mut buffer, SeekFrom::End(-1)).unwrap(), 6);
        assert_eq!(io::Seek::seek(&mut buffer, SeekFrom::Current(-2)).unwrap(), 4);
        assert_eq!(io::Seek::seek(&mut buffer, SeekFrom::Start(0)).unwrap(), 0);
        assert_eq!(buffer.stream_position().unwrap(), 0);

        let err = io::Seek::seek(&mut buffer, SeekFrom::End(1)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn copy_into_writer() {
        let mut buffer = StreamJson::new();
        buffer.set("list", &[1, 2, 3]).unwrap();
        buffer.rewind().unwrap();

        let mut out = Vec::new();
        io::copy(&mut buffer, &mut out).unwrap();
        assert_eq!(out, br#"{"list":[1,2,3]}"#);
    }

    #[test]
    fn detached_buffer_reports_not_connected() {
        let mut buffer = StreamJson::new();
        buffer.detach();

        let mut buf = [0u8; 4];
        let err = io::Read::read(&mut buffer, &mut buf).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotConnected);
        let err = buffer.write_all(b"x").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotConnected);
    }
}
