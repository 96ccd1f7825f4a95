//! Newline-delimited record framing over a byte stream.
//!
//! One record is one UTF-8 line. Multi-line payloads (transcripts, help
//! text) are flattened into a single record by joining their segments with
//! [`SEGMENT_DELIMITER`], which must stay distinct from the record
//! delimiter. Content that itself contains the segment delimiter corrupts
//! the segment structure; there is no escaping.

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

/// Record delimiter on the wire.
pub const RECORD_DELIMITER: u8 = b'\n';

/// Separator used to flatten multi-segment replies into one record.
pub const SEGMENT_DELIMITER: &str = " | ";

/// Join reply segments into a single record.
pub fn join_segments<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join(SEGMENT_DELIMITER)
}

/// Buffered reader yielding one complete record at a time.
pub struct RecordReader<R> {
    inner: BufReader<R>,
}

impl<R: AsyncRead + Unpin> RecordReader<R> {
    pub fn new(stream: R) -> Self {
        Self {
            inner: BufReader::new(stream),
        }
    }

    /// Read the next record, without its delimiter.
    ///
    /// Returns `None` on end of stream, on a read error, or when the stream
    /// closes mid-record -- a partial trailing record is never returned.
    /// A trailing `\r` (telnet-style clients) is stripped.
    pub async fn read_record(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.inner.read_line(&mut line).await {
            Ok(0) => None,
            Ok(_) if line.ends_with('\n') => {
                line.pop();
                if line.ends_with('\r') {
                    line.pop();
                }
                Some(line)
            }
            // Bytes without a trailing delimiter: the peer closed mid-record.
            Ok(_) => None,
            Err(err) => {
                tracing::debug!(%err, "record read failed");
                None
            }
        }
    }
}

/// Writer emitting one delimiter-terminated record per call.
///
/// A connection's `RecordWriter` is owned by exactly one writer task (see
/// `session::write_loop`), which serializes records from the session's own
/// replies and from forwarding sessions so they never interleave mid-record.
pub struct RecordWriter<W> {
    inner: W,
}

impl<W: AsyncWrite + Unpin> RecordWriter<W> {
    pub fn new(stream: W) -> Self {
        Self { inner: stream }
    }

    /// Write `record` followed by the delimiter and flush.
    pub async fn write_record(&mut self, record: &str) -> std::io::Result<()> {
        self.inner.write_all(record.as_bytes()).await?;
        self.inner.write_all(&[RECORD_DELIMITER]).await?;
        self.inner.flush().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn read_returns_records_without_delimiter() {
        let mut reader = RecordReader::new(&b"alice\nbob: hi\n"[..]);
        assert_eq!(reader.read_record().await.as_deref(), Some("alice"));
        assert_eq!(reader.read_record().await.as_deref(), Some("bob: hi"));
        assert_eq!(reader.read_record().await, None);
    }

    #[tokio::test]
    async fn read_strips_carriage_return() {
        let mut reader = RecordReader::new(&b"alice\r\n"[..]);
        assert_eq!(reader.read_record().await.as_deref(), Some("alice"));
    }

    #[tokio::test]
    async fn partial_trailing_record_is_end_of_stream() {
        let mut reader = RecordReader::new(&b"complete\npartial"[..]);
        assert_eq!(reader.read_record().await.as_deref(), Some("complete"));
        assert_eq!(reader.read_record().await, None);
    }

    #[tokio::test]
    async fn empty_record_is_distinct_from_eof() {
        let mut reader = RecordReader::new(&b"\n"[..]);
        assert_eq!(reader.read_record().await.as_deref(), Some(""));
        assert_eq!(reader.read_record().await, None);
    }

    #[tokio::test]
    async fn write_appends_delimiter() {
        let mut buf = Vec::new();
        {
            let mut writer = RecordWriter::new(&mut buf);
            writer.write_record("hello").await.unwrap();
            writer.write_record("world").await.unwrap();
        }
        assert_eq!(buf, b"hello\nworld\n");
    }

    #[test]
    fn join_segments_uses_segment_delimiter() {
        let joined = join_segments(&["a", "b", "c"]);
        assert_eq!(joined, "a | b | c");
        assert!(!joined.contains('\n'));
    }
}
