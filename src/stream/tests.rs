//! Tests for the buffered stream layer.

#[cfg(test)]
mod stream_tests {
    use std::collections::VecDeque;
    use std::io;
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

    use crate::stream::{copy_exact, write_full, BufferedReader, Error};

    enum Step {
        Data(Vec<u8>),
        Interrupt,
        Fail,
    }

    // Reader that replays a fixed script of chunks and errors
    struct ScriptedReader {
        steps: VecDeque<Step>,
    }

    impl ScriptedReader {
        fn new(steps: Vec<Step>) -> Self {
            Self {
                steps: steps.into(),
            }
        }
    }

    impl AsyncRead for ScriptedReader {
        fn poll_read(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            let this = self.get_mut();
            match this.steps.pop_front() {
                None => Poll::Ready(Ok(())),
                Some(Step::Interrupt) => {
                    Poll::Ready(Err(io::Error::new(io::ErrorKind::Interrupted, "signal")))
                }
                Some(Step::Fail) => {
                    Poll::Ready(Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset")))
                }
                Some(Step::Data(mut data)) => {
                    let n = data.len().min(buf.remaining());
                    buf.put_slice(&data[..n]);
                    if n < data.len() {
                        this.steps.push_front(Step::Data(data.split_off(n)));
                    }
                    Poll::Ready(Ok(()))
                }
            }
        }
    }

    // Writer that accepts at most `per_call` bytes per write and `limit` in total
    struct ChokingWriter {
        written: Vec<u8>,
        per_call: usize,
        limit: usize,
        interrupt_first: bool,
    }

    impl ChokingWriter {
        fn new(per_call: usize, limit: usize) -> Self {
            Self {
                written: Vec::new(),
                per_call,
                limit,
                interrupt_first: false,
            }
        }
    }

    impl AsyncWrite for ChokingWriter {
        fn poll_write(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &[u8],
        ) -> Poll<io::Result<usize>> {
            let this = self.get_mut();
            if this.interrupt_first {
                this.interrupt_first = false;
                return Poll::Ready(Err(io::Error::new(io::ErrorKind::Interrupted, "signal")));
            }
            let room = this.limit - this.written.len();
            let n = buf.len().min(this.per_call).min(room);
            this.written.extend_from_slice(&buf[..n]);
            Poll::Ready(Ok(n))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    #[tokio::test]
    async fn test_read_line_refills_across_small_buffer() {
        let input: &[u8] = b"GET / HTTP/1.0\r\nHost: x\r\n\r\n";
        let mut reader = BufferedReader::with_capacity(4, input);

        assert_eq!(reader.read_line(1024).await.unwrap().unwrap(), b"GET / HTTP/1.0\r\n");
        assert_eq!(reader.read_line(1024).await.unwrap().unwrap(), b"Host: x\r\n");
        assert_eq!(reader.read_line(1024).await.unwrap().unwrap(), b"\r\n");
        assert!(reader.read_line(1024).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_read_line_stops_at_max_len() {
        let input: &[u8] = b"abcdefgh\nrest\n";
        let mut reader = BufferedReader::new(input);

        assert_eq!(reader.read_line(5).await.unwrap().unwrap(), b"abcde");
        assert_eq!(reader.read_line(5).await.unwrap().unwrap(), b"fgh\n");
        assert_eq!(reader.read_line(5).await.unwrap().unwrap(), b"rest\n");
    }

    #[tokio::test]
    async fn test_read_line_returns_unterminated_tail_then_none() {
        let input: &[u8] = b"tail";
        let mut reader = BufferedReader::new(input);

        assert_eq!(reader.read_line(64).await.unwrap().unwrap(), b"tail");
        assert!(reader.read_line(64).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_read_line_on_empty_stream() {
        let input: &[u8] = b"";
        let mut reader = BufferedReader::new(input);
        assert!(reader.read_line(64).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_read_line_retries_interrupted_read() {
        let source = ScriptedReader::new(vec![
            Step::Interrupt,
            Step::Data(b"he".to_vec()),
            Step::Interrupt,
            Step::Data(b"llo\n".to_vec()),
        ]);
        let mut reader = BufferedReader::new(source);

        assert_eq!(reader.read_line(64).await.unwrap().unwrap(), b"hello\n");
    }

    #[tokio::test]
    async fn test_read_line_propagates_hard_errors() {
        let source = ScriptedReader::new(vec![Step::Data(b"par".to_vec()), Step::Fail]);
        let mut reader = BufferedReader::new(source);

        let result = reader.read_line(64).await;
        assert!(matches!(result, Err(Error::Io(ref e)) if e.kind() == io::ErrorKind::ConnectionReset));
    }

    #[tokio::test]
    async fn test_read_full_continues_after_line() {
        let input: &[u8] = b"line\nBODYextra";
        let mut reader = BufferedReader::with_capacity(3, input);

        assert_eq!(reader.read_line(64).await.unwrap().unwrap(), b"line\n");
        assert_eq!(reader.read_full(4).await.unwrap(), b"BODY");
        assert_eq!(reader.read_full(5).await.unwrap(), b"extra");
    }

    #[tokio::test]
    async fn test_read_full_short_read() {
        let input: &[u8] = b"1234";
        let mut reader = BufferedReader::new(input);

        let result = reader.read_full(10).await;
        assert!(matches!(
            result,
            Err(Error::ShortRead { expected: 10, received: 4 })
        ));
    }

    #[tokio::test]
    async fn test_read_full_zero_bytes() {
        let input: &[u8] = b"";
        let mut reader = BufferedReader::new(input);
        assert!(reader.read_full(0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_write_full_handles_partial_and_interrupted_writes() {
        let mut writer = ChokingWriter::new(3, usize::MAX);
        writer.interrupt_first = true;

        write_full(&mut writer, b"HTTP/1.1 200 OK\r\n").await.unwrap();
        assert_eq!(writer.written, b"HTTP/1.1 200 OK\r\n");
    }

    #[tokio::test]
    async fn test_write_full_reports_short_write() {
        let mut writer = ChokingWriter::new(4, 6);

        let result = write_full(&mut writer, b"0123456789").await;
        assert!(matches!(
            result,
            Err(Error::ShortWrite { expected: 10, written: 6 })
        ));
    }

    #[tokio::test]
    async fn test_copy_exact_stops_at_len() {
        let mut source: &[u8] = b"0123456789";
        let mut writer = ChokingWriter::new(2, usize::MAX);

        let copied = copy_exact(&mut source, &mut writer, 7, 3).await.unwrap();
        assert_eq!(copied, 7);
        assert_eq!(writer.written, b"0123456");
    }

    #[tokio::test]
    async fn test_copy_exact_fails_when_source_runs_dry() {
        let mut source: &[u8] = b"abc";
        let mut writer = ChokingWriter::new(16, usize::MAX);

        let result = copy_exact(&mut source, &mut writer, 8, 4).await;
        assert!(matches!(
            result,
            Err(Error::ShortRead { expected: 8, received: 3 })
        ));
    }
}
