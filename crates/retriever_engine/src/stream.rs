use retriever_logging::runner_warn;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc::UnboundedSender;

/// Turns one raw line into text: drops the line terminator (`\n` or `\r\n`)
/// and replaces invalid UTF-8 instead of failing.
pub fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}

/// Reads `stream` line by line into `tx` until EOF, a read error, or the
/// receiver going away. A final chunk without a newline is still a line.
pub(crate) async fn forward_lines<R>(stream: R, tx: UnboundedSender<String>, label: &'static str)
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(stream);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                if tx.send(decode_line(&buf)).is_err() {
                    break;
                }
            }
            Err(err) => {
                runner_warn!("Failed reading child {}: {}", label, err);
                break;
            }
        }
    }
}
