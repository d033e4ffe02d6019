//! 输入源 - 从 stdin 读取 `mosquitto_sub -v` 格式的消息
//!
//! Each line is `<topic> <payload>`, split at the first space. The payload is
//! kept as raw bytes; MQTT topics are UTF-8 by definition.
//!
//! ```text
//! mosquitto_sub -v -t 'irssi/#' | mqtt-notify run
//! ```

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::notification::request::RawMessage;

/// Parse one input line. Blank lines and lines without a topic yield `None`.
pub fn parse_line(line: &[u8]) -> Option<RawMessage> {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    if line.is_empty() {
        return None;
    }

    let (topic, payload) = match line.iter().position(|b| *b == b' ') {
        Some(idx) => (&line[..idx], &line[idx + 1..]),
        None => (line, &[][..]),
    };

    if topic.is_empty() {
        return None;
    }

    match std::str::from_utf8(topic) {
        Ok(topic) => Some(RawMessage::new(topic, payload)),
        Err(_) => {
            warn!("Skipping line with a non UTF-8 topic");
            None
        }
    }
}

/// Forward every parsed line to `sender` until EOF or the receiver goes away.
/// Returns how many messages were forwarded.
pub async fn forward_lines<R>(mut reader: R, sender: mpsc::Sender<RawMessage>) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut forwarded = 0;
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }

        let Some(msg) = parse_line(&buf) else {
            continue;
        };

        debug!(topic = %msg.topic, bytes = msg.payload.len(), "Read message");
        if sender.send(msg).await.is_err() {
            warn!("Dispatcher stopped, no longer reading input");
            break;
        }
        forwarded += 1;
    }

    Ok(forwarded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::request::Payload;

    #[test]
    fn test_parse_line_splits_at_first_space() {
        let msg = parse_line(b"irssi/hilight [#rust/bob] hello world\n").unwrap();
        assert_eq!(msg.topic, "irssi/hilight");
        assert_eq!(msg.payload, Payload::from("[#rust/bob] hello world"));
    }

    #[test]
    fn test_parse_line_topic_only() {
        let msg = parse_line(b"irssi/pm\r\n").unwrap();
        assert_eq!(msg.topic, "irssi/pm");
        assert!(msg.payload.is_empty());
    }

    #[test]
    fn test_parse_line_blank() {
        assert!(parse_line(b"\n").is_none());
        assert!(parse_line(b"").is_none());
        assert!(parse_line(b" payload without topic").is_none());
    }

    #[test]
    fn test_parse_line_binary_payload() {
        let msg = parse_line(&[b't', b' ', 0xff, 0xfe]).unwrap();
        assert_eq!(msg.payload.as_bytes(), &[0xff, 0xfe]);
    }

    #[tokio::test]
    async fn test_forward_lines() {
        let input: &[u8] = b"irssi/pm (bob) hi\n\nhome/door open\nlast no-newline";
        let (tx, mut rx) = mpsc::channel(8);

        let count = forward_lines(input, tx).await.unwrap();
        assert_eq!(count, 3);

        let mut topics = Vec::new();
        while let Some(msg) = rx.recv().await {
            topics.push(msg.topic);
        }
        assert_eq!(topics, vec!["irssi/pm", "home/door", "last"]);
    }
}
