// Copyright (C) 2025 Berkay Yetgin
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

use std::io::Read;
use std::process::{Command, Stdio};
use std::sync::mpsc::Sender;
use std::thread;

use anyhow::{Context, Result};

/// Events delivered from the dump worker to the GUI update loop.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleEvent {
    /// A completed console line; append it to the view.
    Line(String),
    /// A progress update; replace the last displayed line in place.
    Progress(String),
    /// The child exited. `None` means it was killed by a signal.
    Finished(Option<i32>),
    /// Reading a stream failed; the run keeps going until exit.
    Error(String),
}

/// Incremental decoder for DiscImageCreator's console stream.
///
/// The tool terminates real lines with `\r\n` and redraws its progress
/// bars with a bare `\r`. Chunks may split anywhere, including between
/// the `\r` and a following `\n`, so an unresolved carriage return is
/// held until the next byte arrives.
#[derive(Debug, Default)]
pub struct StreamDecoder {
    pending: Vec<u8>,
    cr_pending: bool,
}

impl StreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk of raw bytes, returning the events it completes.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<ConsoleEvent> {
        let mut events = Vec::new();

        for &byte in chunk {
            if self.cr_pending {
                self.cr_pending = false;
                if byte == b'\n' {
                    events.push(ConsoleEvent::Line(self.take_pending()));
                    continue;
                }
                // Lone CR: the buffer was a progress redraw and this byte
                // starts the next one.
                events.push(ConsoleEvent::Progress(self.take_pending()));
                self.pending.push(byte);
            } else if byte == b'\r' {
                self.cr_pending = true;
            } else if byte == b'\n' {
                events.push(ConsoleEvent::Line(self.take_pending()));
            } else {
                self.pending.push(byte);
            }
        }

        events
    }

    /// Flush whatever is buffered at end of stream.
    pub fn finish(&mut self) -> Option<ConsoleEvent> {
        let cr_pending = std::mem::take(&mut self.cr_pending);
        if self.pending.is_empty() {
            return None;
        }
        let text = self.take_pending();
        if cr_pending {
            Some(ConsoleEvent::Progress(text))
        } else {
            Some(ConsoleEvent::Line(text))
        }
    }

    fn take_pending(&mut self) -> String {
        let text = String::from_utf8_lossy(&self.pending).to_string();
        self.pending.clear();
        text
    }
}

/// Launch the assembled command and stream its output as `ConsoleEvent`s.
///
/// Returns once the child is spawned; decoding runs on worker threads so
/// the egui update loop only drains the channel. stdout and stderr are
/// funneled into the same channel, and `Finished` is sent exactly once
/// after both streams closed and the child was reaped.
pub fn spawn_dump(cmd: &[String], tx: Sender<ConsoleEvent>) -> Result<()> {
    let (program, args) = cmd
        .split_first()
        .context("Empty command line")?;

    log::info!("Launching {} {:?}", program, args);

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("Failed to launch {}", program))?;

    let stdout = child
        .stdout
        .take()
        .context("Failed to capture child stdout")?;
    let stderr = child
        .stderr
        .take()
        .context("Failed to capture child stderr")?;

    let stderr_tx = tx.clone();
    let stderr_thread = thread::spawn(move || stream_to_events(stderr, &stderr_tx));

    thread::spawn(move || {
        stream_to_events(stdout, &tx);
        let _ = stderr_thread.join();

        let code = match child.wait() {
            Ok(status) => status.code(),
            Err(err) => {
                let _ = tx.send(ConsoleEvent::Error(format!("wait failed: {}", err)));
                None
            }
        };
        log::info!("Child exited with code {:?}", code);
        let _ = tx.send(ConsoleEvent::Finished(code));
    });

    Ok(())
}

fn stream_to_events<R: Read>(mut reader: R, tx: &Sender<ConsoleEvent>) {
    let mut decoder = StreamDecoder::new();
    let mut buf = [0u8; 4096];

    loop {
        match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(read) => {
                for event in decoder.feed(&buf[..read]) {
                    if tx.send(event).is_err() {
                        return;
                    }
                }
            }
            Err(err) => {
                let _ = tx.send(ConsoleEvent::Error(err.to_string()));
                break;
            }
        }
    }

    if let Some(event) = decoder.finish() {
        let _ = tx.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_all(chunks: &[&[u8]]) -> Vec<ConsoleEvent> {
        let mut decoder = StreamDecoder::new();
        let mut events = Vec::new();
        for chunk in chunks {
            events.extend(decoder.feed(chunk));
        }
        events.extend(decoder.finish());
        events
    }

    #[test]
    fn test_crlf_flushes_line() {
        let events = decode_all(&[b"Checking drive\r\n"]);
        assert_eq!(events, vec![ConsoleEvent::Line("Checking drive".to_string())]);
    }

    #[test]
    fn test_lone_cr_is_progress_not_line() {
        let events = decode_all(&[b"Reading 10%\rReading 20%\r\n"]);
        assert_eq!(
            events,
            vec![
                ConsoleEvent::Progress("Reading 10%".to_string()),
                ConsoleEvent::Line("Reading 20%".to_string()),
            ]
        );
    }

    #[test]
    fn test_progress_sequence() {
        let events = decode_all(&[b"1%\r2%\r3%\r"]);
        assert_eq!(
            events,
            vec![
                ConsoleEvent::Progress("1%".to_string()),
                ConsoleEvent::Progress("2%".to_string()),
                ConsoleEvent::Progress("3%".to_string()),
            ]
        );
    }

    #[test]
    fn test_cr_split_across_chunks() {
        // CRLF split between two reads must still produce one Line.
        let events = decode_all(&[b"done\r", b"\nnext\r\n"]);
        assert_eq!(
            events,
            vec![
                ConsoleEvent::Line("done".to_string()),
                ConsoleEvent::Line("next".to_string()),
            ]
        );

        // A lone CR at a chunk boundary resolves into Progress.
        let events = decode_all(&[b"50%\r", b"60%\r\n"]);
        assert_eq!(
            events,
            vec![
                ConsoleEvent::Progress("50%".to_string()),
                ConsoleEvent::Line("60%".to_string()),
            ]
        );
    }

    #[test]
    fn test_bare_newline_tolerated() {
        let events = decode_all(&[b"a\nb\n"]);
        assert_eq!(
            events,
            vec![
                ConsoleEvent::Line("a".to_string()),
                ConsoleEvent::Line("b".to_string()),
            ]
        );
    }

    #[test]
    fn test_eof_flushes_trailing_text() {
        let events = decode_all(&[b"no terminator"]);
        assert_eq!(
            events,
            vec![ConsoleEvent::Line("no terminator".to_string())]
        );
    }

    #[test]
    fn test_empty_line() {
        let events = decode_all(&[b"\r\n"]);
        assert_eq!(events, vec![ConsoleEvent::Line(String::new())]);
    }

    #[test]
    fn test_non_utf8_bytes_decode_lossily() {
        let events = decode_all(&[b"ok \xff\xfe\r\n"]);
        match &events[0] {
            ConsoleEvent::Line(text) => assert!(text.starts_with("ok ")),
            other => panic!("expected Line, got {:?}", other),
        }
    }

    #[test]
    fn test_spawn_dump_rejects_empty_command() {
        let (tx, _rx) = std::sync::mpsc::channel();
        assert!(spawn_dump(&[], tx).is_err());
    }
}
