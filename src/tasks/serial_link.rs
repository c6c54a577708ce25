//! Serial command input and telemetry output.
//!
//! Reads newline-terminated command lines without ever blocking, so it can be
//! polled between two leg steps, and writes the one-way text telemetry
//! (`Robot Ready`, `CMD RECV: <line>`, `DIST:<cm>`).
use crate::robot::commands::{Command, CommandSource};
use crate::robot::state::ControlState;
use crate::{LINE_BUF_SIZE, RX_CHUNK_SIZE};
use core::fmt::Display;
use embedded_io::{Read, ReadReady, Write};
use heapless::Vec;
use log::{info, warn};

/// Lines sent back to the peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Telemetry<'a> {
    Ready,
    CommandReceived(&'a str),
    Distance(u16),
}

impl Display for Telemetry<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Telemetry::Ready => f.write_str("Robot Ready"),
            Telemetry::CommandReceived(line) => write!(f, "CMD RECV: {line}"),
            Telemetry::Distance(cm) => write!(f, "DIST:{cm}"),
        }
    }
}

pub struct SerialLink<U> {
    uart: U,
    line: Vec<u8, LINE_BUF_SIZE>,
    overflow: bool,
}

impl<U> SerialLink<U>
where
    U: Read + ReadReady + Write,
{
    pub fn new(uart: U) -> Self {
        Self {
            uart,
            line: Vec::new(),
            overflow: false,
        }
    }

    pub fn uart(&self) -> &U {
        &self.uart
    }

    pub fn uart_mut(&mut self) -> &mut U {
        &mut self.uart
    }

    /// Write one telemetry line. Failures are logged and dropped.
    pub fn emit(&mut self, telemetry: Telemetry<'_>) {
        if let Err(e) = self.uart.write_fmt(format_args!("{telemetry}\r\n")) {
            warn!("telemetry write failed: {e:?}");
        }
    }

    /// Drain whatever the UART has buffered and apply every complete line to
    /// `state`, in arrival order. A partial line is kept for the next poll.
    pub fn poll_lines(&mut self, state: &mut ControlState) {
        let mut chunk = [0u8; RX_CHUNK_SIZE];
        loop {
            match self.uart.read_ready() {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => {
                    warn!("serial status error: {e:?}");
                    break;
                }
            }
            let n = match self.uart.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) => {
                    warn!("serial read error: {e:?}");
                    break;
                }
            };
            for &byte in &chunk[..n] {
                self.push_byte(byte, state);
            }
        }
    }

    fn push_byte(&mut self, byte: u8, state: &mut ControlState) {
        if byte == b'\n' {
            let line = core::mem::take(&mut self.line);
            if core::mem::take(&mut self.overflow) {
                warn!("dropping serial line longer than {LINE_BUF_SIZE} bytes");
                return;
            }
            self.accept_line(&line, state);
        } else if self.line.push(byte).is_err() {
            self.overflow = true;
        }
    }

    fn accept_line(&mut self, raw: &[u8], state: &mut ControlState) {
        let Ok(text) = core::str::from_utf8(raw) else {
            warn!("dropping non UTF-8 serial line");
            return;
        };
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        let command = Command::from(text);
        info!("received '{text}' -> {command}");
        state.set_command(command);
        self.emit(Telemetry::CommandReceived(text));
    }
}

impl<U> CommandSource for SerialLink<U>
where
    U: Read + ReadReady + Write,
{
    fn poll(&mut self, state: &mut ControlState) {
        self.poll_lines(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockSerial;

    fn link_with(input: &[u8]) -> SerialLink<MockSerial> {
        let mut uart = MockSerial::default();
        uart.feed(input);
        SerialLink::new(uart)
    }

    #[test]
    fn line_sets_command_and_is_echoed() {
        let mut link = link_with(b"forward\r\n");
        let mut state = ControlState::new();
        link.poll(&mut state);
        assert_eq!(state.command(), Command::Forward);
        assert_eq!(link.uart().sent(), "CMD RECV: forward\r\n");
    }

    #[test]
    fn blank_line_is_ignored() {
        let mut link = link_with(b"  \n\n");
        let mut state = ControlState::new();
        state.set_command(Command::Left);
        link.poll(&mut state);
        assert_eq!(state.command(), Command::Left);
        assert_eq!(link.uart().sent(), "");
    }

    #[test]
    fn unknown_token_means_stop_but_is_echoed_verbatim() {
        let mut link = link_with(b"  jump \n");
        let mut state = ControlState::new();
        state.set_command(Command::Forward);
        link.poll(&mut state);
        assert_eq!(state.command(), Command::Stop);
        assert_eq!(link.uart().sent(), "CMD RECV: jump\r\n");
    }

    #[test]
    fn partial_line_waits_for_newline() {
        let mut link = link_with(b"ba");
        let mut state = ControlState::new();
        link.poll(&mut state);
        assert_eq!(state.command(), Command::Stop);

        link.uart_mut().feed(b"ck\n");
        link.poll(&mut state);
        assert_eq!(state.command(), Command::Backward);
    }

    #[test]
    fn lines_apply_in_arrival_order() {
        let mut link = link_with(b"left\nright\nforward\n");
        let mut state = ControlState::new();
        link.poll(&mut state);
        assert_eq!(state.command(), Command::Forward);
        assert_eq!(
            link.uart().sent(),
            "CMD RECV: left\r\nCMD RECV: right\r\nCMD RECV: forward\r\n"
        );
    }

    #[test]
    fn overlong_line_is_dropped() {
        let mut input = [b'x'; LINE_BUF_SIZE + 10].to_vec();
        input.extend_from_slice(b"\nleft\n");
        let mut link = link_with(&input);
        let mut state = ControlState::new();
        link.poll(&mut state);
        assert_eq!(state.command(), Command::Left);
        assert_eq!(link.uart().sent(), "CMD RECV: left\r\n");
    }

    #[test]
    fn invalid_utf8_is_dropped() {
        let mut link = link_with(b"\xff\xfe\nright\n");
        let mut state = ControlState::new();
        link.poll(&mut state);
        assert_eq!(state.command(), Command::Right);
    }

    #[test]
    fn telemetry_format() {
        let mut link = link_with(b"");
        link.emit(Telemetry::Ready);
        link.emit(Telemetry::Distance(0));
        link.emit(Telemetry::Distance(120));
        assert_eq!(link.uart().sent(), "Robot Ready\r\nDIST:0\r\nDIST:120\r\n");
    }
}
