//! Serial I/O boundary
//!
//! The port itself is external (`SerialTransport`). This module turns the raw
//! chunks it delivers into newline-delimited lines and decodes the
//! comma-separated shape frames the microcontroller sketches exchange.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{FrameError, SerialError};
use crate::events::{Event, EventBus};
use crate::settings::SketchSettings;

/// Pending bytes kept without a newline before the buffer is discarded
pub const MAX_PENDING: usize = 4096;

/// Port options passed to `SerialTransport::open`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerialOptions {
    pub baud_rate: u32,
}

impl Default for SerialOptions {
    fn default() -> Self {
        Self {
            baud_rate: crate::consts::SERIAL_BAUD_RATE,
        }
    }
}

impl From<&SketchSettings> for SerialOptions {
    fn from(settings: &SketchSettings) -> Self {
        Self {
            baud_rate: settings.serial_baud_rate,
        }
    }
}

/// An open-able, line-writable serial port
pub trait SerialTransport {
    fn open(&mut self, options: &SerialOptions) -> Result<(), SerialError>;

    fn is_open(&self) -> bool;

    /// Write `line` followed by a newline
    fn write_line(&mut self, line: &str) -> Result<(), SerialError>;
}

/// In-memory transport that records written lines
#[derive(Debug, Clone, Default)]
pub struct LoopbackTransport {
    pub options: Option<SerialOptions>,
    pub written: Vec<String>,
}

impl SerialTransport for LoopbackTransport {
    fn open(&mut self, options: &SerialOptions) -> Result<(), SerialError> {
        self.options = Some(*options);
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.options.is_some()
    }

    fn write_line(&mut self, line: &str) -> Result<(), SerialError> {
        if !self.is_open() {
            return Err(SerialError::NotOpen);
        }
        self.written.push(line.to_string());
        Ok(())
    }
}

/// Reassembles lines from arbitrarily split chunks
///
/// Accepts `\n` and `\r\n` terminators; blank lines are dropped.
#[derive(Debug, Clone, Default)]
pub struct LineFramer {
    pending: String,
}

impl LineFramer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a received chunk and return every line it completed
    pub fn push(&mut self, chunk: &str) -> Vec<String> {
        self.pending.push_str(chunk);

        let mut lines = Vec::new();
        while let Some(end) = self.pending.find('\n') {
            let line: String = self.pending.drain(..=end).collect();
            let line = line.trim_end_matches(['\n', '\r']);
            if !line.trim().is_empty() {
                lines.push(line.to_string());
            }
        }

        if self.pending.len() > MAX_PENDING {
            log::warn!(
                "Dropping {} buffered serial bytes with no line terminator",
                self.pending.len()
            );
            self.pending.clear();
        }
        lines
    }

    /// Text received after the last complete line
    pub fn pending(&self) -> &str {
        &self.pending
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

/// Shape drawn by the receiving sketch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeType {
    Circle = 0,
    Square = 1,
    Triangle = 2,
}

impl ShapeType {
    fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(ShapeType::Circle),
            1 => Some(ShapeType::Square),
            2 => Some(ShapeType::Triangle),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DrawMode {
    Fill = 0,
    Outline = 1,
}

impl DrawMode {
    fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(DrawMode::Fill),
            1 => Some(DrawMode::Outline),
            _ => None,
        }
    }
}

/// `shapeType, sizeFraction, drawMode`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeFrame {
    pub shape: ShapeType,
    /// Shape size as a fraction of the canvas, in [0, 1]
    pub size_fraction: f64,
    pub draw_mode: DrawMode,
}

const FIELDS: [&str; 3] = ["shapeType", "sizeFraction", "drawMode"];

fn parse_number(field: &'static str, text: &str) -> Result<f64, FrameError> {
    text.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| FrameError::NotANumber {
            field,
            text: text.to_string(),
        })
}

/// Integer code in 0..=255, rejecting fractional values
fn parse_code(field: &'static str, text: &str) -> Result<u8, FrameError> {
    let value = parse_number(field, text)?;
    if value.fract() != 0.0 || !(0.0..=255.0).contains(&value) {
        return Err(FrameError::OutOfRange { field, value });
    }
    Ok(value as u8)
}

impl FromStr for ShapeFrame {
    type Err = FrameError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = line.trim().split(',').map(str::trim).collect();
        if fields.len() != FIELDS.len() {
            return Err(FrameError::FieldCount {
                expected: FIELDS.len(),
                found: fields.len(),
            });
        }

        let shape_code = parse_code(FIELDS[0], fields[0])?;
        let shape = ShapeType::from_code(shape_code).ok_or(FrameError::OutOfRange {
            field: FIELDS[0],
            value: f64::from(shape_code),
        })?;

        let size_fraction = parse_number(FIELDS[1], fields[1])?;
        if !(0.0..=1.0).contains(&size_fraction) {
            return Err(FrameError::OutOfRange {
                field: FIELDS[1],
                value: size_fraction,
            });
        }

        let mode_code = parse_code(FIELDS[2], fields[2])?;
        let draw_mode = DrawMode::from_code(mode_code).ok_or(FrameError::OutOfRange {
            field: FIELDS[2],
            value: f64::from(mode_code),
        })?;

        Ok(Self {
            shape,
            size_fraction,
            draw_mode,
        })
    }
}

impl fmt::Display for ShapeFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, {}",
            self.shape as u8, self.size_fraction, self.draw_mode as u8
        )
    }
}

/// A transport plus the framing state for its incoming data
pub struct SerialLink<T: SerialTransport> {
    transport: T,
    framer: LineFramer,
}

impl<T: SerialTransport> SerialLink<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            framer: LineFramer::new(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn is_connected(&self) -> bool {
        self.transport.is_open()
    }

    /// Open the port and announce the connection state
    pub fn connect(&mut self, options: &SerialOptions, events: &mut EventBus) -> Result<(), SerialError> {
        let result = self.transport.open(options);
        match &result {
            Ok(()) => log::info!("Serial port opened at {} baud", options.baud_rate),
            Err(e) => log::warn!("Serial port failed to open: {}", e),
        }
        events.publish(&Event::SerialConnection {
            connected: result.is_ok(),
        });
        result
    }

    pub fn write_line(&mut self, line: &str) -> Result<(), SerialError> {
        self.transport.write_line(line)
    }

    pub fn send_frame(&mut self, frame: &ShapeFrame) -> Result<(), SerialError> {
        self.write_line(&frame.to_string())
    }

    /// Feed data from the port; each completed line is published and returned
    pub fn on_data_received(&mut self, chunk: &str, events: &mut EventBus) -> Vec<String> {
        let lines = self.framer.push(chunk);
        for line in &lines {
            log::debug!("Serial line: {}", line);
            events.publish(&Event::SerialLine(line.clone()));
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_framer_reassembles_split_lines() {
        let mut framer = LineFramer::new();
        assert!(framer.push("1, 0.").is_empty());
        assert_eq!(framer.pending(), "1, 0.");
        assert_eq!(framer.push("5, 0\r\n2, 0.25"), vec!["1, 0.5, 0"]);
        assert_eq!(framer.push(", 1\n\n\r\n0, 1, 0\n"), vec!["2, 0.25, 1", "0, 1, 0"]);
        assert_eq!(framer.pending(), "");
    }

    #[test]
    fn test_framer_drops_runaway_buffer() {
        let mut framer = LineFramer::new();
        framer.push(&"x".repeat(MAX_PENDING + 1));
        assert_eq!(framer.pending(), "");
        assert_eq!(framer.push("ok\n"), vec!["ok"]);
    }

    #[test]
    fn test_parse_frame() {
        let frame: ShapeFrame = "2, 0.75, 1".parse().unwrap();
        assert_eq!(
            frame,
            ShapeFrame {
                shape: ShapeType::Triangle,
                size_fraction: 0.75,
                draw_mode: DrawMode::Outline,
            }
        );
        assert_eq!(frame.to_string(), "2, 0.75, 1");
        // Whitespace is optional
        assert_eq!("0,1,0".parse::<ShapeFrame>().unwrap().shape, ShapeType::Circle);
    }

    #[test]
    fn test_parse_frame_errors() {
        assert_eq!(
            "1, 0.5".parse::<ShapeFrame>(),
            Err(FrameError::FieldCount {
                expected: 3,
                found: 2
            })
        );
        assert!(matches!(
            "a, 0.5, 0".parse::<ShapeFrame>(),
            Err(FrameError::NotANumber {
                field: "shapeType",
                ..
            })
        ));
        assert!(matches!(
            "3, 0.5, 0".parse::<ShapeFrame>(),
            Err(FrameError::OutOfRange {
                field: "shapeType",
                ..
            })
        ));
        assert!(matches!(
            "1.5, 0.5, 0".parse::<ShapeFrame>(),
            Err(FrameError::OutOfRange { .. })
        ));
        assert!(matches!(
            "1, 1.5, 0".parse::<ShapeFrame>(),
            Err(FrameError::OutOfRange {
                field: "sizeFraction",
                ..
            })
        ));
        assert!(matches!(
            "1, NaN, 0".parse::<ShapeFrame>(),
            Err(FrameError::NotANumber { .. })
        ));
        assert!(matches!(
            "1, 0.5, 2".parse::<ShapeFrame>(),
            Err(FrameError::OutOfRange {
                field: "drawMode",
                ..
            })
        ));
    }

    #[test]
    fn test_link_requires_open_port() {
        let mut link = SerialLink::new(LoopbackTransport::default());
        assert_eq!(link.write_line("hello"), Err(SerialError::NotOpen));

        let mut events = EventBus::new();
        let states = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&states);
        let _sub = events.subscribe(EventKind::SerialConnection, move |e| {
            if let Event::SerialConnection { connected } = e {
                sink.borrow_mut().push(*connected);
            }
        });

        let settings = SketchSettings {
            serial_baud_rate: 115_200,
            ..Default::default()
        };
        link.connect(&SerialOptions::from(&settings), &mut events).unwrap();
        assert!(link.is_connected());
        assert_eq!(*states.borrow(), vec![true]);
        assert_eq!(link.transport().options.map(|o| o.baud_rate), Some(115_200));

        let frame = ShapeFrame {
            shape: ShapeType::Square,
            size_fraction: 0.5,
            draw_mode: DrawMode::Fill,
        };
        link.send_frame(&frame).unwrap();
        assert_eq!(link.transport().written, vec!["1, 0.5, 0"]);
    }

    #[test]
    fn test_link_publishes_received_lines() {
        let mut link = SerialLink::new(LoopbackTransport::default());
        let mut events = EventBus::new();
        let received = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&received);
        let _sub = events.subscribe(EventKind::SerialLine, move |e| {
            if let Event::SerialLine(line) = e {
                sink.borrow_mut().push(line.clone());
            }
        });

        let lines = link.on_data_received("0, 0.2, 1\n1, 0.", &mut events);
        assert_eq!(lines, vec!["0, 0.2, 1"]);
        link.on_data_received("9, 0\n", &mut events);
        assert_eq!(*received.borrow(), vec!["0, 0.2, 1", "1, 0.9, 0"]);
    }
}
