//! Landmark detection through an external process.
//!
//! Protocol, one exchange per frame:
//! - the child prints `READY` once after start-up
//! - we send `width`, `height`, `channels` as little-endian u32, then the RGB bytes
//! - the child answers with one JSON line:
//!   `{"hands":[{"handedness":"Right","score":0.97,"landmarks":[{"x":..,"y":..,"z":..}]}],"error":null}`

use serde::Deserialize;
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use super::{DetectorError, HandDetector};
use crate::camera::Frame;
use crate::gesture::{HandLandmarks, NormalizedLandmark};

#[derive(Deserialize, Debug)]
struct HandJson {
    #[serde(default)]
    handedness: Option<String>,
    #[serde(default = "default_score")]
    score: f32,
    landmarks: Vec<NormalizedLandmark>,
}

fn default_score() -> f32 {
    1.0
}

#[derive(Deserialize, Debug)]
struct DetectionResult {
    #[serde(default)]
    hands: Vec<HandJson>,
    #[serde(default)]
    error: Option<String>,
}

/// Parse one response line, dropping hands under `min_confidence`.
///
/// A response carrying an `error` is logged and treated as zero hands.
pub fn parse_response(line: &str, min_confidence: f32) -> Result<Vec<HandLandmarks>, DetectorError> {
    let result: DetectionResult = serde_json::from_str(line.trim())?;

    if let Some(error) = result.error {
        log::warn!("Detector reported an error: {}", error);
        return Ok(Vec::new());
    }

    Ok(result
        .hands
        .into_iter()
        .filter(|h| h.score >= min_confidence)
        .map(|h| HandLandmarks {
            points: h.landmarks,
            score: h.score,
            handedness: h.handedness,
        })
        .collect())
}

/// Write the frame header and pixel data for one request.
pub fn write_request<W: Write>(writer: &mut W, frame: &Frame) -> std::io::Result<()> {
    writer.write_all(&frame.width.to_le_bytes())?;
    writer.write_all(&frame.height.to_le_bytes())?;
    writer.write_all(&(Frame::BYTES_PER_PIXEL as u32).to_le_bytes())?;
    writer.write_all(&frame.data)?;
    writer.flush()
}

/// A detector process speaking the protocol above.
pub struct SubprocessDetector {
    process: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    min_confidence: f32,
    /// Set once the child is gone; later frames get zero hands
    exited: bool,
}

impl SubprocessDetector {
    /// Spawn `command` (program followed by arguments) and wait for `READY`.
    pub fn spawn(command: &[String], min_confidence: f32) -> Result<Self, DetectorError> {
        let (program, args) = command.split_first().ok_or(DetectorError::EmptyCommand)?;

        log::info!("Starting hand detector: {}", command.join(" "));

        let mut process = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| DetectorError::Spawn {
                command: command.join(" "),
                source,
            })?;

        let stdin = process.stdin.take().ok_or(DetectorError::Exited)?;
        let stdout = process.stdout.take().ok_or(DetectorError::Exited)?;
        let mut stdout = BufReader::new(stdout);

        let mut ready = String::new();
        if stdout.read_line(&mut ready)? == 0 {
            let _ = process.kill();
            return Err(DetectorError::Exited);
        }
        if ready.trim() != "READY" {
            let _ = process.kill();
            return Err(DetectorError::NotReady(ready.trim().to_string()));
        }

        log::info!("Hand detector ready");

        Ok(Self {
            process,
            stdin,
            stdout,
            min_confidence: min_confidence.clamp(0.0, 1.0),
            exited: false,
        })
    }

    /// Whether the child process has gone away.
    pub fn has_exited(&self) -> bool {
        self.exited
    }

    fn exchange(&mut self, frame: &Frame) -> Result<Vec<HandLandmarks>, DetectorError> {
        write_request(&mut self.stdin, frame)?;

        let mut response = String::new();
        if self.stdout.read_line(&mut response)? == 0 {
            return Err(DetectorError::Exited);
        }

        let hands = parse_response(&response, self.min_confidence)?;
        log::trace!("Detector returned {} hand(s)", hands.len());
        Ok(hands)
    }
}

fn is_exit(error: &DetectorError) -> bool {
    match error {
        DetectorError::Exited => true,
        DetectorError::Io(e) => e.kind() == ErrorKind::BrokenPipe,
        _ => false,
    }
}

impl HandDetector for SubprocessDetector {
    /// Once the child has exited this reports [`DetectorError::Exited`] a
    /// single time, then returns zero hands for every later frame.
    fn detect(&mut self, frame: &Frame) -> Result<Vec<HandLandmarks>, DetectorError> {
        if self.exited || frame.is_empty() {
            return Ok(Vec::new());
        }

        match self.exchange(frame) {
            Err(e) if is_exit(&e) => {
                log::error!("Hand detector process is gone ({}), continuing without detection", e);
                self.exited = true;
                Err(DetectorError::Exited)
            }
            result => result,
        }
    }
}

impl Drop for SubprocessDetector {
    fn drop(&mut self) {
        let _ = self.process.kill();
        let _ = self.process.wait();
    }
}
