//! Proveedor de poses en vivo: un hilo lee líneas JSON (una por frame) y
//! las envía al bucle principal.
//!
//! ```text
//! {"landmarks": [{"x": 0.51, "y": 0.80}, ... 21 puntos]}
//! {"landmarks": null}
//! ```

use std::io::{self, BufRead};
use std::thread::{self, JoinHandle};

use crossbeam_channel::Sender;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::types::{Landmark, PoseError, PoseSample};

#[derive(Error, Debug)]
pub enum StreamError {
    #[error("JSON inválido: {0}")]
    Json(#[from] serde_json::Error),
}

/// Lo que llega al bucle principal por cada frame
#[derive(Debug, Clone, PartialEq)]
pub enum PoseFrame {
    Hand(PoseSample),
    NoHand,
    /// Mano detectada con landmarks incompletos: se trata como frame sin mano
    Rejected(PoseError),
}

impl PoseFrame {
    pub fn pose(&self) -> Option<&PoseSample> {
        match self {
            PoseFrame::Hand(pose) => Some(pose),
            PoseFrame::NoHand | PoseFrame::Rejected(_) => None,
        }
    }
}

#[derive(Deserialize)]
struct PoseMessage {
    landmarks: Option<Vec<Landmark>>,
}

/// Interpreta una línea. Un error aquí significa "línea ilegible", no "sin mano".
pub fn parse_line(line: &str) -> Result<PoseFrame, StreamError> {
    let message: PoseMessage = serde_json::from_str(line)?;
    Ok(match message.landmarks {
        None => PoseFrame::NoHand,
        Some(points) if points.is_empty() => PoseFrame::NoHand,
        Some(points) => match PoseSample::from_mediapipe(&points) {
            Ok(pose) => PoseFrame::Hand(pose),
            Err(e) => PoseFrame::Rejected(e),
        },
    })
}

/// Lee hasta EOF o hasta que el receptor desaparece. Devuelve los frames enviados.
pub fn pump<R: BufRead>(reader: R, tx: &Sender<PoseFrame>) -> io::Result<u64> {
    let mut sent = 0u64;

    for (line_idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match parse_line(line) {
            Ok(frame) => {
                if tx.send(frame).is_err() {
                    debug!("Receptor cerrado, fin de lectura");
                    break;
                }
                sent += 1;
            }
            Err(e) => warn!("Línea {} descartada: {}", line_idx + 1, e),
        }
    }

    Ok(sent)
}

/// Lanza el hilo lector sobre stdin. Al llegar a EOF el canal se cierra.
pub fn spawn_stdin_reader(tx: Sender<PoseFrame>) -> JoinHandle<()> {
    thread::spawn(move || {
        let stdin = io::stdin();
        match pump(stdin.lock(), &tx) {
            Ok(sent) => info!(frames = sent, "Fin del flujo de poses"),
            Err(e) => warn!("Error leyendo stdin: {}", e),
        }
    })
}
