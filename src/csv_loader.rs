use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use anyhow::{bail, ensure, Context, Result};
use csv::ReaderBuilder;

use crate::types::{Landmark, LandmarkRole, PoseError, PoseSample};

/// Un frame grabado: marca de tiempo y los landmarks que traía
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedFrame {
    pub index: usize,
    pub timestamp: Duration,
    pub landmarks: Vec<(LandmarkRole, Landmark)>,
}

impl RecordedFrame {
    /// `Ok(None)` si el frame no tenía mano; error si faltan roles
    pub fn pose(&self) -> Result<Option<PoseSample>, PoseError> {
        if self.landmarks.is_empty() {
            return Ok(None);
        }
        PoseSample::from_landmarks(self.landmarks.iter().copied()).map(Some)
    }
}

/// Carga una sesión grabada desde un CSV en el formato
/// frame,timestamp_ms,landmark,x,y (landmark = índice MediaPipe 0..21).
/// Una fila con landmark vacío marca un frame sin mano.
pub fn load_session_from_csv(path: impl AsRef<Path>) -> Result<Vec<RecordedFrame>> {
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("No se pudo abrir el CSV {:?}", path))?;

    let mut frames: BTreeMap<usize, RecordedFrame> = BTreeMap::new();

    for (row_idx, result) in reader.records().enumerate() {
        let row = row_idx + 1;
        let record = result.with_context(|| format!("Fila {} inválida en {:?}", row, path))?;
        if record.len() < 5 {
            bail!("La fila {} no tiene 5 columnas", row);
        }

        let index: usize = record[0]
            .parse()
            .with_context(|| format!("frame inválido en fila {}", row))?;
        let timestamp_ms: u64 = record[1]
            .parse()
            .with_context(|| format!("timestamp_ms inválido en fila {}", row))?;
        let timestamp = Duration::from_millis(timestamp_ms);

        let frame = frames.entry(index).or_insert_with(|| RecordedFrame {
            index,
            timestamp,
            landmarks: Vec::new(),
        });
        ensure!(
            frame.timestamp == timestamp,
            "El frame {} tiene dos timestamps ({:?} y {:?}, fila {})",
            index,
            frame.timestamp,
            timestamp,
            row
        );

        if record[2].is_empty() {
            continue;
        }

        let landmark_idx: usize = record[2]
            .parse()
            .with_context(|| format!("landmark inválido en fila {}", row))?;
        let x: f32 = record[3]
            .parse()
            .with_context(|| format!("x inválida en fila {}", row))?;
        let y: f32 = record[4]
            .parse()
            .with_context(|| format!("y inválida en fila {}", row))?;

        // Los puntos MediaPipe que el clasificador no usa se ignoran
        if let Some(role) = LandmarkRole::from_mediapipe_index(landmark_idx) {
            frame.landmarks.push((role, Landmark::new(x, y)));
        } else if landmark_idx >= crate::types::MEDIAPIPE_LANDMARKS {
            bail!("Landmark {} fuera de rango (fila {})", landmark_idx, row);
        }
    }

    ensure!(!frames.is_empty(), "El CSV {:?} no contiene datos", path);

    let frames: Vec<RecordedFrame> = frames.into_values().collect();
    for pair in frames.windows(2) {
        ensure!(
            pair[1].timestamp >= pair[0].timestamp,
            "El timestamp retrocede entre los frames {} y {}",
            pair[0].index,
            pair[1].index
        );
    }

    Ok(frames)
}
