use std::collections::VecDeque;
use std::time::Duration;

use crate::types::ScrollDirection;

/// Una muestra del historial: posición vertical de la muñeca y su marca de tiempo
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeSample {
    pub y: f32,
    pub at: Duration,
}

/// Buffer circular acotado para detectar swipes verticales.
/// Se expulsa la muestra más antigua al superar la capacidad o la edad máxima.
pub struct SwipeHistory {
    buffer: VecDeque<SwipeSample>,
    capacity: usize,
    max_age: Duration,
}

impl SwipeHistory {
    pub fn new(capacity: usize, max_age: Duration) -> Self {
        Self {
            buffer: VecDeque::with_capacity(capacity),
            capacity,
            max_age,
        }
    }

    /// Añade una muestra y descarta las que sobran
    pub fn push(&mut self, y: f32, at: Duration) {
        self.buffer.push_back(SwipeSample { y, at });

        while self.buffer.len() > self.capacity {
            self.buffer.pop_front();
        }

        while let Some(oldest) = self.buffer.front() {
            if at.saturating_sub(oldest.at) > self.max_age {
                self.buffer.pop_front();
            } else {
                break;
            }
        }
    }

    /// Desplazamiento neto (más reciente − más antigua). Positivo = hacia abajo en imagen.
    pub fn net_displacement(&self) -> Option<f32> {
        match (self.buffer.front(), self.buffer.back()) {
            (Some(oldest), Some(newest)) if self.buffer.len() >= 2 => Some(newest.y - oldest.y),
            _ => None,
        }
    }

    /// Dirección del swipe si hay suficientes muestras y el desplazamiento supera el umbral.
    /// La y de imagen crece hacia abajo: bajar la y es subir la mano.
    pub fn detect(&self, min_samples: usize, min_displacement: f32) -> Option<ScrollDirection> {
        if self.buffer.len() < min_samples {
            return None;
        }

        let delta = self.net_displacement()?;
        if delta <= -min_displacement {
            Some(ScrollDirection::Up)
        } else if delta >= min_displacement {
            Some(ScrollDirection::Down)
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    pub fn samples(&self) -> impl Iterator<Item = &SwipeSample> {
        self.buffer.iter()
    }
}
