use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Número de puntos que entrega un detector de mano tipo MediaPipe
pub const MEDIAPIPE_LANDMARKS: usize = 21;

/// Número de roles que usa el núcleo (ver `LandmarkRole`)
pub const ROLE_COUNT: usize = 13;

/// Punto 2D en coordenadas normalizadas del frame (y crece hacia abajo)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Distancia euclídea
    pub fn distance(self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Un landmark tal como lo entrega el proveedor de poses.
/// La confianza es opcional: el proveedor ya filtró por confianza mínima.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<f32>,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            visibility: None,
        }
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Rol semántico de cada punto de la mano que lee el núcleo.
/// La identidad es por rol, no por índice del detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LandmarkRole {
    Wrist,
    ThumbTip,
    ThumbIp,
    ThumbMcp,
    IndexTip,
    IndexPip,
    IndexMcp,
    MiddleTip,
    MiddlePip,
    RingTip,
    RingPip,
    PinkyTip,
    PinkyPip,
}

impl LandmarkRole {
    pub const ALL: [LandmarkRole; ROLE_COUNT] = [
        LandmarkRole::Wrist,
        LandmarkRole::ThumbTip,
        LandmarkRole::ThumbIp,
        LandmarkRole::ThumbMcp,
        LandmarkRole::IndexTip,
        LandmarkRole::IndexPip,
        LandmarkRole::IndexMcp,
        LandmarkRole::MiddleTip,
        LandmarkRole::MiddlePip,
        LandmarkRole::RingTip,
        LandmarkRole::RingPip,
        LandmarkRole::PinkyTip,
        LandmarkRole::PinkyPip,
    ];

    /// Posición dentro de `PoseSample`
    pub fn slot(self) -> usize {
        self as usize
    }

    /// Índice del mismo punto en la topología de 21 puntos de MediaPipe
    pub fn mediapipe_index(self) -> usize {
        match self {
            LandmarkRole::Wrist => 0,
            LandmarkRole::ThumbMcp => 2,
            LandmarkRole::ThumbIp => 3,
            LandmarkRole::ThumbTip => 4,
            LandmarkRole::IndexMcp => 5,
            LandmarkRole::IndexPip => 6,
            LandmarkRole::IndexTip => 8,
            LandmarkRole::MiddlePip => 10,
            LandmarkRole::MiddleTip => 12,
            LandmarkRole::RingPip => 14,
            LandmarkRole::RingTip => 16,
            LandmarkRole::PinkyPip => 18,
            LandmarkRole::PinkyTip => 20,
        }
    }

    /// Inverso de `mediapipe_index`; los puntos que el núcleo no usa dan `None`
    pub fn from_mediapipe_index(index: usize) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|role| role.mediapipe_index() == index)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LandmarkRole::Wrist => "wrist",
            LandmarkRole::ThumbTip => "thumb_tip",
            LandmarkRole::ThumbIp => "thumb_ip",
            LandmarkRole::ThumbMcp => "thumb_mcp",
            LandmarkRole::IndexTip => "index_tip",
            LandmarkRole::IndexPip => "index_pip",
            LandmarkRole::IndexMcp => "index_mcp",
            LandmarkRole::MiddleTip => "middle_tip",
            LandmarkRole::MiddlePip => "middle_pip",
            LandmarkRole::RingTip => "ring_tip",
            LandmarkRole::RingPip => "ring_pip",
            LandmarkRole::PinkyTip => "pinky_tip",
            LandmarkRole::PinkyPip => "pinky_pip",
        }
    }
}

impl std::fmt::Display for LandmarkRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PoseError {
    #[error("Missing landmark: {0}")]
    MissingLandmark(LandmarkRole),

    #[error("Expected {expected} landmarks, got {actual}")]
    TooFewLandmarks { expected: usize, actual: usize },
}

/// Pose de una mano para un frame. Inmutable y siempre completa:
/// una muestra a la que le falta algún rol no se puede construir.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseSample {
    points: [Point; ROLE_COUNT],
}

impl PoseSample {
    /// Construye una muestra a partir de pares (rol, landmark).
    /// Si un rol aparece dos veces gana el último.
    pub fn from_landmarks<I>(landmarks: I) -> Result<Self, PoseError>
    where
        I: IntoIterator<Item = (LandmarkRole, Landmark)>,
    {
        let mut slots: [Option<Point>; ROLE_COUNT] = [None; ROLE_COUNT];
        for (role, landmark) in landmarks {
            slots[role.slot()] = Some(landmark.point());
        }

        let mut points = [Point::default(); ROLE_COUNT];
        for role in LandmarkRole::ALL {
            points[role.slot()] = slots[role.slot()].ok_or(PoseError::MissingLandmark(role))?;
        }

        Ok(Self { points })
    }

    /// Construye una muestra desde los 21 puntos de MediaPipe en su orden nativo
    pub fn from_mediapipe(landmarks: &[Landmark]) -> Result<Self, PoseError> {
        if landmarks.len() < MEDIAPIPE_LANDMARKS {
            return Err(PoseError::TooFewLandmarks {
                expected: MEDIAPIPE_LANDMARKS,
                actual: landmarks.len(),
            });
        }

        Self::from_landmarks(
            LandmarkRole::ALL
                .iter()
                .map(|&role| (role, landmarks[role.mediapipe_index()])),
        )
    }

    pub fn get(&self, role: LandmarkRole) -> Point {
        self.points[role.slot()]
    }

    /// Copia de la muestra con un rol reemplazado (útil para fixtures)
    pub fn with(mut self, role: LandmarkRole, point: Point) -> Self {
        self.points[role.slot()] = point;
        self
    }
}

/// Dirección de scroll. Convención de rueda: arriba es positivo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollDirection {
    Up,
    Down,
}

impl ScrollDirection {
    pub fn sign(self) -> i32 {
        match self {
            ScrollDirection::Up => 1,
            ScrollDirection::Down => -1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ScrollDirection::Up => "up",
            ScrollDirection::Down => "down",
        }
    }
}
