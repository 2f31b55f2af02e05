use serde::{Deserialize, Serialize};

use crate::feature_extractor::FeatureSet;

/// Umbrales geométricos (coordenadas normalizadas del frame).
/// Son ajustables; lo único que no se puede romper es que las cotas
/// "cerradas" del radio de yemas queden por debajo de la "abierta".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Pulgar arriba: margen sobre su propia base
    pub thumb_up_base_margin: f32,
    /// Pulgar arriba: margen sobre la muñeca
    pub thumb_up_wrist_margin: f32,
    /// Pulgar abajo: margen bajo su propia base
    pub thumb_down_base_margin: f32,
    /// Pulgar abajo: margen bajo la muñeca
    pub thumb_down_wrist_margin: f32,
    /// Separación horizontal pulgar ↔ base del índice para palma abierta
    pub thumb_spread_margin: f32,
    /// Distancia máxima pulgar ↔ base del índice para considerar el pulgar recogido
    pub thumb_tuck_max_dist: f32,

    /// Garra cerrada: radio de yemas por debajo de esto
    pub claw_closed_max_radius: f32,
    /// Puño: radio de yemas por debajo de esto
    pub fist_max_radius: f32,
    /// Garra abierta: radio de yemas por encima de esto
    pub claw_open_min_radius: f32,

    /// Alcance muñeca → índice/medio mínimo para la garra cerrada
    pub closed_min_reach: f32,
    /// Alcance muñeca → índice/medio mínimo para la garra abierta
    pub open_min_reach: f32,

    /// Índice hacia abajo: yema bajo su nudillo base al menos esto
    pub point_down_margin: f32,
    /// Índice hacia abajo: longitud mínima del segmento (descarta muñones)
    pub point_down_min_length: f32,
    /// Índice hacia abajo: resto de yemas por encima de la del índice al menos esto
    pub point_down_others_margin: f32,
}

impl Thresholds {
    /// Todos los umbrales con su clave de configuración
    pub fn named_values(&self) -> [(&'static str, f32); 14] {
        [
            ("thresholds.thumb_up_base_margin", self.thumb_up_base_margin),
            ("thresholds.thumb_up_wrist_margin", self.thumb_up_wrist_margin),
            ("thresholds.thumb_down_base_margin", self.thumb_down_base_margin),
            ("thresholds.thumb_down_wrist_margin", self.thumb_down_wrist_margin),
            ("thresholds.thumb_spread_margin", self.thumb_spread_margin),
            ("thresholds.thumb_tuck_max_dist", self.thumb_tuck_max_dist),
            ("thresholds.claw_closed_max_radius", self.claw_closed_max_radius),
            ("thresholds.fist_max_radius", self.fist_max_radius),
            ("thresholds.claw_open_min_radius", self.claw_open_min_radius),
            ("thresholds.closed_min_reach", self.closed_min_reach),
            ("thresholds.open_min_reach", self.open_min_reach),
            ("thresholds.point_down_margin", self.point_down_margin),
            ("thresholds.point_down_min_length", self.point_down_min_length),
            ("thresholds.point_down_others_margin", self.point_down_others_margin),
        ]
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            thumb_up_base_margin: 0.10,
            thumb_up_wrist_margin: 0.15,
            thumb_down_base_margin: 0.05,
            thumb_down_wrist_margin: 0.0,
            thumb_spread_margin: 0.05,
            thumb_tuck_max_dist: 0.08,
            claw_closed_max_radius: 0.06,
            fist_max_radius: 0.06,
            claw_open_min_radius: 0.08,
            closed_min_reach: 0.12,
            open_min_reach: 0.15,
            point_down_margin: 0.05,
            point_down_min_length: 0.08,
            point_down_others_margin: 0.04,
        }
    }
}

/// Gesto activo en un frame. Exactamente uno por frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GestureVariant {
    #[default]
    None,
    ClawOpen,
    ClawClosed,
    ClosedFist,
    PointUp,
    PointDown,
    ThumbsUp,
    ThumbsDown,
    /// Sólo los produce el motor de debounce a partir del historial de muñeca
    SwipeUp,
    SwipeDown,
}

/// Familia de acción a la que pertenece un gesto (una cooldown por familia)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Cursor,
    Click,
    Scroll,
    Swipe,
}

impl GestureVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::ClawOpen => "claw-open",
            Self::ClawClosed => "claw-closed",
            Self::ClosedFist => "closed-fist",
            Self::PointUp => "point-up",
            Self::PointDown => "point-down",
            Self::ThumbsUp => "thumbs-up",
            Self::ThumbsDown => "thumbs-down",
            Self::SwipeUp => "swipe-up",
            Self::SwipeDown => "swipe-down",
        }
    }

    pub fn action_kind(&self) -> Option<ActionKind> {
        match self {
            Self::None => None,
            Self::ClawOpen => Some(ActionKind::Cursor),
            Self::ClawClosed | Self::ClosedFist => Some(ActionKind::Click),
            Self::PointUp | Self::PointDown | Self::ThumbsUp | Self::ThumbsDown => {
                Some(ActionKind::Scroll)
            }
            Self::SwipeUp | Self::SwipeDown => Some(ActionKind::Swipe),
        }
    }
}

impl std::fmt::Display for GestureVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type Predicate = fn(&FeatureSet, &Thresholds) -> bool;

/// Yemas juntas, los cuatro dedos recogidos y el índice y el medio lejos
/// de la muñeca. Con algún dedo extendido las yemas juntas no son click.
pub fn is_claw_closed(f: &FeatureSet, t: &Thresholds) -> bool {
    f.extended.all_curled()
        && f.cluster_radius < t.claw_closed_max_radius
        && f.index_reach > t.closed_min_reach
        && f.middle_reach > t.closed_min_reach
}

pub fn is_closed_fist(f: &FeatureSet, t: &Thresholds) -> bool {
    f.extended.all_curled()
        && f.cluster_radius < t.fist_max_radius
        && f.thumb_to_index_base < t.thumb_tuck_max_dist
}

pub fn is_point_up(f: &FeatureSet, _t: &Thresholds) -> bool {
    f.extended.index && f.index_rise > 0.0 && f.extended.others_curled()
}

pub fn is_point_down(f: &FeatureSet, t: &Thresholds) -> bool {
    f.index_drop > t.point_down_margin
        && f.index_length > t.point_down_min_length
        && f.others_above_index > t.point_down_others_margin
}

pub fn is_thumbs_up(f: &FeatureSet, _t: &Thresholds) -> bool {
    f.thumb_up && f.extended.all_curled()
}

pub fn is_thumbs_down(f: &FeatureSet, _t: &Thresholds) -> bool {
    f.thumb_down && f.extended.all_curled()
}

/// Yemas separadas y dedos visibles: descarta manos lejanas que sólo
/// parecen abiertas por estar pequeñas en el frame
pub fn is_claw_open(f: &FeatureSet, t: &Thresholds) -> bool {
    f.cluster_radius > t.claw_open_min_radius
        && f.index_reach > t.open_min_reach
        && f.middle_reach > t.open_min_reach
}

/// Orden de evaluación. Los predicados se solapan: el primero que se cumple gana.
pub const PRIORITY: [(GestureVariant, Predicate); 7] = [
    (GestureVariant::ClawClosed, is_claw_closed),
    (GestureVariant::ClosedFist, is_closed_fist),
    (GestureVariant::PointUp, is_point_up),
    (GestureVariant::PointDown, is_point_down),
    (GestureVariant::ThumbsUp, is_thumbs_up),
    (GestureVariant::ThumbsDown, is_thumbs_down),
    (GestureVariant::ClawOpen, is_claw_open),
];

/// Clasificador por reglas: función pura, total y determinista
#[derive(Debug, Clone, Default)]
pub struct GestureClassifier {
    thresholds: Thresholds,
}

impl GestureClassifier {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn classify(&self, features: &FeatureSet) -> GestureVariant {
        PRIORITY
            .iter()
            .find(|(_, predicate)| predicate(features, &self.thresholds))
            .map(|(variant, _)| *variant)
            .unwrap_or(GestureVariant::None)
    }
}
