use crate::gesture_classifier::Thresholds;
use crate::types::{LandmarkRole as R, Point, PoseSample};

/// Flags de extensión de los cuatro dedos largos
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FingerFlags {
    pub index: bool,
    pub middle: bool,
    pub ring: bool,
    pub pinky: bool,
}

impl FingerFlags {
    pub fn all_extended(&self) -> bool {
        self.index && self.middle && self.ring && self.pinky
    }

    pub fn all_curled(&self) -> bool {
        !self.index && !self.middle && !self.ring && !self.pinky
    }

    /// Medio, anular y meñique recogidos (el índice no importa)
    pub fn others_curled(&self) -> bool {
        !self.middle && !self.ring && !self.pinky
    }
}

/// Magnitudes derivadas de una `PoseSample`. Sin memoria entre frames.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FeatureSet {
    pub extended: FingerFlags,
    /// Distancia media de las cinco yemas a su centroide
    pub cluster_radius: f32,
    pub thumb_up: bool,
    pub thumb_down: bool,
    /// Pulgar separado horizontalmente de la base del índice
    pub thumb_spread: bool,
    /// Distancia yema del pulgar → base del índice
    pub thumb_to_index_base: f32,
    /// Distancia muñeca → yema del índice
    pub index_reach: f32,
    /// Distancia muñeca → yema del medio
    pub middle_reach: f32,
    /// Cuánto está la yema del índice por encima de la muñeca (positivo = arriba)
    pub index_rise: f32,
    /// Cuánto está la yema del índice por debajo de su nudillo base (positivo = abajo)
    pub index_drop: f32,
    /// Longitud del segmento nudillo base → yema del índice
    pub index_length: f32,
    /// Margen mínimo con el que medio, anular y meñique quedan por encima de la yema del índice
    pub others_above_index: f32,
    /// Palma abierta para swipe: cuatro dedos extendidos y pulgar separado
    pub open_palm: bool,
    /// Punto de seguimiento del cursor (nudillo base del índice)
    pub tracking_point: Point,
    pub wrist: Point,
}

/// Un dedo está extendido si la yema queda por encima de su articulación media
pub fn is_finger_extended(tip: Point, pip: Point) -> bool {
    tip.y < pip.y
}

/// Distancia media de las yemas a su centroide
pub fn cluster_radius(tips: &[Point; 5]) -> f32 {
    let n = tips.len() as f32;
    let cx = tips.iter().map(|p| p.x).sum::<f32>() / n;
    let cy = tips.iter().map(|p| p.y).sum::<f32>() / n;
    let centroid = Point::new(cx, cy);

    tips.iter().map(|p| p.distance(centroid)).sum::<f32>() / n
}

#[derive(Debug, Clone, Default)]
pub struct FeatureExtractor {
    thresholds: Thresholds,
}

impl FeatureExtractor {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    /// Función pura: pose → features
    pub fn extract(&self, pose: &PoseSample) -> FeatureSet {
        let t = &self.thresholds;

        let wrist = pose.get(R::Wrist);
        let thumb_tip = pose.get(R::ThumbTip);
        let thumb_mcp = pose.get(R::ThumbMcp);
        let index_tip = pose.get(R::IndexTip);
        let index_mcp = pose.get(R::IndexMcp);
        let middle_tip = pose.get(R::MiddleTip);
        let ring_tip = pose.get(R::RingTip);
        let pinky_tip = pose.get(R::PinkyTip);

        let extended = FingerFlags {
            index: is_finger_extended(index_tip, pose.get(R::IndexPip)),
            middle: is_finger_extended(middle_tip, pose.get(R::MiddlePip)),
            ring: is_finger_extended(ring_tip, pose.get(R::RingPip)),
            pinky: is_finger_extended(pinky_tip, pose.get(R::PinkyPip)),
        };

        // Dos márgenes independientes para descartar pulgares casi horizontales
        let thumb_up = thumb_tip.y < thumb_mcp.y - t.thumb_up_base_margin
            && thumb_tip.y < wrist.y - t.thumb_up_wrist_margin;
        let thumb_down = thumb_tip.y > thumb_mcp.y + t.thumb_down_base_margin
            && thumb_tip.y > wrist.y + t.thumb_down_wrist_margin;

        let thumb_spread = (thumb_tip.x - index_mcp.x).abs() > t.thumb_spread_margin;

        let others_above_index = [middle_tip, ring_tip, pinky_tip]
            .iter()
            .map(|tip| index_tip.y - tip.y)
            .fold(f32::INFINITY, f32::min);

        FeatureSet {
            extended,
            cluster_radius: cluster_radius(&[thumb_tip, index_tip, middle_tip, ring_tip, pinky_tip]),
            thumb_up,
            thumb_down,
            thumb_spread,
            thumb_to_index_base: thumb_tip.distance(index_mcp),
            index_reach: wrist.distance(index_tip),
            middle_reach: wrist.distance(middle_tip),
            index_rise: wrist.y - index_tip.y,
            index_drop: index_tip.y - index_mcp.y,
            index_length: index_tip.distance(index_mcp),
            others_above_index,
            open_palm: extended.all_extended() && thumb_spread,
            tracking_point: index_mcp,
            wrist,
        }
    }
}

/// Poses sintéticas para tests (coordenadas normalizadas, y hacia abajo)
#[cfg(test)]
pub(crate) mod fixtures {
    use crate::types::{Landmark, LandmarkRole as R, Point, PoseSample};

    fn sample(points: &[(R, f32, f32)]) -> PoseSample {
        PoseSample::from_landmarks(points.iter().map(|&(role, x, y)| (role, Landmark::new(x, y))))
            .unwrap()
    }

    /// Mano abierta en garra: yemas separadas y lejos de la muñeca
    pub fn claw_open() -> PoseSample {
        sample(&[
            (R::Wrist, 0.50, 0.80),
            (R::ThumbMcp, 0.40, 0.72),
            (R::ThumbIp, 0.32, 0.68),
            (R::ThumbTip, 0.26, 0.66),
            (R::IndexMcp, 0.44, 0.58),
            (R::IndexPip, 0.42, 0.48),
            (R::IndexTip, 0.40, 0.40),
            (R::MiddlePip, 0.50, 0.46),
            (R::MiddleTip, 0.50, 0.36),
            (R::RingPip, 0.58, 0.48),
            (R::RingTip, 0.60, 0.39),
            (R::PinkyPip, 0.64, 0.54),
            (R::PinkyTip, 0.68, 0.46),
        ])
    }

    /// Garra cerrada: yemas juntas, dedos aún visibles
    pub fn claw_closed() -> PoseSample {
        sample(&[
            (R::Wrist, 0.50, 0.80),
            (R::ThumbMcp, 0.42, 0.70),
            (R::ThumbIp, 0.44, 0.62),
            (R::ThumbTip, 0.48, 0.56),
            (R::IndexMcp, 0.46, 0.62),
            (R::IndexPip, 0.46, 0.52),
            (R::IndexTip, 0.49, 0.54),
            (R::MiddlePip, 0.51, 0.50),
            (R::MiddleTip, 0.51, 0.53),
            (R::RingPip, 0.55, 0.52),
            (R::RingTip, 0.53, 0.55),
            (R::PinkyPip, 0.58, 0.56),
            (R::PinkyTip, 0.52, 0.57),
        ])
    }

    /// Puño cerrado con el pulgar recogido sobre la base del índice
    pub fn closed_fist() -> PoseSample {
        sample(&[
            (R::Wrist, 0.50, 0.76),
            (R::ThumbMcp, 0.42, 0.72),
            (R::ThumbIp, 0.43, 0.67),
            (R::ThumbTip, 0.46, 0.64),
            (R::IndexMcp, 0.46, 0.62),
            (R::IndexPip, 0.46, 0.60),
            (R::IndexTip, 0.47, 0.66),
            (R::MiddlePip, 0.50, 0.59),
            (R::MiddleTip, 0.50, 0.66),
            (R::RingPip, 0.54, 0.60),
            (R::RingTip, 0.54, 0.67),
            (R::PinkyPip, 0.58, 0.63),
            (R::PinkyTip, 0.57, 0.68),
        ])
    }

    /// Puño con el pulgar apuntando hacia arriba
    pub fn thumbs_up() -> PoseSample {
        closed_fist()
            .with(R::ThumbIp, Point::new(0.40, 0.56))
            .with(R::ThumbTip, Point::new(0.40, 0.46))
    }

    /// Puño girado con el pulgar apuntando hacia abajo
    pub fn thumbs_down() -> PoseSample {
        sample(&[
            (R::Wrist, 0.50, 0.50),
            (R::ThumbMcp, 0.45, 0.60),
            (R::ThumbIp, 0.44, 0.70),
            (R::ThumbTip, 0.44, 0.80),
            (R::IndexMcp, 0.50, 0.62),
            (R::IndexPip, 0.52, 0.60),
            (R::IndexTip, 0.52, 0.64),
            (R::MiddlePip, 0.55, 0.59),
            (R::MiddleTip, 0.55, 0.63),
            (R::RingPip, 0.58, 0.60),
            (R::RingTip, 0.58, 0.64),
            (R::PinkyPip, 0.61, 0.61),
            (R::PinkyTip, 0.61, 0.65),
        ])
    }

    /// Índice extendido hacia arriba, resto recogido
    pub fn point_up() -> PoseSample {
        closed_fist()
            .with(R::IndexPip, Point::new(0.46, 0.50))
            .with(R::IndexTip, Point::new(0.46, 0.40))
    }

    /// Mano invertida con el índice apuntando hacia abajo
    pub fn point_down() -> PoseSample {
        sample(&[
            (R::Wrist, 0.50, 0.30),
            (R::ThumbMcp, 0.44, 0.36),
            (R::ThumbIp, 0.42, 0.40),
            (R::ThumbTip, 0.44, 0.44),
            (R::IndexMcp, 0.48, 0.45),
            (R::IndexPip, 0.48, 0.55),
            (R::IndexTip, 0.48, 0.65),
            (R::MiddlePip, 0.53, 0.50),
            (R::MiddleTip, 0.53, 0.46),
            (R::RingPip, 0.57, 0.49),
            (R::RingTip, 0.57, 0.45),
            (R::PinkyPip, 0.60, 0.46),
            (R::PinkyTip, 0.60, 0.42),
        ])
    }

    /// Mano relajada que no coincide con ningún gesto
    pub fn neutral() -> PoseSample {
        sample(&[
            (R::Wrist, 0.50, 0.80),
            (R::ThumbMcp, 0.44, 0.74),
            (R::ThumbIp, 0.42, 0.70),
            (R::ThumbTip, 0.42, 0.66),
            (R::IndexMcp, 0.46, 0.66),
            (R::IndexPip, 0.46, 0.60),
            (R::IndexTip, 0.46, 0.62),
            (R::MiddlePip, 0.50, 0.60),
            (R::MiddleTip, 0.50, 0.56),
            (R::RingPip, 0.54, 0.61),
            (R::RingTip, 0.54, 0.64),
            (R::PinkyPip, 0.58, 0.64),
            (R::PinkyTip, 0.58, 0.67),
        ])
    }

    /// Desplaza la pose entera (traslación rígida)
    pub fn shifted(pose: PoseSample, dx: f32, dy: f32) -> PoseSample {
        R::ALL.iter().fold(pose, |acc, &role| {
            let p = acc.get(role);
            acc.with(role, Point::new(p.x + dx, p.y + dy))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::types::LandmarkRole as R;

    fn extract(pose: &PoseSample) -> FeatureSet {
        FeatureExtractor::default().extract(pose)
    }

    #[test]
    fn test_extension_compares_tip_with_pip() {
        assert!(is_finger_extended(Point::new(0.5, 0.3), Point::new(0.5, 0.4)));
        assert!(!is_finger_extended(Point::new(0.5, 0.5), Point::new(0.5, 0.4)));
        // Empate: no extendido
        assert!(!is_finger_extended(Point::new(0.5, 0.4), Point::new(0.5, 0.4)));
    }

    #[test]
    fn test_cluster_radius_of_coincident_tips_is_zero() {
        let p = Point::new(0.3, 0.7);
        assert_eq!(cluster_radius(&[p; 5]), 0.0);
    }

    #[test]
    fn test_cluster_radius_is_mean_distance_to_centroid() {
        let tips = [
            Point::new(0.0, 0.1),
            Point::new(0.0, -0.1),
            Point::new(0.1, 0.0),
            Point::new(-0.1, 0.0),
            Point::new(0.0, 0.0),
        ];
        let r = cluster_radius(&tips);
        assert!((r - 0.08).abs() < 1e-6, "radius {r}");
    }

    #[test]
    fn test_cluster_radius_ignores_translation() {
        let a = extract(&claw_open()).cluster_radius;
        let b = extract(&shifted(claw_open(), 0.2, -0.1)).cluster_radius;
        assert!((a - b).abs() < 1e-5);
    }

    #[test]
    fn test_open_claw_features() {
        let f = extract(&claw_open());
        assert!(f.extended.all_extended());
        assert!(f.open_palm);
        assert!(f.cluster_radius > 0.08);
        assert!(f.index_reach > 0.15 && f.middle_reach > 0.15);
        assert!(!f.thumb_up && !f.thumb_down);
        assert_eq!(f.tracking_point, Point::new(0.44, 0.58));
    }

    #[test]
    fn test_fist_has_tight_cluster_and_tucked_thumb() {
        let f = extract(&closed_fist());
        assert!(f.extended.all_curled());
        assert!(f.cluster_radius < 0.06);
        assert!(f.thumb_to_index_base < 0.08);
        assert!(!f.open_palm);
    }

    #[test]
    fn test_thumb_orientation_needs_both_margins() {
        assert!(extract(&thumbs_up()).thumb_up);
        assert!(extract(&thumbs_down()).thumb_down);

        // Pulgar sobre su base pero no lo bastante sobre la muñeca
        let shallow = closed_fist().with(R::ThumbTip, Point::new(0.40, 0.615));
        let f = extract(&shallow);
        assert!(!f.thumb_up);
    }

    #[test]
    fn test_point_down_geometry() {
        let f = extract(&point_down());
        assert!(f.index_drop > 0.05);
        assert!(f.index_length > 0.08);
        assert!(f.others_above_index > 0.04);
    }
}
