//! Electrical arcs from the pacing device, only for anomalous readings

use super::circuitry::{DEVICE_OFFSET, DEVICE_SIZE};
use super::{LayerRenderer, RenderContext};
use crate::rng::SequenceState;

pub struct AnomalySparks;

impl AnomalySparks {
    /// One spark per 8 units of deviation, at least 3
    pub fn spark_count(deviation: f64, cap: usize) -> usize {
        let scaled = (deviation.max(0.0) / 8.0) as usize;
        scaled.max(3).min(cap)
    }
}

impl LayerRenderer for AnomalySparks {
    fn id(&self) -> &'static str {
        "anomaly-sparks"
    }

    fn render(&self, ctx: &RenderContext<'_>, rng: &mut SequenceState) -> String {
        let c = ctx.classification;
        if !c.is_anomalous {
            return String::new();
        }

        let count = Self::spark_count(c.deviation, ctx.config.spark_cap);
        let dev_x = ctx.cx() + DEVICE_OFFSET.0 + DEVICE_SIZE.0 / 2.0;
        let dev_y = ctx.cy() + DEVICE_OFFSET.1 + DEVICE_SIZE.1 / 2.0;

        let mut parts = vec![format!(
            r#"<g id="anomaly-sparks" data-deviation="{:.1}">"#,
            c.deviation
        )];
        for _ in 0..count {
            let (mut px, mut py) = (dev_x, dev_y);
            let mut points = vec![format!("{:.1},{:.1}", px, py)];
            let segments = 4 + (rng.draw() * 5.0) as usize;
            for _ in 0..segments {
                // biased downward, away from the device
                px += (rng.draw() - 0.5) * 80.0;
                py += (rng.draw() - 0.3) * 60.0;
                points.push(format!("{:.1},{:.1}", px, py));
            }
            let opacity = 0.3 + rng.draw() * 0.5;
            parts.push(format!(
                r#"  <polyline points="{}" fill="none" stroke="{}" stroke-width="0.8" opacity="{:.2}" filter="url(#glow)"/>"#,
                points.join(" "),
                ctx.palette.pulse,
                opacity
            ));
        }
        parts.push("</g>".to_string());
        parts.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::fixtures::{calm_history, Fixture};
    use heart_core::BiometricSample;

    #[test]
    fn test_spark_count_bounds() {
        assert_eq!(AnomalySparks::spark_count(0.0, 12), 3);
        assert_eq!(AnomalySparks::spark_count(26.0, 12), 3);
        assert_eq!(AnomalySparks::spark_count(40.0, 12), 5);
        assert_eq!(AnomalySparks::spark_count(89.0, 12), 11);
        assert_eq!(AnomalySparks::spark_count(10_000.0, 12), 12);
    }

    #[test]
    fn test_sparks_only_when_anomalous() {
        let calm = Fixture::new(BiometricSample::new(72, 10).with_history(calm_history()));
        assert!(AnomalySparks.render(&calm.ctx(), &mut SequenceState::new("s")).is_empty());

        let spiking = Fixture::new(BiometricSample::new(160, 10).with_history(calm_history()));
        let svg = AnomalySparks.render(&spiking.ctx(), &mut SequenceState::new("s"));
        assert!(svg.starts_with(r#"<g id="anomaly-sparks""#));
        assert_eq!(svg.matches("<polyline").count(), 11);
    }
}
