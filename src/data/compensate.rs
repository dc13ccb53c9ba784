use super::error::ReferenceNotFound;
use super::model::{CompensationResult, MeasurementSet, Sweep};

/// Reflection loss in dB for a given S11 (dB).
///
/// `10 * log10(1 - 10^(s11/10))`: `-inf` at `s11 == 0`, NaN above it.
pub fn reflection_loss_db(s11_db: f64) -> f64 {
    10.0 * (1.0 - 10f64.powf(s11_db / 10.0)).log10()
}

/// De-embed `sweep` against `reference`, index by index.
///
/// Evaluates `ref_s21 - ref_loss - s21 + loss` as
/// `(ref_s21 - s21) + (loss - ref_loss)` so a sweep compensated against
/// itself comes out exactly zero. The curve is as long as the shorter of
/// the two sweeps.
pub fn compensate_sweep(reference: &Sweep, sweep: &Sweep) -> Vec<f64> {
    reference
        .points
        .iter()
        .zip(&sweep.points)
        .map(|(r, p)| {
            (r.s21_db - p.s21_db) + (reflection_loss_db(p.s11_db) - reflection_loss_db(r.s11_db))
        })
        .collect()
}

/// Compensate every sweep of `set` (the reference included) against the
/// sweep labelled `reference`.
///
/// The label is trimmed first; a blank or unknown label fails without
/// producing any curve.
pub fn compensate(
    set: &MeasurementSet,
    reference: &str,
) -> Result<CompensationResult, ReferenceNotFound> {
    let label = reference.trim();
    let ref_sweep = set.get(label).ok_or_else(|| ReferenceNotFound {
        label: label.to_string(),
    })?;

    let curves: Vec<(String, Vec<f64>)> = set
        .sweeps()
        .iter()
        .map(|sweep| {
            if sweep.len() != ref_sweep.len() {
                log::debug!(
                    "'{}' has {} points, reference '{}' has {}; truncating",
                    sweep.label,
                    sweep.len(),
                    label,
                    ref_sweep.len()
                );
            }
            (sweep.label.clone(), compensate_sweep(ref_sweep, sweep))
        })
        .collect();

    Ok(CompensationResult {
        reference: label.to_string(),
        curves,
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::data::model::SweepPoint;

    fn sweep(label: &str, data: &[(f64, f64)]) -> Sweep {
        Sweep::new(
            label,
            data.iter()
                .enumerate()
                .map(|(i, &(s11_db, s21_db))| SweepPoint {
                    frequency_hz: 1e9 * (i + 1) as f64,
                    s11_db,
                    s21_db,
                })
                .collect(),
        )
    }

    /// Baseline `s21 - loss(s11)` per reference point, the textbook form
    /// the compensated curve must agree with.
    fn reference_curve(reference: &Sweep) -> Vec<f64> {
        reference
            .points
            .iter()
            .map(|p| p.s21_db - reflection_loss_db(p.s11_db))
            .collect()
    }

    fn set(sweeps: Vec<Sweep>) -> MeasurementSet {
        let mut set = MeasurementSet::new();
        for s in sweeps {
            set.insert(s);
        }
        set
    }

    #[test]
    fn test_reflection_loss_values() {
        // -10 dB S11 reflects 10% of the power.
        assert_relative_eq!(reflection_loss_db(-10.0), 10.0 * 0.9f64.log10(), epsilon = 1e-12);
        assert!(reflection_loss_db(-200.0).abs() < 1e-15);
    }

    #[test]
    fn test_reflection_loss_boundary() {
        let at_zero = reflection_loss_db(0.0);
        assert!(at_zero.is_infinite() && at_zero.is_sign_negative());
        assert!(reflection_loss_db(0.5).is_nan());
    }

    #[test]
    fn test_reference_curve() {
        let r = sweep("ref", &[(-10.0, -3.0)]);
        let curve = reference_curve(&r);
        assert_relative_eq!(curve[0], -3.0 - reflection_loss_db(-10.0), epsilon = 1e-12);
    }

    #[test]
    fn test_self_compensation_is_zero() {
        let r = sweep("ref", &[(-10.0, -3.0), (-17.3, -0.71), (-3.1, -9.9)]);
        let s = set(vec![r]);
        let result = compensate(&s, "ref").unwrap();
        for v in result.get("ref").unwrap() {
            assert_eq!(*v, 0.0);
        }
    }

    #[test]
    fn test_compensation_formula() {
        let r = sweep("ref", &[(-10.0, -1.0), (-20.0, -2.0)]);
        let d = sweep("dut", &[(-15.0, -4.0), (-25.0, -6.0)]);
        let s = set(vec![r.clone(), d.clone()]);
        let result = compensate(&s, "ref").unwrap();
        let refs = reference_curve(&r);

        let curve = result.get("dut").unwrap();
        for (i, p) in d.points.iter().enumerate() {
            let expected = refs[i] - p.s21_db + reflection_loss_db(p.s11_db);
            assert_relative_eq!(curve[i], expected, epsilon = 1e-12);
        }
        assert_eq!(result.non_reference().map(|(l, _)| l).collect::<Vec<_>>(), vec!["dut"]);
    }

    #[test]
    fn test_shorter_sweep_gives_shorter_curve() {
        let r = sweep("ref", &[(-10.0, -1.0), (-10.0, -1.0), (-10.0, -1.0)]);
        let short = sweep("short", &[(-10.0, -2.0)]);
        let s = set(vec![r, short]);
        let result = compensate(&s, "ref").unwrap();
        assert_eq!(result.get("short").unwrap().len(), 1);
        assert_eq!(result.get("ref").unwrap().len(), 3);

        // A short reference truncates the longer sweeps too.
        let result = compensate(&s, "short").unwrap();
        assert_eq!(result.get("ref").unwrap().len(), 1);
        assert_relative_eq!(result.get("ref").unwrap()[0], -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_nan_propagates() {
        let r = sweep("ref", &[(-10.0, -1.0), (-10.0, -1.0)]);
        let d = sweep("dut", &[(1.0, -2.0), (0.0, -2.0)]);
        let s = set(vec![r, d]);
        let curve = compensate(&s, "ref").unwrap().get("dut").unwrap().to_vec();
        assert!(curve[0].is_nan());
        assert!(curve[1].is_infinite() && curve[1].is_sign_negative());
    }

    #[test]
    fn test_missing_reference() {
        let s = set(vec![sweep("a", &[(-10.0, -1.0)])]);
        assert_eq!(
            compensate(&s, "b"),
            Err(ReferenceNotFound { label: "b".into() })
        );
        assert!(compensate(&s, "   ").is_err());
        assert!(compensate(&MeasurementSet::new(), "").is_err());
    }

    #[test]
    fn test_reference_label_is_trimmed() {
        let s = set(vec![sweep("a", &[(-10.0, -1.0)])]);
        let result = compensate(&s, "  a ").unwrap();
        assert_eq!(result.reference, "a");
    }
}
