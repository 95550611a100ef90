use super::*;

fn gains_of(curve: &[BandGain]) -> Vec<f64> {
    curve.iter().map(|p| p.gain).collect()
}

#[test]
fn unity_snap_applies_within_tolerance() {
    let mut c = CurveController::new(3);
    assert_eq!(c.set_gain(0, 0.97), 1.0);
    assert_eq!(c.set_gain(1, 1.04), 1.0);
    assert_eq!(c.set_gain(2, 0.90), 0.90);
    assert_eq!(c.gains(), &[1.0, 1.0, 0.90]);
}

#[test]
fn set_gain_clamps_to_range() {
    let mut c = CurveController::new(2);
    assert_eq!(c.set_gain(0, -3.0), 0.0);
    assert_eq!(c.set_gain(1, 42.0), 10.0);
}

#[test]
#[should_panic(expected = "out of range")]
fn set_gain_out_of_range_index_panics() {
    let mut c = CurveController::new(3);
    c.set_gain(3, 2.0);
}

#[test]
#[should_panic(expected = "NaN")]
fn set_gain_nan_panics() {
    let mut c = CurveController::new(3);
    c.set_gain(0, f64::NAN);
}

#[test]
fn resize_resets_prior_edits() {
    let mut c = CurveController::new(5);
    c.set_gain(0, 3.0);
    c.set_gain(4, 7.5);
    assert_eq!(c.resize(3), 3);
    assert_eq!(c.gains(), &[1.0, 1.0, 1.0]);
}

#[test]
fn resize_clamps_to_configured_bounds() {
    let mut c = CurveController::new(5);
    assert_eq!(c.resize(0), 1);
    assert_eq!(c.resize(99), MAX_CONTROLS);

    let mut strict = CurveController::with_min_controls(3, 5).unwrap();
    assert_eq!(strict.resize(1), 3);
    assert_eq!(strict.len(), 3);

    assert!(CurveController::with_min_controls(0, 5).is_err());
    assert!(CurveController::with_min_controls(11, 5).is_err());
}

#[test]
fn revision_moves_on_every_mutation() {
    let mut c = CurveController::new(3);
    let r0 = c.revision();
    c.set_gain(1, 2.0);
    let r1 = c.revision();
    c.resize(4);
    assert!(r0 < r1 && r1 < c.revision());
}

#[test]
fn derive_curve_interpolates_between_controls() {
    let c = CurveController::from_gains(&[0.0, 10.0, 0.0]).unwrap();
    assert_eq!(c.control_abscissas(5), vec![0.0, 2.0, 4.0]);
    let curve = c.derive_curve(5);
    assert_eq!(gains_of(&curve), vec![0.0, 5.0, 10.0, 5.0, 0.0]);
    assert_eq!(
        curve.iter().map(|p| p.band).collect::<Vec<_>>(),
        vec![0, 1, 2, 3, 4]
    );
}

#[test]
fn single_control_is_constant_across_bands() {
    let c = CurveController::from_gains(&[4.2]).unwrap();
    let curve = c.derive_curve(5);
    assert_eq!(
        curve,
        (0..5)
            .map(|band| BandGain { band, gain: 4.2 })
            .collect::<Vec<_>>()
    );
}

#[test]
fn unknown_band_count_falls_back_to_control_count() {
    let c = CurveController::from_gains(&[2.0, 3.0, 4.0]).unwrap();
    assert_eq!(gains_of(&c.derive_curve(0)), vec![2.0, 3.0, 4.0]);
}

#[test]
fn derive_curve_keeps_length_and_boundaries() {
    for n in 1..=MAX_CONTROLS {
        let gains: Vec<f64> = (0..n).map(|i| (i as f64 * 1.7) % 10.0).collect();
        let c = CurveController::from_gains(&gains).unwrap();
        for nb in [1usize, 2, 7, 16, 33] {
            let curve = c.derive_curve(nb);
            assert_eq!(curve.len(), nb);
            assert_eq!(curve[0].gain, c.gains()[0]);
            if n == 1 || nb > 1 {
                assert_eq!(curve[nb - 1].gain, *c.gains().last().unwrap());
            }
        }
    }
}

#[test]
fn derive_curve_is_idempotent() {
    let c = CurveController::from_gains(&[0.3, 9.1, 2.2, 6.6]).unwrap();
    let a = c.derive_curve(13);
    let b = c.derive_curve(13);
    let bits = |v: &[BandGain]| v.iter().map(|p| p.gain.to_bits()).collect::<Vec<_>>();
    assert_eq!(bits(&a), bits(&b));
}

#[test]
fn serialize_uses_three_decimals() {
    let c = CurveController::from_gains(&[1.0, 2.5, 0.333]).unwrap();
    let payload = c.serialize();
    assert_eq!(payload.gains_csv, "1.000,2.500,0.333");
    assert_eq!(payload.n_controls, 3);

    let flat = CurveController::new(4).serialize();
    assert_eq!(flat.gains_csv.split(',').count(), 4);
    assert!(
        flat.gains_csv
            .split(',')
            .all(|f| f.split_once('.').is_some_and(|(_, d)| d.len() == 3))
    );
}

#[test]
fn parse_csv_reads_serialized_payload() {
    let c = CurveController::parse_csv("0.000, 10.000,0.970").unwrap();
    assert_eq!(c.gains(), &[0.0, 10.0, 1.0]);
    assert!(CurveController::parse_csv("1.0,abc").is_err());
    assert!(CurveController::parse_csv("").is_err());
    assert!(CurveController::from_gains(&[1.0; 11]).is_err());
    assert!(CurveController::from_gains(&[f64::INFINITY]).is_err());
}

#[test]
fn negative_zero_serializes_as_plain_zero() {
    let mut c = CurveController::new(2);
    assert_eq!(c.set_gain(0, -0.0).to_bits(), 0.0f64.to_bits());
    assert_eq!(c.serialize().gains_csv, "0.000,1.000");

    let parsed = CurveController::parse_csv("-0,1").unwrap();
    assert_eq!(parsed.serialize().gains_csv, "0.000,1.000");
    assert_eq!(snap_gain(-3.0).to_bits(), 0.0f64.to_bits());
}
