use std::fs;
use std::path::PathBuf;

use approx::assert_abs_diff_eq;
use s21_compensator::data::compensate::{compensate, reflection_loss_db};
use s21_compensator::data::export::export_to_path;
use s21_compensator::data::extract::ExtractConfig;
use s21_compensator::data::loader::load_paths;
use s21_compensator::data::model::FileOutcome;

const REFERENCE: &str = "\
!Agilent Technologies,E5071C
!Date: Tuesday
BEGIN
Freq(Hz),S11 Log Mag(dB),S21 Log Mag(dB)
1000000000,-20,-0.50
2000000000,-18,-0.75
3000000000,-16,-1.00
END
";

const DUT_PLAIN: &str = r#"# exported
# calibration: full 2-port
# averaging 16
# IF bandwidth 1 kHz
#
Frequency [Hz],"dB(S(2,1))","dB(S(1,1))"
1000000000,-3.0,-10
2000000000,-4.5,-9
3000000000,-6.0,-8
"#;

const DUT_SHORT: &str = "\
BEGIN
Freq,S11,S21
1000000000,-12,-2
END
";

fn write(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_load_compensate_export_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let paths = vec![
        write(&dir, "ref.csv", REFERENCE),
        write(&dir, "dut_plain.csv", DUT_PLAIN),
        write(&dir, "dut_short.csv", DUT_SHORT),
        dir.path().join("missing.csv"),
    ];

    let report = load_paths(&paths, &ExtractConfig::default());
    let outcomes: Vec<&FileOutcome> = report.files.iter().map(|(_, o)| o).collect();
    assert_eq!(
        report.files.iter().map(|(l, _)| l.as_str()).collect::<Vec<_>>(),
        vec!["ref", "dut_plain", "dut_short", "missing"]
    );
    assert_eq!(outcomes[0], &FileOutcome::Loaded { points: 3 });
    assert_eq!(outcomes[1], &FileOutcome::Loaded { points: 3 });
    assert_eq!(outcomes[2], &FileOutcome::Loaded { points: 1 });
    assert!(matches!(outcomes[3], FileOutcome::Failed(_)));

    let set = report.into_set().unwrap();
    assert_eq!(set.frequency_axis(), &[1e9, 2e9, 3e9]);

    // Columns are located by name, not position.
    let plain = set.get("dut_plain").unwrap();
    assert_eq!(plain.points[0].s11_db, -10.0);
    assert_eq!(plain.points[0].s21_db, -3.0);

    let result = compensate(&set, "ref").unwrap();
    let expected = (-0.5 - reflection_loss_db(-20.0)) - (-3.0) + reflection_loss_db(-10.0);
    assert_abs_diff_eq!(result.get("dut_plain").unwrap()[0], expected, epsilon = 1e-12);
    assert!(result.get("ref").unwrap().iter().all(|v| *v == 0.0));

    let out = dir.path().join("Compensated_S21_Analysis.csv");
    export_to_path(&out, &set, &result).unwrap();

    let mut rdr = csv::Reader::from_path(&out).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec![
            "Frequency(Hz)",
            "dut_plain_CompensatedS21(dB)",
            "dut_short_CompensatedS21(dB)"
        ]
    );

    let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 3);
    for (i, row) in rows.iter().enumerate() {
        let freq: f64 = row[0].parse().unwrap();
        assert_eq!(freq, set.frequency_axis()[i]);
        let value: f64 = row[1].parse().unwrap();
        assert_abs_diff_eq!(value, result.get("dut_plain").unwrap()[i], epsilon = 1e-6);
    }
    // The short sweep only fills the first row.
    assert!(!rows[0][2].is_empty());
    assert_eq!(&rows[1][2], "");
    assert_eq!(&rows[2][2], "");
}

#[test]
fn test_skip_rows_config_changes_window() {
    let dir = tempfile::tempdir().unwrap();
    let content = "Freq,S11,S21\n1e9,-10,-1\n2e9,-11,-2\n";
    let paths = vec![write(&dir, "flat.csv", content)];

    let report = load_paths(&paths, &ExtractConfig::default());
    assert!(!report.is_success());

    let config = ExtractConfig {
        skip_rows: 1,
        max_rows: 1,
    };
    let report = load_paths(&paths, &config);
    assert_eq!(report.files[0].1, FileOutcome::Loaded { points: 1 });
}

#[test]
fn test_reference_not_found_produces_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let paths = vec![write(&dir, "ref.csv", REFERENCE)];
    let set = load_paths(&paths, &ExtractConfig::default()).into_set().unwrap();

    let err = compensate(&set, "REF").unwrap_err();
    assert_eq!(err.label, "REF");
    assert_eq!(err.to_string(), "reference file 'REF' not found");
}
