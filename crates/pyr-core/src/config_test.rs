use super::*;
use tempfile::TempDir;

#[test]
fn test_parse_minimal_config() {
    let config: Config = serde_yaml::from_str("name: projections").unwrap();
    assert_eq!(config.name, "projections");
    assert_eq!(config.years, YearRange::new(2022, 2060));
    assert_eq!(config.baseline.vintage.as_str(), "2018");
    assert_eq!(config.baseline.scale, 1000.0);
    assert_eq!(config.comparison.vintage.as_str(), "2022");
    assert_eq!(config.comparison.scale, 1.0);
    assert_eq!(config.undefined_marker, "");
}

#[test]
fn test_parse_full_config() {
    let yaml = r#"
name: england
years:
  start: 2025
  end: 2040
baseline:
  vintage: 2020
  scale: 1000
comparison:
  vintage: "2024"
undefined_marker: "NA"
"#;
    let config: Config = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(config.years, YearRange::new(2025, 2040));
    assert_eq!(config.baseline.vintage.as_str(), "2020");
    assert_eq!(config.comparison.vintage.as_str(), "2024");
    assert_eq!(config.comparison.scale, 1.0);
    assert_eq!(config.csv_options().undefined_marker, "NA");
    assert!(config.validate().is_ok());
}

#[test]
fn test_unknown_field_rejected() {
    let result: Result<Config, _> = serde_yaml::from_str("name: x\ncolour: blue");
    assert!(result.is_err());
}

#[test]
fn test_validate_year_order() {
    let mut config = Config::default();
    config.years = YearRange::new(2060, 2022);
    let err = config.validate().unwrap_err();
    assert!(matches!(err, CoreError::ConfigInvalid { .. }));
}

#[test]
fn test_validate_scale_positive() {
    let mut config = Config::default();
    config.baseline.scale = 0.0;
    assert!(config.validate().is_err());
    config.baseline.scale = f64::NAN;
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_distinct_vintages() {
    let mut config = Config::default();
    config.comparison.vintage = config.baseline.vintage.clone();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_numeric_marker_rejected() {
    let mut config = Config::default();
    config.undefined_marker = "0".to_string();
    assert!(config.validate().is_err());
    config.undefined_marker = "NaN".to_string();
    assert!(config.validate().is_ok());
}

#[test]
fn test_year_range_overrides() {
    let range = YearRange::default().with_overrides(Some(2030), None);
    assert_eq!(range, YearRange::new(2030, 2060));
    assert!(range.contains(2030));
    assert!(range.contains(2060));
    assert!(!range.contains(2029));
}

#[test]
fn test_load_from_dir_finds_yaml_extension() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("pyramid.yaml"), "name: from_yaml").unwrap();
    let config = Config::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.name, "from_yaml");
}

#[test]
fn test_load_from_dir_missing() {
    let dir = TempDir::new().unwrap();
    let err = Config::load_from_dir(dir.path()).unwrap_err();
    assert!(matches!(err, CoreError::ConfigNotFound { .. }));
}

#[test]
fn test_load_or_default_missing_file() {
    let dir = TempDir::new().unwrap();
    let config = Config::load_or_default(dir.path()).unwrap();
    assert_eq!(config.name, "population_projections");
}

#[test]
fn test_load_or_default_propagates_invalid() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("pyramid.yml"),
        "years:\n  start: 2050\n  end: 2040\n",
    )
    .unwrap();
    let err = Config::load_or_default(dir.path()).unwrap_err();
    assert!(matches!(err, CoreError::ConfigInvalid { .. }));
}
