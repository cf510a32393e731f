use super::*;
use clap::Parser;

#[test]
fn test_parse_normalize_defaults() {
    let cli = Cli::try_parse_from(["pyr", "normalize", "raw.csv", "-o", "clean.csv"]).unwrap();
    match cli.command {
        Commands::Normalize(args) => {
            assert_eq!(args.input, PathBuf::from("raw.csv"));
            assert_eq!(args.output, PathBuf::from("clean.csv"));
            assert_eq!(args.format, InputFormat::Wide);
            assert!(args.years.start.is_none());
        }
        other => panic!("unexpected command: {other:?}"),
    }
    assert_eq!(cli.global.project_dir, ".");
    assert!(!cli.global.verbose);
}

#[test]
fn test_parse_normalize_long_with_years() {
    let cli = Cli::try_parse_from([
        "pyr", "normalize", "in.csv", "-o", "out.csv", "--format", "long", "--start", "2025",
        "--end", "2030",
    ])
    .unwrap();
    let Commands::Normalize(args) = cli.command else {
        panic!("expected normalize");
    };
    assert_eq!(args.format, InputFormat::Long);
    assert_eq!(args.years.start, Some(2025));
    assert_eq!(args.years.end, Some(2030));
}

#[test]
fn test_parse_diff() {
    let cli = Cli::try_parse_from([
        "pyr",
        "-v",
        "diff",
        "a.csv",
        "b.csv",
        "--output",
        "merged.csv",
        "--normalize",
    ])
    .unwrap();
    assert!(cli.global.verbose);
    let Commands::Diff(args) = cli.command else {
        panic!("expected diff");
    };
    assert_eq!(args.baseline, PathBuf::from("a.csv"));
    assert_eq!(args.comparison, PathBuf::from("b.csv"));
    assert!(args.normalize);
}

#[test]
fn test_parse_pyramid() {
    let cli = Cli::try_parse_from([
        "pyr",
        "pyramid",
        "merged.csv",
        "--sex",
        "Males and Females",
        "--metric",
        "Population Difference",
        "--output",
        "json",
        "--config",
        "custom.yml",
    ])
    .unwrap();
    assert_eq!(cli.global.config.as_deref(), Some("custom.yml"));
    let Commands::Pyramid(args) = cli.command else {
        panic!("expected pyramid");
    };
    assert_eq!(args.sex, "Males and Females");
    assert_eq!(args.metric, "Population Difference");
    assert_eq!(args.output, PyramidOutput::Json);
    assert!(args.vintage.is_none());
}

#[test]
fn test_parse_pyramid_defaults() {
    let cli = Cli::try_parse_from(["pyr", "pyramid", "clean.csv"]).unwrap();
    let Commands::Pyramid(args) = cli.command else {
        panic!("expected pyramid");
    };
    assert_eq!(args.sex, "Persons");
    assert_eq!(args.metric, "Population");
    assert_eq!(args.output, PyramidOutput::Table);
}

#[test]
fn test_missing_output_rejected() {
    assert!(Cli::try_parse_from(["pyr", "normalize", "raw.csv"]).is_err());
}

#[test]
fn test_parse_check() {
    let cli = Cli::try_parse_from(["pyr", "check", "clean.csv", "-p", "proj"]).unwrap();
    assert_eq!(cli.global.project_dir, "proj");
    assert!(matches!(cli.command, Commands::Check(_)));
}
