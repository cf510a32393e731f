use super::*;
use crate::config::CsvOptions;
use crate::csv_io::{read_long, read_wide};
use crate::metric::{Metric, MetricSelector};
use crate::pyramid::{build_pyramid, PyramidQuery, SexMode};

const ALL_YEARS: YearRange = YearRange {
    start: 2022,
    end: 2060,
};

/// Wide export with every raw bucket for one sex, values = bucket lower bound
fn wide_export(sex: &str, years: &[i32]) -> String {
    let mut out = format!(
        "Sex,Age,{}\n",
        years
            .iter()
            .map(|y| y.to_string())
            .collect::<Vec<_>>()
            .join(",")
    );
    for lo in (0..100).step_by(5) {
        let cells = vec![lo.to_string(); years.len()].join(",");
        out.push_str(&format!("{sex},{lo} - {},{cells}\n", lo + 4));
    }
    let cells = vec!["500"; years.len()].join(",");
    out.push_str(&format!("{sex},100 - 104,{cells}\n"));
    let cells = vec!["100"; years.len()].join(",");
    out.push_str(&format!("{sex},105 and over,{cells}\n"));
    out
}

fn key(year: i32, group: AgeGroup, sex: Sex) -> RowKey {
    RowKey::new(year, group, sex)
}

#[test]
fn test_lossless_merge_of_oldest_buckets() {
    let wide = read_wide(wide_export("Males", &[2022]).as_bytes(), "raw").unwrap();
    let (table, report) = normalize_wide(&wide, ALL_YEARS).unwrap();

    assert_eq!(
        table.value(&key(2022, AgeGroup::Age100AndOver, Sex::Male), "Population"),
        Some(600.0)
    );
    assert_eq!(report.rows_merged, 2);
    assert_eq!(report.buckets_zero_filled, 0);
    assert_eq!(table.len(), 21);
}

#[test]
fn test_total_population_preserved() {
    let wide = read_wide(wide_export("Females", &[2030, 2031]).as_bytes(), "raw").unwrap();
    let raw_total: f64 = wide
        .rows
        .iter()
        .map(|r| r.values[0].unwrap_or(0.0))
        .sum();
    let (table, _) = normalize_wide(&wide, ALL_YEARS).unwrap();
    let normalized_total: f64 = table
        .rows()
        .iter()
        .filter(|r| r.key.year == 2030)
        .map(|r| r.values[0].unwrap_or(0.0))
        .sum();
    assert_eq!(raw_total, normalized_total);
}

#[test]
fn test_every_sex_year_is_complete() {
    let mut data = wide_export("Males", &[2022, 2023]);
    // a second sex with only two buckets
    data.push_str("Females,0 - 4,1,2\nFemales,105 and over,3,4\n");
    let wide = read_wide(data.as_bytes(), "raw").unwrap();
    let (table, report) = normalize_wide(&wide, ALL_YEARS).unwrap();

    assert!(table.check_completeness().is_empty());
    assert_eq!(table.len(), 21 * 2 * 2);
    // 19 missing buckets per female year
    assert_eq!(report.buckets_zero_filled, 19 * 2);
    assert_eq!(
        table.value(&key(2023, AgeGroup::Age100AndOver, Sex::Female), "Population"),
        Some(4.0)
    );
    assert_eq!(
        table.value(&key(2023, AgeGroup::Age50To54, Sex::Female), "Population"),
        Some(0.0)
    );
}

#[test]
fn test_output_sorted_by_sex_year_age() {
    let mut data = wide_export("Males", &[2023, 2022]);
    let females = wide_export("Females", &[2023, 2022]);
    data.push_str(&females.lines().skip(1).collect::<Vec<_>>().join("\n"));
    data.push('\n');
    let wide = read_wide(data.as_bytes(), "raw").unwrap();
    let (table, _) = normalize_wide(&wide, ALL_YEARS).unwrap();

    let keys: Vec<(Sex, i32, usize)> = table
        .rows()
        .iter()
        .map(|r| (r.key.sex, r.key.year, r.key.age_group.index()))
        .collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
    assert_eq!(table.rows()[0].key, key(2022, AgeGroup::Age0To4, Sex::Female));
    assert_eq!(
        table.rows()[20].key,
        key(2022, AgeGroup::Age100AndOver, Sex::Female)
    );
    assert_eq!(table.rows()[21].key, key(2023, AgeGroup::Age0To4, Sex::Female));
}

#[test]
fn test_year_columns_outside_range_ignored() {
    let wide = read_wide(wide_export("Males", &[2021, 2022, 2061]).as_bytes(), "raw").unwrap();
    let (table, _) = normalize_wide(&wide, ALL_YEARS).unwrap();
    assert_eq!(table.years().into_iter().collect::<Vec<_>>(), vec![2022]);
}

#[test]
fn test_unknown_age_group_fails_loudly() {
    let data = "Sex,Age,2022\nMales,0 - 4,1\nMales,110 - 114,5\n";
    let wide = read_wide(data.as_bytes(), "raw").unwrap();
    let err = normalize_wide(&wide, ALL_YEARS).unwrap_err();
    assert!(matches!(err, CoreError::UnknownAgeGroup { ref value } if value == "110 - 114"));
}

#[test]
fn test_unknown_sex_fails_loudly() {
    let data = "Sex,Age,2022\nUnknown,0 - 4,1\n";
    let wide = read_wide(data.as_bytes(), "raw").unwrap();
    let err = normalize_wide(&wide, ALL_YEARS).unwrap_err();
    assert!(matches!(err, CoreError::UnknownSex { .. }));
}

#[test]
fn test_direct_and_constituent_oldest_bucket_conflict() {
    let data = "Sex,Age,2022\nMales,100 & over,7\nMales,100 - 104,5\n";
    let wide = read_wide(data.as_bytes(), "raw").unwrap();
    let err = normalize_wide(&wide, ALL_YEARS).unwrap_err();
    assert!(matches!(err, CoreError::DuplicateKey { ref age_group, .. } if age_group == "100 & over"));
}

#[test]
fn test_duplicate_constituent_rejected() {
    let data = "Sex,Age,2022\nMales,100 - 104,5\nmale,100-104,5\n";
    let wide = read_wide(data.as_bytes(), "raw").unwrap();
    let err = normalize_wide(&wide, ALL_YEARS).unwrap_err();
    assert!(matches!(err, CoreError::DuplicateKey { ref age_group, .. } if age_group == "100-104"));
}

#[test]
fn test_merge_skips_missing_constituent_values() {
    let data = "Sex,Age,2022,2023\nMales,100 - 104,5,\nMales,105 and over,,\n";
    let wide = read_wide(data.as_bytes(), "raw").unwrap();
    let (table, _) = normalize_wide(&wide, ALL_YEARS).unwrap();
    assert_eq!(
        table.value(&key(2022, AgeGroup::Age100AndOver, Sex::Male), "Population"),
        Some(5.0)
    );
    assert_eq!(
        table.value(&key(2023, AgeGroup::Age100AndOver, Sex::Male), "Population"),
        Some(0.0)
    );
}

#[test]
fn test_empty_wide_cell_is_zero_filled() {
    let export = wide_export("Males", &[2022]).replace("Males,95 - 99,95", "Males,95 - 99,");
    let wide = read_wide(export.as_bytes(), "raw").unwrap();
    let (table, report) = normalize_wide(&wide, ALL_YEARS).unwrap();

    assert_eq!(
        table.value(&key(2022, AgeGroup::Age95To99, Sex::Male), "Population"),
        Some(0.0)
    );
    assert_eq!(report.buckets_zero_filled, 1);
    assert_eq!(report.rows_melted, 21);
    assert!(table.check_completeness().is_empty());

    let query = PyramidQuery {
        sex_mode: SexMode::Male,
        metric: MetricSelector::new(Metric::Population),
        years: None,
    };
    let pyramid = build_pyramid(&table, &query).unwrap();
    let bar = pyramid
        .bars
        .iter()
        .find(|b| b.age_group == AgeGroup::Age95To99)
        .unwrap();
    assert_eq!(bar.value, Some(0.0));
}

#[test]
fn test_merged_percentage_recomputed_from_summed_counts() {
    let data = "Year,Age Group,Sex,Population_2018,Population_2022,Population_Difference,Percentage_Change\n\
                2022,100 - 104,Males,1000,1600,600,60\n\
                2022,105 & over,Males,1000,1400,400,40\n";
    let raw = read_long(data.as_bytes(), "long", &CsvOptions::default()).unwrap();
    let (table, _) = normalize_long(&raw, None).unwrap();
    let oldest = key(2022, AgeGroup::Age100AndOver, Sex::Male);

    assert_eq!(table.value(&oldest, "Population_2018"), Some(2000.0));
    assert_eq!(table.value(&oldest, "Population_Difference"), Some(1000.0));
    assert_eq!(table.value(&oldest, "Percentage_Change"), Some(50.0));
}

#[test]
fn test_merged_percentage_without_inputs_rejected() {
    let data = "Year,Age Group,Sex,Percentage_Change\n\
                2022,100 - 104,Males,50\n\
                2022,105 & over,Males,-50\n";
    let raw = read_long(data.as_bytes(), "long", &CsvOptions::default()).unwrap();
    let err = normalize_long(&raw, None).unwrap_err();
    assert!(matches!(
        err,
        CoreError::MetricNotFound { ref column, .. } if column == DIFFERENCE_COLUMN
    ));
}

#[test]
fn test_normalize_long_recanonicalizes_labels() {
    let data = "Year,Age Group,Sex,Population\n\
                2022,0 - 4,Males,10\n\
                2022,100 - 104,Males,3\n\
                2022,105 & over,males,2\n\
                2019,0 - 4,Males,99\n";
    let raw = read_long(data.as_bytes(), "long", &CsvOptions::default()).unwrap();
    let (table, report) = normalize_long(&raw, Some(ALL_YEARS)).unwrap();

    assert_eq!(report.rows_melted, 3);
    assert_eq!(table.years().into_iter().collect::<Vec<_>>(), vec![2022]);
    assert_eq!(
        table.value(&key(2022, AgeGroup::Age0To4, Sex::Male), "Population"),
        Some(10.0)
    );
    assert_eq!(
        table.value(&key(2022, AgeGroup::Age100AndOver, Sex::Male), "Population"),
        Some(5.0)
    );
    assert!(table.check_completeness().is_empty());
}

#[test]
fn test_normalize_long_without_year_filter() {
    let data = "Year,Age Group,Sex,Population\n2019,0 - 4,Males,99\n";
    let raw = read_long(data.as_bytes(), "long", &CsvOptions::default()).unwrap();
    let (table, _) = normalize_long(&raw, None).unwrap();
    assert_eq!(table.years().into_iter().collect::<Vec<_>>(), vec![2019]);
}
