use chrono::NaiveDate;

use crate::models::VariableKind;

/// Parse a fragment filename of the form `<token>_<YYYYMM>_<YYYYMM>.csv` into
/// the variable kind and the start/end months (each anchored to day 1).
pub fn parse_fragment_filename(name: &str) -> Option<(VariableKind, NaiveDate, NaiveDate)> {
    let stem = name.strip_suffix(".csv")?;

    let mut parts = stem.rsplitn(3, '_');
    let end = parts.next()?;
    let start = parts.next()?;
    let token = parts.next()?;

    let kind = VariableKind::from_file_token(token)?;
    let start = parse_year_month(start)?;
    let end = parse_year_month(end)?;

    Some((kind, start, end))
}

/// Parse a `YYYYMM` string into the first day of that month.
pub fn parse_year_month(s: &str) -> Option<NaiveDate> {
    if s.len() != 6 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let year: i32 = s[..4].parse().ok()?;
    let month: u32 = s[4..6].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Format a month as `YYYYMM` for use in output filenames.
pub fn year_month_label(date: NaiveDate) -> String {
    date.format("%Y%m").to_string()
}

/// Period label shared by all sink filenames, e.g. `202301_202512`.
pub fn period_label(start: NaiveDate, end: NaiveDate) -> String {
    format!("{}_{}", year_month_label(start), year_month_label(end))
}

/// Legacy export filename for one merged variable, e.g.
/// `temperature_202301_202312.csv`.
pub fn legacy_fragment_filename(kind: VariableKind, start: NaiveDate, end: NaiveDate) -> String {
    format!("{}_{}.csv", kind.file_token(), period_label(start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fragment_filename() {
        let (kind, start, end) = parse_fragment_filename("temperature_202301_202312.csv").unwrap();
        assert_eq!(kind, VariableKind::Temperature);
        assert_eq!(start, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2023, 12, 1).unwrap());

        let (kind, _, _) =
            parse_fragment_filename("precipitation-amount_202301_202306.csv").unwrap();
        assert_eq!(kind, VariableKind::PrecipAmount);

        let (kind, _, _) = parse_fragment_filename("precipitation-type_202401_202402.csv").unwrap();
        assert_eq!(kind, VariableKind::PrecipType);
    }

    #[test]
    fn test_parse_fragment_filename_rejects_mismatches() {
        assert!(parse_fragment_filename("notes.txt").is_none());
        assert!(parse_fragment_filename("humidity_202301_202312.csv").is_none());
        assert!(parse_fragment_filename("temperature_2023_202312.csv").is_none());
        assert!(parse_fragment_filename("temperature_202313_202312.csv").is_none());
        assert!(parse_fragment_filename("temperature.csv").is_none());
    }

    #[test]
    fn test_period_label() {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 12, 1).unwrap();
        assert_eq!(period_label(start, end), "202301_202512");
    }

    #[test]
    fn test_legacy_fragment_filename() {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
        assert_eq!(
            legacy_fragment_filename(VariableKind::PrecipAmount, start, end),
            "precipitation-amount_202301_202306.csv"
        );
    }
}
