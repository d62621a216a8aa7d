use chrono::NaiveDate;
use kep_core::{Frequency, Record};
use rust_decimal::Decimal;

/// Fixture rows per mock source: `(date, name, value)`. Blank values mimic
/// upstream holidays and are dropped before records reach the caller.
pub fn by_source(source: &str) -> Option<Vec<Record>> {
    match source {
        "cbr-usdrur" => Some(build(
            Frequency::Daily,
            &[
                ("2017-11-13", "USDRUR_CB", "62.22"),
                ("2017-11-14", "USDRUR_CB", "60.01"),
                ("2017-11-15", "USDRUR_CB", "59.98"),
                ("2017-11-16", "USDRUR_CB", "60.1632"),
                ("2017-11-17", "USDRUR_CB", "59.3866"),
            ],
        )),
        "brent" => Some(build(
            Frequency::Daily,
            &[
                ("2017-11-13", "BRENT", "63.16"),
                ("2017-11-14", "BRENT", "62.21"),
                ("2017-11-15", "BRENT", "61.87"),
                ("2017-11-16", "BRENT", ""),
                ("2017-11-17", "BRENT", "62.72"),
            ],
        )),
        "ust" => Some(build(
            Frequency::Daily,
            &[
                ("2017-11-13", "UST_1YEAR", "1.58"),
                ("2017-11-13", "UST_10YEAR", "2.40"),
                ("2017-11-14", "UST_1YEAR", "1.59"),
                ("2017-11-14", "UST_10YEAR", "2.38"),
                ("2017-11-15", "UST_1YEAR", "1.60"),
                ("2017-11-15", "UST_10YEAR", "2.33"),
            ],
        )),
        "rosstat-cpi" => Some(build(
            Frequency::Monthly,
            &[
                ("2017-09-01", "CPI_rog", "99.9"),
                ("2017-10-01", "CPI_rog", "100.2"),
                ("2017-11-01", "CPI_rog", "100.2"),
            ],
        )),
        _ => None,
    }
}

fn build(freq: Frequency, rows: &[(&str, &str, &str)]) -> Vec<Record> {
    rows.iter()
        .filter(|(_, _, value)| !value.is_empty())
        .map(|(date, name, value)| Record {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").expect("fixture date"),
            freq,
            name: (*name).to_string(),
            value: value.parse::<Decimal>().expect("fixture value"),
        })
        .collect()
}
