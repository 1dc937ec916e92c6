//! JSON Output

use crate::report::Report;

/// Generate a prettified JSON report.
pub fn generate_json_report(report: &Report) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

/// Parse a report previously written with [`generate_json_report`]
pub fn parse_json_report(json: &str) -> Result<Report, serde_json::Error> {
    serde_json::from_str(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::tests::sample_report;

    #[test]
    fn test_json_round_trip() {
        let report = sample_report(&[3.0, 4.0]);
        let json = generate_json_report(&report).unwrap();
        assert!(json.contains("\"kernel\": \"mergesort\""));
        assert!(json.contains("\"execution_time_ms\": 3"));
        assert_eq!(parse_json_report(&json).unwrap(), report);
    }
}
