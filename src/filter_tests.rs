#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::{Path, PathBuf};

    use indicatif::ProgressBar;
    use log::Level;
    use tempfile::{tempdir, TempDir};

    use crate::config::FilterConfig;
    use crate::filter::error::FilterError;
    use crate::filter::{filter_companies, AddressMatcher};
    use crate::test_logger;

    const COMPANIES: &str = "\
CompanyName, CompanyNumber ,RegAddress.AddressLine1,RegAddress.AddressLine2,RegAddress.PostTown,RegAddress.PostCode
HENDON TRADING LTD,00000001,1 Brent Street,,LONDON,NW4 2EU
CAMDEN LTD,00000002,5 High Street,,LONDON,NW1 7JE
BRENT CROSS LTD,00000003,Unit 4,nw4 business park,LONDON,
NO ADDRESS LTD,00000004,,,,
SHOP LTD,00000005,2 Church Road,Hendon,London NW4,NW44 1AB
";

    fn setup(contents: &str) -> (TempDir, PathBuf, PathBuf) {
        let dir = tempdir().expect("Couldn't create temp dir");
        let input = dir.path().join("companies.csv");
        let output = dir.path().join("filtered.csv");
        fs::write(&input, contents).expect("Couldn't write input");
        (dir, input, output)
    }

    fn run_filter(input: &Path, output: &Path, chunk_size: usize) -> Result<crate::filter::FilterSummary, FilterError> {
        let config = FilterConfig {
            chunk_size,
            ..FilterConfig::new(input, output)
        };
        filter_companies(&config, &ProgressBar::hidden())
    }

    fn names(output: &Path) -> Vec<String> {
        let mut reader = csv::Reader::from_path(output).unwrap();
        reader
            .records()
            .map(|r| r.unwrap()[0].to_string())
            .collect()
    }

    #[test]
    fn test_filter_keeps_rows_matching_any_address_column() {
        let (_dir, input, output) = setup(COMPANIES);

        let summary = run_filter(&input, &output, 10_000).unwrap();

        assert_eq!(summary.rows_read, 5);
        assert_eq!(summary.rows_matched, 3);
        assert_eq!(summary.chunks, 1);
        assert_eq!(summary.output, Some(output.clone()));
        assert_eq!(
            names(&output),
            vec!["HENDON TRADING LTD", "BRENT CROSS LTD", "SHOP LTD"]
        );
    }

    #[test]
    fn test_filter_output_has_trimmed_header_and_no_index() {
        let (_dir, input, output) = setup(COMPANIES);

        run_filter(&input, &output, 10_000).unwrap();

        let contents = fs::read_to_string(&output).unwrap();
        let mut lines = contents.lines();
        assert_eq!(
            lines.next(),
            Some("CompanyName,CompanyNumber,RegAddress.AddressLine1,RegAddress.AddressLine2,RegAddress.PostTown,RegAddress.PostCode")
        );
        assert_eq!(lines.next(), Some("HENDON TRADING LTD,00000001,1 Brent Street,,LONDON,NW4 2EU"));
    }

    #[test]
    fn test_filter_result_does_not_depend_on_chunk_size() {
        let (dir, input, output) = setup(COMPANIES);
        run_filter(&input, &output, 10_000).unwrap();
        let expected = fs::read_to_string(&output).unwrap();

        for chunk_size in [1, 2, 3, 5] {
            let chunked = dir.path().join(format!("chunked-{}.csv", chunk_size));
            let summary = run_filter(&input, &chunked, chunk_size).unwrap();

            assert_eq!(summary.rows_read, 5);
            assert_eq!(summary.chunks, (5 + chunk_size as u64 - 1) / chunk_size as u64);
            assert_eq!(fs::read_to_string(&chunked).unwrap(), expected);
        }
    }

    #[test]
    fn test_filter_without_address_columns_writes_nothing() {
        let (_dir, input, output) = setup("CompanyName,CompanyNumber\nNW4 LTD,00000001\n");

        let summary = run_filter(&input, &output, 10_000).unwrap();

        assert_eq!(summary.rows_read, 1);
        assert_eq!(summary.rows_matched, 0);
        assert_eq!(summary.output, None);
        assert!(!output.exists());
    }

    #[test]
    fn test_filter_without_address_columns_warns_once() {
        let (_dir, input, output) = setup(
            "CompanyName,CompanyNumber\nNW4 LTD,00000001\nHENDON LTD,00000002\nBRENT LTD,00000003\n",
        );
        test_logger::setup();

        let summary = run_filter(&input, &output, 1).unwrap();

        assert_eq!(summary.chunks, 3);
        assert_eq!(summary.rows_read, 3);
        assert_eq!(summary.rows_matched, 0);
        assert_eq!(summary.output, None);
        let warnings: Vec<String> = test_logger::records()
            .into_iter()
            .filter(|(level, _)| *level == Level::Warn)
            .map(|(_, message)| message)
            .collect();
        assert_eq!(warnings, vec![format!("No address columns found in {}", input.display())]);
    }

    #[test]
    fn test_filter_without_matches_writes_nothing() {
        let (dir, input, output) = setup(COMPANIES);
        let config = FilterConfig {
            needle: "SW19".into(),
            ..FilterConfig::new(&input, &output)
        };

        let summary = filter_companies(&config, &ProgressBar::hidden()).unwrap();

        assert_eq!(summary.rows_matched, 0);
        assert_eq!(summary.output, None);
        assert!(!output.exists());
        // the temporary output is cleaned up as well
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_filter_only_searches_configured_columns() {
        let (_dir, input, output) = setup(COMPANIES);
        let config = FilterConfig {
            columns: vec![" RegAddress.PostCode ".into()],
            ..FilterConfig::new(&input, &output)
        };

        let summary = filter_companies(&config, &ProgressBar::hidden()).unwrap();

        assert_eq!(summary.rows_matched, 2);
        assert_eq!(names(&output), vec!["HENDON TRADING LTD", "SHOP LTD"]);
    }

    #[test]
    fn test_filter_missing_input() {
        let (dir, _input, output) = setup(COMPANIES);

        let result = run_filter(&dir.path().join("missing.csv"), &output, 10_000);

        assert!(matches!(result, Err(FilterError::IO(_))));
        assert!(!output.exists());
    }

    #[test]
    fn test_filter_rejects_invalid_config() {
        let (_dir, input, output) = setup(COMPANIES);

        assert!(matches!(
            run_filter(&input, &output, 0),
            Err(FilterError::InvalidConfig(_))
        ));

        let config = FilterConfig {
            needle: String::new(),
            ..FilterConfig::new(&input, &output)
        };
        assert!(matches!(
            filter_companies(&config, &ProgressBar::hidden()),
            Err(FilterError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_matcher_is_case_insensitive_and_literal() {
        let columns = vec!["A".to_string(), "B".to_string()];
        let headers = vec!["B".to_string(), "Other".to_string(), "A".to_string()];
        let matcher = AddressMatcher::new("nw4", &columns).unwrap();
        let available = matcher.available_columns(&headers);
        assert_eq!(available, vec![2, 0]);

        let row = |b: &str, a: &str| vec![b.to_string(), "NW4".to_string(), a.to_string()];
        assert!(matcher.matches(&row("", "Hendon NW4"), &available));
        assert!(matcher.matches(&row("xNw4x", ""), &available));
        assert!(!matcher.matches(&row("", ""), &available));
        assert!(!matcher.matches(&row("NW 4", "N W4"), &available));

        let dotted = AddressMatcher::new("N.4", &columns).unwrap();
        assert!(!dotted.matches(&row("NW4", ""), &available));
        assert!(dotted.matches(&row("N.4", ""), &available));
    }
}
