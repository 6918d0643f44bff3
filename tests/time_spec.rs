use chrono::{TimeZone, Utc};
use plantbot::time::{DurationError, Span, Unit};
use speculate2::speculate;

fn parse(input: &str) -> Span {
    Span::parse(input).expect("expression should parse")
}

speculate! {
    describe "parse" {
        it "treats a bare number as milliseconds" {
            assert_eq!(parse("3600000").millis(), 3_600_000);
        }

        it "parses a single short component" {
            assert_eq!(parse("1h").millis(), 3_600_000);
            assert_eq!(parse("250ms").millis(), 250);
            assert_eq!(parse("2mt").millis(), 2 * 2_628_002_880);
        }

        it "parses long singular and plural units with or without a space" {
            assert_eq!(parse("1 hour").millis(), 3_600_000);
            assert_eq!(parse("90 minutes").millis(), 5_400_000);
            assert_eq!(parse("2days").millis(), 172_800_000);
        }

        it "sums comma-separated components" {
            assert_eq!(parse("1h, 30m").millis(), 5_400_000);
            assert_eq!(parse("1 day,12h").millis(), 129_600_000);
        }

        it "ignores unit case and surrounding whitespace" {
            assert_eq!(parse("  1H , 1D ").millis(), 90_000_000);
        }

        it "rejects a repeated unit" {
            let err = Span::parse("1h, 1h").unwrap_err();
            assert_eq!(err, DurationError::DuplicateUnit { unit: Unit::Hour, position: 1 });
        }

        it "treats different spellings of a unit as the same unit" {
            let err = Span::parse("1 hour, 2h").unwrap_err();
            assert!(matches!(err, DurationError::DuplicateUnit { unit: Unit::Hour, .. }));
        }

        it "rejects an unknown unit" {
            let err = Span::parse("1 fortnight").unwrap_err();
            assert_eq!(err, DurationError::UnknownUnit("fortnight".to_string()));
            assert_eq!(err.to_string(), "unknown time unit: fortnight");
        }

        it "rejects empty and malformed input" {
            assert!(matches!(Span::parse(""), Err(DurationError::Malformed(_))));
            assert!(matches!(Span::parse("h"), Err(DurationError::Malformed(_))));
            assert!(matches!(Span::parse("1h30m"), Err(DurationError::Malformed(_))));
            assert!(matches!(Span::parse("1h,"), Err(DurationError::Malformed(_))));
        }

        it "rejects totals that overflow" {
            assert!(matches!(
                Span::parse("99999999999999999999"),
                Err(DurationError::Overflow(_))
            ));
            assert!(matches!(
                Span::parse("18446744073709551615y"),
                Err(DurationError::Overflow(_))
            ));
        }

        it "is available through FromStr" {
            let span: Span = "45s".parse().unwrap();
            assert_eq!(span.millis(), 45_000);
        }
    }

    describe "rate views" {
        it "returns unfloored ratios" {
            let span = parse("90m");
            assert_eq!(span.hours(), 1.5);
            assert_eq!(span.minutes(), 90.0);
            assert_eq!(span.seconds(), 5400.0);
        }

        it "covers the calendar-like units" {
            assert_eq!(parse("14d").weeks(), 2.0);
            assert_eq!(parse("36h").days(), 1.5);
            assert_eq!(parse("730d").years(), 2.0);
            assert!((parse("1mt").months() - 1.0).abs() < f64::EPSILON);
        }
    }

    describe "format" {
        it "writes a single long unit without plural" {
            assert_eq!(Span::from_millis(3_600_000).format(false), "1 hour");
            assert_eq!(Span::from_millis(86_400_000).format(false), "1 day");
        }

        it "pluralizes quantities above one" {
            assert_eq!(Span::from_millis(7_200_000).format(false), "2 hours");
        }

        it "joins long components with commas" {
            assert_eq!(Span::from_millis(5_400_000).format(false), "1 hour, 30 minutes");
            assert_eq!(
                Span::from_millis(90_061_001).format(false),
                "1 day, 1 hour, 1 minute, 1 second, 1 millisecond"
            );
        }

        it "writes short units without commas or plurals" {
            assert_eq!(Span::from_millis(7_200_000).format(true), "2h");
            assert_eq!(Span::from_millis(5_400_000).format(true), "1h 30m");
            assert_eq!(Span::from_millis(1_500).format(true), "1s 500ms");
        }

        it "breaks down the largest units first" {
            let span = parse("1y, 1mt, 1w");
            assert_eq!(span.format(true), "1y 1mt 1w");
            assert_eq!(span.format(false), "1 year, 1 month, 1 week");
        }

        it "has a fixed zero form" {
            assert_eq!(Span::ZERO.format(false), "0 seconds");
            assert_eq!(Span::ZERO.format(true), "0s");
        }

        it "is lossless for whole short units" {
            let span = parse("3d, 4h, 5m");
            assert_eq!(Span::parse(&span.format(true).replace(' ', ", ")).unwrap(), span);
        }
    }

    describe "instants" {
        it "computes points after and before a base time" {
            let base = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
            let hour = parse("1h");
            assert_eq!(hour.after(base), Utc.with_ymd_and_hms(2024, 1, 1, 13, 0, 0).unwrap());
            assert_eq!(hour.before(base), Utc.with_ymd_and_hms(2024, 1, 1, 11, 0, 0).unwrap());
        }

        it "anchors from_now and ago on the current time" {
            let before = Utc::now();
            let later = parse("1d").from_now();
            let earlier = parse("1d").ago();
            let after = Utc::now();

            assert!(later >= before + chrono::Duration::days(1));
            assert!(later <= after + chrono::Duration::days(1));
            assert!(earlier <= after - chrono::Duration::days(1));
        }
    }
}
