use super::*;

#[test]
fn every_variant_is_in_exactly_one_range() {
    for code in ErrorCode::ALL {
        let ranges = [
            code.is_pattern_error(),
            code.is_runtime_error(),
            code.is_internal_error(),
            code.is_warning(),
        ];
        assert_eq!(
            ranges.iter().filter(|&&hit| hit).count(),
            1,
            "{code} is not classified exactly once"
        );
    }
}

#[test]
fn parse_round_trips() {
    for code in ErrorCode::ALL {
        assert_eq!(code.as_str().parse::<ErrorCode>(), Ok(*code));
    }
    assert_eq!("e3002".parse::<ErrorCode>(), Ok(ErrorCode::E3002));
    assert_eq!("E0000".parse::<ErrorCode>(), Err(()));
}

#[test]
fn all_codes_are_unique() {
    let mut seen = std::collections::HashSet::new();
    for code in ErrorCode::ALL {
        assert!(seen.insert(code.as_str()), "duplicate {code}");
    }
}
