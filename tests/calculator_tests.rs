use chrono::{DateTime, TimeZone, Utc};
use tzdiff::{BundledDatabase, TimeDifferenceCalculator, TzError};

fn calculator() -> TimeDifferenceCalculator<BundledDatabase> {
    TimeDifferenceCalculator::new(BundledDatabase)
}

fn winter() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap()
}

fn summer() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 7, 1, 12, 0, 0).unwrap()
}

#[test]
fn test_resolve_known_zone() {
    let time = calculator().resolve_at("Asia/Shanghai", winter()).unwrap();
    assert_eq!(time.zone(), "Asia/Shanghai");
    assert_eq!(time.offset_seconds(), 8 * 3600);
    assert_eq!(time.abbreviation(), "CST");
    assert!(!time.is_dst());
    assert_eq!(time.to_string(), "2024-01-15 20:00:00 CST");
}

#[test]
fn test_resolve_follows_dst() {
    let calc = calculator();
    let january = calc.resolve_at("America/New_York", winter()).unwrap();
    let july = calc.resolve_at("America/New_York", summer()).unwrap();
    assert_eq!(january.offset_seconds(), -5 * 3600);
    assert_eq!(january.abbreviation(), "EST");
    assert_eq!(july.offset_seconds(), -4 * 3600);
    assert_eq!(july.abbreviation(), "EDT");
    assert!(july.is_dst());
}

#[test]
fn test_resolve_unknown_zone() {
    let err = calculator().resolve("Not/AZone").unwrap_err();
    assert_eq!(err, TzError::InvalidTimezone("Not/AZone".to_string()));
    assert!(err.to_string().contains("Not/AZone"));
}

#[test]
fn test_shanghai_new_york_depends_on_us_dst() {
    let calc = calculator();

    let result = calc.difference_at("Asia/Shanghai", "America/New_York", winter());
    assert_eq!(result.offset_hours(), Some(-13.0));
    assert_eq!(
        result.time_difference(),
        "America/New_York is 13.0 hours behind Asia/Shanghai"
    );

    let result = calc.difference_at("Asia/Shanghai", "America/New_York", summer());
    assert_eq!(result.offset_hours(), Some(-12.0));
    assert_eq!(
        result.time_difference(),
        "America/New_York is 12.0 hours behind Asia/Shanghai"
    );
}

#[test]
fn test_shanghai_new_york_now() {
    let calc = calculator();
    let shanghai = calc.resolve("Asia/Shanghai").unwrap();
    let new_york = calc.resolve_at("America/New_York", shanghai.datetime().with_timezone(&Utc));
    let hours = (shanghai.offset_seconds() - new_york.unwrap().offset_seconds()) / 3600;
    assert!(hours == 12 || hours == 13, "unexpected delta {}", hours);

    let delta = calc.difference("Asia/Shanghai", "America/New_York").offset_hours().unwrap();
    assert!(delta == -12.0 || delta == -13.0, "unexpected delta {}", delta);
}

#[test]
fn test_difference_is_antisymmetric() {
    let calc = calculator();
    let zones = [
        "Asia/Shanghai",
        "America/New_York",
        "Europe/London",
        "Asia/Kolkata",
        "Australia/Sydney",
        "UTC",
    ];
    for at in [winter(), summer()] {
        for a in zones {
            for b in zones {
                let ab = calc.difference_at(a, b, at).offset_seconds().unwrap();
                let ba = calc.difference_at(b, a, at).offset_seconds().unwrap();
                assert_eq!(ab, -ba, "{} / {}", a, b);
            }
        }
    }
}

#[test]
fn test_same_zone() {
    let result = calculator().difference("Europe/London", "Europe/London");
    assert_eq!(result.offset_hours(), Some(0.0));
    assert_eq!(
        result.time_difference(),
        "Europe/London and Europe/London are in the same timezone"
    );
}

#[test]
fn test_ahead_and_half_hours() {
    let result = calculator().difference_at("UTC", "Asia/Kolkata", winter());
    assert_eq!(result.offset_hours(), Some(5.5));
    assert_eq!(result.time_difference(), "Asia/Kolkata is 5.5 hours ahead of UTC");
    assert!(!result.time_difference().contains("5.50"));
}

#[test]
fn test_quarter_hour_offsets_round_to_one_decimal() {
    let result = calculator().difference_at("UTC", "Asia/Kathmandu", winter());
    assert_eq!(result.offset_hours(), Some(5.75));
    assert_eq!(
        result.time_difference(),
        "Asia/Kathmandu is 5.8 hours ahead of UTC"
    );

    // Chatham observes DST in January: +13:45
    let result = calculator().difference_at("UTC", "Pacific/Chatham", winter());
    assert_eq!(result.offset_hours(), Some(13.75));
    assert_eq!(
        result.time_difference(),
        "Pacific/Chatham is 13.8 hours ahead of UTC"
    );

    let result = calculator().difference_at("Asia/Kathmandu", "UTC", winter());
    assert_eq!(result.time_difference(), "UTC is 5.8 hours behind Asia/Kathmandu");
}

#[test]
fn test_bundled_rules_are_current() {
    // Paraguay moved to permanent -03 in October 2024
    let july = Utc.with_ymd_and_hms(2025, 7, 1, 12, 0, 0).unwrap();
    let time = calculator().resolve_at("America/Asuncion", july).unwrap();
    assert_eq!(time.offset_seconds(), -3 * 3600);
}

#[test]
fn test_unknown_zone_is_not_fatal() {
    let result = calculator().difference("Not/AZone", "Asia/Shanghai");
    assert_eq!(result.offset_hours(), None);
    assert!(result.time_difference().starts_with("Unable to compute"));
    assert!(result.region1.time.is_err());
    assert!(result.region1.current_time().contains("Not/AZone"));
    assert!(result.region2.time.is_ok());
    assert!(result.region2.current_time().ends_with("CST"));
}

#[test]
fn test_report_rendering() {
    let result = calculator().difference_at("Asia/Shanghai", "America/New_York", winter());
    let expected = "Region 1: Asia/Shanghai\n\
                    Current time: 2024-01-15 20:00:00 CST\n\
                    \n\
                    Region 2: America/New_York\n\
                    Current time: 2024-01-15 07:00:00 EST\n\
                    \n\
                    Time difference: America/New_York is 13.0 hours behind Asia/Shanghai";
    assert_eq!(result.to_string(), expected);
}

#[cfg(feature = "json")]
#[test]
fn test_to_json() {
    let result = calculator().difference_at("Asia/Shanghai", "Not/AZone", winter());
    let json: serde_json::Value = serde_json::from_str(&result.to_json().unwrap()).unwrap();
    assert_eq!(json["region1"]["name"], "Asia/Shanghai");
    assert_eq!(json["region1"]["current_time"], "2024-01-15 20:00:00 CST");
    assert_eq!(json["region2"]["name"], "Not/AZone");
    assert!(json["offset_hours"].is_null());

    let result = calculator().difference_at("Asia/Shanghai", "America/New_York", winter());
    let json: serde_json::Value = serde_json::from_str(&result.to_json().unwrap()).unwrap();
    assert_eq!(json["offset_hours"], -13.0);
}
