use serde_json::json;

use crate::domain::{ActivityAction, Category, Condition, ListingStatus, Platform};

#[test]
fn enums_use_screaming_snake_case_on_the_wire() {
    assert_eq!(
        serde_json::to_value(Category::BooksMedia).unwrap(),
        json!("BOOKS_MEDIA")
    );
    assert_eq!(
        serde_json::to_value(ActivityAction::PlatformRemoved).unwrap(),
        json!("PLATFORM_REMOVED")
    );
    let condition: Condition = serde_json::from_value(json!("NEW_WITH_TAGS")).unwrap();
    assert_eq!(condition, Condition::NewWithTags);
}

#[test]
fn from_str_is_case_insensitive_and_reports_the_kind() {
    assert_eq!("vinted".parse::<Platform>().unwrap(), Platform::Vinted);
    assert_eq!(" sold ".parse::<ListingStatus>().unwrap(), ListingStatus::Sold);

    let err = "craigslist".parse::<Platform>().unwrap_err();
    assert_eq!(err.to_string(), "unknown platform 'craigslist'");
}
