mod listing;
pub mod mapping;

pub use listing::{
    ActivityAction, ActivityLogEntry, Category, Color, Condition, Listing, ListingStats,
    ListingStatus, ListingSummary, PackageSize, ParseEnumError, Photo, Platform, PlatformPublication,
    PlatformState, PublicationStatus,
};
