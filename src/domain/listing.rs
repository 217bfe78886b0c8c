use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error returned when a wire string does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} '{}'", self.kind, self.value)
    }
}

impl std::error::Error for ParseEnumError {}

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($variant:ident => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
            JsonSchema,
        )]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|candidate| candidate.as_str().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| ParseEnumError {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }
    };
}

wire_enum! {
    /// External marketplace a listing can be published to.
    Platform, "platform" {
        Ebay => "EBAY",
        Vinted => "VINTED",
        Subito => "SUBITO",
        Facebook => "FACEBOOK",
    }
}

wire_enum! {
    Category, "category" {
        Clothing => "CLOTHING",
        Shoes => "SHOES",
        Accessories => "ACCESSORIES",
        Electronics => "ELECTRONICS",
        Home => "HOME",
        Sports => "SPORTS",
        BooksMedia => "BOOKS_MEDIA",
        Games => "GAMES",
        Other => "OTHER",
    }
}

wire_enum! {
    Condition, "condition" {
        NewWithTags => "NEW_WITH_TAGS",
        NewWithoutTags => "NEW_WITHOUT_TAGS",
        LikeNew => "LIKE_NEW",
        Good => "GOOD",
        Fair => "FAIR",
        Damaged => "DAMAGED",
    }
}

wire_enum! {
    Color, "color" {
        Black => "BLACK",
        White => "WHITE",
        Grey => "GREY",
        Blue => "BLUE",
        Red => "RED",
        Green => "GREEN",
        Yellow => "YELLOW",
        Pink => "PINK",
        Orange => "ORANGE",
        Purple => "PURPLE",
        Brown => "BROWN",
        Beige => "BEIGE",
        Multicolor => "MULTICOLOR",
        Other => "OTHER",
    }
}

wire_enum! {
    PackageSize, "package size" {
        Small => "SMALL",
        Medium => "MEDIUM",
        Large => "LARGE",
    }
}

wire_enum! {
    ListingStatus, "listing status" {
        Draft => "DRAFT",
        Active => "ACTIVE",
        Sold => "SOLD",
        Archived => "ARCHIVED",
    }
}

wire_enum! {
    PublicationStatus, "publication status" {
        Draft => "DRAFT",
        Published => "PUBLISHED",
        Error => "ERROR",
        Removed => "REMOVED",
    }
}

wire_enum! {
    ActivityAction, "activity action" {
        Created => "CREATED",
        Published => "PUBLISHED",
        Updated => "UPDATED",
        Removed => "REMOVED",
        Sold => "SOLD",
        Drafted => "DRAFTED",
        Deleted => "DELETED",
        PlatformAdded => "PLATFORM_ADDED",
        PlatformRemoved => "PLATFORM_REMOVED",
    }
}

/// A photo already stored by the listing service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: String,
    pub url: String,
    pub filename: String,
    pub order: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformPublication {
    pub id: String,
    pub platform: Platform,
    pub status: PublicationStatus,
    pub platform_listing_id: Option<String>,
    pub platform_listing_url: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLogEntry {
    pub id: String,
    pub action: ActivityAction,
    pub description: String,
    pub platform: Option<Platform>,
    pub created_at: DateTime<Utc>,
    pub metadata: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingStats {
    pub total_views: Option<u64>,
    pub favorites: Option<u64>,
    pub messages: Option<u64>,
    pub days_online: Option<u64>,
}

/// A listing as returned by the listing service.
///
/// Everything below `shipping_cost` is read-only from the point of view of the
/// editors: status and publications change only through dedicated actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: String,
    pub photos: Vec<Photo>,

    pub title: String,
    pub description: String,
    pub price: f64,
    pub category: Category,
    pub condition: Condition,

    pub brand: Option<String>,
    pub size: Option<String>,
    pub colors: Vec<Color>,
    pub material: Option<String>,

    pub city: String,
    pub province: String,
    pub shipping_available: bool,
    pub package_size: Option<PackageSize>,
    pub shipping_cost: Option<f64>,

    pub status: ListingStatus,
    pub platform_publications: Vec<PlatformPublication>,
    pub activity_log: Vec<ActivityLogEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<ListingStats>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Listing {
    pub fn publication(&self, platform: Platform) -> Option<&PlatformPublication> {
        self.platform_publications
            .iter()
            .find(|publication| publication.platform == platform)
    }

    pub fn platforms(&self) -> Vec<Platform> {
        self.platform_publications
            .iter()
            .map(|publication| publication.platform)
            .collect()
    }

    /// Photos sorted by their display order.
    pub fn ordered_photos(&self) -> Vec<&Photo> {
        let mut photos: Vec<&Photo> = self.photos.iter().collect();
        photos.sort_by_key(|photo| photo.order);
        photos
    }

    pub fn summary(&self) -> ListingSummary {
        ListingSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            price: self.price,
            status: self.status,
            category: self.category,
            condition: self.condition,
            cover_photo: self
                .photos
                .iter()
                .find(|photo| photo.order == 0)
                .map(|photo| photo.url.clone()),
            platforms: self
                .platform_publications
                .iter()
                .map(|publication| PlatformState {
                    platform: publication.platform,
                    status: publication.status,
                })
                .collect(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformState {
    pub platform: Platform,
    pub status: PublicationStatus,
}

/// Compact listing row used by list views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingSummary {
    pub id: String,
    pub title: String,
    pub price: f64,
    pub status: ListingStatus,
    pub category: Category,
    pub condition: Condition,
    pub cover_photo: Option<String>,
    pub platforms: Vec<PlatformState>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
