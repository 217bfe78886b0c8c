//! Static lookup data: marketplace vocabularies, display labels and the
//! category sets that drive conditional fields.

use super::listing::{
    ActivityAction, Category, Color, Condition, ListingStatus, PackageSize, Platform,
    PublicationStatus,
};

/// Categories for which a size must be provided.
pub const CATEGORIES_REQUIRING_SIZE: &[Category] = &[Category::Clothing, Category::Shoes];

/// Categories that expose the material field.
pub const CATEGORIES_WITH_MATERIAL: &[Category] =
    &[Category::Clothing, Category::Shoes, Category::Accessories];

pub const CLOTHING_SIZES: &[&str] = &["XXS", "XS", "S", "M", "L", "XL", "XXL", "XXXL"];

pub fn requires_size(category: Category) -> bool {
    CATEGORIES_REQUIRING_SIZE.contains(&category)
}

pub fn has_material(category: Category) -> bool {
    CATEGORIES_WITH_MATERIAL.contains(&category)
}

/// Every category except `Other` asks for a brand.
pub fn has_brand(category: Category) -> bool {
    category != Category::Other
}

/// EU shoe sizes 35 through 50.
pub fn shoe_sizes() -> Vec<String> {
    (35..=50).map(|size: u32| size.to_string()).collect()
}

pub fn size_options(category: Category) -> Vec<String> {
    match category {
        Category::Clothing => CLOTHING_SIZES.iter().map(|s| s.to_string()).collect(),
        Category::Shoes => shoe_sizes(),
        _ => Vec::new(),
    }
}

/// Fields a marketplace insists on before it accepts a listing, by wire name.
pub fn platform_required_fields(platform: Platform) -> &'static [&'static str] {
    match platform {
        Platform::Ebay => &[
            "title", "photos", "price", "category", "condition", "city", "province",
        ],
        Platform::Vinted => &[
            "title",
            "photos",
            "description",
            "price",
            "category",
            "condition",
            "brand",
            "size",
        ],
        Platform::Subito => &[
            "title",
            "description",
            "category",
            "condition",
            "city",
            "province",
        ],
        Platform::Facebook => &[
            "title", "photos", "price", "category", "condition", "city", "province",
        ],
    }
}

pub fn condition_for_platform(condition: Condition, platform: Platform) -> &'static str {
    use Condition::*;
    use Platform::*;
    match (condition, platform) {
        (NewWithTags, Ebay) => "New",
        (NewWithTags, Vinted) => "New with tags",
        (NewWithTags, Subito) => "New",
        (NewWithTags, Facebook) => "New",
        (NewWithoutTags, Ebay) => "New (other)",
        (NewWithoutTags, Vinted) => "New without tags",
        (NewWithoutTags, Subito) => "New",
        (NewWithoutTags, Facebook) => "New",
        (LikeNew, Ebay) => "Used – Like New",
        (LikeNew, Vinted) => "Very good",
        (LikeNew, Subito) => "Like new",
        (LikeNew, Facebook) => "Used – Like New",
        (Good, Ebay) => "Used – Good",
        (Good, Vinted) => "Good",
        (Good, Subito) => "Good",
        (Good, Facebook) => "Used – Good",
        (Fair, Ebay) => "Used – Acceptable",
        (Fair, Vinted) => "Satisfactory",
        (Fair, Subito) => "Fair",
        (Fair, Facebook) => "Used – Fair",
        (Damaged, Ebay) => "For parts or not working",
        (Damaged, Vinted) => "Satisfactory",
        (Damaged, Subito) => "Damaged",
        (Damaged, Facebook) => "Used – Fair",
    }
}

pub fn category_for_platform(category: Category, platform: Platform) -> &'static str {
    use Category::*;
    use Platform::*;
    match (category, platform) {
        (Clothing, Ebay) => "Clothing, Shoes & Accessories > Clothing",
        (Clothing, Vinted) => "Clothing",
        (Clothing, Subito) => "Clothing and Accessories",
        (Clothing, Facebook) => "Clothing & Shoes",
        (Shoes, Ebay) => "Clothing, Shoes & Accessories > Shoes",
        (Shoes, Vinted) => "Shoes",
        (Shoes, Subito) => "Clothing and Accessories",
        (Shoes, Facebook) => "Clothing & Shoes",
        (Accessories, Ebay) => "Clothing, Shoes & Accessories > Accessories",
        (Accessories, Vinted) => "Accessories",
        (Accessories, Subito) => "Clothing and Accessories",
        (Accessories, Facebook) => "Accessories",
        (Electronics, Ebay) => "Electronics",
        (Electronics, Vinted) => "Electronics",
        (Electronics, Subito) => "Electronics",
        (Electronics, Facebook) => "Electronics",
        (Home, Ebay) => "Home & Garden",
        (Home, Vinted) => "Home",
        (Home, Subito) => "Home and Personal",
        (Home, Facebook) => "Home & Garden",
        (Sports, Ebay) => "Sporting Goods",
        (Sports, Vinted) => "Sports and leisure",
        (Sports, Subito) => "Sports and Hobbies",
        (Sports, Facebook) => "Sporting Goods",
        (BooksMedia, Ebay) => "Books, Comics & Magazines",
        (BooksMedia, Vinted) => "Entertainment",
        (BooksMedia, Subito) => "Books and Magazines",
        (BooksMedia, Facebook) => "Entertainment",
        (Games, Ebay) => "Video Games & Consoles",
        (Games, Vinted) => "Electronics",
        (Games, Subito) => "Consoles and Video Games",
        (Games, Facebook) => "Toys & Games",
        (Other, Ebay) => "Everything Else",
        (Other, Vinted) => "Other",
        (Other, Subito) => "Other",
        (Other, Facebook) => "Miscellaneous",
    }
}

/// Every marketplace uses the plain color name except Facebook and eBay,
/// which spell grey the American way.
pub fn color_for_platform(color: Color, platform: Platform) -> &'static str {
    match (color, platform) {
        (Color::Grey, Platform::Ebay | Platform::Facebook) => "Gray",
        (Color::Grey, _) => "Grey",
        _ => color_label(color),
    }
}

pub fn package_size_for_platform(size: PackageSize, _platform: Platform) -> &'static str {
    match size {
        PackageSize::Small => "Small",
        PackageSize::Medium => "Medium",
        PackageSize::Large => "Large",
    }
}

pub fn platform_label(platform: Platform) -> &'static str {
    match platform {
        Platform::Ebay => "eBay",
        Platform::Vinted => "Vinted",
        Platform::Subito => "Subito.it",
        Platform::Facebook => "Facebook Marketplace",
    }
}

pub fn category_label(category: Category) -> &'static str {
    match category {
        Category::Clothing => "Clothing",
        Category::Shoes => "Shoes",
        Category::Accessories => "Accessories (bags, belts, jewellery, watches)",
        Category::Electronics => "Electronics",
        Category::Home => "Home and furniture",
        Category::Sports => "Sports and leisure",
        Category::BooksMedia => "Books and media",
        Category::Games => "Games and video games",
        Category::Other => "Other",
    }
}

pub fn condition_label(condition: Condition) -> &'static str {
    match condition {
        Condition::NewWithTags => "New with tags",
        Condition::NewWithoutTags => "New without tags",
        Condition::LikeNew => "Like new",
        Condition::Good => "Good condition",
        Condition::Fair => "Fair condition",
        Condition::Damaged => "Damaged",
    }
}

pub fn color_label(color: Color) -> &'static str {
    match color {
        Color::Black => "Black",
        Color::White => "White",
        Color::Grey => "Grey",
        Color::Blue => "Blue",
        Color::Red => "Red",
        Color::Green => "Green",
        Color::Yellow => "Yellow",
        Color::Pink => "Pink",
        Color::Orange => "Orange",
        Color::Purple => "Purple",
        Color::Brown => "Brown",
        Color::Beige => "Beige",
        Color::Multicolor => "Multicolor",
        Color::Other => "Other",
    }
}

pub fn package_size_label(size: PackageSize) -> &'static str {
    match size {
        PackageSize::Small => "Small (< 2kg)",
        PackageSize::Medium => "Medium (2-5kg)",
        PackageSize::Large => "Large (5-15kg)",
    }
}

pub fn listing_status_label(status: ListingStatus) -> &'static str {
    match status {
        ListingStatus::Draft => "Draft",
        ListingStatus::Active => "Active",
        ListingStatus::Sold => "Sold",
        ListingStatus::Archived => "Archived",
    }
}

pub fn publication_status_label(status: PublicationStatus) -> &'static str {
    match status {
        PublicationStatus::Draft => "Draft",
        PublicationStatus::Published => "Published",
        PublicationStatus::Error => "Error",
        PublicationStatus::Removed => "Removed",
    }
}

pub fn activity_action_label(action: ActivityAction) -> &'static str {
    match action {
        ActivityAction::Created => "Listing created",
        ActivityAction::Published => "Published",
        ActivityAction::Updated => "Updated",
        ActivityAction::Removed => "Removed",
        ActivityAction::Sold => "Sold",
        ActivityAction::Drafted => "Saved as draft",
        ActivityAction::Deleted => "Deleted",
        ActivityAction::PlatformAdded => "Platform added",
        ActivityAction::PlatformRemoved => "Platform removed",
    }
}
