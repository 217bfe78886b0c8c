use async_trait::async_trait;
use chrono::Utc;
use indexmap::IndexMap;
use regex::RegexBuilder;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::{
    ActivityAction, ActivityLogEntry, Category, Condition, Listing, ListingStats, ListingStatus,
    ListingSummary, PackageSize, Photo, Platform, PlatformPublication, PublicationStatus,
};
use crate::form::{DraftField, PhotoFile, field_label, values_equal};

use super::{
    CreateListingPayload, ListingFilter, ListingService, ServiceError, ServiceResult,
    UpdateListingPayload,
    options::ServiceOptions,
    upload::{generate_filename, upload_url, validate_file},
};

const READONLY_FIELDS: &[&str] = &["id", "userId", "createdAt", "updatedAt", "status"];
const NOT_FOUND: &str = "Listing not found";

/// Serializable copy of every listing held by the service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub listings: Vec<Listing>,
}

/// Listing service kept in process memory.
///
/// Each operation takes the catalog lock once, so a mutation and its
/// activity-log entry land together or not at all.
pub struct InMemoryListingService {
    catalog: Mutex<Vec<Listing>>,
    options: ServiceOptions,
}

impl Default for InMemoryListingService {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryListingService {
    pub fn new() -> Self {
        Self::with_options(ServiceOptions::default())
    }

    pub fn with_options(options: ServiceOptions) -> Self {
        Self {
            catalog: Mutex::new(Vec::new()),
            options,
        }
    }

    pub fn from_snapshot(snapshot: CatalogSnapshot, options: ServiceOptions) -> Self {
        Self {
            catalog: Mutex::new(snapshot.listings),
            options,
        }
    }

    pub async fn snapshot(&self) -> CatalogSnapshot {
        CatalogSnapshot {
            listings: self.catalog.lock().await.clone(),
        }
    }

    pub fn options(&self) -> &ServiceOptions {
        &self.options
    }

    fn validate_create(&self, payload: &CreateListingPayload) -> Vec<String> {
        let mut errors = Vec::new();

        let title = payload.title.trim();
        if title.is_empty() {
            errors.push("Title is required".to_string());
        } else if title.chars().count() > self.options.title_max_chars {
            errors.push(format!(
                "Title cannot exceed {} characters",
                self.options.title_max_chars
            ));
        }

        let description = payload.description.trim();
        if description.is_empty() {
            errors.push("Description is required".to_string());
        } else if description.chars().count() > self.options.description_max_chars {
            errors.push(format!(
                "Description cannot exceed {} characters",
                self.options.description_max_chars
            ));
        }

        if !(payload.price.is_finite() && payload.price > 0.0) {
            errors.push("Price must be a positive number".to_string());
        }

        if payload.city.trim().is_empty() {
            errors.push("City is required".to_string());
        }

        if !is_province_code(&payload.province) {
            errors.push("Province is required (2-letter code)".to_string());
        }

        errors
    }

    /// Checks the fields present in a partial update, in the order a client
    /// would expect to see them reported.
    fn validate_update(&self, payload: &UpdateListingPayload) -> ServiceResult<()> {
        for field in READONLY_FIELDS {
            if payload.contains(field) {
                return Err(ServiceError::bad_request(format!(
                    "Field '{field}' cannot be modified"
                )));
            }
        }

        if let Some(value) = payload.get("title") {
            let title = value.as_str().map(str::trim).unwrap_or_default();
            if title.is_empty() {
                return Err(ServiceError::bad_request("Title cannot be empty"));
            }
            if title.chars().count() > self.options.title_max_chars {
                return Err(ServiceError::bad_request(format!(
                    "Title cannot exceed {} characters",
                    self.options.title_max_chars
                )));
            }
        }

        if let Some(value) = payload.get("description") {
            let description = value.as_str().map(str::trim).unwrap_or_default();
            if description.is_empty() {
                return Err(ServiceError::bad_request("Description cannot be empty"));
            }
            if description.chars().count() > self.options.description_max_chars {
                return Err(ServiceError::bad_request(format!(
                    "Description cannot exceed {} characters",
                    self.options.description_max_chars
                )));
            }
        }

        if let Some(value) = payload.get("price") {
            match value.as_f64() {
                Some(price) if price.is_finite() && price > 0.0 => {}
                _ => return Err(ServiceError::bad_request("Price must be a positive number")),
            }
        }

        if payload
            .get("category")
            .is_some_and(|value| parse_enum::<Category>(value).is_none())
        {
            return Err(ServiceError::bad_request("Invalid category"));
        }

        if payload
            .get("condition")
            .is_some_and(|value| parse_enum::<Condition>(value).is_none())
        {
            return Err(ServiceError::bad_request("Invalid condition"));
        }

        if payload
            .get("city")
            .is_some_and(|value| value.as_str().map(str::trim).unwrap_or_default().is_empty())
        {
            return Err(ServiceError::bad_request("City cannot be empty"));
        }

        if payload
            .get("province")
            .is_some_and(|value| !value.as_str().is_some_and(is_province_code))
        {
            return Err(ServiceError::bad_request(
                "Province must be a 2-letter code",
            ));
        }

        if payload.get("packageSize").is_some_and(|value| {
            !value.is_null() && parse_enum::<PackageSize>(value).is_none()
        }) {
            return Err(ServiceError::bad_request("Invalid package size"));
        }

        Ok(())
    }
}

#[async_trait]
impl ListingService for InMemoryListingService {
    async fn create(&self, payload: CreateListingPayload) -> ServiceResult<Listing> {
        let errors = self.validate_create(&payload);
        if !errors.is_empty() {
            return Err(ServiceError::bad_request(errors.join("; ")));
        }

        let now = Utc::now();
        let id = new_id();

        let mut platforms: Vec<Platform> = Vec::new();
        for platform in payload.platforms {
            if !platforms.contains(&platform) {
                platforms.push(platform);
            }
        }

        let listing = Listing {
            id: id.clone(),
            photos: Vec::new(),
            title: payload.title.trim().to_string(),
            description: payload.description.trim().to_string(),
            price: payload.price,
            category: payload.category,
            condition: payload.condition,
            brand: trimmed_optional(payload.brand),
            size: trimmed_optional(payload.size),
            colors: payload.colors,
            material: trimmed_optional(payload.material),
            city: payload.city.trim().to_string(),
            province: payload.province.trim().to_uppercase(),
            shipping_available: payload.shipping_available,
            package_size: payload.package_size,
            shipping_cost: payload.shipping_cost,
            status: ListingStatus::Draft,
            platform_publications: platforms
                .into_iter()
                .map(new_publication)
                .collect(),
            activity_log: vec![activity(
                ActivityAction::Created,
                "Listing created",
                None,
                None,
            )],
            stats: Some(ListingStats::default()),
            created_at: now,
            updated_at: now,
        };

        log::info!("created listing {id}");
        self.catalog.lock().await.push(listing.clone());
        Ok(listing)
    }

    async fn update(&self, id: &str, payload: UpdateListingPayload) -> ServiceResult<Listing> {
        self.validate_update(&payload)?;

        let mut catalog = self.catalog.lock().await;
        let listing = find_mut(&mut catalog, id)?;

        let mut changes: IndexMap<DraftField, (Value, Value)> = IndexMap::new();
        for field in DraftField::EDITABLE {
            if field == DraftField::Photos {
                continue;
            }
            let Some(raw) = payload.get(field.name()) else {
                continue;
            };
            let next = normalize_update_value(field, raw.clone());
            let current = listing_value(listing, field);
            if !values_equal(Some(&current), Some(&next)) {
                changes.insert(field, (current, next));
            }
        }

        if changes.is_empty() {
            return Ok(listing.clone());
        }

        // Apply to a copy first so a type error leaves the stored listing untouched.
        let mut updated = listing.clone();
        for (field, (_, next)) in &changes {
            apply_listing_value(&mut updated, *field, next.clone())?;
        }

        let labels: Vec<String> = changes
            .keys()
            .map(|field| field_label(field.name()).to_lowercase())
            .collect();
        let changed_fields: Map<String, Value> = changes
            .iter()
            .map(|(field, (from, to))| {
                (
                    field.name().to_string(),
                    json!({ "from": from, "to": to }),
                )
            })
            .collect();

        updated.updated_at = Utc::now();
        push_activity(
            &mut updated,
            activity(
                ActivityAction::Updated,
                format!("Updated: {}", labels.join(", ")),
                None,
                Some(json!({ "changedFields": changed_fields })),
            ),
        );

        log::info!("updated listing {id}: {}", labels.join(", "));
        *listing = updated;
        Ok(listing.clone())
    }

    async fn remove(&self, id: &str) -> ServiceResult<()> {
        let mut catalog = self.catalog.lock().await;
        let index = catalog
            .iter()
            .position(|listing| listing.id == id)
            .ok_or_else(|| ServiceError::not_found(NOT_FOUND))?;
        catalog.remove(index);
        log::info!("removed listing {id}");
        Ok(())
    }

    async fn upload_photos(&self, id: &str, files: Vec<PhotoFile>) -> ServiceResult<Vec<Photo>> {
        if files.is_empty() {
            return Err(ServiceError::bad_request("No files sent"));
        }

        let limits = &self.options.uploads;
        let mut catalog = self.catalog.lock().await;
        let listing = find_mut(&mut catalog, id)?;

        let existing = listing.photos.len();
        if existing + files.len() > limits.max_files {
            return Err(ServiceError::bad_request(format!(
                "Photo limit exceeded: {existing} existing + {} new = {}. Maximum {}.",
                files.len(),
                existing + files.len(),
                limits.max_files
            )));
        }

        for file in &files {
            validate_file(file, limits).map_err(ServiceError::bad_request)?;
        }

        let now = Utc::now();
        let created: Vec<Photo> = files
            .iter()
            .enumerate()
            .map(|(offset, file)| {
                let filename = generate_filename(id, &file.name, now);
                Photo {
                    id: new_id(),
                    url: upload_url(id, &filename),
                    filename,
                    order: (existing + offset) as u32,
                }
            })
            .collect();

        listing.photos.extend(created.iter().cloned());
        listing.updated_at = now;
        log::info!("uploaded {} photo(s) to listing {id}", created.len());
        Ok(created)
    }

    async fn get(&self, id: &str) -> ServiceResult<Listing> {
        let catalog = self.catalog.lock().await;
        catalog
            .iter()
            .find(|listing| listing.id == id)
            .cloned()
            .ok_or_else(|| ServiceError::not_found(NOT_FOUND))
    }

    async fn list(&self, filter: ListingFilter) -> ServiceResult<Vec<ListingSummary>> {
        let catalog = self.catalog.lock().await;
        let search = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty());
        let matcher = search.and_then(|term| {
            RegexBuilder::new(&regex::escape(term))
                .case_insensitive(true)
                .build()
                .ok()
        });

        let mut rows: Vec<&Listing> = catalog
            .iter()
            .filter(|listing| filter.status.is_none_or(|status| listing.status == status))
            .filter(|listing| {
                filter
                    .category
                    .is_none_or(|category| listing.category == category)
            })
            .filter(|listing| match (&matcher, search) {
                (Some(matcher), _) => matcher.is_match(&listing.title),
                (None, Some(term)) => listing
                    .title
                    .to_lowercase()
                    .contains(&term.to_lowercase()),
                (None, None) => true,
            })
            .collect();
        rows.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(rows.into_iter().map(Listing::summary).collect())
    }

    async fn reorder_photos(&self, id: &str, photo_ids: Vec<String>) -> ServiceResult<Vec<Photo>> {
        if photo_ids.is_empty() {
            return Err(ServiceError::bad_request(
                "photoIds must be a non-empty array",
            ));
        }

        let mut catalog = self.catalog.lock().await;
        let listing = find_mut(&mut catalog, id)?;

        if photo_ids.len() != listing.photos.len() {
            return Err(ServiceError::bad_request(format!(
                "Photo count mismatch: sent {}, existing {}",
                photo_ids.len(),
                listing.photos.len()
            )));
        }
        for photo_id in &photo_ids {
            if !listing.photos.iter().any(|photo| &photo.id == photo_id) {
                return Err(ServiceError::bad_request(format!(
                    "Photo not found: {photo_id}"
                )));
            }
        }

        for photo in &mut listing.photos {
            if let Some(position) = photo_ids.iter().position(|photo_id| photo_id == &photo.id) {
                photo.order = position as u32;
            }
        }
        listing.photos.sort_by_key(|photo| photo.order);
        listing.updated_at = Utc::now();
        Ok(listing.photos.clone())
    }

    async fn delete_photo(&self, id: &str, photo_id: &str) -> ServiceResult<()> {
        let mut catalog = self.catalog.lock().await;
        let listing = find_mut(&mut catalog, id)
            .map_err(|_| ServiceError::not_found("Photo not found"))?;

        let index = listing
            .photos
            .iter()
            .position(|photo| photo.id == photo_id)
            .ok_or_else(|| ServiceError::not_found("Photo not found"))?;
        listing.photos.remove(index);

        listing.photos.sort_by_key(|photo| photo.order);
        for (order, photo) in listing.photos.iter_mut().enumerate() {
            photo.order = order as u32;
        }
        listing.updated_at = Utc::now();
        Ok(())
    }

    async fn publish(&self, id: &str) -> ServiceResult<Listing> {
        let mut catalog = self.catalog.lock().await;
        let listing = find_mut(&mut catalog, id)?;

        if listing.platform_publications.is_empty() {
            return Err(ServiceError::bad_request("Select at least one platform"));
        }
        if listing.photos.is_empty() {
            return Err(ServiceError::bad_request("Add at least one photo"));
        }

        let now = Utc::now();
        listing.status = ListingStatus::Active;
        for publication in &mut listing.platform_publications {
            if matches!(
                publication.status,
                PublicationStatus::Draft | PublicationStatus::Error
            ) {
                publication.status = PublicationStatus::Published;
                publication.published_at = Some(now);
                publication.updated_at = now;
            }
        }

        let platforms = listing.platforms();
        let names: Vec<&str> = platforms.iter().map(|platform| platform.as_str()).collect();
        listing.updated_at = now;
        push_activity(
            listing,
            activity(
                ActivityAction::Published,
                format!("Published on {}", names.join(", ")),
                None,
                Some(json!({ "platforms": platforms })),
            ),
        );
        log::info!("published listing {id} on {}", names.join(", "));
        Ok(listing.clone())
    }

    async fn publish_platform(
        &self,
        id: &str,
        platform: Platform,
    ) -> ServiceResult<PlatformPublication> {
        let mut catalog = self.catalog.lock().await;
        let listing = find_mut(&mut catalog, id)?;
        let now = Utc::now();

        let publication = listing
            .platform_publications
            .iter_mut()
            .find(|publication| publication.platform == platform)
            .ok_or_else(|| ServiceError::not_found("Platform not found"))?;
        if publication.status == PublicationStatus::Published {
            return Err(ServiceError::bad_request("Platform already published"));
        }
        publication.status = PublicationStatus::Published;
        publication.published_at = Some(now);
        publication.last_error = None;
        publication.updated_at = now;
        let published = publication.clone();

        if listing.status == ListingStatus::Draft {
            listing.status = ListingStatus::Active;
        }
        listing.updated_at = now;
        push_activity(
            listing,
            activity(
                ActivityAction::Published,
                format!("Published on {platform}"),
                Some(platform),
                None,
            ),
        );
        log::info!("published listing {id} on {platform}");
        Ok(published)
    }

    async fn add_platform(
        &self,
        id: &str,
        platform: Platform,
    ) -> ServiceResult<PlatformPublication> {
        let mut catalog = self.catalog.lock().await;
        let listing = find_mut(&mut catalog, id)?;

        if listing.publication(platform).is_some() {
            return Err(ServiceError::bad_request("Platform already added"));
        }

        let publication = new_publication(platform);
        listing.platform_publications.push(publication.clone());
        listing.updated_at = Utc::now();
        push_activity(
            listing,
            activity(
                ActivityAction::PlatformAdded,
                format!("Platform {platform} added"),
                Some(platform),
                None,
            ),
        );
        Ok(publication)
    }

    async fn remove_platform(&self, id: &str, platform: Platform) -> ServiceResult<()> {
        let mut catalog = self.catalog.lock().await;
        let listing = find_mut(&mut catalog, id)?;
        let now = Utc::now();

        let publication = listing
            .platform_publications
            .iter_mut()
            .find(|publication| publication.platform == platform)
            .ok_or_else(|| ServiceError::not_found("Platform not found"))?;
        publication.status = PublicationStatus::Removed;
        publication.updated_at = now;

        push_activity(
            listing,
            activity(
                ActivityAction::PlatformRemoved,
                format!("Removed from {platform}"),
                Some(platform),
                None,
            ),
        );

        let others_inactive = listing
            .platform_publications
            .iter()
            .filter(|publication| publication.platform != platform)
            .all(|publication| {
                matches!(
                    publication.status,
                    PublicationStatus::Removed | PublicationStatus::Draft
                )
            });
        if others_inactive {
            listing.status = ListingStatus::Draft;
        }
        listing.updated_at = now;
        log::info!("removed listing {id} from {platform}");
        Ok(())
    }

    async fn mark_sold(&self, id: &str, platform: Option<Platform>) -> ServiceResult<Listing> {
        let mut catalog = self.catalog.lock().await;
        let listing = find_mut(&mut catalog, id)?;

        listing.status = ListingStatus::Sold;
        listing.updated_at = Utc::now();
        let description = match platform {
            Some(platform) => format!("Sold via {platform}"),
            None => "Marked as sold".to_string(),
        };
        push_activity(
            listing,
            activity(ActivityAction::Sold, description, platform, None),
        );
        Ok(listing.clone())
    }

    async fn revert_to_draft(&self, id: &str) -> ServiceResult<Listing> {
        let mut catalog = self.catalog.lock().await;
        let listing = find_mut(&mut catalog, id)?;

        listing.status = ListingStatus::Draft;
        listing.updated_at = Utc::now();
        push_activity(
            listing,
            activity(ActivityAction::Drafted, "Saved as draft", None, None),
        );
        Ok(listing.clone())
    }

    async fn duplicate(&self, id: &str) -> ServiceResult<Listing> {
        let mut catalog = self.catalog.lock().await;
        let source = catalog
            .iter()
            .find(|listing| listing.id == id)
            .ok_or_else(|| ServiceError::not_found(NOT_FOUND))?;

        let now = Utc::now();
        let copy = Listing {
            id: new_id(),
            photos: Vec::new(),
            title: format!("Copy of — {}", source.title),
            status: ListingStatus::Draft,
            platform_publications: Vec::new(),
            activity_log: vec![activity(
                ActivityAction::Created,
                format!("Duplicated from {}", source.title),
                None,
                Some(json!({ "duplicatedFrom": id })),
            )],
            stats: Some(ListingStats::default()),
            created_at: now,
            updated_at: now,
            ..source.clone()
        };

        log::info!("duplicated listing {id} as {}", copy.id);
        catalog.push(copy.clone());
        Ok(copy)
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn new_publication(platform: Platform) -> PlatformPublication {
    let now = Utc::now();
    PlatformPublication {
        id: new_id(),
        platform,
        status: PublicationStatus::Draft,
        platform_listing_id: None,
        platform_listing_url: None,
        published_at: None,
        last_error: None,
        created_at: now,
        updated_at: now,
    }
}

fn activity(
    action: ActivityAction,
    description: impl Into<String>,
    platform: Option<Platform>,
    metadata: Option<Value>,
) -> ActivityLogEntry {
    ActivityLogEntry {
        id: new_id(),
        action,
        description: description.into(),
        platform,
        created_at: Utc::now(),
        metadata,
    }
}

/// The log is kept newest first.
fn push_activity(listing: &mut Listing, entry: ActivityLogEntry) {
    listing.activity_log.insert(0, entry);
}

fn find_mut<'a>(catalog: &'a mut [Listing], id: &str) -> ServiceResult<&'a mut Listing> {
    catalog
        .iter_mut()
        .find(|listing| listing.id == id)
        .ok_or_else(|| ServiceError::not_found(NOT_FOUND))
}

fn is_province_code(province: &str) -> bool {
    let code = province.trim();
    code.chars().count() == 2 && code.chars().all(|c| c.is_ascii_alphabetic())
}

fn trimmed_optional(text: Option<String>) -> Option<String> {
    text.map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

fn parse_enum<T: std::str::FromStr>(value: &Value) -> Option<T> {
    value.as_str().and_then(|text| text.parse().ok())
}

fn normalize_update_value(field: DraftField, value: Value) -> Value {
    match (field, value) {
        (DraftField::Province, Value::String(text)) => Value::String(text.trim().to_uppercase()),
        (DraftField::Brand | DraftField::Size | DraftField::Material, Value::String(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                Value::Null
            } else {
                Value::String(trimmed.to_string())
            }
        }
        (_, Value::String(text)) => Value::String(text.trim().to_string()),
        (_, other) => other,
    }
}

fn listing_value(listing: &Listing, field: DraftField) -> Value {
    let value = match field {
        DraftField::Photos => serde_json::to_value(&listing.photos),
        DraftField::Title => Ok(Value::String(listing.title.clone())),
        DraftField::Description => Ok(Value::String(listing.description.clone())),
        DraftField::Price => serde_json::to_value(listing.price),
        DraftField::Category => serde_json::to_value(listing.category),
        DraftField::Condition => serde_json::to_value(listing.condition),
        DraftField::Brand => serde_json::to_value(&listing.brand),
        DraftField::Size => serde_json::to_value(&listing.size),
        DraftField::Colors => serde_json::to_value(&listing.colors),
        DraftField::Material => serde_json::to_value(&listing.material),
        DraftField::City => Ok(Value::String(listing.city.clone())),
        DraftField::Province => Ok(Value::String(listing.province.clone())),
        DraftField::ShippingAvailable => Ok(Value::Bool(listing.shipping_available)),
        DraftField::PackageSize => serde_json::to_value(listing.package_size),
        DraftField::ShippingCost => serde_json::to_value(listing.shipping_cost),
        DraftField::Platforms => serde_json::to_value(listing.platforms()),
    };
    value.unwrap_or(Value::Null)
}

fn apply_listing_value(listing: &mut Listing, field: DraftField, value: Value) -> ServiceResult<()> {
    fn decode<T: serde::de::DeserializeOwned>(field: DraftField, value: Value) -> ServiceResult<T> {
        serde_json::from_value(value).map_err(|err| {
            ServiceError::bad_request(format!("Invalid value for '{}': {err}", field.name()))
        })
    }

    match field {
        DraftField::Title => listing.title = decode(field, value)?,
        DraftField::Description => listing.description = decode(field, value)?,
        DraftField::Price => listing.price = decode(field, value)?,
        DraftField::Category => listing.category = decode(field, value)?,
        DraftField::Condition => listing.condition = decode(field, value)?,
        DraftField::Brand => listing.brand = decode(field, value)?,
        DraftField::Size => listing.size = decode(field, value)?,
        DraftField::Colors => listing.colors = decode(field, value)?,
        DraftField::Material => listing.material = decode(field, value)?,
        DraftField::City => listing.city = decode(field, value)?,
        DraftField::Province => listing.province = decode(field, value)?,
        DraftField::ShippingAvailable => listing.shipping_available = decode(field, value)?,
        DraftField::PackageSize => listing.package_size = decode(field, value)?,
        DraftField::ShippingCost => listing.shipping_cost = decode(field, value)?,
        DraftField::Photos | DraftField::Platforms => {
            return Err(ServiceError::bad_request(format!(
                "Field '{}' cannot be updated directly",
                field.name()
            )));
        }
    }
    Ok(())
}
