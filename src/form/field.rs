use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{Category, Color, Condition, Listing, PackageSize, Photo, Platform};

use super::{error::FieldCoercionError, validate::WizardStep};

/// Identifier of every field a listing draft carries, in wizard order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DraftField {
    Photos,
    Title,
    Description,
    Price,
    Category,
    Condition,
    Brand,
    Size,
    Colors,
    Material,
    City,
    Province,
    ShippingAvailable,
    PackageSize,
    ShippingCost,
    Platforms,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    pub field: DraftField,
    pub name: &'static str,
    pub label: &'static str,
    pub step: WizardStep,
}

const fn descriptor(
    field: DraftField,
    name: &'static str,
    label: &'static str,
    step: WizardStep,
) -> FieldDescriptor {
    FieldDescriptor {
        field,
        name,
        label,
        step,
    }
}

/// Indexed by `DraftField as usize`.
pub const REGISTRY: [FieldDescriptor; 16] = [
    descriptor(DraftField::Photos, "photos", "Photos", WizardStep::Photos),
    descriptor(DraftField::Title, "title", "Title", WizardStep::Basics),
    descriptor(DraftField::Description, "description", "Description", WizardStep::Basics),
    descriptor(DraftField::Price, "price", "Price", WizardStep::Basics),
    descriptor(DraftField::Category, "category", "Category", WizardStep::Basics),
    descriptor(DraftField::Condition, "condition", "Condition", WizardStep::Basics),
    descriptor(DraftField::Brand, "brand", "Brand", WizardStep::Details),
    descriptor(DraftField::Size, "size", "Size", WizardStep::Details),
    descriptor(DraftField::Colors, "colors", "Colors", WizardStep::Details),
    descriptor(DraftField::Material, "material", "Material", WizardStep::Details),
    descriptor(DraftField::City, "city", "City", WizardStep::Shipping),
    descriptor(DraftField::Province, "province", "Province", WizardStep::Shipping),
    descriptor(
        DraftField::ShippingAvailable,
        "shippingAvailable",
        "Shipping available",
        WizardStep::Shipping,
    ),
    descriptor(
        DraftField::PackageSize,
        "packageSize",
        "Package size",
        WizardStep::Shipping,
    ),
    descriptor(
        DraftField::ShippingCost,
        "shippingCost",
        "Shipping cost",
        WizardStep::Shipping,
    ),
    descriptor(DraftField::Platforms, "platforms", "Platforms", WizardStep::Platforms),
];

impl DraftField {
    pub const ALL: [DraftField; 16] = [
        DraftField::Photos,
        DraftField::Title,
        DraftField::Description,
        DraftField::Price,
        DraftField::Category,
        DraftField::Condition,
        DraftField::Brand,
        DraftField::Size,
        DraftField::Colors,
        DraftField::Material,
        DraftField::City,
        DraftField::Province,
        DraftField::ShippingAvailable,
        DraftField::PackageSize,
        DraftField::ShippingCost,
        DraftField::Platforms,
    ];

    /// Fields that can be changed on an existing listing. Platforms are part of
    /// the publication history and move through dedicated actions instead.
    pub const EDITABLE: [DraftField; 15] = [
        DraftField::Photos,
        DraftField::Title,
        DraftField::Description,
        DraftField::Price,
        DraftField::Category,
        DraftField::Condition,
        DraftField::Brand,
        DraftField::Size,
        DraftField::Colors,
        DraftField::Material,
        DraftField::City,
        DraftField::Province,
        DraftField::ShippingAvailable,
        DraftField::PackageSize,
        DraftField::ShippingCost,
    ];

    pub fn descriptor(self) -> &'static FieldDescriptor {
        &REGISTRY[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.descriptor().name
    }

    pub fn label(self) -> &'static str {
        self.descriptor().label
    }

    pub fn step(self) -> WizardStep {
        self.descriptor().step
    }

    pub fn from_name(name: &str) -> Option<Self> {
        REGISTRY
            .iter()
            .find(|descriptor| descriptor.name == name)
            .map(|descriptor| descriptor.field)
    }
}

impl std::fmt::Display for DraftField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Display label for a wire field name, or the name itself when unknown.
pub fn field_label(name: &str) -> String {
    DraftField::from_name(name)
        .map(|field| field.label().to_string())
        .unwrap_or_else(|| name.to_string())
}

/// Quarter-turn rotation applied to a photo before upload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
pub enum Rotation {
    #[default]
    None,
    Quarter,
    Half,
    ThreeQuarter,
}

impl From<Rotation> for u16 {
    fn from(rotation: Rotation) -> Self {
        match rotation {
            Rotation::None => 0,
            Rotation::Quarter => 90,
            Rotation::Half => 180,
            Rotation::ThreeQuarter => 270,
        }
    }
}

impl TryFrom<u16> for Rotation {
    type Error = String;

    fn try_from(degrees: u16) -> Result<Self, Self::Error> {
        match degrees {
            0 => Ok(Rotation::None),
            90 => Ok(Rotation::Quarter),
            180 => Ok(Rotation::Half),
            270 => Ok(Rotation::ThreeQuarter),
            other => Err(format!("rotation must be 0, 90, 180 or 270 (got {other})")),
        }
    }
}

/// A local image picked by the user and not yet uploaded.
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl PhotoFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PhotoSource {
    Pending(PhotoFile),
    Stored(Photo),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DraftPhoto {
    pub source: PhotoSource,
    pub rotation: Rotation,
    /// Accumulated rotation in degrees, kept separately so the preview can
    /// animate past 360.
    pub display_rotation: i32,
}

impl DraftPhoto {
    pub fn pending(file: PhotoFile) -> Self {
        Self {
            source: PhotoSource::Pending(file),
            rotation: Rotation::None,
            display_rotation: 0,
        }
    }

    pub fn stored(photo: Photo) -> Self {
        Self {
            source: PhotoSource::Stored(photo),
            rotation: Rotation::None,
            display_rotation: 0,
        }
    }

    pub fn pending_file(&self) -> Option<&PhotoFile> {
        match &self.source {
            PhotoSource::Pending(file) => Some(file),
            PhotoSource::Stored(_) => None,
        }
    }

    pub fn stored_photo(&self) -> Option<&Photo> {
        match &self.source {
            PhotoSource::Stored(photo) => Some(photo),
            PhotoSource::Pending(_) => None,
        }
    }
}

/// File contents never leave the process; photos serialize to metadata only.
/// Two pending photos with the same name, size and type therefore compare
/// equal under [`values_equal`](crate::form::values_equal) even when their
/// bytes differ. `PartialEq` on [`DraftPhoto`] still compares the bytes.
impl Serialize for DraftPhoto {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        #[serde(untagged)]
        enum Meta<'a> {
            Pending {
                name: &'a str,
                size: usize,
                #[serde(rename = "type")]
                content_type: &'a str,
                rotation: Rotation,
                #[serde(rename = "displayRotation")]
                display_rotation: i32,
            },
            Stored {
                id: &'a str,
                url: &'a str,
                filename: &'a str,
                order: u32,
                rotation: Rotation,
                #[serde(rename = "displayRotation")]
                display_rotation: i32,
            },
        }

        let meta = match &self.source {
            PhotoSource::Pending(file) => Meta::Pending {
                name: &file.name,
                size: file.size(),
                content_type: &file.content_type,
                rotation: self.rotation,
                display_rotation: self.display_rotation,
            },
            PhotoSource::Stored(photo) => Meta::Stored {
                id: &photo.id,
                url: &photo.url,
                filename: &photo.filename,
                order: photo.order,
                rotation: self.rotation,
                display_rotation: self.display_rotation,
            },
        };
        meta.serialize(serializer)
    }
}

/// The working data of a listing form. Every field has a default, so a draft
/// is always structurally complete even while logically invalid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Draft {
    #[serde(skip_deserializing)]
    pub photos: Vec<DraftPhoto>,

    pub title: String,
    pub description: String,
    pub price: Option<f64>,
    pub category: Option<Category>,
    pub condition: Option<Condition>,

    pub brand: String,
    pub size: String,
    pub colors: Vec<Color>,
    pub material: String,

    pub city: String,
    pub province: String,
    pub shipping_available: bool,
    pub package_size: Option<PackageSize>,
    pub shipping_cost: Option<f64>,

    pub platforms: Vec<Platform>,
}

impl Default for Draft {
    fn default() -> Self {
        Self {
            photos: Vec::new(),
            title: String::new(),
            description: String::new(),
            price: None,
            category: None,
            condition: None,
            brand: String::new(),
            size: String::new(),
            colors: Vec::new(),
            material: String::new(),
            city: String::new(),
            province: String::new(),
            shipping_available: true,
            package_size: None,
            shipping_cost: None,
            platforms: Vec::new(),
        }
    }
}

impl Draft {
    /// Copies the editable fields of a stored listing. Status, publications,
    /// stats and the activity log stay behind.
    pub fn from_listing(listing: &Listing) -> Self {
        Self {
            photos: listing
                .ordered_photos()
                .into_iter()
                .cloned()
                .map(DraftPhoto::stored)
                .collect(),
            title: listing.title.clone(),
            description: listing.description.clone(),
            price: Some(listing.price),
            category: Some(listing.category),
            condition: Some(listing.condition),
            brand: listing.brand.clone().unwrap_or_default(),
            size: listing.size.clone().unwrap_or_default(),
            colors: listing.colors.clone(),
            material: listing.material.clone().unwrap_or_default(),
            city: listing.city.clone(),
            province: listing.province.clone(),
            shipping_available: listing.shipping_available,
            package_size: listing.package_size,
            shipping_cost: listing.shipping_cost,
            platforms: Vec::new(),
        }
    }

    pub fn value_of(&self, field: DraftField) -> Value {
        match field {
            DraftField::Photos => encode(&self.photos),
            DraftField::Title => Value::String(self.title.clone()),
            DraftField::Description => Value::String(self.description.clone()),
            DraftField::Price => encode(&self.price),
            DraftField::Category => encode(&self.category),
            DraftField::Condition => encode(&self.condition),
            DraftField::Brand => Value::String(self.brand.clone()),
            DraftField::Size => Value::String(self.size.clone()),
            DraftField::Colors => encode(&self.colors),
            DraftField::Material => Value::String(self.material.clone()),
            DraftField::City => Value::String(self.city.clone()),
            DraftField::Province => Value::String(self.province.clone()),
            DraftField::ShippingAvailable => Value::Bool(self.shipping_available),
            DraftField::PackageSize => encode(&self.package_size),
            DraftField::ShippingCost => encode(&self.shipping_cost),
            DraftField::Platforms => encode(&self.platforms),
        }
    }

    /// Replaces one field from a loosely typed value.
    ///
    /// Photos carry file contents and can only be cleared here; adding and
    /// reordering goes through the photo operations of the form.
    pub fn set_field(&mut self, field: DraftField, value: Value) -> Result<(), FieldCoercionError> {
        match field {
            DraftField::Photos => match value {
                Value::Null => self.photos.clear(),
                Value::Array(items) if items.is_empty() => self.photos.clear(),
                _ => {
                    return Err(FieldCoercionError::new(
                        field.name(),
                        "photos are managed through the photo operations",
                    ));
                }
            },
            DraftField::Title => self.title = decode_text(field, value)?,
            DraftField::Description => self.description = decode_text(field, value)?,
            DraftField::Price => self.price = decode_number(field, value)?,
            DraftField::Category => self.category = decode(field, value)?,
            DraftField::Condition => self.condition = decode(field, value)?,
            DraftField::Brand => self.brand = decode_text(field, value)?,
            DraftField::Size => self.size = decode_text(field, value)?,
            DraftField::Colors => self.colors = decode_list(field, value)?,
            DraftField::Material => self.material = decode_text(field, value)?,
            DraftField::City => self.city = decode_text(field, value)?,
            DraftField::Province => self.province = decode_text(field, value)?,
            DraftField::ShippingAvailable => self.shipping_available = decode(field, value)?,
            DraftField::PackageSize => self.package_size = decode(field, value)?,
            DraftField::ShippingCost => self.shipping_cost = decode_number(field, value)?,
            DraftField::Platforms => self.platforms = decode_list(field, value)?,
        }
        Ok(())
    }
}

/// Photo list operations shared by the wizard and the edit engine.
impl Draft {
    /// Appends a photo unless the list already holds `max` entries.
    pub fn push_photo(&mut self, photo: DraftPhoto, max: usize) -> bool {
        if self.photos.len() >= max {
            return false;
        }
        self.photos.push(photo);
        true
    }

    /// Sets the rotation of one photo; the display angle defaults to the
    /// rotation itself.
    pub fn rotate_photo(
        &mut self,
        index: usize,
        rotation: Rotation,
        display_rotation: Option<i32>,
    ) -> bool {
        let Some(photo) = self.photos.get_mut(index) else {
            return false;
        };
        photo.rotation = rotation;
        photo.display_rotation = display_rotation.unwrap_or(i32::from(u16::from(rotation)));
        true
    }

    pub fn remove_photo(&mut self, index: usize) -> Option<DraftPhoto> {
        (index < self.photos.len()).then(|| self.photos.remove(index))
    }

    /// Moves the photo at `from` so it ends up at `to`; targets past the end
    /// land last.
    pub fn move_photo(&mut self, from: usize, to: usize) -> bool {
        if from >= self.photos.len() {
            return false;
        }
        let photo = self.photos.remove(from);
        let to = to.min(self.photos.len());
        self.photos.insert(to, photo);
        true
    }
}

fn encode<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

fn decode<T: DeserializeOwned>(field: DraftField, value: Value) -> Result<T, FieldCoercionError> {
    serde_json::from_value(value)
        .map_err(|err| FieldCoercionError::new(field.name(), err.to_string()))
}

fn decode_text(field: DraftField, value: Value) -> Result<String, FieldCoercionError> {
    match value {
        Value::Null => Ok(String::new()),
        other => decode(field, other),
    }
}

fn decode_list<T: DeserializeOwned>(
    field: DraftField,
    value: Value,
) -> Result<Vec<T>, FieldCoercionError> {
    match value {
        Value::Null => Ok(Vec::new()),
        other => decode(field, other),
    }
}

/// Accepts numbers, numeric strings (decimal columns often arrive as text) and
/// empty input.
fn decode_number(field: DraftField, value: Value) -> Result<Option<f64>, FieldCoercionError> {
    match value {
        Value::Null => Ok(None),
        Value::Number(number) => Ok(number.as_f64()),
        Value::String(text) if text.trim().is_empty() => Ok(None),
        Value::String(text) => text
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| FieldCoercionError::new(field.name(), format!("'{text}' is not a number"))),
        other => Err(FieldCoercionError::new(
            field.name(),
            format!("expected a number, got {other}"),
        )),
    }
}
