use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::domain::{Category, mapping};

use super::field::{Draft, DraftField};

pub const MAX_PHOTOS: usize = 6;
pub const TITLE_MAX_CHARS: usize = 80;

/// One of the five sequential groups of the creation wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum WizardStep {
    Photos = 1,
    Basics = 2,
    Details = 3,
    Shipping = 4,
    Platforms = 5,
}

impl WizardStep {
    pub const ALL: [WizardStep; 5] = [
        WizardStep::Photos,
        WizardStep::Basics,
        WizardStep::Details,
        WizardStep::Shipping,
        WizardStep::Platforms,
    ];

    pub const FIRST: WizardStep = WizardStep::Photos;
    pub const LAST: WizardStep = WizardStep::Platforms;

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(number: u8) -> Option<Self> {
        WizardStep::ALL
            .iter()
            .copied()
            .find(|step| step.number() == number)
    }

    pub fn next(self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    pub fn prev(self) -> Option<Self> {
        self.number().checked_sub(1).and_then(Self::from_number)
    }

    pub fn title(self) -> &'static str {
        match self {
            WizardStep::Photos => "Photos",
            WizardStep::Basics => "Basic info",
            WizardStep::Details => "Details",
            WizardStep::Shipping => "Shipping",
            WizardStep::Platforms => "Platforms",
        }
    }
}

impl From<WizardStep> for u8 {
    fn from(step: WizardStep) -> Self {
        step.number()
    }
}

/// A step number outside `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidStepError {
    pub step: u8,
}

impl fmt::Display for InvalidStepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no wizard step {}", self.step)
    }
}

impl std::error::Error for InvalidStepError {}

impl TryFrom<u8> for WizardStep {
    type Error = InvalidStepError;

    fn try_from(number: u8) -> Result<Self, Self::Error> {
        WizardStep::from_number(number).ok_or(InvalidStepError { step: number })
    }
}

pub type ErrorMap = IndexMap<DraftField, String>;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepValidation {
    pub is_valid: bool,
    pub errors: ErrorMap,
}

impl StepValidation {
    fn from_errors(errors: ErrorMap) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    pub fn error(&self, field: DraftField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }
}

pub fn validate_step(draft: &Draft, step: WizardStep) -> StepValidation {
    let errors = match step {
        WizardStep::Photos => photo_errors(draft),
        WizardStep::Basics => basics_errors(draft),
        WizardStep::Details => details_errors(draft),
        WizardStep::Shipping => shipping_errors(draft),
        WizardStep::Platforms => platform_errors(draft),
    };
    StepValidation::from_errors(errors)
}

/// Validation by raw step number; anything outside `1..=5` is invalid with no
/// field errors.
pub fn validate_step_number(draft: &Draft, step: u8) -> StepValidation {
    match WizardStep::from_number(step) {
        Some(step) => validate_step(draft, step),
        None => StepValidation::default(),
    }
}

/// True when every step strictly before `step` validates.
pub fn previous_steps_valid(draft: &Draft, step: u8) -> bool {
    (1..step).all(|earlier| validate_step_number(draft, earlier).is_valid)
}

/// A step only counts as completed when it and all earlier steps are valid,
/// so fixing a later step never unlocks the wizard past a broken one.
pub fn is_step_completed(draft: &Draft, step: u8) -> bool {
    previous_steps_valid(draft, step) && validate_step_number(draft, step).is_valid
}

/// Errors for an existing listing: every wizard rule except platform choice.
pub fn validate_listing(draft: &Draft) -> ErrorMap {
    let mut errors = ErrorMap::new();
    for step in [
        WizardStep::Photos,
        WizardStep::Basics,
        WizardStep::Details,
        WizardStep::Shipping,
    ] {
        errors.extend(validate_step(draft, step).errors);
    }
    errors
}

fn photo_errors(draft: &Draft) -> ErrorMap {
    let mut errors = ErrorMap::new();
    let count = draft.photos.len();
    if count == 0 {
        errors.insert(DraftField::Photos, "Upload at least one photo".to_string());
    } else if count > MAX_PHOTOS {
        errors.insert(
            DraftField::Photos,
            format!("At most {MAX_PHOTOS} photos are allowed"),
        );
    }
    errors
}

fn basics_errors(draft: &Draft) -> ErrorMap {
    let mut errors = ErrorMap::new();

    if draft.title.trim().is_empty() {
        errors.insert(DraftField::Title, "Title is required".to_string());
    } else if draft.title.chars().count() > TITLE_MAX_CHARS {
        errors.insert(
            DraftField::Title,
            format!("Title cannot exceed {TITLE_MAX_CHARS} characters"),
        );
    }

    if draft.description.trim().is_empty() {
        errors.insert(DraftField::Description, "Description is required".to_string());
    }

    match draft.price {
        Some(price) if price.is_finite() && price > 0.0 => {}
        _ => {
            errors.insert(DraftField::Price, "Enter a valid price".to_string());
        }
    }

    if draft.category.is_none() {
        errors.insert(DraftField::Category, "Select a category".to_string());
    }

    if draft.condition.is_none() {
        errors.insert(DraftField::Condition, "Select the condition".to_string());
    }

    errors
}

fn details_errors(draft: &Draft) -> ErrorMap {
    let mut errors = ErrorMap::new();
    let Some(category) = draft.category else {
        return errors;
    };

    if category != Category::Other && draft.brand.trim().is_empty() {
        errors.insert(DraftField::Brand, "Brand is required".to_string());
    }

    if mapping::requires_size(category) && draft.size.is_empty() {
        errors.insert(DraftField::Size, "Size is required".to_string());
    }

    errors
}

fn shipping_errors(draft: &Draft) -> ErrorMap {
    let mut errors = ErrorMap::new();

    if draft.city.trim().is_empty() {
        errors.insert(DraftField::City, "City is required".to_string());
    }

    if draft.province.trim().is_empty() {
        errors.insert(DraftField::Province, "Province is required".to_string());
    }

    if draft.shipping_available && draft.package_size.is_none() {
        errors.insert(DraftField::PackageSize, "Select the package size".to_string());
    }

    errors
}

fn platform_errors(draft: &Draft) -> ErrorMap {
    let mut errors = ErrorMap::new();
    if draft.platforms.is_empty() {
        errors.insert(DraftField::Platforms, "Select at least one platform".to_string());
    }
    errors
}
