//! The listing draft, its validators and the two engines that mutate it.

mod detail;
mod error;
mod field;
mod readiness;
mod state;
mod validate;
mod value;

pub use detail::{ListingEditor, SavePlan};
pub use error::FieldCoercionError;
pub use field::{
    Draft, DraftField, DraftPhoto, FieldDescriptor, PhotoFile, PhotoSource, REGISTRY, Rotation,
    field_label,
};
pub use readiness::{PlatformReadiness, readiness, readiness_all};
pub use state::{ListingForm, PendingSubmit, SubmitMode};
pub use validate::{
    ErrorMap, InvalidStepError, MAX_PHOTOS, StepValidation, TITLE_MAX_CHARS, WizardStep,
    is_step_completed, previous_steps_valid, validate_listing, validate_step,
    validate_step_number,
};
pub use value::values_equal;
