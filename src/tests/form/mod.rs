mod field_tests;
mod readiness_tests;
mod state_tests;
mod validate_tests;
