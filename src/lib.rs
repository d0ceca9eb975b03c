// Library exports for integration tests
pub mod config;
pub mod dismiss;
pub mod form;
pub mod handlers;
pub mod identity;
pub mod registry;
pub mod sweep;
pub mod templates;
pub mod validation;
