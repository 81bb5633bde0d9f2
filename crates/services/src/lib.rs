#![forbid(unsafe_code)]

pub mod auth_service;
pub mod error;
pub mod syllabus_service;

pub use syllabus_core::Clock;

pub use auth_service::{AuthService, IdentityProvider};
pub use error::{AuthError, SyllabusServiceError};
pub use syllabus_service::SyllabusService;
