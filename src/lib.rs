//! Agriserve - Agricultural Services Platform
//!
//! ## Components
//!
//! 1. UserService - Registration and login
//! 2. NoticeService - Government notice board
//! 3. IssueService - Citizen issue board with official replies
//! 4. RecycledItemService - Second-hand goods marketplace
//! 5. UploadStore - Image upload persistence
//! 6. Classifier - Top-3 crop pest/disease classification
//! 7. WebAPI - REST API endpoints
//!
//! ## Design Principles
//!
//! - One module per concern, repository/service split per module
//! - Model artifact and class index are loaded once and shared through
//!   AppState; classification is a pure function per request

pub mod classifier;
pub mod issue_service;
pub mod notice_service;
pub mod recycle_service;
pub mod upload_store;
pub mod user_service;
pub mod web_api;

pub mod error;
pub mod models;
pub mod state;

pub use error::{Error, Result};
pub use state::AppState;
