//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep boundary layers decoupled from storage details.

pub mod distribution_service;
pub mod investment_service;
pub mod notification_service;
pub mod session_service;
pub mod template_service;
