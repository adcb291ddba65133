// src/checker/mod.rs
// =============================================================================
// This module contains all URL checking logic.
//
// Submodules:
// - http: Fetches one URL and decides which checks apply to it
// - html: The page rules (title, canonical link, language, include errors)
// - validator: The optional external HTML validation rule
// - violation: Typed violations and check errors
//
// This file (mod.rs) is the module root - it re-exports the public API the
// batch runner and reporter use.
//
// Rust concepts:
// - Modules: Organize code into namespaces
// - pub use: Re-export items to simplify imports for users of this module
// =============================================================================

// Declare submodules (tells Rust to include these files)
mod html;
mod http;
mod validator;
mod violation;

// Re-export public items from submodules
// This lets users write `checker::Checker` instead of `checker::http::Checker`
pub use http::{CheckSettings, Checker};
pub use violation::Violation;

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why is CheckError not re-exported?
//    - Nobody outside this module matches on it
//    - The worker only calls .describe() on it through Checker::check
//
// 2. Module privacy:
//    - html, validator and violation are private modules
//    - Only what we `pub use` here is visible to batch/ and report.rs
// -----------------------------------------------------------------------------
