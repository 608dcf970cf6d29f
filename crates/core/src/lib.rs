//! Core library for recipes
//!
//! This crate implements the **Functional Core** of the recipes application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! - **`recipes_core`** (this crate): Pure selection and transformation functions with zero I/O
//! - **`recipes`**: Reddit API access, downloads, printing and orchestration (the Imperative Shell)
//!
//! Everything here is deterministic and is tested with fixture data, no
//! network or mocking required.
//!
//! # Module Organization
//!
//! - [`reddit`]: Reddit API wire shapes and the `Post` / `Comment` domain models
//! - [`select`]: Best post, best comment and image URL resolution
//! - [`report`]: The per-topic `RecipeResult` and the helpers that build it
//! - [`download`]: File naming and extension inference for downloaded images
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use recipes_core::reddit::parse_search_response;
//! use recipes_core::select::{resolve_image_url, select_best_post};
//!
//! let posts = parse_search_response(&body)?;
//!
//! if let Some(post) = select_best_post(&posts, "recipe") {
//!     println!("{} -> {:?}", post.title, resolve_image_url(post));
//! }
//! ```

pub mod download;
pub mod reddit;
pub mod report;
pub mod select;
