//! Sift library exports

pub mod catalog;
pub mod clipboard;
pub mod config;
pub mod controls;
pub mod error;
pub mod filter;
pub mod markup;
pub mod page;
pub mod paginate;
pub mod render;
pub mod tabs;
pub mod view;

pub use error::{Result, SiftError};
