//! Prompt Painter - turns a short phrase into a generated image
//!
//! A chat deployment rewrites the user's phrase into a richer image prompt,
//! which is submitted to an asynchronous image generation job that is polled
//! until it yields an image URL. A small web page drives one interaction per
//! button click.

pub mod ai;
pub mod app;
pub mod error;
pub mod models;
pub mod prompts;
pub mod web;

pub use error::{Error, Result};
