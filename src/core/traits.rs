// Copyright © 2026 Quillpost. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # Core Traits Module
//!
//! The seams of the rendering pipeline:
//!
//! - [`Processor`]: turns one piece of content into another (the media
//!   transformer and the thumbnail resolver both implement it)
//! - [`Generator`]: writes a rendered document to its destination

use std::path::Path;

use crate::core::error::Result;
use serde_json::Value as JsonValue;

/// Core trait for implementing content processors.
///
/// # Type Parameters
///
/// * `Input`: The type of content being processed
/// * `Output`: The type of content produced
/// * `Context`: Additional context or configuration for processing
pub trait Processor: Send + Sync + std::fmt::Debug {
    /// The type of input content for the processor.
    type Input;
    /// The type of output content produced by the processor.
    type Output;
    /// The type of context or configuration used by the processor.
    type Context;

    /// Processes the input content using optional context information.
    fn process(
        &self,
        input: Self::Input,
        context: Option<&Self::Context>,
    ) -> Result<Self::Output>;
}

/// Trait for implementing output generation.
pub trait Generator: Send + Sync + std::fmt::Debug {
    /// Generates output from the given content.
    ///
    /// # Arguments
    ///
    /// * `content` - The rendered document
    /// * `path` - The path where the output should be written
    /// * `options` - Optional per-call configuration
    fn generate(
        &self,
        content: &str,
        path: &Path,
        options: Option<&JsonValue>,
    ) -> Result<()>;

    /// Validates the generation parameters without performing the generation.
    fn validate(
        &self,
        path: &Path,
        options: Option<&JsonValue>,
    ) -> Result<()>;
}
