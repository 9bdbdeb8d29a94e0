// SPDX-FileCopyrightText: 2026 Quizfeed Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for the quizfeed collaborators.
//!
//! Every adapter implements [`PluginAdapter`] plus one of the
//! specialized traits below.

pub mod adapter;
pub mod generation;
pub mod image;
pub mod store;

pub use adapter::PluginAdapter;
pub use generation::GenerationProvider;
pub use image::ImageProvider;
pub use store::ContentStore;
