//! Block rendering services for Trellis pages.
//!
//! Blocks are the content units placed on a page. Each block type is
//! handled by a [`BlockService`] that renders the block through a
//! [`Templating`] engine and describes the form used to edit its settings.
//!
//! Two services ship with the crate:
//! - [`ActionBlockService`]: embeds the output of a delegated sub-request
//! - [`TextBlockService`]: renders stored text content
//!
//! [`BlockRegistry`] maps block types to services.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use trellis_blocks::{Block, BlockRegistry, MiniJinjaTemplating, TextBlockService};
//! use trellis_store::Page;
//!
//! let templating = Arc::new(MiniJinjaTemplating::new());
//! let mut registry = BlockRegistry::new();
//! registry.register(Arc::new(TextBlockService::new("core.text", templating)));
//!
//! let block = Block::new("core.text").with_setting("content", "<p>Hello</p>");
//! let html = registry.render(&block, &Page::default()).unwrap();
//! assert!(html.contains("<p>Hello</p>"));
//! ```

mod action;
mod block;
mod error;
mod form;
mod registry;
mod service;
mod templating;
mod text;

pub use action::{ActionBlockService, SubRequest};
pub use block::Block;
pub use error::BlockError;
pub use form::{FieldSpec, Form, FormBuilder};
pub use registry::BlockRegistry;
pub use service::BlockService;
pub use templating::{ACTION_TEMPLATE, MiniJinjaTemplating, TEXT_TEMPLATE, Templating};
pub use text::TextBlockService;
