//! Block service trait.

use trellis_store::Page;

use crate::{Block, BlockError, FormBuilder};

/// Handler for one block type.
///
/// Implementations must be `Send + Sync` so a registry can be shared
/// between request handlers.
pub trait BlockService: Send + Sync {
    /// Block type handled by this service (e.g., "core.text").
    fn name(&self) -> &str;

    /// Render `block` placed on `page`.
    ///
    /// Settings are not validated here; call
    /// [`validate_block`](Self::validate_block) when the block is edited.
    fn execute(&self, block: &Block, page: &Page) -> Result<String, BlockError>;

    /// Check the block settings.
    fn validate_block(&self, block: &Block) -> Result<(), BlockError>;

    /// Describe the fields used to edit `block`.
    fn define_block_form(&self, form: &mut dyn FormBuilder, block: &Block);
}
