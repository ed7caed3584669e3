//! Leptos integration: the cart handle as reactive context.

use leptos::prelude::{provide_context, use_context};

use crate::error::CartError;
use crate::store::CartHandle;

/// Provide the cart to every component below the current owner.
pub fn provide_cart_context(handle: CartHandle) {
    provide_context(handle);
}

/// Fetch the cart provided by an ancestor component.
pub fn use_cart_context() -> Result<CartHandle, CartError> {
    use_context::<CartHandle>().ok_or(CartError::MissingProvider)
}
