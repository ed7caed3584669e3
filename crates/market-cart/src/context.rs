//! Scoped cart context for UI code.
//!
//! A provider mounts a [`CartHandle`] for the current thread; anything
//! running underneath it looks the handle up with [`use_cart`] instead of
//! threading it through every call. Providers nest, and the innermost one
//! wins.
//!
//! ```rust,ignore
//! let handle = CartStore::spawn(storage, StoreOptions::default());
//!
//! with_cart(handle, || {
//!     let cart = use_cart()?;
//!     render(cart.products());
//! });
//! ```

use std::cell::RefCell;
use std::marker::PhantomData;

use crate::error::CartError;
use crate::store::CartHandle;

thread_local! {
    static PROVIDERS: RefCell<Vec<CartHandle>> = const { RefCell::new(Vec::new()) };
}

/// Guard for a mounted cart provider.
///
/// Dropping the guard unmounts its provider together with every provider
/// mounted after it.
#[derive(Debug)]
pub struct CartProvider {
    /// Stack depth below this provider.
    depth: usize,
    // Tied to the thread whose provider stack it pushed onto.
    _not_send: PhantomData<*const ()>,
}

impl Drop for CartProvider {
    fn drop(&mut self) {
        PROVIDERS.with(|providers| providers.borrow_mut().truncate(self.depth));
    }
}

/// Mount `handle` as the cart for code running on this thread.
pub fn provide_cart(handle: CartHandle) -> CartProvider {
    let depth = PROVIDERS.with(|providers| {
        let mut providers = providers.borrow_mut();
        providers.push(handle);
        providers.len() - 1
    });
    CartProvider {
        depth,
        _not_send: PhantomData,
    }
}

/// Run `f` with `handle` mounted as the cart.
pub fn with_cart<R>(handle: CartHandle, f: impl FnOnce() -> R) -> R {
    let _provider = provide_cart(handle);
    f()
}

/// Look up the innermost mounted cart.
///
/// Fails with [`CartError::MissingProvider`] when no provider is mounted
/// above the caller.
pub fn use_cart() -> Result<CartHandle, CartError> {
    PROVIDERS
        .with(|providers| providers.borrow().last().cloned())
        .ok_or(CartError::MissingProvider)
}
