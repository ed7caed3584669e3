//! The cart store: a single-writer task that owns the cart.
//!
//! Every mutation goes through one mpsc queue, so commands are applied and
//! written through to storage in the order they were issued. Readers never
//! wait on the task: the current cart is published on a `watch` channel
//! right after each mutation, before the write lands.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use market_kv::{JsonStore, KvError, KvStore};
use tokio::sync::{mpsc, oneshot, watch};

use crate::cart::{CartItem, CartState, DecrementOutcome, NewCartItem};
use crate::config::CartConfig;
use crate::error::CartError;
use crate::ids::ProductId;
use crate::retry::RetryPolicy;

type Reply = oneshot::Sender<Result<(), CartError>>;

enum Command {
    Add { product: NewCartItem, respond_to: Reply },
    Increment { id: ProductId, respond_to: Reply },
    Decrement { id: ProductId, respond_to: Reply },
}

/// What readers see: the current cart and whether the initial load is done.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartView {
    /// Current items.
    pub state: CartState,
    /// Set once the first load attempt has finished.
    pub loaded: bool,
    /// Why the stored record could not be read, if it could not.
    ///
    /// While set, mutations are refused so the record is not overwritten.
    pub load_error: Option<String>,
}

/// Settings for a store instance.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreOptions {
    /// Key holding the serialized cart.
    pub key: String,
    /// Retry policy for failed writes.
    pub retry: RetryPolicy,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self::from(&CartConfig::default())
    }
}

impl From<&CartConfig> for StoreOptions {
    fn from(config: &CartConfig) -> Self {
        Self {
            key: config.storage.key.clone(),
            retry: config.persist.retry_policy(),
        }
    }
}

/// Owner of the cart state. Runs as its own task; talk to it through a
/// [`CartHandle`].
pub struct CartStore {
    state: CartState,
    storage: JsonStore,
    key: String,
    retry: RetryPolicy,
    load_error: Option<String>,
    receiver: mpsc::UnboundedReceiver<Command>,
    view: watch::Sender<CartView>,
}

impl CartStore {
    /// Create a store and its handle without starting it.
    ///
    /// Drive the store with [`CartStore::run`] on the executor of your choice.
    pub fn new(storage: Arc<dyn KvStore>, options: StoreOptions) -> (Self, CartHandle) {
        let (commands, receiver) = mpsc::unbounded_channel();
        let (view, view_rx) = watch::channel(CartView::default());

        let store = Self {
            state: CartState::new(),
            storage: JsonStore::new(storage),
            key: options.key,
            retry: options.retry,
            load_error: None,
            receiver,
            view,
        };
        let handle = CartHandle {
            commands,
            view: view_rx,
        };
        (store, handle)
    }

    /// Create a store and spawn it on the current tokio runtime.
    pub fn spawn(storage: Arc<dyn KvStore>, options: StoreOptions) -> CartHandle {
        let (store, handle) = Self::new(storage, options);
        tokio::spawn(store.run());
        handle
    }

    /// Open the configured backend and spawn a store on it.
    pub async fn from_config(config: &CartConfig) -> Result<CartHandle, CartError> {
        let storage = config.open_store().await?;
        Ok(Self::spawn(storage, StoreOptions::from(config)))
    }

    /// Load the stored cart, then process commands until every handle is
    /// dropped.
    pub async fn run(mut self) {
        self.load().await;

        while let Some(command) = self.receiver.recv().await {
            match command {
                Command::Add {
                    product,
                    respond_to,
                } => {
                    let result = self.add(product).await;
                    let _ = respond_to.send(result);
                }
                Command::Increment { id, respond_to } => {
                    let result = self.increment(&id).await;
                    let _ = respond_to.send(result);
                }
                Command::Decrement { id, respond_to } => {
                    let result = self.decrement(&id).await;
                    let _ = respond_to.send(result);
                }
            }
        }

        tracing::debug!(key = %self.key, "cart store stopped");
    }

    async fn load(&mut self) {
        self.load_error = match self.read().await {
            Ok(Some(state)) => {
                tracing::debug!(key = %self.key, items = state.len(), "cart loaded");
                self.state = state;
                None
            }
            Ok(None) => {
                tracing::debug!(key = %self.key, "no stored cart");
                None
            }
            Err(KvError::SerializeError(e)) => {
                tracing::warn!(key = %self.key, error = %e, "discarding malformed cart record");
                None
            }
            Err(e) => {
                tracing::error!(key = %self.key, error = %e, "cart read failed, holding writes");
                Some(e.to_string())
            }
        };

        let state = self.state.clone();
        let load_error = self.load_error.clone();
        self.view.send_modify(|view| {
            view.state = state;
            view.loaded = true;
            view.load_error = load_error;
        });
    }

    async fn read(&self) -> Result<Option<CartState>, KvError> {
        let mut attempt = 0;
        loop {
            match self.storage.get::<CartState>(&self.key).await {
                // A malformed record reads the same every time.
                Err(e)
                    if !matches!(e, KvError::SerializeError(_))
                        && self.retry.should_retry(attempt) =>
                {
                    let delay = self.retry.backoff.delay_for_attempt(attempt);
                    tracing::warn!(
                        key = %self.key,
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "cart read failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    /// Retry a failed load before any mutation is applied on top of it.
    async fn ensure_loaded(&mut self) -> Result<(), CartError> {
        if self.load_error.is_some() {
            self.load().await;
        }
        match &self.load_error {
            Some(e) => Err(CartError::LoadFailed(e.clone())),
            None => Ok(()),
        }
    }

    async fn add(&mut self, product: NewCartItem) -> Result<(), CartError> {
        self.ensure_loaded().await?;
        let id = product.id.clone();
        let quantity = self.state.add(product).map_err(|e| self.reject(&id, e))?;
        tracing::debug!(id = %id, quantity, "item added");
        self.commit().await
    }

    async fn increment(&mut self, id: &ProductId) -> Result<(), CartError> {
        self.ensure_loaded().await?;
        let quantity = self.state.increment(id).map_err(|e| self.reject(id, e))?;
        tracing::debug!(id = %id, quantity, "item incremented");
        self.commit().await
    }

    async fn decrement(&mut self, id: &ProductId) -> Result<(), CartError> {
        self.ensure_loaded().await?;
        match self.state.decrement(id).map_err(|e| self.reject(id, e))? {
            DecrementOutcome::Decremented(quantity) => {
                tracing::debug!(id = %id, quantity, "item decremented");
            }
            DecrementOutcome::Removed => {
                tracing::debug!(id = %id, "item removed");
            }
        }
        self.commit().await
    }

    fn reject(&self, id: &ProductId, error: CartError) -> CartError {
        tracing::warn!(id = %id, error = %error, "cart command rejected");
        error
    }

    /// Publish the new state, then write it through.
    async fn commit(&mut self) -> Result<(), CartError> {
        let state = self.state.clone();
        self.view.send_modify(|view| view.state = state);
        self.persist().await.map_err(CartError::from)
    }

    async fn persist(&self) -> Result<(), KvError> {
        let mut attempt = 0;
        loop {
            match self.storage.set(&self.key, &self.state).await {
                Ok(()) => {
                    tracing::debug!(key = %self.key, items = self.state.len(), "cart persisted");
                    return Ok(());
                }
                Err(e) if self.retry.should_retry(attempt) => {
                    let delay = self.retry.backoff.delay_for_attempt(attempt);
                    tracing::warn!(
                        key = %self.key,
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "cart write failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    tracing::error!(key = %self.key, error = %e, "cart write failed");
                    return Err(e);
                }
            }
        }
    }
}

/// Shared access to a running [`CartStore`].
///
/// Cheap to clone. Mutations are queued the moment they are called; the
/// returned [`Pending`] resolves once the change has been written through,
/// and may be dropped for fire-and-forget use.
#[derive(Debug, Clone)]
pub struct CartHandle {
    commands: mpsc::UnboundedSender<Command>,
    view: watch::Receiver<CartView>,
}

impl CartHandle {
    /// Current items.
    pub fn products(&self) -> Vec<CartItem> {
        self.view.borrow().state.items().to_vec()
    }

    /// Current cart state.
    pub fn state(&self) -> CartState {
        self.view.borrow().state.clone()
    }

    /// Total item count (sum of quantities).
    pub fn item_count(&self) -> u64 {
        self.view.borrow().state.item_count()
    }

    /// Whether the initial load has finished.
    pub fn is_loaded(&self) -> bool {
        self.view.borrow().loaded
    }

    /// Watch the cart for changes.
    pub fn subscribe(&self) -> watch::Receiver<CartView> {
        self.view.clone()
    }

    /// Wait until the stored cart has been loaded.
    ///
    /// Fails with [`CartError::LoadFailed`] when the record could not be
    /// read; the store retries the read on the next mutation.
    pub async fn loaded(&self) -> Result<(), CartError> {
        let mut rx = self.view.clone();
        let view = rx
            .wait_for(|v| v.loaded)
            .await
            .map_err(|_| CartError::StoreClosed)?;
        match &view.load_error {
            Some(e) => Err(CartError::LoadFailed(e.clone())),
            None => Ok(()),
        }
    }

    /// Add a product, or bump its quantity if already present.
    pub fn add_to_cart(&self, product: NewCartItem) -> Pending {
        self.send(|respond_to| Command::Add {
            product,
            respond_to,
        })
    }

    /// Increase an item's quantity by one.
    pub fn increment(&self, id: impl Into<ProductId>) -> Pending {
        let id = id.into();
        self.send(|respond_to| Command::Increment { id, respond_to })
    }

    /// Decrease an item's quantity by one, removing it at zero.
    pub fn decrement(&self, id: impl Into<ProductId>) -> Pending {
        let id = id.into();
        self.send(|respond_to| Command::Decrement { id, respond_to })
    }

    fn send(&self, build: impl FnOnce(Reply) -> Command) -> Pending {
        let (tx, rx) = oneshot::channel();
        match self.commands.send(build(tx)) {
            Ok(()) => Pending { reply: Some(rx) },
            Err(_) => Pending { reply: None },
        }
    }
}

/// Completion of a queued cart command.
#[derive(Debug)]
pub struct Pending {
    reply: Option<oneshot::Receiver<Result<(), CartError>>>,
}

impl Future for Pending {
    type Output = Result<(), CartError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match self.reply.as_mut() {
            Some(reply) => Pin::new(reply)
                .poll(cx)
                .map(|r| r.unwrap_or(Err(CartError::StoreClosed))),
            None => Poll::Ready(Err(CartError::StoreClosed)),
        }
    }
}
