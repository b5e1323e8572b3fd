//! Scoped correlation context.
//!
//! Context layers live on a thread-local stack, so concurrent requests served
//! on different threads never observe each other's fields. Work handed to
//! another thread carries its correlation along explicitly via
//! [`ContextSnapshot`].

use std::cell::{Cell, RefCell};
use std::marker::PhantomData;

use super::Fields;

thread_local! {
    static LAYERS: RefCell<Vec<(u64, Fields)>> = const { RefCell::new(Vec::new()) };
    static NEXT_LAYER_ID: Cell<u64> = const { Cell::new(0) };
}

/// A scope guard holding one layer of logging context.
///
/// Creating a `LogContext` pushes its fields onto the current thread's
/// context stack; dropping it removes exactly that layer, restoring the
/// parent view on every exit path (early return, `?`, panic unwinding).
/// Nested scopes extend the active field set, and an inner key shadows the
/// same key from an outer layer until the inner scope ends.
///
/// Guards may be dropped in any order: each one removes only its own layer,
/// so layers of guards still alive are never lost. A guard passed to
/// `mem::forget` leaves its layer active for the rest of the thread.
///
/// The guard is `!Send`: it must be dropped on the thread that created it.
///
/// # Examples
///
/// ```
/// use backend_kit::fields;
/// use backend_kit::logging::LogContext;
///
/// let outer = LogContext::new(fields! { user_id = "u1" });
/// {
///     let _inner = LogContext::new(fields! { request_id = "r1" });
///     let active = LogContext::current();
///     assert_eq!(active["user_id"], "u1");
///     assert_eq!(active["request_id"], "r1");
/// }
/// assert!(!LogContext::current().contains_key("request_id"));
///
/// drop(outer);
/// assert!(LogContext::current().is_empty());
/// ```
#[derive(Debug)]
#[must_use = "the context layer is popped as soon as the guard is dropped"]
pub struct LogContext {
    id: u64,
    _not_send: PhantomData<*const ()>,
}

impl LogContext {
    /// Pushes a new context layer for the current thread.
    pub fn new(fields: Fields) -> Self {
        let id = NEXT_LAYER_ID.with(|next| {
            let id = next.get();
            next.set(id.wrapping_add(1));
            id
        });
        LAYERS.with(|layers| layers.borrow_mut().push((id, fields)));

        Self {
            id,
            _not_send: PhantomData,
        }
    }

    /// Runs `f` with `fields` pushed as a context layer.
    pub fn scope<R>(fields: Fields, f: impl FnOnce() -> R) -> R {
        let _guard = Self::new(fields);
        f()
    }

    /// Returns the merged view of every active layer, outermost first.
    pub fn current() -> Fields {
        LAYERS
            .try_with(|layers| {
                let mut merged = Fields::new();
                for (_, layer) in layers.borrow().iter() {
                    merged.extend(layer.iter().map(|(k, v)| (k.clone(), v.clone())));
                }
                merged
            })
            .unwrap_or_default()
    }

    /// Returns the number of active layers on this thread.
    pub fn depth() -> usize {
        LAYERS.try_with(|layers| layers.borrow().len()).unwrap_or(0)
    }

    /// Captures the merged context so it can be re-entered elsewhere.
    pub fn snapshot() -> ContextSnapshot {
        ContextSnapshot {
            fields: Self::current(),
        }
    }
}

impl Drop for LogContext {
    fn drop(&mut self) {
        let _ = LAYERS.try_with(|layers| {
            let mut layers = layers.borrow_mut();
            if let Some(index) = layers.iter().rposition(|(id, _)| *id == self.id) {
                layers.remove(index);
            }
        });
    }
}

/// The merged logging context of one thread, frozen at capture time.
///
/// Snapshots are `Send`, so a request handler can hand its correlation fields
/// to a worker thread.
///
/// ```
/// use backend_kit::fields;
/// use backend_kit::logging::LogContext;
///
/// let _ctx = LogContext::new(fields! { request_id = "req-7" });
/// let snapshot = LogContext::snapshot();
///
/// std::thread::spawn(move || {
///     assert!(LogContext::current().is_empty());
///     let _attached = snapshot.attach();
///     assert_eq!(LogContext::current()["request_id"], "req-7");
/// })
/// .join()
/// .unwrap();
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContextSnapshot {
    fields: Fields,
}

impl ContextSnapshot {
    /// Returns the captured fields.
    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// Pushes the captured fields as one layer on the current thread.
    pub fn attach(&self) -> LogContext {
        LogContext::new(self.fields.clone())
    }
}

/// Opens a context scope carrying a request's correlation identifiers.
///
/// `user_id` is only added when known.
pub fn setup_request_logging(request_id: &str, user_id: Option<&str>) -> LogContext {
    let mut fields = Fields::new();
    fields.insert("request_id".to_string(), request_id.into());
    if let Some(user_id) = user_id {
        fields.insert("user_id".to_string(), user_id.into());
    }
    LogContext::new(fields)
}
