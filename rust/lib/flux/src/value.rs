use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// A type-erased, reference-counted state value.
///
/// Readers share the same allocation; cloning a `StateValue` is an atomic
/// increment. Renderers downcast to the concrete state struct they know.
#[derive(Clone)]
pub struct StateValue {
    inner: Arc<dyn Any + Send + Sync>,
}

impl StateValue {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            inner: Arc::new(value),
        }
    }

    /// Borrow as `T`, or `None` if the stored type differs.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Clone the stored value out as `T`.
    pub fn cloned<T: Any + Clone>(&self) -> Option<T> {
        self.downcast_ref::<T>().cloned()
    }

    pub fn is<T: Any>(&self) -> bool {
        self.inner.is::<T>()
    }

    pub fn type_id(&self) -> TypeId {
        (*self.inner).type_id()
    }

    /// Whether both handles point at the same allocation.
    pub fn ptr_eq(&self, other: &StateValue) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for StateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateValue")
            .field("type_id", &self.type_id())
            .finish()
    }
}

/// Handle returned by `StateStore::subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub(crate) u64);

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct PageState {
        index: u32,
        size: u32,
    }

    #[test]
    fn downcast_to_stored_type() {
        let v = StateValue::new(PageState { index: 2, size: 20 });
        assert_eq!(v.downcast_ref::<PageState>().map(|p| p.index), Some(2));
        assert!(v.is::<PageState>());
        assert_eq!(v.type_id(), TypeId::of::<PageState>());
    }

    #[test]
    fn downcast_to_other_type_is_none() {
        let v = StateValue::new(42u32);
        assert!(v.downcast_ref::<u64>().is_none());
        assert!(v.downcast_ref::<String>().is_none());
        assert!(!v.is::<i32>());
    }

    #[test]
    fn cloned_copies_the_value_out() {
        let v = StateValue::new(vec!["Jean".to_string()]);
        let got: Vec<String> = v.cloned().unwrap();
        assert_eq!(got, vec!["Jean".to_string()]);
        assert!(v.cloned::<String>().is_none());
    }

    #[test]
    fn clone_shares_allocation() {
        let a = StateValue::new(String::from("shared"));
        let b = a.clone();
        let c = StateValue::new(String::from("shared"));
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&c));
    }
}
