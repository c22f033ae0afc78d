//! Open action type
//!
//! Most stores use a closed `enum` as their action type and match on its
//! variants. When the set of actions is open (plugins, independently
//! developed middleware), `AnyAction` carries any `'static` value and lets
//! middleware check its concrete type before acting on it.

use std::any::{type_name, Any};
use std::fmt;

type DebugFn = fn(&(dyn Any + Send), &mut fmt::Formatter<'_>) -> fmt::Result;

/// A type-erased action
///
/// # Example
///
/// ```
/// use redux_pipeline::AnyAction;
///
/// #[derive(Debug)]
/// struct Increment(u32);
///
/// let action = AnyAction::new(Increment(2));
/// assert!(action.is::<Increment>());
/// assert_eq!(action.downcast_ref::<Increment>().map(|a| a.0), Some(2));
/// ```
pub struct AnyAction {
    inner: Box<dyn Any + Send>,
    type_name: &'static str,
    debug: DebugFn,
}

impl AnyAction {
    pub fn new<T: Any + Send + fmt::Debug>(action: T) -> Self {
        Self {
            inner: Box::new(action),
            type_name: type_name::<T>(),
            debug: debug_any::<T>,
        }
    }

    /// Whether the wrapped action is a `T`
    pub fn is<T: Any>(&self) -> bool {
        self.inner.is::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Take the wrapped action out, or get `self` back if it is not a `T`
    pub fn downcast<T: Any>(self) -> Result<T, Self> {
        let Self {
            inner,
            type_name,
            debug,
        } = self;
        match inner.downcast::<T>() {
            Ok(action) => Ok(*action),
            Err(inner) => Err(Self {
                inner,
                type_name,
                debug,
            }),
        }
    }

    /// Fully qualified name of the wrapped action's type
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

fn debug_any<T: Any + fmt::Debug>(
    value: &(dyn Any + Send),
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    match value.downcast_ref::<T>() {
        Some(action) => fmt::Debug::fmt(action, f),
        None => f.write_str("<unknown action>"),
    }
}

impl fmt::Debug for AnyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (self.debug)(self.inner.as_ref(), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct SetValue(i32);

    #[derive(Debug, PartialEq)]
    struct SetValueString(String);

    #[test]
    fn test_downcast_matching_type() {
        let action = AnyAction::new(SetValue(10));
        assert!(action.is::<SetValue>());
        assert!(!action.is::<SetValueString>());
        assert_eq!(action.downcast::<SetValue>().unwrap(), SetValue(10));
    }

    #[test]
    fn test_failed_downcast_returns_action() {
        let action = AnyAction::new(SetValueString("OK".into()));
        let action = action.downcast::<SetValue>().unwrap_err();
        assert_eq!(
            action.downcast_ref::<SetValueString>(),
            Some(&SetValueString("OK".into()))
        );
    }

    #[test]
    fn test_debug_uses_wrapped_action() {
        let action = AnyAction::new(SetValue(3));
        assert_eq!(format!("{:?}", action), "SetValue(3)");
        assert!(action.type_name().ends_with("SetValue"));
    }
}
