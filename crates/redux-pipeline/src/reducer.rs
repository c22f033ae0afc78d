use crate::error::StoreError;

type ReduceFn<S, A> = Box<dyn Fn(&A, &S) -> anyhow::Result<S> + Send + Sync>;

/// Reducer - pure function that produces the next state from an action and the current state
///
/// Stored in its fallible form; infallible reducers are wrapped once at construction.
pub(crate) struct Reducer<S, A> {
    reduce: ReduceFn<S, A>,
}

impl<S, A> Reducer<S, A> {
    pub(crate) fn infallible<F>(reduce: F) -> Self
    where
        F: Fn(&A, &S) -> S + Send + Sync + 'static,
    {
        Self {
            reduce: Box::new(move |action: &A, state: &S| -> anyhow::Result<S> {
                Ok(reduce(action, state))
            }),
        }
    }

    pub(crate) fn fallible<F>(reduce: F) -> Self
    where
        F: Fn(&A, &S) -> anyhow::Result<S> + Send + Sync + 'static,
    {
        Self {
            reduce: Box::new(reduce),
        }
    }

    pub(crate) fn reduce(&self, action: &A, state: &S) -> Result<S, StoreError> {
        (self.reduce)(action, state).map_err(StoreError::Reducer)
    }
}
