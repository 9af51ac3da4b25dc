/// Errors raised while reading or building values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueError {
    /// A value of one kind was found where another was expected.
    #[error("expected {expected}, got {actual}")]
    Mismatch {
        /// The expected type name.
        expected: &'static str,
        /// The type name of the value that was found.
        actual: &'static str,
    },

    /// A positional access went past the end.
    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds {
        /// The requested position.
        index: usize,
        /// The length of the sequence.
        len: usize,
    },

    /// An element of a sequence could not be stored.
    #[error("element {index}: {source}")]
    Element {
        /// Position of the offending element.
        index: usize,
        /// Why it was rejected.
        source: Box<ValueError>,
    },
}

impl ValueError {
    pub(crate) fn at(self, index: usize) -> Self {
        ValueError::Element {
            index,
            source: Box::new(self),
        }
    }
}

/// Errors raised when invoking a [`crate::PojoMethod`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvokeError {
    /// The method was called with the wrong number of arguments.
    #[error("{method}: expected {expected} argument(s), got {actual}")]
    Arity {
        /// Method name.
        method: &'static str,
        /// Declared parameter count.
        expected: usize,
        /// Number of arguments passed.
        actual: usize,
    },

    /// The receiver does not belong to the method's class.
    #[error("{method}: receiver is not a {expected}")]
    Receiver {
        /// Method name.
        method: &'static str,
        /// The receiver type the method was declared on.
        expected: &'static str,
    },

    /// An argument or return value had the wrong type.
    #[error(transparent)]
    Value(#[from] ValueError),

    /// The method body reported a failure.
    #[error("{0}")]
    Failed(String),
}
