use std::fmt;

/// An error raised by generated mapper code at conversion time.
#[derive(Debug)]
pub enum MapError {
    /// An abstract type's forward/reverse/copy dispatch found no configured
    /// concrete subclass for the runtime value. Signals drift between the
    /// generator configuration and the domain model.
    NoMatchingSubclass { ty: &'static str },

    /// The external lookup had no instance for the given identifier.
    NotFound { ty: &'static str, id: String },

    /// The external lookup returned an instance of the wrong type.
    TypeMismatch { ty: &'static str },
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::NoMatchingSubclass { ty } => {
                write!(f, "no configured subclass matches runtime value of abstract type `{ty}`")
            }
            MapError::NotFound { ty, id } => {
                write!(f, "no `{ty}` instance found for identifier {id}")
            }
            MapError::TypeMismatch { ty } => {
                write!(f, "lookup returned an instance that is not a `{ty}`")
            }
        }
    }
}

impl std::error::Error for MapError {}
