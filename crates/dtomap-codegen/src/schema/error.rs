use std::fmt;

/// A configuration error. Every variant is a caller mistake; the generator
/// has no runtime failure modes of its own.
#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    /// The oracle does not know the configured domain type.
    UnknownType { ty: String },
    /// A DTO names a base that is not itself a configured DTO.
    UnresolvedBase { dto: String, base: String },
    /// The base chain of a DTO loops back onto itself.
    CyclicBase { dto: String },
    /// A property selection mixes inclusions and exclusions.
    MixedSelection { tokens: Vec<String> },
    /// Two DTO configurations share the same name.
    DuplicateDto { dto: String },
    /// An override or equality entry names a property the DTO does not
    /// have.
    UnknownProperty { dto: String, property: String },
    /// A type parameter is bound to a DTO name that is not configured.
    UnresolvedBound {
        dto: String,
        param: String,
        bound: String,
    },
    /// An extension property without a declared DTO-side type.
    MissingExtensionType { dto: String, property: String },
    /// A declared type (from the oracle or an override) does not parse as
    /// a Rust type.
    InvalidType { ty: String },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnknownType { ty } => {
                write!(f, "unknown domain type: {ty}")
            }
            Error::UnresolvedBase { dto, base } => {
                write!(f, "{dto} extends {base}, which is not a configured DTO")
            }
            Error::CyclicBase { dto } => {
                write!(f, "cyclic base chain through {dto}")
            }
            Error::MixedSelection { tokens } => {
                write!(
                    f,
                    "can't mix inclusions and exclusions: [{}]",
                    tokens.join(", ")
                )
            }
            Error::DuplicateDto { dto } => {
                write!(f, "duplicate DTO configuration: {dto}")
            }
            Error::UnknownProperty { dto, property } => {
                write!(f, "{dto} has no property named {property}")
            }
            Error::UnresolvedBound { dto, param, bound } => {
                write!(
                    f,
                    "{dto} binds {param} to {bound}, which is not a configured DTO"
                )
            }
            Error::MissingExtensionType { dto, property } => {
                write!(f, "extension {dto}.{property} needs a declared type")
            }
            Error::InvalidType { ty } => {
                write!(f, "not a valid type: {ty}")
            }
        }
    }
}

impl std::error::Error for Error {}
