mod classify;
mod dto;
mod error;
mod property;
mod root;
mod select;
mod ty;

pub use error::Error;

pub(crate) use classify::{classify, PropertyFacts};
pub(crate) use dto::{Dto, DtoKind};
pub(crate) use property::{DtoProperty, PropertyKind};
pub(crate) use root::Root;
pub(crate) use select::Selection;
