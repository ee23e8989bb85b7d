mod config;
mod expand;
mod oracle;
mod schema;

pub use config::{DtoTypeConfig, PropertyOverride, RootConfig, TypeParamConfig, ValueTypeConfig};
pub use oracle::{PropertyDescriptor, StubOracle, TypeOracle};
pub use schema::Error;

use proc_macro2::TokenStream;

/// Generates the DTO types and the `Mapper` component described by
/// `config`, reflecting over the domain model through `oracle`.
///
/// The output is a token stream; formatting and file layout are the
/// caller's concern.
pub fn generate(config: &RootConfig, oracle: &dyn TypeOracle) -> Result<TokenStream, Error> {
    let root = schema::Root::resolve(config, oracle)?;

    Ok(expand::root(&root))
}
