//! Representation conversion for Conflux.
//!
//! [`Converter`] compiles Markdown to storage format locally and hands every
//! other conversion to a [`ConversionService`]. [`ConfluenceClient`] is the
//! service backed by `POST /rest/api/contentbody/convert/{to}`.
//!
//! ```
//! use conflux_confluence::{ConversionService, ConvertError, ConvertRequest, Converter, Representation};
//!
//! struct Offline;
//!
//! impl ConversionService for Offline {
//!     fn convert(&self, _: &ConvertRequest) -> Result<String, ConvertError> {
//!         Err(ConvertError::Timeout)
//!     }
//! }
//!
//! let converter = Converter::new(Offline);
//! let storage = converter.convert("*hi*", Representation::Markdown, Representation::Storage)?;
//! assert_eq!(storage, "<p><em>hi</em></p>");
//! # Ok::<(), ConvertError>(())
//! ```

mod client;
mod convert;
mod error;
mod representation;

pub use client::{Auth, ConfluenceClient};
pub use convert::{ConversionService, ConvertRequest, Converter};
pub use error::ConvertError;
pub use representation::{Representation, UnknownRepresentation};
