//! Representation convert facade.
//!
//! Markdown is compiled locally; every other conversion is delegated to a
//! [`ConversionService`], normally the Confluence REST API. A Markdown source
//! with a non-storage target is compiled first and then delegated as storage.

use serde::Serialize;
use tracing::debug;

use conflux_storage::Compiler;

use crate::error::ConvertError;
use crate::representation::Representation;

/// A conversion request for the remote service.
///
/// Serializes as the request body `{"value": ..., "representation": from}`.
/// The target travels in the URL.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ConvertRequest {
    pub value: String,
    #[serde(rename = "representation")]
    pub from: Representation,
    #[serde(skip)]
    pub to: Representation,
}

/// Something that converts between Confluence-native representations.
pub trait ConversionService {
    /// Convert `request.value` and return the converted content unmodified.
    ///
    /// # Errors
    ///
    /// Transport failures mapped to [`ConvertError`].
    fn convert(&self, request: &ConvertRequest) -> Result<String, ConvertError>;
}

impl<S: ConversionService + ?Sized> ConversionService for &S {
    fn convert(&self, request: &ConvertRequest) -> Result<String, ConvertError> {
        (**self).convert(request)
    }
}

/// `None` stands for "no remote service": delegated pairs fail, local
/// compilation still works.
impl<S: ConversionService> ConversionService for Option<S> {
    fn convert(&self, request: &ConvertRequest) -> Result<String, ConvertError> {
        match self {
            Some(service) => service.convert(request),
            None => Err(ConvertError::ServiceUnavailable {
                from: request.from,
                to: request.to,
            }),
        }
    }
}

/// Routes conversions to the local compiler or a remote service.
pub struct Converter<S> {
    service: S,
    compiler: Compiler,
}

impl<S: ConversionService> Converter<S> {
    /// Create a converter with default compiler settings.
    pub fn new(service: S) -> Self {
        Self::with_compiler(service, Compiler::default())
    }

    /// Create a converter that compiles Markdown with `compiler`.
    pub fn with_compiler(service: S, compiler: Compiler) -> Self {
        Self { service, compiler }
    }

    /// Convert `content` from one representation to another.
    ///
    /// # Errors
    ///
    /// * [`ConvertError::InvalidRepresentationPair`] if `from == to` or `to`
    ///   is Markdown.
    /// * Whatever the service returns for delegated pairs.
    pub fn convert(
        &self,
        content: &str,
        from: Representation,
        to: Representation,
    ) -> Result<String, ConvertError> {
        if from == to || to == Representation::Markdown {
            return Err(ConvertError::InvalidRepresentationPair {
                from: from.to_string(),
                to: to.to_string(),
            });
        }

        if from == Representation::Markdown {
            let storage = self.compiler.compile(content).storage;
            if to == Representation::Storage {
                debug!("Compiled markdown locally ({} bytes)", storage.len());
                return Ok(storage);
            }
            return self.delegate(storage, Representation::Storage, to);
        }

        self.delegate(content.to_owned(), from, to)
    }

    /// Convert using representation tags, e.g. from command line input.
    ///
    /// # Errors
    ///
    /// [`ConvertError::InvalidRepresentationPair`] for tags outside the closed
    /// set, otherwise as [`Converter::convert`].
    pub fn convert_tags(&self, content: &str, from: &str, to: &str) -> Result<String, ConvertError> {
        let invalid = || ConvertError::InvalidRepresentationPair {
            from: from.to_owned(),
            to: to.to_owned(),
        };
        let from_repr = from.parse().map_err(|_| invalid())?;
        let to_repr = to.parse().map_err(|_| invalid())?;
        self.convert(content, from_repr, to_repr)
    }

    fn delegate(
        &self,
        value: String,
        from: Representation,
        to: Representation,
    ) -> Result<String, ConvertError> {
        debug!("Delegating {} -> {} conversion", from, to);
        self.service.convert(&ConvertRequest { value, from, to })
    }
}
