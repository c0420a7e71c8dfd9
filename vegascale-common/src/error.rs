use std::result;
use thiserror::Error;

pub type Result<T> = result::Result<T, VegaScaleError>;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ErrorContext {
    pub contexts: Vec<String>,
}

impl std::fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for (i, context) in self.contexts.iter().enumerate() {
            writeln!(f, "    Context[{i}]: {context}")?;
        }
        Ok(())
    }
}

/// Namespace of a name that failed to resolve
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReferenceKind {
    Signal,
    Data,
    Scale,
}

impl std::fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ReferenceKind::Signal => write!(f, "signal"),
            ReferenceKind::Data => write!(f, "data"),
            ReferenceKind::Scale => write!(f, "scale"),
        }
    }
}

#[derive(Error, Debug)]
pub enum VegaScaleError {
    #[error("Specification error: {0}\n{1}")]
    SpecificationError(String, ErrorContext),

    #[error("Internal error: {0}\n{1}")]
    InternalError(String, ErrorContext),

    #[error("Unresolved {0} reference {1:?}\n{2}")]
    UnresolvedReference(ReferenceKind, String, ErrorContext),

    #[error("Empty domain reduction: {0}\n{1}")]
    EmptyDomainReduction(String, ErrorContext),

    #[error("Invalid nice input: {0}\n{1}")]
    InvalidNiceInput(String, ErrorContext),

    #[error("Serde JSON Error: {0}\n{1}")]
    SerdeJsonError(serde_json::Error, ErrorContext),
}

impl VegaScaleError {
    /// Append a new context level to the error
    pub fn with_context<S, F>(self, context_fn: F) -> Self
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        use VegaScaleError::*;
        match self {
            SpecificationError(msg, mut context) => {
                context.contexts.push(context_fn().into());
                VegaScaleError::SpecificationError(msg, context)
            }
            InternalError(msg, mut context) => {
                context.contexts.push(context_fn().into());
                VegaScaleError::InternalError(msg, context)
            }
            UnresolvedReference(kind, name, mut context) => {
                context.contexts.push(context_fn().into());
                VegaScaleError::UnresolvedReference(kind, name, context)
            }
            EmptyDomainReduction(msg, mut context) => {
                context.contexts.push(context_fn().into());
                VegaScaleError::EmptyDomainReduction(msg, context)
            }
            InvalidNiceInput(msg, mut context) => {
                context.contexts.push(context_fn().into());
                VegaScaleError::InvalidNiceInput(msg, context)
            }
            SerdeJsonError(err, mut context) => {
                context.contexts.push(context_fn().into());
                VegaScaleError::SerdeJsonError(err, context)
            }
        }
    }

    pub fn specification<S: Into<String>>(message: S) -> Self {
        Self::SpecificationError(message.into(), Default::default())
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::InternalError(message.into(), Default::default())
    }

    pub fn unresolved_signal<S: Into<String>>(name: S) -> Self {
        Self::UnresolvedReference(ReferenceKind::Signal, name.into(), Default::default())
    }

    pub fn unresolved_data<S: Into<String>>(name: S) -> Self {
        Self::UnresolvedReference(ReferenceKind::Data, name.into(), Default::default())
    }

    pub fn unresolved_scale<S: Into<String>>(name: S) -> Self {
        Self::UnresolvedReference(ReferenceKind::Scale, name.into(), Default::default())
    }

    pub fn empty_domain_reduction<S: Into<String>>(message: S) -> Self {
        Self::EmptyDomainReduction(message.into(), Default::default())
    }

    pub fn invalid_nice_input<S: Into<String>>(message: S) -> Self {
        Self::InvalidNiceInput(message.into(), Default::default())
    }
}

pub trait ResultWithContext<R> {
    fn with_context<S, F>(self, context_fn: F) -> Result<R>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<R, E> ResultWithContext<R> for result::Result<R, E>
where
    E: Into<VegaScaleError>,
{
    fn with_context<S, F>(self, context_fn: F) -> Result<R>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        match self {
            Ok(val) => Ok(val),
            Err(err) => {
                let vega_scale_error: VegaScaleError = err.into();
                Err(vega_scale_error.with_context(context_fn))
            }
        }
    }
}

impl<R> ResultWithContext<R> for Option<R> {
    fn with_context<S, F>(self, context_fn: F) -> Result<R>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        match self {
            Some(val) => Ok(val),
            None => Err(VegaScaleError::internal(context_fn().into())),
        }
    }
}

impl From<serde_json::Error> for VegaScaleError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerdeJsonError(err, Default::default())
    }
}
