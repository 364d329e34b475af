//! Error types for the template-params crate.
//!
//! This module defines semantic error enums for value generation, parameter
//! resolution, template loading, and template storage, following the
//! project's error handling conventions with `thiserror`.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while generating a value from a generate expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// The registry was asked to generate a value before any generator was
    /// registered.
    #[error("no generators registered")]
    NoGeneratorsRegistered,

    /// No registered generator recognises the expression.
    #[error("no generator matches expression '{expression}'")]
    NoMatchFound {
        /// The expression that could not be matched.
        expression: String,
    },

    /// The expression contains an invalid character class or quantifier.
    #[error("malformed expression '{expression}': {message}")]
    MalformedExpression {
        /// The offending expression.
        expression: String,
        /// Description of the syntax problem.
        message: String,
    },

    /// A remote value could not be fetched or read.
    #[error("failed to fetch remote value from '{url}': {message}")]
    RemoteFetch {
        /// URL of the failed request.
        url: String,
        /// Description of the transport or read failure.
        message: String,
    },
}

/// Errors raised by a parameter resolution pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    /// A parameter's generate expression failed to produce a value.
    #[error("cannot generate value for parameter '{name}': {source}")]
    Parameter {
        /// Name of the parameter being resolved.
        name: String,
        /// Underlying generation failure.
        #[source]
        source: GenerationError,
    },
}

/// Errors that can occur when reading or writing a template document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// The template file could not be read.
    #[error("failed to read template file at '{path}': {message}")]
    IoError {
        /// Path to the template file.
        path: PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// The template JSON is malformed or has fields of the wrong shape.
    #[error("invalid template JSON: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
    },

    /// The template could not be serialised.
    #[error("failed to serialise template: {message}")]
    SerializeError {
        /// Description of the serialisation error.
        message: String,
    },
}

/// Errors surfaced by template storage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// The template has no identifier.
    #[error("template id must not be empty")]
    MissingId,

    /// The storage only supports creation.
    #[error("templates can only be created; '{operation}' is not supported")]
    CreateOnly {
        /// Name of the rejected operation.
        operation: &'static str,
    },

    /// Parameter resolution failed while creating the template.
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_generators_formats_correctly() {
        assert_eq!(
            GenerationError::NoGeneratorsRegistered.to_string(),
            "no generators registered"
        );
    }

    #[test]
    fn no_match_formats_correctly() {
        let err = GenerationError::NoMatchFound {
            expression: "hello".to_owned(),
        };
        assert_eq!(err.to_string(), "no generator matches expression 'hello'");
    }

    #[test]
    fn malformed_expression_formats_correctly() {
        let err = GenerationError::MalformedExpression {
            expression: "[Z-A]{4}".to_owned(),
            message: "reversed range 'Z-A'".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "malformed expression '[Z-A]{4}': reversed range 'Z-A'"
        );
    }

    #[test]
    fn remote_fetch_formats_correctly() {
        let err = GenerationError::RemoteFetch {
            url: "http://api.example.com/new".to_owned(),
            message: "connection refused".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "failed to fetch remote value from 'http://api.example.com/new': connection refused"
        );
    }

    #[test]
    fn resolution_error_names_the_parameter() {
        let err = ResolutionError::Parameter {
            name: "ADMIN_PASSWORD".to_owned(),
            source: GenerationError::NoMatchFound {
                expression: "secret".to_owned(),
            },
        };
        assert_eq!(
            err.to_string(),
            "cannot generate value for parameter 'ADMIN_PASSWORD': \
             no generator matches expression 'secret'"
        );
    }

    #[test]
    fn template_io_error_formats_correctly() {
        let err = TemplateError::IoError {
            path: PathBuf::from("/tmp/template.json"),
            message: "file not found".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "failed to read template file at '/tmp/template.json': file not found"
        );
    }

    #[test]
    fn storage_create_only_formats_correctly() {
        let err = StorageError::CreateOnly { operation: "delete" };
        assert_eq!(
            err.to_string(),
            "templates can only be created; 'delete' is not supported"
        );
    }
}
