use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Release is not a JSON object")]
    NotAnObject,

    #[error("Release missing version")]
    MissingVersion,
}
