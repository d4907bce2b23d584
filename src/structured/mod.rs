//! Structured output: strict schemas for the request and validation of the reply.
//!
//! # Examples
//!
//! ```
//! use ai_lib_responses::structured::{strict_object_from_value, OutputValidator};
//! use serde_json::json;
//!
//! let schema = strict_object_from_value(json!({
//!     "name": {"type": "string"},
//!     "age": {"type": "integer"}
//! }));
//! assert_eq!(schema["required"], json!(["age", "name"]));
//!
//! let validator = OutputValidator::new(&schema).unwrap();
//! assert!(validator.is_valid(&json!({"name": "Alice", "age": 30})));
//! assert!(!validator.is_valid(&json!({"name": "Alice"})));
//! ```

pub mod error;
pub mod schema;
pub mod validator;

pub use error::ValidationError;
pub use schema::{strict_object, strict_object_from_value, TextFormat, TextOptions, Verbosity};
pub use validator::OutputValidator;
