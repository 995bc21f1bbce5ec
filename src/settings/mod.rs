//! Environment-derived configuration
//!
//! A settings schema is an ordinary [`Schema`](crate::schema::Schema) whose
//! values come from environment variables instead of an input mapping.
//!
//! ```ignore
//! use recordcheck::schema::{FieldSpec, Schema};
//! use recordcheck::settings::SettingsLoader;
//!
//! let schema = Schema::new("AIServiceConfig")
//!     .field(FieldSpec::string("openai_api_key"))
//!     .field(FieldSpec::int("max_tokens").with_default(2048));
//!
//! let config = SettingsLoader::new(&schema).load_from_process()?;
//! ```

mod loader;
mod source;

pub use loader::SettingsLoader;
pub use source::{EnvSource, MapEnv, ProcessEnv};
