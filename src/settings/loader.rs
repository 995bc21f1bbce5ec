//! Settings loader
//!
//! Each schema field is read from the variable `PREFIX + NAME`, upper-cased.
//! An exact match wins; otherwise any case variant is accepted unless
//! case-sensitive matching is requested. Values arrive as text and
//! go through the regular validator, so `"512"` becomes an int and `"True"`
//! a bool. List and record fields are parsed as JSON text first.

use std::collections::HashMap;

use serde_json::{Map, Value as JsonValue};
use tracing::{debug, info};

use super::source::{EnvSource, ProcessEnv};
use crate::schema::{validate, FieldSpec, FieldType, Schema, ValidatedRecord, ValidationErrors};

/// Builds a validated settings record from environment variables
#[derive(Debug, Clone)]
pub struct SettingsLoader<'a> {
    schema: &'a Schema,
    prefix: String,
    case_sensitive: bool,
}

impl<'a> SettingsLoader<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        Self {
            schema,
            prefix: String::new(),
            case_sensitive: false,
        }
    }

    /// Prepends `prefix` to every variable name
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Only accept the exact upper-cased variable name
    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// Variable name read for `field`
    pub fn env_key(&self, field: &FieldSpec) -> String {
        format!("{}{}", self.prefix, field.name).to_uppercase()
    }

    /// Reads the schema's fields from `source` and validates them.
    ///
    /// A missing required variable is reported as a `missing` error at the
    /// field's name, exactly like a missing input key.
    pub fn load(&self, source: &dyn EnvSource) -> Result<ValidatedRecord, ValidationErrors> {
        let folded = (!self.case_sensitive).then(|| fold_case(source.vars()));

        let mut input = Map::new();
        for field in &self.schema.fields {
            let key = self.env_key(field);
            let raw = source.var(&key).or_else(|| {
                folded
                    .as_ref()
                    .and_then(|vars| vars.get(&key))
                    .map(|(_, value)| value.clone())
            });

            match raw {
                Some(raw) => {
                    debug!(field = %field.name, var = %key, "settings variable found");
                    input.insert(field.name.clone(), text_to_input(&field.field_type, raw));
                }
                None => debug!(field = %field.name, var = %key, "settings variable not set"),
            }
        }

        let record = validate(self.schema, &JsonValue::Object(input))?;
        info!(schema = %self.schema.name, fields = record.len(), "settings loaded");
        Ok(record)
    }

    /// Reads from the process environment
    pub fn load_from_process(&self) -> Result<ValidatedRecord, ValidationErrors> {
        self.load(&ProcessEnv)
    }
}

/// Maps upper-cased names to `(original name, value)`. When several names
/// fold together the lexicographically smallest original wins, so the result
/// does not depend on the source's iteration order.
fn fold_case(vars: Vec<(String, String)>) -> HashMap<String, (String, String)> {
    let mut folded: HashMap<String, (String, String)> = HashMap::new();
    for (name, value) in vars {
        let upper = name.to_uppercase();
        match folded.get(&upper) {
            Some((existing, _)) if *existing <= name => {}
            _ => {
                folded.insert(upper, (name, value));
            }
        }
    }
    folded
}

/// Structural fields take JSON text; text that does not parse is passed on
/// as a string so the validator reports the type mismatch.
fn text_to_input(ty: &FieldType, raw: String) -> JsonValue {
    match ty {
        FieldType::List { .. } | FieldType::Record { .. } => {
            serde_json::from_str(&raw).unwrap_or(JsonValue::String(raw))
        }
        _ => JsonValue::String(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ErrorKind;
    use crate::settings::MapEnv;

    fn service_schema() -> Schema {
        Schema::new("AIServiceConfig")
            .field(FieldSpec::string("openai_api_key"))
            .field(FieldSpec::int("max_tokens").with_default(2048))
            .field(FieldSpec::bool("debug").with_default(false))
    }

    #[test]
    fn test_env_values_coerced() {
        let schema = service_schema();
        let env = MapEnv::new()
            .with("OPENAI_API_KEY", "sk-simulated-key")
            .with("MAX_TOKENS", "512")
            .with("DEBUG", "True");

        let config = SettingsLoader::new(&schema).load(&env).unwrap();
        assert_eq!(config.get_str("openai_api_key"), Some("sk-simulated-key"));
        assert_eq!(config.get_i64("max_tokens"), Some(512));
        assert_eq!(config.get_bool("debug"), Some(true));
    }

    #[test]
    fn test_defaults_when_unset() {
        let schema = service_schema();
        let env = MapEnv::new().with("OPENAI_API_KEY", "sk-x");

        let config = SettingsLoader::new(&schema).load(&env).unwrap();
        assert_eq!(config.get_i64("max_tokens"), Some(2048));
        assert_eq!(config.get_bool("debug"), Some(false));
    }

    #[test]
    fn test_missing_required_variable() {
        let schema = service_schema();
        let errors = SettingsLoader::new(&schema).load(&MapEnv::new()).unwrap_err();

        assert_eq!(errors.len(), 1);
        assert_eq!(errors.errors()[0].kind(), ErrorKind::Missing);
        assert_eq!(errors.errors()[0].loc().to_string(), "openai_api_key");
    }

    #[test]
    fn test_lookup_ignores_case_by_default() {
        let schema = service_schema();
        let env = MapEnv::new().with("openai_api_key", "sk-lower");
        let config = SettingsLoader::new(&schema).load(&env).unwrap();
        assert_eq!(config.get_str("openai_api_key"), Some("sk-lower"));
    }

    #[test]
    fn test_case_sensitive_reads_upper_cased_name() {
        let schema = service_schema();
        let strict = SettingsLoader::new(&schema).case_sensitive(true);
        assert_eq!(strict.env_key(&schema.fields[0]), "OPENAI_API_KEY");

        let lower_only = MapEnv::new().with("openai_api_key", "sk-lower");
        let errors = strict.load(&lower_only).unwrap_err();
        assert_eq!(errors.errors()[0].kind(), ErrorKind::Missing);

        let upper_only = MapEnv::new().with("OPENAI_API_KEY", "sk-upper");
        let config = strict.load(&upper_only).unwrap();
        assert_eq!(config.get_str("openai_api_key"), Some("sk-upper"));
    }

    #[test]
    fn test_exact_name_wins_over_case_variants() {
        let schema = service_schema();
        let env = MapEnv::new()
            .with("OPENAI_API_KEY", "sk-x")
            .with("debug", "false")
            .with("DEBUG", "true")
            .with("Debug", "false");

        for _ in 0..10 {
            let config = SettingsLoader::new(&schema).load(&env).unwrap();
            assert_eq!(config.get_bool("debug"), Some(true));
        }
    }

    #[test]
    fn test_case_variant_choice_is_stable() {
        let forward = vec![
            ("max_tokens".to_string(), "1".to_string()),
            ("Max_Tokens".to_string(), "2".to_string()),
        ];
        let mut backward = forward.clone();
        backward.reverse();

        let a = fold_case(forward);
        let b = fold_case(backward);
        assert_eq!(a.get("MAX_TOKENS"), b.get("MAX_TOKENS"));
        assert_eq!(a["MAX_TOKENS"].0, "Max_Tokens");
    }

    #[test]
    fn test_prefix() {
        let schema = service_schema();
        let loader = SettingsLoader::new(&schema).with_prefix("app_");
        assert_eq!(loader.env_key(&schema.fields[0]), "APP_OPENAI_API_KEY");

        let env = MapEnv::new()
            .with("APP_OPENAI_API_KEY", "sk-app")
            .with("OPENAI_API_KEY", "sk-other");
        assert_eq!(loader.load(&env).unwrap().get_str("openai_api_key"), Some("sk-app"));
    }

    #[test]
    fn test_bad_int_reported() {
        let schema = service_schema();
        let env = MapEnv::new()
            .with("OPENAI_API_KEY", "sk-x")
            .with("MAX_TOKENS", "lots");
        let errors = SettingsLoader::new(&schema).load(&env).unwrap_err();
        assert_eq!(errors.errors()[0].kind(), ErrorKind::WrongType);
        assert_eq!(errors.errors()[0].loc().to_string(), "max_tokens");
    }

    #[test]
    fn test_list_field_parsed_as_json() {
        let schema = Schema::new("Models").field(FieldSpec::list("models", FieldType::String));

        let env = MapEnv::new().with("MODELS", r#"["gpt-4", "claude-3"]"#);
        let config = SettingsLoader::new(&schema).load(&env).unwrap();
        assert_eq!(config.get_list("models").unwrap().len(), 2);

        let env = MapEnv::new().with("MODELS", "gpt-4, claude-3");
        let errors = SettingsLoader::new(&schema).load(&env).unwrap_err();
        assert_eq!(errors.errors()[0].kind(), ErrorKind::WrongType);
    }
}
