//! Knobs for the load engine.

use serde::{Deserialize, Serialize};

/// Options applied when loading a formula into a field set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// Reject a condition whose sub-field differs from the one already
    /// recorded on its field. Off by default: the condition joins the
    /// existing field.
    pub strict_sub_fields: bool,

    /// After a successful load, order fields And first, then Or, then Xor
    /// (stable within each group). This makes loading a re-saved formula
    /// reproduce the same field order.
    pub canonical_field_order: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            strict_sub_fields: false,
            canonical_field_order: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_keys_take_defaults() {
        let options: LoadOptions = serde_json::from_str(r#"{"strict_sub_fields": true}"#).unwrap();
        assert_eq!(
            options,
            LoadOptions {
                strict_sub_fields: true,
                canonical_field_order: true,
            }
        );
    }
}
