pub mod table;

use serde::Serialize;
use std::collections::HashSet;

pub use table::OPTICAL_FIELDS;

/// How NetBox stores and validates a custom field value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Text,
    Integer,
    Select,
}

impl ValueKind {
    /// NetBox custom field type value
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Text => "text",
            ValueKind::Integer => "integer",
            ValueKind::Select => "select",
        }
    }

    pub fn from_netbox(value: &str) -> Option<Self> {
        match value {
            "text" => Some(ValueKind::Text),
            "integer" => Some(ValueKind::Integer),
            "select" => Some(ValueKind::Select),
            _ => None,
        }
    }
}

/// Built-in NetBox record types a custom field can be attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordType {
    Cable,
    Interface,
    FrontPort,
    RearPort,
    Circuit,
}

impl RecordType {
    pub const ALL: &'static [RecordType] = &[
        RecordType::Cable,
        RecordType::Interface,
        RecordType::FrontPort,
        RecordType::RearPort,
        RecordType::Circuit,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            RecordType::Cable => "cable",
            RecordType::Interface => "interface",
            RecordType::FrontPort => "front_port",
            RecordType::RearPort => "rear_port",
            RecordType::Circuit => "circuit",
        }
    }

    /// Django app label owning the model
    pub fn app_label(&self) -> &'static str {
        match self {
            RecordType::Circuit => "circuits",
            _ => "dcim",
        }
    }

    /// Django model name, as used by the content-types endpoint
    pub fn model(&self) -> &'static str {
        match self {
            RecordType::Cable => "cable",
            RecordType::Interface => "interface",
            RecordType::FrontPort => "frontport",
            RecordType::RearPort => "rearport",
            RecordType::Circuit => "circuit",
        }
    }

    /// `app_label.model` form used in custom field payloads
    pub fn content_type(&self) -> String {
        format!("{}.{}", self.app_label(), self.model())
    }
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// Declarative description of one custom field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub group: &'static str,
    pub value_kind: ValueKind,
    pub description: &'static str,
    pub targets: &'static [RecordType],
    /// Allowed values for select fields; empty for every other kind
    pub choices: &'static [&'static str],
    pub default: Option<&'static str>,
    pub min: Option<i64>,
    pub max: Option<i64>,
}

impl FieldSpec {
    /// Target record types, deduplicated and in a stable order
    pub fn target_set(&self) -> Vec<RecordType> {
        let mut targets = self.targets.to_vec();
        targets.sort();
        targets.dedup();
        targets
    }
}

/// Rejected field table, with every violation found
#[derive(Debug, thiserror::Error)]
#[error("invalid field table: {}", .violations.join("; "))]
pub struct TableError {
    pub violations: Vec<String>,
}

/// NetBox only accepts lowercase names made of letters, digits and underscores
fn is_valid_field_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

/// Check the table before anything is sent to NetBox
pub fn validate_table(table: &[FieldSpec]) -> Result<(), TableError> {
    let mut violations = Vec::new();
    let mut seen = HashSet::new();

    for spec in table {
        let name = spec.name;

        if !is_valid_field_name(name) {
            violations.push(format!("{}: invalid field name", name));
        }
        if !seen.insert(name) {
            violations.push(format!("{}: duplicate field name", name));
        }
        if spec.label.is_empty() {
            violations.push(format!("{}: empty label", name));
        }
        if spec.group.is_empty() {
            violations.push(format!("{}: empty group", name));
        }
        if spec.targets.is_empty() {
            violations.push(format!("{}: no target record types", name));
        }

        match spec.value_kind {
            ValueKind::Select => {
                if spec.choices.is_empty() {
                    violations.push(format!("{}: select field without choices", name));
                } else if let Some(default) = spec.default {
                    if !spec.choices.contains(&default) {
                        violations.push(format!("{}: default '{}' is not a choice", name, default));
                    }
                }
            }
            _ => {
                if !spec.choices.is_empty() {
                    violations.push(format!("{}: choices on a {} field", name, spec.value_kind.as_str()));
                }
            }
        }

        if spec.value_kind == ValueKind::Integer {
            if let Some(default) = spec.default {
                if default.parse::<i64>().is_err() {
                    violations.push(format!("{}: default '{}' is not an integer", name, default));
                }
            }
        }

        if spec.value_kind != ValueKind::Integer && (spec.min.is_some() || spec.max.is_some()) {
            violations.push(format!("{}: bounds on a {} field", name, spec.value_kind.as_str()));
        }

        if let (Some(min), Some(max)) = (spec.min, spec.max) {
            if min > max {
                violations.push(format!("{}: minimum {} exceeds maximum {}", name, min, max));
            }
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(TableError { violations })
    }
}

/// Distinct group tags of a table, in first-seen order
pub fn table_groups(table: &[FieldSpec]) -> Vec<&'static str> {
    let mut groups: Vec<&'static str> = Vec::new();
    for spec in table {
        if !groups.contains(&spec.group) {
            groups.push(spec.group);
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_field(name: &'static str) -> FieldSpec {
        FieldSpec {
            name,
            label: "Label",
            group: "Optical Loss",
            value_kind: ValueKind::Text,
            description: "",
            targets: &[RecordType::Cable],
            choices: &[],
            default: None,
            min: None,
            max: None,
        }
    }

    #[test]
    fn test_optical_table_is_valid() {
        assert!(validate_table(OPTICAL_FIELDS).is_ok());
    }

    #[test]
    fn test_select_without_choices_rejected() {
        let spec = FieldSpec {
            value_kind: ValueKind::Select,
            ..text_field("fiber_type")
        };
        let err = validate_table(&[spec]).unwrap_err();
        assert_eq!(err.violations, vec!["fiber_type: select field without choices"]);
    }

    #[test]
    fn test_select_default_must_be_choice() {
        let spec = FieldSpec {
            value_kind: ValueKind::Select,
            choices: &["G.652", "G.657"],
            default: Some("G.999"),
            ..text_field("fiber_type")
        };
        assert!(validate_table(&[spec]).is_err());
    }

    #[test]
    fn test_choices_only_on_select() {
        let spec = FieldSpec {
            choices: &["G.652"],
            ..text_field("attenuation_coeff")
        };
        let err = validate_table(&[spec]).unwrap_err();
        assert!(err.violations[0].contains("choices on a text field"));
    }

    #[test]
    fn test_bounds_and_targets() {
        let inverted = FieldSpec {
            value_kind: ValueKind::Integer,
            min: Some(0),
            max: Some(-60),
            ..text_field("attenuator_loss")
        };
        let untargeted = FieldSpec {
            targets: &[],
            ..text_field("rx_overload")
        };
        let err = validate_table(&[inverted, untargeted]).unwrap_err();
        assert_eq!(err.violations.len(), 2);
        assert!(err.to_string().contains("minimum 0 exceeds maximum -60"));
        assert!(err.to_string().contains("rx_overload: no target record types"));
    }

    #[test]
    fn test_bounds_only_on_integer_fields() {
        let bounded_text = FieldSpec {
            min: Some(-60),
            max: Some(0),
            ..text_field("power_loss")
        };
        let err = validate_table(&[bounded_text]).unwrap_err();
        assert_eq!(err.violations, vec!["power_loss: bounds on a text field"]);

        let bounded_integer = FieldSpec {
            value_kind: ValueKind::Integer,
            min: Some(850),
            max: Some(1676),
            ..text_field("tx_wavelength")
        };
        assert!(validate_table(&[bounded_integer]).is_ok());
    }

    #[test]
    fn test_optical_table_bounds_are_integer_only() {
        for spec in OPTICAL_FIELDS {
            if spec.min.is_some() || spec.max.is_some() {
                assert_eq!(spec.value_kind, ValueKind::Integer, "{}", spec.name);
            }
        }
        assert!(OPTICAL_FIELDS.iter().all(|s| !s.targets.contains(&RecordType::Circuit)));
    }

    #[test]
    fn test_duplicate_and_bad_names() {
        let err = validate_table(&[
            text_field("return_loss"),
            text_field("return_loss"),
            text_field("Return Loss"),
        ])
        .unwrap_err();
        assert_eq!(err.violations.len(), 2);
    }

    #[test]
    fn test_field_name_rule() {
        assert!(is_valid_field_name("tx_wavelength"));
        assert!(is_valid_field_name("g652"));
        assert!(!is_valid_field_name(""));
        assert!(!is_valid_field_name("_hidden"));
        assert!(!is_valid_field_name("1st"));
        assert!(!is_valid_field_name("tx-wavelength"));
    }

    #[test]
    fn test_table_groups() {
        assert_eq!(table_groups(OPTICAL_FIELDS), vec!["Optical Loss", "Optical Power"]);
    }

    #[test]
    fn test_record_type_content_types() {
        assert_eq!(RecordType::FrontPort.tag(), "front_port");
        assert_eq!(RecordType::FrontPort.model(), "frontport");
        assert_eq!(RecordType::Circuit.app_label(), "circuits");
        assert_eq!(RecordType::Cable.app_label(), "dcim");
        assert_eq!(RecordType::RearPort.content_type(), "dcim.rearport");
        assert_eq!(ValueKind::from_netbox("select"), Some(ValueKind::Select));
        assert_eq!(ValueKind::from_netbox("decimal"), None);
    }
}
