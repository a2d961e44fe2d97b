use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeFlow {
    #[serde(rename = "IMP")]
    Import,
    #[serde(rename = "EXP")]
    Export,
}

impl TradeFlow {
    pub const ALL: [Self; 2] = [Self::Import, Self::Export];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Import => "IMP",
            Self::Export => "EXP",
        }
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Import),
            1 => Some(Self::Export),
            _ => None,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "imp" | "import" | "imports" => Some(Self::Import),
            "exp" | "export" | "exports" => Some(Self::Export),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Import => "Import",
            Self::Export => "Export",
        }
    }

    /// Trade flow choices are fixed; the API never supplies them.
    pub fn options() -> Vec<SelectOption> {
        Self::ALL
            .iter()
            .map(|flow| SelectOption::new(flow.label(), flow.as_str()))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowType {
    #[serde(rename = "QTY")]
    Quantity,
    #[serde(rename = "VALUE")]
    Value,
}

impl FlowType {
    pub const ALL: [Self; 2] = [Self::Quantity, Self::Value];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Quantity => "QTY",
            Self::Value => "VALUE",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "qty" | "quantity" => Some(Self::Quantity),
            "value" | "val" => Some(Self::Value),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Quantity => "Quantity",
            Self::Value => "Value",
        }
    }

    pub fn options() -> Vec<SelectOption> {
        Self::ALL
            .iter()
            .map(|flow| SelectOption::new(flow.label(), flow.as_str()))
            .collect()
    }
}

/// One selectable choice in a form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

impl SelectOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trade_flow_parses_wire_and_display_forms() {
        assert_eq!(TradeFlow::parse("IMP"), Some(TradeFlow::Import));
        assert_eq!(TradeFlow::parse(" export "), Some(TradeFlow::Export));
        assert_eq!(TradeFlow::parse("transit"), None);
    }

    #[test]
    fn flow_type_serializes_to_wire_value() {
        let json = serde_json::to_string(&FlowType::Quantity).unwrap();
        assert_eq!(json, "\"QTY\"");
        assert_eq!(FlowType::parse("Value"), Some(FlowType::Value));
    }

    #[test]
    fn trade_flow_options_use_wire_values() {
        let options = TradeFlow::options();
        assert_eq!(options[0], SelectOption::new("Import", "IMP"));
        assert_eq!(options[1], SelectOption::new("Export", "EXP"));
    }
}
