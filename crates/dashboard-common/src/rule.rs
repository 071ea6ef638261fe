//! Threshold rules and the data sources that own them.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::color::Color;

/// Colors handed out to newly added rules, cycled by rule count.
pub const PRESET_COLORS: [&str; 10] = [
    "#3b82f6", "#22c55e", "#ef4444", "#f97316", "#8b5cf6", "#06b6d4", "#84cc16", "#f59e0b",
    "#ec4899", "#64748b",
];

/// Comparison applied between a weather value and a rule threshold.
///
/// Unrecognized operator strings are kept as `Unknown` so that a rule set
/// loaded from disk never fails to deserialize; such rules never match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Operator {
    /// `=` or `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    Unknown(String),
}

impl Operator {
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "=" | "==" => Operator::Eq,
            "!=" => Operator::Ne,
            "<" => Operator::Lt,
            "<=" => Operator::Le,
            ">" => Operator::Gt,
            ">=" => Operator::Ge,
            other => Operator::Unknown(other.to_string()),
        }
    }

    pub fn symbol(&self) -> &str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::Unknown(s) => s,
        }
    }

    /// Apply the comparison. `None` for an unknown operator.
    pub fn compare(&self, value: f64, threshold: f64) -> Option<bool> {
        match self {
            Operator::Eq => Some(value == threshold),
            Operator::Ne => Some(value != threshold),
            Operator::Lt => Some(value < threshold),
            Operator::Le => Some(value <= threshold),
            Operator::Gt => Some(value > threshold),
            Operator::Ge => Some(value >= threshold),
            Operator::Unknown(_) => None,
        }
    }
}

impl From<String> for Operator {
    fn from(s: String) -> Self {
        Operator::parse(&s)
    }
}

impl From<Operator> for String {
    fn from(op: Operator) -> Self {
        op.symbol().to_string()
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A single (operator, threshold, color) classification rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorRule {
    pub id: String,
    pub operator: Operator,
    /// Threshold the value is compared against.
    pub value: f64,
    pub color: Color,
}

impl ColorRule {
    pub fn new(id: impl Into<String>, operator: Operator, value: f64, color: Color) -> Self {
        Self {
            id: id.into(),
            operator,
            value,
            color,
        }
    }
}

/// Weather variable a data source colors by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherVariable {
    Temperature,
    WindSpeed,
}

impl WeatherVariable {
    /// Maps a data source id to its variable. `None` for unrecognized ids.
    pub fn from_source_id(id: &str) -> Option<Self> {
        match id {
            "temperature" => Some(WeatherVariable::Temperature),
            "windspeed" => Some(WeatherVariable::WindSpeed),
            _ => None,
        }
    }

    /// Open-Meteo hourly field name.
    pub fn provider_field(&self) -> &'static str {
        match self {
            WeatherVariable::Temperature => "temperature_2m",
            WeatherVariable::WindSpeed => "windspeed_10m",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            WeatherVariable::Temperature => "°C",
            WeatherVariable::WindSpeed => "km/h",
        }
    }
}

impl fmt::Display for WeatherVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeatherVariable::Temperature => write!(f, "temperature"),
            WeatherVariable::WindSpeed => write!(f, "windspeed"),
        }
    }
}

/// A named weather variable plus its ordered coloring rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSource {
    pub id: String,
    pub name: String,
    /// Provider field the values come from, e.g. `temperature_2m`.
    pub field: String,
    pub rules: Vec<ColorRule>,
}

/// Partial update for a data source; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct DataSourceUpdate {
    pub name: Option<String>,
    pub field: Option<String>,
    pub rules: Option<Vec<ColorRule>>,
}

impl DataSource {
    /// Built-in temperature source: blue below 10, green from 10, red from 25.
    pub fn temperature() -> Self {
        Self {
            id: "temperature".to_string(),
            name: "Temperature".to_string(),
            field: WeatherVariable::Temperature.provider_field().to_string(),
            rules: vec![
                ColorRule::new("1", Operator::Lt, 10.0, Color::hex("#3b82f6")),
                ColorRule::new("2", Operator::Ge, 10.0, Color::hex("#22c55e")),
                ColorRule::new("3", Operator::Ge, 25.0, Color::hex("#ef4444")),
            ],
        }
    }

    /// Built-in wind speed source (km/h).
    pub fn wind_speed() -> Self {
        Self {
            id: "windspeed".to_string(),
            name: "Wind Speed".to_string(),
            field: WeatherVariable::WindSpeed.provider_field().to_string(),
            rules: vec![
                ColorRule::new("1", Operator::Lt, 10.0, Color::hex("#22c55e")),
                ColorRule::new("2", Operator::Ge, 10.0, Color::hex("#f59e0b")),
                ColorRule::new("3", Operator::Ge, 30.0, Color::hex("#ef4444")),
            ],
        }
    }

    /// Variable implied by the id, if it is a known one.
    pub fn variable(&self) -> Option<WeatherVariable> {
        WeatherVariable::from_source_id(&self.id)
    }

    pub fn apply(&mut self, update: DataSourceUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(field) = update.field {
            self.field = field;
        }
        if let Some(rules) = update.rules {
            self.rules = rules;
        }
    }

    /// Appends a `>= 0` rule with the next preset color and returns its id.
    pub fn add_rule(&mut self, id: impl Into<String>) -> String {
        let id = id.into();
        let color = PRESET_COLORS[self.rules.len() % PRESET_COLORS.len()];
        self.rules
            .push(ColorRule::new(id.clone(), Operator::Ge, 0.0, Color::hex(color)));
        id
    }

    /// Replaces the rule with the same id. Returns false when no rule matched.
    pub fn update_rule(&mut self, rule: ColorRule) -> bool {
        match self.rules.iter_mut().find(|r| r.id == rule.id) {
            Some(existing) => {
                *existing = rule;
                true
            }
            None => false,
        }
    }

    pub fn remove_rule(&mut self, rule_id: &str) -> bool {
        let before = self.rules.len();
        self.rules.retain(|r| r.id != rule_id);
        self.rules.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_roundtrip_symbols() {
        for sym in ["=", "!=", "<", "<=", ">", ">="] {
            assert_eq!(Operator::parse(sym).symbol(), sym);
        }
        assert_eq!(Operator::parse("=="), Operator::Eq);
    }

    #[test]
    fn test_unknown_operator_deserializes() {
        let rule: ColorRule =
            serde_json::from_str(r##"{"id":"x","operator":"~","value":1,"color":"#000000"}"##)
                .unwrap();
        assert_eq!(rule.operator, Operator::Unknown("~".to_string()));
        assert_eq!(rule.operator.compare(1.0, 1.0), None);
    }

    #[test]
    fn test_add_rule_cycles_preset_colors() {
        let mut ds = DataSource::temperature();
        ds.add_rule("4");
        let added = ds.rules.last().unwrap();
        assert_eq!(added.operator, Operator::Ge);
        assert_eq!(added.value, 0.0);
        assert_eq!(added.color, Color::hex(PRESET_COLORS[3]));
    }

    #[test]
    fn test_update_and_remove_rule() {
        let mut ds = DataSource::temperature();
        let mut rule = ds.rules[0].clone();
        rule.value = 5.0;
        assert!(ds.update_rule(rule));
        assert_eq!(ds.rules[0].value, 5.0);
        assert!(ds.remove_rule("1"));
        assert!(!ds.remove_rule("1"));
        assert_eq!(ds.rules.len(), 2);
    }

    #[test]
    fn test_variable_from_id() {
        assert_eq!(DataSource::temperature().variable(), Some(WeatherVariable::Temperature));
        assert_eq!(DataSource::wind_speed().variable(), Some(WeatherVariable::WindSpeed));
        assert_eq!(WeatherVariable::from_source_id("humidity"), None);
    }
}
