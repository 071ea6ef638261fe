//! Threshold rule evaluation.
//!
//! Rules are checked from the highest threshold down and the first match
//! wins, so a set like `>=25 red, >=10 green, <10 blue` picks the highest
//! applicable band without the bands having to be mutually exclusive.
//! Rules are ordered by raw threshold whatever their operator; mixing `<`
//! and `>=` rules can therefore depend on that order.

use dashboard_common::{Color, ColorRule, WeatherVariable};
use tracing::warn;

/// Whether `value` satisfies the rule. Unknown operators never match.
pub fn evaluate(value: f64, rule: &ColorRule) -> bool {
    match rule.operator.compare(value, rule.value) {
        Some(matched) => matched,
        None => {
            warn!(operator = %rule.operator, rule_id = %rule.id, "Unknown rule operator");
            false
        }
    }
}

/// The rule that decides the color for `value`, if any.
pub fn matching_rule(value: f64, rules: &[ColorRule]) -> Option<&ColorRule> {
    let mut ordered: Vec<&ColorRule> = rules.iter().collect();
    // stable, so equal thresholds keep their configured order
    ordered.sort_by(|a, b| b.value.total_cmp(&a.value));
    ordered.into_iter().find(|rule| evaluate(value, rule))
}

/// Color for `value` under `rules`, or the neutral fallback when none match.
pub fn resolve_color(value: f64, rules: &[ColorRule]) -> Color {
    matching_rule(value, rules)
        .map(|rule| rule.color.clone())
        .unwrap_or_else(Color::fallback)
}

/// Coarse description of a temperature in °C.
pub fn temperature_label(celsius: f64) -> &'static str {
    match celsius {
        t if t < 0.0 => "Freezing",
        t if t < 10.0 => "Cold",
        t if t < 20.0 => "Cool",
        t if t < 25.0 => "Moderate",
        t if t < 30.0 => "Warm",
        _ => "Hot",
    }
}

pub fn format_temperature(celsius: f64) -> String {
    format!("{:.1}°C", celsius)
}

/// Value with one decimal and the variable's unit.
pub fn format_value(value: f64, variable: WeatherVariable) -> String {
    format!("{:.1} {}", value, variable.unit())
}
