use askama::Result;

// Custom filters used by the templates, e.g. `{{ item.cost_per_unit|money }}`.

/// Two decimal places, the way prices are shown everywhere.
#[allow(clippy::unnecessary_wraps, clippy::trivially_copy_pass_by_ref)]
pub fn money(value: &f64) -> Result<String> {
    Ok(format!("{:.2}", value))
}

/// Placeholder for optional columns left blank.
#[allow(clippy::unnecessary_wraps)]
pub fn or_dash(value: &str) -> Result<String> {
    if value.trim().is_empty() {
        Ok("-".to_string())
    } else {
        Ok(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_rounds_to_cents() {
        assert_eq!(money(&2.5).unwrap(), "2.50");
        assert_eq!(money(&12.0).unwrap(), "12.00");
        assert_eq!(money(&0.0).unwrap(), "0.00");
    }

    #[test]
    fn or_dash_fills_blanks() {
        assert_eq!(or_dash("").unwrap(), "-");
        assert_eq!(or_dash("  ").unwrap(), "-");
        assert_eq!(or_dash("Acme").unwrap(), "Acme");
    }
}
