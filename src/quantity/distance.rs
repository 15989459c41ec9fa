quantity!(Kilometers, via: f64, suffix: "km", precision: 1);

impl Kilometers {
    /// Parse a bracket header such as `10`, `10 km` or `10KM`.
    pub fn parse_cutoff(header: &str) -> Option<Self> {
        let header = header.trim();
        let number = header
            .len()
            .checked_sub(2)
            .filter(|&split| header.is_char_boundary(split))
            .and_then(|split| {
                let (number, unit) = header.split_at(split);
                unit.eq_ignore_ascii_case("km").then_some(number)
            })
            .unwrap_or(header);
        let cutoff = number.trim().parse::<Self>().ok()?;
        (cutoff.is_finite() && cutoff >= Self::ZERO).then_some(cutoff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cutoff_ok() {
        assert_eq!(Kilometers::parse_cutoff("30"), Some(Kilometers(30.0)));
        assert_eq!(Kilometers::parse_cutoff(" 10 km "), Some(Kilometers(10.0)));
        assert_eq!(Kilometers::parse_cutoff("0KM"), Some(Kilometers(0.0)));
        assert_eq!(Kilometers::parse_cutoff("12.5 km"), Some(Kilometers(12.5)));
    }

    #[test]
    fn test_parse_cutoff_rejected() {
        assert_eq!(Kilometers::parse_cutoff("Remarks"), None);
        assert_eq!(Kilometers::parse_cutoff("km"), None);
        assert_eq!(Kilometers::parse_cutoff("-5 km"), None);
        assert_eq!(Kilometers::parse_cutoff("inf"), None);
        assert_eq!(Kilometers::parse_cutoff(""), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Kilometers(34.0).to_string(), "34.0 km");
    }
}
