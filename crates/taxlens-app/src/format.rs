// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

/// `$1,234,567` for whole-dollar amounts.
pub fn format_dollars(dollars: i64) -> String {
    let (sign, dollars) = split_sign(dollars);
    format!("{sign}${}", group_thousands(dollars))
}

/// `$950`, `$12.5k`, `$1.2M`, `$3B`.
pub fn format_compact_dollars(dollars: i64) -> String {
    let (sign, magnitude) = split_sign(dollars);
    let amount = magnitude as f64;
    if amount < 1000.0 {
        return format!("{sign}${magnitude}");
    }

    let (value, suffix) = if amount < 1_000_000.0 {
        (amount / 1000.0, "k")
    } else if amount < 1_000_000_000.0 {
        (amount / 1_000_000.0, "M")
    } else {
        (amount / 1_000_000_000.0, "B")
    };

    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract().abs() < f64::EPSILON {
        format!("{sign}${rounded:.0}{suffix}")
    } else {
        format!("{sign}${rounded:.1}{suffix}")
    }
}

/// One decimal with a sign on increases, e.g. `+5.2%`.
pub fn format_percent_change(percent: f64) -> String {
    if percent > 0.0 {
        format!("+{percent:.1}%")
    } else {
        format!("{percent:.1}%")
    }
}

/// Fractional rate as a percentage with two decimals, e.g. `1.20%`.
pub fn format_rate(rate: f64) -> String {
    format!("{:.2}%", rate * 100.0)
}

pub fn format_square_feet(square_feet: u32) -> String {
    format!("{} sq ft", group_thousands(i64::from(square_feet)))
}

fn group_thousands(value: i64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn split_sign(dollars: i64) -> (&'static str, i64) {
    if dollars >= 0 {
        return ("", dollars);
    }
    if dollars == i64::MIN {
        ("-", i64::MAX)
    } else {
        ("-", -dollars)
    }
}

#[cfg(test)]
mod tests {
    use super::{
        format_compact_dollars, format_dollars, format_percent_change, format_rate,
        format_square_feet,
    };

    #[test]
    fn dollars_are_grouped() {
        let cases = [
            (0, "$0"),
            (999, "$999"),
            (1_000, "$1,000"),
            (273_280, "$273,280"),
            (1_234_567, "$1,234,567"),
            (-4_500, "-$4,500"),
        ];
        for (input, expected) in cases {
            assert_eq!(format_dollars(input), expected, "input {input}");
        }
    }

    #[test]
    fn compact_dollars() {
        let cases = [
            (950, "$950"),
            (1_000, "$1k"),
            (12_500, "$12.5k"),
            (450_000, "$450k"),
            (1_240_000, "$1.2M"),
            (3_000_000_000, "$3B"),
            (-2_500, "-$2.5k"),
        ];
        for (input, expected) in cases {
            assert_eq!(format_compact_dollars(input), expected, "input {input}");
        }
    }

    #[test]
    fn percentages() {
        assert_eq!(format_percent_change(5.2), "+5.2%");
        assert_eq!(format_percent_change(0.0), "0.0%");
        assert_eq!(format_percent_change(-1.5), "-1.5%");
        assert_eq!(format_rate(0.012), "1.20%");
    }

    #[test]
    fn square_feet() {
        assert_eq!(format_square_feet(2_209), "2,209 sq ft");
        assert_eq!(format_square_feet(850), "850 sq ft");
    }
}
