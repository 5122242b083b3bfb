//! Reading and writing ingredient quantities the way cooks write them:
//! `2`, `0.5`, `3/4` or `1 1/2`.

const FRACTIONS: &[(f64, &str)] = &[
    (0.125, "1/8"),
    (0.25, "1/4"),
    (1.0 / 3.0, "1/3"),
    (0.5, "1/2"),
    (2.0 / 3.0, "2/3"),
    (0.75, "3/4"),
];

const TOLERANCE: f64 = 0.01;

pub(crate) fn parse_quantity(input: &str) -> Option<f64> {
    let parts = input.split_whitespace().collect::<Vec<_>>();

    let total = match parts.as_slice() {
        [single] => parse_part(single)?,
        [whole, fraction] if fraction.contains('/') && !whole.contains('/') => {
            parse_part(whole)? + parse_part(fraction)?
        }
        _ => return None,
    };

    (total.is_finite() && total >= 0.0).then_some(total)
}

fn parse_part(part: &str) -> Option<f64> {
    match part.split_once('/') {
        Some((numerator, denominator)) => {
            let numerator = numerator.parse::<f64>().ok()?;
            let denominator = denominator.parse::<f64>().ok()?;

            (denominator.abs() > f64::EPSILON).then(|| numerator / denominator)
        }
        None => part.parse::<f64>().ok(),
    }
}

pub(crate) fn format_quantity(quantity: f64) -> String {
    if quantity < 0.0 {
        return format!("-{}", format_quantity(-quantity));
    }

    let whole = quantity.trunc();
    let remainder = quantity - whole;

    if remainder < TOLERANCE {
        return format!("{whole:.0}");
    }
    if 1.0 - remainder < TOLERANCE {
        return format!("{:.0}", whole + 1.0);
    }

    match FRACTIONS
        .iter()
        .find(|(value, _)| (remainder - value).abs() < TOLERANCE)
    {
        Some((_, fraction)) if whole < 1.0 => (*fraction).to_string(),
        Some((_, fraction)) => format!("{whole:.0} {fraction}"),
        None => {
            let formatted = format!("{quantity:.2}");
            formatted
                .trim_end_matches('0')
                .trim_end_matches('.')
                .to_string()
        }
    }
}
