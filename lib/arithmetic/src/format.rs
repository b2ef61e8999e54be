use crate::value::Number;

const SIGNIFICANT_DIGITS: i32 = 10;

/// Renders a result for display
///
/// Integral values print without a fractional part; anything else prints with
/// ten significant digits, switching to scientific notation for very large or
/// very small magnitudes
pub fn format_number(value: Number) -> String {
    match value {
        Number::Int(i) => i.to_string(),
        Number::Float(f) if f.is_nan() => "nan".to_string(),
        Number::Float(f) if f.is_infinite() && f > 0.0 => "inf".to_string(),
        Number::Float(f) if f.is_infinite() => "-inf".to_string(),
        // Also folds -0.0 into "0"
        Number::Float(f) if f == 0.0 => "0".to_string(),
        Number::Float(f) if f.fract() == 0.0 => format!("{:.0}", f),
        Number::Float(f) => format_general(f),
    }
}

fn format_general(f: f64) -> String {
    let scientific = format!("{:.*e}", (SIGNIFICANT_DIGITS - 1) as usize, f);
    let parts = scientific
        .split_once('e')
        .and_then(|(mantissa, exp)| Some((mantissa, exp.parse::<i32>().ok()?)));

    let (mantissa, exp) = match parts {
        Some(parts) => parts,
        None => return scientific,
    };

    if exp < -4 || exp >= SIGNIFICANT_DIGITS {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", strip_zeros(mantissa), sign, exp.abs())
    } else {
        let decimals = (SIGNIFICANT_DIGITS - 1 - exp) as usize;
        strip_zeros(&format!("{:.*}", decimals, f)).to_string()
    }
}

fn strip_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}
