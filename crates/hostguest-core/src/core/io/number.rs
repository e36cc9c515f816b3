use crate::core::models::measurement::{UNAVAILABLE_TEXT, Value};

/// Shortest round-trip text for a float in Python `repr` style: `150000.0`, `-7.05`,
/// `1e-05`, `1.5e+16`.
pub(crate) fn float_text(x: f64) -> String {
    if x.is_nan() {
        return "nan".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if x == 0.0 {
        return if x.is_sign_negative() { "-0.0" } else { "0.0" }.to_string();
    }

    let exponent = x.abs().log10().floor() as i32;
    if (-4..16).contains(&exponent) {
        let text = format!("{}", x);
        if text.contains('.') {
            text
        } else {
            format!("{}.0", text)
        }
    } else {
        let text = format!("{:e}", x);
        match text.split_once('e') {
            Some((mantissa, exp)) => {
                let (sign, digits) = match exp.strip_prefix('-') {
                    Some(digits) => ('-', digits),
                    None => ('+', exp),
                };
                format!("{}e{}{:0>2}", mantissa, sign, digits)
            }
            None => text,
        }
    }
}

pub(crate) fn value_text(value: Value) -> String {
    match value {
        Value::Measured(v) => float_text(v),
        Value::Unavailable => UNAVAILABLE_TEXT.to_string(),
    }
}
