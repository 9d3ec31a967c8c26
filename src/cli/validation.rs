use crate::cli::args::CliArgs;

pub fn positive(name: &str, value: f64) -> Result<(), String> {
    if !value.is_finite() || value <= 0.0 {
        return Err(format!("invalid {name} '{value}', expected positive number"));
    }
    Ok(())
}

pub fn non_negative(name: &str, value: f64) -> Result<(), String> {
    if !value.is_finite() || value < 0.0 {
        return Err(format!(
            "invalid {name} '{value}', expected non-negative number"
        ));
    }
    Ok(())
}

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if let Some(page_size) = args.page_size {
        if page_size == 0 {
            return Err("invalid page-size, expected positive integer".to_string());
        }
    }
    if let Some(width) = args.width {
        positive("width", width)?;
    }
    if let Some(height) = args.height {
        positive("height", height)?;
    }
    if let Some(threshold) = args.threshold {
        non_negative("threshold", threshold)?;
    }
    if let Some(raw) = args.endpoint.as_deref() {
        reqwest::Url::parse(raw).map_err(|e| format!("invalid --endpoint '{raw}': {e}"))?;
    }
    Ok(())
}
