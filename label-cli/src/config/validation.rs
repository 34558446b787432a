//! Setting value validation.

/// Validate a setting value. Returns `Ok(())` if valid, or an error message.
pub fn validate_setting(key: &str, value: &str) -> Result<(), String> {
    match key {
        "LABEL_RASTERIZER" => {
            if value.trim().is_empty() {
                return Err("rasterizer program must not be empty".into());
            }
        }
        "LABEL_DPI" => validate_int_range(value, 72, 1200)?,
        "LABEL_RASTERIZER_TIMEOUT_SECS" => validate_int_range(value, 1, 600)?,
        "LABEL_PROCESSING" => {
            value.parse::<label_raster::LabelProcessing>()?;
        }
        "LABEL_THRESHOLD" => {
            if value != "true" && value != "false" {
                return Err("must be 'true' or 'false'".into());
            }
        }
        _ => {}
    }
    Ok(())
}

fn validate_int_range(value: &str, min: u32, max: u32) -> Result<(), String> {
    let v: u32 = value.parse().map_err(|_| "must be a positive integer")?;
    if v < min || v > max {
        return Err(format!("must be between {min} and {max}"));
    }
    Ok(())
}
