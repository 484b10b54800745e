use reftag_core::models::ImageStatus;

pub(super) fn parse_min_one_usize(raw: &str) -> std::result::Result<usize, String> {
    let value = raw
        .parse::<usize>()
        .map_err(|_| format!("invalid integer value '{raw}'"))?;
    if value == 0 {
        return Err("value must be >= 1".to_string());
    }
    Ok(value)
}

pub(super) fn parse_image_status(raw: &str) -> std::result::Result<ImageStatus, String> {
    raw.parse::<ImageStatus>().map_err(|err| err.to_string())
}
