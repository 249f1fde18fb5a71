use super::ApiError;

pub fn validate_item_id(id: i32) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid item ID: {}. ID must be a positive integer",
            id
        )));
    }
    Ok(id)
}

/// Trims and rejects empty required form fields.
pub fn validate_required_text<'a>(field: &str, value: &'a str) -> Result<&'a str, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation(format!("{field} cannot be empty")));
    }
    Ok(trimmed)
}

pub fn validate_username(username: &str) -> Result<&str, ApiError> {
    let trimmed = username.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("Username cannot be empty"));
    }

    if trimmed.len() > 32 {
        return Err(ApiError::validation(
            "Username must be 32 characters or less",
        ));
    }

    if !trimmed
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_')
    {
        return Err(ApiError::validation(
            "Username can only contain letters, numbers, dots, hyphens, and underscores",
        ));
    }

    Ok(trimmed)
}

pub fn validate_password(password: &str) -> Result<&str, ApiError> {
    if password.len() < 8 {
        return Err(ApiError::validation(
            "Password must be at least 8 characters",
        ));
    }
    Ok(password)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_item_id() {
        assert!(validate_item_id(1).is_ok());
        assert!(validate_item_id(12345).is_ok());
        assert!(validate_item_id(0).is_err());
        assert!(validate_item_id(-1).is_err());
    }

    #[test]
    fn test_validate_required_text() {
        assert_eq!(
            validate_required_text("Description", "  Black wallet  ").unwrap(),
            "Black wallet"
        );
        assert!(validate_required_text("Description", "").is_err());
        assert!(validate_required_text("Description", "   ").is_err());
    }

    #[test]
    fn test_validate_username() {
        assert!(validate_username("ms.jones").is_ok());
        assert!(validate_username("front_desk-1").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username("a".repeat(33).as_str()).is_err());
        assert!(validate_username("bad name").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("longenough").is_ok());
        assert!(validate_password("short").is_err());
    }
}
