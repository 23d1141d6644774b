//! Fixed-size, 1-based page arithmetic shared by the listings.

use crate::controller::ValidationError;

/// Maximum registers returned per page.
pub const PAGE_SIZE: u16 = 10;

/// Row offset of the first register on `page`.
///
/// Page 0 has no meaning and is rejected instead of wrapping around.
pub fn offset(page: u16) -> Result<u32, ValidationError> {
    if page == 0 {
        return Err(ValidationError::new("page must be greater than zero"));
    }
    Ok(u32::from(PAGE_SIZE) * u32::from(page - 1))
}

/// Clamp a `COUNT(*)` result into the wire type.
pub fn total(count: i64) -> u32 {
    u32::try_from(count.max(0)).unwrap_or(u32::MAX)
}
