//! Per-resource export presets.
//!
//! Each admin screen exports the same backend CSV but reshapes it before
//! download: Arabic headers for the office staff, internal columns dropped,
//! and the `#<id>` suffix the backend appends to phone numbers masked off.

use rehla_export::{ColumnTransform, Row};

/// Transform preset for a resource, `None` when the raw CSV ships as-is.
pub fn transforms_for(resource: &str) -> Option<Vec<ColumnTransform>> {
    match resource {
        "customers" => Some(vec![
            ColumnTransform::rename("name", "الاسم"),
            ColumnTransform::rename("email", "البريد الإلكتروني"),
            ColumnTransform::drop_column("internal_id"),
            ColumnTransform::derive("الهاتف", masked_phone),
            ColumnTransform::drop_column("phone"),
        ]),
        "providers" => Some(vec![
            ColumnTransform::rename("name", "اسم المزود"),
            ColumnTransform::rename("city", "المدينة"),
            ColumnTransform::drop_column("internal_id"),
            ColumnTransform::derive("الهاتف", masked_phone),
            ColumnTransform::drop_column("phone"),
        ]),
        "bookings" => Some(vec![
            ColumnTransform::rename("trip_title", "الرحلة"),
            ColumnTransform::rename("customer_name", "العميل"),
            ColumnTransform::rename("status", "الحالة"),
            ColumnTransform::rename("total", "المبلغ"),
            ColumnTransform::drop_column("internal_id"),
        ]),
        _ => None,
    }
}

/// Phone values arrive as `<number>#<record id>`; only the number ships.
fn masked_phone(row: &Row) -> String {
    row.get("phone")
        .unwrap_or_default()
        .split('#')
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}
