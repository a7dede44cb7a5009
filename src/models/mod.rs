//! # Data Models
//!
//! Persisted records and their PostgreSQL queries.
//!
//! ## Tables
//!
//! - [`Case`]: `cases`, one row per process instance
//! - [`Activity`]: `activities`, timestamped events of a case
//! - [`OrderItem`]: `order_items`, purchase order lines (independent of cases)
//! - [`Bill`]: `bills`, invoices issued for a case
//! - [`Alert`]: `alerts`, dashboard alerts managed through the API
//!
//! Reference DDL lives in `sql/schema.sql`. Dynamic filtering is built with
//! `sqlx::QueryBuilder`; values are always bound, never interpolated.

use sqlx::{Postgres, QueryBuilder};

/// Stores a `FromStr` enum as PostgreSQL TEXT. Unknown values fail to decode.
macro_rules! text_column {
    ($ty:ty) => {
        impl sqlx::Type<sqlx::Postgres> for $ty {
            fn type_info() -> sqlx::postgres::PgTypeInfo {
                <String as sqlx::Type<sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
                <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
            }
        }

        impl<'r> sqlx::Decode<'r, sqlx::Postgres> for $ty {
            fn decode(
                value: sqlx::postgres::PgValueRef<'r>,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                let raw = <&str as sqlx::Decode<'r, sqlx::Postgres>>::decode(value)?;
                Ok(raw.parse::<$ty>()?)
            }
        }
    };
}

pub(crate) use text_column;

pub mod activity;
pub mod alert;
pub mod bill;
pub mod case;
pub mod order_item;

pub use activity::Activity;
pub use alert::{Alert, AlertSeverity, AlertState, NewAlert};
pub use bill::Bill;
pub use case::Case;
pub use order_item::OrderItem;

/// Append ` AND <column> = ANY($n)` when `values` is non-empty
pub(crate) fn push_any(
    builder: &mut QueryBuilder<'_, Postgres>,
    column: &str,
    values: &[String],
) {
    if values.is_empty() {
        return;
    }
    builder.push(" AND ");
    builder.push(column);
    builder.push(" = ANY(");
    builder.push_bind(values.to_vec());
    builder.push(")");
}

/// Append ` AND <column> = $n` when a flag value was requested
pub(crate) fn push_flag(builder: &mut QueryBuilder<'_, Postgres>, column: &str, value: Option<bool>) {
    if let Some(value) = value {
        builder.push(" AND ");
        builder.push(column);
        builder.push(" = ");
        builder.push_bind(value);
    }
}

/// Append LIMIT/OFFSET for a page window
pub(crate) fn push_window(
    builder: &mut QueryBuilder<'_, Postgres>,
    window: Option<crate::query::PageWindow>,
) {
    if let Some(window) = window {
        builder.push(" LIMIT ");
        builder.push_bind(i64::try_from(window.limit).unwrap_or(i64::MAX));
        builder.push(" OFFSET ");
        builder.push_bind(i64::try_from(window.offset).unwrap_or(i64::MAX));
    }
}

/// Convert a `COUNT(*)` result into an unsigned count
pub(crate) fn to_count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}
