pub mod breadcrumbs;
pub mod clinics;
pub mod collaborators;
pub mod evaluations;
pub mod health;
pub mod patients;
pub mod rpc;
pub mod session;
pub mod summary;

/// Current instant, used for record timestamps.
pub(crate) fn now() -> jiff::Timestamp {
    jiff::Timestamp::now()
}

/// Today's civil date in the system time zone.
pub(crate) fn today() -> jiff::civil::Date {
    jiff::Zoned::now().date()
}
