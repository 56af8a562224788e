//! Epoch-seconds timestamps as used on the wire.
//!
//! The service sends timestamps as JSON numbers, integral or fractional
//! seconds since the Unix epoch. Requests carry whole seconds.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserializer, Serializer, de};

fn from_epoch_f64<E: de::Error>(secs: f64) -> Result<DateTime<Utc>, E> {
    if !secs.is_finite() {
        return Err(E::custom("timestamp is not a finite number"));
    }
    let whole = secs.floor();
    #[allow(clippy::cast_possible_truncation)] // range-checked by timestamp_opt below
    let seconds = whole as i64;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // fraction in [0, 1)
    let nanos = ((secs - whole) * 1e9).round().min(999_999_999.0) as u32;
    Utc.timestamp_opt(seconds, nanos)
        .single()
        .ok_or_else(|| E::custom(format!("timestamp {secs} is out of range")))
}

struct EpochVisitor;

impl de::Visitor<'_> for EpochVisitor {
    type Value = DateTime<Utc>;

    fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("epoch seconds")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Utc.timestamp_opt(v, 0)
            .single()
            .ok_or_else(|| E::custom(format!("timestamp {v} is out of range")))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        let v = i64::try_from(v).map_err(|_| E::custom("timestamp is out of range"))?;
        self.visit_i64(v)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        from_epoch_f64(v)
    }
}

/// # Errors
/// Fails on non-numeric or out-of-range values.
pub fn deserialize<'de, D>(d: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    d.deserialize_any(EpochVisitor)
}

/// # Errors
/// Propagates serializer errors.
pub fn serialize<S>(t: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.serialize_i64(t.timestamp())
}

pub mod option {
    //! `Option<DateTime<Utc>>` variant for optional members.

    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    /// # Errors
    /// Fails on non-numeric or out-of-range values.
    pub fn deserialize<'de, D>(d: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Wrapped(#[serde(with = "super")] DateTime<Utc>);

        Ok(Option::<Wrapped>::deserialize(d)?.map(|Wrapped(t)| t))
    }

    /// # Errors
    /// Propagates serializer errors.
    #[allow(clippy::ref_option)] // signature fixed by `#[serde(with)]`
    pub fn serialize<S>(t: &Option<DateTime<Utc>>, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match t {
            Some(t) => s.serialize_i64(t.timestamp()),
            None => s.serialize_none(),
        }
    }
}
