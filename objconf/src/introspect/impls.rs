use std::time::Duration;

use super::{Introspect, Property};
use crate::error::AssignError;

macro_rules! parsed_scalar {
    ($($ty:ty),* $(,)?) => {$(
        impl Introspect for $ty {
            fn type_name(&self) -> &'static str {
                stringify!($ty)
            }

            fn node(&self) -> Option<&dyn Introspect> {
                Some(self)
            }

            fn node_mut(&mut self) -> Option<&mut dyn Introspect> {
                Some(self)
            }

            fn render(&self) -> String {
                self.to_string()
            }

            fn assign(&mut self, text: &str) -> Result<(), AssignError> {
                *self = text.trim().parse().map_err(|e| AssignError::Parse {
                    ty: stringify!($ty),
                    text: text.to_string(),
                    reason: format!("{e}"),
                })?;
                Ok(())
            }
        }
    )*};
}

parsed_scalar!(bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl Introspect for String {
    fn type_name(&self) -> &'static str {
        "String"
    }

    fn node(&self) -> Option<&dyn Introspect> {
        Some(self)
    }

    fn node_mut(&mut self) -> Option<&mut dyn Introspect> {
        Some(self)
    }

    fn render(&self) -> String {
        self.clone()
    }

    fn assign(&mut self, text: &str) -> Result<(), AssignError> {
        *self = text.to_string();
        Ok(())
    }
}

impl Introspect for Duration {
    fn type_name(&self) -> &'static str {
        "Duration"
    }

    fn node(&self) -> Option<&dyn Introspect> {
        Some(self)
    }

    fn node_mut(&mut self) -> Option<&mut dyn Introspect> {
        Some(self)
    }

    fn render(&self) -> String {
        format_duration(*self)
    }

    fn assign(&mut self, text: &str) -> Result<(), AssignError> {
        *self = parse_duration(text).ok_or_else(|| AssignError::Parse {
            ty: "Duration",
            text: text.to_string(),
            reason: "expected [d.]hh:mm:ss[.fraction] or seconds".to_string(),
        })?;
        Ok(())
    }
}

/// Render a duration as `[d.]hh:mm:ss[.fraction]`.
///
/// Trailing zeros of the fraction are dropped; whole seconds have none.
pub fn format_duration(d: Duration) -> String {
    let total = d.as_secs();
    let days = total / 86_400;
    let h = total % 86_400 / 3_600;
    let m = total % 3_600 / 60;
    let s = total % 60;
    let mut out = if days > 0 {
        format!("{days}.{h:02}:{m:02}:{s:02}")
    } else {
        format!("{h:02}:{m:02}:{s:02}")
    };
    let nanos = d.subsec_nanos();
    if nanos > 0 {
        let frac = format!("{nanos:09}");
        out.push('.');
        out.push_str(frac.trim_end_matches('0'));
    }
    out
}

/// Parse the output of [`format_duration`], or a plain number of seconds.
pub fn parse_duration(text: &str) -> Option<Duration> {
    let text = text.trim();
    if !text.contains(':') {
        let secs = text.parse::<f64>().ok()?;
        return Duration::try_from_secs_f64(secs).ok();
    }

    let parts = text.split(':').collect::<Vec<_>>();
    let [head, mins, secs] = parts.as_slice() else {
        return None;
    };
    let (days, hours) = match head.split_once('.') {
        Some((d, h)) => (d.parse::<u64>().ok()?, h.parse::<u64>().ok()?),
        None => (0, head.parse::<u64>().ok()?),
    };
    let minutes = mins.parse::<u64>().ok()?;
    let (whole, frac) = secs.split_once('.').unwrap_or((*secs, ""));
    let seconds = whole.parse::<u64>().ok()?;
    if minutes >= 60 || seconds >= 60 || (days > 0 && hours >= 24) {
        return None;
    }

    let nanos = if frac.is_empty() {
        0
    } else if frac.len() <= 9 && frac.bytes().all(|b| b.is_ascii_digit()) {
        format!("{frac:0<9}").parse::<u32>().ok()?
    } else {
        return None;
    };

    let total = days
        .checked_mul(86_400)?
        .checked_add(hours.checked_mul(3_600)?)?
        .checked_add(minutes * 60 + seconds)?;
    Some(Duration::new(total, nanos))
}

impl<T: Introspect> Introspect for Vec<T> {
    fn type_name(&self) -> &'static str {
        "Vec"
    }

    fn node(&self) -> Option<&dyn Introspect> {
        Some(self)
    }

    fn node_mut(&mut self) -> Option<&mut dyn Introspect> {
        Some(self)
    }

    fn render(&self) -> String {
        format!("({} items)", self.len())
    }

    fn elements(&self) -> Option<Vec<&dyn Introspect>> {
        Some(self.iter().map(|e| e as &dyn Introspect).collect())
    }

    fn element_mut(&mut self, index: usize) -> Option<&mut dyn Introspect> {
        self.get_mut(index).map(|e| e as &mut dyn Introspect)
    }
}

/// `None` is the absent value: the walker stops there and paths cannot pass
/// through it. Assigning to `None` starts from `T::default()`.
impl<T: Introspect + Default> Introspect for Option<T> {
    fn type_name(&self) -> &'static str {
        match self {
            Some(v) => v.type_name(),
            None => "Option",
        }
    }

    fn node(&self) -> Option<&dyn Introspect> {
        self.as_ref().and_then(|v| v.node())
    }

    fn node_mut(&mut self) -> Option<&mut dyn Introspect> {
        self.as_mut().and_then(|v| v.node_mut())
    }

    fn render(&self) -> String {
        self.as_ref().map(|v| v.render()).unwrap_or_default()
    }

    fn properties(&self) -> Vec<Property<'_>> {
        self.as_ref().map(|v| v.properties()).unwrap_or_default()
    }

    fn property_mut(&mut self, name: &str) -> Option<&mut dyn Introspect> {
        self.as_mut().and_then(|v| v.property_mut(name))
    }

    fn elements(&self) -> Option<Vec<&dyn Introspect>> {
        self.as_ref().and_then(|v| v.elements())
    }

    fn element_mut(&mut self, index: usize) -> Option<&mut dyn Introspect> {
        self.as_mut().and_then(|v| v.element_mut(index))
    }

    fn choices(&self) -> Option<&'static [&'static str]> {
        match self {
            Some(v) => v.choices(),
            None => T::default().choices(),
        }
    }

    fn assign(&mut self, text: &str) -> Result<(), AssignError> {
        match self {
            Some(v) => v.assign(text),
            None => {
                let mut v = T::default();
                v.assign(text)?;
                *self = Some(v);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_assign() {
        let mut n = 0i32;
        n.assign(" 42 ").unwrap();
        assert_eq!(n, 42);
        assert!(matches!(
            n.assign("forty"),
            Err(AssignError::Parse { ty: "i32", .. })
        ));

        let mut b = false;
        b.assign("true").unwrap();
        assert!(b);

        let mut s = String::new();
        s.assign(" padded ").unwrap();
        assert_eq!(s, " padded ");
    }

    #[test]
    fn test_containers_are_not_scalars() {
        let mut v = vec![1u8, 2];
        assert_eq!(v.assign("3"), Err(AssignError::NotScalar("Vec")));
        assert_eq!(v.elements().unwrap().len(), 2);
        v.element_mut(1).unwrap().assign("9").unwrap();
        assert_eq!(v, vec![1, 9]);
    }

    #[test]
    fn test_option_absent_and_present() {
        let mut o: Option<u16> = None;
        assert!(o.node().is_none());
        assert_eq!(o.render(), "");
        o.assign("7").unwrap();
        assert_eq!(o, Some(7));
        assert_eq!(o.node().unwrap().render(), "7");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(30)), "00:00:30");
        assert_eq!(format_duration(Duration::from_secs(4 * 60)), "00:04:00");
        assert_eq!(format_duration(Duration::from_millis(500)), "00:00:00.5");
        assert_eq!(
            format_duration(Duration::from_secs(86_400 + 3_661)),
            "1.01:01:01"
        );
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("00:01:00"), Some(Duration::from_secs(60)));
        assert_eq!(parse_duration("0:0:0.25"), Some(Duration::from_millis(250)));
        assert_eq!(
            parse_duration("2.03:00:00"),
            Some(Duration::from_secs(2 * 86_400 + 3 * 3_600))
        );
        assert_eq!(parse_duration("90"), Some(Duration::from_secs(90)));
        assert_eq!(parse_duration("1.5"), Some(Duration::from_millis(1500)));
        assert_eq!(parse_duration("00:61:00"), None);
        assert_eq!(parse_duration("-3"), None);
        assert_eq!(parse_duration("1:2"), None);
        assert_eq!(parse_duration("00:00:01.1234567891"), None);
    }

    #[test]
    fn test_duration_text_round_trip() {
        for d in [
            Duration::ZERO,
            Duration::from_millis(1),
            Duration::new(93_784, 120_000_000),
        ] {
            assert_eq!(parse_duration(&format_duration(d)), Some(d));
        }
    }
}
