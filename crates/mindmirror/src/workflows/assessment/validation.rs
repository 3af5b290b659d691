use serde::Serialize;
use serde_json::Value;

/// A single Likert response in `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Likert(u8);

impl Likert {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    pub const fn value(self) -> u8 {
        self.0
    }

    /// Score of a negatively keyed item.
    pub const fn reversed(self) -> u8 {
        Self::MAX + 1 - self.0
    }

    fn from_json(value: &Value) -> Option<Self> {
        let number = value.as_f64()?;
        if !number.is_finite() || number.fract() != 0.0 {
            return None;
        }
        if number < f64::from(Self::MIN) || number > f64::from(Self::MAX) {
            return None;
        }
        Self::new(number as u8)
    }
}

/// Whether `raw` is a complete, in-range answer set of `expected_len` items.
pub fn is_complete(raw: &[Value], expected_len: usize) -> bool {
    raw.len() == expected_len && raw.iter().all(|value| Likert::from_json(value).is_some())
}

/// Typed form of [`is_complete`]: the answers as a fixed-size Likert array.
pub fn validate<const N: usize>(raw: &[Value]) -> Option<[Likert; N]> {
    if raw.len() != N {
        return None;
    }

    let mut answers = [Likert(Likert::MIN); N];
    for (slot, value) in answers.iter_mut().zip(raw) {
        *slot = Likert::from_json(value)?;
    }
    Some(answers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn answers(value: Value, len: usize) -> Vec<Value> {
        vec![value; len]
    }

    #[test]
    fn accepts_complete_in_range_answers() {
        assert!(is_complete(&answers(json!(3), 50), 50));
        assert!(is_complete(&answers(json!(5.0), 35), 35));
        assert!(validate::<35>(&answers(json!(1), 35)).is_some());
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(!is_complete(&answers(json!(3), 49), 50));
        assert!(!is_complete(&answers(json!(3), 51), 50));
        assert!(!is_complete(&[], 35));
        assert!(validate::<50>(&answers(json!(3), 35)).is_none());
    }

    #[test]
    fn rejects_non_numeric_entries() {
        for bad in [json!(null), json!("3"), json!(true), json!([3]), json!({"v": 3})] {
            let mut raw = answers(json!(3), 50);
            raw[17] = bad.clone();
            assert!(!is_complete(&raw, 50), "accepted {bad}");
        }
    }

    #[test]
    fn rejects_out_of_range_and_fractional_values() {
        for bad in [json!(0), json!(6), json!(-1), json!(2.5)] {
            let mut raw = answers(json!(4), 35);
            raw[0] = bad.clone();
            assert!(!is_complete(&raw, 35), "accepted {bad}");
            assert!(validate::<35>(&raw).is_none());
        }
    }

    #[test]
    fn likert_reverse_scoring_mirrors_the_scale() {
        let low = Likert::new(1).expect("valid");
        let high = Likert::new(5).expect("valid");
        assert_eq!(low.reversed(), 5);
        assert_eq!(high.reversed(), 1);
        assert!(Likert::new(0).is_none());
        assert!(Likert::new(6).is_none());
    }
}
