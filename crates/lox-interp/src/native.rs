//! Host-provided native functions (`spec.md` S4.4).
//!
//! `clock` is the only one the spec names: arity 0, returns wall-clock
//! seconds as a number. Monotonicity is explicitly not required.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::value::Value;

pub fn clock(_args: &[Value]) -> Value {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    Value::Number(elapsed.as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_returns_a_nonnegative_number() {
        match clock(&[]) {
            Value::Number(n) => assert!(n >= 0.0),
            other => panic!("expected Number, got {other:?}"),
        }
    }
}
