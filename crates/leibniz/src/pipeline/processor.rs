use super::request::{Partial, WorkUnit};
use crate::{fixed::FixedPoint, sequence::DenominatorPair};
use num_bigint::BigInt;

/// Evaluates a single unit of work within a worker.
///
/// Each reciprocal is rounded to the service scale independently and the
/// two are summed as scaled integers, so the resulting [`Partial`] is exactly
/// what a serial summation of the same denominators would add.
pub fn evaluate_unit(unit: WorkUnit, fixed: &FixedPoint) -> Partial {
    let WorkUnit { seq, pair } = unit;
    let digits: BigInt = pair.iter().map(|d| fixed.reciprocal(d)).sum();

    Partial {
        seq,
        terms: DenominatorPair::TERMS,
        value: fixed.to_decimal(digits),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::Denominators;
    use bigdecimal::BigDecimal;
    use core::str::FromStr;

    #[test]
    fn first_unit_is_minus_a_third_plus_a_fifth() {
        let fixed = FixedPoint::new(4);
        let unit = WorkUnit {
            seq: 0,
            pair: Denominators::new().next_pair(),
        };

        let partial = evaluate_unit(unit, &fixed);
        assert_eq!(partial.seq, 0);
        assert_eq!(partial.terms, 2);
        assert_eq!(partial.value, BigDecimal::from_str("-0.1333").unwrap());
    }

    #[test]
    fn partials_add_up_to_the_serial_prefix() {
        let fixed = FixedPoint::new(20);
        let mut cursor = Denominators::new();
        let sum = (0..50)
            .map(|seq| {
                evaluate_unit(
                    WorkUnit {
                        seq,
                        pair: cursor.next_pair(),
                    },
                    &fixed,
                )
                .value
            })
            .fold(fixed.one(), |acc, v| acc + v);

        assert_eq!(sum, fixed.prefix_sum(100));
    }
}
