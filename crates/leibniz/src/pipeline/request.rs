use crate::sequence::DenominatorPair;
use bigdecimal::BigDecimal;

/// A message sent from the generator to an individual worker task.
///
/// `seq` numbers units in cursor order, starting at zero. The aggregator uses
/// it to fold partials back in that order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkUnit {
    pub seq: u64,
    pub pair: DenominatorPair,
}

/// The evaluated contribution of one [`WorkUnit`].
///
/// - `seq`: sequence number copied from the unit.
/// - `terms`: how many series terms `value` accounts for.
/// - `value`: the signed sum of the unit's reciprocals at the service scale.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Partial {
    pub seq: u64,
    pub terms: u32,
    pub value: BigDecimal,
}
