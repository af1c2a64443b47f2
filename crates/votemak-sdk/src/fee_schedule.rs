use {
    crate::{
        DistributionError, DistributionResult,
        records::{EventPosition, FeeEvent},
    },
    votemak_merkle::Amount,
};

/// Fee denominator of the bribe contract (`MAX_FEE`): fees are in basis points.
pub const FEE_DENOMINATOR: u64 = 10_000;

/// The bribe contract's fee over time.
///
/// A fee change takes effect only for events strictly after it in
/// `(block, log index)` order. A bribe in the same position as a fee change
/// (possible when log indices are missing) still pays the previous fee.
#[derive(Debug, Clone)]
pub struct FeeSchedule {
    initial_fee: Amount,
    changes: Vec<(EventPosition, Amount)>,
}

impl FeeSchedule {
    pub fn new(initial_fee: Amount, fee_events: &[FeeEvent]) -> DistributionResult<Self> {
        check_fee(initial_fee)?;

        let mut changes = Vec::with_capacity(fee_events.len());
        for event in fee_events {
            check_fee(event.fee)?;
            changes.push((event.position(), event.fee));
        }
        // stable: same-position changes keep input order, the last one wins
        changes.sort_by_key(|(position, _)| *position);

        Ok(Self {
            initial_fee,
            changes,
        })
    }

    /// Fee in effect for an event at `position`.
    pub fn fee_at(&self, position: EventPosition) -> Amount {
        let effective = self.changes.partition_point(|(at, _)| *at < position);
        match effective {
            0 => self.initial_fee,
            n => self.changes[n - 1].1,
        }
    }

    /// `gross - floor(gross * fee / FEE_DENOMINATOR)` for an event at `position`.
    pub fn net_amount(&self, gross: Amount, position: EventPosition) -> DistributionResult<Amount> {
        net_of_fee(gross, self.fee_at(position))
    }
}

pub fn net_of_fee(gross: Amount, fee: Amount) -> DistributionResult<Amount> {
    let fee_amount = gross
        .mul_div_floor(fee, Amount::from(FEE_DENOMINATOR))
        .ok_or_else(|| DistributionError::AmountOverflow(format!("{gross} * {fee}")))?;
    gross
        .checked_sub(fee_amount)
        .ok_or_else(|| DistributionError::AmountOverflow(format!("{gross} - {fee_amount}")))
}

fn check_fee(fee: Amount) -> DistributionResult<()> {
    let max = Amount::from(FEE_DENOMINATOR);
    if fee > max {
        return Err(DistributionError::InvalidFee { fee, max });
    }
    Ok(())
}
