mod installment;
mod share;

pub use installment::{Installment, Schedule};
pub use share::{Holder, Share};

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::error::{CondoError, Result};
use crate::schedule::{generate, InstallmentStatus, ScheduleConfig};
use crate::store::EntityStore;

/// Generate a schedule for a share and save it.
///
/// Nothing is written when the share is unknown or the config fails
/// validation. The parent schedule is created first so each installment can
/// carry its id, and it is removed again if the installments cannot be saved.
pub fn create_schedule<S: EntityStore>(
    store: &mut S,
    share_id: &str,
    config: ScheduleConfig,
    today: NaiveDate,
) -> Result<(Schedule, Vec<Installment>)> {
    let share: Share = store.get(share_id)?;
    let records = generate(&config)?;

    let schedule = store.create(Schedule {
        id: String::new(),
        share_id: share.id.clone(),
        created_on: today,
        config,
    })?;

    let installments = records
        .into_iter()
        .map(|record| Installment::from_record(record, &schedule.id, &share.id))
        .collect();
    let installments = match store.bulk_create(installments) {
        Ok(installments) => installments,
        Err(e) => {
            if let Err(cleanup) = store.delete::<Schedule>(&schedule.id) {
                warn!(schedule = %schedule.id, error = %cleanup, "could not remove schedule");
            }
            return Err(e);
        }
    };

    info!(
        share = %share.id,
        schedule = %schedule.id,
        installments = installments.len(),
        "saved installment schedule"
    );
    Ok((schedule, installments))
}

/// Record payment of an installment
pub fn mark_paid<S: EntityStore>(
    store: &mut S,
    installment_id: &str,
    date: NaiveDate,
) -> Result<Installment> {
    let mut installment: Installment = store.get(installment_id)?;
    if let Some(paid_on) = installment.paid_on {
        return Err(CondoError::AlreadyPaid {
            id: installment.id,
            date: paid_on,
        });
    }

    installment.status = InstallmentStatus::Paid;
    installment.paid_on = Some(date);
    let updated = store.update(installment_id, installment)?;
    info!(installment = %updated.id, paid_on = %date, "recorded payment");
    Ok(updated)
}

/// Installments of one share, in due-date order
pub fn installments_for_share<S: EntityStore>(
    store: &S,
    share_id: &str,
) -> Result<Vec<Installment>> {
    let by_due = |a: &Installment, b: &Installment| {
        a.due_date
            .cmp(&b.due_date)
            .then(a.sequence_number.cmp(&b.sequence_number))
    };
    store.filter(|i: &Installment| i.share_id == share_id, Some(&by_due), None)
}
