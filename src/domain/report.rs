use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::shift::ActivityKind;
use crate::domain::shift_report::ShiftActivity;

/// Time spent per machine and activity over a reporting window.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ActivityTotal {
    pub machine_id: i32,
    pub activity: ActivityKind,
    pub total_hours: f64,
    /// Mean over rows that carry an efficiency, i.e. production rows.
    pub average_efficiency: Option<f64>,
}

/// Output of one batch of one product on a machine.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BatchOutput {
    pub machine_id: i32,
    pub batch_number: String,
    pub product_id: i32,
    pub produced_quantity: f64,
    /// Output of the batch number on the machine across all products.
    pub total_batch_output: f64,
}

/// Group activities by machine and activity, ordered by machine id and
/// activity code.
pub fn summarize_activities(activities: &[ShiftActivity]) -> Vec<ActivityTotal> {
    #[derive(Default)]
    struct Accumulator {
        hours: f64,
        efficiency_sum: f64,
        efficiency_count: usize,
    }

    let mut groups: BTreeMap<(i32, String), (ActivityKind, Accumulator)> = BTreeMap::new();

    for activity in activities {
        let (_, acc) = groups
            .entry((activity.machine_id, activity.activity.code()))
            .or_insert_with(|| (activity.activity, Accumulator::default()));
        acc.hours += activity.hours;
        if let Some(efficiency) = activity.efficiency {
            acc.efficiency_sum += efficiency;
            acc.efficiency_count += 1;
        }
    }

    groups
        .into_iter()
        .map(|((machine_id, _), (activity, acc))| ActivityTotal {
            machine_id,
            activity,
            total_hours: acc.hours,
            average_efficiency: (acc.efficiency_count > 0)
                .then(|| acc.efficiency_sum / acc.efficiency_count as f64),
        })
        .collect()
}

/// Sum produced quantity per machine, batch number and product.
///
/// Only production rows that carry a product and a batch number count.
pub fn summarize_batches(activities: &[ShiftActivity]) -> Vec<BatchOutput> {
    let mut per_product: BTreeMap<(i32, String, i32), f64> = BTreeMap::new();
    let mut per_batch: BTreeMap<(i32, String), f64> = BTreeMap::new();

    for activity in activities
        .iter()
        .filter(|activity| activity.activity.is_production())
    {
        let (Some(product_id), Some(batch_number)) =
            (activity.product_id, activity.batch_number.as_ref())
        else {
            continue;
        };
        let quantity = activity.quantity.unwrap_or_default();

        *per_product
            .entry((activity.machine_id, batch_number.clone(), product_id))
            .or_default() += quantity;
        *per_batch
            .entry((activity.machine_id, batch_number.clone()))
            .or_default() += quantity;
    }

    per_product
        .into_iter()
        .map(|((machine_id, batch_number, product_id), produced_quantity)| {
            let total_batch_output = per_batch
                .get(&(machine_id, batch_number.clone()))
                .copied()
                .unwrap_or(produced_quantity);
            BatchOutput {
                machine_id,
                batch_number,
                product_id,
                produced_quantity,
                total_batch_output,
            }
        })
        .collect()
}
