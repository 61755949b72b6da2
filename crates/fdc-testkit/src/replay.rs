use std::cell::Cell;
use std::rc::Rc;

use fdc_cart::{CartOutcome, CartSnapshot, CartStore};
use fdc_config::CartSettings;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::script::Script;

/// One applied command.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    /// 1-based.
    pub step: usize,
    pub op: String,
    pub outcome: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// First step after which the cart failed its invariant check.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityFailure {
    pub step: usize,
    pub violation: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayReport {
    pub name: String,
    pub pending_policy: String,
    pub steps: Vec<StepRecord>,
    /// Observer notifications delivered (one per state-changing step).
    pub notifications: usize,
    pub snapshot: CartSnapshot,
    pub integrity: Option<IntegrityFailure>,
}

impl ReplayReport {
    pub fn is_clean(&self) -> bool {
        self.integrity.is_none()
    }

    pub fn outcomes(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.outcome.as_str()).collect()
    }
}

/// Apply every step to a fresh [`CartStore`], checking invariants after each.
///
/// The script's own `pending_policy` wins over `settings`.
pub fn replay(script: &Script, settings: &CartSettings) -> ReplayReport {
    let policy = script.pending_policy.unwrap_or(settings.pending_policy);
    let mut store = CartStore::with_policy(policy);

    let notifications = Rc::new(Cell::new(0usize));
    let counter = Rc::clone(&notifications);
    store.subscribe(move |_: &CartSnapshot| counter.set(counter.get() + 1));

    let mut steps = Vec::with_capacity(script.steps.len());
    let mut integrity = None;

    for (i, command) in script.steps.iter().enumerate() {
        let step = i + 1;
        let op = command.op_name();
        let outcome = store.apply(command.clone());

        let reason = match &outcome {
            CartOutcome::Ignored(r) => Some(r.as_str().to_string()),
            _ => None,
        };
        steps.push(StepRecord {
            step,
            op: op.to_string(),
            outcome: outcome.as_str().to_string(),
            line_id: outcome.line_id().map(|id| id.to_string()),
            reason,
        });

        if integrity.is_none() {
            if let Err(v) = store.cart().check_invariants() {
                warn!(step, op, violation = %v, "cart invariant violated during replay");
                integrity = Some(IntegrityFailure {
                    step,
                    violation: v.to_string(),
                });
            }
        }
    }

    ReplayReport {
        name: script.name.clone(),
        pending_policy: policy.as_str().to_string(),
        steps,
        notifications: notifications.get(),
        snapshot: store.snapshot(),
        integrity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{menu_item, restaurant};
    use fdc_cart::{CartCommand, LineRef, PendingPolicy, MICROS_SCALE};

    fn add(rid: u64, item: u64, qty: i64) -> CartCommand {
        CartCommand::AddItem {
            restaurant: restaurant(rid, "R"),
            menu_item: menu_item(item, "I", 3),
            quantity: qty,
            selections: vec![],
        }
    }

    #[test]
    fn records_each_step_and_ignores_do_not_notify() {
        let script = Script {
            name: "t".to_string(),
            pending_policy: None,
            steps: vec![
                add(1, 5, 1),
                add(1, 5, 0),
                CartCommand::UpdateItemQuantity {
                    line: LineRef::Index(0),
                    quantity: 4,
                },
            ],
        };
        let report = replay(&script, &CartSettings::default());
        assert_eq!(report.outcomes(), vec!["ADDED", "IGNORED", "QUANTITY_UPDATED"]);
        assert_eq!(report.steps[1].reason.as_deref(), Some("NON_POSITIVE_QUANTITY"));
        assert_eq!(report.notifications, 2);
        assert_eq!(report.snapshot.subtotal_micros, 12 * MICROS_SCALE);
        assert!(report.is_clean());
    }

    #[test]
    fn script_policy_overrides_settings() {
        let script = Script {
            name: String::new(),
            pending_policy: Some(PendingPolicy::KeepFirst),
            steps: vec![add(1, 5, 1), add(2, 6, 1), add(3, 7, 1)],
        };
        let settings = CartSettings::default();
        let report = replay(&script, &settings);
        assert_eq!(report.pending_policy, "keep_first");
        assert_eq!(report.outcomes(), vec!["ADDED", "CONFLICT_PENDING", "IGNORED"]);
        assert_eq!(report.steps[2].reason.as_deref(), Some("PENDING_KEPT"));
        let pending = report.snapshot.pending_add_item.as_ref().unwrap();
        assert_eq!(pending.restaurant.id.0, 2);
    }
}
