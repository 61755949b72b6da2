use crate::types::{LineId, RestaurantId};

/// Why an operation left the cart untouched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IgnoreReason {
    /// add_item with quantity <= 0.
    NonPositiveQuantity,
    /// Line id (or index) not present in the cart.
    UnknownLine,
    /// confirm/cancel with nothing staged.
    NoPendingAddition,
    /// Conflicting add under `PendingPolicy::KeepFirst` while one is staged.
    PendingKept,
}

impl IgnoreReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            IgnoreReason::NonPositiveQuantity => "NON_POSITIVE_QUANTITY",
            IgnoreReason::UnknownLine => "UNKNOWN_LINE",
            IgnoreReason::NoPendingAddition => "NO_PENDING_ADDITION",
            IgnoreReason::PendingKept => "PENDING_KEPT",
        }
    }
}

/// Result of one cart operation.
///
/// Operations never fail; guarded inputs come back as `Ignored` with the
/// cart unchanged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CartOutcome {
    /// New line appended.
    Added { line_id: LineId },
    /// Quantity merged into an existing line with the same configuration key.
    Merged { line_id: LineId, quantity: i64 },
    /// Conflicting restaurant: request staged, warning raised, cart untouched.
    ConflictPending {
        current: RestaurantId,
        requested: RestaurantId,
        overwrote_previous: bool,
    },
    /// Pending addition applied as a hard replacement of the cart.
    Replaced {
        restaurant: RestaurantId,
        line_id: LineId,
        discarded_lines: usize,
    },
    /// Pending addition discarded; cart untouched.
    ConflictCancelled,
    QuantityUpdated { line_id: LineId, quantity: i64 },
    Removed { line_id: LineId, cart_emptied: bool },
    Cleared,
    Ignored(IgnoreReason),
}

impl CartOutcome {
    /// `false` only for `Ignored`.
    pub fn changed_state(&self) -> bool {
        !matches!(self, CartOutcome::Ignored(_))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CartOutcome::Added { .. } => "ADDED",
            CartOutcome::Merged { .. } => "MERGED",
            CartOutcome::ConflictPending { .. } => "CONFLICT_PENDING",
            CartOutcome::Replaced { .. } => "REPLACED",
            CartOutcome::ConflictCancelled => "CONFLICT_CANCELLED",
            CartOutcome::QuantityUpdated { .. } => "QUANTITY_UPDATED",
            CartOutcome::Removed { .. } => "REMOVED",
            CartOutcome::Cleared => "CLEARED",
            CartOutcome::Ignored(_) => "IGNORED",
        }
    }

    /// The line this outcome touched, if any.
    pub fn line_id(&self) -> Option<&LineId> {
        match self {
            CartOutcome::Added { line_id }
            | CartOutcome::Merged { line_id, .. }
            | CartOutcome::Replaced { line_id, .. }
            | CartOutcome::QuantityUpdated { line_id, .. }
            | CartOutcome::Removed { line_id, .. } => Some(line_id),
            _ => None,
        }
    }
}
